use crate::weave::{ClassMapping, Mappings, MixinTarget, NameCache, NameType};

/// Decides whether an observed runtime name matches a mixin's declared target
///
/// Runtime names arrive already normalized (the engine normalizes at its boundary); declared
/// target names are normalized here, through the shared cache, since they come straight from the
/// scanned descriptors.
pub struct NameMatcher<'e> {
    names: &'e NameCache,
    mappings: &'e dyn Mappings,
}

impl<'e> NameMatcher<'e> {
    pub fn new(names: &'e NameCache, mappings: &'e dyn Mappings) -> NameMatcher<'e> {
        NameMatcher { names, mappings }
    }

    /// Whether `runtime_name` is the class the mixin targets, under the mixin's naming strategy
    ///
    ///   - `Default`: byte-for-byte equality of normalized names
    ///   - `Obfuscated`: the mapping service's class-equivalence predicate decides
    ///   - `Mapped`: the mapping database must contain an entry whose mapped name is the target
    ///     and whose obfuscated name is the runtime name
    ///   - `Unknown`: never matches
    pub fn class_matches(&self, runtime_name: &str, target: &MixinTarget) -> bool {
        let target_name = self.names.normalize(&target.class_name);
        match target.name_type {
            NameType::Default => runtime_name == target_name,
            NameType::Obfuscated => self.mappings.classes_equivalent(runtime_name, target_name),
            NameType::Mapped => self.mapped_entry(runtime_name, target_name).is_some(),
            NameType::Unknown(_) => false,
        }
    }

    /// Whether an observed member (field or method) is the one the mixin binds to
    ///
    /// Descriptors compare directly in every naming mode. Member names also compare directly,
    /// except under `Mapped`, where the matched class entry's member rows translate the declared
    /// (mapped) name into the runtime namespace first; a name with no member row falls back to
    /// direct comparison.
    pub fn member_matches(
        &self,
        runtime_name: &str,
        target: &MixinTarget,
        target_member: &str,
        target_descriptor: &str,
        observed_member: &str,
        observed_descriptor: &str,
    ) -> bool {
        if observed_descriptor != target_descriptor {
            return false;
        }

        if let NameType::Mapped = target.name_type {
            let target_name = self.names.normalize(&target.class_name);
            if let Some(entry) = self.mapped_entry(runtime_name, target_name) {
                if let Some(member) = entry.members.iter().find(|m| m.mapped == target_member) {
                    return member.obfuscated == observed_member;
                }
            }
        }

        observed_member == target_member
    }

    /// The class entry translating `target_name` (mapped) into `runtime_name` (obfuscated)
    fn mapped_entry(&self, runtime_name: &str, target_name: &str) -> Option<&'e ClassMapping> {
        let mappings: &'e dyn Mappings = self.mappings;
        mappings.classes().iter().find(|entry| {
            self.names.normalize(&entry.mapped) == target_name
                && self.names.normalize(&entry.obfuscated) == runtime_name
        })
    }
}

#[cfg(test)]
mod matcher_tests {
    use super::*;
    use crate::weave::{MappingTable, MemberMapping, NoMappings};

    fn target(class_name: &str, name_type: NameType) -> MixinTarget {
        MixinTarget {
            class_name: class_name.to_owned(),
            name_type,
            priority: 0,
        }
    }

    fn entity_mappings() -> MappingTable {
        MappingTable::new(vec![ClassMapping {
            mapped: String::from("net/game/Entity"),
            obfuscated: String::from("a/b/C"),
            members: vec![MemberMapping {
                mapped: String::from("tick"),
                obfuscated: String::from("a"),
            }],
        }])
    }

    #[test]
    fn default_matches_by_equality() {
        let names = NameCache::new();
        let matcher = NameMatcher::new(&names, &NoMappings);
        assert!(matcher.class_matches("a/b/C", &target("a/b/C", NameType::Default)));
        assert!(matcher.class_matches("a/b/C", &target("a.b.C", NameType::Default)));
        assert!(!matcher.class_matches("a/b/D", &target("a/b/C", NameType::Default)));
    }

    #[test]
    fn obfuscated_delegates_to_the_service() {
        let names = NameCache::new();
        let mappings = entity_mappings();
        let matcher = NameMatcher::new(&names, &mappings);
        assert!(matcher.class_matches("a/b/C", &target("a/b/C", NameType::Obfuscated)));
        assert!(matcher.class_matches("a/b/C", &target("net/game/Entity", NameType::Obfuscated)));
        assert!(!matcher.class_matches("a/b/D", &target("net/game/Entity", NameType::Obfuscated)));
    }

    #[test]
    fn mapped_translates_through_the_table() {
        let names = NameCache::new();
        let mappings = entity_mappings();
        let matcher = NameMatcher::new(&names, &mappings);

        let mapped = target("net/game/Entity", NameType::Mapped);
        assert!(matcher.class_matches("a/b/C", &mapped));

        // The mapped name itself is not the runtime name
        assert!(!matcher.class_matches("net/game/Entity", &mapped));
    }

    #[test]
    fn mapped_without_an_entry_does_not_match() {
        let names = NameCache::new();
        let matcher = NameMatcher::new(&names, &NoMappings);
        assert!(!matcher.class_matches("a/b/C", &target("net/game/Entity", NameType::Mapped)));
    }

    #[test]
    fn unknown_name_type_never_matches() {
        let names = NameCache::new();
        let matcher = NameMatcher::new(&names, &NoMappings);
        assert!(!matcher.class_matches("a/b/C", &target("a/b/C", NameType::Unknown(7))));
    }

    #[test]
    fn mapped_member_names_resolve_through_member_rows() {
        let names = NameCache::new();
        let mappings = entity_mappings();
        let matcher = NameMatcher::new(&names, &mappings);
        let mapped = target("net/game/Entity", NameType::Mapped);

        // `tick` is declared in the mapped namespace; the runtime method is `a`
        assert!(matcher.member_matches("a/b/C", &mapped, "tick", "()V", "a", "()V"));
        assert!(!matcher.member_matches("a/b/C", &mapped, "tick", "()V", "tick", "()V"));

        // No member row: direct comparison
        assert!(matcher.member_matches("a/b/C", &mapped, "render", "()V", "render", "()V"));

        // Descriptors always compare directly
        assert!(!matcher.member_matches("a/b/C", &mapped, "tick", "()V", "a", "(I)V"));
    }

    #[test]
    fn member_names_compare_directly_outside_mapped() {
        let names = NameCache::new();
        let matcher = NameMatcher::new(&names, &NoMappings);
        let default = target("a/b/C", NameType::Default);
        assert!(matcher.member_matches("a/b/C", &default, "run", "()V", "run", "()V"));
        assert!(!matcher.member_matches("a/b/C", &default, "run", "()V", "walk", "()V"));
    }
}
