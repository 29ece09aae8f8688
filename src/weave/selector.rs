use crate::weave::{MixinDescriptor, MixinHandle, MixinIndex, MixinKind, NameMatcher};

/// Answers "which mixins apply to this identity?"
///
/// Every `select_*` returns descriptors sorted by ascending priority; equal priorities keep
/// their discovery order (the sort is stable).
pub struct MixinSelector<'e> {
    index: &'e MixinIndex,
    matcher: NameMatcher<'e>,
}

impl<'e> MixinSelector<'e> {
    pub fn new(index: &'e MixinIndex, matcher: NameMatcher<'e>) -> MixinSelector<'e> {
        MixinSelector { index, matcher }
    }

    /// The probe query: does any mixin, of any kind, target this class?
    pub fn has_any(&self, class_name: &str) -> bool {
        self.index
            .all()
            .iter()
            .any(|descriptor| self.matcher.class_matches(class_name, &descriptor.target))
    }

    /// Class-kind mixins whose target class matches
    pub fn select_class(&self, class_name: &str) -> Vec<&'e MixinDescriptor> {
        let mut selected: Vec<&'e MixinDescriptor> = self
            .index
            .of_kind(MixinKind::Class)
            .filter(|descriptor| self.matcher.class_matches(class_name, &descriptor.target))
            .collect();
        Self::order(&mut selected);
        selected
    }

    /// Field-kind mixins matching the class and the observed `(name, descriptor)` pair
    pub fn select_field(
        &self,
        class_name: &str,
        field_name: &str,
        field_descriptor: &str,
    ) -> Vec<&'e MixinDescriptor> {
        let mut selected: Vec<&'e MixinDescriptor> = self
            .index
            .of_kind(MixinKind::Field)
            .filter(|descriptor| {
                if !self.matcher.class_matches(class_name, &descriptor.target) {
                    return false;
                }
                match &descriptor.handle {
                    MixinHandle::Field {
                        field_name: target_name,
                        field_descriptor: target_descriptor,
                        ..
                    } => self.matcher.member_matches(
                        class_name,
                        &descriptor.target,
                        target_name,
                        target_descriptor,
                        field_name,
                        field_descriptor,
                    ),
                    _ => false,
                }
            })
            .collect();
        Self::order(&mut selected);
        selected
    }

    /// Method-kind mixins matching the class and the observed `(name, signature)` pair
    pub fn select_method(
        &self,
        class_name: &str,
        method_name: &str,
        method_signature: &str,
    ) -> Vec<&'e MixinDescriptor> {
        self.select_for_method(MixinKind::Method, class_name, method_name, method_signature)
    }

    /// Method-code-kind mixins matching the class and the observed `(name, signature)` pair
    pub fn select_method_code(
        &self,
        class_name: &str,
        method_name: &str,
        method_signature: &str,
    ) -> Vec<&'e MixinDescriptor> {
        self.select_for_method(
            MixinKind::MethodCode,
            class_name,
            method_name,
            method_signature,
        )
    }

    fn select_for_method(
        &self,
        kind: MixinKind,
        class_name: &str,
        method_name: &str,
        method_signature: &str,
    ) -> Vec<&'e MixinDescriptor> {
        let mut selected: Vec<&'e MixinDescriptor> = self
            .index
            .of_kind(kind)
            .filter(|descriptor| {
                if !self.matcher.class_matches(class_name, &descriptor.target) {
                    return false;
                }
                let (target_name, target_signature) = match &descriptor.handle {
                    MixinHandle::Method {
                        method_name,
                        method_signature,
                        ..
                    }
                    | MixinHandle::MethodCode {
                        method_name,
                        method_signature,
                        ..
                    } => (method_name, method_signature),
                    _ => return false,
                };
                self.matcher.member_matches(
                    class_name,
                    &descriptor.target,
                    target_name,
                    target_signature,
                    method_name,
                    method_signature,
                )
            })
            .collect();
        Self::order(&mut selected);
        selected
    }

    fn order(selected: &mut [&MixinDescriptor]) {
        selected.sort_by_key(|descriptor| descriptor.target.priority);
    }
}

#[cfg(test)]
mod selector_tests {
    use super::*;
    use crate::jvm::class_file::{ClassFile, Field, Method};
    use crate::weave::{MixinTarget, NameCache, NameType, NoMappings};

    fn method_mixin(priority: i32, module: &str) -> MixinDescriptor {
        MixinDescriptor::method(
            MixinTarget {
                class_name: String::from("x/Y"),
                name_type: NameType::Default,
                priority,
            },
            module,
            "run",
            "()V",
            Box::new(|_: &mut ClassFile, method: &Method| Ok(method.clone())),
        )
    }

    fn field_mixin(module: &str) -> MixinDescriptor {
        MixinDescriptor::field(
            MixinTarget {
                class_name: String::from("x/Y"),
                name_type: NameType::Default,
                priority: 0,
            },
            module,
            "count",
            "I",
            Box::new(|_: &mut ClassFile, field: &Field| Ok(field.clone())),
        )
    }

    #[test]
    fn priority_orders_selection_and_ties_keep_discovery_order() {
        let names = NameCache::new();
        let index = MixinIndex::from_scan(&|| {
            vec![
                method_mixin(20, "late"),
                method_mixin(10, "early"),
                method_mixin(10, "early-second"),
            ]
        });
        let selector = MixinSelector::new(&index, NameMatcher::new(&names, &NoMappings));

        let selected = selector.select_method("x/Y", "run", "()V");
        let modules: Vec<&str> = selected.iter().map(|d| d.module.as_str()).collect();
        assert_eq!(modules, vec!["early", "early-second", "late"]);
    }

    #[test]
    fn member_identity_filters_selection() {
        let names = NameCache::new();
        let index = MixinIndex::from_scan(&|| vec![method_mixin(0, "only"), field_mixin("field")]);
        let selector = MixinSelector::new(&index, NameMatcher::new(&names, &NoMappings));

        assert_eq!(selector.select_method("x/Y", "run", "()V").len(), 1);
        assert_eq!(selector.select_method("x/Y", "run", "(I)V").len(), 0);
        assert_eq!(selector.select_method("x/Y", "walk", "()V").len(), 0);
        assert_eq!(selector.select_method("x/Z", "run", "()V").len(), 0);

        assert_eq!(selector.select_field("x/Y", "count", "I").len(), 1);
        assert_eq!(selector.select_field("x/Y", "count", "J").len(), 0);
    }

    #[test]
    fn has_any_sees_every_kind() {
        let names = NameCache::new();
        let index = MixinIndex::from_scan(&|| vec![field_mixin("field")]);
        let selector = MixinSelector::new(&index, NameMatcher::new(&names, &NoMappings));

        assert!(selector.has_any("x/Y"));
        assert!(!selector.has_any("x/Z"));
        assert!(selector.select_class("x/Y").is_empty());
    }
}
