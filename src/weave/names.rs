use elsa::map::FrozenMap;

/// Memoizing class name normalizer
///
/// Every class name the engine touches goes through [`NameCache::normalize`] first, which
/// canonicalizes it to the internal `/`-separated form (`a.b.C` -> `a/b/C`). The mapping is pure
/// string substitution with no validation, since mixin authors and the codec share the
/// convention.
///
/// The cache is append-only and grows with the number of distinct class names seen in the
/// process; entries are never evicted.
pub struct NameCache {
    cache: FrozenMap<String, String>,
}

impl NameCache {
    pub fn new() -> NameCache {
        NameCache {
            cache: FrozenMap::new(),
        }
    }

    /// Canonicalize a class name, hitting the cache for names seen before
    ///
    /// The returned reference is stable for the life of the cache, so repeated calls with the
    /// same input return the same allocation.
    pub fn normalize<'a>(&'a self, name: &str) -> &'a str {
        if let Some(hit) = self.cache.get(name) {
            return hit;
        }
        self.cache.insert(name.to_owned(), name.replace('.', "/"))
    }
}

impl Default for NameCache {
    fn default() -> NameCache {
        NameCache::new()
    }
}
