use crate::weave::{
    ClassTransformer, Mappings, MixinIndex, MixinScanner, MixinSelector, NameCache, NameMatcher,
};
use std::panic::{self, AssertUnwindSafe};

/// The engine handle owned by the host
///
/// Holds the mixin index, the normalized-name cache, and the two injected seams (scanner and
/// mapping service). One engine serves one host program; there is no global instance.
///
/// [`Engine::modify_class`] borrows `&self` and assumes the host calls it serially (the class
/// loading lock of the intended embedding provides this); [`Engine::rescan`] requires
/// `&mut self`, so a rescan cannot overlap an in-flight call through the same reference.
pub struct Engine {
    index: MixinIndex,
    names: NameCache,
    mappings: Box<dyn Mappings>,
    scanner: Box<dyn MixinScanner>,
}

impl Engine {
    /// Build an engine: runs the scanner once to populate the index
    pub fn new(scanner: Box<dyn MixinScanner>, mappings: Box<dyn Mappings>) -> Engine {
        let index = MixinIndex::from_scan(scanner.as_ref());
        Engine {
            index,
            names: NameCache::new(),
            mappings,
            scanner,
        }
    }

    /// The current mixin index
    pub fn mixins(&self) -> &MixinIndex {
        &self.index
    }

    /// Re-run the scanner and replace the index wholesale
    pub fn rescan(&mut self) {
        self.index.rebuild(self.scanner.as_ref());
    }

    /// The host-facing entry point, with a tri-state contract:
    ///
    ///   - `class_data` absent or empty (*probe mode*): `Some(vec![])` if any mixin targets this
    ///     class, else `None`.
    ///   - `class_data` present (*transform mode*): `None` for "no change", or the replacement
    ///     class file bytes.
    ///
    /// `class_name` is accepted in dotted or slashed form. No failure inside the pipeline
    /// escapes: the worst outcome of anything going wrong is `None` plus a log entry.
    pub fn modify_class(&self, class_name: &str, class_data: Option<&[u8]>) -> Option<Vec<u8>> {
        let runtime_name = self.names.normalize(class_name);
        let selector = self.selector();

        let class_data = match class_data {
            Some(bytes) if !bytes.is_empty() => bytes,
            _ => {
                return if selector.has_any(runtime_name) {
                    log::debug!("Probe for {}: modification needed", runtime_name);
                    Some(Vec::new())
                } else {
                    log::trace!("Probe for {}: no applicable mixins", runtime_name);
                    None
                };
            }
        };

        if !selector.has_any(runtime_name) {
            return None;
        }

        let transformer = ClassTransformer::new(selector);
        match panic::catch_unwind(AssertUnwindSafe(|| {
            transformer.transform(runtime_name, class_data)
        })) {
            Ok(result) => result,
            Err(_) => {
                log::error!(
                    "Unexpected panic while transforming {}, leaving the class untouched",
                    runtime_name
                );
                None
            }
        }
    }

    fn selector(&self) -> MixinSelector<'_> {
        MixinSelector::new(
            &self.index,
            NameMatcher::new(&self.names, self.mappings.as_ref()),
        )
    }
}
