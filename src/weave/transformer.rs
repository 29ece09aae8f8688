use crate::jvm::class_file::{AttributeLike, ClassFile, Code};
use crate::weave::{MixinError, MixinHandle, MixinSelector};
use std::panic::{self, AssertUnwindSafe};

/// Drives the rewrite pipeline over one class
///
/// Application order across kinds is fixed: class mixins, then field mixins, then method mixins,
/// then method-code mixins. Within a kind the selector orders by priority. Every mixin
/// invocation is fail-isolated: an error (or panic) skips that one mixin, logs it against the
/// owning module, and the pipeline continues from the last successfully-produced value.
pub struct ClassTransformer<'e> {
    selector: MixinSelector<'e>,
}

impl<'e> ClassTransformer<'e> {
    pub fn new(selector: MixinSelector<'e>) -> ClassTransformer<'e> {
        ClassTransformer { selector }
    }

    /// Parse, rewrite, and re-serialize one class
    ///
    /// Returns `None` when nothing changed, including every failure mode: an unparseable input,
    /// a class where every applicable mixin failed, or a modified class that would not
    /// re-serialize.
    pub fn transform(&self, class_name: &str, bytes: &[u8]) -> Option<Vec<u8>> {
        let mut class = match ClassFile::parse_bytes(bytes) {
            Ok(class) => class,
            Err(err) => {
                log::warn!(
                    "Could not parse class {}, leaving it untouched: {:?}",
                    class_name,
                    err
                );
                return None;
            }
        };

        let mut modified = false;
        self.apply_class_mixins(class_name, &mut class, &mut modified);
        self.apply_field_mixins(class_name, &mut class, &mut modified);
        self.apply_method_mixins(class_name, &mut class, &mut modified);

        if !modified {
            log::trace!("No mixin modified {}", class_name);
            return None;
        }

        match class.encode() {
            Ok(replacement) => {
                log::debug!(
                    "Rewrote {}: {} bytes in, {} bytes out",
                    class_name,
                    bytes.len(),
                    replacement.len()
                );
                Some(replacement)
            }
            Err(err) => {
                log::warn!(
                    "Could not re-serialize modified class {}, dropping the changes: {:?}",
                    class_name,
                    err
                );
                None
            }
        }
    }

    fn apply_class_mixins(&self, class_name: &str, class: &mut ClassFile, modified: &mut bool) {
        for descriptor in self.selector.select_class(class_name) {
            let apply = match &descriptor.handle {
                MixinHandle::Class(apply) => apply,
                _ => continue,
            };
            match guarded(|| apply(class)) {
                Ok(replacement) => {
                    *class = replacement;
                    *modified = true;
                }
                Err(err) => log::error!(
                    "Class mixin from {} failed on {}: {}",
                    descriptor.module,
                    class_name,
                    err
                ),
            }
        }
    }

    fn apply_field_mixins(&self, class_name: &str, class: &mut ClassFile, modified: &mut bool) {
        // Pre-pass snapshot: replacements land at the index the field had before the pass
        for index in 0..class.fields.len() {
            let field = &class.fields[index];
            let (field_name, field_descriptor) = match (
                field.name(&class.constants),
                field.descriptor(&class.constants),
            ) {
                (Some(name), Some(descriptor)) => (name.to_owned(), descriptor.to_owned()),
                _ => continue,
            };

            let applicable = self
                .selector
                .select_field(class_name, &field_name, &field_descriptor);
            if applicable.is_empty() {
                continue;
            }

            let mut current = class.fields[index].clone();
            for descriptor in applicable {
                let apply = match &descriptor.handle {
                    MixinHandle::Field { apply, .. } => apply,
                    _ => continue,
                };
                match guarded(|| apply(class, &current)) {
                    Ok(replacement) => {
                        current = replacement;
                        *modified = true;
                    }
                    Err(err) => log::error!(
                        "Field mixin from {} failed on {}.{}: {}",
                        descriptor.module,
                        class_name,
                        field_name,
                        err
                    ),
                }
            }
            class.fields[index] = current;
        }
    }

    fn apply_method_mixins(&self, class_name: &str, class: &mut ClassFile, modified: &mut bool) {
        for index in 0..class.methods.len() {
            let method = &class.methods[index];
            let (method_name, method_signature) = match (
                method.name(&class.constants),
                method.descriptor(&class.constants),
            ) {
                (Some(name), Some(signature)) => (name.to_owned(), signature.to_owned()),
                _ => continue,
            };

            let applicable = self
                .selector
                .select_method(class_name, &method_name, &method_signature);
            if !applicable.is_empty() {
                let mut current = class.methods[index].clone();
                for descriptor in applicable {
                    let apply = match &descriptor.handle {
                        MixinHandle::Method { apply, .. } => apply,
                        _ => continue,
                    };
                    match guarded(|| apply(class, &current)) {
                        Ok(replacement) => {
                            current = replacement;
                            *modified = true;
                        }
                        Err(err) => log::error!(
                            "Method mixin from {} failed on {}.{}{}: {}",
                            descriptor.module,
                            class_name,
                            method_name,
                            method_signature,
                            err
                        ),
                    }
                }
                class.methods[index] = current;
            }

            self.apply_code_mixins(
                class_name,
                class,
                index,
                &method_name,
                &method_signature,
                modified,
            );
        }
    }

    /// Method-code pass for one method; the identity comes from the pre-pass snapshot, while the
    /// `Code` attribute is located on the (possibly replaced) method
    fn apply_code_mixins(
        &self,
        class_name: &str,
        class: &mut ClassFile,
        index: usize,
        method_name: &str,
        method_signature: &str,
        modified: &mut bool,
    ) {
        let applicable = self
            .selector
            .select_method_code(class_name, method_name, method_signature);
        if applicable.is_empty() {
            return;
        }

        let attribute_index =
            match class.methods[index].attribute_index(&class.constants, Code::NAME) {
                Some(attribute_index) => attribute_index,
                None => {
                    log::debug!(
                        "Skipping code mixins for {}.{}{}: no Code attribute",
                        class_name,
                        method_name,
                        method_signature
                    );
                    return;
                }
            };

        let mut code =
            match Code::parse_bytes(&class.methods[index].attributes[attribute_index].info) {
                Ok(code) => code,
                Err(err) => {
                    log::error!(
                        "Could not decode Code attribute of {}.{}{}: {:?}",
                        class_name,
                        method_name,
                        method_signature,
                        err
                    );
                    return;
                }
            };

        let mut applied = false;
        for descriptor in applicable {
            let apply = match &descriptor.handle {
                MixinHandle::MethodCode { apply, .. } => apply,
                _ => continue,
            };
            match guarded(|| apply(class, &code)) {
                Ok(replacement) => {
                    code = replacement;
                    applied = true;
                }
                Err(err) => log::error!(
                    "Code mixin from {} failed on {}.{}{}: {}",
                    descriptor.module,
                    class_name,
                    method_name,
                    method_signature,
                    err
                ),
            }
        }
        if !applied {
            return;
        }

        match code.encode() {
            Ok(info) => {
                class.methods[index].attributes[attribute_index].info = info;
                *modified = true;
            }
            Err(err) => log::error!(
                "Could not re-encode Code attribute of {}.{}{}, leaving the method's code untouched: {:?}",
                class_name,
                method_name,
                method_signature,
                err
            ),
        }
    }
}

/// Run one mixin invocation, turning a panic into a `MixinError`
///
/// A buggy mixin must not be able to brick the host's class loader, and in Rust "throwing"
/// includes panicking.
fn guarded<T>(run: impl FnOnce() -> Result<T, MixinError>) -> Result<T, MixinError> {
    match panic::catch_unwind(AssertUnwindSafe(run)) {
        Ok(result) => result,
        Err(payload) => Err(MixinError::from_panic(payload)),
    }
}
