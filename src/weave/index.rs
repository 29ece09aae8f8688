use crate::weave::{MixinDescriptor, MixinKind, MixinScanner};

/// The scanned mixin descriptors, in discovery order
///
/// Built once at engine start and replaced wholesale on an explicit rescan; immutable in
/// between. Queries scan linearly, which keeps the observable ordering (discovery order)
/// trivially stable and is cheap at the mixin counts host modules actually register.
pub struct MixinIndex {
    mixins: Vec<MixinDescriptor>,
}

impl MixinIndex {
    /// Build the index by running the scanner
    pub fn from_scan(scanner: &dyn MixinScanner) -> MixinIndex {
        let mixins = scanner.scan();
        log::info!("Indexed {} mixins", mixins.len());
        MixinIndex { mixins }
    }

    /// Every mixin, in discovery order
    pub fn all(&self) -> &[MixinDescriptor] {
        &self.mixins
    }

    /// Mixins of one kind, in discovery order
    pub fn of_kind(&self, kind: MixinKind) -> impl Iterator<Item = &MixinDescriptor> {
        self.mixins
            .iter()
            .filter(move |descriptor| descriptor.kind() == kind)
    }

    /// Re-run the scanner and fully replace the stored list
    pub fn rebuild(&mut self, scanner: &dyn MixinScanner) {
        self.mixins = scanner.scan();
        log::info!("Rebuilt mixin index, now {} mixins", self.mixins.len());
    }

    pub fn len(&self) -> usize {
        self.mixins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mixins.is_empty()
    }
}
