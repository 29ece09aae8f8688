/// One member row of a class entry: the same field or method in both namespaces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberMapping {
    pub mapped: String,
    pub obfuscated: String,
}

/// One class entry of the mapping database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMapping {
    /// Human-readable name in the deobfuscated namespace
    pub mapped: String,

    /// Runtime name in the shipped program
    pub obfuscated: String,

    /// Member rows (fields and methods share the table; descriptors are not mapped)
    pub members: Vec<MemberMapping>,
}

/// The mapping database seam
///
/// The engine never owns name tables itself; it asks this service. Both arguments to
/// [`Mappings::classes_equivalent`] arrive in normalized (`/`-separated) form.
pub trait Mappings {
    /// Iterate the class entries
    fn classes(&self) -> &[ClassMapping];

    /// Class-equivalence predicate used by `Obfuscated` targets
    ///
    /// The target may be expressed in a partially-obfuscated form; the service decides what
    /// counts as the same class.
    fn classes_equivalent(&self, runtime_name: &str, target_name: &str) -> bool;
}

/// Doesn't map anything
///
/// `Default` targets still match by name equality; `Mapped` targets never match.
pub struct NoMappings;

impl Mappings for NoMappings {
    fn classes(&self) -> &[ClassMapping] {
        &[]
    }

    fn classes_equivalent(&self, runtime_name: &str, target_name: &str) -> bool {
        runtime_name == target_name
    }
}

/// In-memory mapping table
pub struct MappingTable {
    classes: Vec<ClassMapping>,
}

impl MappingTable {
    pub fn new(classes: Vec<ClassMapping>) -> MappingTable {
        MappingTable { classes }
    }
}

impl Mappings for MappingTable {
    fn classes(&self) -> &[ClassMapping] {
        &self.classes
    }

    fn classes_equivalent(&self, runtime_name: &str, target_name: &str) -> bool {
        runtime_name == target_name
            || self
                .classes
                .iter()
                .any(|entry| entry.obfuscated == runtime_name && entry.mapped == target_name)
    }
}
