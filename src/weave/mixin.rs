use crate::jvm::class_file::{ClassFile, Code, Field, Method};
use crate::weave::MixinError;

/// Namespace a mixin's declared target names live in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameType {
    /// Names match byte-for-byte (after normalization)
    Default,

    /// Names are in the runtime (obfuscated) namespace; the mapping service decides equivalence
    Obfuscated,

    /// Names are in the deobfuscated namespace and resolve through the mapping database
    Mapped,

    /// A tag the scanner did not recognize
    ///
    /// Kept representable so such a mixin simply never matches, rather than failing the scan.
    Unknown(u32),
}

impl NameType {
    /// Decode the raw tag a scanner found in a mixin's annotation
    pub fn from_raw(raw: u32) -> NameType {
        match raw {
            0 => NameType::Default,
            1 => NameType::Obfuscated,
            2 => NameType::Mapped,
            other => NameType::Unknown(other),
        }
    }
}

/// Target attribute carried by every mixin
#[derive(Debug, Clone)]
pub struct MixinTarget {
    /// Fully-qualified name of the target class, in the namespace selected by `name_type`
    ///
    /// Dotted and slashed forms are both accepted; the engine normalizes.
    pub class_name: String,

    pub name_type: NameType,

    /// Application order key: lower runs first, ties break by discovery order
    pub priority: i32,
}

/// A class mixin receives the current class model and returns its replacement
pub type ClassMixinFn = Box<dyn Fn(&ClassFile) -> Result<ClassFile, MixinError>>;

/// A field mixin receives the class (mutably, so it can intern new constants) and the current
/// field, and returns the replacement field
pub type FieldMixinFn = Box<dyn Fn(&mut ClassFile, &Field) -> Result<Field, MixinError>>;

/// A method mixin receives the class and the current method, and returns the replacement method
pub type MethodMixinFn = Box<dyn Fn(&mut ClassFile, &Method) -> Result<Method, MixinError>>;

/// A method-code mixin receives the class and the decoded `Code` attribute, and returns the
/// replacement `Code`
pub type CodeMixinFn = Box<dyn Fn(&mut ClassFile, &Code) -> Result<Code, MixinError>>;

/// The four mixin kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MixinKind {
    Class,
    Field,
    Method,
    MethodCode,
}

/// Kind-specific payload of a mixin: the member identity it binds to plus its callable
pub enum MixinHandle {
    Class(ClassMixinFn),
    Field {
        field_name: String,
        field_descriptor: String,
        apply: FieldMixinFn,
    },
    Method {
        method_name: String,
        method_signature: String,
        apply: MethodMixinFn,
    },
    MethodCode {
        method_name: String,
        method_signature: String,
        apply: CodeMixinFn,
    },
}

/// What the registry stores per mixin: target attribute, callable handle, and the owning module
/// (for logging)
pub struct MixinDescriptor {
    pub target: MixinTarget,
    pub module: String,
    pub handle: MixinHandle,
}

impl MixinDescriptor {
    pub fn kind(&self) -> MixinKind {
        match self.handle {
            MixinHandle::Class(_) => MixinKind::Class,
            MixinHandle::Field { .. } => MixinKind::Field,
            MixinHandle::Method { .. } => MixinKind::Method,
            MixinHandle::MethodCode { .. } => MixinKind::MethodCode,
        }
    }

    pub fn class(
        target: MixinTarget,
        module: impl Into<String>,
        apply: ClassMixinFn,
    ) -> MixinDescriptor {
        MixinDescriptor {
            target,
            module: module.into(),
            handle: MixinHandle::Class(apply),
        }
    }

    pub fn field(
        target: MixinTarget,
        module: impl Into<String>,
        field_name: impl Into<String>,
        field_descriptor: impl Into<String>,
        apply: FieldMixinFn,
    ) -> MixinDescriptor {
        MixinDescriptor {
            target,
            module: module.into(),
            handle: MixinHandle::Field {
                field_name: field_name.into(),
                field_descriptor: field_descriptor.into(),
                apply,
            },
        }
    }

    pub fn method(
        target: MixinTarget,
        module: impl Into<String>,
        method_name: impl Into<String>,
        method_signature: impl Into<String>,
        apply: MethodMixinFn,
    ) -> MixinDescriptor {
        MixinDescriptor {
            target,
            module: module.into(),
            handle: MixinHandle::Method {
                method_name: method_name.into(),
                method_signature: method_signature.into(),
                apply,
            },
        }
    }

    pub fn method_code(
        target: MixinTarget,
        module: impl Into<String>,
        method_name: impl Into<String>,
        method_signature: impl Into<String>,
        apply: CodeMixinFn,
    ) -> MixinDescriptor {
        MixinDescriptor {
            target,
            module: module.into(),
            handle: MixinHandle::MethodCode {
                method_name: method_name.into(),
                method_signature: method_signature.into(),
                apply,
            },
        }
    }
}

/// Provider yielding the mixin descriptors found in the host's loaded modules
///
/// The engine invokes this once at startup and again on every explicit rescan. Any
/// `Fn() -> Vec<MixinDescriptor>` closure is a scanner.
pub trait MixinScanner {
    fn scan(&self) -> Vec<MixinDescriptor>;
}

impl<F: Fn() -> Vec<MixinDescriptor>> MixinScanner for F {
    fn scan(&self) -> Vec<MixinDescriptor> {
        self()
    }
}
