use crate::jvm;
use crate::jvm::class_file::ConstantPoolOverflow;
use std::any::Any;
use std::fmt;

/// Failure raised by a mixin callable
///
/// The engine never propagates these: a failing mixin is logged and skipped, and the pipeline
/// continues from the last successfully-produced value.
#[derive(Debug)]
pub struct MixinError(String);

impl MixinError {
    pub fn new(message: impl Into<String>) -> MixinError {
        MixinError(message.into())
    }

    /// Recover a message from a caught panic payload
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> MixinError {
        let message = if let Some(message) = payload.downcast_ref::<&str>() {
            (*message).to_owned()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            String::from("mixin panicked")
        };
        MixinError(message)
    }
}

impl fmt::Display for MixinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ConstantPoolOverflow> for MixinError {
    fn from(overflow: ConstantPoolOverflow) -> MixinError {
        MixinError(format!("constant pool overflow at {}", overflow.offset))
    }
}

impl From<jvm::Error> for MixinError {
    fn from(err: jvm::Error) -> MixinError {
        MixinError(format!("{:?}", err))
    }
}
