use crate::jvm::class_file::ConstantPoolOverflow;

/// Failures of the class file codec
#[derive(Debug)]
pub enum Error {
    IoError(std::io::Error),
    ConstantPoolOverflow(ConstantPoolOverflow),

    /// The first four bytes were not `0xCAFEBABE`
    BadMagic([u8; 4]),

    /// A constant pool entry carried a tag the codec does not know
    UnknownConstantTag(u8),

    /// A `MethodHandle` constant carried a reference kind outside 1-9
    UnknownHandleKind(u8),

    /// A UTF-8 constant that is not valid modified UTF-8
    MalformedUtf8(Vec<u8>),

    /// The declared constant pool count does not line up with the parsed entries
    ///
    /// This happens when a two-slot constant (`long`/`double`) straddles the declared end of the
    /// pool.
    MalformedConstantPool,

    /// Bytes left over after the class file structure ended
    TrailingBytes(usize),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::IoError(err)
    }
}

impl From<ConstantPoolOverflow> for Error {
    fn from(overflow: ConstantPoolOverflow) -> Error {
        Error::ConstantPoolOverflow(overflow)
    }
}
