use crate::jvm::class_file::{ClassConstantIndex, Deserialize, Serialize, Utf8ConstantIndex};
use crate::jvm::Error;
use byteorder::{ReadBytesExt, WriteBytesExt};
use std::io::Cursor;

/// Attributes (used in classes, fields, methods, and even on some attributes)
///
/// Attributes are carried as a name plus an opaque payload. Payloads the engine does not
/// understand round-trip byte-for-byte; the `Code` payload can additionally be decoded into the
/// structured [`Code`] type and encoded back.
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.7
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name_index: Utf8ConstantIndex,
    pub info: Vec<u8>,
}

impl Serialize for Attribute {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.name_index.serialize(writer)?;

        // Attribute info length is 4 bytes
        (self.info.len() as u32).serialize(writer)?;
        writer.write_all(&self.info)?;

        Ok(())
    }
}

impl Deserialize for Attribute {
    fn parse<R: ReadBytesExt>(reader: &mut R) -> Result<Self, Error> {
        let name_index = Utf8ConstantIndex::parse(reader)?;
        let length = u32::parse(reader)? as usize;
        let mut info = vec![0u8; length];
        reader.read_exact(&mut info)?;
        Ok(Attribute { name_index, info })
    }
}

/// Attributes are all stored in the same way (see `Attribute`), but internally
/// they represent very different things. This trait is implemented by things
/// which can be turned into attributes.
pub trait AttributeLike: Serialize {
    /// Name of the attribute
    const NAME: &'static str;
}

/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.7.3
#[derive(Debug, Clone, PartialEq)]
pub struct Code {
    pub max_stack: u16,
    pub max_locals: u16,
    pub code_array: BytecodeArray,
    pub exception_table: Vec<ExceptionHandler>,
    pub attributes: Vec<Attribute>,
}

impl Code {
    /// Decode a `Code` attribute payload
    pub fn parse_bytes(info: &[u8]) -> Result<Code, Error> {
        let mut cursor = Cursor::new(info);
        let code = Code::parse(&mut cursor)?;
        let remaining = info.len() - cursor.position() as usize;
        if remaining != 0 {
            return Err(Error::TrailingBytes(remaining));
        }
        Ok(code)
    }

    /// Encode back into a `Code` attribute payload
    pub fn encode(&self) -> std::io::Result<Vec<u8>> {
        let mut info = vec![];
        self.serialize(&mut info)?;
        Ok(info)
    }
}

impl Serialize for Code {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.max_stack.serialize(writer)?;
        self.max_locals.serialize(writer)?;
        self.code_array.serialize(writer)?;
        self.exception_table.serialize(writer)?;
        self.attributes.serialize(writer)?;
        Ok(())
    }
}

impl Deserialize for Code {
    fn parse<R: ReadBytesExt>(reader: &mut R) -> Result<Self, Error> {
        let max_stack = u16::parse(reader)?;
        let max_locals = u16::parse(reader)?;
        let code_array = BytecodeArray::parse(reader)?;
        let exception_table = Vec::parse(reader)?;
        let attributes = Vec::parse(reader)?;
        Ok(Code {
            max_stack,
            max_locals,
            code_array,
            exception_table,
            attributes,
        })
    }
}

impl AttributeLike for Code {
    const NAME: &'static str = "Code";
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExceptionHandler {
    /// Start of exception handler range (inclusive)
    pub start_pc: BytecodeIndex,

    /// End of exception handler range (exclusive)
    pub end_pc: BytecodeIndex,

    /// Start of the exception handler
    pub handler_pc: BytecodeIndex,

    pub catch_type: ClassConstantIndex,
}

impl Serialize for ExceptionHandler {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.start_pc.serialize(writer)?;
        self.end_pc.serialize(writer)?;
        self.handler_pc.serialize(writer)?;
        self.catch_type.serialize(writer)?;
        Ok(())
    }
}

impl Deserialize for ExceptionHandler {
    fn parse<R: ReadBytesExt>(reader: &mut R) -> Result<Self, Error> {
        let start_pc = BytecodeIndex::parse(reader)?;
        let end_pc = BytecodeIndex::parse(reader)?;
        let handler_pc = BytecodeIndex::parse(reader)?;
        let catch_type = ClassConstantIndex::parse(reader)?;
        Ok(ExceptionHandler {
            start_pc,
            end_pc,
            handler_pc,
            catch_type,
        })
    }
}

/// Encoded bytecode instructions
#[derive(Debug, Clone, PartialEq)]
pub struct BytecodeArray(pub Vec<u8>);

impl Serialize for BytecodeArray {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        let len = self.0.len() as u32;
        len.serialize(writer)?;
        writer.write_all(&self.0)?;
        Ok(())
    }
}

impl Deserialize for BytecodeArray {
    fn parse<R: ReadBytesExt>(reader: &mut R) -> Result<Self, Error> {
        let len = u32::parse(reader)? as usize;
        let mut bytecode = vec![0u8; len];
        reader.read_exact(&mut bytecode)?;
        Ok(BytecodeArray(bytecode))
    }
}

/// Index into `BytecodeArray`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BytecodeIndex(pub u16);

impl Serialize for BytecodeIndex {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}

impl Deserialize for BytecodeIndex {
    fn parse<R: ReadBytesExt>(reader: &mut R) -> Result<Self, Error> {
        Ok(BytecodeIndex(u16::parse(reader)?))
    }
}

#[cfg(test)]
mod code_attribute_tests {
    use super::*;
    use crate::jvm::class_file::ConstantIndex;

    fn sample_code() -> Code {
        Code {
            max_stack: 2,
            max_locals: 3,
            // iconst_0, istore_1, return
            code_array: BytecodeArray(vec![0x03, 0x3c, 0xb1]),
            exception_table: vec![ExceptionHandler {
                start_pc: BytecodeIndex(0),
                end_pc: BytecodeIndex(2),
                handler_pc: BytecodeIndex(2),
                catch_type: ClassConstantIndex(ConstantIndex(0)),
            }],
            attributes: vec![],
        }
    }

    #[test]
    fn round_trip() {
        let code = sample_code();
        let info = code.encode().unwrap();
        assert_eq!(Code::parse_bytes(&info).unwrap(), code);
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut info = sample_code().encode().unwrap();
        info.push(0);
        assert!(matches!(
            Code::parse_bytes(&info),
            Err(Error::TrailingBytes(1))
        ));
    }
}
