use crate::jvm::class_file::{
    Attribute, ClassConstantIndex, ConstantPool, Deserialize, Field, Method, Serialize, Version,
};
use crate::jvm::{ClassAccessFlags, Error};
use byteorder::{ReadBytesExt, WriteBytesExt};
use std::io::Cursor;

/// Representation of the [`class` file format of the JVM][0]
///
/// The order of `fields` and `methods` is exactly the order in the underlying bytes, and
/// re-serializing an unmodified `ClassFile` reproduces a structurally identical class.
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html
#[derive(Debug, Clone, PartialEq)]
pub struct ClassFile {
    pub version: Version,
    pub constants: ConstantPool,
    pub access_flags: ClassAccessFlags,
    pub this_class: ClassConstantIndex,
    pub super_class: ClassConstantIndex,
    pub interfaces: Vec<ClassConstantIndex>,
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
    pub attributes: Vec<Attribute>,
}

impl ClassFile {
    /// Magic header bytes that go at the front of the serialized class file
    const MAGIC: [u8; 4] = [0xCA, 0xFE, 0xBA, 0xBE];

    /// Parse a class file from a byte buffer, rejecting leftover bytes
    pub fn parse_bytes(bytes: &[u8]) -> Result<ClassFile, Error> {
        let mut cursor = Cursor::new(bytes);
        let class = ClassFile::parse(&mut cursor)?;
        let remaining = bytes.len() - cursor.position() as usize;
        if remaining != 0 {
            return Err(Error::TrailingBytes(remaining));
        }
        Ok(class)
    }

    /// Serialize the class file into a fresh byte buffer
    pub fn encode(&self) -> std::io::Result<Vec<u8>> {
        let mut bytes = vec![];
        self.serialize(&mut bytes)?;
        Ok(bytes)
    }

    /// Name of this class, in internal (`/`-separated) form
    pub fn this_class_name(&self) -> Option<&str> {
        self.constants.class_name(self.this_class)
    }
}

impl Serialize for ClassFile {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&ClassFile::MAGIC)?;
        self.version.serialize(writer)?;
        self.constants.serialize(writer)?;
        self.access_flags.serialize(writer)?;
        self.this_class.serialize(writer)?;
        self.super_class.serialize(writer)?;
        self.interfaces.serialize(writer)?;
        self.fields.serialize(writer)?;
        self.methods.serialize(writer)?;
        self.attributes.serialize(writer)?;
        Ok(())
    }
}

impl Deserialize for ClassFile {
    fn parse<R: ReadBytesExt>(reader: &mut R) -> Result<Self, Error> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != ClassFile::MAGIC {
            return Err(Error::BadMagic(magic));
        }

        let version = Version::parse(reader)?;
        let constants = ConstantPool::parse(reader)?;
        let access_flags = ClassAccessFlags::parse(reader)?;
        let this_class = ClassConstantIndex::parse(reader)?;
        let super_class = ClassConstantIndex::parse(reader)?;
        let interfaces = Vec::parse(reader)?;
        let fields = Vec::parse(reader)?;
        let methods = Vec::parse(reader)?;
        let attributes = Vec::parse(reader)?;

        Ok(ClassFile {
            version,
            constants,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            attributes,
        })
    }
}
