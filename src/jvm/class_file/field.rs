use crate::jvm::class_file::{Attribute, ConstantPool, Deserialize, Serialize, Utf8ConstantIndex};
use crate::jvm::{Error, FieldAccessFlags};
use byteorder::{ReadBytesExt, WriteBytesExt};

/// Field declared by a class or interface
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.5
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub access_flags: FieldAccessFlags,
    pub name_index: Utf8ConstantIndex,
    pub descriptor_index: Utf8ConstantIndex,
    pub attributes: Vec<Attribute>,
}

impl Field {
    /// Resolve the field's name through the constant pool
    pub fn name<'p>(&self, constants: &'p ConstantPool) -> Option<&'p str> {
        constants.utf8(self.name_index)
    }

    /// Resolve the field's descriptor through the constant pool
    pub fn descriptor<'p>(&self, constants: &'p ConstantPool) -> Option<&'p str> {
        constants.utf8(self.descriptor_index)
    }
}

impl Serialize for Field {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.access_flags.serialize(writer)?;
        self.name_index.serialize(writer)?;
        self.descriptor_index.serialize(writer)?;
        self.attributes.serialize(writer)?;
        Ok(())
    }
}

impl Deserialize for Field {
    fn parse<R: ReadBytesExt>(reader: &mut R) -> Result<Self, Error> {
        let access_flags = FieldAccessFlags::parse(reader)?;
        let name_index = Utf8ConstantIndex::parse(reader)?;
        let descriptor_index = Utf8ConstantIndex::parse(reader)?;
        let attributes = Vec::parse(reader)?;
        Ok(Field {
            access_flags,
            name_index,
            descriptor_index,
            attributes,
        })
    }
}
