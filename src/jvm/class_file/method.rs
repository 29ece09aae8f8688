use crate::jvm::class_file::{Attribute, ConstantPool, Deserialize, Serialize, Utf8ConstantIndex};
use crate::jvm::{Error, MethodAccessFlags};
use byteorder::{ReadBytesExt, WriteBytesExt};

/// Method declared by a class or interface
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.6
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub access_flags: MethodAccessFlags,
    pub name_index: Utf8ConstantIndex,
    pub descriptor_index: Utf8ConstantIndex,
    pub attributes: Vec<Attribute>,
}

impl Method {
    /// Resolve the method's name through the constant pool
    pub fn name<'p>(&self, constants: &'p ConstantPool) -> Option<&'p str> {
        constants.utf8(self.name_index)
    }

    /// Resolve the method's descriptor through the constant pool
    pub fn descriptor<'p>(&self, constants: &'p ConstantPool) -> Option<&'p str> {
        constants.utf8(self.descriptor_index)
    }

    /// Position of the first attribute with the given name (eg. `Code::NAME`)
    ///
    /// Abstract and native methods have no `Code` attribute, in which case this is `None`.
    pub fn attribute_index(&self, constants: &ConstantPool, name: &str) -> Option<usize> {
        self.attributes
            .iter()
            .position(|attribute| constants.utf8(attribute.name_index) == Some(name))
    }
}

impl Serialize for Method {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.access_flags.serialize(writer)?;
        self.name_index.serialize(writer)?;
        self.descriptor_index.serialize(writer)?;
        self.attributes.serialize(writer)?;
        Ok(())
    }
}

impl Deserialize for Method {
    fn parse<R: ReadBytesExt>(reader: &mut R) -> Result<Self, Error> {
        let access_flags = MethodAccessFlags::parse(reader)?;
        let name_index = Utf8ConstantIndex::parse(reader)?;
        let descriptor_index = Utf8ConstantIndex::parse(reader)?;
        let attributes = Vec::parse(reader)?;
        Ok(Method {
            access_flags,
            name_index,
            descriptor_index,
            attributes,
        })
    }
}
