use crate::jvm::class_file::{Attribute, AttributeLike, Deserialize, Serialize};
use crate::jvm::Error;
use crate::util::{Offset, OffsetVec, Width};
use byteorder::{ReadBytesExt, WriteBytesExt};
use std::borrow::{Borrow, Cow};
use std::collections::HashMap;

/// Class file constant pool
///
/// A parsed pool keeps its entries in their original order (so every index in the rest of the
/// class file stays valid across a rewrite). New constants can be interned at the back through
/// the `get_*` methods, which deduplicate with insert-if-absent maps. Nothing is ever removed or
/// renumbered.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantPool {
    constants: OffsetVec<Constant>,

    utf8s: HashMap<String, Utf8ConstantIndex>,
    classes: HashMap<Utf8ConstantIndex, ClassConstantIndex>,
}

impl ConstantPool {
    /// Make a fresh empty constant pool
    pub fn new() -> ConstantPool {
        ConstantPool {
            constants: OffsetVec::new_starting_at(Offset(1)),
            utf8s: HashMap::new(),
            classes: HashMap::new(),
        }
    }

    /// Number of pool slots in use (the `constant_pool_count` of the class file)
    pub fn offset_len(&self) -> usize {
        self.constants.offset_len().0
    }

    /// Look up a constant by index
    pub fn get(&self, index: ConstantIndex) -> Option<&Constant> {
        self.constants.get_offset(Offset(index.0 as usize))
    }

    /// Resolve a UTF-8 constant into its string value
    pub fn utf8(&self, index: Utf8ConstantIndex) -> Option<&str> {
        match self.get(index.0) {
            Some(Constant::Utf8(string)) => Some(string.as_str()),
            _ => None,
        }
    }

    /// Resolve a class constant into its (internal form) name
    pub fn class_name(&self, index: ClassConstantIndex) -> Option<&str> {
        match self.get(index.0) {
            Some(Constant::Class(name_index)) => self.utf8(*name_index),
            _ => None,
        }
    }

    /// Push a constant into the constant pool, provided there is space for it
    ///
    /// Note: the `constant_pool_count` header is a `u16`, indexing starts at 1, and some
    /// constants take two slots, so the pool is full once the next free slot would pass 65535.
    fn push_constant(&mut self, constant: Constant) -> Result<ConstantIndex, ConstantPoolOverflow> {
        let offset = self.constants.offset_len().0;
        if offset + constant.width() > u16::MAX as usize {
            return Err(ConstantPoolOverflow { constant, offset });
        }
        Ok(ConstantIndex(self.constants.push(constant).0 as u16))
    }

    /// Get or insert a UTF-8 constant from the constant pool
    pub fn get_utf8<'a, S: Into<Cow<'a, str>>>(
        &mut self,
        utf8: S,
    ) -> Result<Utf8ConstantIndex, ConstantPoolOverflow> {
        let cow = utf8.into();

        if let Some(idx) = self.utf8s.get::<str>(cow.borrow()) {
            Ok(*idx)
        } else {
            let owned = cow.into_owned();
            let constant = Constant::Utf8(owned.clone());
            let idx = Utf8ConstantIndex(self.push_constant(constant)?);
            self.utf8s.insert(owned, idx);
            Ok(idx)
        }
    }

    /// Get or insert a class constant from the constant pool
    pub fn get_class(
        &mut self,
        name: Utf8ConstantIndex,
    ) -> Result<ClassConstantIndex, ConstantPoolOverflow> {
        if let Some(idx) = self.classes.get(&name) {
            Ok(*idx)
        } else {
            let idx = ClassConstantIndex(self.push_constant(Constant::Class(name))?);
            self.classes.insert(name, idx);
            Ok(idx)
        }
    }

    /// Turn an attribute structure into a raw [`Attribute`], interning its name
    pub fn get_attribute<A: AttributeLike>(&mut self, attribute: A) -> Result<Attribute, Error> {
        let name_index = self.get_utf8(A::NAME)?;
        let mut info = vec![];

        attribute.serialize(&mut info)?;

        Ok(Attribute { name_index, info })
    }

    /// Register a freshly parsed constant in the deduplication maps
    ///
    /// The first occurrence wins, matching how interning resolves duplicates afterwards.
    fn index_parsed(&mut self, idx: ConstantIndex, constant: &Constant) {
        match constant {
            Constant::Utf8(string) => {
                self.utf8s
                    .entry(string.clone())
                    .or_insert(Utf8ConstantIndex(idx));
            }
            Constant::Class(name_index) => {
                self.classes
                    .entry(*name_index)
                    .or_insert(ClassConstantIndex(idx));
            }
            _ => (),
        }
    }
}

impl Default for ConstantPool {
    fn default() -> ConstantPool {
        ConstantPool::new()
    }
}

impl Serialize for ConstantPool {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        (self.offset_len() as u16).serialize(writer)?;
        for (_, constant) in self.constants.iter() {
            constant.serialize(writer)?;
        }
        Ok(())
    }
}

impl Deserialize for ConstantPool {
    fn parse<R: ReadBytesExt>(reader: &mut R) -> Result<Self, Error> {
        let count = u16::parse(reader)? as usize;
        let mut pool = ConstantPool::new();
        while pool.offset_len() < count {
            let constant = Constant::parse(reader)?;
            let idx = ConstantIndex(pool.constants.offset_len().0 as u16);
            pool.index_parsed(idx, &constant);
            pool.constants.push(constant);
        }
        if pool.offset_len() != count {
            return Err(Error::MalformedConstantPool);
        }
        Ok(pool)
    }
}

/// Overflow of the 65535-slot constant pool
#[derive(Debug)]
pub struct ConstantPoolOverflow {
    pub constant: Constant,
    pub offset: usize,
}

/// Constants as in the constant pool
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.4
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    /// Class or an interface
    Class(Utf8ConstantIndex),

    /// Field
    FieldRef(ClassConstantIndex, NameAndTypeConstantIndex),

    /// Method (this combines `Methodref` and `InterfaceMethodref`)
    MethodRef {
        class: ClassConstantIndex,
        name_and_type: NameAndTypeConstantIndex,
        is_interface: bool,
    },

    /// Constant object of type `java.lang.String`
    String(Utf8ConstantIndex),

    /// Constant primitive of type `int`
    Integer(i32),

    /// Constant primitive of type `float`
    Float(f32),

    /// Constant primitive of type `long`
    Long(i64),

    /// Constant primitive of type `double`
    Double(f64),

    /// Name and a type (eg. for a field or a method)
    NameAndType {
        name: Utf8ConstantIndex,
        descriptor: Utf8ConstantIndex,
    },

    /// Constant UTF-8 encoded raw string value
    ///
    /// Despite the name, the encoding is not quite UTF-8 (the encoding of the
    /// null character `\u{0000}` and the encoding of supplementary characters
    /// is different).
    Utf8(String),

    /// Constant object of type `java.lang.invoke.MethodHandle`
    MethodHandle {
        handle_kind: HandleKind,

        /// Depending on the handle kind, this points to different things:
        ///
        ///   - `FieldRef` for `GetField`, `GetStatic`, `PutField`, `PutStatic`
        ///   - `MethodRef` for the rest
        member: ConstantIndex,
    },

    /// Method type
    MethodType { descriptor: Utf8ConstantIndex },

    /// Dynamically-computed constant
    Dynamic {
        /// Index into the `BootstrapMethods` attribute
        bootstrap_method: u16,
        name_and_type: NameAndTypeConstantIndex,
    },

    /// Dynamically-computed call site
    InvokeDynamic {
        /// Index into the `BootstrapMethods` attribute
        bootstrap_method: u16,
        method_descriptor: NameAndTypeConstantIndex,
    },

    /// Module (only valid in classes with the `MODULE` access flag)
    Module(Utf8ConstantIndex),

    /// Package (only valid in classes with the `MODULE` access flag)
    Package(Utf8ConstantIndex),
}

impl Serialize for Constant {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        match self {
            Constant::Utf8(string) => {
                1u8.serialize(writer)?;
                let buffer: Vec<u8> = encode_modified_utf8(string);
                (buffer.len() as u16).serialize(writer)?;
                writer.write_all(&buffer)?;
            }
            Constant::Integer(integer) => {
                3u8.serialize(writer)?;
                integer.serialize(writer)?;
            }
            Constant::Float(float) => {
                4u8.serialize(writer)?;
                float.serialize(writer)?;
            }
            Constant::Long(long) => {
                5u8.serialize(writer)?;
                long.serialize(writer)?;
            }
            Constant::Double(double) => {
                6u8.serialize(writer)?;
                double.serialize(writer)?;
            }
            Constant::Class(name) => {
                7u8.serialize(writer)?;
                name.serialize(writer)?;
            }
            Constant::String(bytes) => {
                8u8.serialize(writer)?;
                bytes.serialize(writer)?;
            }
            Constant::FieldRef(class, name_and_type) => {
                9u8.serialize(writer)?;
                class.serialize(writer)?;
                name_and_type.serialize(writer)?;
            }
            Constant::MethodRef {
                class,
                name_and_type,
                is_interface,
            } => {
                (if !is_interface { 10u8 } else { 11u8 }).serialize(writer)?;
                class.serialize(writer)?;
                name_and_type.serialize(writer)?;
            }
            Constant::NameAndType { name, descriptor } => {
                12u8.serialize(writer)?;
                name.serialize(writer)?;
                descriptor.serialize(writer)?;
            }
            Constant::MethodHandle {
                handle_kind,
                member,
            } => {
                15u8.serialize(writer)?;
                handle_kind.serialize(writer)?;
                member.serialize(writer)?;
            }
            Constant::MethodType { descriptor } => {
                16u8.serialize(writer)?;
                descriptor.serialize(writer)?;
            }
            Constant::Dynamic {
                bootstrap_method,
                name_and_type,
            } => {
                17u8.serialize(writer)?;
                bootstrap_method.serialize(writer)?;
                name_and_type.serialize(writer)?;
            }
            Constant::InvokeDynamic {
                bootstrap_method,
                method_descriptor,
            } => {
                18u8.serialize(writer)?;
                bootstrap_method.serialize(writer)?;
                method_descriptor.serialize(writer)?;
            }
            Constant::Module(name) => {
                19u8.serialize(writer)?;
                name.serialize(writer)?;
            }
            Constant::Package(name) => {
                20u8.serialize(writer)?;
                name.serialize(writer)?;
            }
        };
        Ok(())
    }
}

impl Deserialize for Constant {
    fn parse<R: ReadBytesExt>(reader: &mut R) -> Result<Self, Error> {
        let tag = u8::parse(reader)?;
        let constant = match tag {
            1 => {
                let length = u16::parse(reader)? as usize;
                let mut buffer = vec![0u8; length];
                reader.read_exact(&mut buffer)?;
                match decode_modified_utf8(&buffer) {
                    Some(string) => Constant::Utf8(string),
                    None => return Err(Error::MalformedUtf8(buffer)),
                }
            }
            3 => Constant::Integer(i32::parse(reader)?),
            4 => Constant::Float(f32::parse(reader)?),
            5 => Constant::Long(i64::parse(reader)?),
            6 => Constant::Double(f64::parse(reader)?),
            7 => Constant::Class(Utf8ConstantIndex::parse(reader)?),
            8 => Constant::String(Utf8ConstantIndex::parse(reader)?),
            9 => Constant::FieldRef(
                ClassConstantIndex::parse(reader)?,
                NameAndTypeConstantIndex::parse(reader)?,
            ),
            10 | 11 => Constant::MethodRef {
                class: ClassConstantIndex::parse(reader)?,
                name_and_type: NameAndTypeConstantIndex::parse(reader)?,
                is_interface: tag == 11,
            },
            12 => Constant::NameAndType {
                name: Utf8ConstantIndex::parse(reader)?,
                descriptor: Utf8ConstantIndex::parse(reader)?,
            },
            15 => Constant::MethodHandle {
                handle_kind: HandleKind::parse(reader)?,
                member: ConstantIndex::parse(reader)?,
            },
            16 => Constant::MethodType {
                descriptor: Utf8ConstantIndex::parse(reader)?,
            },
            17 => Constant::Dynamic {
                bootstrap_method: u16::parse(reader)?,
                name_and_type: NameAndTypeConstantIndex::parse(reader)?,
            },
            18 => Constant::InvokeDynamic {
                bootstrap_method: u16::parse(reader)?,
                method_descriptor: NameAndTypeConstantIndex::parse(reader)?,
            },
            19 => Constant::Module(Utf8ConstantIndex::parse(reader)?),
            20 => Constant::Package(Utf8ConstantIndex::parse(reader)?),
            other => return Err(Error::UnknownConstantTag(other)),
        };
        Ok(constant)
    }
}

/// Almost all constants have width 1, except for `Constant::Long` and `Constant::Double`. Quoting
/// the spec:
///
/// > All 8-byte constants take up two entries in the constant_pool table of the class file. If a
/// > CONSTANT_Long_info or CONSTANT_Double_info structure is the item in the constant_pool table
/// > at index n, then the next usable item in the pool is located at index n+2. The constant_pool
/// > index n+1 must be valid but is considered unusable.
/// >
/// > In retrospect, making 8-byte constants take two constant pool entries was a poor choice.
impl Width for Constant {
    fn width(&self) -> usize {
        match self {
            Constant::Long(_) | Constant::Double(_) => 2,
            _ => 1,
        }
    }
}

/// Kind of a `MethodHandle` constant
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.4.8
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum HandleKind {
    GetField,
    GetStatic,
    PutField,
    PutStatic,
    InvokeVirtual,
    InvokeStatic,
    InvokeSpecial,
    NewInvokeSpecial,
    InvokeInterface,
}

impl HandleKind {
    fn reference_kind(self) -> u8 {
        match self {
            HandleKind::GetField => 1,
            HandleKind::GetStatic => 2,
            HandleKind::PutField => 3,
            HandleKind::PutStatic => 4,
            HandleKind::InvokeVirtual => 5,
            HandleKind::InvokeStatic => 6,
            HandleKind::InvokeSpecial => 7,
            HandleKind::NewInvokeSpecial => 8,
            HandleKind::InvokeInterface => 9,
        }
    }
}

impl Serialize for HandleKind {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.reference_kind().serialize(writer)
    }
}

impl Deserialize for HandleKind {
    fn parse<R: ReadBytesExt>(reader: &mut R) -> Result<Self, Error> {
        Ok(match u8::parse(reader)? {
            1 => HandleKind::GetField,
            2 => HandleKind::GetStatic,
            3 => HandleKind::PutField,
            4 => HandleKind::PutStatic,
            5 => HandleKind::InvokeVirtual,
            6 => HandleKind::InvokeStatic,
            7 => HandleKind::InvokeSpecial,
            8 => HandleKind::NewInvokeSpecial,
            9 => HandleKind::InvokeInterface,
            other => return Err(Error::UnknownHandleKind(other)),
        })
    }
}

/// Modified UTF-8 format used in class files.
///
/// See [this `DataInput` section for details][0]. Quoting from that section:
///
/// > The differences between this format and the standard UTF-8 format are the following:
/// >
/// >  * The null byte `\u{0000}` is encoded in 2-byte format rather than 1-byte, so that the encoded
/// >    strings never have embedded nulls.
/// >  * Only the 1-byte, 2-byte, and 3-byte formats are used.
/// >  * Supplementary characters are represented in the form of surrogate pairs.
///
/// [0]: https://docs.oracle.com/en/java/javase/17/docs/api/java.base/java/io/DataInput.html#modified-utf-8
pub fn encode_modified_utf8(string: &str) -> Vec<u8> {
    let mut buffer: Vec<u8> = vec![];
    for c in string.chars() {
        // Handle the exception for how `\u{0000}` is represented
        let len: usize = if c == '\u{0000}' { 2 } else { c.len_utf8() };
        let code: u32 = c as u32;

        match len {
            1 => buffer.push(code as u8),
            2 => {
                buffer.push((code >> 6 & 0x1F) as u8 | 0b1100_0000);
                buffer.push((code & 0x3F) as u8 | 0b1000_0000);
            }
            3 => {
                buffer.push((code >> 12 & 0x0F) as u8 | 0b1110_0000);
                buffer.push((code >> 6 & 0x3F) as u8 | 0b1000_0000);
                buffer.push((code & 0x3F) as u8 | 0b1000_0000);
            }

            // Supplementary characters: main divergence from unicode
            _ => {
                buffer.push(0b1110_1101);
                buffer.push(((code >> 16 & 0x0F) as u8).wrapping_sub(1) & 0x0F | 0b1010_0000);
                buffer.push((code >> 10 & 0x3F) as u8 | 0b1000_0000);

                buffer.push(0b1110_1101);
                buffer.push(((code >> 6 & 0x1F) as u8) | 0b1011_0000);
                buffer.push((code & 0x3F) as u8 | 0b1000_0000);
            }
        }
    }
    buffer
}

/// Inverse of [`encode_modified_utf8`]
///
/// The 1/2/3-byte groups decode to UTF-16 code units, and supplementary characters come out of
/// the surrogate-pair recombination in `from_utf16`. Returns `None` for byte sequences that are
/// not valid modified UTF-8 (embedded raw nulls, 4-byte groups, truncated groups, unpaired
/// surrogates).
pub fn decode_modified_utf8(bytes: &[u8]) -> Option<String> {
    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut index = 0;

    while index < bytes.len() {
        let byte = bytes[index];
        if byte & 0b1000_0000 == 0 {
            if byte == 0 {
                return None;
            }
            units.push(byte as u16);
            index += 1;
        } else if byte & 0b1110_0000 == 0b1100_0000 {
            let second = *bytes.get(index + 1)?;
            if second & 0b1100_0000 != 0b1000_0000 {
                return None;
            }
            units.push((byte as u16 & 0x1F) << 6 | (second as u16 & 0x3F));
            index += 2;
        } else if byte & 0b1111_0000 == 0b1110_0000 {
            let second = *bytes.get(index + 1)?;
            let third = *bytes.get(index + 2)?;
            if second & 0b1100_0000 != 0b1000_0000 || third & 0b1100_0000 != 0b1000_0000 {
                return None;
            }
            units.push(
                (byte as u16 & 0x0F) << 12 | (second as u16 & 0x3F) << 6 | (third as u16 & 0x3F),
            );
            index += 3;
        } else {
            return None;
        }
    }

    String::from_utf16(&units).ok()
}

#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub struct ConstantIndex(pub u16);

#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub struct Utf8ConstantIndex(pub ConstantIndex);

#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub struct ClassConstantIndex(pub ConstantIndex);

#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub struct NameAndTypeConstantIndex(pub ConstantIndex);

impl From<Utf8ConstantIndex> for ConstantIndex {
    fn from(index: Utf8ConstantIndex) -> ConstantIndex {
        index.0
    }
}

impl From<ClassConstantIndex> for ConstantIndex {
    fn from(index: ClassConstantIndex) -> ConstantIndex {
        index.0
    }
}

impl From<NameAndTypeConstantIndex> for ConstantIndex {
    fn from(index: NameAndTypeConstantIndex) -> ConstantIndex {
        index.0
    }
}

impl Serialize for ConstantIndex {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}

impl Deserialize for ConstantIndex {
    fn parse<R: ReadBytesExt>(reader: &mut R) -> Result<Self, Error> {
        Ok(ConstantIndex(u16::parse(reader)?))
    }
}

impl Serialize for Utf8ConstantIndex {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}

impl Deserialize for Utf8ConstantIndex {
    fn parse<R: ReadBytesExt>(reader: &mut R) -> Result<Self, Error> {
        Ok(Utf8ConstantIndex(ConstantIndex::parse(reader)?))
    }
}

impl Serialize for ClassConstantIndex {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}

impl Deserialize for ClassConstantIndex {
    fn parse<R: ReadBytesExt>(reader: &mut R) -> Result<Self, Error> {
        Ok(ClassConstantIndex(ConstantIndex::parse(reader)?))
    }
}

impl Serialize for NameAndTypeConstantIndex {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}

impl Deserialize for NameAndTypeConstantIndex {
    fn parse<R: ReadBytesExt>(reader: &mut R) -> Result<Self, Error> {
        Ok(NameAndTypeConstantIndex(ConstantIndex::parse(reader)?))
    }
}

#[cfg(test)]
mod modified_utf8_tests {
    use super::*;

    #[test]
    fn containing_null_byte() {
        assert_eq!(encode_modified_utf8("a\x00a"), vec![97, 192, 128, 97]);
        assert_eq!(
            decode_modified_utf8(&[97, 192, 128, 97]),
            Some(String::from("a\x00a"))
        );
    }

    #[test]
    fn simple_ascii() {
        assert_eq!(encode_modified_utf8("foo"), vec![102, 111, 111]);
        assert_eq!(
            encode_modified_utf8("hel10_World"),
            vec![104, 101, 108, 49, 48, 95, 87, 111, 114, 108, 100]
        );
        assert_eq!(
            decode_modified_utf8(&[102, 111, 111]),
            Some(String::from("foo"))
        );
    }

    #[test]
    fn two_and_three_byte_encodings() {
        assert_eq!(
            encode_modified_utf8("ĄǍǞǠǺȀȂȦȺӐӒ"),
            vec![
                196, 132, 199, 141, 199, 158, 199, 160, 199, 186, 200, 128, 200, 130, 200, 166,
                200, 186, 211, 144, 211, 146
            ]
        );
        assert_eq!(
            encode_modified_utf8("ऄअॲঅਅઅଅஅఅಅഅะະ༁ཨ"),
            vec![
                224, 164, 132, 224, 164, 133, 224, 165, 178, 224, 166, 133, 224, 168, 133, 224,
                170, 133, 224, 172, 133, 224, 174, 133, 224, 176, 133, 224, 178, 133, 224, 180,
                133, 224, 184, 176, 224, 186, 176, 224, 188, 129, 224, 189, 168
            ]
        );
    }

    #[test]
    fn supplementary_characters() {
        assert_eq!(
            encode_modified_utf8("\u{10000}\u{dffff}\u{10FFFF}"),
            vec![
                237, 160, 128, 237, 176, 128, 237, 172, 191, 237, 191, 191, 237, 175, 191, 237,
                191, 191
            ]
        );
    }

    #[test]
    fn decode_inverts_encode() {
        for input in ["", "foo", "a\x00b", "ĄǍǞ", "ऄअॲ", "\u{10000}\u{10FFFF}"] {
            assert_eq!(
                decode_modified_utf8(&encode_modified_utf8(input)).as_deref(),
                Some(input)
            );
        }
    }

    #[test]
    fn decode_rejects_garbage() {
        assert_eq!(decode_modified_utf8(&[0x00]), None);
        assert_eq!(decode_modified_utf8(&[0xC0]), None);
        assert_eq!(decode_modified_utf8(&[0xE0, 0x80]), None);
        assert_eq!(decode_modified_utf8(&[0xF0, 0x90, 0x80, 0x80]), None);

        // High surrogate with no low surrogate after it
        assert_eq!(decode_modified_utf8(&[237, 160, 128]), None);
    }
}
