use std::fmt::{self, Display};
use std::mem;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IntSize {
    U1 = 1,
    U2 = 2,
    U4 = 4,
    U8 = 8,
}

impl IntSize {
    pub const fn from_int(size: usize) -> Option<Self> {
        match size {
            1 => Some(Self::U1),
            2 => Some(Self::U2),
            4 => Some(Self::U4),
            8 => Some(Self::U8),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FloatSize {
    U4 = 4,
    U8 = 8,
}

impl FloatSize {
    pub const fn from_int(size: usize) -> Option<Self> {
        match size {
            4 => Some(Self::U4),
            8 => Some(Self::U8),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumMember {
    pub name: String,
    pub value: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumType {
    pub size: IntSize,
    pub signed: bool,
    pub members: Vec<EnumMember>,
}

impl EnumType {
    pub fn base_type(&self) -> TypeDescriptor {
        if self.signed {
            TypeDescriptor::Integer(self.size)
        } else {
            TypeDescriptor::Unsigned(self.size)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompoundField {
    pub name: String,
    pub ty: TypeDescriptor,
    pub offset: usize,
    pub index: usize,
}

impl CompoundField {
    pub fn new(name: &str, ty: TypeDescriptor, offset: usize, index: usize) -> Self {
        Self { name: name.to_owned(), ty, offset, index }
    }
}

/// Layout of an aggregate: named fields at byte offsets within `size` bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompoundType {
    pub fields: Vec<CompoundField>,
    pub size: usize,
}

/// On-the-wire layout of one element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeDescriptor {
    Integer(IntSize),
    Unsigned(IntSize),
    Float(FloatSize),
    Boolean,
    Enum(EnumType),
    Compound(CompoundType),
    FixedArray(Box<TypeDescriptor>, usize),
    FixedAscii(usize),
    FixedUnicode(usize),
    VarLenAscii,
    VarLenUnicode,
}

impl Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Integer(size) => write!(f, "int{}", *size as usize * 8),
            Self::Unsigned(size) => write!(f, "uint{}", *size as usize * 8),
            Self::Float(size) => write!(f, "float{}", *size as usize * 8),
            Self::Boolean => write!(f, "bool"),
            Self::Enum(ref tp) => write!(f, "enum ({})", tp.base_type()),
            Self::Compound(ref tp) => write!(f, "compound ({} fields)", tp.fields.len()),
            Self::FixedArray(ref tp, n) => write!(f, "[{tp}; {n}]"),
            Self::FixedAscii(n) => write!(f, "string (len {n})"),
            Self::FixedUnicode(n) => write!(f, "unicode (len {n})"),
            Self::VarLenAscii => write!(f, "string (var len)"),
            Self::VarLenUnicode => write!(f, "unicode (var len)"),
        }
    }
}

impl TypeDescriptor {
    /// Size of one element in memory, in bytes.
    pub fn size(&self) -> usize {
        match *self {
            Self::Integer(size) | Self::Unsigned(size) => size as _,
            Self::Float(size) => size as _,
            Self::Boolean => 1,
            Self::Enum(ref enum_type) => enum_type.size as _,
            Self::Compound(ref compound) => compound.size,
            Self::FixedArray(ref ty, len) => ty.size() * len,
            Self::FixedAscii(len) | Self::FixedUnicode(len) => len,
            Self::VarLenAscii | Self::VarLenUnicode => mem::size_of::<*const u8>(),
        }
    }

    /// `true` if elements hold pointers owned by the library after a read.
    pub fn is_variable_length(&self) -> bool {
        match *self {
            Self::VarLenAscii | Self::VarLenUnicode => true,
            Self::FixedArray(ref ty, _) => ty.is_variable_length(),
            Self::Compound(ref compound) => compound.fields.iter().any(|f| f.ty.is_variable_length()),
            _ => false,
        }
    }
}
