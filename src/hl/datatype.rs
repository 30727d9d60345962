use std::fmt::{self, Display};

use hdf5_sys::h5i::H5Iget_name;
use hdf5_sys::h5t::{
    H5T_class_t, H5T_cset_t, H5T_sign_t, H5T_str_t, H5Tarray_create2, H5Tcommitted, H5Tcopy,
    H5Tcreate, H5Tenum_create, H5Tenum_insert, H5Tequal, H5Tget_array_dims2, H5Tget_array_ndims,
    H5Tget_class, H5Tget_cset, H5Tget_member_name, H5Tget_member_offset, H5Tget_member_type,
    H5Tget_member_value, H5Tget_nmembers, H5Tget_sign, H5Tget_size, H5Tget_super, H5Tinsert,
    H5Tis_variable_str, H5Tset_cset, H5Tset_size, H5Tset_strpad, H5T_VARIABLE,
};

use crate::globals::*;
use crate::internal_prelude::*;
use crate::types::{
    CompoundField, CompoundType, EnumMember, EnumType, FloatSize, IntSize, TypeDescriptor as TD,
};

/// Element layout as understood by the library; either transient or committed to a file.
#[repr(transparent)]
#[derive(Clone)]
pub struct Datatype(Handle);

impl_class!(Datatype: "datatype", [H5I_DATATYPE] => Object {
    fn short_repr(&self) -> Option<String> {
        let desc = match self.to_descriptor() {
            Ok(desc) => desc.to_string(),
            Err(_) => self.class().to_string(),
        };
        if !self.is_committed() {
            return Some(desc);
        }
        let name = h5lock!(get_h5_str(|m, s| H5Iget_name(self.id(), m, s))).unwrap_or_default();
        Some(format!("\"{name}\" ({desc})"))
    }
});

impl PartialEq for Datatype {
    fn eq(&self, other: &Self) -> bool {
        h5call!(H5Tequal(self.id(), other.id())).map_or(false, |equal| equal > 0)
    }
}

/// Coarse classification of a datatype.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeClass {
    Integer,
    Float,
    String,
    Compound,
    Enum,
    Array,
    VarLen,
    Other,
}

impl From<H5T_class_t> for TypeClass {
    fn from(class: H5T_class_t) -> Self {
        use H5T_class_t::*;
        match class {
            H5T_INTEGER => Self::Integer,
            H5T_FLOAT => Self::Float,
            H5T_STRING => Self::String,
            H5T_COMPOUND => Self::Compound,
            H5T_ENUM => Self::Enum,
            H5T_ARRAY => Self::Array,
            H5T_VLEN => Self::VarLen,
            _ => Self::Other,
        }
    }
}

impl Display for TypeClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = format!("{self:?}").to_lowercase();
        f.write_str(&name)
    }
}

/// Standard type with the host's byte order.
macro_rules! host_order {
    ($be:ident, $le:ident) => {
        if cfg!(target_endian = "big") {
            &$be
        } else {
            &$le
        }
    };
}

fn predefined(desc: &TD) -> Option<&'static LibraryId> {
    Some(match desc {
        TD::Integer(IntSize::U1) => host_order!(H5T_STD_I8BE, H5T_STD_I8LE),
        TD::Integer(IntSize::U2) => host_order!(H5T_STD_I16BE, H5T_STD_I16LE),
        TD::Integer(IntSize::U4) => host_order!(H5T_STD_I32BE, H5T_STD_I32LE),
        TD::Integer(IntSize::U8) => host_order!(H5T_STD_I64BE, H5T_STD_I64LE),
        TD::Unsigned(IntSize::U1) => host_order!(H5T_STD_U8BE, H5T_STD_U8LE),
        TD::Unsigned(IntSize::U2) => host_order!(H5T_STD_U16BE, H5T_STD_U16LE),
        TD::Unsigned(IntSize::U4) => host_order!(H5T_STD_U32BE, H5T_STD_U32LE),
        TD::Unsigned(IntSize::U8) => host_order!(H5T_STD_U64BE, H5T_STD_U64LE),
        TD::Float(FloatSize::U4) => host_order!(H5T_IEEE_F32BE, H5T_IEEE_F32LE),
        TD::Float(FloatSize::U8) => host_order!(H5T_IEEE_F64BE, H5T_IEEE_F64LE),
        _ => return None,
    })
}

/// Name of a compound field or enum member; the library allocates it for us.
unsafe fn member_name(id: hid_t, idx: c_uint) -> String {
    let name = H5Tget_member_name(id, idx);
    let owned = string_from_cstr(name);
    h5_free_memory(name.cast());
    owned
}

// each builder owns its id through a `Datatype` from the start, so a failing call releases it

unsafe fn create_string(size: Option<usize>, cset: H5T_cset_t) -> Result<Datatype> {
    let string = Datatype::from_id(h5try!(H5Tcopy(*H5T_C_S1)))?;
    h5try!(H5Tset_cset(string.id(), cset));
    let pad = if size.is_some() { H5T_str_t::H5T_STR_NULLPAD } else { H5T_str_t::H5T_STR_NULLTERM };
    h5try!(H5Tset_strpad(string.id(), pad));
    h5try!(H5Tset_size(string.id(), size.unwrap_or(H5T_VARIABLE)));
    Ok(string)
}

unsafe fn create_enum(base: &TD, members: &[(&str, u64)]) -> Result<Datatype> {
    let base = Datatype::from_descriptor(base)?;
    let enum_type = Datatype::from_id(h5try!(H5Tenum_create(base.id())))?;
    for &(name, value) in members {
        let name = to_cstring(name)?;
        // the low bytes of the value hold the member on little-endian hosts
        h5try!(H5Tenum_insert(enum_type.id(), name.as_ptr(), (&value as *const u64).cast()));
    }
    Ok(enum_type)
}

unsafe fn create_compound(compound: &CompoundType) -> Result<Datatype> {
    // sized up front, fields may come in any offset order
    let id = h5try!(H5Tcreate(H5T_class_t::H5T_COMPOUND, compound.size));
    let compound_type = Datatype::from_id(id)?;
    for field in &compound.fields {
        let name = to_cstring(&field.name)?;
        let field_type = Datatype::from_descriptor(&field.ty)?;
        h5try!(H5Tinsert(compound_type.id(), name.as_ptr(), field.offset, field_type.id()));
    }
    Ok(compound_type)
}

impl Datatype {
    /// Total size of one element in bytes.
    pub fn size(&self) -> usize {
        h5call!(H5Tget_size(self.id()) as hsize_t).map_or(0, |size| size as _)
    }

    pub fn class(&self) -> TypeClass {
        h5lock!(H5Tget_class(self.id())).into()
    }

    /// `true` if the datatype is stored in a file under a name.
    pub fn is_committed(&self) -> bool {
        h5call!(H5Tcommitted(self.id())).map_or(false, |committed| committed > 0)
    }

    /// `true` if this datatype is the same as the one `T` maps onto.
    pub fn is<T: H5Type>(&self) -> bool {
        Self::from_type::<T>().map_or(false, |dtype| &dtype == self)
    }

    pub fn from_type<T: H5Type>() -> Result<Self> {
        Self::from_descriptor(&T::type_descriptor())
    }

    fn super_type(&self) -> Result<Self> {
        Self::from_id(h5try!(H5Tget_super(self.id())))
    }

    fn member_count(&self) -> Result<c_uint> {
        Ok(h5try!(H5Tget_nmembers(self.id())) as _)
    }

    pub fn to_descriptor(&self) -> Result<TD> {
        let id = self.id();
        let size = self.size();
        h5lock!(match H5Tget_class(id) {
            H5T_class_t::H5T_INTEGER => {
                let size = IntSize::from_int(size).ok_or("Invalid size of integer datatype")?;
                match H5Tget_sign(id) {
                    H5T_sign_t::H5T_SGN_2 => Ok(TD::Integer(size)),
                    H5T_sign_t::H5T_SGN_NONE => Ok(TD::Unsigned(size)),
                    _ => fail!("Invalid sign of integer datatype"),
                }
            }
            H5T_class_t::H5T_FLOAT => match FloatSize::from_int(size) {
                Some(size) => Ok(TD::Float(size)),
                None => fail!("Invalid size of float datatype"),
            },
            H5T_class_t::H5T_ENUM => self.read_enum(),
            H5T_class_t::H5T_COMPOUND => self.read_compound(size),
            H5T_class_t::H5T_ARRAY => {
                ensure!(
                    h5try!(H5Tget_array_ndims(id)) == 1,
                    "Multi-dimensional array datatypes are not supported"
                );
                let mut len: hsize_t = 0;
                h5try!(H5Tget_array_dims2(id, &mut len));
                let elem = self.super_type()?.to_descriptor()?;
                Ok(TD::FixedArray(Box::new(elem), len as _))
            }
            H5T_class_t::H5T_STRING => {
                let var_len = h5try!(H5Tis_variable_str(id)) > 0;
                match (H5Tget_cset(id), var_len) {
                    (H5T_cset_t::H5T_CSET_ASCII, false) => Ok(TD::FixedAscii(size)),
                    (H5T_cset_t::H5T_CSET_UTF8, false) => Ok(TD::FixedUnicode(size)),
                    (H5T_cset_t::H5T_CSET_ASCII, true) => Ok(TD::VarLenAscii),
                    (H5T_cset_t::H5T_CSET_UTF8, true) => Ok(TD::VarLenUnicode),
                    _ => fail!("Invalid encoding for string datatype"),
                }
            }
            _ => fail!("Unsupported datatype class"),
        })
    }

    unsafe fn read_enum(&self) -> Result<TD> {
        let (size, signed) = match self.super_type()?.to_descriptor()? {
            TD::Integer(size) => (size, true),
            TD::Unsigned(size) => (size, false),
            _ => fail!("Invalid base type for enum datatype"),
        };
        let mut members = Vec::new();
        for idx in 0..self.member_count()? {
            let mut value: u64 = 0;
            h5try!(H5Tget_member_value(self.id(), idx, (&mut value as *mut u64).cast()));
            members.push(EnumMember { name: member_name(self.id(), idx), value });
        }
        // booleans are stored as a two-member i8 enum
        let is_bool = size == IntSize::U1
            && members.iter().map(|m| (m.name.as_str(), m.value)).eq([("FALSE", 0), ("TRUE", 1)]);
        if is_bool {
            return Ok(TD::Boolean);
        }
        Ok(TD::Enum(EnumType { size, signed, members }))
    }

    unsafe fn read_compound(&self, size: usize) -> Result<TD> {
        let id = self.id();
        let mut fields = Vec::new();
        for idx in 0..self.member_count()? {
            let ty = Self::from_id(h5try!(H5Tget_member_type(id, idx)))?;
            fields.push(CompoundField {
                name: member_name(id, idx),
                ty: ty.to_descriptor()?,
                offset: H5Tget_member_offset(id, idx) as _,
                index: idx as _,
            });
        }
        Ok(TD::Compound(CompoundType { fields, size }))
    }

    pub fn from_descriptor(desc: &TD) -> Result<Self> {
        if let Some(predefined) = predefined(desc) {
            return Self::from_id(h5try!(H5Tcopy(**predefined)));
        }
        h5lock!(match desc {
            TD::Boolean => create_enum(&TD::Integer(IntSize::U1), &[("FALSE", 0), ("TRUE", 1)]),
            TD::Enum(enum_type) => {
                let members: Vec<_> = enum_type.members.iter().map(|m| (m.name.as_str(), m.value)).collect();
                create_enum(&enum_type.base_type(), &members)
            }
            TD::Compound(compound) => create_compound(compound),
            TD::FixedArray(elem, len) => {
                let elem = Self::from_descriptor(elem)?;
                let dims = [*len as hsize_t];
                Self::from_id(h5try!(H5Tarray_create2(elem.id(), 1, dims.as_ptr())))
            }
            TD::FixedAscii(size) => create_string(Some(*size), H5T_cset_t::H5T_CSET_ASCII),
            TD::FixedUnicode(size) => create_string(Some(*size), H5T_cset_t::H5T_CSET_UTF8),
            TD::VarLenAscii => create_string(None, H5T_cset_t::H5T_CSET_ASCII),
            TD::VarLenUnicode => create_string(None, H5T_cset_t::H5T_CSET_UTF8),
            _ => fail!("Unsupported type descriptor: {}", desc),
        })
    }
}
