//! Static mapping from Rust value types to library datatype descriptors.

mod descriptor;
mod h5type;

pub use self::descriptor::{
    CompoundField, CompoundType, EnumMember, EnumType, FloatSize, IntSize, TypeDescriptor,
};
pub use self::h5type::{descriptor_of_ptr, H5Type};
