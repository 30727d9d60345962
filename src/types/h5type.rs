use std::mem::{self, MaybeUninit};
use std::ptr;

use super::descriptor::{CompoundField, CompoundType, FloatSize, IntSize, TypeDescriptor};

/// A plain-data type with a fixed on-the-wire layout.
///
/// # Safety
///
/// The descriptor must match the in-memory layout of `Self` exactly: same size, and for
/// aggregates the same field offsets. Values must be valid for any bit pattern the library
/// can write into them.
pub unsafe trait H5Type: 'static {
    fn type_descriptor() -> TypeDescriptor;
}

/// Descriptor of the pointee type; lets macros name a field's type without spelling it.
pub fn descriptor_of_ptr<T: H5Type>(_: *const T) -> TypeDescriptor {
    T::type_descriptor()
}

macro_rules! impl_h5type {
    ($ty:ty, $variant:ident, $size:expr) => {
        unsafe impl H5Type for $ty {
            #[inline]
            fn type_descriptor() -> TypeDescriptor {
                TypeDescriptor::$variant($size)
            }
        }
    };
}

impl_h5type!(i8, Integer, IntSize::U1);
impl_h5type!(i16, Integer, IntSize::U2);
impl_h5type!(i32, Integer, IntSize::U4);
impl_h5type!(i64, Integer, IntSize::U8);
impl_h5type!(u8, Unsigned, IntSize::U1);
impl_h5type!(u16, Unsigned, IntSize::U2);
impl_h5type!(u32, Unsigned, IntSize::U4);
impl_h5type!(u64, Unsigned, IntSize::U8);
impl_h5type!(f32, Float, FloatSize::U4);
impl_h5type!(f64, Float, FloatSize::U8);

#[cfg(target_pointer_width = "32")]
impl_h5type!(isize, Integer, IntSize::U4);
#[cfg(target_pointer_width = "32")]
impl_h5type!(usize, Unsigned, IntSize::U4);

#[cfg(target_pointer_width = "64")]
impl_h5type!(isize, Integer, IntSize::U8);
#[cfg(target_pointer_width = "64")]
impl_h5type!(usize, Unsigned, IntSize::U8);

unsafe impl H5Type for bool {
    #[inline]
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::Boolean
    }
}

unsafe impl<T: H5Type, const N: usize> H5Type for [T; N] {
    #[inline]
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::FixedArray(Box::new(T::type_descriptor()), N)
    }
}

macro_rules! impl_tuple {
    ($($t:ident $i:tt),+) => {
        unsafe impl<$($t: H5Type),+> H5Type for ($($t,)+) {
            fn type_descriptor() -> TypeDescriptor {
                let uninit = MaybeUninit::<Self>::uninit();
                let base = uninit.as_ptr();
                let mut fields = vec![$(
                    CompoundField::new(
                        stringify!($i),
                        <$t as H5Type>::type_descriptor(),
                        unsafe { ptr::addr_of!((*base).$i) as usize - base as usize },
                        $i,
                    ),
                )+];
                fields.sort_by_key(|f| f.offset);
                TypeDescriptor::Compound(CompoundType { fields, size: mem::size_of::<Self>() })
            }
        }
    };
}

impl_tuple!(A 0);
impl_tuple!(A 0, B 1);
impl_tuple!(A 0, B 1, C 2);
impl_tuple!(A 0, B 1, C 2, D 3);
impl_tuple!(A 0, B 1, C 2, D 3, E 4);
impl_tuple!(A 0, B 1, C 2, D 3, E 4, F 5);

/// Implements [`H5Type`] for a `#[repr(C)]` struct whose fields are all `H5Type`.
///
/// Field offsets are taken from the actual struct layout, so the struct must not be
/// `#[repr(packed)]`.
///
/// ```
/// use hdf5_tree::{h5_compound, H5Type};
///
/// #[derive(Clone, Copy, Default)]
/// #[repr(C)]
/// struct Point {
///     x: f64,
///     y: f64,
///     id: u16,
/// }
///
/// h5_compound!(Point { x, y, id });
///
/// assert_eq!(Point::type_descriptor().size(), std::mem::size_of::<Point>());
/// ```
#[macro_export]
macro_rules! h5_compound {
    ($ty:ty { $($field:ident),+ $(,)? }) => {
        unsafe impl $crate::H5Type for $ty {
            fn type_descriptor() -> $crate::types::TypeDescriptor {
                let uninit = ::std::mem::MaybeUninit::<$ty>::uninit();
                let base = uninit.as_ptr();
                let mut fields = ::std::vec::Vec::new();
                $(
                    let field = unsafe { ::std::ptr::addr_of!((*base).$field) };
                    let index = fields.len();
                    fields.push($crate::types::CompoundField::new(
                        stringify!($field),
                        $crate::types::descriptor_of_ptr(field),
                        field as usize - base as usize,
                        index,
                    ));
                )+
                fields.sort_by_key(|f| f.offset);
                $crate::types::TypeDescriptor::Compound($crate::types::CompoundType {
                    fields,
                    size: ::std::mem::size_of::<$ty>(),
                })
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::mem;

    use super::*;

    #[test]
    pub fn test_scalar_descriptors() {
        assert_eq!(i32::type_descriptor(), TypeDescriptor::Integer(IntSize::U4));
        assert_eq!(u8::type_descriptor(), TypeDescriptor::Unsigned(IntSize::U1));
        assert_eq!(f64::type_descriptor(), TypeDescriptor::Float(FloatSize::U8));
        assert_eq!(bool::type_descriptor(), TypeDescriptor::Boolean);
        assert_eq!(usize::type_descriptor().size(), mem::size_of::<usize>());
        assert_eq!(<[u16; 4]>::type_descriptor().size(), 8);
    }

    #[test]
    pub fn test_tuple_layout() {
        type T = (u8, f64, i16);
        let TypeDescriptor::Compound(compound) = T::type_descriptor() else {
            panic!("expected a compound type");
        };
        assert_eq!(compound.size, mem::size_of::<T>());
        assert_eq!(compound.fields.len(), 3);
        let offsets: Vec<_> = compound.fields.iter().map(|f| f.offset).collect();
        let mut sorted = offsets.clone();
        sorted.sort_unstable();
        assert_eq!(offsets, sorted);
        let f64_field = compound.fields.iter().find(|f| f.name == "1").unwrap();
        assert_eq!(f64_field.ty, TypeDescriptor::Float(FloatSize::U8));
        assert_eq!(f64_field.index, 1);
    }

    #[derive(Clone, Copy)]
    #[repr(C)]
    struct Sample {
        flag: bool,
        value: i64,
        pair: [f32; 2],
    }

    h5_compound!(Sample { flag, value, pair });

    #[test]
    pub fn test_compound_macro() {
        let TypeDescriptor::Compound(compound) = Sample::type_descriptor() else {
            panic!("expected a compound type");
        };
        assert_eq!(compound.size, mem::size_of::<Sample>());
        let names: Vec<_> = compound.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["flag", "value", "pair"]);
        assert_eq!(compound.fields[1].offset, 8);
        assert_eq!(compound.fields[2].ty.size(), 8);
    }
}
