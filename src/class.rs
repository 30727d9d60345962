use std::fmt;
use std::mem::ManuallyDrop;
use std::ptr;

use crate::internal_prelude::*;

/// Common behaviour of every handle-backed wrapper in this crate.
///
/// Implementors are `#[repr(transparent)]` newtypes over [`Handle`], which is what makes
/// `transmute` and `cast` sound.
pub trait ObjectClass: Sized {
    const NAME: &'static str;
    /// Id types this class accepts; empty means any.
    const VALID_TYPES: &'static [H5I_type_t];

    fn from_handle(handle: Handle) -> Self;

    fn handle(&self) -> &Handle;

    fn short_repr(&self) -> Option<String> {
        None
    }

    /// Class-specific check run after the id type has been accepted.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn accepts(id_type: H5I_type_t) -> bool {
        Self::VALID_TYPES.is_empty() || Self::VALID_TYPES.contains(&id_type)
    }

    /// Takes ownership of `id`; it is released if the id does not belong to this class.
    fn from_id(id: hid_t) -> Result<Self> {
        h5lock!({
            let handle = Handle::try_new(id)?;
            ensure!(Self::accepts(handle.id_type()), "Invalid {} id: {}", Self::NAME, id);
            let obj = Self::from_handle(handle);
            obj.validate()?;
            Ok(obj)
        })
    }

    fn invalid() -> Self {
        Self::from_handle(Handle::invalid())
    }

    unsafe fn transmute<T: ObjectClass>(&self) -> &T {
        &*(self as *const Self).cast::<T>()
    }

    unsafe fn cast_unchecked<T: ObjectClass>(self) -> T {
        let this = ManuallyDrop::new(self);
        ptr::read((&*this as *const Self).cast::<T>())
    }

    /// Converts into another class, checking the id type against the target's `VALID_TYPES`.
    fn cast<T: ObjectClass>(self) -> Result<T> {
        let id_type = self.handle().id_type();
        ensure!(
            T::accepts(id_type),
            "unable to cast {} ({:?}) into {}",
            Self::NAME,
            id_type,
            T::NAME
        );
        let obj: T = unsafe { self.cast_unchecked() };
        obj.validate()?;
        Ok(obj)
    }

    fn debug_fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        h5lock!({
            if !self.handle().is_valid_user_id() {
                return write!(f, "<HDF5 {}: invalid id>", Self::NAME);
            }
            match self.short_repr() {
                Some(repr) => write!(f, "<HDF5 {}: {}>", Self::NAME, repr),
                None => write!(f, "<HDF5 {}>", Self::NAME),
            }
        })
    }
}

/// Wraps a raw id into the class `T`, taking ownership of it.
pub unsafe fn from_id<T: ObjectClass>(id: hid_t) -> Result<T> {
    T::from_id(id)
}
