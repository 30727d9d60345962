use std::mem::ManuallyDrop;

use hdf5_sys::h5i::{H5I_type_t, H5Idec_ref, H5Iget_ref, H5Iget_type, H5Iinc_ref, H5Iis_valid};

use crate::internal_prelude::*;

fn known_type(id_type: H5I_type_t) -> Option<H5I_type_t> {
    Some(id_type).filter(|&tp| tp > H5I_BADID && tp < H5I_NTYPES)
}

/// Owning wrapper around a reference-counted library identifier.
///
/// Cloning bumps the library-side reference count; dropping releases exactly one
/// reference. Moving a handle never touches the count.
#[derive(Debug)]
pub struct Handle {
    id: hid_t,
}

impl Handle {
    /// Takes ownership of an identifier.
    pub fn try_new(id: hid_t) -> Result<Self> {
        // an invalid id must never reach Drop, it may since have been reused
        let handle = ManuallyDrop::new(Self { id });
        ensure!(handle.is_valid_user_id(), "Invalid handle id: {}", id);
        Ok(ManuallyDrop::into_inner(handle))
    }

    /// Shares an identifier owned elsewhere, adding one reference.
    pub fn try_borrow(id: hid_t) -> Result<Self> {
        let handle = Self::try_new(id)?;
        handle.incref();
        Ok(handle)
    }

    pub const fn invalid() -> Self {
        Self { id: H5I_INVALID_HID }
    }

    pub const fn id(&self) -> hid_t {
        self.id
    }

    pub fn incref(&self) {
        h5lock!({
            if self.is_valid_user_id() {
                H5Iinc_ref(self.id);
            }
        });
    }

    /// Only to be paired with a previous `incref`.
    pub fn decref(&self) {
        h5lock!({
            if self.is_valid_id() {
                H5Idec_ref(self.id);
            }
        });
    }

    /// `false` for invalid ids and for locked library ids such as property list classes.
    pub fn is_valid_user_id(&self) -> bool {
        h5lock!(H5Iis_valid(self.id)) > 0
    }

    pub fn is_valid_id(&self) -> bool {
        self.id_type() != H5I_BADID
    }

    /// Library-side reference count, 0 for invalid ids.
    pub fn refcount(&self) -> u32 {
        h5call!(H5Iget_ref(self.id)).map_or(0, |count| count as _)
    }

    pub fn id_type(&self) -> H5I_type_t {
        if self.id <= 0 {
            return H5I_BADID;
        }
        known_type(h5lock!(H5Iget_type(self.id))).unwrap_or(H5I_BADID)
    }
}

impl Clone for Handle {
    fn clone(&self) -> Self {
        Self::try_borrow(self.id).unwrap_or_else(|_| Self::invalid())
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        self.decref();
    }
}

#[cfg(test)]
mod tests {
    use hdf5_sys::h5p::H5Pcreate;

    use crate::globals::H5P_CLS_DATASET_XFER;
    use crate::internal_prelude::*;

    #[test]
    pub fn test_refcount_follows_clones() {
        let handle = Handle::try_new(h5lock!(H5Pcreate(*H5P_CLS_DATASET_XFER))).unwrap();
        assert_eq!(handle.refcount(), 1);
        let copy = handle.clone();
        assert_eq!(handle.id(), copy.id());
        assert_eq!(handle.refcount(), 2);
        drop(copy);
        assert_eq!(handle.refcount(), 1);
        let id = handle.id();
        drop(handle);
        assert!(!Handle::invalid().is_valid_user_id());
        assert!(Handle::try_new(id).is_err());
    }

    #[test]
    pub fn test_invalid_handle() {
        assert_err!(Handle::try_new(H5I_INVALID_HID), "Invalid handle id");
        assert_eq!(Handle::invalid().id_type(), H5I_BADID);
        assert_eq!(Handle::invalid().refcount(), 0);
    }
}
