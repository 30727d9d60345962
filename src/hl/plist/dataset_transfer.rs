//! Raw data transfer properties.

use std::panic;
use std::ptr;

use hdf5_sys::h5p::{H5Pcreate, H5Pset_vlen_mem_manager};

use crate::globals::H5P_CLS_DATASET_XFER;
use crate::internal_prelude::*;

/// Raw data transfer properties (the library's "data transfer" class).
#[repr(transparent)]
#[derive(Clone)]
pub struct DatasetTransfer(Handle);

impl_class!(DatasetTransfer: "dataset transfer property list", [H5I_GENPROP_LST] => PropertyList {
    fn validate(&self) -> Result<()> {
        ensure!(
            self.is_class(PropertyListClass::DataTransfer),
            "expected dataset transfer property list, got {:?}",
            self.class()
        );
        Ok(())
    }
});

impl DatasetTransfer {
    pub fn try_new() -> Result<Self> {
        Self::from_id(h5try!(H5Pcreate(*H5P_CLS_DATASET_XFER)))
    }

    /// Transfer list whose variable-length reads allocate with `libc::malloc`, so the
    /// results can be released with `libc::free`.
    pub fn with_libc_vlen_manager() -> Result<Self> {
        let plist = Self::try_new()?;
        plist.set_vlen_manager_libc()?;
        Ok(plist)
    }

    pub fn set_vlen_manager_libc(&self) -> Result<()> {
        extern "C" fn alloc(size: size_t, _info: *mut c_void) -> *mut c_void {
            panic::catch_unwind(|| unsafe { libc::malloc(size) }).unwrap_or(ptr::null_mut())
        }
        extern "C" fn free(ptr: *mut c_void, _info: *mut c_void) {
            let _p = panic::catch_unwind(|| unsafe {
                libc::free(ptr);
            });
        }
        h5try!(H5Pset_vlen_mem_manager(
            self.id(),
            Some(alloc),
            ptr::null_mut(),
            Some(free),
            ptr::null_mut()
        ));
        Ok(())
    }
}

#[cfg(test)]
pub mod tests {
    use crate::internal_prelude::*;

    #[test]
    pub fn test_class() {
        let dxpl = DatasetTransfer::try_new().unwrap();
        assert_eq!(dxpl.class().unwrap(), PropertyListClass::DataTransfer);
        assert_eq!(dxpl.class().unwrap().to_string(), "data transfer");
        let dxpl = DatasetTransfer::with_libc_vlen_manager().unwrap();
        assert!(dxpl.is_valid());
        assert_eq!(format!("{dxpl:?}"), "<HDF5 dataset transfer property list>");
    }
}
