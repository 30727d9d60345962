#![allow(dead_code)]

use hdf5_sys::h5i::hid_t;

/// An id the library exports as a global variable.
///
/// The variables only hold valid ids once the library has been opened, so every read goes
/// through the library initialization first.
pub struct LibraryId(
    #[cfg(msvc_dll_indirection)] &'static usize,
    #[cfg(not(msvc_dll_indirection))] &'static hid_t,
);

impl std::ops::Deref for LibraryId {
    type Target = hid_t;

    fn deref(&self) -> &hid_t {
        lazy_static::initialize(&crate::sync::LIBRARY_INIT);
        cfg_if::cfg_if! {
            if #[cfg(msvc_dll_indirection)] {
                // the DLL exports a pointer to the variable rather than the variable itself
                let slot: *const *const hid_t = (self.0 as *const usize).cast();
                unsafe { &**slot }
            } else {
                self.0
            }
        }
    }
}

macro_rules! library_ids {
    ($($module:ident: [$($name:ident),+ $(,)?];)+) => {
        $($(pub static $name: LibraryId = LibraryId(hdf5_sys::$module::$name);)+)+
    };
}

library_ids! {
    h5t: [
        H5T_IEEE_F32BE, H5T_IEEE_F32LE, H5T_IEEE_F64BE, H5T_IEEE_F64LE,
        H5T_STD_I8BE, H5T_STD_I8LE, H5T_STD_I16BE, H5T_STD_I16LE,
        H5T_STD_I32BE, H5T_STD_I32LE, H5T_STD_I64BE, H5T_STD_I64LE,
        H5T_STD_U8BE, H5T_STD_U8LE, H5T_STD_U16BE, H5T_STD_U16LE,
        H5T_STD_U32BE, H5T_STD_U32LE, H5T_STD_U64BE, H5T_STD_U64LE,
        H5T_NATIVE_INT8, H5T_C_S1,
    ];
    h5p: [
        H5P_CLS_ROOT, H5P_CLS_OBJECT_CREATE, H5P_CLS_OBJECT_COPY,
        H5P_CLS_FILE_CREATE, H5P_CLS_FILE_ACCESS, H5P_CLS_FILE_MOUNT,
        H5P_CLS_GROUP_CREATE, H5P_CLS_GROUP_ACCESS,
        H5P_CLS_DATASET_CREATE, H5P_CLS_DATASET_ACCESS, H5P_CLS_DATASET_XFER,
        H5P_CLS_DATATYPE_CREATE, H5P_CLS_DATATYPE_ACCESS,
        H5P_CLS_STRING_CREATE, H5P_CLS_ATTRIBUTE_CREATE,
        H5P_CLS_LINK_CREATE, H5P_CLS_LINK_ACCESS,
    ];
    h5e: [H5E_CANTOPENOBJ];
}
