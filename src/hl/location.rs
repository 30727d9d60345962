use std::mem::MaybeUninit;

use hdf5_sys::h5f::H5Fget_name;
use hdf5_sys::h5i::{H5Iget_file_id, H5Iget_name};
use hdf5_sys::h5o::H5O_type_t;

use crate::internal_prelude::*;

/// Named location (file, group, dataset, named datatype).
#[repr(transparent)]
#[derive(Clone)]
pub struct Location(Handle);

impl_class!(Location: "location", [H5I_FILE, H5I_GROUP, H5I_DATATYPE, H5I_DATASET] => Object {
    fn short_repr(&self) -> Option<String> {
        Some(format!("\"{}\"", self.name()))
    }
});

impl Location {
    /// Absolute name of the object within the file, or an empty string for anonymous
    /// objects such as transient datatypes.
    pub fn name(&self) -> String {
        h5lock!(get_h5_str(|m, s| H5Iget_name(self.id(), m, s)).unwrap_or_default())
    }

    /// Same as [`name`](Self::name), parsed into a [`Path`].
    pub fn path(&self) -> Path {
        Path::parse(&self.name())
    }

    /// Name of the file containing the object (or the file itself).
    pub fn filename(&self) -> String {
        h5lock!(get_h5_str(|m, s| H5Fget_name(self.id(), m, s)).unwrap_or_default())
    }

    /// A handle to the file containing the object (or the file itself).
    pub fn file(&self) -> Result<File> {
        File::from_id(h5try!(H5Iget_file_id(self.id())))
    }

    pub fn loc_info(&self) -> Result<LocationInfo> {
        LocationInfo::query(|info| unsafe { get_info(self.id(), info) })
    }

    pub fn loc_type(&self) -> Result<LocationType> {
        Ok(self.loc_info()?.loc_type)
    }

    pub fn loc_info_by_name(&self, name: &str) -> Result<LocationInfo> {
        let name = to_cstring(name)?;
        LocationInfo::query(|info| unsafe { get_info_by_name(self.id(), name.as_ptr(), info) })
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "1.12.0")] {
        use hdf5_sys::h5o::{H5O_info2_t as RawInfo, H5O_token_t as RawToken, H5O_INFO_BASIC};
        use hdf5_sys::h5o::{H5Oget_info3, H5Oget_info_by_name3};

        unsafe fn get_info(id: hid_t, info: *mut RawInfo) -> herr_t {
            H5Oget_info3(id, info, H5O_INFO_BASIC)
        }

        unsafe fn get_info_by_name(id: hid_t, name: *const c_char, info: *mut RawInfo) -> herr_t {
            H5Oget_info_by_name3(id, name, info, H5O_INFO_BASIC, H5P_DEFAULT)
        }

        fn raw_token(info: &RawInfo) -> RawToken {
            info.token
        }
    } else if #[cfg(feature = "1.10.3")] {
        use hdf5_sys::h5::haddr_t as RawToken;
        use hdf5_sys::h5o::{H5O_info1_t as RawInfo, H5O_INFO_BASIC};
        use hdf5_sys::h5o::{H5Oget_info2, H5Oget_info_by_name2};

        unsafe fn get_info(id: hid_t, info: *mut RawInfo) -> herr_t {
            H5Oget_info2(id, info, H5O_INFO_BASIC)
        }

        unsafe fn get_info_by_name(id: hid_t, name: *const c_char, info: *mut RawInfo) -> herr_t {
            H5Oget_info_by_name2(id, name, info, H5O_INFO_BASIC, H5P_DEFAULT)
        }

        fn raw_token(info: &RawInfo) -> RawToken {
            info.addr
        }
    } else {
        use hdf5_sys::h5::haddr_t as RawToken;
        use hdf5_sys::h5o::H5O_info1_t as RawInfo;
        use hdf5_sys::h5o::{H5Oget_info1, H5Oget_info_by_name1};

        unsafe fn get_info(id: hid_t, info: *mut RawInfo) -> herr_t {
            H5Oget_info1(id, info)
        }

        unsafe fn get_info_by_name(id: hid_t, name: *const c_char, info: *mut RawInfo) -> herr_t {
            H5Oget_info_by_name1(id, name, info, H5P_DEFAULT)
        }

        fn raw_token(info: &RawInfo) -> RawToken {
            info.addr
        }
    }
}

/// Where an object lives inside its file: an address, or an opaque token on 1.12+.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocationToken(RawToken);

/// Kind of object stored at a location.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocationType {
    Group,
    Dataset,
    NamedDatatype,
    #[cfg(feature = "1.12.0")]
    TypeMap,
}

impl From<H5O_type_t> for LocationType {
    fn from(kind: H5O_type_t) -> Self {
        match kind {
            H5O_type_t::H5O_TYPE_DATASET => Self::Dataset,
            H5O_type_t::H5O_TYPE_NAMED_DATATYPE => Self::NamedDatatype,
            #[cfg(feature = "1.12.0")]
            H5O_type_t::H5O_TYPE_MAP => Self::TypeMap,
            // unknown types are only reported alongside a failed call
            _ => Self::Group,
        }
    }
}

/// Basic metadata of a [`Location`]; `(fileno, token)` identifies the object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocationInfo {
    pub fileno: u64,
    pub token: LocationToken,
    pub loc_type: LocationType,
    /// Hard links pointing at the object.
    pub num_links: usize,
}

impl LocationInfo {
    fn query<F>(get: F) -> Result<Self>
    where
        F: FnOnce(*mut RawInfo) -> herr_t,
    {
        let mut raw = MaybeUninit::<RawInfo>::uninit();
        h5call!(get(raw.as_mut_ptr()))?;
        let raw = unsafe { raw.assume_init() };
        Ok(Self {
            fileno: raw.fileno as _,
            token: LocationToken(raw_token(&raw)),
            loc_type: raw.type_.into(),
            num_links: raw.rc as _,
        })
    }
}

#[cfg(test)]
pub mod tests {
    use crate::internal_prelude::*;

    #[test]
    pub fn test_filename() {
        with_tmp_path(|path| {
            assert_eq!(File::create(&path).unwrap().filename(), path.to_str().unwrap());
        })
    }

    #[test]
    pub fn test_name_and_path() {
        with_tmp_file(|file| {
            assert_eq!(file.name(), "/");
            assert!(file.path().is_root());
            let group = file.create_group("a/b").unwrap();
            assert_eq!(group.name(), "/a/b");
            assert_eq!(group.path(), Path::from("/a/b"));
        })
    }

    #[test]
    pub fn test_file() {
        with_tmp_file(|file| {
            assert_eq!(file.file().unwrap().id(), file.id());
        })
    }

    #[test]
    pub fn test_location_info() {
        with_tmp_file(|file| {
            let group = file.create_group("group").unwrap();
            let info = group.loc_info().unwrap();
            assert_eq!(info.num_links, 1);
            assert_eq!(info.loc_type, LocationType::Group);
            assert_eq!(file.loc_info_by_name("group").unwrap(), info);
            group.new_dataset::<i32>().create("data").unwrap();
            group.link_hard("data", "data2").unwrap();
            let info = file.loc_info_by_name("group/data").unwrap();
            assert_eq!(info.loc_type, LocationType::Dataset);
            assert_eq!(info.num_links, 2);
            assert_eq!(info.token, group.loc_info_by_name("data2").unwrap().token);
        })
    }
}
