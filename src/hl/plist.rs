use std::fmt::{self, Display};
use std::panic;
use std::ptr;
use std::str::FromStr;

use hdf5_sys::h5p::{
    H5Pclose_class, H5Pcopy, H5Pequal, H5Pexist, H5Pget_class, H5Pget_class_name, H5Pget_nprops,
    H5Pisa_class, H5Piterate,
};

use crate::internal_prelude::*;

pub mod dataset_create;
pub mod dataset_transfer;
pub mod datatype_create;
pub mod link_create;

/// Generic property list of any class.
#[repr(transparent)]
#[derive(Clone)]
pub struct PropertyList(Handle);

impl_class!(PropertyList: "property list", [H5I_GENPROP_LST] => Object {
    fn short_repr(&self) -> Option<String> {
        let class = self.class().map_or("unknown class", PropertyListClass::name);
        Some(class.to_owned())
    }
});

impl PartialEq for PropertyList {
    fn eq(&self, other: &Self) -> bool {
        h5call!(H5Pequal(self.id(), other.id())).map_or(false, |equal| equal > 0)
    }
}

impl Eq for PropertyList {}

macro_rules! plist_classes {
    ($($(#[$meta:meta])* $variant:ident => $name:literal, $class_id:ident;)+) => {
        /// Property list class, named the way the library names it.
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        pub enum PropertyListClass {
            $($(#[$meta])* $variant,)+
        }

        impl PropertyListClass {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Class name as reported by the library, e.g. `"dataset create"`.
            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }

            fn class_id(self) -> hid_t {
                match self {
                    $(Self::$variant => *crate::globals::$class_id,)+
                }
            }
        }
    };
}

plist_classes! {
    AttributeCreate => "attribute create", H5P_CLS_ATTRIBUTE_CREATE;
    DatasetAccess => "dataset access", H5P_CLS_DATASET_ACCESS;
    DatasetCreate => "dataset create", H5P_CLS_DATASET_CREATE;
    /// Raw data transfer; the library calls this class "data transfer".
    DataTransfer => "data transfer", H5P_CLS_DATASET_XFER;
    DatatypeAccess => "datatype access", H5P_CLS_DATATYPE_ACCESS;
    DatatypeCreate => "datatype create", H5P_CLS_DATATYPE_CREATE;
    FileAccess => "file access", H5P_CLS_FILE_ACCESS;
    FileCreate => "file create", H5P_CLS_FILE_CREATE;
    FileMount => "file mount", H5P_CLS_FILE_MOUNT;
    GroupAccess => "group access", H5P_CLS_GROUP_ACCESS;
    GroupCreate => "group create", H5P_CLS_GROUP_CREATE;
    LinkAccess => "link access", H5P_CLS_LINK_ACCESS;
    LinkCreate => "link create", H5P_CLS_LINK_CREATE;
    ObjectCopy => "object copy", H5P_CLS_OBJECT_COPY;
    ObjectCreate => "object create", H5P_CLS_OBJECT_CREATE;
    StringCreate => "string create", H5P_CLS_STRING_CREATE;
}

impl Display for PropertyListClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<PropertyListClass> for String {
    fn from(class: PropertyListClass) -> Self {
        class.name().to_owned()
    }
}

impl FromStr for PropertyListClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match Self::ALL.iter().find(|class| class.name() == s) {
            Some(&class) => Ok(class),
            None => fail!("invalid property list class: {}", s),
        }
    }
}

extern "C" fn collect_property(_: hid_t, name: *const c_char, data: *mut c_void) -> herr_t {
    let names = unsafe { &mut *data.cast::<Vec<String>>() };
    let pushed = panic::catch_unwind(panic::AssertUnwindSafe(|| {
        let name = string_from_cstr(name);
        if !name.is_empty() {
            names.push(name);
        }
    }));
    if pushed.is_ok() {
        0
    } else {
        -1
    }
}

#[allow(clippy::len_without_is_empty)]
impl PropertyList {
    /// Independent copy with the same class and values.
    pub fn copy(&self) -> Self {
        Self::from_id(h5lock!(H5Pcopy(self.id()))).unwrap_or_else(|_| Self::invalid())
    }

    /// Whether the list holds a property named `property`.
    pub fn has(&self, property: &str) -> bool {
        let property = match to_cstring(property) {
            Ok(property) => property,
            Err(_) => return false,
        };
        h5call!(H5Pexist(self.id(), property.as_ptr())).map_or(false, |exists| exists > 0)
    }

    /// Names of all properties in the list, in iteration order.
    pub fn properties(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        let data = (&mut names as *mut Vec<String>).cast();
        h5lock!(H5Piterate(self.id(), ptr::null_mut(), Some(collect_property), data));
        names
    }

    /// Number of properties in the list.
    pub fn len(&self) -> usize {
        h5get_d!(H5Pget_nprops(self.id()): size_t)
    }

    pub fn class(&self) -> Result<PropertyListClass> {
        let name = h5lock!({
            let class_id = h5try!(H5Pget_class(self.id()));
            let buf = H5Pget_class_name(class_id);
            H5Pclose_class(class_id);
            if buf.is_null() {
                return Err(Error::query().unwrap_or_else(|err| err));
            }
            let name = string_from_cstr(buf);
            h5_free_memory(buf.cast());
            Ok(name)
        })?;
        name.parse()
    }

    pub fn is_class(&self, class: PropertyListClass) -> bool {
        h5lock!(H5Pisa_class(self.id(), class.class_id())) > 0
    }
}

#[cfg(test)]
pub mod tests {
    use hdf5_sys::h5i::H5Inmembers;
    use hdf5_sys::h5p::H5Pcreate;

    use crate::globals::{H5P_CLS_DATASET_CREATE, H5P_CLS_DATASET_XFER};
    use crate::internal_prelude::*;

    use super::{PropertyList, PropertyListClass};

    fn make_plists() -> (PropertyList, PropertyList) {
        let dcpl = PropertyList::from_id(h5call!(H5Pcreate(*H5P_CLS_DATASET_CREATE)).unwrap()).unwrap();
        let dxpl = PropertyList::from_id(h5call!(H5Pcreate(*H5P_CLS_DATASET_XFER)).unwrap()).unwrap();
        (dcpl, dxpl)
    }

    #[test]
    pub fn test_class() {
        let (dcpl, dxpl) = make_plists();
        assert_eq!(dcpl.class().unwrap(), PropertyListClass::DatasetCreate);
        assert_eq!(dxpl.class().unwrap(), PropertyListClass::DataTransfer);
        assert!(dcpl.is_class(PropertyListClass::DatasetCreate));
        assert!(!dcpl.is_class(PropertyListClass::DataTransfer));
    }

    #[test]
    pub fn test_class_names() {
        for s in ["dataset create", "data transfer", "datatype create", "link create"] {
            assert_eq!(s.parse::<PropertyListClass>().unwrap().to_string(), s);
        }
        assert_err!("foo".parse::<PropertyListClass>(), "invalid property list class: foo");
    }

    #[test]
    pub fn test_properties() {
        let (dcpl, dxpl) = make_plists();
        assert!(dcpl.len() > 1);
        assert_eq!(dcpl.properties().len(), dcpl.len());
        assert_ne!(dcpl.len(), dxpl.len());
        assert!(!dcpl.has("no such property"));
    }

    #[test]
    pub fn test_copy_and_eq() {
        let (dcpl, dxpl) = make_plists();
        let copy = dcpl.copy();
        assert_eq!(dcpl, copy);
        assert_ne!(dcpl.id(), copy.id());
        assert_eq!(copy.refcount(), 1);
        assert_ne!(dcpl, dxpl);
    }

    #[test]
    pub fn test_debug() {
        let (dcpl, dxpl) = make_plists();
        assert_eq!(format!("{dcpl:?}"), "<HDF5 property list: dataset create>");
        assert_eq!(format!("{dxpl:?}"), "<HDF5 property list: data transfer>");
    }

    #[test]
    pub fn test_class_query_releases_class_id() {
        let (dcpl, _) = make_plists();
        h5lock!({
            let open_classes = || h5get!(H5Inmembers(H5I_GENPROP_CLS): hsize_t).unwrap();
            let before = open_classes();
            for _ in 0..3 {
                assert_eq!(dcpl.class().unwrap(), PropertyListClass::DatasetCreate);
            }
            assert_eq!(open_classes(), before);
        });
    }
}
