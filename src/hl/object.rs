use crate::internal_prelude::*;

/// Any library object that can be referenced through an identifier.
#[repr(transparent)]
#[derive(Clone)]
pub struct Object(Handle);

impl_class!(Object: "object", []);

impl Object {
    pub fn id(&self) -> hid_t {
        self.0.id()
    }

    /// Reference count if the handle is valid, 0 otherwise.
    pub fn refcount(&self) -> u32 {
        self.handle().refcount()
    }

    /// `false` once closed, and for locked library ids like property list classes.
    pub fn is_valid(&self) -> bool {
        self.handle().is_valid_user_id()
    }

    pub fn id_type(&self) -> H5I_type_t {
        self.handle().id_type()
    }
}

macro_rules! impl_downcast {
    ($func:ident, $tp:ty) => {
        impl Object {
            #[doc = concat!("Downcast the object into `", stringify!($tp), "` if possible.")]
            pub fn $func(&self) -> Result<$tp> {
                self.clone().cast()
            }
        }
    };
}

impl_downcast!(as_file, File);
impl_downcast!(as_group, Group);
impl_downcast!(as_dataset, Dataset);
impl_downcast!(as_location, Location);
impl_downcast!(as_datatype, Datatype);
impl_downcast!(as_dataspace, Dataspace);
impl_downcast!(as_plist, PropertyList);
impl_downcast!(as_node, Node);

#[cfg(test)]
pub mod tests {
    use hdf5_sys::h5p::H5Pcreate;

    use crate::globals::H5P_CLS_DATASET_XFER;
    use crate::internal_prelude::*;

    #[repr(transparent)]
    pub struct TestObject(Handle);

    impl_class!(TestObject: "test object", [] => Object);

    #[test]
    pub fn test_not_a_valid_user_id() {
        assert_err!(TestObject::from_id(H5I_INVALID_HID), "Invalid handle id");
        assert_err!(TestObject::from_id(H5P_DEFAULT), "Invalid handle id");
    }

    #[test]
    pub fn test_new_user_id() {
        let obj = TestObject::from_id(h5call!(H5Pcreate(*H5P_CLS_DATASET_XFER)).unwrap()).unwrap();
        assert!(obj.id() > 0);
        assert!(obj.is_valid());
        assert_eq!(obj.id_type(), H5I_GENPROP_LST);
        assert_eq!(obj.refcount(), 1);
        let copy = TestObject::from_handle(obj.handle().clone());
        assert_eq!(obj.refcount(), 2);
        drop(copy);
        assert_eq!(obj.refcount(), 1);
    }

    #[test]
    pub fn test_downcast_checks_kind() {
        let obj = TestObject::from_id(h5call!(H5Pcreate(*H5P_CLS_DATASET_XFER)).unwrap()).unwrap();
        let obj: &Object = &obj;
        assert!(obj.as_plist().is_ok());
        assert_err!(obj.as_group(), "unable to cast");
        assert_err!(obj.as_node(), "unable to cast");
    }

    #[test]
    pub fn test_debug_repr() {
        let obj = TestObject::from_id(h5call!(H5Pcreate(*H5P_CLS_DATASET_XFER)).unwrap()).unwrap();
        let obj: Object = Object::clone(&obj);
        assert_eq!(format!("{obj:?}"), "<HDF5 object>");
        assert_eq!(format!("{:?}", Object::invalid()), "<HDF5 object: invalid id>");
    }
}
