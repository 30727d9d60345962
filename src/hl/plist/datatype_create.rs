//! Datatype creation properties, used when committing a named datatype.

use hdf5_sys::h5p::H5Pcreate;

use crate::globals::H5P_CLS_DATATYPE_CREATE;
use crate::internal_prelude::*;

#[repr(transparent)]
#[derive(Clone)]
pub struct DatatypeCreate(Handle);

impl_class!(DatatypeCreate: "datatype creation property list", [H5I_GENPROP_LST] => PropertyList {
    fn validate(&self) -> Result<()> {
        ensure!(
            self.is_class(PropertyListClass::DatatypeCreate),
            "expected datatype creation property list, got {:?}",
            self.class()
        );
        Ok(())
    }
});

impl DatatypeCreate {
    pub fn try_new() -> Result<Self> {
        Self::from_id(h5try!(H5Pcreate(*H5P_CLS_DATATYPE_CREATE)))
    }
}

#[cfg(test)]
pub mod tests {
    use crate::internal_prelude::*;

    #[test]
    pub fn test_class() {
        let tcpl = DatatypeCreate::try_new().unwrap();
        assert_eq!(tcpl.class().unwrap(), PropertyListClass::DatatypeCreate);
        assert!(tcpl.is_class(PropertyListClass::DatatypeCreate));
        assert!(!tcpl.is_class(PropertyListClass::DatasetCreate));
    }
}
