use std::ptr;

use hdf5_sys::h5s::{H5S_class_t, H5Scopy, H5Screate, H5Screate_simple};
use hdf5_sys::h5s::{H5Sget_simple_extent_dims, H5Sget_simple_extent_ndims, H5Sget_simple_extent_type};

use crate::internal_prelude::*;

/// Shape descriptor of a dataset or of an in-memory buffer.
#[repr(transparent)]
#[derive(Clone)]
pub struct Dataspace(Handle);

impl_class!(Dataspace: "dataspace", [H5I_DATASPACE] => Object {
    fn short_repr(&self) -> Option<String> {
        Some(self.extents().map_or_else(|_| "(invalid)".into(), |e| e.to_string()))
    }
});

/// Current dimensions of a simple dataspace.
pub(crate) unsafe fn get_shape(space_id: hid_t) -> Result<Vec<Ix>> {
    let rank = h5check(H5Sget_simple_extent_ndims(space_id))?;
    let mut dims: Vec<hsize_t> = vec![0; rank as usize];
    h5check(H5Sget_simple_extent_dims(space_id, dims.as_mut_ptr(), ptr::null_mut()))?;
    Ok(dims.iter().map(|&dim| dim as Ix).collect())
}

impl Dataspace {
    /// Creates a dataspace; simple extents are fixed, with maximum dims equal to current ones.
    pub fn try_new<T: Into<Extents>>(extents: T) -> Result<Self> {
        let id = match extents.into() {
            Extents::Null => h5try!(H5Screate(H5S_class_t::H5S_NULL)),
            Extents::Scalar => h5try!(H5Screate(H5S_class_t::H5S_SCALAR)),
            Extents::Simple(dims) => {
                let dims: Vec<hsize_t> = dims.into_iter().map(|dim| dim as _).collect();
                h5try!(H5Screate_simple(dims.len() as _, dims.as_ptr(), ptr::null()))
            }
        };
        Self::from_id(id)
    }

    pub fn copy(&self) -> Result<Self> {
        Self::from_id(h5try!(H5Scopy(self.id())))
    }

    fn class(&self) -> H5S_class_t {
        h5lock!(H5Sget_simple_extent_type(self.id()))
    }

    pub fn is_null(&self) -> bool {
        self.class() == H5S_class_t::H5S_NULL
    }

    pub fn is_scalar(&self) -> bool {
        self.class() == H5S_class_t::H5S_SCALAR
    }

    pub fn is_simple(&self) -> bool {
        self.class() == H5S_class_t::H5S_SIMPLE
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Current dimensions; empty for null and scalar dataspaces.
    pub fn shape(&self) -> Vec<Ix> {
        self.extents().map(|e| e.dims()).unwrap_or_default()
    }

    /// Number of elements: 1 for a scalar, 0 for null.
    pub fn size(&self) -> usize {
        self.extents().map_or(0, |e| e.size())
    }

    pub fn extents(&self) -> Result<Extents> {
        match self.class() {
            H5S_class_t::H5S_NULL => Ok(Extents::Null),
            H5S_class_t::H5S_SCALAR => Ok(Extents::Scalar),
            H5S_class_t::H5S_SIMPLE => h5lock!(get_shape(self.id())).map(Extents::Simple),
            other => fail!("Invalid extents type: {}", other as c_int),
        }
    }
}
