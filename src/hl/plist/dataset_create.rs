//! Dataset creation properties.

use std::ptr;

use hdf5_sys::h5d::H5D_layout_t;
use hdf5_sys::h5p::{
    H5Pall_filters_avail, H5Pcreate, H5Pget_chunk, H5Pget_layout, H5Pset_chunk, H5Pset_layout,
};
use hdf5_sys::h5z::H5Z_filter_t;

use crate::globals::H5P_CLS_DATASET_CREATE;
use crate::hl::filters::{Availability, Filter};
use crate::internal_prelude::*;

/// Dataset creation properties.
#[repr(transparent)]
#[derive(Clone)]
pub struct DatasetCreate(Handle);

impl_class!(DatasetCreate: "dataset creation property list", [H5I_GENPROP_LST] => PropertyList {
    fn validate(&self) -> Result<()> {
        ensure!(
            self.is_class(PropertyListClass::DatasetCreate),
            "expected dataset creation property list, got {:?}",
            self.class()
        );
        Ok(())
    }

    fn short_repr(&self) -> Option<String> {
        let filters = self.filters().iter().map(ToString::to_string).collect::<Vec<_>>();
        Some(match self.chunk() {
            Some(chunk) => format!("chunked {:?}, filters [{}]", chunk, filters.join(", ")),
            None => format!("{:?}", self.layout()).to_lowercase(),
        })
    }
});

impl PartialEq for DatasetCreate {
    fn eq(&self, other: &Self) -> bool {
        <PropertyList as PartialEq>::eq(self, other)
    }
}

impl Eq for DatasetCreate {}

/// How the raw data of a dataset is stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    Compact,
    Contiguous,
    /// Stored in separate chunks; required for any filter.
    Chunked,
}

impl Default for Layout {
    fn default() -> Self {
        Self::Contiguous
    }
}

impl From<H5D_layout_t> for Layout {
    fn from(layout: H5D_layout_t) -> Self {
        match layout {
            H5D_layout_t::H5D_COMPACT => Self::Compact,
            H5D_layout_t::H5D_CHUNKED => Self::Chunked,
            _ => Self::Contiguous,
        }
    }
}

impl From<Layout> for H5D_layout_t {
    fn from(layout: Layout) -> Self {
        match layout {
            Layout::Compact => Self::H5D_COMPACT,
            Layout::Chunked => Self::H5D_CHUNKED,
            Layout::Contiguous => Self::H5D_CONTIGUOUS,
        }
    }
}

impl DatasetCreate {
    pub fn try_new() -> Result<Self> {
        Self::from_id(h5try!(H5Pcreate(*H5P_CLS_DATASET_CREATE)))
    }

    pub fn copy(&self) -> Self {
        unsafe { PropertyList::copy(self).cast_unchecked() }
    }

    /// Sets chunk dimensions, which also switches the layout to chunked.
    pub fn set_chunk(&self, chunk: &[Ix]) -> Result<()> {
        ensure!(!chunk.is_empty(), "chunk dimensions must not be empty");
        ensure!(chunk.iter().all(|&c| c > 0), "chunk dimensions must be positive: {:?}", chunk);
        let dims: Vec<hsize_t> = chunk.iter().map(|&x| x as _).collect();
        h5try!(H5Pset_chunk(self.id(), dims.len() as _, dims.as_ptr()));
        Ok(())
    }

    pub fn set_layout(&self, layout: Layout) -> Result<()> {
        h5try!(H5Pset_layout(self.id(), layout.into()));
        Ok(())
    }

    /// Registers a filter; see [`Filter::apply`].
    pub fn add_filter(&self, filter: &Filter, availability: Availability) -> Result<()> {
        filter.apply(self, availability)
    }

    #[doc(hidden)]
    pub fn get_chunk(&self) -> Result<Option<Vec<Ix>>> {
        if self.get_layout()? == Layout::Chunked {
            let ndims = h5try!(H5Pget_chunk(self.id(), 0, ptr::null_mut()));
            let mut buf: Vec<hsize_t> = vec![0; ndims as usize];
            h5try!(H5Pget_chunk(self.id(), ndims, buf.as_mut_ptr()));
            Ok(Some(buf.into_iter().map(|x| x as _).collect()))
        } else {
            Ok(None)
        }
    }

    /// Chunk dimensions, or `None` if the layout is not chunked.
    pub fn chunk(&self) -> Option<Vec<Ix>> {
        self.get_chunk().unwrap_or_default()
    }

    #[doc(hidden)]
    pub fn get_layout(&self) -> Result<Layout> {
        let layout = h5lock!(H5Pget_layout(self.id()));
        h5check(layout as c_int)?;
        Ok(layout.into())
    }

    pub fn layout(&self) -> Layout {
        self.get_layout().unwrap_or_default()
    }

    #[doc(hidden)]
    pub fn get_pipeline(&self) -> Result<Vec<(Filter, Availability)>> {
        Filter::extract_pipeline(self.id())
    }

    /// Registered filters in pipeline order, along with their availability flags.
    pub fn pipeline(&self) -> Vec<(Filter, Availability)> {
        self.get_pipeline().unwrap_or_default()
    }

    pub fn filters(&self) -> Vec<Filter> {
        self.pipeline().into_iter().map(|(filter, _)| filter).collect()
    }

    pub fn has_filter(&self, filter_id: H5Z_filter_t) -> bool {
        self.filters().iter().any(|f| f.id() == filter_id)
    }

    /// `false` if any registered filter is missing from the library.
    pub fn all_filters_available(&self) -> bool {
        h5lock!(H5Pall_filters_avail(self.id())) > 0
    }
}

#[cfg(test)]
pub mod tests {
    use crate::hl::filters::{Availability, Filter};
    use crate::internal_prelude::*;

    use super::Layout;

    #[test]
    pub fn test_defaults() {
        let dcpl = DatasetCreate::try_new().unwrap();
        assert_eq!(dcpl.layout(), Layout::Contiguous);
        assert_eq!(dcpl.chunk(), None);
        assert!(dcpl.filters().is_empty());
        assert!(dcpl.all_filters_available());
        assert_eq!(dcpl.class().unwrap(), PropertyListClass::DatasetCreate);
    }

    #[test]
    pub fn test_chunk() {
        let dcpl = DatasetCreate::try_new().unwrap();
        dcpl.set_chunk(&[3, 4]).unwrap();
        assert_eq!(dcpl.layout(), Layout::Chunked);
        assert_eq!(dcpl.chunk(), Some(vec![3, 4]));
        assert_err!(dcpl.set_chunk(&[]), "chunk dimensions must not be empty");
        assert_err!(dcpl.set_chunk(&[0, 1]), "chunk dimensions must be positive");
        dcpl.set_layout(Layout::Compact).unwrap();
        assert_eq!(dcpl.chunk(), None);
    }

    #[test]
    pub fn test_filters_and_copy() {
        let dcpl = DatasetCreate::try_new().unwrap();
        dcpl.add_filter(&Filter::deflate(5), Availability::Optional).unwrap();
        dcpl.add_filter(&Filter::fletcher32(), Availability::Mandatory).unwrap();
        assert!(dcpl.has_filter(Filter::Fletcher32.id()));
        assert!(!dcpl.has_filter(Filter::NBit.id()));
        let copy = dcpl.copy();
        assert_eq!(copy.filters(), dcpl.filters());
        assert_eq!(copy, dcpl);
        assert_ne!(copy.id(), dcpl.id());
    }

    #[test]
    pub fn test_validate_class() {
        let dxpl = DatasetTransfer::try_new().unwrap();
        let plist: PropertyList = (*dxpl).clone();
        assert_err!(plist.cast::<DatasetCreate>(), "expected dataset creation property list");
    }
}
