//! Link creation properties.

use hdf5_sys::h5p::{H5Pcreate, H5Pget_char_encoding, H5Pset_char_encoding};
use hdf5_sys::h5p::{H5Pget_create_intermediate_group, H5Pset_create_intermediate_group};
use hdf5_sys::h5t::H5T_cset_t;

use crate::globals::H5P_CLS_LINK_CREATE;
use crate::internal_prelude::*;

/// Properties applied when a link is created: missing parents and name encoding.
#[repr(transparent)]
#[derive(Clone)]
pub struct LinkCreate(Handle);

impl_class!(LinkCreate: "link create property list", [H5I_GENPROP_LST] => PropertyList {
    fn validate(&self) -> Result<()> {
        ensure!(
            self.is_class(PropertyListClass::LinkCreate),
            "expected link create property list, got {:?}",
            self.class()
        );
        Ok(())
    }

    fn short_repr(&self) -> Option<String> {
        let mut repr = format!("{:?}", self.char_encoding());
        if self.create_intermediate_group() {
            repr.push_str(", with parents");
        }
        Some(repr)
    }
});

/// Character set of link names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharEncoding {
    Ascii,
    Utf8,
}

impl From<CharEncoding> for H5T_cset_t {
    fn from(encoding: CharEncoding) -> Self {
        match encoding {
            CharEncoding::Ascii => Self::H5T_CSET_ASCII,
            CharEncoding::Utf8 => Self::H5T_CSET_UTF8,
        }
    }
}

impl LinkCreate {
    pub fn try_new() -> Result<Self> {
        Self::from_id(h5try!(H5Pcreate(*H5P_CLS_LINK_CREATE)))
    }

    /// Creates missing groups along the way and stores names as UTF-8.
    pub(crate) fn intermediate() -> Result<Self> {
        let lcpl = Self::try_new()?;
        lcpl.set_create_intermediate_group(true)?;
        lcpl.set_char_encoding(CharEncoding::Utf8)?;
        Ok(lcpl)
    }

    pub fn set_create_intermediate_group(&self, create: bool) -> Result<()> {
        h5call!(H5Pset_create_intermediate_group(self.id(), create.into())).map(drop)
    }

    pub fn set_char_encoding(&self, encoding: CharEncoding) -> Result<()> {
        h5call!(H5Pset_char_encoding(self.id(), encoding.into())).map(drop)
    }

    #[doc(hidden)]
    pub fn get_create_intermediate_group(&self) -> Result<bool> {
        h5get!(H5Pget_create_intermediate_group(self.id()): c_uint).map(|create| create > 0)
    }

    pub fn create_intermediate_group(&self) -> bool {
        self.get_create_intermediate_group().unwrap_or(false)
    }

    #[doc(hidden)]
    pub fn get_char_encoding(&self) -> Result<CharEncoding> {
        match h5get!(H5Pget_char_encoding(self.id()): H5T_cset_t)? {
            H5T_cset_t::H5T_CSET_ASCII => Ok(CharEncoding::Ascii),
            H5T_cset_t::H5T_CSET_UTF8 => Ok(CharEncoding::Utf8),
            other => fail!("Unknown char encoding: {:?}", other),
        }
    }

    pub fn char_encoding(&self) -> CharEncoding {
        self.get_char_encoding().unwrap_or(CharEncoding::Ascii)
    }
}
