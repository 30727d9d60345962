use std::fmt::{self, Display};
use std::ptr::{self, addr_of_mut};

use bitflags::bitflags;

use hdf5_sys::h5p::{H5Pget_filter2, H5Pget_nfilters, H5Pset_filter};
use hdf5_sys::h5z::{
    H5Zfilter_avail, H5Zget_filter_info, H5Z_FILTER_CONFIG_DECODE_ENABLED,
    H5Z_FILTER_CONFIG_ENCODE_ENABLED, H5Z_FILTER_DEFLATE, H5Z_FILTER_FLETCHER32, H5Z_FILTER_NBIT,
    H5Z_FILTER_SCALEOFFSET, H5Z_FILTER_SHUFFLE, H5Z_FILTER_SZIP, H5Z_FLAG_MANDATORY,
    H5Z_FLAG_OPTIONAL, H5Z_SO_FLOAT_DSCALE, H5Z_SO_INT, H5_SZIP_EC_OPTION_MASK,
    H5_SZIP_MAX_PIXELS_PER_BLOCK, H5_SZIP_NN_OPTION_MASK,
};

pub use hdf5_sys::h5z::H5Z_filter_t;

use crate::internal_prelude::*;

/// Whether dataset creation may proceed without a filter the library cannot provide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Availability {
    /// Creating (or writing to) the dataset fails if the filter cannot be applied.
    Mandatory,
    /// The filter is dropped if the library cannot provide it.
    Optional,
}

impl Availability {
    /// Pipeline flag value the library stores for this availability.
    pub fn flags(self) -> c_uint {
        match self {
            Self::Mandatory => H5Z_FLAG_MANDATORY,
            Self::Optional => H5Z_FLAG_OPTIONAL,
        }
    }

    pub fn from_flags(flags: c_uint) -> Self {
        if flags & H5Z_FLAG_OPTIONAL != 0 {
            Self::Optional
        } else {
            Self::Mandatory
        }
    }
}

impl Default for Availability {
    fn default() -> Self {
        Self::Mandatory
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SZip {
    Entropy,
    NearestNeighbor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScaleOffset {
    Integer(u16),
    FloatDScale(u8),
}

/// A transform in the dataset's I/O pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Filter {
    /// Fletcher32 checksum of each chunk, verified on read.
    Fletcher32,
    NBit,
    Deflate(u8),
    Shuffle,
    ScaleOffset(ScaleOffset),
    SZip(SZip, u8),
    /// Any filter by id, with its client data values.
    User(H5Z_filter_t, Vec<c_uint>),
}

bitflags! {
    /// Directions in which the library can run a filter.
    pub struct FilterConfig: c_uint {
        const ENCODE = H5Z_FILTER_CONFIG_ENCODE_ENABLED;
        const DECODE = H5Z_FILTER_CONFIG_DECODE_ENABLED;
    }
}

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterInfo {
    pub is_available: bool,
    pub encode_enabled: bool,
    pub decode_enabled: bool,
}

/// What the library can do with the filter `filter_id`.
pub fn filter_info(filter_id: H5Z_filter_t) -> FilterInfo {
    if !h5call!(H5Zfilter_avail(filter_id)).map(|x| x > 0).unwrap_or_default() {
        return FilterInfo::default();
    }
    let mut flags: c_uint = 0;
    h5lock!(H5Zget_filter_info(filter_id, addr_of_mut!(flags)));
    let config = FilterConfig::from_bits_truncate(flags);
    FilterInfo {
        is_available: true,
        encode_enabled: config.contains(FilterConfig::ENCODE),
        decode_enabled: config.contains(FilterConfig::DECODE),
    }
}

impl Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Fletcher32 => write!(f, "fletcher32"),
            Self::NBit => write!(f, "nbit"),
            Self::Deflate(level) => write!(f, "deflate({level})"),
            Self::Shuffle => write!(f, "shuffle"),
            Self::ScaleOffset(mode) => write!(f, "scaleoffset({mode:?})"),
            Self::SZip(coding, px) => write!(f, "szip({coding:?}, {px})"),
            Self::User(id, cdata) => write!(f, "filter #{id} {cdata:?}"),
        }
    }
}

impl Filter {
    pub fn id(&self) -> H5Z_filter_t {
        match self {
            Self::Fletcher32 => H5Z_FILTER_FLETCHER32,
            Self::NBit => H5Z_FILTER_NBIT,
            Self::Deflate(_) => H5Z_FILTER_DEFLATE,
            Self::Shuffle => H5Z_FILTER_SHUFFLE,
            Self::ScaleOffset(_) => H5Z_FILTER_SCALEOFFSET,
            Self::SZip(_, _) => H5Z_FILTER_SZIP,
            Self::User(id, _) => *id,
        }
    }

    pub fn info(&self) -> FilterInfo {
        filter_info(self.id())
    }

    /// `true` if the filter is registered with the library.
    pub fn is_available(&self) -> bool {
        self.info().is_available
    }

    pub fn fletcher32() -> Self {
        Self::Fletcher32
    }

    pub fn nbit() -> Self {
        Self::NBit
    }

    pub fn deflate(level: u8) -> Self {
        Self::Deflate(level)
    }

    pub fn shuffle() -> Self {
        Self::Shuffle
    }

    pub fn scale_offset(mode: ScaleOffset) -> Self {
        Self::ScaleOffset(mode)
    }

    pub fn szip(coding: SZip, px_per_block: u8) -> Self {
        Self::SZip(coding, px_per_block)
    }

    pub fn user(id: H5Z_filter_t, cdata: &[c_uint]) -> Self {
        Self::User(id, cdata.to_vec())
    }

    /// Client data values handed to the library when the filter is registered.
    pub fn cdata(&self) -> Vec<c_uint> {
        match self {
            Self::Fletcher32 | Self::NBit | Self::Shuffle => vec![],
            Self::Deflate(level) => vec![c_uint::from(*level)],
            Self::ScaleOffset(ScaleOffset::Integer(bits)) => {
                vec![H5Z_SO_INT as c_uint, c_uint::from(*bits)]
            }
            Self::ScaleOffset(ScaleOffset::FloatDScale(factor)) => {
                vec![H5Z_SO_FLOAT_DSCALE as c_uint, c_uint::from(*factor)]
            }
            Self::SZip(coding, px_per_block) => {
                let mask = match coding {
                    SZip::Entropy => H5_SZIP_EC_OPTION_MASK,
                    SZip::NearestNeighbor => H5_SZIP_NN_OPTION_MASK,
                };
                vec![mask, c_uint::from(*px_per_block)]
            }
            Self::User(_, cdata) => cdata.clone(),
        }
    }

    fn parse_deflate(cdata: &[c_uint]) -> Result<Self> {
        ensure!(!cdata.is_empty(), "expected cdata.len() >= 1 for deflate filter");
        ensure!(cdata[0] <= 9, "invalid deflate level: {}", cdata[0]);
        Ok(Self::deflate(cdata[0] as _))
    }

    fn parse_szip(cdata: &[c_uint]) -> Result<Self> {
        ensure!(cdata.len() >= 2, "expected cdata.len() >= 2 for szip filter");
        let m = cdata[0];
        ensure!(
            (m & H5_SZIP_EC_OPTION_MASK != 0) != (m & H5_SZIP_NN_OPTION_MASK != 0),
            "invalid szip mask: {}: expected EC or NN to be set",
            m
        );
        let szip_coding =
            if m & H5_SZIP_EC_OPTION_MASK == 0 { SZip::NearestNeighbor } else { SZip::Entropy };
        let px_per_block = cdata[1];
        ensure!(
            px_per_block <= H5_SZIP_MAX_PIXELS_PER_BLOCK,
            "invalid pixels per block for szip filter: {}",
            px_per_block
        );
        Ok(Self::szip(szip_coding, px_per_block as _))
    }

    fn parse_scaleoffset(cdata: &[c_uint]) -> Result<Self> {
        ensure!(cdata.len() >= 2, "expected cdata.len() >= 2 for scaleoffset filter");
        let scale_type = cdata[0];
        let mode = if scale_type == (H5Z_SO_INT as c_uint) {
            ensure!(cdata[1] <= c_uint::from(u16::MAX), "invalid int scale-offset: {}", cdata[1]);
            ScaleOffset::Integer(cdata[1] as _)
        } else if scale_type == (H5Z_SO_FLOAT_DSCALE as c_uint) {
            ensure!(cdata[1] <= c_uint::from(u8::MAX), "invalid float scale-offset: {}", cdata[1]);
            ScaleOffset::FloatDScale(cdata[1] as _)
        } else {
            fail!("invalid scale type for scaleoffset filter: {}", cdata[0])
        };
        Ok(Self::scale_offset(mode))
    }

    /// Reconstructs a filter from its id and the client data read back from a pipeline.
    pub fn from_raw(filter_id: H5Z_filter_t, cdata: &[c_uint]) -> Result<Self> {
        ensure!(filter_id > 0, "invalid filter id: {}", filter_id);
        match filter_id {
            H5Z_FILTER_FLETCHER32 => Ok(Self::fletcher32()),
            H5Z_FILTER_NBIT => Ok(Self::nbit()),
            H5Z_FILTER_DEFLATE => Self::parse_deflate(cdata),
            H5Z_FILTER_SHUFFLE => Ok(Self::shuffle()),
            H5Z_FILTER_SCALEOFFSET => Self::parse_scaleoffset(cdata),
            H5Z_FILTER_SZIP => Self::parse_szip(cdata),
            _ => Ok(Self::user(filter_id, cdata)),
        }
    }

    /// Registers the filter in a dataset creation property list.
    ///
    /// An `Optional` filter the library does not provide is skipped and nothing is
    /// registered. A `Mandatory` filter is always registered; if the library cannot
    /// provide it, creating a dataset with this property list fails.
    pub fn apply(&self, plist: &DatasetCreate, availability: Availability) -> Result<()> {
        self.apply_to_plist(plist.id(), availability)
    }

    pub(crate) fn apply_to_plist(&self, id: hid_t, availability: Availability) -> Result<()> {
        h5lock!({
            if availability == Availability::Optional && !self.is_available() {
                return Ok(());
            }
            let cdata = self.cdata();
            let cd_values = if cdata.is_empty() { ptr::null() } else { cdata.as_ptr() };
            h5try!(H5Pset_filter(id, self.id(), availability.flags(), cdata.len() as _, cd_values));
            Ok(())
        })
    }

    pub(crate) fn extract_pipeline(plist_id: hid_t) -> Result<Vec<(Self, Availability)>> {
        let mut filters = Vec::new();
        let mut name: Vec<c_char> = vec![0; 257];
        let mut cd_values: Vec<c_uint> = vec![0; 32];
        h5lock!({
            let n_filters = h5try!(H5Pget_nfilters(plist_id));
            for idx in 0..n_filters {
                let mut flags: c_uint = 0;
                let mut cd_nelmts: size_t = cd_values.len() as _;
                let filter_id = h5try!(H5Pget_filter2(
                    plist_id,
                    idx as _,
                    addr_of_mut!(flags),
                    addr_of_mut!(cd_nelmts),
                    cd_values.as_mut_ptr(),
                    name.len() as _,
                    name.as_mut_ptr(),
                    ptr::null_mut(),
                ));
                // cd_nelmts reports the full count even when the buffer was too short
                let cdata = &cd_values[..cd_values.len().min(cd_nelmts as _)];
                filters.push((Self::from_raw(filter_id, cdata)?, Availability::from_flags(flags)));
            }
            Ok(filters)
        })
    }
}
