//! Typed memory adapters, hierarchical paths and node traversal over HDF5.
//!
//! This crate wraps the object model of the `HDF5` C library (files, groups, datasets,
//! datatypes, dataspaces, property lists and filters) in reference-counted handles, and
//! layers three things on top of it:
//!
//! - [`Path`], a slash-delimited address that can be parsed, composed and decomposed;
//! - a type-to-schema mapping ([`H5Type`]) plus memory adapters that expose any supported
//!   in-memory value as a raw transfer buffer with a derived datatype and dataspace;
//! - [`Node`], [`NodeView`] and [`NodeIterator`] for index-based traversal of a hierarchy.
//!
//! Every call into the library is serialized through a global reentrant mutex, so the
//! wrappers are safe to use from several threads even with non-threadsafe builds.

#![cfg_attr(feature = "cargo-clippy", warn(clippy::all))]
#![cfg_attr(feature = "cargo-clippy", allow(clippy::module_name_repetitions))]
#![cfg_attr(feature = "cargo-clippy", allow(clippy::cast_possible_truncation))]
#![cfg_attr(feature = "cargo-clippy", allow(clippy::cast_possible_wrap))]
#![cfg_attr(feature = "cargo-clippy", allow(clippy::cast_sign_loss))]
#![cfg_attr(feature = "cargo-clippy", allow(clippy::missing_safety_doc))]
#![cfg_attr(feature = "cargo-clippy", allow(clippy::missing_errors_doc))]
#![cfg_attr(feature = "cargo-clippy", allow(clippy::must_use_candidate))]
#![cfg_attr(feature = "cargo-clippy", allow(clippy::wildcard_imports))]
#![cfg_attr(feature = "cargo-clippy", allow(clippy::upper_case_acronyms))]
#![cfg_attr(not(test), allow(dead_code))]

mod export {
    pub use crate::{
        class::from_id,
        error::{silence_errors, Error, ErrorFrame, ErrorStack, ExpandedErrorStack, Result},
        hl::{
            Dataset, DatasetBuilder, Dataspace, Datatype, Extents, File, Group, Ix, Location,
            LocationInfo, LocationToken, LocationType, Object, OpenMode, PropertyList, TypeClass,
        },
        memory::{make_adapter, Buffer, BufferMut, MemoryAdapter, MemoryView},
        node::{Node, NodeIterator, NodeType, NodeVariant, NodeView},
        path::Path,
        types::H5Type,
    };

    pub mod dataset {
        pub use crate::hl::dataset::{Dataset, DatasetBuilder};
        pub use crate::hl::plist::dataset_create::*;
    }

    pub mod plist {
        pub use crate::hl::plist::dataset_create::{DatasetCreate, Layout};
        pub use crate::hl::plist::dataset_transfer::DatasetTransfer;
        pub use crate::hl::plist::datatype_create::DatatypeCreate;
        pub use crate::hl::plist::link_create::{CharEncoding, LinkCreate};
        pub use crate::hl::plist::{PropertyList, PropertyListClass};
    }

    pub mod filters {
        pub use crate::hl::filters::*;
    }

    pub mod memory {
        pub use crate::memory::*;
    }
}

pub use crate::export::*;

#[doc(hidden)]
pub use crate::error::h5check;

#[macro_use]
mod macros;
mod class;

mod error;
#[doc(hidden)]
pub mod globals;
mod handle;
#[doc(hidden)]
pub mod sync;
mod util;

mod hl;
mod memory;
mod node;
mod path;
pub mod types;

mod internal_prelude {
    pub use libc::size_t;
    pub use std::os::raw::{c_char, c_int, c_uint, c_void};

    pub use hdf5_sys::{
        h5::{haddr_t, hbool_t, herr_t, hsize_t},
        h5i::H5I_type_t::{self, *},
        h5i::{hid_t, H5I_INVALID_HID},
        h5p::H5P_DEFAULT,
        h5s::H5S_ALL,
    };

    pub use crate::{
        class::ObjectClass,
        error::{h5check, H5ErrorCode},
        export::{
            Dataset, DatasetBuilder, Dataspace, Datatype, Error, Extents, File, Group, Ix,
            Location, LocationInfo, LocationToken, LocationType, Node, NodeIterator, NodeType,
            NodeView, Object, Path, PropertyList, Result, TypeClass,
        },
        handle::Handle,
        hl::plist::{
            dataset_create::DatasetCreate, dataset_transfer::DatasetTransfer,
            datatype_create::DatatypeCreate, link_create::LinkCreate, PropertyListClass,
        },
        sync::sync,
        types::{H5Type, TypeDescriptor},
        util::{get_h5_str, h5_free_memory, string_from_cstr, to_cstring},
    };

    #[cfg(test)]
    pub use crate::test::{with_tmp_dir, with_tmp_file, with_tmp_path};
}

#[cfg(test)]
pub mod test;

/// Version of the linked HDF5 library, `(0, 0, 0)` if it cannot be queried.
pub fn library_version() -> (u8, u8, u8) {
    let (mut major, mut minor, mut release) = (0, 0, 0);
    h5call!(hdf5_sys::h5::H5get_libversion(&mut major, &mut minor, &mut release))
        .map_or((0, 0, 0), |_| (major as _, minor as _, release as _))
}
