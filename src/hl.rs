pub mod dataset;
pub mod dataspace;
pub mod datatype;
pub mod extents;
pub mod file;
pub mod filters;
pub mod group;
pub mod location;
pub mod object;
pub mod plist;

pub use self::{
    dataset::{Dataset, DatasetBuilder},
    dataspace::Dataspace,
    datatype::{Datatype, TypeClass},
    extents::{Extents, Ix},
    file::{File, OpenMode},
    group::Group,
    location::{Location, LocationInfo, LocationToken, LocationType},
    object::Object,
    plist::PropertyList,
};
