use hdf5_sys::h5d::H5Dopen2;
use hdf5_sys::h5g::{H5G_info_t, H5Gcreate2, H5Gget_info, H5Gopen2};
use hdf5_sys::h5l::{H5Lcreate_hard, H5Lcreate_soft, H5Ldelete, H5Lexists, H5Lmove, H5L_SAME_LOC};
use hdf5_sys::h5o::H5Oopen;
use hdf5_sys::h5t::{H5Tcommit2, H5Topen2};

use crate::internal_prelude::*;

/// A group of links; also the root of every file.
#[repr(transparent)]
#[derive(Clone)]
pub struct Group(Handle);

impl_class!(Group: "group", [H5I_GROUP, H5I_FILE] => Location {
    fn short_repr(&self) -> Option<String> {
        let members = match self.len() {
            0 => "empty".to_owned(),
            1 => "1 member".to_owned(),
            n => format!("{n} members"),
        };
        Some(format!("\"{}\" ({})", self.name(), members))
    }
});

impl Group {
    /// Number of links in the group (or 0 if the group is invalid).
    pub fn len(&self) -> usize {
        h5get!(H5Gget_info(self.id()): H5G_info_t).map_or(0, |info| info.nlinks as _)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Creates a new group, along with any missing intermediate groups.
    pub fn create_group(&self, name: &str) -> Result<Self> {
        let lcpl = LinkCreate::intermediate()?;
        let name = to_cstring(name)?;
        Self::from_id(h5try!(H5Gcreate2(self.id(), name.as_ptr(), lcpl.id(), H5P_DEFAULT, H5P_DEFAULT)))
    }

    /// Opens an existing group.
    pub fn group(&self, name: &str) -> Result<Self> {
        let name = to_cstring(name)?;
        Self::from_id(h5try!(H5Gopen2(self.id(), name.as_ptr(), H5P_DEFAULT)))
    }

    pub fn dataset(&self, name: &str) -> Result<Dataset> {
        let name = to_cstring(name)?;
        Dataset::from_id(h5try!(H5Dopen2(self.id(), name.as_ptr(), H5P_DEFAULT)))
    }

    /// Opens a named datatype.
    pub fn datatype(&self, name: &str) -> Result<Datatype> {
        let name = to_cstring(name)?;
        Datatype::from_id(h5try!(H5Topen2(self.id(), name.as_ptr(), H5P_DEFAULT)))
    }

    /// Stores a transient datatype under `name`; the datatype becomes committed in place.
    pub fn commit_datatype(&self, name: &str, datatype: &Datatype) -> Result<()> {
        ensure!(!datatype.is_committed(), "datatype is already committed");
        let lcpl = LinkCreate::intermediate()?;
        let tcpl = DatatypeCreate::try_new()?;
        let name = to_cstring(name)?;
        h5try!(H5Tcommit2(self.id(), name.as_ptr(), datatype.id(), lcpl.id(), tcpl.id(), H5P_DEFAULT));
        Ok(())
    }

    /// Opens any object (group, dataset or named datatype) as a [`Node`].
    pub fn node<P: Into<Path>>(&self, path: P) -> Result<Node> {
        let path = to_cstring(path.into().to_string())?;
        Node::from_id(h5try!(H5Oopen(self.id(), path.as_ptr(), H5P_DEFAULT)))
    }

    /// Index-addressable view over the direct children of this group.
    pub fn nodes(&self) -> NodeView {
        NodeView::new(self.clone())
    }

    /// Link names of the direct children, in increasing name order.
    pub fn member_names(&self) -> Result<Vec<String>> {
        self.nodes().names()
    }

    /// Creates a soft link at `link_name` pointing to `target`, which need not exist.
    pub fn link_soft(&self, target: &str, link_name: &str) -> Result<()> {
        let lcpl = LinkCreate::intermediate()?;
        let (target, link_name) = (to_cstring(target)?, to_cstring(link_name)?);
        h5try!(H5Lcreate_soft(target.as_ptr(), self.id(), link_name.as_ptr(), lcpl.id(), H5P_DEFAULT));
        Ok(())
    }

    /// Creates a hard link; both names are relative to this group.
    pub fn link_hard(&self, target: &str, link_name: &str) -> Result<()> {
        let (target, link_name) = (to_cstring(target)?, to_cstring(link_name)?);
        let (src, dst) = (target.as_ptr(), link_name.as_ptr());
        h5try!(H5Lcreate_hard(self.id(), src, H5L_SAME_LOC, dst, H5P_DEFAULT, H5P_DEFAULT));
        Ok(())
    }

    /// Moves a link; both names are relative to this group.
    pub fn relink(&self, name: &str, path: &str) -> Result<()> {
        let (name, path) = (to_cstring(name)?, to_cstring(path)?);
        let (src, dst) = (name.as_ptr(), path.as_ptr());
        h5try!(H5Lmove(self.id(), src, H5L_SAME_LOC, dst, H5P_DEFAULT, H5P_DEFAULT));
        Ok(())
    }

    pub fn unlink(&self, name: &str) -> Result<()> {
        let name = to_cstring(name)?;
        h5try!(H5Ldelete(self.id(), name.as_ptr(), H5P_DEFAULT));
        Ok(())
    }

    /// Checks whether the final link of `name` exists. Every intermediate group must exist,
    /// otherwise this returns `false`; see [`exists`](Self::exists) for a full walk.
    pub fn link_exists(&self, name: &str) -> bool {
        let name = match to_cstring(name) {
            Ok(name) => name,
            Err(_) => return false,
        };
        h5call!(H5Lexists(self.id(), name.as_ptr(), H5P_DEFAULT)).map_or(false, |exists| exists > 0)
    }

    /// Checks that every prefix of `path` resolves to an existing link.
    ///
    /// The root and the empty path always exist.
    pub fn exists<P: Into<Path>>(&self, path: P) -> bool {
        let path = path.into();
        let mut prefix = if path.is_absolute() { Path::root() } else { Path::new() };
        path.iter().all(|name| {
            prefix.push_back(name);
            self.link_exists(&prefix.to_string())
        })
    }

    /// Starts a dataset builder with the datatype of `T`.
    pub fn new_dataset<T: H5Type>(&self) -> DatasetBuilder {
        self.new_dataset_builder().empty::<T>()
    }

    pub fn new_dataset_builder(&self) -> DatasetBuilder {
        DatasetBuilder::new(self)
    }
}
