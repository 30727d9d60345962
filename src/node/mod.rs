//! Uniform handles over the objects of a file hierarchy.
//!
//! A [`Node`] is any group, dataset or named datatype reachable by path. Children of a
//! group are exposed through a [`NodeView`] and walked with a [`NodeIterator`].

use std::fmt::{self, Display};

use hdf5_sys::h5t::H5Tcommitted;

use crate::internal_prelude::*;

mod iterator;
mod view;

pub use self::iterator::NodeIterator;
pub use self::view::NodeView;

/// Kind of object behind a [`Node`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// A group or the root of a file.
    Group,
    Dataset,
    /// A named (committed) datatype.
    Datatype,
}

impl Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Group => "group",
            Self::Dataset => "dataset",
            Self::Datatype => "datatype",
        })
    }
}

/// A [`Node`] narrowed to its concrete class.
#[derive(Clone, Debug)]
pub enum NodeVariant {
    Group(Group),
    Dataset(Dataset),
    Datatype(Datatype),
}

impl NodeVariant {
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Group(_) => NodeType::Group,
            Self::Dataset(_) => NodeType::Dataset,
            Self::Datatype(_) => NodeType::Datatype,
        }
    }
}

/// Handle to a group, dataset or named datatype.
///
/// Two nodes are equal when they refer to the same object in the same file, regardless of
/// the path they were opened through.
#[repr(transparent)]
#[derive(Clone)]
pub struct Node(Handle);

impl_class!(Node: "node", [H5I_GROUP, H5I_DATASET, H5I_DATATYPE, H5I_FILE] => Location {
    fn validate(&self) -> Result<()> {
        if self.id_type() == H5I_DATATYPE {
            let committed = h5call!(H5Tcommitted(self.id()))? > 0;
            ensure!(committed, "expected a named datatype, got a transient one");
        }
        Ok(())
    }

    fn short_repr(&self) -> Option<String> {
        Some(format!("\"{}\" ({})", self.name(), self.node_type()))
    }
});

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self.loc_info(), other.loc_info()) {
            (Ok(a), Ok(b)) => a.fileno == b.fileno && a.token == b.token,
            _ => false,
        }
    }
}

macro_rules! impl_from_node_class {
    ($ty:ident) => {
        impl From<$ty> for Node {
            fn from(obj: $ty) -> Self {
                unsafe { obj.cast_unchecked() }
            }
        }
    };
}

impl_from_node_class!(Group);
impl_from_node_class!(Dataset);
impl_from_node_class!(File);

impl Node {
    pub fn node_type(&self) -> NodeType {
        match self.id_type() {
            H5I_DATASET => NodeType::Dataset,
            H5I_DATATYPE => NodeType::Datatype,
            _ => NodeType::Group,
        }
    }

    pub fn is_group(&self) -> bool {
        self.node_type() == NodeType::Group
    }

    pub fn is_dataset(&self) -> bool {
        self.node_type() == NodeType::Dataset
    }

    pub fn is_datatype(&self) -> bool {
        self.node_type() == NodeType::Datatype
    }

    pub fn classify(&self) -> Result<NodeVariant> {
        Ok(match self.node_type() {
            NodeType::Group => NodeVariant::Group(self.as_group()?),
            NodeType::Dataset => NodeVariant::Dataset(self.as_dataset()?),
            NodeType::Datatype => NodeVariant::Datatype(self.as_datatype()?),
        })
    }

    pub fn as_group(&self) -> Result<Group> {
        self.clone().cast()
    }

    pub fn as_dataset(&self) -> Result<Dataset> {
        self.clone().cast()
    }

    pub fn as_datatype(&self) -> Result<Datatype> {
        self.clone().cast()
    }

    /// Children of a group node.
    pub fn children(&self) -> Result<NodeView> {
        Ok(self.as_group()?.nodes())
    }

    /// Last segment of the path this node was opened through; empty for the root.
    pub fn link_name(&self) -> String {
        self.path().object_name().to_owned()
    }

    /// The group this node was reached from; the root is its own parent.
    pub fn parent(&self) -> Result<Group> {
        let parent = self.path().parent_path();
        self.file()?.group(&parent.to_string())
    }
}

#[cfg(test)]
pub mod tests {
    use crate::internal_prelude::*;

    use super::{NodeType, NodeVariant};

    #[test]
    pub fn test_node_types() {
        with_tmp_file(|file| {
            file.create_group("g").unwrap();
            file.new_dataset::<i8>().create("g/d").unwrap();
            let dtype = Datatype::from_type::<u16>().unwrap();
            file.commit_datatype("t", &dtype).unwrap();

            let g = file.node("g").unwrap();
            assert_eq!(g.node_type(), NodeType::Group);
            assert!(g.is_group());
            assert!(matches!(g.classify().unwrap(), NodeVariant::Group(_)));
            assert_eq!(format!("{g:?}"), "<HDF5 node: \"/g\" (group)>");

            let d = file.node("/g/d").unwrap();
            assert!(d.is_dataset());
            assert_eq!(d.classify().unwrap().node_type(), NodeType::Dataset);
            assert_eq!(d.as_dataset().unwrap().size(), 1);
            assert_err!(d.as_group(), "unable to cast node");

            let t = file.node("t").unwrap();
            assert!(t.is_datatype());
            assert!(t.as_datatype().unwrap().is::<u16>());

            let root = file.node("/").unwrap();
            assert_eq!(root.node_type(), NodeType::Group);
            assert_eq!(root.link_name(), "");
        })
    }

    #[test]
    pub fn test_transient_datatype_is_not_a_node() {
        let dtype = Datatype::from_type::<u16>().unwrap();
        let obj: Object = (*dtype).clone();
        assert_err!(obj.as_node(), "expected a named datatype");
    }

    #[test]
    pub fn test_identity() {
        with_tmp_file(|file| {
            file.create_group("a/b").unwrap();
            file.link_hard("a/b", "c").unwrap();
            let b = file.node("a/b").unwrap();
            let c = file.node("c").unwrap();
            assert_eq!(b, c);
            assert_ne!(b.id(), c.id());
            assert_ne!(b, file.node("a").unwrap());
            assert_eq!(Node::from(file.group("a").unwrap()), file.node("/a").unwrap());
            assert_ne!(Node::invalid(), Node::invalid());
        })
    }

    #[test]
    pub fn test_link_name_and_parent() {
        with_tmp_file(|file| {
            file.create_group("x/y/z").unwrap();
            let z = file.node("/x/y/z").unwrap();
            assert_eq!(z.link_name(), "z");
            assert_eq!(z.path(), Path::parse("/x/y/z"));
            assert_eq!(z.parent().unwrap().name(), "/x/y");
            let root = file.node("/").unwrap();
            assert_eq!(root.parent().unwrap().name(), "/");
            let x = file.node("x").unwrap();
            assert_eq!(x.children().unwrap().names().unwrap(), vec!["y"]);
            assert!(file.node("x/y/z").unwrap().children().unwrap().is_empty());
        })
    }
}
