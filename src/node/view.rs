use std::fmt::{self, Debug};

use hdf5_sys::{
    h5::{H5_index_t, H5_iter_order_t},
    h5l::H5Lget_name_by_idx,
    h5o::H5Oopen_by_idx,
};

use crate::internal_prelude::*;

use super::NodeIterator;

/// Direct children of a group, ordered by link name and addressable by index.
///
/// Nothing is cached: the size and every child are looked up again on each call, so the
/// view follows changes made to the group after it was created.
#[derive(Clone)]
pub struct NodeView {
    group: Group,
}

impl Debug for NodeView {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("NodeView").field("group", &self.group).finish()
    }
}

impl NodeView {
    pub fn new(group: Group) -> Self {
        Self { group }
    }

    /// The group whose children are viewed.
    pub fn group(&self) -> &Group {
        &self.group
    }

    pub fn len(&self) -> usize {
        self.group.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_index(&self, index: usize) -> Result<()> {
        let len = self.len();
        ensure!(index < len, "child index {} out of range for a group with {} children", index, len);
        Ok(())
    }

    /// Opens the child at `index`.
    pub fn get(&self, index: usize) -> Result<Node> {
        self.check_index(index)?;
        Node::from_id(h5try!(H5Oopen_by_idx(
            self.group.id(),
            b".\0".as_ptr().cast(),
            H5_index_t::H5_INDEX_NAME,
            H5_iter_order_t::H5_ITER_INC,
            index as _,
            H5P_DEFAULT
        )))
    }

    /// Link name of the child at `index`.
    pub fn name(&self, index: usize) -> Result<String> {
        self.check_index(index)?;
        h5lock!(get_h5_str(|m, s| H5Lget_name_by_idx(
            self.group.id(),
            b".\0".as_ptr().cast(),
            H5_index_t::H5_INDEX_NAME,
            H5_iter_order_t::H5_ITER_INC,
            index as _,
            m,
            s,
            H5P_DEFAULT
        )))
    }

    pub fn names(&self) -> Result<Vec<String>> {
        (0..self.len()).map(|i| self.name(i)).collect()
    }

    /// Cursor at the first child.
    pub fn begin(&self) -> NodeIterator<'_> {
        NodeIterator::new(self, 0)
    }

    /// Cursor one past the last child.
    pub fn end(&self) -> NodeIterator<'_> {
        NodeIterator::new(self, self.len() as isize)
    }

    pub fn iter(&self) -> NodeIterator<'_> {
        self.begin()
    }
}

impl<'a> IntoIterator for &'a NodeView {
    type Item = Result<Node>;
    type IntoIter = NodeIterator<'a>;

    fn into_iter(self) -> NodeIterator<'a> {
        self.iter()
    }
}

#[cfg(test)]
pub mod tests {
    use crate::internal_prelude::*;

    #[test]
    pub fn test_empty_view() {
        with_tmp_file(|file| {
            let view = file.nodes();
            assert_eq!(view.len(), 0);
            assert!(view.is_empty());
            assert!(view.names().unwrap().is_empty());
            assert_err!(view.get(0), "child index 0 out of range for a group with 0 children");
            assert_err!(view.name(0), "out of range");
            assert!(view.begin() == view.end());
            assert_eq!(view.iter().count(), 0);
        })
    }

    #[test]
    pub fn test_get_by_index() {
        with_tmp_file(|file| {
            file.create_group("b").unwrap();
            file.new_dataset::<f32>().create("a").unwrap();
            file.create_group("c/d").unwrap();
            let view = file.nodes();
            assert_eq!(view.len(), 3);
            assert_eq!(view.names().unwrap(), vec!["a", "b", "c"]);
            assert_eq!(view.name(2).unwrap(), "c");
            let a = view.get(0).unwrap();
            assert_eq!(a.node_type(), NodeType::Dataset);
            assert_eq!(a.name(), "/a");
            assert_eq!(view.get(1).unwrap(), file.node("b").unwrap());
            assert_eq!(view.get(2).unwrap().children().unwrap().names().unwrap(), vec!["d"]);
            assert_err!(view.get(3), "out of range");
            assert_eq!(view.group().name(), "/");
        })
    }

    #[test]
    pub fn test_view_follows_changes() {
        with_tmp_file(|file| {
            let view = file.nodes();
            assert!(view.is_empty());
            file.create_group("x").unwrap();
            assert_eq!(view.len(), 1);
            assert_eq!(view.get(0).unwrap().link_name(), "x");
            file.unlink("x").unwrap();
            assert!(view.get(0).is_err());
        })
    }

    #[test]
    pub fn test_into_iterator() {
        with_tmp_file(|file| {
            for name in ["one", "two", "three"] {
                file.create_group(name).unwrap();
            }
            let view = file.nodes();
            let mut names = Vec::new();
            for node in &view {
                names.push(node.unwrap().link_name());
            }
            assert_eq!(names, vec!["one", "three", "two"]);
            let nodes = view.iter().collect::<Result<Vec<_>>>().unwrap();
            assert!(nodes.iter().all(|node| node.is_group()));
        })
    }
}
