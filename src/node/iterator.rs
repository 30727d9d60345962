use std::fmt::{self, Debug};
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::ptr;

use crate::internal_prelude::*;

/// Random-access cursor over a [`NodeView`].
///
/// The cursor is an index into the view; moving it never touches the file. Only indices
/// in `0..view.len()` can be resolved, but any other index (such as [`NodeView::end`]) is a
/// valid position to hold and compare.
pub struct NodeIterator<'a> {
    view: &'a NodeView,
    index: isize,
    current: Option<Node>,
}

impl<'a> NodeIterator<'a> {
    pub fn new(view: &'a NodeView, index: isize) -> Self {
        Self { view, index, current: None }
    }

    pub fn view(&self) -> &'a NodeView {
        self.view
    }

    pub fn index(&self) -> isize {
        self.index
    }

    /// Whether the cursor points at an existing child; never opens anything.
    pub fn is_valid(&self) -> bool {
        self.index >= 0 && (self.index as usize) < self.view.len()
    }

    /// Opens the child under the cursor.
    pub fn get(&self) -> Result<Node> {
        ensure!(
            self.is_valid(),
            "iterator index {} is out of range [0, {})",
            self.index,
            self.view.len()
        );
        self.view.get(self.index as usize)
    }

    /// Opens the child under the cursor and keeps it until the next call.
    pub fn current(&mut self) -> Result<&Node> {
        let node = self.get()?;
        Ok(self.current.insert(node))
    }

    pub fn inc(&mut self) -> &mut Self {
        *self += 1;
        self
    }

    pub fn dec(&mut self) -> &mut Self {
        *self -= 1;
        self
    }

    /// Signed number of steps from `self` to `other`, if both walk the same view.
    pub fn distance(&self, other: &Self) -> Option<isize> {
        ptr::eq(self.view, other.view).then(|| other.index - self.index)
    }
}

impl Clone for NodeIterator<'_> {
    fn clone(&self) -> Self {
        Self { view: self.view, index: self.index, current: self.current.clone() }
    }
}

impl Debug for NodeIterator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("NodeIterator")
            .field("view", self.view)
            .field("index", &self.index)
            .field("valid", &self.is_valid())
            .finish()
    }
}

/// Same view (by identity) and same index; the children themselves are not compared.
impl PartialEq for NodeIterator<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.view, other.view) && self.index == other.index
    }
}

impl Eq for NodeIterator<'_> {}

impl AddAssign<isize> for NodeIterator<'_> {
    fn add_assign(&mut self, offset: isize) {
        self.index += offset;
    }
}

impl SubAssign<isize> for NodeIterator<'_> {
    fn sub_assign(&mut self, offset: isize) {
        self.index -= offset;
    }
}

impl Add<isize> for NodeIterator<'_> {
    type Output = Self;

    fn add(mut self, offset: isize) -> Self {
        self += offset;
        self
    }
}

impl Sub<isize> for NodeIterator<'_> {
    type Output = Self;

    fn sub(mut self, offset: isize) -> Self {
        self -= offset;
        self
    }
}

impl Iterator for NodeIterator<'_> {
    type Item = Result<Node>;

    fn next(&mut self) -> Option<Result<Node>> {
        if !self.is_valid() {
            return None;
        }
        let node = self.get();
        self.index += 1;
        Some(node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.is_valid() { self.view.len() - self.index as usize } else { 0 };
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
pub mod tests {
    use crate::internal_prelude::*;

    #[test]
    pub fn test_validity() {
        with_tmp_file(|file| {
            file.create_group("a").unwrap();
            file.create_group("b").unwrap();
            let view = file.nodes();
            let mut it = view.begin();
            assert_eq!(it.index(), 0);
            assert!(it.is_valid());
            it.dec();
            assert_eq!(it.index(), -1);
            assert!(!it.is_valid());
            assert_err!(it.get(), "iterator index -1 is out of range [0, 2)");
            it += 3;
            assert!(it == view.end());
            assert!(!it.is_valid());
            it -= 1;
            assert!(it.is_valid());
            assert_eq!(it.get().unwrap().link_name(), "b");
            assert_eq!(it.inc().index(), 2);
        })
    }

    #[test]
    pub fn test_arithmetic_and_distance() {
        with_tmp_file(|file| {
            for name in ["a", "b", "c", "d"] {
                file.new_dataset::<u8>().create(name).unwrap();
            }
            let view = file.nodes();
            let begin = view.begin();
            let third = begin.clone() + 2;
            assert_eq!(third.index(), 2);
            assert_eq!(third.get().unwrap().link_name(), "c");
            assert!(third.clone() - 2 == begin);
            assert_eq!(begin.distance(&view.end()), Some(4));
            assert_eq!(view.end().distance(&third), Some(-2));
            assert!(begin.view().group().is_valid());
        })
    }

    #[test]
    pub fn test_equality_by_view_identity() {
        with_tmp_file(|file| {
            file.create_group("a").unwrap();
            let view1 = file.nodes();
            let view2 = file.nodes();
            assert!(view1.begin() == view1.begin());
            assert!(view1.begin() != view1.end());
            assert!(view1.begin() != view2.begin());
            assert_eq!(view1.begin().distance(&view2.begin()), None);
            assert_eq!(view1.begin().get().unwrap(), view2.begin().get().unwrap());
        })
    }

    #[test]
    pub fn test_current_is_cached() {
        with_tmp_file(|file| {
            file.create_group("a").unwrap();
            file.create_group("b").unwrap();
            let view = file.nodes();
            let mut it = view.begin();
            assert_eq!(it.current().unwrap().link_name(), "a");
            assert!(it.current().unwrap().is_valid());
            it.inc();
            assert_eq!(it.current().unwrap().link_name(), "b");
            it.inc();
            assert!(it.current().is_err());
        })
    }

    #[test]
    pub fn test_iterate_and_rewalk() {
        with_tmp_file(|file| {
            file.create_group("x/y").unwrap();
            file.new_dataset::<i32>().create("z").unwrap();
            let view = file.nodes();
            let mut it = view.iter();
            assert_eq!(it.size_hint(), (2, Some(2)));
            let kinds = it.by_ref().map(|n| n.unwrap().node_type()).collect::<Vec<_>>();
            assert_eq!(kinds, vec![NodeType::Group, NodeType::Dataset]);
            assert!(it == view.end());
            assert!(it.next().is_none());
            it -= 2;
            assert_eq!(it.next().unwrap().unwrap().link_name(), "x");
        })
    }
}
