//! Slash-delimited addresses of objects inside a file hierarchy.
//!
//! A [`Path`] is an ordered sequence of link names plus an absolute flag. Parsing never
//! fails: empty segments (from repeated, leading or trailing separators) and `.` segments
//! are dropped, which matches how the library itself traverses `"a//b"` or `"a/./b"`.
//!
//! ```
//! use hdf5_tree::Path;
//!
//! let path = Path::from("/a/b/c");
//! assert!(path.is_absolute());
//! assert_eq!(path.object_name(), "c");
//! assert_eq!(path.parent_path().to_string(), "/a/b");
//! ```

use std::collections::vec_deque::{self, VecDeque};
use std::convert::Infallible;
use std::fmt::{self, Debug, Display};
use std::iter::FromIterator;
use std::ops::Add;
use std::str::FromStr;

/// Separator between link names.
pub const SEPARATOR: char = '/';

fn segments_of(s: &str) -> impl Iterator<Item = &str> {
    s.split(SEPARATOR).filter(|seg| !seg.is_empty() && *seg != ".")
}

/// Hierarchical address: an absolute flag and a list of link names.
///
/// Zero segments with the absolute flag set is the root group (`"/"`); zero segments
/// without it is the empty relative path (`"."`). The two are never equal.
///
/// Ordering compares the absolute flag first, then segments lexicographically.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Path {
    absolute: bool,
    segments: VecDeque<String>,
}

impl Path {
    /// Creates an empty relative path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the path of the root group.
    pub fn root() -> Self {
        Self { absolute: true, segments: VecDeque::new() }
    }

    /// Parses a string; a leading `/` makes the path absolute.
    pub fn parse(s: &str) -> Self {
        Self {
            absolute: s.starts_with(SEPARATOR),
            segments: segments_of(s).map(ToOwned::to_owned).collect(),
        }
    }

    /// Number of link names in the path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// `true` if there are no link names (root or empty relative path).
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    pub fn set_absolute(&mut self, absolute: bool) {
        self.absolute = absolute;
    }

    pub fn is_root(&self) -> bool {
        self.absolute && self.segments.is_empty()
    }

    pub fn front(&self) -> Option<&str> {
        self.segments.front().map(String::as_str)
    }

    pub fn back(&self) -> Option<&str> {
        self.segments.back().map(String::as_str)
    }

    /// Prepends a link name.
    ///
    /// A name containing separators is split, so that `push_front("a/b")` adds two segments.
    pub fn push_front<S: AsRef<str>>(&mut self, link_name: S) {
        let names: Vec<_> = segments_of(link_name.as_ref()).collect();
        for name in names.into_iter().rev() {
            self.segments.push_front(name.to_owned());
        }
    }

    /// Appends a link name, splitting it on separators like [`push_front`](Self::push_front).
    pub fn push_back<S: AsRef<str>>(&mut self, link_name: S) {
        self.segments.extend(segments_of(link_name.as_ref()).map(ToOwned::to_owned));
    }

    /// Removes the first link name, or returns `None` if there are none.
    pub fn pop_front(&mut self) -> Option<String> {
        self.segments.pop_front()
    }

    /// Removes the last link name, or returns `None` if there are none.
    pub fn pop_back(&mut self) -> Option<String> {
        self.segments.pop_back()
    }

    pub fn iter(&self) -> vec_deque::Iter<'_, String> {
        self.segments.iter()
    }

    /// The last link name, or an empty string for the root and the empty path.
    pub fn object_name(&self) -> &str {
        self.back().unwrap_or("")
    }

    /// Copy of the path without its last link name; root stays root.
    pub fn parent_path(&self) -> Self {
        let mut parent = self.clone();
        parent.pop_back();
        parent
    }

    /// Longest shared prefix of two paths; paths of different kinds share nothing.
    pub fn common_base(a: &Self, b: &Self) -> Self {
        if a.absolute != b.absolute {
            return Self::new();
        }
        let segments = a.iter().zip(b.iter()).take_while(|(x, y)| x == y).map(|(x, _)| x.clone());
        Self { absolute: a.absolute, segments: segments.collect() }
    }

    /// The relative remainder of `self` below `base`, if `base` is a prefix of `self`.
    pub fn relative_to(&self, base: &Self) -> Option<Self> {
        if self.absolute != base.absolute || base.len() > self.len() {
            return None;
        }
        if !self.iter().zip(base.iter()).all(|(x, y)| x == y) {
            return None;
        }
        Some(Self { absolute: false, segments: self.segments.iter().skip(base.len()).cloned().collect() })
    }
}

impl Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Path({:?})", self.to_string())
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str(if self.absolute { "/" } else { "." });
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 || self.absolute {
                write!(f, "{SEPARATOR}")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for Path {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<&String> for Path {
    fn from(s: &String) -> Self {
        Self::parse(s)
    }
}

impl From<String> for Path {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<&Path> for Path {
    fn from(path: &Path) -> Self {
        path.clone()
    }
}

impl From<Path> for String {
    fn from(path: Path) -> Self {
        path.to_string()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a String;
    type IntoIter = vec_deque::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S: AsRef<str>> Extend<S> for Path {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for name in iter {
            self.push_back(name);
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for Path {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut path = Self::new();
        path.extend(iter);
        path
    }
}

impl Add<&Path> for &Path {
    type Output = Path;

    fn add(self, rhs: &Path) -> Path {
        let mut path = self.clone();
        path.segments.extend(rhs.segments.iter().cloned());
        path
    }
}

impl Add for Path {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self.segments.extend(rhs.segments);
        self
    }
}

impl Add<&str> for &Path {
    type Output = Path;

    fn add(self, link_name: &str) -> Path {
        let mut path = self.clone();
        path.push_back(link_name);
        path
    }
}

impl Add<&str> for Path {
    type Output = Self;

    fn add(mut self, link_name: &str) -> Self {
        self.push_back(link_name);
        self
    }
}

impl Add<Path> for &str {
    type Output = Path;

    fn add(self, path: Path) -> Path {
        Path::parse(self) + path
    }
}
