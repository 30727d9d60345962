use std::fmt::{self, Display};

pub type Ix = usize;

/// Shape of a dataspace.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Extents {
    /// No elements at all.
    Null,
    /// A single element, rank 0.
    Scalar,
    /// A multidimensional array of elements with fixed current dimensions.
    Simple(Vec<Ix>),
}

impl Extents {
    pub fn new<T: Into<Self>>(extents: T) -> Self {
        extents.into()
    }

    pub fn null() -> Self {
        Self::Null
    }

    pub fn scalar() -> Self {
        Self::Scalar
    }

    /// Simple extents; an empty dimension list is scalar.
    pub fn simple<T: Into<Vec<Ix>>>(dims: T) -> Self {
        let dims = dims.into();
        if dims.is_empty() {
            Self::Scalar
        } else {
            Self::Simple(dims)
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar)
    }

    pub fn is_simple(&self) -> bool {
        matches!(self, Self::Simple(_))
    }

    /// Rank; 0 for null and scalar extents.
    pub fn ndim(&self) -> usize {
        match self {
            Self::Simple(dims) => dims.len(),
            _ => 0,
        }
    }

    pub fn dims(&self) -> Vec<Ix> {
        match self {
            Self::Simple(dims) => dims.clone(),
            _ => vec![],
        }
    }

    /// Total number of elements.
    pub fn size(&self) -> usize {
        match self {
            Self::Null => 0,
            Self::Scalar => 1,
            Self::Simple(dims) => dims.iter().product(),
        }
    }
}

impl Display for Extents {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Scalar => write!(f, "scalar"),
            Self::Simple(dims) if dims.len() == 1 => write!(f, "({},)", dims[0]),
            Self::Simple(dims) => {
                let dims: Vec<_> = dims.iter().map(ToString::to_string).collect();
                write!(f, "({})", dims.join(", "))
            }
        }
    }
}

impl From<()> for Extents {
    fn from(_: ()) -> Self {
        Self::Scalar
    }
}

impl From<&Extents> for Extents {
    fn from(extents: &Self) -> Self {
        extents.clone()
    }
}

impl From<Ix> for Extents {
    fn from(dim: Ix) -> Self {
        Self::Simple(vec![dim])
    }
}

impl From<Vec<Ix>> for Extents {
    fn from(dims: Vec<Ix>) -> Self {
        Self::simple(dims)
    }
}

impl From<&Vec<Ix>> for Extents {
    fn from(dims: &Vec<Ix>) -> Self {
        Self::simple(dims.clone())
    }
}

impl From<&[Ix]> for Extents {
    fn from(dims: &[Ix]) -> Self {
        Self::simple(dims.to_vec())
    }
}

impl<const N: usize> From<[Ix; N]> for Extents {
    fn from(dims: [Ix; N]) -> Self {
        Self::simple(dims.to_vec())
    }
}

macro_rules! impl_tuple {
    ($($d:ident),+) => {
        #[allow(non_snake_case)]
        impl From<($(impl_tuple!(@ix $d),)+)> for Extents {
            fn from(($($d,)+): ($(impl_tuple!(@ix $d),)+)) -> Self {
                Self::Simple(vec![$($d),+])
            }
        }
    };
    (@ix $d:ident) => (Ix);
}

impl_tuple!(D0);
impl_tuple!(D0, D1);
impl_tuple!(D0, D1, D2);
impl_tuple!(D0, D1, D2, D3);
impl_tuple!(D0, D1, D2, D3, D4);
impl_tuple!(D0, D1, D2, D3, D4, D5);
