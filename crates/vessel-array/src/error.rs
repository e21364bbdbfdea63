//! Errors from operations that construct elements.

use std::convert::Infallible;
use std::error::Error;
use std::fmt;

use vessel_raw::AllocError;

/// Failure of an operation that allocates and then builds elements with a
/// fallible constructor.
///
/// `E` is the constructor's own error type. Operations that cannot fail
/// element-wise use `ConstructError<Infallible>` internally and surface a
/// plain [`AllocError`] instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConstructError<E> {
    /// Memory for the new elements could not be obtained.
    Alloc(AllocError),
    /// An element constructor returned an error. Elements already built by
    /// the same call have been dropped.
    Element(E),
}

impl<E> ConstructError<E> {
    /// Returns the constructor error, if that is what failed.
    pub fn element(self) -> Option<E> {
        match self {
            Self::Element(err) => Some(err),
            Self::Alloc(_) => None,
        }
    }
}

impl ConstructError<Infallible> {
    /// Collapse an error whose element constructor cannot fail.
    pub fn into_alloc(self) -> AllocError {
        match self {
            Self::Alloc(err) => err,
            Self::Element(never) => match never {},
        }
    }
}

impl<E> From<AllocError> for ConstructError<E> {
    fn from(err: AllocError) -> Self {
        Self::Alloc(err)
    }
}

impl<E: fmt::Display> fmt::Display for ConstructError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alloc(err) => write!(f, "{err}"),
            Self::Element(err) => write!(f, "element construction failed: {err}"),
        }
    }
}

impl<E: Error + 'static> Error for ConstructError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Alloc(err) => Some(err),
            Self::Element(err) => Some(err),
        }
    }
}
