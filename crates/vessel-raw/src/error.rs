//! Allocation error types.

use std::alloc::Layout;
use std::error::Error;
use std::fmt;

/// A request for raw memory that could not be satisfied.
///
/// Returned by every fallible operation that may allocate. The storage
/// (or container) that issued the request is left exactly as it was.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The requested capacity does not fit in a valid [`Layout`]
    /// (its size in bytes would exceed `isize::MAX`).
    CapacityOverflow {
        /// Number of element slots requested.
        requested: usize,
    },
    /// The global allocator returned null for a valid layout.
    AllocFailed {
        /// The layout that was passed to the allocator.
        layout: Layout,
    },
}

impl AllocError {
    /// Escalate the error the way `std` collections do for their
    /// infallible APIs.
    ///
    /// Capacity overflow panics; allocator failure is handed to
    /// [`std::alloc::handle_alloc_error`], which aborts by default.
    #[cold]
    #[track_caller]
    pub fn handle(self) -> ! {
        match self {
            Self::CapacityOverflow { requested } => {
                panic!("capacity overflow: cannot reserve {requested} slots")
            }
            Self::AllocFailed { layout } => std::alloc::handle_alloc_error(layout),
        }
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityOverflow { requested } => {
                write!(f, "capacity overflow: {requested} slots exceed the maximum block size")
            }
            Self::AllocFailed { layout } => {
                write!(
                    f,
                    "allocation failed: {} bytes with alignment {}",
                    layout.size(),
                    layout.align()
                )
            }
        }
    }
}

impl Error for AllocError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_requested_slots() {
        let err = AllocError::CapacityOverflow { requested: 42 };
        assert!(err.to_string().contains("42 slots"));
    }

    #[test]
    fn display_mentions_layout() {
        let layout = Layout::array::<u64>(4).unwrap();
        let err = AllocError::AllocFailed { layout };
        let msg = err.to_string();
        assert!(msg.contains("32 bytes"));
        assert!(msg.contains("alignment 8"));
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn handle_panics_on_overflow() {
        AllocError::CapacityOverflow { requested: usize::MAX }.handle();
    }
}
