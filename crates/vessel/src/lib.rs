//! Vessel: growable contiguous containers with explicit failure-safety
//! guarantees.
//!
//! This is the facade crate that re-exports the public API of the Vessel
//! sub-crates. Most users only need this one dependency.
//!
//! # Quick start
//!
//! ```rust
//! use vessel::prelude::*;
//!
//! let mut array = DynamicArray::new();
//! array.push_back(10);
//! array.push_back(30);
//! array.insert(1, 20);
//! assert_eq!(array, [10, 20, 30]);
//! assert_eq!(array.capacity(), 4);
//!
//! // Fallible constructors never leave a half-built element behind.
//! let result = array.try_emplace_back_with(|| "forty".parse::<i32>());
//! assert!(matches!(result, Err(ConstructError::Element(_))));
//! assert_eq!(array.len(), 3);
//!
//! // Allocation failure is reported instead of aborting.
//! assert!(matches!(
//!     array.try_reserve(usize::MAX),
//!     Err(AllocError::CapacityOverflow { .. })
//! ));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`raw`] | `vessel-raw` | `RawStorage`, `AllocError` |
//! | [`array`] | `vessel-array` | `DynamicArray`, `GrowthPolicy`, `ConstructError` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Uninitialized storage blocks (`vessel-raw`).
///
/// [`raw::RawStorage`] owns memory but never the values in it. Build on it
/// directly only when writing a new container.
pub use vessel_raw as raw;

/// The growable array (`vessel-array`).
///
/// See [`array::DynamicArray`] for the per-operation failure guarantees.
pub use vessel_array as array;

/// Common imports.
///
/// ```rust
/// use vessel::prelude::*;
/// ```
pub mod prelude {
    pub use vessel_array::{ConstructError, DynamicArray, GrowthPolicy};
    pub use vessel_raw::{AllocError, RawStorage};
}
