//! Growable contiguous arrays with explicit failure-safety guarantees.
//!
//! [`DynamicArray`] pairs one [`RawStorage`](vessel_raw::RawStorage) block
//! with a count of live elements and owns the lifecycle of every element
//! in it: construction into uninitialized slots, relocation into bigger
//! blocks, and destruction. This crate is one of two that may contain
//! `unsafe` code (along with `vessel-raw`).
//!
//! # Architecture
//!
//! ```text
//! DynamicArray<T>
//! ├── RawStorage<T>   (slots [0, capacity), uninitialized past len)
//! ├── len             (slots [0, len) are live)
//! ├── GrowthPolicy    (0 → 1 → 2 → 4 → ...)
//! └── PartialRun<T>   (scoped rollback for half-built batches)
//! ```
//!
//! # Failure model
//!
//! - **Allocation failure:** every allocating operation has a `try_*`
//!   form returning [`AllocError`](vessel_raw::AllocError) with the array
//!   unchanged. The plain forms panic on capacity overflow and call
//!   `handle_alloc_error` on allocator failure, like `std`.
//! - **Element failure:** panics from `Default`, `Clone` or user closures
//!   and `Err`s from `try_*_with` constructors ([`ConstructError`]) both
//!   leave the array in the state documented per operation.
//! - **Contract violations:** out-of-range indices panic.
//!
//! ```
//! use vessel_array::DynamicArray;
//!
//! let mut array = DynamicArray::new();
//! array.push_back(10);
//! array.push_back(30);
//! array.insert(1, 20);
//! assert_eq!(array, [10, 20, 30]);
//! assert_eq!(array.capacity(), 4);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod array;
pub mod error;
pub mod growth;
mod guard;
mod impls;

pub use array::DynamicArray;
pub use error::ConstructError;
pub use growth::GrowthPolicy;
pub use vessel_raw::AllocError;
