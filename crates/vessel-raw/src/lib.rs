//! Uninitialized memory blocks for Vessel containers.
//!
//! [`RawStorage`] owns a block sized for a fixed number of `T` slots and
//! nothing more: it never constructs, reads, or drops an element. Knowing
//! which slots are live is the job of the container built on top of it
//! (`vessel-array`). This crate is one of two that may contain `unsafe`
//! code (along with `vessel-array`).
//!
//! # Ownership
//!
//! ```text
//! RawStorage<T>
//! ├── ptr       (dangling when nothing is allocated)
//! └── capacity  (slots, not bytes)
//! ```
//!
//! A storage is never duplicated. It can be moved, swapped, or emptied
//! with [`RawStorage::take`], all in constant time and without touching
//! slot contents.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod error;
pub mod storage;

pub use error::AllocError;
pub use storage::RawStorage;
