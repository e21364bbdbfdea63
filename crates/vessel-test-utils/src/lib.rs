//! Test utilities for Vessel containers.
//!
//! Container tests care less about values than about lifecycles: was every
//! element that got built dropped exactly once, and did a failure halfway
//! through an operation leave anything behind? The fixtures here count
//! constructions and drops and can be told to fail on the N-th attempt.
//!
//! - [`Ledger`] / [`Tracked`]: shared live-count instrumentation with
//!   fault injection for `Clone` and for a fallible constructor.
//! - [`Brittle`]: a type whose `Default` panics on demand.
//! - [`expect_panic`]: run a closure that must panic and return the message.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod ledger;

pub use fixtures::{expect_panic, Brittle};
pub use ledger::{InjectedFault, Ledger, Tracked};

/// Route `log` output through the test harness's captured stdout.
///
/// Safe to call from every test; only the first call installs a logger.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
