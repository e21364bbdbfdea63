//! Live-count instrumentation shared between a test and its elements.

use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Budget value meaning "never fail".
const UNARMED: usize = usize::MAX;

#[derive(Debug)]
struct Counts {
    constructed: AtomicUsize,
    dropped: AtomicUsize,
    clone_budget: AtomicUsize,
    make_budget: AtomicUsize,
}

/// Shared bookkeeping for a family of [`Tracked`] values.
///
/// Each test creates its own ledger, so tests running in parallel never
/// see each other's counts. Cloning a ledger shares the counters.
#[derive(Clone, Debug)]
pub struct Ledger {
    counts: Arc<Counts>,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            counts: Arc::new(Counts {
                constructed: AtomicUsize::new(0),
                dropped: AtomicUsize::new(0),
                clone_budget: AtomicUsize::new(UNARMED),
                make_budget: AtomicUsize::new(UNARMED),
            }),
        }
    }

    /// Build a tracked value. Never fails.
    pub fn make(&self, value: i64) -> Tracked {
        self.counts.constructed.fetch_add(1, Ordering::SeqCst);
        Tracked {
            value,
            ledger: self.clone(),
        }
    }

    /// Build a tracked value, failing once the budget set by
    /// [`fail_makes_after`](Self::fail_makes_after) is spent.
    pub fn try_make(&self, value: i64) -> Result<Tracked, InjectedFault> {
        if !consume(&self.counts.make_budget) {
            return Err(InjectedFault);
        }
        Ok(self.make(value))
    }

    /// Let `successes` more clones succeed, then panic on every clone.
    pub fn fail_clones_after(&self, successes: usize) {
        self.counts.clone_budget.store(successes, Ordering::SeqCst);
    }

    /// Let `successes` more `try_make` calls succeed, then fail them all.
    pub fn fail_makes_after(&self, successes: usize) {
        self.counts.make_budget.store(successes, Ordering::SeqCst);
    }

    /// Stop injecting faults.
    pub fn disarm(&self) {
        self.counts.clone_budget.store(UNARMED, Ordering::SeqCst);
        self.counts.make_budget.store(UNARMED, Ordering::SeqCst);
    }

    /// Values built so far, by `make`, `try_make` or `clone`.
    pub fn constructed(&self) -> usize {
        self.counts.constructed.load(Ordering::SeqCst)
    }

    /// Values dropped so far.
    pub fn dropped(&self) -> usize {
        self.counts.dropped.load(Ordering::SeqCst)
    }

    /// Values currently alive.
    ///
    /// # Panics
    ///
    /// Panics if more values were dropped than built, which means some
    /// value was dropped twice.
    pub fn live(&self) -> usize {
        let constructed = self.constructed();
        let dropped = self.dropped();
        assert!(
            dropped <= constructed,
            "double drop detected: {dropped} drops for {constructed} constructions"
        );
        constructed - dropped
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

/// Take one unit from `budget`. Returns `false` once it is exhausted.
fn consume(budget: &AtomicUsize) -> bool {
    budget
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| match left {
            UNARMED => Some(UNARMED),
            0 => None,
            left => Some(left - 1),
        })
        .is_ok()
}

/// A value whose construction and destruction are recorded in a [`Ledger`].
///
/// `Clone` panics with `"injected clone failure"` once the ledger's clone
/// budget is spent. Equality compares values only.
pub struct Tracked {
    value: i64,
    ledger: Ledger,
}

impl Tracked {
    pub fn value(&self) -> i64 {
        self.value
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        if !consume(&self.ledger.counts.clone_budget) {
            panic!("injected clone failure");
        }
        self.ledger.make(self.value)
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.ledger.counts.dropped.fetch_add(1, Ordering::SeqCst);
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialEq<i64> for Tracked {
    fn eq(&self, other: &i64) -> bool {
        self.value == *other
    }
}

impl fmt::Debug for Tracked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tracked({})", self.value)
    }
}

/// The error returned by [`Ledger::try_make`] when a fault is injected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InjectedFault;

impl fmt::Display for InjectedFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("injected construction fault")
    }
}

impl Error for InjectedFault {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expect_panic;

    #[test]
    fn counts_make_clone_and_drop() {
        let ledger = Ledger::new();
        let a = ledger.make(1);
        let b = a.clone();
        assert_eq!(ledger.live(), 2);
        drop(a);
        drop(b);
        assert_eq!(ledger.constructed(), 2);
        assert_eq!(ledger.live(), 0);
    }

    #[test]
    fn clone_budget_panics_when_spent() {
        let ledger = Ledger::new();
        let a = ledger.make(7);
        ledger.fail_clones_after(1);
        let _b = a.clone();
        let msg = expect_panic(|| a.clone());
        assert_eq!(msg, "injected clone failure");
        assert_eq!(ledger.live(), 2);

        ledger.disarm();
        let _c = a.clone();
        assert_eq!(ledger.live(), 3);
    }

    #[test]
    fn make_budget_returns_error() {
        let ledger = Ledger::new();
        ledger.fail_makes_after(2);
        assert!(ledger.try_make(1).is_ok());
        assert!(ledger.try_make(2).is_ok());
        assert_eq!(ledger.try_make(3).unwrap_err(), InjectedFault);
        assert_eq!(ledger.live(), 0);
    }

    #[test]
    fn ledgers_are_independent() {
        let first = Ledger::new();
        let second = Ledger::new();
        let _kept = first.make(0);
        assert_eq!(first.live(), 1);
        assert_eq!(second.live(), 0);
    }
}
