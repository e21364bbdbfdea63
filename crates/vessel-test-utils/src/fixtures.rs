//! Panic-driven fixtures.

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};

const UNARMED: usize = usize::MAX;

thread_local! {
    static DEFAULT_BUDGET: Cell<usize> = const { Cell::new(UNARMED) };
    static LIVE: Cell<isize> = const { Cell::new(0) };
}

/// A value whose `Default` panics with `"injected default failure"` once
/// the current thread's budget is spent.
///
/// Bookkeeping is thread-local: the test harness runs each test on its
/// own thread, so tests do not interfere.
#[derive(Debug, PartialEq, Eq)]
pub struct Brittle(u32);

impl Brittle {
    /// A counted value. Never fails.
    pub fn new(value: u32) -> Self {
        Self::born(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// Let `successes` more `default()` calls succeed on this thread, then
    /// panic on every call.
    pub fn fail_defaults_after(successes: usize) {
        DEFAULT_BUDGET.with(|b| b.set(successes));
    }

    /// Stop injecting faults on this thread.
    pub fn disarm() {
        DEFAULT_BUDGET.with(|b| b.set(UNARMED));
    }

    /// `Brittle` values currently alive on this thread.
    pub fn live() -> isize {
        LIVE.with(Cell::get)
    }

    fn born(value: u32) -> Self {
        LIVE.with(|live| live.set(live.get() + 1));
        Self(value)
    }
}

impl Default for Brittle {
    fn default() -> Self {
        let allowed = DEFAULT_BUDGET.with(|b| match b.get() {
            UNARMED => true,
            0 => false,
            left => {
                b.set(left - 1);
                true
            }
        });
        if !allowed {
            panic!("injected default failure");
        }
        Self::born(0)
    }
}

impl Clone for Brittle {
    fn clone(&self) -> Self {
        Self::born(self.0)
    }
}

impl Drop for Brittle {
    fn drop(&mut self) {
        LIVE.with(|live| live.set(live.get() - 1));
    }
}

/// Run `f`, which must panic, and return its panic message.
///
/// # Panics
///
/// Panics if `f` returns normally.
#[track_caller]
pub fn expect_panic<R>(f: impl FnOnce() -> R) -> String {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(_) => panic!("expected a panic, but the closure returned"),
        Err(payload) => panic_message(payload),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        String::from("<non-string panic payload>")
    }
}
