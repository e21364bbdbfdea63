//! Scoped cleanup for runs of freshly constructed elements.

#![allow(unsafe_code)]

use std::mem;
use std::ptr;

/// Tracks elements written one by one into uninitialized slots.
///
/// If the guard is dropped before [`commit`](Self::commit), every element
/// it wrote is dropped again, leaving the slots uninitialized. This is how
/// a constructor that panics or returns an error halfway through a batch
/// avoids leaking the elements built before it.
///
/// The guard never owns memory. Releasing the block is the job of the
/// `RawStorage` it writes into.
pub(crate) struct PartialRun<T> {
    start: *mut T,
    written: usize,
}

impl<T> PartialRun<T> {
    /// Start a run at `start`.
    ///
    /// # Safety
    ///
    /// `start` must be valid for writes of every slot later passed to
    /// [`push`](Self::push), and those slots must be uninitialized.
    pub(crate) unsafe fn new(start: *mut T) -> Self {
        Self { start, written: 0 }
    }

    /// Write `value` into the next slot of the run.
    ///
    /// # Safety
    ///
    /// The slot at `start + written` must be inside the block promised
    /// to [`new`](Self::new).
    pub(crate) unsafe fn push(&mut self, value: T) {
        // SAFETY: caller guarantees the slot is in bounds and uninitialized.
        unsafe { self.start.add(self.written).write(value) };
        self.written += 1;
    }

    /// Keep the elements and return how many were written.
    pub(crate) fn commit(self) -> usize {
        let written = self.written;
        mem::forget(self);
        written
    }
}

impl<T> Drop for PartialRun<T> {
    fn drop(&mut self) {
        // SAFETY: exactly `written` slots from `start` were initialized by
        // `push` and nothing else has dropped them.
        unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.start, self.written)) }
    }
}
