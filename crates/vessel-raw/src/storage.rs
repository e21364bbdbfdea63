//! The owned, uninitialized block behind every Vessel container.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use crate::error::AllocError;

/// An exclusively owned block of uninitialized memory for `capacity`
/// values of type `T`.
///
/// `RawStorage` only acquires and releases memory. It has no idea which
/// slots hold live values, so dropping it never runs an element
/// destructor: whoever wrote values into the slots must drop them (or
/// move them out) first.
///
/// If `capacity > 0` and `T` is not zero-sized, exactly one block of
/// `capacity * size_of::<T>()` bytes is owned. Otherwise nothing is
/// allocated and the base pointer is dangling but well aligned.
pub struct RawStorage<T> {
    ptr: NonNull<T>,
    capacity: usize,
    _owns: PhantomData<T>,
}

// SAFETY: RawStorage owns its block exclusively, like Box<[MaybeUninit<T>]>.
unsafe impl<T: Send> Send for RawStorage<T> {}
// SAFETY: shared access only hands out `*const T` / `&T`.
unsafe impl<T: Sync> Sync for RawStorage<T> {}

impl<T> RawStorage<T> {
    const IS_ZST: bool = mem::size_of::<T>() == 0;

    /// An empty storage: capacity zero, no block.
    pub const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            _owns: PhantomData,
        }
    }

    /// Reserve memory for `capacity` values without constructing any.
    ///
    /// A zero capacity (or a zero-sized `T`) never touches the allocator
    /// and never fails.
    pub fn with_capacity(capacity: usize) -> Result<Self, AllocError> {
        if capacity == 0 {
            return Ok(Self::new());
        }
        let layout = Self::layout_for(capacity)?;
        if Self::IS_ZST {
            return Ok(Self {
                ptr: NonNull::dangling(),
                capacity,
                _owns: PhantomData,
            });
        }

        // SAFETY: T is not zero-sized and capacity > 0, so the layout is non-empty.
        let raw = unsafe { alloc::alloc(layout) };
        let Some(ptr) = NonNull::new(raw.cast::<T>()) else {
            log::debug!(
                "raw storage allocation failed: {capacity} slots, {} bytes",
                layout.size()
            );
            return Err(AllocError::AllocFailed { layout });
        };
        Ok(Self {
            ptr,
            capacity,
            _owns: PhantomData,
        })
    }

    /// Number of slots this storage can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether a heap block is currently owned.
    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.layout().is_some()
    }

    /// The layout of the owned block, or `None` if nothing is allocated.
    pub fn layout(&self) -> Option<Layout> {
        if self.capacity == 0 || Self::IS_ZST {
            return None;
        }
        Layout::array::<T>(self.capacity).ok()
    }

    /// Base address of the block.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Mutable base address of the block.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Address of the slot at `offset`.
    ///
    /// `offset == capacity` is allowed and yields the one-past-the-end
    /// address, which must never be dereferenced.
    ///
    /// # Panics
    ///
    /// Panics if `offset > capacity`.
    #[inline]
    #[track_caller]
    pub fn slot_ptr(&self, offset: usize) -> *const T {
        assert!(
            offset <= self.capacity,
            "slot offset {offset} out of range for capacity {}",
            self.capacity
        );
        // SAFETY: offset <= capacity keeps the result inside the block or
        // one past its end.
        unsafe { self.ptr.as_ptr().add(offset) }
    }

    /// Mutable address of the slot at `offset`. Same contract as
    /// [`slot_ptr`](Self::slot_ptr).
    #[inline]
    #[track_caller]
    pub fn slot_ptr_mut(&mut self, offset: usize) -> *mut T {
        assert!(
            offset <= self.capacity,
            "slot offset {offset} out of range for capacity {}",
            self.capacity
        );
        // SAFETY: see `slot_ptr`.
        unsafe { self.ptr.as_ptr().add(offset) }
    }

    /// Reference to the value in slot `index`.
    ///
    /// # Safety
    ///
    /// Slot `index` must hold a live, initialized `T`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= capacity`.
    #[inline]
    #[track_caller]
    pub unsafe fn slot_ref(&self, index: usize) -> &T {
        assert!(
            index < self.capacity,
            "slot index {index} out of range for capacity {}",
            self.capacity
        );
        // SAFETY: in bounds per the assert, live per the caller's contract.
        unsafe { &*self.ptr.as_ptr().add(index) }
    }

    /// Mutable reference to the value in slot `index`.
    ///
    /// # Safety
    ///
    /// Slot `index` must hold a live, initialized `T`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= capacity`.
    #[inline]
    #[track_caller]
    pub unsafe fn slot_mut(&mut self, index: usize) -> &mut T {
        assert!(
            index < self.capacity,
            "slot index {index} out of range for capacity {}",
            self.capacity
        );
        // SAFETY: in bounds per the assert, live per the caller's contract.
        unsafe { &mut *self.ptr.as_ptr().add(index) }
    }

    /// Exchange blocks and capacities with `other` in constant time.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Move the block out, leaving `self` empty (capacity zero, no block).
    ///
    /// This is the move-construct / move-assign primitive: assigning the
    /// result over another storage releases that storage's old block.
    #[inline]
    pub fn take(&mut self) -> Self {
        mem::replace(self, Self::new())
    }

    fn layout_for(capacity: usize) -> Result<Layout, AllocError> {
        Layout::array::<T>(capacity).map_err(|_| AllocError::CapacityOverflow {
            requested: capacity,
        })
    }
}

impl<T> Default for RawStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for RawStorage<T> {
    fn drop(&mut self) {
        if let Some(layout) = self.layout() {
            // SAFETY: ptr came from alloc::alloc with exactly this layout and
            // has not been released yet.
            unsafe { alloc::dealloc(self.ptr.as_ptr().cast(), layout) }
        }
    }
}

impl<T> fmt::Debug for RawStorage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawStorage")
            .field("ptr", &self.ptr)
            .field("capacity", &self.capacity)
            .finish()
    }
}
