//! [`DynamicArray`]: element lifecycle on top of [`RawStorage`].
//!
//! The array owns one storage block and a count of leading live slots.
//! Every operation that needs a bigger block builds the new block first,
//! places any new element into it, relocates the live elements, and only
//! then swaps the new block in. Until that swap the array is untouched, so
//! a failure anywhere before it leaves the caller with the original array.

#![allow(unsafe_code)]

use std::convert::Infallible;
use std::ops::{Index, IndexMut};
use std::ptr;
use std::slice::{self, SliceIndex};

use vessel_raw::{AllocError, RawStorage};

use crate::error::ConstructError;
use crate::growth::GrowthPolicy;
use crate::guard::PartialRun;

/// A growable, contiguous array of `T`.
///
/// Slots `[0, len)` hold live elements in order; slots `[len, capacity)`
/// are uninitialized and only ever used as construction targets.
///
/// # Failure guarantees
///
/// | Operation | On allocation failure | On element failure |
/// |-----------|-----------------------|--------------------|
/// | `with_len`, `from_fn`, `clone` | nothing built | prefix dropped, block released |
/// | `reserve` | unchanged | n/a (relocation cannot fail) |
/// | `push_back`, `emplace_back_with` | unchanged | unchanged |
/// | `insert`, `emplace_with` | unchanged | unchanged |
/// | `resize`, `resize_with` (growing) | unchanged | new tail dropped, `len` unchanged |
/// | `erase`, `remove`, `pop_back` | n/a | never fails |
///
/// "Element failure" covers both a panic from `Default`, `Clone` or a
/// closure and an `Err` from the `try_*_with` constructors. Relocation is
/// a bitwise move, which cannot fail, so growth never needs the copy
/// fallback a throwing move would require.
///
/// Out-of-range indices and positions are contract violations and panic.
pub struct DynamicArray<T> {
    storage: RawStorage<T>,
    len: usize,
}

impl<T> DynamicArray<T> {
    /// Growth policy applied when an append or insert finds the array full.
    pub const GROWTH: GrowthPolicy = GrowthPolicy::DOUBLING;

    /// An empty array. Does not allocate.
    pub const fn new() -> Self {
        Self {
            storage: RawStorage::new(),
            len: 0,
        }
    }

    /// An array of `len` elements built by `f(index)`, with capacity
    /// exactly `len`.
    ///
    /// If `f` panics, the elements already built are dropped and the block
    /// is released before the panic continues.
    pub fn from_fn(len: usize, mut f: impl FnMut(usize) -> T) -> Self {
        collapse(Self::try_from_fn(len, |i| Ok::<T, Infallible>(f(i))))
    }

    /// Fallible form of [`from_fn`](Self::from_fn).
    ///
    /// On `Err`, the elements already built are dropped and the block is
    /// released; nothing is returned but the error.
    pub fn try_from_fn<E>(
        len: usize,
        mut f: impl FnMut(usize) -> Result<T, E>,
    ) -> Result<Self, ConstructError<E>> {
        let mut storage = RawStorage::with_capacity(len)?;
        // SAFETY: the fresh block has `len` uninitialized slots and the run
        // writes at most `len` of them.
        let mut run = unsafe { PartialRun::new(storage.as_mut_ptr()) };
        for index in 0..len {
            let value = f(index).map_err(ConstructError::Element)?;
            // SAFETY: index < len == capacity.
            unsafe { run.push(value) };
        }
        let len = run.commit();
        Ok(Self { storage, len })
    }

    /// Copy every element through `f` into a new array of capacity
    /// `self.len()`. The source is never modified, even if `f` fails.
    pub fn try_clone_with<E>(
        &self,
        mut f: impl FnMut(&T) -> Result<T, E>,
    ) -> Result<Self, ConstructError<E>> {
        let source = self.as_slice();
        Self::try_from_fn(source.len(), |i| f(&source[i]))
    }

    /// Move constructor: take `other`'s block and elements in constant
    /// time, leaving `other` empty with capacity zero.
    pub fn take_from(other: &mut Self) -> Self {
        let mut taken = Self::new();
        taken.swap(other);
        taken
    }

    /// Move assignment: drop this array's elements and block, adopt
    /// `other`'s, and leave `other` empty with capacity zero.
    pub fn move_from(&mut self, other: &mut Self) {
        *self = Self::take_from(other);
    }

    /// Exchange contents with `other` in constant time.
    pub fn swap(&mut self, other: &mut Self) {
        self.storage.swap(&mut other.storage);
        std::mem::swap(&mut self.len, &mut other.len);
    }

    /// Number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the array holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots in the owned block.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Base address of the element block.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.storage.as_ptr()
    }

    /// The live elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the first `len` slots are live and the pointer is non-null
        // and aligned even when nothing is allocated.
        unsafe { slice::from_raw_parts(self.storage.as_ptr(), self.len) }
    }

    /// The live elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: see `as_slice`; `&mut self` makes the borrow unique.
        unsafe { slice::from_raw_parts_mut(self.storage.as_mut_ptr(), self.len) }
    }

    /// Ensure capacity for at least `capacity` elements.
    ///
    /// Does nothing if the array is already that large. Otherwise allocates
    /// a block of exactly `capacity` slots and relocates every element.
    ///
    /// # Panics
    ///
    /// Panics on capacity overflow; aborts via
    /// [`handle_alloc_error`](std::alloc::handle_alloc_error) if the
    /// allocator fails.
    pub fn reserve(&mut self, capacity: usize) {
        if let Err(err) = self.try_reserve(capacity) {
            err.handle();
        }
    }

    /// Fallible form of [`reserve`](Self::reserve). On `Err` the array is
    /// unchanged.
    pub fn try_reserve(&mut self, capacity: usize) -> Result<(), AllocError> {
        if capacity <= self.capacity() {
            return Ok(());
        }
        let fresh = RawStorage::with_capacity(capacity)?;
        self.relocate_into(fresh, None);
        Ok(())
    }

    /// Append `value`, growing to `max(1, 2 * capacity)` if full. Returns
    /// a reference to the new element.
    pub fn push_back(&mut self, value: T) -> &mut T {
        collapse(self.try_emplace_back_with(|| Ok::<T, Infallible>(value)))
    }

    /// Fallible form of [`push_back`](Self::push_back). On `Err` the array
    /// is unchanged and `value` has been dropped.
    pub fn try_push_back(&mut self, value: T) -> Result<&mut T, AllocError> {
        self.try_emplace_back_with(|| Ok::<T, Infallible>(value))
            .map_err(ConstructError::into_alloc)
    }

    /// Append the value built by `make`.
    ///
    /// When the array is full, the value is built directly into its slot in
    /// the new block before any existing element moves, so a panic from
    /// `make` leaves the array exactly as it was.
    pub fn emplace_back_with(&mut self, make: impl FnOnce() -> T) -> &mut T {
        collapse(self.try_emplace_back_with(|| Ok::<T, Infallible>(make())))
    }

    /// Fallible form of [`emplace_back_with`](Self::emplace_back_with).
    /// On `Err` the array is unchanged.
    pub fn try_emplace_back_with<E>(
        &mut self,
        make: impl FnOnce() -> Result<T, E>,
    ) -> Result<&mut T, ConstructError<E>> {
        let index = self.len;
        self.emplace_at(index, make)
    }

    /// Drop the last element. Does nothing if the array is empty.
    pub fn pop_back(&mut self) {
        drop(self.pop());
    }

    /// Remove and return the last element, or `None` if empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: slot `len` was the last live slot and is now outside the
        // live range, so it is read exactly once.
        Some(unsafe { self.storage.slot_ptr(self.len).read() })
    }

    /// Insert `value` at `index`, shifting later elements right. Returns a
    /// reference to the inserted element.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    #[track_caller]
    pub fn insert(&mut self, index: usize, value: T) -> &mut T {
        collapse(self.try_emplace_with(index, || Ok::<T, Infallible>(value)))
    }

    /// Fallible form of [`insert`](Self::insert). On `Err` the array is
    /// unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    #[track_caller]
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<&mut T, AllocError> {
        self.try_emplace_with(index, || Ok::<T, Infallible>(value))
            .map_err(ConstructError::into_alloc)
    }

    /// Insert the value built by `make` at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    #[track_caller]
    pub fn emplace_with(&mut self, index: usize, make: impl FnOnce() -> T) -> &mut T {
        collapse(self.try_emplace_with(index, || Ok::<T, Infallible>(make())))
    }

    /// Fallible form of [`emplace_with`](Self::emplace_with).
    ///
    /// Both paths give the strong guarantee: the value is fully built
    /// before any slot of the array is touched.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    #[track_caller]
    pub fn try_emplace_with<E>(
        &mut self,
        index: usize,
        make: impl FnOnce() -> Result<T, E>,
    ) -> Result<&mut T, ConstructError<E>> {
        assert!(
            index <= self.len,
            "insertion index {index} out of range for length {}",
            self.len
        );
        self.emplace_at(index, make)
    }

    /// Remove the element at `index`, shifting later elements left.
    /// Returns `index`, which now holds the follower of the removed element
    /// (or equals `len` if the removed element was last).
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    #[track_caller]
    pub fn erase(&mut self, index: usize) -> usize {
        drop(self.remove(index));
        index
    }

    /// Remove and return the element at `index`, shifting later elements
    /// left.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    #[track_caller]
    pub fn remove(&mut self, index: usize) -> T {
        assert!(
            index < self.len,
            "erase index {index} out of range for length {}",
            self.len
        );
        let tail = self.len - index - 1;
        let at = self.storage.slot_ptr_mut(index);
        // SAFETY: slot `index` is live; it is read out once, then the
        // `tail` live slots after it slide down over it. The last slot ends
        // up a stale duplicate and leaves the live range below.
        let removed = unsafe {
            let removed = at.read();
            ptr::copy(at.add(1), at, tail);
            removed
        };
        self.len -= 1;
        removed
    }

    /// Drop every element past the first `len`. Does nothing if the array
    /// is not longer than that. Capacity is unchanged.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let tail = ptr::slice_from_raw_parts_mut(self.storage.slot_ptr_mut(len), self.len - len);
        // Shrink first so a panicking destructor cannot cause a double drop.
        self.len = len;
        // SAFETY: `tail` covers exactly the slots that just left the live range.
        unsafe { ptr::drop_in_place(tail) };
    }

    /// Drop every element. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Resize to `len`, dropping surplus elements or appending values built
    /// by `make`.
    ///
    /// Growing reserves exactly `len` first. If `make` panics, the values it
    /// already built are dropped and the length is unchanged.
    pub fn resize_with(&mut self, len: usize, mut make: impl FnMut() -> T) {
        collapse(self.try_resize_with(len, || Ok::<T, Infallible>(make())));
    }

    /// Fallible form of [`resize_with`](Self::resize_with). On `Err`,
    /// values built by this call are dropped and the length is unchanged;
    /// the capacity may already have grown.
    pub fn try_resize_with<E>(
        &mut self,
        len: usize,
        mut make: impl FnMut() -> Result<T, E>,
    ) -> Result<(), ConstructError<E>> {
        if len <= self.len {
            self.truncate(len);
            return Ok(());
        }
        self.try_reserve(len)?;
        let start = self.storage.slot_ptr_mut(self.len);
        // SAFETY: capacity >= len, so slots `[self.len, len)` exist and are
        // uninitialized.
        let mut run = unsafe { PartialRun::new(start) };
        for _ in self.len..len {
            let value = make().map_err(ConstructError::Element)?;
            // SAFETY: at most `len - self.len` slots are written.
            unsafe { run.push(value) };
        }
        self.len += run.commit();
        Ok(())
    }

    /// Construct at `index` (which must be `<= len`), growing if full.
    fn emplace_at<E>(
        &mut self,
        index: usize,
        make: impl FnOnce() -> Result<T, E>,
    ) -> Result<&mut T, ConstructError<E>> {
        if self.len == self.capacity() {
            let capacity = Self::GROWTH.next_capacity(self.capacity())?;
            let mut fresh: RawStorage<T> = RawStorage::with_capacity(capacity)?;
            let value = make().map_err(ConstructError::Element)?;
            // SAFETY: index <= len < capacity of the fresh block, which has
            // no live slots yet.
            unsafe { fresh.slot_ptr_mut(index).write(value) };
            self.relocate_into(fresh, Some(index));
        } else {
            let value = make().map_err(ConstructError::Element)?;
            let at = self.storage.slot_ptr_mut(index);
            // SAFETY: len < capacity, so slot `len` is free. Slots
            // `[index, len)` shift up by one into `[index + 1, len + 1)` and
            // the vacated slot receives the new value.
            unsafe {
                ptr::copy(at, at.add(1), self.len - index);
                at.write(value);
            }
        }
        self.len += 1;
        // SAFETY: slot `index` was written above and is inside the live range.
        Ok(unsafe { self.storage.slot_mut(index) })
    }

    /// Relocate every live element into `fresh` and adopt it.
    ///
    /// With `gap = Some(i)`, elements from `i` onwards land one slot higher,
    /// leaving slot `i` to whatever the caller already wrote there. The old
    /// block is released without dropping anything: its elements now live
    /// in `fresh`.
    fn relocate_into(&mut self, mut fresh: RawStorage<T>, gap: Option<usize>) {
        let split = gap.unwrap_or(self.len);
        let shift = usize::from(gap.is_some());
        debug_assert!(self.len + shift <= fresh.capacity());

        log::trace!(
            "relocating {} elements: capacity {} -> {}",
            self.len,
            self.capacity(),
            fresh.capacity()
        );

        let src = self.storage.as_ptr();
        let dst = fresh.as_mut_ptr();
        // SAFETY: both blocks hold at least `len + shift` slots and never
        // overlap. Every live slot is copied exactly once; the old block is
        // then released without running destructors.
        unsafe {
            ptr::copy_nonoverlapping(src, dst, split);
            ptr::copy_nonoverlapping(src.add(split), dst.add(split + shift), self.len - split);
        }
        self.storage.swap(&mut fresh);
    }
}

impl<T: Default> DynamicArray<T> {
    /// An array of `len` default values, with capacity exactly `len`.
    pub fn with_len(len: usize) -> Self {
        Self::from_fn(len, |_| T::default())
    }

    /// Fallible form of [`with_len`](Self::with_len).
    pub fn try_with_len(len: usize) -> Result<Self, AllocError> {
        Self::try_from_fn(len, |_| Ok::<T, Infallible>(T::default()))
            .map_err(ConstructError::into_alloc)
    }

    /// Resize to `len`, filling new slots with `T::default()`.
    pub fn resize(&mut self, len: usize) {
        self.resize_with(len, T::default);
    }

    /// Fallible form of [`resize`](Self::resize).
    pub fn try_resize(&mut self, len: usize) -> Result<(), AllocError> {
        self.try_resize_with(len, || Ok::<T, Infallible>(T::default()))
            .map_err(ConstructError::into_alloc)
    }
}

impl<T: Clone> DynamicArray<T> {
    /// Fallible deep copy with capacity exactly `self.len()`.
    pub fn try_clone(&self) -> Result<Self, AllocError> {
        self.try_clone_with(|item| Ok::<T, Infallible>(item.clone()))
            .map_err(ConstructError::into_alloc)
    }
}

impl<T, I: SliceIndex<[T]>> Index<I> for DynamicArray<T> {
    type Output = I::Output;

    /// Index by position or by range over the live elements only; spare
    /// capacity is never reachable.
    #[track_caller]
    fn index(&self, index: I) -> &I::Output {
        Index::index(self.as_slice(), index)
    }
}

impl<T, I: SliceIndex<[T]>> IndexMut<I> for DynamicArray<T> {
    #[track_caller]
    fn index_mut(&mut self, index: I) -> &mut I::Output {
        IndexMut::index_mut(self.as_mut_slice(), index)
    }
}

impl<T> Drop for DynamicArray<T> {
    fn drop(&mut self) {
        // SAFETY: exactly the first `len` slots are live; the storage
        // releases the block afterwards.
        unsafe { ptr::drop_in_place(self.as_mut_slice() as *mut [T]) }
    }
}

/// Unwrap the result of an operation whose element constructor is
/// infallible, escalating allocation failure the way `std` does.
#[track_caller]
fn collapse<R>(result: Result<R, ConstructError<Infallible>>) -> R {
    match result {
        Ok(value) => value,
        Err(err) => err.into_alloc().handle(),
    }
}
