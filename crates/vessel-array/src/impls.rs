//! Standard trait implementations for [`DynamicArray`].
//!
//! Everything here is expressed through the array's public API; none of
//! it touches raw storage directly.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Deref, DerefMut};

use crate::array::DynamicArray;

impl<T> Default for DynamicArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for DynamicArray<T> {
    fn clone(&self) -> Self {
        self.try_clone().unwrap_or_else(|err| err.handle())
    }

    /// Copy-assign. Reuses the existing block whenever it is large enough.
    ///
    /// If `source` does not fit, a full copy is built first and only then
    /// replaces `self`, so a panicking `clone` leaves `self` untouched.
    /// Otherwise the common prefix is assigned element-wise, then the
    /// surplus is dropped or the missing tail is cloned into spare
    /// capacity; a panic there leaves `self` valid but partially assigned.
    fn clone_from(&mut self, source: &Self) {
        if source.len() > self.capacity() {
            *self = source.clone();
            return;
        }
        self.truncate(source.len());
        let (head, tail) = source.split_at(self.len());
        self.as_mut_slice().clone_from_slice(head);
        for item in tail {
            self.push_back(item.clone());
        }
    }
}

impl<T> Deref for DynamicArray<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for DynamicArray<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> AsRef<[T]> for DynamicArray<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsMut<[T]> for DynamicArray<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: fmt::Debug> fmt::Debug for DynamicArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Hash> Hash for DynamicArray<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T: PartialEq<U>, U> PartialEq<DynamicArray<U>> for DynamicArray<T> {
    fn eq(&self, other: &DynamicArray<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for DynamicArray<T> {}

impl<T: PartialEq<U>, U> PartialEq<[U]> for DynamicArray<T> {
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq<U>, U> PartialEq<&[U]> for DynamicArray<T> {
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T: PartialEq<U>, U, const N: usize> PartialEq<[U; N]> for DynamicArray<T> {
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq<U>, U> PartialEq<Vec<U>> for DynamicArray<T> {
    fn eq(&self, other: &Vec<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<'a, T> IntoIterator for &'a DynamicArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynamicArray<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> Extend<T> for DynamicArray<T> {
    /// Appends one element at a time, so capacity follows the same
    /// doubling sequence as repeated `push_back`.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for DynamicArray<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T> FromIterator<T> for DynamicArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new();
        array.extend(iter);
        array
    }
}

impl<T, const N: usize> From<[T; N]> for DynamicArray<T> {
    fn from(items: [T; N]) -> Self {
        let mut array = Self::new();
        array.reserve(N);
        array.extend(items);
        array
    }
}

impl<T: Clone> From<&[T]> for DynamicArray<T> {
    fn from(items: &[T]) -> Self {
        Self::from_fn(items.len(), |i| items[i].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    #[test]
    fn clone_has_capacity_equal_to_len() {
        let mut original = DynamicArray::from([1, 2, 3]);
        original.reserve(32);
        let copy = original.clone();
        assert_eq!(copy, [1, 2, 3]);
        assert_eq!(copy.capacity(), 3);
    }

    #[test]
    fn clone_is_independent() {
        let original = DynamicArray::from([String::from("a"), String::from("b")]);
        let mut copy = original.clone();
        copy[0].push('!');
        copy.push_back(String::from("c"));
        assert_eq!(original, ["a", "b"]);
        assert_eq!(copy, ["a!", "b", "c"]);
    }

    #[test]
    fn clone_from_smaller_source_keeps_capacity() {
        let source = DynamicArray::from([7, 8]);
        let mut target = DynamicArray::from([1, 2, 3, 4, 5]);
        let base = target.as_ptr();
        target.clone_from(&source);
        assert_eq!(target, [7, 8]);
        assert_eq!(target.len(), 2);
        assert_eq!(target.capacity(), 5);
        assert_eq!(target.as_ptr(), base);
    }

    #[test]
    fn clone_from_fills_spare_capacity_without_reallocating() {
        let source = DynamicArray::from([1, 2, 3, 4]);
        let mut target = DynamicArray::from([9]);
        target.reserve(6);
        let base = target.as_ptr();
        target.clone_from(&source);
        assert_eq!(target, [1, 2, 3, 4]);
        assert_eq!(target.capacity(), 6);
        assert_eq!(target.as_ptr(), base);
    }

    #[test]
    fn clone_from_larger_source_reallocates() {
        let source = DynamicArray::from([1, 2, 3, 4]);
        let mut target = DynamicArray::from([9, 9]);
        target.clone_from(&source);
        assert_eq!(target, source);
        assert_eq!(target.capacity(), 4);
    }

    #[test]
    fn equality_across_representations() {
        let array = DynamicArray::from([1, 2, 3]);
        assert_eq!(array, vec![1, 2, 3]);
        assert_eq!(array, &[1, 2, 3][..]);
        assert_ne!(array, DynamicArray::from([1, 2]));
    }

    #[test]
    fn hash_matches_slice_hash() {
        let array = DynamicArray::from([4u8, 5, 6]);
        let mut a = DefaultHasher::new();
        let mut b = DefaultHasher::new();
        array.hash(&mut a);
        [4u8, 5, 6][..].hash(&mut b);
        assert_eq!(a.finish(), b.finish());
    }

    #[test]
    fn debug_prints_like_a_list() {
        let array = DynamicArray::from(["x", "y"]);
        assert_eq!(format!("{array:?}"), r#"["x", "y"]"#);
    }

    #[test]
    fn collect_and_extend_follow_doubling() {
        let mut array: DynamicArray<u32> = (0..5).collect();
        assert_eq!(array.capacity(), 8);
        array.extend(&[5, 6, 7, 8]);
        assert_eq!(array.len(), 9);
        assert_eq!(array.capacity(), 16);
    }

    #[test]
    fn iteration_by_reference() {
        let mut array = DynamicArray::from([1, 2, 3]);
        for value in &mut array {
            *value *= 2;
        }
        let total: i32 = (&array).into_iter().sum();
        assert_eq!(total, 12);
    }

    #[test]
    fn from_slice_clones() {
        let source = vec![String::from("k")];
        let array = DynamicArray::from(source.as_slice());
        assert_eq!(array, source);
    }

    #[test]
    fn thread_safety_follows_element_type() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DynamicArray<String>>();
        assert_send_sync::<DynamicArray<()>>();

        let array = DynamicArray::from([1, 2, 3]);
        let total = std::thread::spawn(move || array.iter().sum::<i32>())
            .join()
            .unwrap();
        assert_eq!(total, 6);
    }
}
