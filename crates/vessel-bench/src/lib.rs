//! Benchmark workloads for the Vessel containers.
//!
//! Each workload runs the same sequence of operations on a
//! [`DynamicArray`] so the benches in `benches/` can compare it against
//! `std::vec::Vec` on equal terms:
//!
//! - [`push_sequence`]: append `n` values starting from empty
//! - [`front_inserts`]: insert `n` values at index 0
//! - [`drain_from_middle`]: erase from the middle until empty

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use vessel_array::DynamicArray;

/// Append `0..n` to an empty array.
pub fn push_sequence(n: usize) -> DynamicArray<u64> {
    let mut array = DynamicArray::new();
    for i in 0..n as u64 {
        array.push_back(i);
    }
    array
}

/// Insert `0..n` at the front, so every insert shifts the whole array.
pub fn front_inserts(n: usize) -> DynamicArray<u64> {
    let mut array = DynamicArray::new();
    for i in 0..n as u64 {
        array.insert(0, i);
    }
    array
}

/// Erase the middle element until the array is empty. Returns the number
/// of erasures.
pub fn drain_from_middle(mut array: DynamicArray<u64>) -> usize {
    let mut erased = 0;
    while !array.is_empty() {
        array.erase(array.len() / 2);
        erased += 1;
    }
    erased
}

/// Heap-owning elements of `width` bytes, for workloads where relocation
/// moves handles rather than plain integers.
pub fn string_payloads(n: usize, width: usize) -> DynamicArray<String> {
    DynamicArray::from_fn(n, |i| {
        let mut s = i.to_string();
        s.extend(std::iter::repeat('x').take(width.saturating_sub(s.len())));
        s
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workloads_produce_expected_shapes() {
        assert_eq!(push_sequence(5), [0, 1, 2, 3, 4]);
        assert_eq!(front_inserts(3), [2, 1, 0]);
        assert_eq!(drain_from_middle(push_sequence(7)), 7);

        let strings = string_payloads(3, 4);
        assert_eq!(strings, ["0xxx", "1xxx", "2xxx"]);
    }
}
