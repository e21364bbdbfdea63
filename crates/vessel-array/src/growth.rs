//! Capacity growth policy.

use vessel_raw::AllocError;

/// How a full array picks its next capacity.
///
/// The array multiplies its current capacity by [`factor`](Self::factor),
/// never going below [`min_capacity`](Self::min_capacity). The only policy
/// in use is [`DOUBLING`](Self::DOUBLING): the capacity runs 0, 1, 2, 4,
/// 8, ... and `n` appends from empty cost O(n) in total.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GrowthPolicy {
    factor: usize,
    min_capacity: usize,
}

impl GrowthPolicy {
    /// Default growth factor.
    pub const DEFAULT_FACTOR: usize = 2;

    /// Default floor for the first non-empty allocation.
    pub const DEFAULT_MIN_CAPACITY: usize = 1;

    /// The policy used by [`DynamicArray`](crate::DynamicArray).
    pub const DOUBLING: Self = Self {
        factor: Self::DEFAULT_FACTOR,
        min_capacity: Self::DEFAULT_MIN_CAPACITY,
    };

    /// Multiplier applied to the current capacity.
    pub const fn factor(&self) -> usize {
        self.factor
    }

    /// Smallest capacity a grown array ever has.
    pub const fn min_capacity(&self) -> usize {
        self.min_capacity
    }

    /// Capacity to grow to when an array of capacity `current` is full.
    ///
    /// Returns `AllocError::CapacityOverflow` if the multiplication
    /// overflows `usize`.
    pub fn next_capacity(&self, current: usize) -> Result<usize, AllocError> {
        current
            .checked_mul(self.factor)
            .map(|grown| grown.max(self.min_capacity))
            .ok_or(AllocError::CapacityOverflow {
                requested: usize::MAX,
            })
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::DOUBLING
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubling_sequence_from_empty() {
        let policy = GrowthPolicy::default();
        let mut cap = 0;
        let mut seen = Vec::new();
        for _ in 0..5 {
            cap = policy.next_capacity(cap).unwrap();
            seen.push(cap);
        }
        assert_eq!(seen, [1, 2, 4, 8, 16]);
    }

    #[test]
    fn arrays_grow_by_the_doubling_policy() {
        assert_eq!(crate::DynamicArray::<u8>::GROWTH, GrowthPolicy::default());
        assert_eq!(GrowthPolicy::DOUBLING.factor(), 2);
        assert_eq!(GrowthPolicy::DOUBLING.min_capacity(), 1);
    }

    #[test]
    fn overflow_is_reported() {
        let policy = GrowthPolicy::DOUBLING;
        assert!(matches!(
            policy.next_capacity(usize::MAX / 2 + 1),
            Err(AllocError::CapacityOverflow { .. })
        ));
    }

    #[test]
    fn min_capacity_applies_only_to_small_arrays() {
        let policy = GrowthPolicy {
            factor: 2,
            min_capacity: 8,
        };
        assert_eq!(policy.next_capacity(0).unwrap(), 8);
        assert_eq!(policy.next_capacity(3).unwrap(), 8);
        assert_eq!(policy.next_capacity(16).unwrap(), 32);
    }
}
