//! A set of small cell values, used for pencil-mark candidates.
//!
//! # Examples
//!
//! ```
//! use puzzlegate_core::ValueSet;
//!
//! let mut marks = ValueSet::new();
//! marks.insert(1);
//! marks.insert(4);
//! assert!(!marks.toggle(4));
//! assert_eq!(marks.iter().collect::<Vec<_>>(), vec![1]);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A set of values in `1..=16`, stored as a 16-bit mask.
///
/// Bit `n - 1` represents value `n`.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueSet {
    bits: u16,
}

impl ValueSet {
    /// Largest value the set can hold.
    pub const MAX_VALUE: u8 = 16;

    /// The empty set.
    pub const EMPTY: Self = Self { bits: 0 };

    /// Creates an empty set.
    #[must_use]
    #[inline]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Creates the set `{1, ..., max}`.
    ///
    /// # Panics
    ///
    /// Panics if `max` exceeds [`ValueSet::MAX_VALUE`].
    #[must_use]
    pub fn full(max: u8) -> Self {
        assert!(max <= Self::MAX_VALUE, "Value must be at most 16, got {max}");
        let bits = if max == Self::MAX_VALUE {
            u16::MAX
        } else {
            (1u16 << max) - 1
        };
        Self { bits }
    }

    #[inline]
    fn bit(value: u8) -> u16 {
        assert!(
            (1..=Self::MAX_VALUE).contains(&value),
            "Value must be between 1 and 16, got {value}"
        );
        1 << (value - 1)
    }

    /// Returns the raw bit mask.
    #[must_use]
    #[inline]
    pub const fn bits(self) -> u16 {
        self.bits
    }

    /// Adds `value`; returns `true` if it was not present.
    #[inline]
    pub fn insert(&mut self, value: u8) -> bool {
        let bit = Self::bit(value);
        let added = self.bits & bit == 0;
        self.bits |= bit;
        added
    }

    /// Removes `value`; returns `true` if it was present.
    #[inline]
    pub fn remove(&mut self, value: u8) -> bool {
        let bit = Self::bit(value);
        let present = self.bits & bit != 0;
        self.bits &= !bit;
        present
    }

    /// Flips membership of `value`; returns `true` if it is now present.
    #[inline]
    pub fn toggle(&mut self, value: u8) -> bool {
        self.bits ^= Self::bit(value);
        self.contains(value)
    }

    /// Returns `true` if `value` is in the set.
    #[must_use]
    #[inline]
    pub fn contains(self, value: u8) -> bool {
        self.bits & Self::bit(value) != 0
    }

    /// Returns the number of values in the set.
    #[must_use]
    #[inline]
    pub const fn len(self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Returns `true` if the set is empty.
    #[must_use]
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Iterates the values in ascending order.
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (1..=Self::MAX_VALUE).filter(move |&v| self.bits & (1 << (v - 1)) != 0)
    }
}

impl FromIterator<u8> for ValueSet {
    fn from_iter<T: IntoIterator<Item = u8>>(iter: T) -> Self {
        let mut set = Self::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl fmt::Debug for ValueSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
