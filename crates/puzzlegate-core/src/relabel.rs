//! Compact-and-relabel maps for id-indexed collections.
//!
//! When entities are filtered out of a collection indexed by id, every
//! cross-reference to those ids has to be rewritten. [`Relabel`] captures the
//! old-to-new id mapping once so the entity list and all references to it can
//! be rewritten consistently.

/// A mapping from old ids to new, contiguous ids for the retained entities.
///
/// Retained ids keep their relative order.
///
/// # Examples
///
/// ```
/// use puzzlegate_core::Relabel;
///
/// let names = vec!["a", "b", "c", "d"];
/// let relabel = Relabel::retain(names.len(), |id| id != 1);
/// assert_eq!(relabel.get(0), Some(0));
/// assert_eq!(relabel.get(1), None);
/// assert_eq!(relabel.get(2), Some(1));
/// assert_eq!(relabel.compact(names), vec!["a", "c", "d"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relabel {
    map: Vec<Option<usize>>,
    retained: usize,
}

impl Relabel {
    /// Builds a relabeling of ids `0..len` that keeps the ids for which `keep` returns `true`.
    #[must_use]
    pub fn retain<F>(len: usize, mut keep: F) -> Self
    where
        F: FnMut(usize) -> bool,
    {
        let mut retained = 0;
        let map = (0..len)
            .map(|id| {
                keep(id).then(|| {
                    retained += 1;
                    retained - 1
                })
            })
            .collect();
        Self { map, retained }
    }

    /// Returns the new id of `old`, or `None` if it was dropped or is out of range.
    #[must_use]
    #[inline]
    pub fn get(&self, old: usize) -> Option<usize> {
        self.map.get(old).copied().flatten()
    }

    /// Returns the number of retained ids.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.retained
    }

    /// Returns `true` if no id was retained.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.retained == 0
    }

    /// Returns `true` if every id was retained.
    #[must_use]
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.retained == self.map.len()
    }

    /// Keeps the retained entries of an id-indexed collection, in order.
    ///
    /// # Panics
    ///
    /// Panics if `items` does not have one entry per old id.
    #[must_use]
    pub fn compact<T>(&self, items: Vec<T>) -> Vec<T> {
        assert_eq!(items.len(), self.map.len(), "collection length mismatch");
        items
            .into_iter()
            .zip(&self.map)
            .filter_map(|(item, new)| new.map(|_| item))
            .collect()
    }
}
