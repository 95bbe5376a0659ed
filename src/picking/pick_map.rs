//! Global pick-index allocation and resolution.

use std::collections::BTreeMap;

use crate::structure::StructureId;

/// Maps global pick indices to `(structure, local index)` pairs.
///
/// Each registered structure owns one contiguous range
/// `[start, start + count)`. Ranges come from a counter that starts at 1
/// (0 is background) and only grows, so an index is never handed out twice
/// within a host's lifetime.
#[derive(Debug, Clone)]
pub struct PickMap {
    /// Range start → (owner, element count).
    ranges: BTreeMap<u64, (StructureId, u64)>,
    next_index: u64,
}

impl Default for PickMap {
    fn default() -> Self {
        Self::new()
    }
}

impl PickMap {
    /// Create an empty map. The first allocated index is 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ranges: BTreeMap::new(),
            next_index: 1,
        }
    }

    /// Reserve `count` consecutive indices for `owner`, returning the first.
    ///
    /// Returns `None` for an empty request or when the index space is
    /// exhausted.
    pub fn allocate(&mut self, owner: StructureId, count: u64) -> Option<u64> {
        if count == 0 {
            return None;
        }
        let start = self.next_index;
        self.next_index = start.checked_add(count)?;
        let _ = self.ranges.insert(start, (owner, count));
        Some(start)
    }

    /// Drop every range owned by `owner`.
    pub fn release(&mut self, owner: StructureId) {
        self.ranges.retain(|_, (id, _)| *id != owner);
    }

    /// Resolve a global index to its owner and local element index.
    ///
    /// Returns `None` for the background index 0 and for indices outside
    /// every live range.
    #[must_use]
    pub fn resolve(&self, global: u64) -> Option<(StructureId, u64)> {
        if global == 0 {
            return None;
        }
        let (&start, &(owner, count)) =
            self.ranges.range(..=global).next_back()?;
        let local = global - start;
        (local < count).then_some((owner, local))
    }

    /// Number of live ranges.
    #[must_use]
    pub fn range_count(&self) -> usize {
        self.ranges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_are_contiguous_from_one() {
        let mut map = PickMap::new();
        assert_eq!(map.allocate(StructureId(1), 10), Some(1));
        assert_eq!(map.allocate(StructureId(2), 5), Some(11));
        assert_eq!(map.resolve(1), Some((StructureId(1), 0)));
        assert_eq!(map.resolve(10), Some((StructureId(1), 9)));
        assert_eq!(map.resolve(11), Some((StructureId(2), 0)));
        assert_eq!(map.resolve(16), None);
    }

    #[test]
    fn background_never_resolves() {
        let mut map = PickMap::new();
        let _ = map.allocate(StructureId(1), 3);
        assert_eq!(map.resolve(0), None);
    }

    #[test]
    fn released_indices_are_not_reused() {
        let mut map = PickMap::new();
        let _ = map.allocate(StructureId(1), 4);
        map.release(StructureId(1));
        assert_eq!(map.resolve(2), None);
        assert_eq!(map.allocate(StructureId(2), 4), Some(5));
        assert_eq!(map.range_count(), 1);
    }

    #[test]
    fn empty_requests_allocate_nothing() {
        let mut map = PickMap::new();
        assert_eq!(map.allocate(StructureId(1), 0), None);
        assert_eq!(map.allocate(StructureId(1), 1), Some(1));
    }

    #[test]
    fn exhausted_space_fails_cleanly() {
        let mut map = PickMap::new();
        assert_eq!(map.allocate(StructureId(1), u64::MAX), None);
        assert_eq!(map.allocate(StructureId(1), 2), Some(1));
    }
}
