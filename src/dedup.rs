//! Deduplication for extracted hash collections
//!
//! Duplicate removal is an explicit policy. With it disabled every token is
//! kept, including repeats.

use ahash::RandomState;
use hashbrown::HashSet;

/// In-memory HashSet-based deduplicator
pub struct MemoryDeduplicator {
    set: HashSet<String, RandomState>,
}

impl MemoryDeduplicator {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            set: HashSet::with_capacity_and_hasher(capacity, RandomState::new()),
        }
    }

    /// Check if item is unique and add it if so
    /// Returns true if the item is unique (not seen before)
    pub fn insert(&mut self, item: &str) -> bool {
        if self.set.contains(item) {
            return false;
        }
        self.set.insert(item.to_string())
    }

    /// Get the number of unique items
    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

/// Drop repeats from `items`, keeping the first occurrence of each
///
/// Returns the number of items removed.
pub fn dedup_unsorted(items: &mut Vec<String>) -> usize {
    let before = items.len();
    let mut seen = MemoryDeduplicator::with_capacity(items.len());
    items.retain(|item| seen.insert(item));
    log::debug!("{} unique of {} hashes", seen.len(), before);
    before - items.len()
}

/// Collapse runs of equal items in an already sorted list
///
/// Returns the number of items removed.
pub fn dedup_sorted(items: &mut Vec<String>) -> usize {
    let before = items.len();
    items.dedup();
    before - items.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_memory_deduplicator() {
        let mut dedup = MemoryDeduplicator::with_capacity(4);
        assert!(dedup.is_empty());

        assert!(dedup.insert("D41D8CD98F00B204E9800998ECF8427E"));
        assert!(dedup.insert("0CC175B9C0F1B6A831C399E269772661"));
        assert!(!dedup.insert("D41D8CD98F00B204E9800998ECF8427E")); // Duplicate

        assert_eq!(dedup.len(), 2);
    }

    #[test]
    fn test_dedup_unsorted_keeps_first() {
        let mut items = owned(&["FF", "00", "FF", "AA", "00"]);

        assert_eq!(dedup_unsorted(&mut items), 2);
        assert_eq!(items, vec!["FF", "00", "AA"]);
    }

    #[test]
    fn test_dedup_sorted() {
        let mut items = owned(&["00", "00", "AA", "FF", "FF", "FF"]);

        assert_eq!(dedup_sorted(&mut items), 3);
        assert_eq!(items, vec!["00", "AA", "FF"]);
    }
}
