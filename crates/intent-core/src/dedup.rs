//! Bounded set of recently seen dedupe keys.

use std::collections::HashSet;

/// Remembers dedupe keys until the set outgrows its capacity, at which point
/// it is emptied in one go. Events seen before a clear may be delivered again
/// afterwards.
#[derive(Debug, Clone)]
pub struct DedupSet {
	seen: HashSet<String>,
	capacity: usize,
}

impl DedupSet {
	pub fn new(capacity: usize) -> Self {
		Self {
			seen: HashSet::new(),
			capacity,
		}
	}

	/// Records `key`. Returns `false` if it had already been seen.
	pub fn check_and_insert(&mut self, key: &str) -> bool {
		if self.seen.contains(key) {
			return false;
		}
		self.seen.insert(key.to_string())
	}

	pub fn len(&self) -> usize {
		self.seen.len()
	}

	pub fn is_empty(&self) -> bool {
		self.seen.is_empty()
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}

	/// Empties the set if it holds more than `capacity` keys and returns how
	/// many were dropped.
	pub fn clear_if_over(&mut self) -> Option<usize> {
		if self.seen.len() <= self.capacity {
			return None;
		}
		let size = self.seen.len();
		self.seen.clear();
		Some(size)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_second_sighting_rejected() {
		let mut dedup = DedupSet::new(10);
		assert!(dedup.check_and_insert("0xaa:0"));
		assert!(!dedup.check_and_insert("0xaa:0"));
		assert!(dedup.check_and_insert("0xaa:1"));
		assert_eq!(dedup.len(), 2);
	}

	#[test]
	fn test_clear_only_past_capacity() {
		let mut dedup = DedupSet::new(2);
		dedup.check_and_insert("a");
		dedup.check_and_insert("b");
		assert_eq!(dedup.clear_if_over(), None);

		dedup.check_and_insert("c");
		assert_eq!(dedup.clear_if_over(), Some(3));
		assert!(dedup.is_empty());
		assert!(dedup.check_and_insert("a"));
	}
}
