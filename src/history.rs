//! Bounded "recently viewed" list. Lives for one session only.

use std::collections::VecDeque;

use crate::models::name_key;

pub const DEFAULT_CAPACITY: usize = 5;

/// Fixed-capacity ring of distinct recipe names, oldest first and most recent
/// last. Names are compared case-insensitively.
#[derive(Debug, Clone)]
pub struct RecentlyViewed {
    names: VecDeque<String>,
    capacity: usize,
}

impl Default for RecentlyViewed {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl RecentlyViewed {
    pub fn new() -> Self {
        Self::default()
    }

    /// A capacity of zero is bumped to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            names: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Mark `name` as the most recent view. A name already in the list moves
    /// to the end; otherwise the oldest entry is evicted once full.
    pub fn record(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        self.forget(name);
        if self.names.len() == self.capacity {
            self.names.pop_front();
        }
        self.names.push_back(name.to_string());
    }

    /// Follow a recipe rename without changing its place in the list.
    pub fn rename(&mut self, old: &str, new: &str) {
        let key = name_key(old);
        if let Some(entry) = self.names.iter_mut().find(|entry| name_key(entry) == key) {
            *entry = new.trim().to_string();
        }
    }

    /// Drop `name` from the list, if present.
    pub fn remove(&mut self, name: &str) {
        self.forget(name);
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn iter_recent_first(&self) -> impl Iterator<Item = &str> {
        self.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    fn forget(&mut self, name: &str) {
        let key = name_key(name);
        self.names.retain(|entry| name_key(entry) != key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(history: &RecentlyViewed) -> Vec<&str> {
        history.iter().collect()
    }

    #[test]
    fn test_keeps_last_five_distinct() {
        let mut history = RecentlyViewed::new();
        for name in ["a", "b", "c", "d", "e", "f", "g"] {
            history.record(name);
        }

        assert_eq!(history.len(), 5);
        assert_eq!(names(&history), vec!["c", "d", "e", "f", "g"]);
        assert_eq!(
            history.iter_recent_first().collect::<Vec<_>>(),
            vec!["g", "f", "e", "d", "c"]
        );
    }

    #[test]
    fn test_revisit_moves_to_end_without_duplicating() {
        let mut history = RecentlyViewed::new();
        history.record("Pasta");
        history.record("Tea");
        history.record("pasta");

        assert_eq!(names(&history), vec!["Tea", "pasta"]);
    }

    #[test]
    fn test_rename_and_remove_follow_catalog() {
        let mut history = RecentlyViewed::new();
        history.record("Tea");
        history.record("Pasta");

        history.rename("tea", "Green Tea");
        assert_eq!(names(&history), vec!["Green Tea", "Pasta"]);

        history.remove("PASTA");
        assert_eq!(names(&history), vec!["Green Tea"]);

        history.rename("missing", "ignored");
        assert_eq!(names(&history), vec!["Green Tea"]);
    }

    #[test]
    fn test_blank_names_are_ignored() {
        let mut history = RecentlyViewed::new();
        history.record("  ");
        assert!(history.is_empty());
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut history = RecentlyViewed::with_capacity(0);
        history.record("a");
        history.record("b");

        assert_eq!(history.capacity(), 1);
        assert_eq!(names(&history), vec!["b"]);
    }
}
