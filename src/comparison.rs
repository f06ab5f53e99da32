//! School comparison list management.
//!
//! Holds the ordered set of schools marked for side-by-side comparison and
//! writes every change through an injected store so the selection survives
//! restarts.

use std::collections::HashSet;

use anyhow::Result;

/// Maximum number of schools that can be compared at once.
pub const MAX_COMPARE: usize = 5;

/// Persistence port for the comparison list.
pub trait ComparisonStore {
    /// Load the saved list. Missing or unreadable state loads as empty.
    fn load(&self) -> Vec<String>;

    /// Replace the saved list with `ids`, in order.
    fn save(&self, ids: &[String]) -> Result<()>;
}

/// Ordered, deduplicated set of RCDTS codes marked for comparison, capped
/// at [`MAX_COMPARE`] entries. Every mutation persists the full list
/// synchronously.
pub struct ComparisonList {
    ids: Vec<String>,
    store: Box<dyn ComparisonStore>,
}

impl ComparisonList {
    /// Load the persisted selection through `store`.
    pub fn load(store: Box<dyn ComparisonStore>) -> Self {
        let mut ids = store.load();
        // Keep first occurrences only, then enforce the cap
        let mut seen = HashSet::new();
        ids.retain(|id| seen.insert(id.clone()));
        ids.truncate(MAX_COMPARE);
        ComparisonList { ids, store }
    }

    /// Append `rcdts` if absent and below capacity. Returns whether the
    /// list changed; a rejected add is a no-op, not an error.
    pub fn add(&mut self, rcdts: &str) -> Result<bool> {
        if self.contains(rcdts) || !self.can_add_more() {
            return Ok(false);
        }
        self.ids.push(rcdts.to_string());
        self.persist()?;
        Ok(true)
    }

    /// Remove `rcdts` if present. Returns whether the list changed.
    pub fn remove(&mut self, rcdts: &str) -> Result<bool> {
        let before = self.ids.len();
        self.ids.retain(|id| id != rcdts);
        if self.ids.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Empty the list.
    pub fn clear(&mut self) -> Result<()> {
        self.ids.clear();
        self.persist()
    }

    pub fn contains(&self, rcdts: &str) -> bool {
        self.ids.iter().any(|id| id == rcdts)
    }

    /// True while the list is below capacity.
    pub fn can_add_more(&self) -> bool {
        self.ids.len() < MAX_COMPARE
    }

    /// Selected RCDTS codes in insertion order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn persist(&self) -> Result<()> {
        self.store.save(&self.ids)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    /// In-memory store backed by a shared cell so tests can observe writes.
    #[derive(Default, Clone)]
    struct MemoryStore {
        saved: Rc<RefCell<Vec<String>>>,
    }

    impl ComparisonStore for MemoryStore {
        fn load(&self) -> Vec<String> {
            self.saved.borrow().clone()
        }

        fn save(&self, ids: &[String]) -> Result<()> {
            *self.saved.borrow_mut() = ids.to_vec();
            Ok(())
        }
    }

    fn empty_list() -> (ComparisonList, MemoryStore) {
        let store = MemoryStore::default();
        let list = ComparisonList::load(Box::new(store.clone()));
        (list, store)
    }

    #[test]
    fn test_add_and_remove() {
        let (mut list, _) = empty_list();

        assert!(list.add("15-016-2990-25-0001").unwrap());
        assert!(list.contains("15-016-2990-25-0001"));
        assert_eq!(list.len(), 1);

        assert!(list.remove("15-016-2990-25-0001").unwrap());
        assert!(!list.contains("15-016-2990-25-0001"));
        assert!(list.is_empty());
    }

    #[test]
    fn test_add_is_idempotent() {
        let (mut list, _) = empty_list();

        assert!(list.add("a").unwrap());
        assert!(!list.add("a").unwrap());
        assert_eq!(list.ids(), ["a"]);
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let (mut list, _) = empty_list();

        for id in ["c", "a", "b"] {
            list.add(id).unwrap();
        }
        assert_eq!(list.ids(), ["c", "a", "b"]);
    }

    #[test]
    fn test_add_beyond_capacity_is_noop() {
        let (mut list, _) = empty_list();

        for id in ["a", "b", "c", "d", "e"] {
            assert!(list.add(id).unwrap());
        }
        assert!(!list.can_add_more());

        assert!(!list.add("f").unwrap());
        assert_eq!(list.len(), 5);
        assert_eq!(list.ids(), ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let (mut list, _) = empty_list();

        list.add("a").unwrap();
        assert!(!list.remove("z").unwrap());
        assert_eq!(list.ids(), ["a"]);
    }

    #[test]
    fn test_clear() {
        let (mut list, store) = empty_list();

        list.add("a").unwrap();
        list.add("b").unwrap();
        list.clear().unwrap();

        assert!(list.is_empty());
        assert!(store.saved.borrow().is_empty());
    }

    #[test]
    fn test_every_mutation_persists() {
        let (mut list, store) = empty_list();

        list.add("a").unwrap();
        assert_eq!(*store.saved.borrow(), ["a"]);

        list.add("b").unwrap();
        assert_eq!(*store.saved.borrow(), ["a", "b"]);

        list.remove("a").unwrap();
        assert_eq!(*store.saved.borrow(), ["b"]);
    }

    #[test]
    fn test_rejected_add_does_not_persist() {
        let (mut list, store) = empty_list();

        for id in ["a", "b", "c", "d", "e"] {
            list.add(id).unwrap();
        }
        let saved_before = store.saved.borrow().clone();

        list.add("f").unwrap();
        assert_eq!(*store.saved.borrow(), saved_before);
    }

    #[test]
    fn test_round_trip_through_store() {
        let store = MemoryStore::default();

        let mut list = ComparisonList::load(Box::new(store.clone()));
        list.add("b").unwrap();
        list.add("a").unwrap();
        list.add("c").unwrap();

        let reloaded = ComparisonList::load(Box::new(store.clone()));
        assert_eq!(reloaded.ids(), ["b", "a", "c"]);
    }

    #[test]
    fn test_load_truncates_overlong_state() {
        let store = MemoryStore::default();
        *store.saved.borrow_mut() = ["a", "b", "c", "d", "e", "f", "g"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let list = ComparisonList::load(Box::new(store));
        assert_eq!(list.ids(), ["a", "b", "c", "d", "e"]);
        assert!(!list.can_add_more());
    }

    #[test]
    fn test_load_drops_duplicates() {
        let store = MemoryStore::default();
        *store.saved.borrow_mut() = ["a", "b", "a", "c"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let list = ComparisonList::load(Box::new(store));
        assert_eq!(list.ids(), ["a", "b", "c"]);
    }
}
