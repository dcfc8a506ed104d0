//! Per-key boolean memoization for expand/collapse style UI flags.

use std::collections::HashMap;
use std::hash::Hash;

/// Remembers a boolean flag per key, defaulting to `false` (collapsed).
///
/// Backing store for hierarchy expansion (keyed by entity) and
/// per-component section expansion (keyed by component type). Owners
/// clear the whole map when their context changes so flags never leak
/// between searches or between inspected entities.
#[derive(Debug)]
pub struct ToggleMap<K: Eq + Hash>(HashMap<K, bool>);

impl<K: Eq + Hash> Default for ToggleMap<K> {
    fn default() -> Self {
        Self(HashMap::new())
    }
}

impl<K: Eq + Hash> ToggleMap<K> {
    /// Current flag for `key`; absent keys read as collapsed.
    pub fn get(&self, key: &K) -> bool {
        self.0.get(key).copied().unwrap_or(false)
    }

    pub fn set(&mut self, key: K, value: bool) {
        self.0.insert(key, value);
    }

    /// Flip the flag for `key` and return the new value.
    pub fn toggle(&mut self, key: K) -> bool {
        let entry = self.0.entry(key).or_insert(false);
        *entry = !*entry;
        *entry
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_keys_read_collapsed() {
        let map: ToggleMap<u32> = ToggleMap::default();
        assert!(!map.get(&7));
    }

    #[test]
    fn toggle_flips_and_reports() {
        let mut map = ToggleMap::default();
        assert!(map.toggle(1));
        assert!(map.get(&1));
        assert!(!map.toggle(1));
        assert!(!map.get(&1));
    }

    #[test]
    fn clear_resets_everything_to_default() {
        let mut map = ToggleMap::default();
        map.set("a", true);
        map.set("b", true);
        map.clear();
        assert!(map.is_empty());
        assert!(!map.get(&"a"));
    }
}
