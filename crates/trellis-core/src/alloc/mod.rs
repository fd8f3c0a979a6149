//! Allocation and collection types shared across Trellis.
//!
//! This module provides:
//! - Re-exports of hash collections using AHash
//! - [`Arena`], a generation-checked slot arena for tree nodes

pub mod arena;

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};
pub use arena::{Arena, IndexSlot};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashmap_ahash() {
        let mut map = HashMap::new();
        map.insert("left", 30);
        assert_eq!(map.get("left"), Some(&30));
    }

    #[test]
    fn test_hashset_ahash() {
        let mut set = HashSet::new();
        set.insert("pane");
        assert!(set.contains("pane"));
    }
}
