//! Generation-checked arena tests.
//!
//! Division trees are rebuilt wholesale on every description change, so the
//! arena must hand out fresh generations for reused slots and reject stale
//! handles instead of aliasing new nodes.

use trellis_core::alloc::{Arena, IndexSlot};

#[test]
fn test_insert_and_get() {
    let mut arena = Arena::new();

    let first = arena.insert("left");
    let second = arena.insert("right");

    assert_eq!(arena.get(first), Some(&"left"));
    assert_eq!(arena.get(second), Some(&"right"));
    assert_eq!(arena.len(), 2);
}

#[test]
fn test_get_mut() {
    let mut arena = Arena::new();

    let idx = arena.insert(30);
    if let Some(value) = arena.get_mut(idx) {
        *value = 70;
    }

    assert_eq!(arena.get(idx), Some(&70));
}

#[test]
fn test_unknown_handle_returns_none() {
    let arena = Arena::<i32>::new();
    assert_eq!(arena.get(IndexSlot::new(0, 999)), None);
}

#[test]
fn test_generation_increments_on_reuse() {
    let mut arena = Arena::new();

    let idx0 = arena.insert(0);
    arena.remove(idx0);
    let idx1 = arena.insert(1);
    arena.remove(idx1);
    let idx2 = arena.insert(2);

    assert_eq!(idx2.index(), idx0.index());
    assert_eq!(idx2.generation(), 2);
    assert_eq!(arena.get(idx0), None);
    assert_eq!(arena.get(idx1), None);
    assert_eq!(arena.get(idx2), Some(&2));
}

#[test]
fn test_stale_handle_operations_are_inert() {
    let mut arena = Arena::new();

    let idx = arena.insert(42);
    assert_eq!(arena.remove(idx), Some(42));

    assert!(arena.get_mut(idx).is_none());
    assert_eq!(arena.remove(idx), None);
    assert!(!arena.contains(idx));
    assert!(arena.is_empty());
}

#[test]
fn test_iteration_yields_live_handles() {
    let mut arena = Arena::new();

    arena.insert(10);
    let middle = arena.insert(20);
    arena.insert(30);
    arena.remove(middle);

    let live: Vec<_> = arena.iter().collect();
    assert_eq!(live.len(), 2);
    for (slot, value) in live {
        assert_eq!(arena.get(slot), Some(value));
    }
}

#[test]
fn test_many_removals_and_reuses() {
    let mut arena = Arena::new();
    let indices: Vec<_> = (0..100).map(|i| arena.insert(i)).collect();

    for idx in indices.iter().step_by(2) {
        arena.remove(*idx);
    }
    assert_eq!(arena.len(), 50);

    for i in 100..150 {
        arena.insert(i);
    }
    assert_eq!(arena.len(), 100);
}
