use crate::profiling::profile_function;
use std::num::NonZeroU64;

/// Generation-checked handle into an [`Arena`].
///
/// The upper 32 bits hold the slot generation, the lower 32 bits the slot
/// index plus one, so the handle is never zero and `Option<IndexSlot>` costs
/// nothing extra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IndexSlot(NonZeroU64);

impl IndexSlot {
    pub fn new(generation: u32, idx: u32) -> Self {
        Self(NonZeroU64::MIN.saturating_add(((generation as u64) << 32) | idx as u64))
    }

    pub fn generation(&self) -> u32 {
        (self.0.get() >> 32) as u32
    }

    pub fn index(&self) -> u32 {
        (self.0.get() & u32::MAX as u64) as u32 - 1
    }
}

struct Entry<T> {
    generation: u32,
    data: Option<T>,
}

/// Slot arena whose handles go stale once their slot is freed.
///
/// Lookups through a stale handle return `None` instead of aliasing whatever
/// now lives in the reused slot.
pub struct Arena<T> {
    vec: Vec<Entry<T>>,
    free: Vec<u32>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub const fn new() -> Self {
        Self {
            vec: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn insert(&mut self, data: T) -> IndexSlot {
        profile_function!();
        if let Some(idx) = self.free.pop()
            && let Some(entry) = self.vec.get_mut(idx as usize)
        {
            entry.data = Some(data);
            return IndexSlot::new(entry.generation, idx);
        }
        let idx = self.vec.len() as u32;
        self.vec.push(Entry {
            generation: 0,
            data: Some(data),
        });
        IndexSlot::new(0, idx)
    }

    fn entry(&self, slot: IndexSlot) -> Option<&Entry<T>> {
        self.vec
            .get(slot.index() as usize)
            .filter(|entry| entry.generation == slot.generation())
    }

    pub fn get(&self, slot: IndexSlot) -> Option<&T> {
        self.entry(slot).and_then(|entry| entry.data.as_ref())
    }

    pub fn get_mut(&mut self, slot: IndexSlot) -> Option<&mut T> {
        self.vec
            .get_mut(slot.index() as usize)
            .filter(|entry| entry.generation == slot.generation())
            .and_then(|entry| entry.data.as_mut())
    }

    pub fn contains(&self, slot: IndexSlot) -> bool {
        self.get(slot).is_some()
    }

    /// Free the slot and bump its generation. Stale handles yield `None`.
    pub fn remove(&mut self, slot: IndexSlot) -> Option<T> {
        profile_function!();
        let index = slot.index();
        let entry = self
            .vec
            .get_mut(index as usize)
            .filter(|entry| entry.generation == slot.generation())?;
        let data = entry.data.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(index);
        Some(data)
    }

    pub fn len(&self) -> usize {
        self.vec.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (IndexSlot, &T)> + '_ {
        self.vec.iter().enumerate().filter_map(|(idx, entry)| {
            entry
                .data
                .as_ref()
                .map(|data| (IndexSlot::new(entry.generation, idx as u32), data))
        })
    }
}

static_assertions::assert_eq_size!(IndexSlot, Option<IndexSlot>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_insert() {
        let mut arena = Arena::<u8>::new();
        let idx = arena.insert(15);
        assert_eq!(idx.generation(), 0);
        assert_eq!(idx.index(), 0);
        assert_eq!(arena.get(idx), Some(&15));
    }

    #[test]
    fn test_arena_stale_handle() {
        let mut arena = Arena::<u8>::new();
        let idx = arena.insert(15);
        assert_eq!(arena.remove(idx), Some(15));
        assert_eq!(arena.get(idx), None);
        assert_eq!(arena.remove(idx), None);
    }

    #[test]
    fn test_arena_slot_reuse() {
        let mut arena = Arena::<u8>::new();
        let idx = arena.insert(15);
        arena.remove(idx);
        let new_idx = arena.insert(45);
        assert_eq!(idx.index(), new_idx.index());
        assert_ne!(idx.generation(), new_idx.generation());
        assert_eq!(arena.get(idx), None);
        assert_eq!(arena.get(new_idx), Some(&45));
    }

    #[test]
    fn test_arena_iter_skips_free() {
        let mut arena = Arena::<u8>::new();
        let slots: Vec<_> = (0..100).map(|i| arena.insert(i)).collect();
        arena.remove(slots[0]);
        arena.remove(slots[1]);
        let collected: Vec<_> = arena.iter().map(|(_, v)| *v).collect();
        assert_eq!(collected.len(), 98);
        assert_eq!(arena.len(), 98);
        for (offset, value) in collected.iter().enumerate() {
            assert_eq!(*value as usize, offset + 2);
        }
    }
}
