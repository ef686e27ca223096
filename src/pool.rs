//! Fixed-capacity association table for state that must outlive a frame.
//!
//! Lookup is a linear scan; pools hold a few dozen entries. When full, the
//! least recently touched slot is recycled, so a pool never fails.

use crate::id::Id;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolItem {
    pub id: Option<Id>,
    pub last_update: u64,
}

#[derive(Debug, Clone)]
pub struct Pool {
    items: Vec<PoolItem>,
}

impl Pool {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "pool capacity must be non-zero");
        Self {
            items: vec![PoolItem::default(); capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.items.len()
    }

    pub fn items(&self) -> &[PoolItem] {
        &self.items
    }

    /// Slot index holding `id`, if any.
    pub fn get(&self, id: Id) -> Option<usize> {
        self.items.iter().position(|item| item.id == Some(id))
    }

    /// Claims the slot with the oldest `last_update` (lowest index on ties) for `id`.
    pub fn init(&mut self, id: Id, tick: u64) -> usize {
        let mut oldest = u64::MAX;
        let mut index = 0;
        for (i, item) in self.items.iter().enumerate() {
            if item.last_update < oldest {
                oldest = item.last_update;
                index = i;
            }
        }
        if let Some(evicted) = self.items[index].id {
            tracing::debug!(slot = index, evicted = evicted.0, claimed = id.0, "pool slot recycled");
        }
        self.items[index].id = Some(id);
        self.update(index, tick);
        index
    }

    pub fn update(&mut self, index: usize, tick: u64) {
        self.items[index].last_update = tick;
    }

    /// Forgets the slot so that it is the first candidate for reuse.
    pub fn clear(&mut self, index: usize) {
        self.items[index] = PoolItem::default();
    }
}
