//! # Entity Pool
//!
//! Reusable storage for transient entities (creatures, effects).
//!
//! Slots are handed out from a free-list of indices, so both `acquire` and
//! `release` are O(1). When every slot is in use the pool grows by one slot;
//! it never shrinks.

use tracing::debug;

/// Anything that can live in an [`EntityPool`].
///
/// `reset` puts the value back into its canonical inactive state. The
/// default implementation replaces it with `Default::default()`.
pub trait Poolable: Default {
    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Handle to a pooled entity.
///
/// The generation is bumped every time the slot is released, so a handle
/// kept past release (e.g. inside a scheduled event) no longer resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PoolHandle {
    index: usize,
    generation: u32,
}

impl PoolHandle {
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug)]
struct Slot<T> {
    value: T,
    active: bool,
    generation: u32,
}

#[derive(Debug)]
pub struct EntityPool<T: Poolable> {
    slots: Vec<Slot<T>>,
    /// Indices of inactive slots; the next one to hand out is on top.
    free: Vec<usize>,
    active_count: usize,
}

impl<T: Poolable> EntityPool<T> {
    /// Create a pool with `prewarm` inactive slots.
    pub fn new(prewarm: usize) -> Self {
        let slots = (0..prewarm)
            .map(|_| Slot { value: T::default(), active: false, generation: 0 })
            .collect();
        Self {
            slots,
            free: (0..prewarm).rev().collect(),
            active_count: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn active_count(&self) -> usize {
        self.active_count
    }

    /// Mark a slot active and return its handle. Never fails: an exhausted
    /// pool allocates a fresh slot.
    pub fn acquire(&mut self) -> PoolHandle {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot { value: T::default(), active: false, generation: 0 });
                debug!(capacity = self.slots.len(), "entity pool grew");
                self.slots.len() - 1
            }
        };
        let slot = &mut self.slots[index];
        slot.active = true;
        self.active_count += 1;
        PoolHandle { index, generation: slot.generation }
    }

    /// Reset the entity and return its slot to the free-list.
    ///
    /// Returns `false` without touching anything if the handle is stale or
    /// the slot is already inactive.
    pub fn release(&mut self, handle: PoolHandle) -> bool {
        let Some(slot) = self.slots.get_mut(handle.index) else {
            return false;
        };
        if !slot.active || slot.generation != handle.generation {
            return false;
        }
        slot.value.reset();
        slot.active = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.active_count -= 1;
        true
    }

    /// Release every active entity.
    pub fn release_all(&mut self) {
        let handles: Vec<PoolHandle> = self.handles().collect();
        for handle in handles {
            self.release(handle);
        }
    }

    pub fn is_active(&self, handle: PoolHandle) -> bool {
        self.get(handle).is_some()
    }

    pub fn get(&self, handle: PoolHandle) -> Option<&T> {
        self.slots
            .get(handle.index)
            .filter(|s| s.active && s.generation == handle.generation)
            .map(|s| &s.value)
    }

    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index)
            .filter(|s| s.active && s.generation == handle.generation)
            .map(|s| &mut s.value)
    }

    /// Handles of all active entities in slot order.
    pub fn handles(&self) -> impl Iterator<Item = PoolHandle> + '_ {
        self.slots.iter().enumerate().filter(|(_, s)| s.active).map(|(index, s)| PoolHandle {
            index,
            generation: s.generation,
        })
    }

    /// Active entities in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (PoolHandle, &T)> {
        self.slots.iter().enumerate().filter(|(_, s)| s.active).map(|(index, s)| {
            (PoolHandle { index, generation: s.generation }, &s.value)
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PoolHandle, &mut T)> {
        self.slots.iter_mut().enumerate().filter(|(_, s)| s.active).map(|(index, s)| {
            (PoolHandle { index, generation: s.generation }, &mut s.value)
        })
    }
}
