// Copyright 2026 the Mapstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generational slot storage shared by layers, groups, and units.

use alloc::vec::Vec;

use super::id::Handle;

/// Slot storage addressed by generational handles.
///
/// Removed entries are recycled via a free list, and generation counters
/// make stale handles miss instead of aliasing a newer entry.
#[derive(Debug)]
pub(crate) struct Slots<H, T> {
    entries: Vec<Option<T>>,
    generation: Vec<u32>,
    free_list: Vec<u32>,
    /// Number of slots ever allocated.
    allocated: u32,
    _handle: core::marker::PhantomData<H>,
}

impl<H: Handle, T> Default for Slots<H, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Handle, T> Slots<H, T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            allocated: 0,
            _handle: core::marker::PhantomData,
        }
    }

    /// Stores `value` and returns its handle.
    pub(crate) fn insert(&mut self, value: T) -> H {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            self.entries[idx as usize] = Some(value);
            idx
        } else {
            // Allocate a new slot.
            let idx = self.allocated;
            self.allocated += 1;
            self.entries.push(Some(value));
            self.generation.push(0);
            idx
        };
        H::from_raw(idx, self.generation[idx as usize])
    }

    /// Removes and returns the entry, or `None` if the handle is stale.
    pub(crate) fn remove(&mut self, id: H) -> Option<T> {
        if !self.contains(id) {
            return None;
        }
        let idx = id.idx() as usize;
        // Bump generation so old handles immediately fail validation.
        self.generation[idx] += 1;
        self.free_list.push(id.idx());
        self.entries[idx].take()
    }

    /// Returns whether the handle refers to a live entry.
    pub(crate) fn contains(&self, id: H) -> bool {
        let idx = id.idx() as usize;
        idx < self.entries.len()
            && self.generation[idx] == id.generation()
            && self.entries[idx].is_some()
    }

    pub(crate) fn get(&self, id: H) -> Option<&T> {
        if self.contains(id) {
            self.entries[id.idx() as usize].as_ref()
        } else {
            None
        }
    }

    pub(crate) fn get_mut(&mut self, id: H) -> Option<&mut T> {
        if self.contains(id) {
            self.entries[id.idx() as usize].as_mut()
        } else {
            None
        }
    }

    /// Returns the live handle at raw slot `idx`, if any.
    pub(crate) fn id_at(&self, idx: u32) -> Option<H> {
        let slot = idx as usize;
        match self.entries.get(slot) {
            Some(Some(_)) => Some(H::from_raw(idx, self.generation[slot])),
            _ => None,
        }
    }

    /// Returns the number of live entries.
    pub(crate) fn len(&self) -> usize {
        self.entries.len() - self.free_list.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::LayerId;

    #[test]
    fn insert_and_remove() {
        let mut slots: Slots<LayerId, &str> = Slots::new();
        let id = slots.insert("a");
        assert!(slots.contains(id));
        assert_eq!(slots.remove(id), Some("a"));
        assert!(!slots.contains(id));
        assert_eq!(slots.len(), 0);
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut slots: Slots<LayerId, u8> = Slots::new();
        let id1 = slots.insert(1);
        let _ = slots.remove(id1);
        let id2 = slots.insert(2);
        // id2 reuses the same slot but has a different generation.
        assert_eq!(id1.idx, id2.idx);
        assert_ne!(id1.generation, id2.generation);
        assert_eq!(slots.get(id1), None);
        assert_eq!(slots.get(id2), Some(&2));
    }

    #[test]
    fn removing_stale_handle_is_noop() {
        let mut slots: Slots<LayerId, u8> = Slots::new();
        let id = slots.insert(7);
        assert_eq!(slots.remove(id), Some(7));
        assert_eq!(slots.remove(id), None);
        assert_eq!(slots.len(), 0);
    }

    #[test]
    fn id_at_skips_free_slots() {
        let mut slots: Slots<LayerId, u8> = Slots::new();
        let a = slots.insert(1);
        let b = slots.insert(2);
        let _ = slots.remove(a);
        assert_eq!(slots.id_at(a.idx), None);
        assert_eq!(slots.id_at(b.idx), Some(b));
        assert_eq!(slots.id_at(99), None);
    }
}
