//! SlotStore: fixed-capacity circular slot array with occupancy counters.
//!
//! The store only keeps its own counters consistent with the slot contents.
//! Whether a slot may be emptied is decided by the caller against the path
//! ledger; nothing here looks at probe paths.

use core::mem;

/// Contents of one table position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Slot<K> {
    Empty,
    Tombstone,
    Occupied(K),
}

impl<K> Slot<K> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    pub fn is_tombstone(&self) -> bool {
        matches!(self, Slot::Tombstone)
    }

    pub fn key(&self) -> Option<&K> {
        match self {
            Slot::Occupied(k) => Some(k),
            _ => None,
        }
    }

    pub fn into_key(self) -> Option<K> {
        match self {
            Slot::Occupied(k) => Some(k),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub(crate) struct SlotStore<K> {
    slots: Box<[Slot<K>]>,
    occupied: usize,
    empty: usize,
}

impl<K> SlotStore<K> {
    pub(crate) fn new(capacity: usize) -> Self {
        let slots: Box<[Slot<K>]> = (0..capacity).map(|_| Slot::Empty).collect();
        Self {
            slots,
            occupied: 0,
            empty: capacity,
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn occupied(&self) -> usize {
        self.occupied
    }

    #[inline]
    pub(crate) fn empty(&self) -> usize {
        self.empty
    }

    #[inline]
    pub(crate) fn tombstones(&self) -> usize {
        self.capacity() - self.occupied - self.empty
    }

    #[inline]
    pub(crate) fn read(&self, i: usize) -> &Slot<K> {
        &self.slots[i]
    }

    pub(crate) fn iter(&self) -> core::slice::Iter<'_, Slot<K>> {
        self.slots.iter()
    }

    /// Free slot `i`, returning what it held. The caller has already brought
    /// the slot's ledger count to zero.
    pub(crate) fn set_empty(&mut self, i: usize) -> Slot<K> {
        let prev = mem::replace(&mut self.slots[i], Slot::Empty);
        match prev {
            Slot::Empty => return prev,
            Slot::Occupied(_) => self.occupied -= 1,
            Slot::Tombstone => {}
        }
        self.empty += 1;
        prev
    }

    /// Vacate an occupied slot that another probe path still crosses.
    pub(crate) fn set_tombstone(&mut self, i: usize) -> Option<K> {
        debug_assert!(
            matches!(self.slots[i], Slot::Occupied(_)),
            "only an occupied slot can become a tombstone"
        );
        match mem::replace(&mut self.slots[i], Slot::Tombstone) {
            Slot::Occupied(k) => {
                self.occupied -= 1;
                Some(k)
            }
            Slot::Empty => {
                self.empty -= 1;
                None
            }
            Slot::Tombstone => None,
        }
    }

    /// Store `key` at `i`, consuming an empty cell or a tombstone.
    pub(crate) fn set_occupied(&mut self, i: usize, key: K) {
        let prev = mem::replace(&mut self.slots[i], Slot::Occupied(key));
        debug_assert!(
            !matches!(prev, Slot::Occupied(_)),
            "landing slot {i} already holds a key"
        );
        match prev {
            Slot::Empty => self.empty -= 1,
            Slot::Tombstone => {}
            Slot::Occupied(_) => return,
        }
        self.occupied += 1;
    }

    /// Replace slot `i` with no counter bookkeeping.
    #[cfg(test)]
    pub(crate) fn overwrite(&mut self, i: usize, slot: Slot<K>) -> Slot<K> {
        mem::replace(&mut self.slots[i], slot)
    }
}
