//! PathLedger: per-slot count of resident probe paths crossing each slot.
//!
//! A slot's count goes up once for every key whose insertion scan visited
//! it and comes down once when that key is removed. A count of zero means
//! no live lookup can need the slot, so it may be handed back as free.

use crate::error::LedgerUnderflow;

#[derive(Debug)]
pub(crate) struct PathLedger {
    counts: Box<[usize]>,
}

impl PathLedger {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            counts: vec![0; capacity].into_boxed_slice(),
        }
    }

    #[inline]
    pub(crate) fn count(&self, i: usize) -> usize {
        self.counts[i]
    }

    #[inline]
    pub(crate) fn increment(&mut self, i: usize) {
        let capacity = self.counts.len();
        let c = &mut self.counts[i];
        // A path visits a slot at most once and at most `capacity` keys are
        // resident, so the count is bounded by the ledger length.
        debug_assert!(*c < capacity, "path count overflow at slot {i}");
        *c += 1;
    }

    /// Retire one path unit at `i` and return the remaining count.
    #[inline]
    pub(crate) fn decrement(&mut self, i: usize) -> Result<usize, LedgerUnderflow> {
        let c = &mut self.counts[i];
        if *c == 0 {
            return Err(LedgerUnderflow { slot: i });
        }
        *c -= 1;
        Ok(*c)
    }

    pub(crate) fn iter(&self) -> core::slice::Iter<'_, usize> {
        self.counts.iter()
    }

    #[cfg(test)]
    pub(crate) fn set(&mut self, i: usize, count: usize) {
        self.counts[i] = count;
    }
}
