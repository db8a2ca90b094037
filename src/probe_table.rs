//! ProbeTable: linear probing over a fixed circular slot array, with
//! deletions that keep tombstones only while some probe path needs them.
//!
//! Each insertion adds one unit to the path ledger of every slot its scan
//! visits. Removal retraces the key's path, retiring those units; any slot
//! whose count drops to zero is crossed by no remaining path and goes back to
//! `Empty` at once. Everything else the key vacates becomes a tombstone.

use crate::critical_section::CriticalSection;
use crate::error::{Counter, InvariantViolation, TableError};
use crate::oracle::HomeOracle;
use crate::path_ledger::PathLedger;
use crate::slot_store::{Slot, SlotStore};
use core::fmt;

/// Outcome of a successful `remove`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Removal<K> {
    /// The key as it was stored in the table.
    pub key: K,
    /// Slots visited, home slot through the key's resting slot.
    pub probes: usize,
    /// Tombstones on the path that were turned back into empty cells.
    pub reclaimed: usize,
}

pub struct ProbeTable<K, O> {
    pub(crate) store: SlotStore<K>,
    pub(crate) ledger: PathLedger,
    pub(crate) oracle: O,
    section: CriticalSection,
}

impl<K, O> ProbeTable<K, O> {
    pub fn new(capacity: usize, oracle: O) -> Result<Self, TableError> {
        if capacity == 0 {
            return Err(TableError::ZeroCapacity);
        }
        Ok(Self {
            store: SlotStore::new(capacity),
            ledger: PathLedger::new(capacity),
            oracle,
            section: CriticalSection::new(),
        })
    }

    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Number of resident keys.
    pub fn len(&self) -> usize {
        self.store.occupied()
    }

    pub fn is_empty(&self) -> bool {
        self.store.occupied() == 0
    }

    pub fn empty_slots(&self) -> usize {
        self.store.empty()
    }

    pub fn tombstones(&self) -> usize {
        self.store.tombstones()
    }

    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    /// Fraction of slots that are `Empty`; tombstones do not count as free.
    pub fn free_fraction(&self) -> f64 {
        self.empty_slots() as f64 / self.capacity() as f64
    }

    pub fn slot(&self, i: usize) -> Option<&Slot<K>> {
        (i < self.capacity()).then(|| self.store.read(i))
    }

    /// Number of resident probe paths crossing slot `i`.
    pub fn path_count(&self, i: usize) -> Option<usize> {
        (i < self.capacity()).then(|| self.ledger.count(i))
    }

    pub fn slots(&self) -> impl ExactSizeIterator<Item = &Slot<K>> + '_ {
        self.store.iter()
    }

    /// Resident keys in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &K> + '_ {
        self.store.iter().filter_map(Slot::key)
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Drop every key and tombstone, keeping the capacity and the oracle.
    pub fn clear(&mut self) {
        let _g = self.section.enter("clear");
        let m = self.capacity();
        self.store = SlotStore::new(m);
        self.ledger = PathLedger::new(m);
    }
}

impl<K, O> ProbeTable<K, O>
where
    K: Eq,
    O: HomeOracle<K>,
{
    #[inline]
    fn home_slot(&self, key: &K) -> usize {
        self.oracle.home(key) % self.capacity()
    }

    /// Home slot of `key` in this table.
    pub fn home_of(&self, key: &K) -> usize {
        let _g = self.section.enter("home_of");
        self.home_slot(key)
    }

    // Shared by find and remove; callers hold the section.
    fn locate(&self, key: &K) -> usize {
        let m = self.capacity();
        let home = self.home_slot(key);
        for step in 0..m {
            match self.store.read((home + step) % m) {
                Slot::Empty => return 0,
                Slot::Occupied(k) if k == key => return step + 1,
                _ => {}
            }
        }
        0
    }

    /// Probe cost of a lookup for `key`, or 0 when it is not resident.
    pub fn find(&self, key: &K) -> usize {
        let _g = self.section.enter("find");
        self.locate(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.find(key) != 0
    }

    /// Insert `key` and return the number of slots probed.
    ///
    /// `key` must not already be resident. When every slot holds a key the
    /// insert fails with `TableFull` and the table is left untouched.
    pub fn insert(&mut self, key: K) -> Result<usize, TableError> {
        let _g = self.section.enter("insert");
        debug_assert!(self.locate(&key) == 0, "key inserted twice");

        let m = self.capacity();
        let home = self.home_slot(&key);
        let landing =
            (0..m).find(|&step| self.store.read((home + step) % m).key().is_none());
        let Some(offset) = landing else {
            tracing::debug!(capacity = m, home, "insert rejected: table full");
            return Err(TableError::TableFull { capacity: m });
        };

        for step in 0..=offset {
            self.ledger.increment((home + step) % m);
        }
        let slot = (home + offset) % m;
        let over_tombstone = self.store.read(slot).is_tombstone();
        self.store.set_occupied(slot, key);
        tracing::trace!(slot, home, steps = offset + 1, over_tombstone, "inserted key");

        self.debug_check();
        Ok(offset + 1)
    }

    /// Remove `key`, reclaiming every tombstone on its path that no other
    /// resident path still crosses.
    ///
    /// An absent key yields `NotResident` without touching the table. A
    /// `LedgerUnderflow` means the table was already corrupt; the path units
    /// retired before the failing slot stay retired, so the table is left
    /// partially modified.
    pub fn remove(&mut self, key: &K) -> Result<Removal<K>, TableError> {
        let _g = self.section.enter("remove");
        let probes = self.locate(key);
        if probes == 0 {
            tracing::debug!("remove rejected: key not resident");
            return Err(TableError::NotResident);
        }

        let m = self.capacity();
        let home = self.home_slot(key);
        let mut reclaimed = 0;
        for step in 0..probes - 1 {
            let i = (home + step) % m;
            if self.ledger.decrement(i)? == 0 {
                // A resident key always holds a unit of its own slot.
                debug_assert!(self.store.read(i).is_tombstone());
                if self.store.read(i).is_tombstone() {
                    self.store.set_empty(i);
                    reclaimed += 1;
                    tracing::trace!(slot = i, "reclaimed tombstone");
                }
            }
        }

        let target = (home + probes - 1) % m;
        let paths = self.ledger.decrement(target)?;
        let vacated = if paths == 0 {
            self.store.set_empty(target).into_key()
        } else {
            tracing::trace!(slot = target, paths, "left tombstone");
            self.store.set_tombstone(target)
        };
        let key = vacated.expect("located slot must hold the removed key");

        self.debug_check();
        Ok(Removal {
            key,
            probes,
            reclaimed,
        })
    }

    /// Walk the whole table and verify the ledger/slot invariants, the
    /// maintained counters, and that every resident key is found from its
    /// home slot at its current position.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let _g = self.section.enter("check_invariants");
        self.verify()
    }

    fn verify(&self) -> Result<(), InvariantViolation> {
        let m = self.capacity();
        let (mut occupied, mut empty) = (0, 0);

        for (i, (slot, &paths)) in self.store.iter().zip(self.ledger.iter()).enumerate() {
            if paths > m {
                return Err(InvariantViolation::PathCountOverflow {
                    slot: i,
                    paths,
                    capacity: m,
                });
            }
            match (slot, paths) {
                (Slot::Empty, 0) => empty += 1,
                (Slot::Empty, _) => {
                    return Err(InvariantViolation::EmptySlotOnPath { slot: i, paths })
                }
                (_, 0) => return Err(InvariantViolation::UnreferencedSlot { slot: i }),
                (Slot::Tombstone, _) => {}
                (Slot::Occupied(k), _) => {
                    occupied += 1;
                    let home = self.home_slot(k);
                    if self.locate(k) != (i + m - home) % m + 1 {
                        return Err(InvariantViolation::UnreachableKey { slot: i, home });
                    }
                }
            }
        }

        if occupied != self.store.occupied() {
            return Err(InvariantViolation::CounterMismatch {
                counter: Counter::Occupied,
                recorded: self.store.occupied(),
                actual: occupied,
            });
        }
        if empty != self.store.empty() {
            return Err(InvariantViolation::CounterMismatch {
                counter: Counter::Empty,
                recorded: self.store.empty(),
                actual: empty,
            });
        }
        Ok(())
    }

    // Runs inside the calling operation's section.
    #[inline]
    fn debug_check(&self) {
        if cfg!(any(test, feature = "check_invariants")) {
            if let Err(v) = self.verify() {
                panic!("table invariant violated: {v}");
            }
        }
    }
}

impl<K, O> fmt::Debug for ProbeTable<K, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbeTable")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .field("tombstones", &self.tombstones())
            .field("empty", &self.empty_slots())
            .finish_non_exhaustive()
    }
}

/// One entry per slot: `E` when empty, `D,<paths>` for a tombstone and
/// `<slot>,<home>,<key>,<paths>` for a resident key.
impl<K, O> fmt::Display for ProbeTable<K, O>
where
    K: Eq + fmt::Display,
    O: HomeOracle<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (slot, paths)) in self.store.iter().zip(self.ledger.iter()).enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match slot {
                Slot::Empty => f.write_str("E")?,
                Slot::Tombstone => write!(f, "D,{paths}")?,
                Slot::Occupied(k) => write!(f, "{i},{},{k},{paths}", self.home_slot(k))?,
            }
        }
        Ok(())
    }
}
