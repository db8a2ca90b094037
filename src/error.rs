//! Error types for table operations and the consistency checker.

use thiserror::Error;

/// A path ledger count was decremented below zero.
///
/// Only reachable when a key is removed twice or the table was otherwise
/// corrupted; the table must be considered unusable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("path ledger underflow at slot {slot}")]
pub struct LedgerUnderflow {
    pub slot: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("table capacity must be positive")]
    ZeroCapacity,
    #[error("no free or reclaimable slot within {capacity} probes")]
    TableFull { capacity: usize },
    #[error("key is not resident in the table")]
    NotResident,
    #[error(transparent)]
    LedgerUnderflow(#[from] LedgerUnderflow),
}

/// Which maintained counter disagreed with a full recount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Occupied,
    Empty,
}

impl core::fmt::Display for Counter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Counter::Occupied => f.write_str("occupied"),
            Counter::Empty => f.write_str("empty"),
        }
    }
}

/// Failure reported by `ProbeTable::check_invariants`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("slot {slot} is empty but {paths} probe paths cross it")]
    EmptySlotOnPath { slot: usize, paths: usize },
    #[error("slot {slot} is not empty but no probe path crosses it")]
    UnreferencedSlot { slot: usize },
    #[error("slot {slot} is crossed by {paths} paths in a table of {capacity} slots")]
    PathCountOverflow {
        slot: usize,
        paths: usize,
        capacity: usize,
    },
    #[error("key in slot {slot} is not reached by a lookup from its home slot {home}")]
    UnreachableKey { slot: usize, home: usize },
    #[error("{counter} counter records {recorded} slots but {actual} were counted")]
    CounterMismatch {
        counter: Counter,
        recorded: usize,
        actual: usize,
    },
}
