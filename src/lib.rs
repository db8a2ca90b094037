//! ledger-hashtable: linear probing with referential integrity.
//!
//! A fixed-capacity open-addressing table whose deletions leave a tombstone
//! only while some other resident key still has to probe across the vacated
//! slot, and clear every such marker the moment the last of those keys is
//! removed.
//!
//! Internal Design:
//!
//! Layers
//! - SlotStore<K>: the circular slot array (`Empty`, `Tombstone`,
//!   `Occupied(key)`) plus occupied/empty counters. Purely local
//!   bookkeeping; it never decides whether a slot may be freed.
//! - PathLedger: one count per slot, the number of resident keys whose probe
//!   path (home slot through resting slot, circularly) crosses it.
//! - ProbeTable<K, O>: insert/find/remove. Drives both leaf layers in
//!   lockstep so that after every operation `slot[i] == Empty` exactly when
//!   `ledger[i] == 0`.
//!
//! Removal
//! - A removal retraces the key's own path and retires one ledger unit per
//!   slot. A tombstone whose count reaches zero is crossed by no remaining
//!   path and becomes `Empty` on the spot. The vacated slot itself becomes
//!   `Empty` when its count reaches zero and a tombstone otherwise.
//! - Cost is the length of the removed key's path, not of its cluster.
//!
//! Homes
//! - The table never hashes. A `HomeOracle` supplied at construction maps a
//!   key to a home, reduced modulo the capacity. The answer must not change
//!   while the key is resident.
//!
//! Contracts
//! - Capacity is fixed; there is no resize. An insert into a table whose
//!   slots all hold keys fails with `TableFull` and changes nothing.
//! - Inserting a key that is already resident is a caller error (asserted in
//!   debug builds). Removing an absent key returns `NotResident` and changes
//!   nothing.
//! - Single-threaded: mutation takes `&mut self`; the table is `!Sync`. A
//!   debug-only guard panics if an oracle or `K: Eq` re-enters the table.
//!
//! Checking
//! - `ProbeTable::check_invariants` walks the whole table. With the
//!   `check_invariants` feature it also runs after every insert and remove.
//!
//! Simulation
//! - `sim` replays a random insert/delete trace at a target load and
//!   reports free-cell fraction and search/insert costs; the `simulate`
//!   binary is its command-line front end.

mod critical_section;
pub mod error;
pub mod oracle;
mod path_ledger;
pub mod probe_table;
mod probe_table_proptest;
pub mod sim;
mod slot_store;

// Public surface
pub use error::{Counter, InvariantViolation, LedgerUnderflow, TableError};
pub use oracle::{AssignedHomes, HashedHome, HomeOracle};
pub use probe_table::{ProbeTable, Removal};
pub use slot_store::Slot;
