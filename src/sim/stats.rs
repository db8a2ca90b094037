//! Search and insertion cost estimates over the current table layout.

use crate::oracle::HomeOracle;
use crate::probe_table::ProbeTable;
use crate::slot_store::Slot;
use core::borrow::Borrow;

/// Mean probe cost of finding each of `keys`; 0 when there are none.
pub fn successful_search_cost<K, O, I>(table: &ProbeTable<K, O>, keys: I) -> f64
where
    K: Eq,
    O: HomeOracle<K>,
    I: IntoIterator,
    I::Item: Borrow<K>,
{
    let (mut total, mut n) = (0usize, 0usize);
    for k in keys {
        total += table.find(k.borrow());
        n += 1;
    }
    if n == 0 {
        0.0
    } else {
        total as f64 / n as f64
    }
}

/// Mean cost of a lookup that misses, averaged over every possible home slot:
/// the length of the non-empty run starting there (at least 1).
pub fn unsuccessful_search_cost<K, O>(table: &ProbeTable<K, O>) -> f64 {
    mean_run_cost(table, Slot::is_empty)
}

/// Mean cost of an insert, averaged over every possible home slot: the
/// length of the run of resident keys starting there (at least 1).
pub fn insertion_cost<K, O>(table: &ProbeTable<K, O>) -> f64 {
    mean_run_cost(table, |s| s.key().is_none())
}

fn mean_run_cost<K, O>(table: &ProbeTable<K, O>, stops: impl Fn(&Slot<K>) -> bool) -> f64 {
    let slots: Vec<&Slot<K>> = table.slots().collect();
    let m = slots.len();
    let mut total = 0usize;
    for start in 0..m {
        total += 1;
        if stops(slots[start]) {
            continue;
        }
        let mut step = 1;
        while step < m && !stops(slots[(start + step) % m]) {
            total += 1;
            step += 1;
        }
    }
    total as f64 / m as f64
}
