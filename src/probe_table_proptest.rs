#![cfg(test)]

// Property tests for ProbeTable kept inside the crate so they can compare the
// path ledger against a from-scratch recomputation.

use crate::error::TableError;
use crate::oracle::AssignedHomes;
use crate::probe_table::ProbeTable;
use crate::slot_store::Slot;
use proptest::prelude::*;
use std::collections::BTreeSet;

#[derive(Clone, Debug)]
enum OpI {
    Insert(usize),
    Remove(usize),
    Find(usize),
}

// Capacity, per-key homes (pool index = key), and an op list. The pool may
// exceed the capacity so that full-table inserts are exercised too.
fn arb_scenario() -> impl Strategy<Value = (usize, Vec<usize>, Vec<OpI>)> {
    (1usize..=12).prop_flat_map(|m| {
        let homes = proptest::collection::vec(0..m, 1..=m + 3);
        homes.prop_flat_map(move |homes| {
            let idx = 0..homes.len();
            let op = prop_oneof![
                3 => idx.clone().prop_map(OpI::Insert),
                2 => idx.clone().prop_map(OpI::Remove),
                1 => idx.prop_map(OpI::Find),
            ];
            proptest::collection::vec(op, 1..120).prop_map(move |ops| (m, homes.clone(), ops))
        })
    })
}

fn expected_ledger(t: &ProbeTable<usize, AssignedHomes<usize>>) -> Vec<usize> {
    let m = t.capacity();
    let mut expect = vec![0; m];
    for (pos, slot) in t.slots().enumerate() {
        if let Slot::Occupied(k) = slot {
            let home = t.home_of(k);
            let len = (pos + m - home) % m + 1;
            for step in 0..len {
                expect[(home + step) % m] += 1;
            }
        }
    }
    expect
}

// Property: Ledger and slots agree with a model after every operation.
// Invariants exercised across random operation sequences:
// - ledger[i] == 0 iff slot i is Empty; no tombstone outlives its last path.
// - The ledger equals the sum of the resident keys' current probe paths.
// - Occupied/tombstone/empty counters sum to the capacity; occupied == model size.
// - find is positive exactly for resident keys and equals their path length.
// - TableFull happens exactly when every slot holds a key, with no mutation.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_ledger_matches_paths((m, homes, ops) in arb_scenario()) {
        let oracle: AssignedHomes<usize> = homes.iter().copied().enumerate().collect();
        let mut sut = ProbeTable::new(m, oracle).unwrap();
        let mut model: BTreeSet<usize> = BTreeSet::new();

        for op in ops {
            match op {
                OpI::Insert(k) => {
                    if model.contains(&k) {
                        continue;
                    }
                    let before: Vec<usize> = sut.ledger.iter().copied().collect();
                    match sut.insert(k) {
                        Ok(steps) => {
                            prop_assert!(steps >= 1 && steps <= m);
                            prop_assert_eq!(sut.find(&k), steps);
                            model.insert(k);
                        }
                        Err(TableError::TableFull { capacity }) => {
                            prop_assert_eq!(capacity, m);
                            prop_assert_eq!(model.len(), m, "full only when every slot holds a key");
                            let after: Vec<usize> = sut.ledger.iter().copied().collect();
                            prop_assert_eq!(before, after);
                        }
                        Err(e) => prop_assert!(false, "unexpected insert error: {}", e),
                    }
                }
                OpI::Remove(k) => {
                    if model.remove(&k) {
                        let expected_probes = sut.find(&k);
                        let r = sut.remove(&k).expect("resident key removes");
                        prop_assert_eq!(r.key, k);
                        prop_assert_eq!(r.probes, expected_probes);
                        prop_assert!(r.reclaimed < r.probes);
                    } else {
                        prop_assert_eq!(sut.remove(&k).err(), Some(TableError::NotResident));
                    }
                }
                OpI::Find(k) => {
                    prop_assert_eq!(sut.find(&k) != 0, model.contains(&k));
                }
            }

            for (i, (slot, &paths)) in sut.store.iter().zip(sut.ledger.iter()).enumerate() {
                prop_assert_eq!(slot.is_empty(), paths == 0, "slot {}", i);
                prop_assert!(paths <= m);
            }
            prop_assert_eq!(sut.ledger.iter().copied().collect::<Vec<_>>(), expected_ledger(&sut));
            prop_assert_eq!(sut.len() + sut.tombstones() + sut.empty_slots(), m);
            prop_assert_eq!(sut.len(), model.len());
            let resident: BTreeSet<usize> = sut.iter().copied().collect();
            prop_assert_eq!(&resident, &model);
        }
    }

    // Property: insert immediately followed by remove restores every slot,
    // every ledger count, and the counters.
    #[test]
    fn prop_insert_remove_round_trip((m, homes, ops) in arb_scenario(), probe in 0usize..64) {
        let oracle: AssignedHomes<usize> = homes.iter().copied().enumerate().collect();
        let mut sut = ProbeTable::new(m, oracle).unwrap();
        let mut model: BTreeSet<usize> = BTreeSet::new();
        for op in ops {
            match op {
                OpI::Insert(k) if !model.contains(&k) && model.len() < m => {
                    sut.insert(k).unwrap();
                    model.insert(k);
                }
                OpI::Remove(k) if model.remove(&k) => {
                    sut.remove(&k).unwrap();
                }
                _ => {}
            }
        }
        prop_assume!(model.len() < m);

        // A fresh key with an arbitrary home.
        let fresh = homes.len();
        sut.oracle.assign(fresh, probe % m);
        let slots: Vec<Slot<usize>> = sut.slots().cloned().collect();
        let ledger: Vec<usize> = sut.ledger.iter().copied().collect();
        let counts = (sut.len(), sut.tombstones(), sut.empty_slots());

        let steps = sut.insert(fresh).unwrap();
        let r = sut.remove(&fresh).unwrap();
        prop_assert_eq!(r.probes, steps);
        prop_assert_eq!(r.reclaimed, 0);
        prop_assert_eq!(sut.slots().cloned().collect::<Vec<_>>(), slots);
        prop_assert_eq!(sut.ledger.iter().copied().collect::<Vec<_>>(), ledger);
        prop_assert_eq!((sut.len(), sut.tombstones(), sut.empty_slots()), counts);
    }
}
