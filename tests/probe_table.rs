// ProbeTable unit test suite (public API).
//
// Each test documents what behavior is being verified and which
// invariants are assumed or asserted. The core invariants exercised:
// - Ledger/slot agreement: a slot is Empty iff no resident path crosses it.
// - Accounting: occupied + tombstones + empty == capacity.
// - Soundness: find is 0 for absent keys and the path length otherwise.
// - Minimality: a tombstone disappears with the last path that needs it.
use ledger_hashtable::{HashedHome, HomeOracle, ProbeTable, Slot, TableError};

fn same_home(_: &&str) -> usize {
    0
}

type StrTable = ProbeTable<&'static str, fn(&&str) -> usize>;

fn all_at_zero(m: usize) -> StrTable {
    ProbeTable::new(m, same_home as fn(&&str) -> usize).unwrap()
}

fn paths<K, O>(t: &ProbeTable<K, O>) -> Vec<usize> {
    (0..t.capacity()).map(|i| t.path_count(i).unwrap()).collect()
}

// Test: capacity exhaustion.
// Assumes: all keys share home slot 0 in a table of four slots.
// Verifies: keys land in slots 0..3 in order; the fifth insert fails with
// TableFull and the table is unchanged.
#[test]
fn fifth_insert_into_full_table_fails() {
    let mut t = all_at_zero(4);
    for (i, k) in ["a", "b", "c", "d"].into_iter().enumerate() {
        assert_eq!(t.insert(k).expect("room left"), i + 1);
        assert_eq!(t.slot(i), Some(&Slot::Occupied(k)));
    }
    assert_eq!(t.insert("e"), Err(TableError::TableFull { capacity: 4 }));
    assert_eq!(t.len(), 4);
    assert_eq!(t.empty_slots(), 0);
    assert_eq!(paths(&t), [4, 3, 2, 1]);
    assert_eq!(t.find(&"e"), 0);
    t.check_invariants().expect("consistent after rejected insert");
}

// Test: tombstone lifecycle with two colliding keys.
// Assumes: A and B both home to slot 0.
// Verifies: removing A leaves a tombstone that B's lookup crosses; removing B
// reclaims that tombstone and B's own slot, yielding a fresh-looking table.
#[test]
fn tombstone_created_then_reclaimed() {
    let mut t = all_at_zero(4);
    t.insert("A").unwrap();
    assert_eq!(t.slot(0), Some(&Slot::Occupied("A")));
    assert_eq!(t.path_count(0), Some(1));

    assert_eq!(t.insert("B").unwrap(), 2);
    assert_eq!(paths(&t), [2, 1, 0, 0]);
    assert_eq!(t.slot(1), Some(&Slot::Occupied("B")));

    t.remove(&"A").unwrap();
    assert_eq!(t.slot(0), Some(&Slot::Tombstone));
    assert_eq!(t.path_count(0), Some(1));
    assert_eq!(t.find(&"B"), 2);
    assert_eq!(t.find(&"A"), 0);

    let removal = t.remove(&"B").unwrap();
    assert_eq!(removal.key, "B");
    assert_eq!(removal.probes, 2);
    assert_eq!(removal.reclaimed, 1);
    assert!(t.slots().all(|s| *s == Slot::Empty));
    assert_eq!(paths(&t), [0, 0, 0, 0]);
    assert_eq!(t.len(), 0);
    assert_eq!(t.tombstones(), 0);
    assert_eq!(t.empty_slots(), 4);
}

// Test: a tombstone survives while a later key's path still crosses it.
// Assumes: keys x, y, z home to slot 0 and land in 0, 1, 2.
// Verifies: removing y keeps a tombstone at 1 (z crosses it); removing x then
// only tombstones 0; removing z clears everything.
#[test]
fn tombstones_wait_for_last_crossing_path() {
    let mut t = all_at_zero(5);
    for k in ["x", "y", "z"] {
        t.insert(k).unwrap();
    }
    t.remove(&"y").unwrap();
    assert_eq!(t.slot(1), Some(&Slot::Tombstone));
    assert_eq!(t.tombstones(), 1);

    let r = t.remove(&"x").unwrap();
    assert_eq!(r.reclaimed, 0);
    assert_eq!(t.slot(0), Some(&Slot::Tombstone));
    assert_eq!(t.tombstones(), 2);
    assert_eq!(t.find(&"z"), 3);

    let r = t.remove(&"z").unwrap();
    assert_eq!(r.reclaimed, 2);
    assert!(t.is_empty());
    assert_eq!(t.empty_slots(), 5);
    t.check_invariants().unwrap();
}

// Test: keys with different homes do not hold tombstones they never cross.
// Assumes: p homes to 0, q homes to 2 in a table of four slots.
// Verifies: removing p frees slot 0 directly since q's path starts at 2.
#[test]
fn unrelated_paths_do_not_retain_tombstones() {
    let mut t: ProbeTable<&str, _> =
        ProbeTable::new(4, |k: &&str| if *k == "p" { 0 } else { 2 }).unwrap();
    t.insert("p").unwrap();
    t.insert("q").unwrap();
    t.remove(&"p").unwrap();
    assert_eq!(t.slot(0), Some(&Slot::Empty));
    assert_eq!(t.tombstones(), 0);
    assert_eq!(t.find(&"q"), 1);
}

// Test: round trip.
// Assumes: a table with tombstones and several resident keys.
// Verifies: insert(k) immediately followed by remove(k) restores every slot,
// every path count, and the counters.
#[test]
fn insert_then_remove_restores_state() {
    let mut t = all_at_zero(6);
    for k in ["a", "b", "c", "d"] {
        t.insert(k).unwrap();
    }
    t.remove(&"b").unwrap();
    let slots: Vec<Slot<&str>> = t.slots().cloned().collect();
    let before = paths(&t);
    let counts = (t.len(), t.tombstones(), t.empty_slots());

    let steps = t.insert("fresh").unwrap();
    assert_eq!(steps, 2, "lands on the tombstone left by b");
    t.remove(&"fresh").unwrap();

    assert_eq!(t.slots().cloned().collect::<Vec<_>>(), slots);
    assert_eq!(paths(&t), before);
    assert_eq!((t.len(), t.tombstones(), t.empty_slots()), counts);
}

// Test: find soundness.
// Verifies: 0 for never-inserted and removed keys; the path length otherwise.
#[test]
fn find_reports_path_length() {
    let mut t: ProbeTable<u32, _> = ProbeTable::new(8, |k: &u32| (*k / 10) as usize).unwrap();
    for k in [10, 11, 12, 30] {
        t.insert(k).unwrap();
    }
    assert_eq!(t.find(&10), 1);
    assert_eq!(t.find(&11), 2);
    assert_eq!(t.find(&12), 3);
    assert_eq!(t.find(&30), 2, "home 3 is taken by 12");
    assert_eq!(t.find(&99), 0);
    t.remove(&11).unwrap();
    assert_eq!(t.find(&11), 0);
    assert_eq!(t.find(&12), 3);
    assert!(t.contains(&12));
    assert!(!t.contains(&11));
}

// Test: removing an absent key.
// Verifies: NotResident is returned and nothing changes.
#[test]
fn remove_absent_key_is_rejected() {
    let mut t = all_at_zero(3);
    t.insert("a").unwrap();
    assert_eq!(t.remove(&"b"), Err(TableError::NotResident));
    assert_eq!(t.remove(&"a").unwrap().key, "a");
    assert_eq!(t.remove(&"a"), Err(TableError::NotResident));
    assert_eq!(t.empty_slots(), 3);
}

#[test]
fn zero_capacity_is_rejected() {
    let r: Result<StrTable, _> = ProbeTable::new(0, same_home as fn(&&str) -> usize);
    assert!(matches!(r, Err(TableError::ZeroCapacity)));
}

// Test: hashed homes.
// Verifies: a BuildHasher-backed oracle works end to end and home_of stays
// within the capacity.
#[test]
fn hashed_home_end_to_end() {
    let mut t: ProbeTable<String, HashedHome> = ProbeTable::new(64, HashedHome::new()).unwrap();
    let keys: Vec<String> = (0..40).map(|i| format!("key-{i}")).collect();
    for k in &keys {
        assert!(t.home_of(k) < 64);
        t.insert(k.clone()).unwrap();
    }
    for k in keys.iter().step_by(2) {
        assert_eq!(&t.remove(k).unwrap().key, k);
    }
    for (i, k) in keys.iter().enumerate() {
        assert_eq!(t.contains(k), i % 2 == 1);
    }
    assert_eq!(t.len(), 20);
    t.check_invariants().unwrap();
}

// Test: oracle reduction.
// Verifies: oracle answers beyond the capacity are reduced modulo it.
#[test]
fn oracle_output_is_reduced() {
    let oracle = |k: &usize| *k * 1000 + 5;
    let t: ProbeTable<usize, _> = ProbeTable::new(7, oracle).unwrap();
    assert_eq!(t.home_of(&1), 1005 % 7);
    assert_eq!(HomeOracle::<usize>::home(t.oracle(), &1), 1005);
}

// Test: dump format.
// Verifies: E for empty, D,<paths> for tombstones, slot,home,key,paths for keys.
#[test]
fn display_dump() {
    let mut t: ProbeTable<u32, _> = ProbeTable::new(5, |k: &u32| (*k % 5) as usize).unwrap();
    t.insert(1).unwrap();
    t.insert(6).unwrap();
    t.insert(4).unwrap();
    t.remove(&1).unwrap();
    assert_eq!(t.to_string(), "E D,1 2,1,6,1 E 4,4,4,1");
    assert_eq!(t.load_factor(), 2.0 / 5.0);
    assert_eq!(t.free_fraction(), 2.0 / 5.0);
}

// Test: resident key iteration.
// Verifies: iter yields resident keys in slot order, skipping tombstones.
#[test]
fn iter_yields_resident_keys_in_slot_order() {
    let mut t = all_at_zero(4);
    for k in ["a", "b", "c"] {
        t.insert(k).unwrap();
    }
    t.remove(&"b").unwrap();
    assert_eq!(t.iter().copied().collect::<Vec<_>>(), ["a", "c"]);
}
