#![cfg(test)]

// State-machine property tests for ProbeTable against a HashMap model. Kept
// inside the crate so they can inspect the raw slot array.

use crate::config::TableConfig;
use crate::hasher::{Hashed, KeyLength, SlotHasher};
use crate::probe_table::ProbeTable;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations so shrinking moves toward earlier keys and shorter
// op lists.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, u32),
    Delete(usize),
    Login(usize, u32),
    Merge {
        a: usize,
        b: usize,
        new: usize,
        value: u32,
        old_values: (u32, u32),
    },
}

fn arb_config() -> impl Strategy<Value = TableConfig> {
    (1usize..=16, prop::sample::select(vec![0.25, 0.5, 0.7, 1.0]))
        .prop_map(|(cap, lf)| TableConfig::new(cap, lf))
}

fn arb_scenario() -> impl Strategy<Value = (TableConfig, Vec<String>, Vec<OpI>)> {
    (arb_config(), proptest::collection::vec("[a-z]{0,6}", 1..=10)).prop_flat_map(
        |(config, pool)| {
            let idx = 0..pool.len();
            let op = prop_oneof![
                3 => (idx.clone(), any::<u32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
                2 => idx.clone().prop_map(OpI::Delete),
                2 => (idx.clone(), any::<u32>()).prop_map(|(i, v)| OpI::Login(i, v)),
                1 => (idx.clone(), idx.clone(), idx.clone(), any::<u32>(), any::<(u32, u32)>())
                    .prop_map(|(a, b, new, value, old_values)| OpI::Merge {
                        a,
                        b,
                        new,
                        value,
                        old_values,
                    }),
            ];
            proptest::collection::vec(op, 1..80).prop_map(move |ops| (config, pool.clone(), ops))
        },
    )
}

fn run<H>(
    mut sut: ProbeTable<String, u32, H>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError>
where
    H: SlotHasher<String> + SlotHasher<str>,
{
    let mut model: HashMap<String, u32> = HashMap::new();
    let initial_capacity = sut.capacity();

    for op in ops {
        let capacity_before = sut.capacity();
        match op {
            OpI::Insert(i, v) => {
                let k = pool[i].clone();
                let expect = !model.contains_key(&k) && sut.len() < capacity_before;
                prop_assert_eq!(sut.insert(k.clone(), v), expect);
                if expect {
                    model.insert(k, v);
                    prop_assert!(sut.load_factor() <= sut.max_load_factor());
                }
            }
            OpI::Delete(i) => {
                let k = pool[i].as_str();
                prop_assert_eq!(sut.delete(k), model.remove(k).is_some());
                prop_assert!(!sut.contains_key(k));
            }
            OpI::Login(i, v) => {
                let k = pool[i].as_str();
                let expect = model.get(k) == Some(&v);
                prop_assert_eq!(sut.login(k, &v), expect);
                if let Some(stored) = model.get(k) {
                    prop_assert!(sut.login(k, stored));
                }
            }
            OpI::Merge {
                a,
                b,
                new,
                value,
                old_values: (va, vb),
            } => {
                // Old values are arbitrary: only existence decides the outcome.
                let (ka, kb, kn) = (pool[a].as_str(), pool[b].as_str(), pool[new].as_str());
                let expect = model.contains_key(ka)
                    && model.contains_key(kb)
                    && (!model.contains_key(kn) || kn == ka || kn == kb);
                let before: Vec<_> = sut.slots().to_vec();

                prop_assert_eq!(
                    sut.merge_accounts(ka, &va, kb, &vb, kn.to_string(), value),
                    expect
                );
                if expect {
                    model.remove(ka);
                    model.remove(kb);
                    model.insert(kn.to_string(), value);
                } else {
                    prop_assert!(sut.slots() == before.as_slice(), "failed merge mutated the table");
                }
            }
        }

        // Post-conditions after each op
        // 1) Size parity
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        // 2) At most one occupied slot per key, and exactly the model's keys
        let occupied: Vec<&String> = sut.slots().iter().filter_map(|s| s.key()).collect();
        let unique: BTreeSet<&String> = occupied.iter().copied().collect();
        prop_assert_eq!(occupied.len(), unique.len());
        let expected: BTreeSet<&String> = model.keys().collect();
        prop_assert_eq!(unique, expected);
        // 3) Every model entry is reachable through a probe walk
        for (k, v) in &model {
            prop_assert!(sut.login(k.as_str(), v));
        }
        // 4) Capacity only grows, by doubling
        let cap = sut.capacity();
        prop_assert!(cap >= capacity_before);
        prop_assert!(cap % initial_capacity == 0 && (cap / initial_capacity).is_power_of_two());
    }
    Ok(())
}

// Property: the length-hashed table (heavy clustering) matches the model.
// Exercised invariants: duplicate rejection, tombstone skipping, reuse of
// freed slots, load-factor bound, all-or-nothing merges.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_key_length((config, pool, ops) in arb_scenario()) {
        let sut: ProbeTable<String, u32> = ProbeTable::with_hasher(config, KeyLength).unwrap();
        run(sut, &pool, ops)?;
    }
}

// Same invariants with a real hash function spreading keys across slots.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_hashed((config, pool, ops) in arb_scenario()) {
        let sut: ProbeTable<String, u32, Hashed> =
            ProbeTable::with_hasher(config, Hashed::default()).unwrap();
        run(sut, &pool, ops)?;
    }
}
