use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::BTreeMap;

fn validate_map<V>(m: &SpanMap<V>) {
    let cap = m.slots.len();
    if m.len == 0 {
        assert_eq!(cap, 0, "empty map must release its slots");
        assert_eq!((m.min, m.max), (0, 0), "empty map must reset bounds");
        return;
    }

    assert!(cap.is_power_of_two(), "capacity {cap} is not a power of two");
    assert!(cap <= m.config.max_capacity, "capacity above configured max");
    assert_eq!(m.mask, cap as u64 - 1, "mask must match capacity");
    assert_eq!(m.shrink_at, m.config.shrink_at(cap), "stale shrink threshold");
    assert!(m.min <= m.max, "min {} above max {}", m.min, m.max);
    assert!(m.holds(m.min), "min {} not live", m.min);
    assert!(m.holds(m.max), "max {} not live", m.max);

    let mut occupied = 0usize;
    for (pos, slot) in m.slots.iter().enumerate() {
        if let Some(e) = slot {
            occupied += 1;
            assert_eq!((e.key & m.mask) as usize, pos, "key {} in wrong slot", e.key);
            assert!(
                (m.min..=m.max).contains(&e.key),
                "key {} outside [{}, {}]",
                e.key,
                m.min,
                m.max
            );
        }
    }
    assert_eq!(occupied, m.len, "occupied slots must match SpanMap::len");
}

/// Keys cluster in a window so that removals hit live keys and bounds move.
fn dense_key() -> impl Strategy<Value = u64> {
    0u64..256
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 5)]
    Insert(#[proptest(strategy = "dense_key()")] u64, u32),
    #[proptest(weight = 3)]
    Remove(#[proptest(strategy = "dense_key()")] u64),
    #[proptest(weight = 2)]
    Get(#[proptest(strategy = "dense_key()")] u64),
    #[proptest(weight = 1)]
    SetAbsent(#[proptest(strategy = "dense_key()")] u64),
}

fn run_ops(base: u64, ops: Vec<Op>) -> Result<(), TestCaseError> {
    let mut m: SpanMap<u32> = SpanMap::new();
    let mut model: BTreeMap<u64, u32> = BTreeMap::new();

    for op in ops {
        match op {
            Op::Insert(k, v) => {
                let key = base + k;
                prop_assert_eq!(m.insert(key, v), model.insert(key, v));
            }
            Op::Remove(k) => {
                let key = base + k;
                prop_assert_eq!(m.remove(key), model.remove(&key));
            }
            Op::Get(k) => {
                let key = base + k;
                prop_assert_eq!(m.get(key), model.get(&key));
            }
            Op::SetAbsent(k) => {
                let key = base + k;
                prop_assert_eq!(m.set(key, None), Err(Error::InvalidValue { key }));
            }
        }

        prop_assert_eq!(m.len(), model.len());
        let lo = model.keys().next().copied().unwrap_or(0);
        let hi = model.keys().next_back().copied().unwrap_or(0);
        prop_assert_eq!((m.min(), m.max()), (lo, hi));
        validate_map(&m);
    }

    for (&k, v) in &model {
        prop_assert_eq!(m.get(k), Some(v));
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_low_keys(ops in prop::collection::vec(any::<Op>(), 0..=1000)) {
        run_ops(0, ops)?;
    }

    #[test]
    fn prop_equivalence_offset_keys(
        base in any::<u64>(),
        ops in prop::collection::vec(any::<Op>(), 0..=1000)
    ) {
        // Keep the whole window below u64::MAX; a wrapped window is sparse.
        run_ops(base.min(u64::MAX - 255), ops)?;
    }

    #[test]
    fn prop_drain_in_any_order(keys in prop::collection::btree_set(0u64..512, 1..64), seed in any::<u64>()) {
        use rand::rngs::StdRng;
        use rand::seq::SliceRandom;
        use rand::SeedableRng;

        let mut m: SpanMap<u64> = SpanMap::new();
        for &k in &keys {
            prop_assert_eq!(m.insert(k, k * 2), None);
        }
        validate_map(&m);

        let mut order: Vec<u64> = keys.iter().copied().collect();
        order.shuffle(&mut StdRng::seed_from_u64(seed));
        let mut live = keys.clone();
        for k in order {
            prop_assert_eq!(m.remove(k), Some(k * 2));
            live.remove(&k);
            validate_map(&m);
            if let (Some(&lo), Some(&hi)) = (live.first(), live.last()) {
                prop_assert_eq!((m.min(), m.max()), (lo, hi));
            }
        }
        prop_assert!(m.is_empty());
        prop_assert_eq!(m.capacity(), 0);
    }
}

#[test]
fn exhaustive_remove_order_small_set() {
    fn for_each_permutation(items: &[u64], f: &mut impl FnMut(&[u64])) {
        fn rec(items: &[u64], used: &mut [bool], out: &mut Vec<u64>, f: &mut impl FnMut(&[u64])) {
            if out.len() == items.len() {
                f(out.as_slice());
                return;
            }
            for i in 0..items.len() {
                if used[i] {
                    continue;
                }
                used[i] = true;
                out.push(items[i]);
                rec(items, used, out, f);
                out.pop();
                used[i] = false;
            }
        }

        let mut used = vec![false; items.len()];
        let mut out = Vec::with_capacity(items.len());
        rec(items, &mut used, &mut out, f);
    }

    // Mix of neighbours and keys sharing low bits.
    let keys = [3u64, 4, 5, 11, 19, 20];
    let mut base: SpanMap<u64> = SpanMap::new();
    for &k in &keys {
        base.insert(k, k);
    }
    validate_map(&base);

    for_each_permutation(&keys, &mut |perm: &[u64]| {
        let mut m = base.clone();
        for (n, &k) in perm.iter().enumerate() {
            assert_eq!(m.remove(k), Some(k));
            assert_eq!(m.len(), keys.len() - n - 1);
            validate_map(&m);
        }
        assert!(m.slots.is_empty());
    });
}
