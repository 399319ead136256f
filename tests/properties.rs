use polyfill_utils as pu;
use proptest::prelude::*;
use pu::{filter, fold, map, reduce};

proptest! {
    #[test]
    fn filter_keeps_order_and_predicate(
        xs in prop::collection::vec(-100i64..100, 0..50),
        pivot in -100i64..100,
    ) {
        let out = filter(&xs, |x, _, _| *x > pivot);
        prop_assert!(out.len() <= xs.len());
        prop_assert!(out.iter().all(|x| *x > pivot));
        let expected: Vec<i64> = xs.iter().copied().filter(|x| *x > pivot).collect();
        prop_assert_eq!(out, expected);
    }

    #[test]
    fn map_is_pointwise(xs in prop::collection::vec(-1000i64..1000, 0..50)) {
        let out = map(&xs, |x, i, all| {
            assert_eq!(all.len(), xs.len());
            x * 3 + i as i64
        });
        prop_assert_eq!(out.len(), xs.len());
        for (i, x) in xs.iter().enumerate() {
            prop_assert_eq!(out[i], x * 3 + i as i64);
        }
    }

    #[test]
    fn seeded_reduce_matches_sum(
        xs in prop::collection::vec(-1000i64..1000, 0..50),
        seed in -1000i64..1000,
    ) {
        let mut calls = 0usize;
        let sum = |acc: i64, x: &i64, _: usize, _: &[i64]| {
            calls += 1;
            acc + x
        };
        let total = reduce(&xs, sum, Some(seed)).unwrap();
        prop_assert_eq!(total, seed + xs.iter().sum::<i64>());
        prop_assert_eq!(calls, xs.len());
    }

    #[test]
    fn unseeded_reduce_skips_first(xs in prop::collection::vec(-1000i64..1000, 1..50)) {
        let mut calls = 0usize;
        let sum = |acc: i64, x: &i64, _: usize, _: &[i64]| {
            calls += 1;
            acc + x
        };
        let total = reduce(&xs, sum, None).unwrap();
        prop_assert_eq!(total, xs.iter().sum::<i64>());
        prop_assert_eq!(calls, xs.len() - 1);
    }

    #[test]
    fn fold_counts(xs in prop::collection::vec(any::<u8>(), 0..50)) {
        prop_assert_eq!(fold(&xs, |n, _, _, _| n + 1, 0usize), xs.len());
    }
}
