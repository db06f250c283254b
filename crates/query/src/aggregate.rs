//! Scalar summaries over the full (unfiltered) entity store.
//!
//! These are recomputed on every call; nothing is cached.

use std::collections::BTreeSet;
use core::cmp::Ordering;
use core::iter::Sum;

pub fn count_where<T>(records: &[T], predicate: impl Fn(&T) -> bool) -> usize {
    records.iter().filter(|r| predicate(r)).count()
}

pub fn sum_by<T, N>(records: &[T], value: impl Fn(&T) -> N) -> N
where
    N: Sum<N>,
{
    records.iter().map(value).sum()
}

pub fn sum_where<T, N>(
    records: &[T],
    predicate: impl Fn(&T) -> bool,
    value: impl Fn(&T) -> N,
) -> N
where
    N: Sum<N>,
{
    records.iter().filter(|r| predicate(r)).map(value).sum()
}

/// Record with the greatest key; the earliest record wins ties.
pub fn max_by_first<T, K>(records: &[T], key: impl Fn(&T) -> K) -> Option<&T>
where
    K: PartialOrd,
{
    extremum_by_first(records, key, Ordering::Greater)
}

/// Record with the smallest key; the earliest record wins ties.
pub fn min_by_first<T, K>(records: &[T], key: impl Fn(&T) -> K) -> Option<&T>
where
    K: PartialOrd,
{
    extremum_by_first(records, key, Ordering::Less)
}

fn extremum_by_first<T, K>(records: &[T], key: impl Fn(&T) -> K, wanted: Ordering) -> Option<&T>
where
    K: PartialOrd,
{
    let mut iter = records.iter();
    let first = iter.next()?;
    let mut best = (first, key(first));
    for record in iter {
        let k = key(record);
        if k.partial_cmp(&best.1) == Some(wanted) {
            best = (record, k);
        }
    }
    Some(best.0)
}

/// Distinct values of a field, sorted ascending.
pub fn distinct_sorted<T, V>(records: &[T], value: impl Fn(&T) -> V) -> Vec<V>
where
    V: Ord,
{
    records.iter().map(value).collect::<BTreeSet<_>>().into_iter().collect()
}

/// `part / whole` as a percentage; zero when `whole` is zero.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 * 100.0 / whole as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Cat {
        name: &'static str,
        items: u32,
        active: bool,
    }

    fn cats() -> Vec<Cat> {
        vec![
            Cat { name: "Electronics", items: 45, active: true },
            Cat { name: "Clothing", items: 45, active: true },
            Cat { name: "Books", items: 0, active: false },
        ]
    }

    #[test]
    fn counts_and_sums() {
        let c = cats();
        assert_eq!(count_where(&c, |c| c.active), 2);
        assert_eq!(sum_by(&c, |c| c.items as i64), 90);
        assert_eq!(sum_where(&c, |c| c.active, |c| c.items as i64), 90);
        assert_eq!(sum_where(&c, |c| !c.active, |c| c.items as i64), 0);
    }

    #[test]
    fn extremum_ties_go_to_the_first_record() {
        let c = cats();
        assert_eq!(max_by_first(&c, |c| c.items).map(|c| c.name), Some("Electronics"));
        assert_eq!(min_by_first(&c, |c| c.items).map(|c| c.name), Some("Books"));
    }

    #[test]
    fn extremum_of_empty_store_is_none() {
        let empty: Vec<Cat> = Vec::new();
        assert!(max_by_first(&empty, |c| c.items).is_none());
    }

    #[test]
    fn extremum_skips_nan_keys() {
        let ratings = [4.5_f64, f64::NAN, 4.9, 4.9];
        let best = max_by_first(&ratings, |r| *r).copied();
        assert_eq!(best, Some(4.9));
    }

    #[test]
    fn distinct_values_are_sorted_and_unique() {
        let c = cats();
        let names = distinct_sorted(&c, |c| c.active);
        assert_eq!(names, vec![false, true]);
    }

    #[test]
    fn percentage_of_empty_whole_is_zero() {
        assert_eq!(percentage(3, 0), 0.0);
        assert_eq!(percentage(1, 4), 25.0);
    }
}
