//! The filter pass: AND of search, facets and date bucket, order-preserving.

use chrono::{DateTime, Utc};

use crate::sort::{SortKey, sort_stable};

/// A record that exposes the fields free-text search looks at.
///
/// The default designates no fields, so a non-empty search term never matches.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str> {
        Vec::new()
    }
}

/// Filter configuration for one entity screen.
///
/// Implementations combine their predicates with logical AND. `now` is the
/// reference instant for date buckets.
pub trait RecordFilter<T> {
    fn matches(&self, record: &T, now: DateTime<Utc>) -> bool;
}

/// Records satisfying `filter`, in store order.
pub fn apply_filter<'a, T, F>(records: &'a [T], filter: &F, now: DateTime<Utc>) -> Vec<&'a T>
where
    F: RecordFilter<T> + ?Sized,
{
    records.iter().filter(|r| filter.matches(r, now)).collect()
}

/// Filter first, then stable-sort the survivors.
pub fn run_query<'a, T, F, S>(
    records: &'a [T],
    filter: &F,
    sort: &S,
    now: DateTime<Utc>,
) -> Vec<&'a T>
where
    F: RecordFilter<T> + ?Sized,
    S: SortKey<T> + ?Sized,
{
    let mut rows = apply_filter(records, filter, now);
    sort_stable(&mut rows, sort);
    rows
}
