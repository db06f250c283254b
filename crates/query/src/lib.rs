//! `stockdesk-query`: the list-view controller engine.
//!
//! Every entity screen composes the same pieces: a free-text search, a handful of
//! categorical facets, an optional date bucket, a stable sort, aggregates over the
//! unfiltered store, and a selection set scoped to the visible rows. This crate
//! holds those pieces once so the screens only describe *which* fields take part.

pub mod aggregate;
pub mod date_bucket;
pub mod facet;
pub mod filter;
pub mod pagination;
pub mod search;
pub mod selection;
pub mod sort;
pub mod view;

pub use date_bucket::DateBucket;
pub use facet::{Facet, FacetSet};
pub use filter::{RecordFilter, Searchable, apply_filter, run_query};
pub use pagination::Pagination;
pub use search::TextSearch;
pub use selection::Selection;
pub use sort::{Descending, NoSort, SortKey, compare_text, sort_stable};
pub use view::ListView;
