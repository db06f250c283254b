use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chrono::{DateTime, Duration, TimeZone, Utc};
use core::cmp::Ordering;
use stockdesk_core::Entity;
use stockdesk_query::date_bucket::matches_bucket;
use stockdesk_query::{
    DateBucket, Facet, ListView, RecordFilter, Searchable, SortKey, TextSearch, compare_text,
};

#[derive(Debug, Clone)]
struct BenchRow {
    id: u64,
    name: String,
    sku: String,
    category: String,
    stamped_at: DateTime<Utc>,
}

impl Entity for BenchRow {
    type Id = u64;

    fn id(&self) -> &u64 {
        &self.id
    }
}

impl Searchable for BenchRow {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.sku]
    }
}

struct BenchFilter {
    search: TextSearch,
    category: Facet<String>,
    bucket: Option<DateBucket>,
}

impl RecordFilter<BenchRow> for BenchFilter {
    fn matches(&self, r: &BenchRow, now: DateTime<Utc>) -> bool {
        self.search.matches(r.search_fields())
            && self.category.matches_str(&r.category)
            && matches_bucket(self.bucket, r.stamped_at, now)
    }
}

struct ByName;

impl SortKey<BenchRow> for ByName {
    fn compare(&self, a: &BenchRow, b: &BenchRow) -> Ordering {
        compare_text(&a.name, &b.name)
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 11, 20, 12, 0, 0).unwrap()
}

fn build_store(n: u64) -> Vec<BenchRow> {
    const CATEGORIES: [&str; 4] = ["Electronics", "Clothing", "Sports", "Home & Garden"];
    (0..n)
        .map(|i| BenchRow {
            id: i,
            name: format!("Item {}", n - i),
            sku: format!("SKU-{i:05}"),
            category: CATEGORIES[(i % 4) as usize].to_string(),
            stamped_at: now() - Duration::hours(i as i64),
        })
        .collect()
}

fn bench_refresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_view_refresh");
    for size in [100u64, 1_000, 10_000] {
        let store = build_store(size);
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &store, |b, store| {
            let mut view = ListView::new(
                BenchFilter {
                    search: TextSearch::new("item 1"),
                    category: Facet::is("Electronics".to_string()),
                    bucket: Some(DateBucket::Month),
                },
                ByName,
            );
            b.iter(|| black_box(view.refresh(black_box(store), now()).len()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_refresh);
criterion_main!(benches);
