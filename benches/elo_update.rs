//! Performance benchmarks for rating updates and consolidation

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dish_arena::rating::consolidate::consolidate;
use dish_arena::rating::elo::DEFAULT_K_FACTOR;
use dish_arena::rating::store::RatingStore;
use dish_arena::types::{MatchRecord, RatingRecord};

fn populated_store(dishes: usize) -> RatingStore {
    let mut store = RatingStore::new();
    for i in 0..dishes {
        store.insert_raw(
            format!("dish-{i}"),
            RatingRecord::new(1500.0 + (i % 200) as f64, (i % 10) as u64),
        );
    }
    store
}

fn bench_record_match(c: &mut Criterion) {
    c.bench_function("record_match_on_large_store", |b| {
        let mut store = populated_store(1000);
        let mut i = 0usize;
        b.iter(|| {
            let winner = format!("dish-{}", i % 1000);
            let loser = format!("dish-{}", (i + 1) % 1000);
            i += 1;
            black_box(
                store
                    .record_match(&winner, &loser, DEFAULT_K_FACTOR)
                    .unwrap(),
            )
        });
    });
}

fn bench_consolidate(c: &mut Criterion) {
    // Every dish has a compound duplicate, and the history references a
    // mix of both forms.
    let mut store = populated_store(500);
    for i in 0..500 {
        store.insert_raw(
            format!("dish-{i} | variant"),
            RatingRecord::new(1520.0, (i % 4) as u64),
        );
    }

    let history: Vec<MatchRecord> = (0..2000)
        .map(|i| {
            MatchRecord::new(
                format!("dish-{} | variant", i % 500),
                format!("dish-{}", (i + 1) % 500),
            )
        })
        .collect();

    c.bench_function("consolidate_500_duplicate_groups", |b| {
        b.iter(|| black_box(consolidate(&store, &history)));
    });
}

criterion_group!(benches, bench_record_match, bench_consolidate);
criterion_main!(benches);
