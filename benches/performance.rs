use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_decimal::Decimal;
use std::time::Duration;

use ledger_core::models::LedgerEntry;
use ledger_core::observability::LatencyTimer;
use ledger_core::reference::{ReferenceConfig, ReferenceGenerator};
use ledger_core::services::{validate_amount, validate_transfer_endpoints};
use ledger_core::store::{LedgerStore, MemoryLedgerStore, SearchFilter};

fn benchmark_entry_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("entry");

    group.bench_function("create_deposit", |b| {
        b.iter(|| {
            let entry = LedgerEntry::deposit(
                black_box("acc-1"),
                black_box(Decimal::from(1000)),
                black_box("TXN-BENCH001"),
            );
            black_box(entry)
        });
    });

    group.bench_function("create_transfer_with_recipient", |b| {
        b.iter(|| {
            let entry = LedgerEntry::transfer(
                black_box("acc-1"),
                black_box("NL91ABNA0417164300"),
                black_box(Decimal::from(750)),
                black_box("TXN-BENCH002"),
            )
            .with_user(black_box(7))
            .with_reason(black_box("Rent"))
            .with_recipient(black_box(4), "Jordan Example", "NL91ABNA0417164300");
            black_box(entry)
        });
    });

    group.finish();
}

fn benchmark_reference_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("reference");

    group.bench_function("generate_default", |b| {
        let generator = ReferenceGenerator::with_default_config();
        b.iter(|| {
            let reference = generator.generate();
            black_box(reference)
        });
    });

    for suffix_len in [4usize, 8, 16].iter() {
        group.bench_with_input(
            BenchmarkId::new("generate_suffix", suffix_len),
            suffix_len,
            |b, &suffix_len| {
                let generator = ReferenceGenerator::new(ReferenceConfig {
                    prefix: "TXN".to_string(),
                    suffix_len,
                    max_attempts: 5,
                });
                b.iter(|| {
                    let reference = generator.generate();
                    black_box(reference)
                });
            },
        );
    }

    group.finish();
}

fn benchmark_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation");

    group.bench_function("validate_amount_ok", |b| {
        let amount = Decimal::new(1234_5678, 4);
        b.iter(|| {
            let result = validate_amount(black_box(amount));
            black_box(result)
        });
    });

    group.bench_function("validate_amount_rejected", |b| {
        let amount = Decimal::new(-100, 0);
        b.iter(|| {
            let result = validate_amount(black_box(amount));
            black_box(result)
        });
    });

    group.bench_function("validate_transfer_endpoints", |b| {
        b.iter(|| {
            let result =
                validate_transfer_endpoints(black_box("acc-1"), black_box("acc-2"));
            black_box(result)
        });
    });

    group.finish();
}

fn benchmark_memory_search(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("search");
    group.measurement_time(Duration::from_secs(10));

    for size in [100i64, 1_000, 10_000].iter() {
        let store = rt.block_on(async {
            let store = MemoryLedgerStore::new();
            for i in 0..*size {
                let mut entry = LedgerEntry::deposit(
                    format!("acc-{}", i % 20),
                    Decimal::from((i % 1000) + 1),
                    format!("TXN-{:08}", i),
                )
                .with_user(i % 50);
                if i % 10 == 0 {
                    entry = entry.with_reason("Rent");
                }
                store.save(&entry).await.unwrap();
            }
            store
        });
        let filter = SearchFilter::default().with_search("rent").with_page(0, 50);

        group.bench_with_input(BenchmarkId::new("free_text", size), size, |b, _| {
            b.to_async(&rt).iter(|| async {
                let page = store.search(&filter).await.unwrap();
                black_box(page.total_elements)
            });
        });
    }

    group.finish();
}

fn benchmark_latency_timer(c: &mut Criterion) {
    let mut group = c.benchmark_group("latency_timer");

    group.bench_function("create_and_elapsed", |b| {
        b.iter(|| {
            let timer = LatencyTimer::new();
            let elapsed = timer.elapsed_ms();
            black_box(elapsed)
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_entry_creation,
    benchmark_reference_generation,
    benchmark_validation,
    benchmark_memory_search,
    benchmark_latency_timer
);
criterion_main!(benches);
