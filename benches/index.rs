//! Per-invocation latency of `UpdateDocument` against a live service.
//!
//! Expects the search service to be reachable at `SEARCH_ADDR`
//! (default `http://127.0.0.1:8443`).

use criterion::{criterion_group, criterion_main, Criterion};
use index_bench::trial::Trial;

fn bench_update_document(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap();

    let addr = std::env::var("SEARCH_ADDR")
        .unwrap_or_else(|_| "http://127.0.0.1:8443".to_string());
    let trial = runtime
        .block_on(Trial::start(addr))
        .expect("search service must be running");

    c.bench_function("update_document", |b| {
        b.iter(|| runtime.block_on(trial.run_one_iteration()).unwrap())
    });

    runtime.block_on(trial.end());
}

criterion_group!(benches, bench_update_document);
criterion_main!(benches);
