/// Benchmark: request counter hot path
///
/// Every HTTP request bumps two counters, so the increments have to stay cheap
/// under contention from many worker threads.
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use poolsight::metrics::MetricsRegistry;
use std::sync::Arc;
use std::thread;

fn bench_request_hooks_single_thread(c: &mut Criterion) {
    let metrics = MetricsRegistry::new();

    c.bench_function("request_hooks_single_thread", |b| {
        b.iter(|| {
            for status in [200u16, 404, 503, 302] {
                metrics.increment_request_total();
                metrics.record_request_outcome(black_box(status));
            }
        });
    });
}

fn bench_request_hooks_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("request_hooks_contended");

    for threads in [2usize, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            let metrics = Arc::new(MetricsRegistry::new());
            b.iter(|| {
                thread::scope(|scope| {
                    for _ in 0..threads {
                        let metrics = metrics.clone();
                        scope.spawn(move || {
                            for _ in 0..1000 {
                                metrics.increment_request_total();
                                metrics.record_request_outcome(200);
                            }
                        });
                    }
                });
            });
        });
    }

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let metrics = MetricsRegistry::new();
    for _ in 0..1000 {
        metrics.increment_db_total();
        metrics.record_db_outcome(true);
    }

    c.bench_function("snapshot", |b| {
        b.iter(|| black_box(metrics.snapshot().request_success_rate()));
    });
}

criterion_group!(
    benches,
    bench_request_hooks_single_thread,
    bench_request_hooks_contended,
    bench_snapshot
);
criterion_main!(benches);
