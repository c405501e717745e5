//! Criterion benchmarks for logf
//!
//! Every logger writes to `io::sink()`, so the numbers cover gating,
//! encoding, pooling and the sink lock, not I/O.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use logf::prelude::*;
use std::fmt;
use std::io;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct FakeError;

impl fmt::Display for FakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("fake error")
    }
}

impl std::error::Error for FakeError {}

fn discard() -> LoggerBuilder {
    Logger::builder().writer(io::sink())
}

fn log_three_fields(logger: &Logger) {
    logger.info(
        black_box("request completed"),
        &[
            "component".into(),
            "api".into(),
            "method".into(),
            "GET".into(),
            "bytes".into(),
            Value::Int(1 << 18),
        ],
    );
}

fn log_huge_payload(logger: &Logger) {
    logger.info(
        black_box("fetched details"),
        &[
            "id".into(),
            Value::Int(11),
            "title".into(),
            "perfume Oil".into(),
            "description".into(),
            "Mega Discount, Impression of A...".into(),
            "price".into(),
            Value::Int(13),
            "discountPercentage".into(),
            Value::Float(8.4),
            "rating".into(),
            Value::Float(4.26),
            "stock".into(),
            Value::Int(65),
            "brand".into(),
            "Impression of Acqua Di Gio".into(),
            "category".into(),
            "fragrances".into(),
            "thumbnail".into(),
            "https://dummyjson.com/image/i/products/11/thumbnail.jpg".into(),
        ],
    );
}

// ============================================================================
// Plain output
// ============================================================================

fn bench_plain(c: &mut Criterion) {
    let mut group = c.benchmark_group("plain");
    group.throughput(Throughput::Elements(1));

    let logger = discard().build();
    let with_defaults = discard()
        .default_fields(&["component".into(), "logf".into()])
        .build();
    let fake_err = FakeError;

    group.bench_function("no_field", |b| {
        b.iter(|| logger.info(black_box("hello world"), &[]));
    });

    group.bench_function("one_field", |b| {
        b.iter(|| logger.info(black_box("hello world"), &["stack".into(), "testing".into()]));
    });

    group.bench_function("one_field_with_default_fields", |b| {
        b.iter(|| {
            with_defaults.info(black_box("hello world"), &["stack".into(), "testing".into()])
        });
    });

    group.bench_function("seven_fields", |b| {
        let values = ["valuea", "valueb", "valuec", "valued", "valuee", "valuef", "valueg"];
        b.iter(|| {
            logger.info(
                black_box("request completed"),
                &[
                    "a".into(),
                    values[0].into(),
                    "b".into(),
                    values[1].into(),
                    "c".into(),
                    values[2].into(),
                    "d".into(),
                    values[3].into(),
                    "e".into(),
                    values[4].into(),
                    "f".into(),
                    values[5].into(),
                    "g".into(),
                    values[6].into(),
                ],
            )
        });
    });

    group.bench_function("three_fields", |b| {
        b.iter(|| log_three_fields(&logger));
    });

    group.bench_function("error_field", |b| {
        b.iter(|| logger.error(black_box("request fields"), &["error".into(), Value::error(&fake_err)]));
    });

    group.bench_function("huge_payload", |b| {
        b.iter(|| log_huge_payload(&logger));
    });

    group.bench_function("disabled_level", |b| {
        b.iter(|| logger.debug(black_box("hello world"), &["stack".into(), "testing".into()]));
    });

    group.finish();
}

// ============================================================================
// Caller and color decoration
// ============================================================================

fn bench_decorated(c: &mut Criterion) {
    let mut group = c.benchmark_group("decorated");
    group.throughput(Throughput::Elements(1));

    let with_caller = discard()
        .enable_caller(true)
        .caller_skip_frame_count(3)
        .build();
    // One extra frame for the untracked `log_three_fields` helper
    let with_backtrace = discard()
        .enable_caller(true)
        .caller_resolver(logf::BacktraceResolver)
        .caller_skip_frame_count(logf::DEFAULT_CALLER_SKIP + 1)
        .build();
    let colored = discard().enable_color(true).build();
    let fake_err = FakeError;

    group.bench_function("three_fields_with_caller", |b| {
        b.iter(|| log_three_fields(&with_caller));
    });

    group.bench_function("three_fields_with_backtrace_caller", |b| {
        b.iter(|| log_three_fields(&with_backtrace));
    });

    group.bench_function("no_field_with_color", |b| {
        b.iter(|| colored.info(black_box("hello world"), &[]));
    });

    group.bench_function("one_field_with_color", |b| {
        b.iter(|| colored.info(black_box("hello world"), &["stack".into(), "testing".into()]));
    });

    group.bench_function("three_fields_with_color", |b| {
        b.iter(|| log_three_fields(&colored));
    });

    group.bench_function("error_field_with_color", |b| {
        b.iter(|| colored.error(black_box("request fields"), &["error".into(), Value::error(&fake_err)]));
    });

    group.bench_function("huge_payload_with_color", |b| {
        b.iter(|| log_huge_payload(&colored));
    });

    group.finish();
}

// ============================================================================
// Concurrent Logging Benchmarks
// ============================================================================

/// Split `iters` calls across `threads` threads sharing one logger
fn run_parallel(logger: &Logger, threads: u64, iters: u64, f: fn(&Logger)) -> Duration {
    let per_thread = iters.div_ceil(threads);
    let start = Instant::now();
    std::thread::scope(|scope| {
        for _ in 0..threads {
            scope.spawn(|| {
                for _ in 0..per_thread {
                    f(logger);
                }
            });
        }
    });
    start.elapsed()
}

fn bench_concurrent_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_logging");
    group.throughput(Throughput::Elements(1));

    let logger = discard().build();
    let colored = discard().enable_color(true).build();

    for threads in [1u64, 4, 8] {
        group.bench_function(format!("three_fields_{}_threads", threads), |b| {
            b.iter_custom(|iters| run_parallel(&logger, threads, iters, log_three_fields));
        });

        group.bench_function(format!("huge_payload_with_color_{}_threads", threads), |b| {
            b.iter_custom(|iters| run_parallel(&colored, threads, iters, log_huge_payload));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_plain, bench_decorated, bench_concurrent_logging);

criterion_main!(benches);
