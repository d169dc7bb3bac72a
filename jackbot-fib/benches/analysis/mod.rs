use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use criterion::{Criterion, Throughput};
use jackbot_fib::{
    FibonacciAnalyser, bar::Bar, config::AnalysisConfig, swing::detector::SwingPointDetector,
};
use rust_decimal::Decimal;
use std::hint::black_box;

criterion::criterion_main!(benchmark_analysis);

const BAR_COUNTS: [usize; 3] = [200, 1_000, 10_000];

fn benchmark_analysis() {
    let mut c = Criterion::default().without_plots();

    bench_swing_detection(&mut c);
    bench_analysis(&mut c);
}

fn bench_swing_detection(c: &mut Criterion) {
    let detector = SwingPointDetector::from_config(&AnalysisConfig::default());

    let mut group = c.benchmark_group("Swing Detection");
    group.warm_up_time(std::time::Duration::from_secs(1));
    group.measurement_time(std::time::Duration::from_secs(5));

    for count in BAR_COUNTS {
        let bars = oscillating_bars(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(count.to_string(), |b| {
            b.iter(|| detector.detect(black_box(&bars)))
        });
    }

    group.finish();
}

fn bench_analysis(c: &mut Criterion) {
    let analyser = FibonacciAnalyser::default();

    let mut group = c.benchmark_group("Fibonacci Analysis");
    group.warm_up_time(std::time::Duration::from_secs(1));
    group.measurement_time(std::time::Duration::from_secs(5));

    for count in BAR_COUNTS {
        let bars = oscillating_bars(count);
        let now = Some(time_base() + TimeDelta::hours(count as i64));
        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(count.to_string(), |b| {
            b.iter(|| analyser.analyse(black_box(&bars), now).unwrap())
        });
    }

    group.finish();
}

fn time_base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// Hourly zigzag bars with a 40 bar period and an upward drift.
fn oscillating_bars(count: usize) -> Vec<Bar> {
    (0..count)
        .map(|index| {
            let phase = (index % 40) as i64;
            let drift = Decimal::new(index as i64, 2);
            let mid = Decimal::from(1_000 + (phase - 20).abs() * 5) + drift;
            let volume = Decimal::from(100 + (index % 7) as i64 * 25);

            Bar::new(
                time_base() + TimeDelta::hours(index as i64),
                mid,
                mid + Decimal::ONE,
                mid - Decimal::ONE,
                mid,
                volume,
            )
        })
        .collect()
}
