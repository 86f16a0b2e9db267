use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::NaiveDate;
use shelfcast_core::ProductId;
use shelfcast_forecast::{EngineConfig, ForecastEngine};
use shelfcast_sales::DailySeries;

/// A year of daily sales with a weekly cycle and a slow upward drift.
fn yearly_series(days: usize) -> DailySeries {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let quantities = (0..days)
        .map(|i| {
            let weekly = [8, 9, 10, 9, 12, 20, 18][i % 7];
            weekly + (i / 30) as u64
        })
        .collect();
    DailySeries::from_quantities(ProductId::new("Milk").unwrap(), start, quantities).unwrap()
}

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("forecast");

    for days in [30usize, 365, 1_095] {
        let series = yearly_series(days);
        group.throughput(Throughput::Elements(days as u64));

        let trend = ForecastEngine::new(EngineConfig::default());
        group.bench_with_input(BenchmarkId::new("trend", days), &series, |b, s| {
            b.iter(|| trend.forecast(black_box(s), black_box(30)))
        });

        let naive = ForecastEngine::new(EngineConfig {
            trend_enabled: false,
            ..EngineConfig::default()
        });
        group.bench_with_input(BenchmarkId::new("naive", days), &series, |b, s| {
            b.iter(|| naive.forecast(black_box(s), black_box(30)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_strategies);
criterion_main!(benches);
