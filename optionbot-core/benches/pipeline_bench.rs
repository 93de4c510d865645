//! Criterion benchmarks for OptionBot hot paths.
//!
//! Benchmarks:
//! 1. Per-tick pipeline (aggregation, position management, entry evaluation)
//! 2. Rule evaluation on a full snapshot
//! 3. RSI over the full underlying history

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use optionbot_core::data::MarketSnapshot;
use optionbot_core::domain::{Candle, OptionSide, Tick};
use optionbot_core::indicators::rsi;
use optionbot_core::rules::{RuleConfig, RuleEvaluator};
use optionbot_core::{BotConfig, DecisionPipeline};

// ── Helpers ──────────────────────────────────────────────────────────

/// Seeded random walk, ten ticks per minute, alternating OI side.
fn make_ticks(n: usize) -> Vec<Tick> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut price = 120.0_f64;
    let mut underlying = 22_500.0_f64;
    let mut call_oi = 1_000_000_i64;
    let mut put_oi = 1_000_000_i64;
    (0..n)
        .map(|i| {
            price = (price + rng.gen_range(-0.8..0.8)).max(1.0);
            underlying = (underlying + rng.gen_range(-3.0..3.0)).max(1.0);
            let (side, oi) = if i % 2 == 0 {
                call_oi = (call_oi + rng.gen_range(-500..500)).max(0);
                (OptionSide::Call, call_oi)
            } else {
                put_oi = (put_oi + rng.gen_range(-500..500)).max(0);
                (OptionSide::Put, put_oi)
            };
            let volume = rng.gen_range(1.0..500.0);
            let ts = 1_700_000_000 + (i as i64) * 6;
            Tick::new(price, volume, oi, side, underlying, ts).expect("generated tick is valid")
        })
        .collect()
}

fn make_candles(n: usize) -> Vec<Candle> {
    let mut rng = StdRng::seed_from_u64(7);
    let mut close = 100.0_f64;
    (0..n)
        .map(|i| {
            let open = close;
            close = (close + rng.gen_range(-1.0..1.0)).max(1.0);
            Candle {
                start: 1_700_000_000 + i as i64 * 300,
                open,
                high: open.max(close) + rng.gen_range(0.0..0.5),
                low: open.min(close) - rng.gen_range(0.0..0.5),
                close,
                volume: rng.gen_range(500.0..2_000.0),
            }
        })
        .collect()
}

fn strike(side: OptionSide, underlying: f64) -> String {
    format!("NIFTY{}{}", (underlying / 50.0).round() as i64 * 50, side.suffix())
}

// ── 1. Pipeline ──────────────────────────────────────────────────────

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let now = NaiveDate::from_ymd_opt(2024, 3, 15)
        .and_then(|d| d.and_hms_opt(10, 0, 0))
        .expect("valid time");

    for &tick_count in &[1_000, 10_000] {
        let ticks = make_ticks(tick_count);
        group.bench_with_input(BenchmarkId::new("on_tick", tick_count), &ticks, |b, ticks| {
            b.iter(|| {
                let mut pipeline =
                    DecisionPipeline::new(BotConfig::default(), Box::new(strike)).expect("default config is valid");
                let mut intents = 0;
                for tick in ticks {
                    intents += pipeline.on_tick_at(black_box(tick), now).len();
                }
                intents
            });
        });
    }

    group.finish();
}

// ── 2. Rule evaluation ───────────────────────────────────────────────

fn bench_evaluate(c: &mut Criterion) {
    let now = NaiveDate::from_ymd_opt(2024, 3, 15)
        .and_then(|d| d.and_hms_opt(10, 0, 0))
        .expect("valid time");
    let snapshot = MarketSnapshot::new(
        "NIFTY",
        make_candles(200),
        (0..200).map(|i| 1_000_000 - i * 10).collect(),
        (0..200).map(|i| 1_000_000 + i * 10).collect(),
        52.0,
        now,
        5,
    );
    let evaluator = RuleEvaluator::new(RuleConfig::default()).expect("default rules are valid");

    c.bench_function("evaluate_200_candles", |b| {
        b.iter(|| evaluator.evaluate(black_box(&snapshot)))
    });
}

// ── 3. RSI ───────────────────────────────────────────────────────────

fn bench_rsi(c: &mut Criterion) {
    let prices: Vec<f64> = make_candles(200).iter().map(|c| c.close).collect();
    c.bench_function("rsi_14_over_200", |b| b.iter(|| rsi(black_box(&prices), 14)));
}

criterion_group!(benches, bench_pipeline, bench_evaluate, bench_rsi);
criterion_main!(benches);
