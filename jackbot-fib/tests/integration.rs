use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use jackbot_fib::{
    AnalysisResult, FibonacciAnalyser,
    bar::Bar,
    config::AnalysisConfig,
    error::{AnalysisError, InsufficientData},
    fibonacci::FibonacciLevels,
    position::TrendBias,
    swing::{SwingKind, detector::SwingPointDetector, major::MajorSwing},
    time_cycle::TimeAnalysis,
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn time_base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn hourly_bar(
    index: usize,
    open: Decimal,
    high: Decimal,
    low: Decimal,
    close: Decimal,
    volume: Decimal,
) -> Bar {
    Bar::new(
        time_base() + TimeDelta::hours(index as i64),
        open,
        high,
        low,
        close,
        volume,
    )
}

/// Random walk of OHLCV bars, with prices quoted in cents multiplied by `scale`.
fn random_bars(rng: &mut StdRng, count: usize, scale: Decimal) -> Vec<Bar> {
    let mut close_cents: i64 = rng.random_range(1_000..100_000);

    (0..count)
        .map(|index| {
            let open_cents = close_cents;
            close_cents = (close_cents + rng.random_range(-500..=500)).max(10);

            let high_cents = open_cents.max(close_cents) + rng.random_range(0..=200);
            let low_cents = (open_cents.min(close_cents) - rng.random_range(0..=200)).max(1);

            let price = |cents: i64| Decimal::new(cents, 2) * scale;
            let volume = Decimal::from(rng.random_range(0..=1_000_u32));

            hourly_bar(
                index,
                price(open_cents),
                price(high_cents),
                price(low_cents),
                price(close_cents),
                volume,
            )
        })
        .collect()
}

/// Hourly bars tracing 110 -> 90 -> 105, with an 11 bar plateau at the start.
fn v_shape_bars() -> Vec<Bar> {
    (0..50)
        .map(|index: usize| {
            let offset = Decimal::from(index);
            let price = match index {
                0..=10 => dec!(110),
                11..=25 => dec!(110) - (offset - dec!(10)) * dec!(4) / dec!(3),
                _ => dec!(90) + (offset - dec!(25)) * dec!(15) / dec!(24),
            };
            hourly_bar(index, price, price, price, price, dec!(1000))
        })
        .collect()
}

fn assert_result_invariants(result: &AnalysisResult, config: &AnalysisConfig) {
    let levels = &result.fibonacci_levels;
    assert!(levels.swing_high >= levels.swing_low);
    assert!(
        levels
            .retracement
            .iter()
            .all(|level| levels.swing_low <= level.price && level.price <= levels.swing_high)
    );
    assert!(levels.extension.iter().all(|level| level.price <= levels.swing_low));
    assert!(levels.projection.iter().all(|level| level.price >= levels.swing_high));

    assert!(
        result
            .key_levels
            .windows(2)
            .all(|pair| pair[0].distance_pct <= pair[1].distance_pct)
    );

    assert!(Decimal::ZERO <= result.confidence && result.confidence <= Decimal::ONE_HUNDRED);
    for factor in [
        result.confidence_factors.data,
        result.confidence_factors.range,
        result.confidence_factors.volume,
    ] {
        assert!(Decimal::ZERO <= factor && factor <= Decimal::ONE);
    }

    assert!(result.swing_points.len() <= config.trailing_swing_points);
    assert!(
        result
            .swing_points
            .windows(2)
            .all(|pair| pair[0].timestamp <= pair[1].timestamp)
    );
    assert!(
        result
            .swing_points
            .iter()
            .all(|point| Decimal::ZERO <= point.strength && point.strength <= Decimal::ONE_HUNDRED)
    );

    if let Some(support) = result.price_analysis.nearest_support {
        assert!(support < result.current_price);
    }
    if let Some(resistance) = result.price_analysis.nearest_resistance {
        assert!(resistance > result.current_price);
    }
}

#[test]
fn test_v_shape_analysis() {
    let result = FibonacciAnalyser::default()
        .analyse(&v_shape_bars(), Some(time_base() + TimeDelta::hours(50)))
        .unwrap();

    assert_eq!(result.major_swing.high, dec!(110));
    assert_eq!(result.major_swing.low, dec!(90));
    assert_eq!(result.fibonacci_levels.retracement(dec!(0.5)), Some(dec!(100)));
    assert_eq!(result.fibonacci_levels.extension(dec!(1.618)), Some(dec!(77.64)));
    assert_eq!(result.fibonacci_levels.projection(dec!(1.0)), Some(dec!(130)));
    assert_eq!(result.price_analysis.swing_range_pct, dec!(75));
    assert_eq!(result.price_analysis.trend_bias, TrendBias::Bullish);
    assert_eq!(
        result.time_analysis,
        TimeAnalysis::InsufficientData { swing_points: 2 }
    );

    assert_result_invariants(&result, &AnalysisConfig::default());
}

#[test]
fn test_swing_detection_matches_window_definition() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..50 {
        let window = rng.random_range(1..=6_usize);
        let count = rng.random_range(0..=120_usize);
        let bars = random_bars(&mut rng, count, Decimal::ONE);

        let detector = SwingPointDetector::from_config(&AnalysisConfig::with_window(window));
        let actual = detector
            .detect(&bars)
            .into_iter()
            .map(|point| (point.timestamp, point.kind, point.price))
            .collect::<Vec<_>>();

        let expected = (window..bars.len().saturating_sub(window))
            .flat_map(|index| {
                let frame = &bars[index - window..=index + window];
                let bar = &bars[index];
                let is_high = frame.iter().all(|other| other.high <= bar.high);
                let is_low = frame.iter().all(|other| other.low >= bar.low);

                let mut points = Vec::new();
                if is_high {
                    points.push((bar.timestamp, SwingKind::High, bar.high));
                }
                // Flat bar spanning a flat window is only a high
                if is_low && !(is_high && bar.high == bar.low) {
                    points.push((bar.timestamp, SwingKind::Low, bar.low));
                }
                points
            })
            .collect::<Vec<_>>();

        assert_eq!(actual, expected, "window {window}, {count} bars");
    }
}

#[test]
fn test_swing_detection_outside_bars() {
    // Window 1 over alternating inside & outside bars: every outside bar engulfs its neighbours
    let bars = (0..9)
        .map(|index| {
            let (high, low) = if index % 2 == 1 {
                (dec!(120), dec!(80))
            } else {
                (dec!(101), dec!(99))
            };
            hourly_bar(index, low, high, low, high, dec!(10))
        })
        .collect::<Vec<_>>();

    let points = SwingPointDetector::from_config(&AnalysisConfig::with_window(1)).detect(&bars);

    let outside_bars = (1..9).step_by(2).collect::<Vec<_>>();
    assert_eq!(points.len(), 2 * outside_bars.len());
    for (pair, index) in points.chunks(2).zip(outside_bars) {
        let timestamp = time_base() + TimeDelta::hours(index as i64);
        assert_eq!(
            pair.iter()
                .map(|point| (point.timestamp, point.kind, point.price))
                .collect::<Vec<_>>(),
            vec![
                (timestamp, SwingKind::High, dec!(120)),
                (timestamp, SwingKind::Low, dec!(80)),
            ]
        );
    }
}

#[test]
fn test_random_series_invariants() {
    let mut rng = StdRng::seed_from_u64(42);
    let config = AnalysisConfig::default();
    let analyser = FibonacciAnalyser::new(config.clone()).unwrap();
    let now = Some(time_base() + TimeDelta::days(30));

    let mut analysed = 0;
    for scale in [dec!(0.0001), dec!(1), dec!(10000)] {
        for count in [21, 50, 200, 500] {
            let bars = random_bars(&mut rng, count, scale);

            match analyser.analyse(&bars, now) {
                Ok(result) => {
                    assert_result_invariants(&result, &config);
                    analysed += 1;
                }
                Err(error) => assert!(error.is_insufficient_data(), "{error}"),
            }
        }
    }

    // Long random walks always contain swing highs & lows
    assert!(analysed > 0);
}

#[test]
fn test_analysis_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(1);
    let bars = random_bars(&mut rng, 300, Decimal::ONE);
    let now = Some(time_base() + TimeDelta::days(20));
    let analyser = FibonacciAnalyser::default();

    let first = analyser.analyse(&bars, now);
    let second = analyser.analyse(&bars, now);
    assert_eq!(first, second);

    if let (Ok(first), Ok(second)) = (first, second) {
        let first_json = serde_json::to_string(&first).unwrap();
        assert_eq!(first_json, serde_json::to_string(&second).unwrap());

        let deserialised = serde_json::from_str::<AnalysisResult>(&first_json).unwrap();
        assert_eq!(deserialised, first);
    }
}

#[test]
fn test_insufficient_bars() {
    let analyser = FibonacciAnalyser::new(AnalysisConfig::with_window(5)).unwrap();
    let bars = v_shape_bars().into_iter().take(10).collect::<Vec<_>>();

    let error = analyser.analyse(&bars, Some(time_base())).unwrap_err();

    assert_eq!(
        error,
        AnalysisError::InsufficientData(InsufficientData::Bars {
            window: 5,
            required: 11,
            actual: 10,
        })
    );
    assert_eq!(
        error.to_string(),
        "insufficient data: swing detection with window 5 requires at least 11 bars, found 10"
    );
}

#[test]
fn test_degenerate_swing_levels_are_flat() {
    let swing = MajorSwing {
        high: dec!(100),
        high_time: time_base(),
        low: dec!(100),
        low_time: time_base() + TimeDelta::hours(1),
    };

    let levels = FibonacciLevels::calculate(&swing).into_value();

    assert!(
        levels
            .retracement
            .iter()
            .chain(&levels.extension)
            .chain(&levels.projection)
            .all(|level| level.price == dec!(100))
    );
}

#[test]
fn test_partial_config_json() {
    let config = serde_json::from_str::<AnalysisConfig>(
        r#"{ "window": 5, "bullish_threshold_pct": "70", "bearish_threshold_pct": "30" }"#,
    )
    .unwrap();

    assert_eq!(
        config,
        AnalysisConfig {
            window: 5,
            bullish_threshold_pct: dec!(70),
            bearish_threshold_pct: dec!(30),
            ..AnalysisConfig::default()
        }
    );
    assert!(FibonacciAnalyser::new(config).is_ok());
}
