#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::cognitive_complexity,
    unused_crate_dependencies,
    unused_extern_crates,
    clippy::unused_self,
    clippy::useless_let_if_seq,
    missing_debug_implementations,
    rust_2018_idioms,
    rust_2024_compatibility
)]

//! # Jackbot-Fib
//! Swing point detection and Fibonacci retracement analysis for Jackbot.
//!
//! Given a time-ascending series of OHLCV [`Bar`](bar::Bar)s, the [`FibonacciAnalyser`]:
//! * **Detects swing points**: local highs & lows over a symmetric window, each scored with a
//!   0-100 strength.
//! * **Selects a major swing**: the high/low pair driving all Fibonacci maths.
//! * **Projects levels**: retracement, extension and projection prices.
//! * **Locates the current price**: swing range percentage, nearest support/resistance and a
//!   trend bias.
//! * **Ranks key levels**: by proximity to the current price.
//! * **Estimates time cycles**: average spacing between swings and the next expected turn.
//! * **Scores confidence**: data sufficiency, swing magnitude and volume dispersion.
//!
//! Every call is a pure function of its inputs. Numeric faults inside a sub-computation degrade
//! to a documented default (see [`Estimate`](estimate::Estimate)); only insufficient data aborts
//! an analysis with an [`AnalysisError`](error::AnalysisError).
//!
//! ## Example
//! ```
//! use jackbot_fib::{FibonacciAnalyser, bar::Bar, config::AnalysisConfig};
//! use chrono::{TimeDelta, TimeZone, Utc};
//! use rust_decimal::Decimal;
//!
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let bars = (0..60)
//!     .map(|i: i64| {
//!         let price = Decimal::from(100 + (i % 20 - 10).abs());
//!         Bar::new(start + TimeDelta::hours(i), price, price, price, price, Decimal::ONE)
//!     })
//!     .collect::<Vec<_>>();
//!
//! let analyser = FibonacciAnalyser::new(AnalysisConfig::default()).unwrap();
//! let result = analyser.analyse(&bars, Some(start + TimeDelta::hours(60))).unwrap();
//! assert!(result.fibonacci_levels.swing_high >= result.fibonacci_levels.swing_low);
//! ```

/// [`FibonacciAnalyser`] pipeline and its aggregated [`AnalysisResult`].
pub mod analysis;

/// OHLCV [`Bar`](bar::Bar) input model.
pub mod bar;

/// Multi-factor confidence scoring.
pub mod confidence;

/// [`AnalysisConfig`](config::AnalysisConfig) tuning constants.
pub mod config;

/// All errors generated in `jackbot-fib`.
pub mod error;

/// Explicit fallback handling for numeric sub-computations.
pub mod estimate;

/// Fibonacci retracement, extension & projection levels.
pub mod fibonacci;

/// Key level merging & ranking by proximity to the current price.
pub mod key_level;

/// Default `tracing` subscribers.
pub mod logging;

/// Current price location within the major swing.
pub mod position;

/// Statistical algorithms for analysing datasets.
pub mod statistic;

/// Swing point detection & major swing selection.
pub mod swing;

/// Time spacing between swing points & next turning point projection.
pub mod time_cycle;

pub use analysis::{AnalysisResult, FibonacciAnalyser};
