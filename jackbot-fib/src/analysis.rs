use crate::{
    bar::Bar,
    confidence::{ConfidenceFactors, ConfidenceScorer},
    config::AnalysisConfig,
    error::{AnalysisError, InsufficientData},
    estimate::{Estimate, Fallback},
    fibonacci::FibonacciLevels,
    key_level::{KeyLevel, KeyLevelRanker},
    position::{PricePosition, PricePositionAnalyzer},
    swing::{
        SwingPoint,
        detector::SwingPointDetector,
        major::{MajorSwing, MajorSwingSelector},
    },
    time_cycle::{TimeAnalysis, TimeCycleEstimator},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};

pub const FIBONACCI_ANALYSIS_SPAN_NAME: &str = "fibonacci_analysis_span";

/// Aggregated output of a single [`FibonacciAnalyser::analyse`] call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AnalysisResult {
    /// Close of the final bar.
    pub current_price: Decimal,
    pub major_swing: MajorSwing,
    pub fibonacci_levels: FibonacciLevels,
    pub price_analysis: PricePosition,
    /// Ranked by ascending distance to the current price.
    pub key_levels: Vec<KeyLevel>,
    pub time_analysis: TimeAnalysis,
    /// Most recent `trailing_swing_points` swing points, timestamp ascending.
    pub swing_points: Vec<SwingPoint>,
    /// Overall confidence in `[0, 100]`.
    pub confidence: Decimal,
    pub confidence_factors: ConfidenceFactors,
    /// Every [`Fallback`] taken while producing this result, sorted & de-duplicated.
    pub fallbacks: Vec<Fallback>,
}

impl AnalysisResult {
    /// Determine if every value in this result was computed without a [`Fallback`].
    pub fn is_fully_computed(&self) -> bool {
        self.fallbacks.is_empty()
    }
}

/// Stateless swing point & Fibonacci retracement analysis pipeline.
///
/// Each [`Self::analyse`] call is a pure function of its inputs, so one analyser can be shared
/// across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FibonacciAnalyser {
    config: AnalysisConfig,
    detector: SwingPointDetector,
    selector: MajorSwingSelector,
    position: PricePositionAnalyzer,
    ranker: KeyLevelRanker,
    time_cycle: TimeCycleEstimator,
    confidence: ConfidenceScorer,
}

impl Default for FibonacciAnalyser {
    fn default() -> Self {
        Self::from_valid_config(AnalysisConfig::default())
    }
}

impl FibonacciAnalyser {
    /// Construct a new [`FibonacciAnalyser`] after validating the provided [`AnalysisConfig`].
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: AnalysisConfig) -> Self {
        Self {
            detector: SwingPointDetector::from_config(&config),
            selector: MajorSwingSelector::from_config(&config),
            position: PricePositionAnalyzer::from_config(&config),
            ranker: KeyLevelRanker::default(),
            time_cycle: TimeCycleEstimator::from_config(&config),
            confidence: ConfidenceScorer::from_config(&config),
            config,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyse a timestamp ascending bar series.
    ///
    /// `now` is the reference time for the next turning point countdown, defaulting to
    /// [`Utc::now`]. Passing an explicit value makes the result fully deterministic.
    ///
    /// Fails with [`InsufficientData`] if the series is shorter than
    /// [`AnalysisConfig::min_bars`], or if no major swing can be selected from the detected
    /// swing points.
    pub fn analyse(
        &self,
        bars: &[Bar],
        now: Option<DateTime<Utc>>,
    ) -> Result<AnalysisResult, AnalysisError> {
        let span = info_span!(
            FIBONACCI_ANALYSIS_SPAN_NAME,
            bars = bars.len(),
            window = self.config.window
        );
        let _span_guard = span.enter();

        let required = self.config.min_bars();
        let Some(last_bar) = bars.last().filter(|_| bars.len() >= required) else {
            return Err(AnalysisError::from(InsufficientData::Bars {
                window: self.config.window,
                required,
                actual: bars.len(),
            }));
        };
        let current_price = last_bar.close;

        let swing_points = self.detector.detect(bars);
        debug!(swing_points = swing_points.len(), "FibonacciAnalyser detected swing points");

        let major_swing = self.selector.select(&swing_points)?;
        if major_swing.is_degenerate() {
            warn!(
                price = %major_swing.high,
                "FibonacciAnalyser selected a degenerate major swing, all levels are flat"
            );
        }

        let mut fallbacks = Vec::new();

        let fibonacci_levels = record(
            &mut fallbacks,
            "fibonacci_levels",
            FibonacciLevels::calculate(&major_swing),
        );

        let price_analysis = record(
            &mut fallbacks,
            "price_analysis",
            self.position.analyse(&fibonacci_levels, current_price),
        );

        let key_levels = record(
            &mut fallbacks,
            "key_levels",
            self.ranker.rank(&fibonacci_levels, current_price),
        );

        let time_analysis = record(
            &mut fallbacks,
            "time_analysis",
            self.time_cycle
                .estimate(&swing_points, now.unwrap_or_else(Utc::now)),
        );

        let (confidence_factors, confidence_fallbacks) =
            self.confidence.score(bars, &major_swing, current_price);
        for reason in &confidence_fallbacks {
            debug!(%reason, stage = "confidence", "FibonacciAnalyser using fallback value");
        }
        fallbacks.extend(confidence_fallbacks);

        fallbacks.sort_unstable();
        fallbacks.dedup();

        let confidence = confidence_factors.score();

        let skip = swing_points
            .len()
            .saturating_sub(self.config.trailing_swing_points);
        let swing_points = swing_points.into_iter().skip(skip).collect::<Vec<_>>();

        info!(
            %current_price,
            swing_high = %major_swing.high,
            swing_low = %major_swing.low,
            trend_bias = %price_analysis.trend_bias,
            %confidence,
            ?fallbacks,
            "FibonacciAnalyser completed analysis"
        );

        Ok(AnalysisResult {
            current_price,
            major_swing,
            fibonacci_levels,
            price_analysis,
            key_levels,
            time_analysis,
            swing_points,
            confidence,
            confidence_factors,
            fallbacks,
        })
    }
}

/// Unwrap an [`Estimate`], recording and logging any [`Fallback`] it used.
fn record<T>(fallbacks: &mut Vec<Fallback>, stage: &'static str, estimate: Estimate<T>) -> T {
    if let Some(reason) = estimate.fallback() {
        debug!(%reason, stage, "FibonacciAnalyser using fallback value");
        fallbacks.push(reason);
    }
    estimate.into_value()
}
