use crate::error::AnalysisError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Tuning constants used by the [`FibonacciAnalyser`](crate::FibonacciAnalyser).
///
/// Missing fields deserialise to their [`Default`] values, so a partial JSON config only needs
/// to name the values it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Half-width `W` of the symmetric swing detection window `[i - W, i + W]`.
    pub window: usize,

    /// Swing points with strength strictly above this value are considered "strong".
    pub strong_strength_threshold: Decimal,

    /// Number of most recent highs (and lows) considered for the major swing.
    pub recent_points_per_kind: usize,

    /// Number of most recent swing points used when too few strong points exist.
    pub fallback_recent_points: usize,

    /// Number of most recent swing points reported in the
    /// [`AnalysisResult`](crate::AnalysisResult).
    pub trailing_swing_points: usize,

    /// Bar count at which data confidence saturates at 1.
    pub data_confidence_bars: usize,

    /// Upper bound of the window / series volume ratio used in swing strength.
    pub volume_strength_cap: Decimal,

    /// Swing strength used when it cannot be computed.
    pub default_strength: Decimal,

    /// Swing range percentage above which the trend bias is bullish.
    pub bullish_threshold_pct: Decimal,

    /// Swing range percentage below which the trend bias is bearish.
    pub bearish_threshold_pct: Decimal,

    /// Multiplier applied to the relative swing size for range confidence.
    pub range_confidence_multiplier: Decimal,

    /// Cycle consistency used when the average cycle is zero.
    pub default_cycle_consistency: Decimal,

    /// Volume confidence used when mean volume is zero.
    pub default_volume_confidence: Decimal,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window: 10,
            strong_strength_threshold: dec!(30),
            recent_points_per_kind: 3,
            fallback_recent_points: 10,
            trailing_swing_points: 10,
            data_confidence_bars: 200,
            volume_strength_cap: dec!(2.0),
            default_strength: dec!(50.0),
            bullish_threshold_pct: dec!(60),
            bearish_threshold_pct: dec!(40),
            range_confidence_multiplier: dec!(10),
            default_cycle_consistency: dec!(1.0),
            default_volume_confidence: dec!(0.5),
        }
    }
}

impl AnalysisConfig {
    /// Construct a default [`AnalysisConfig`] with the provided swing detection window.
    pub fn with_window(window: usize) -> Self {
        Self {
            window,
            ..Self::default()
        }
    }

    /// Minimum number of bars required for swing detection, `2W + 1`.
    pub fn min_bars(&self) -> usize {
        self.window.saturating_mul(2).saturating_add(1)
    }

    /// Check the configuration can drive an analysis.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.recent_points_per_kind == 0 {
            return Err(AnalysisError::InvalidConfig(
                "recent_points_per_kind must be at least 1",
            ));
        }
        if self.fallback_recent_points < 2 {
            return Err(AnalysisError::InvalidConfig(
                "fallback_recent_points must be at least 2",
            ));
        }
        if self.data_confidence_bars == 0 {
            return Err(AnalysisError::InvalidConfig(
                "data_confidence_bars must be positive",
            ));
        }
        if self.volume_strength_cap <= Decimal::ZERO {
            return Err(AnalysisError::InvalidConfig(
                "volume_strength_cap must be positive",
            ));
        }
        if self.bearish_threshold_pct > self.bullish_threshold_pct {
            return Err(AnalysisError::InvalidConfig(
                "bearish_threshold_pct must not exceed bullish_threshold_pct",
            ));
        }
        if !(Decimal::ZERO..=Decimal::ONE_HUNDRED).contains(&self.default_strength) {
            return Err(AnalysisError::InvalidConfig(
                "default_strength must lie within [0, 100]",
            ));
        }
        if !(Decimal::ZERO..=Decimal::ONE).contains(&self.default_volume_confidence) {
            return Err(AnalysisError::InvalidConfig(
                "default_volume_confidence must lie within [0, 1]",
            ));
        }
        Ok(())
    }
}
