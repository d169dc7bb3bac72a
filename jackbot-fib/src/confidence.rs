use crate::{
    bar::Bar,
    config::AnalysisConfig,
    estimate::{Estimate, Fallback},
    statistic::dispersion::Dispersion,
    swing::major::MajorSwing,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-factor breakdown of the analysis confidence, each in `[0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct ConfidenceFactors {
    /// `min(bar_count / data_confidence_bars, 1)`
    pub data: Decimal,
    /// `min((swing_high - swing_low) / current_price * range_confidence_multiplier, 1)`
    pub range: Decimal,
    /// `min(std_dev(volume) / mean(volume), 1)`
    pub volume: Decimal,
}

impl ConfidenceFactors {
    /// Mean of the factors scaled to `[0, 100]`.
    pub fn score(&self) -> Decimal {
        let mean = (self.data + self.range + self.volume) / Decimal::from(3);
        (mean * Decimal::ONE_HUNDRED).clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
    }
}

/// Aggregates data sufficiency, swing magnitude and volume dispersion into one confidence score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfidenceScorer {
    pub data_confidence_bars: usize,
    pub range_confidence_multiplier: Decimal,
    pub default_volume_confidence: Decimal,
}

impl ConfidenceScorer {
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            data_confidence_bars: config.data_confidence_bars,
            range_confidence_multiplier: config.range_confidence_multiplier,
            default_volume_confidence: config.default_volume_confidence,
        }
    }

    /// Score every [`ConfidenceFactors`] component, alongside any [`Fallback`]s used.
    pub fn score(
        &self,
        bars: &[Bar],
        swing: &MajorSwing,
        current_price: Decimal,
    ) -> (ConfidenceFactors, Vec<Fallback>) {
        let data = self.data_confidence(bars.len());
        let range = self.range_confidence(swing, current_price);
        let volume = self.volume_confidence(bars);

        let fallbacks = [data.fallback(), range.fallback(), volume.fallback()]
            .into_iter()
            .flatten()
            .collect();

        let factors = ConfidenceFactors {
            data: data.get(),
            range: range.get(),
            volume: volume.get(),
        };

        (factors, fallbacks)
    }

    pub fn data_confidence(&self, bar_count: usize) -> Estimate<Decimal> {
        let confidence = Decimal::from(bar_count)
            .checked_div(Decimal::from(self.data_confidence_bars))
            .map(unit_clamp);

        Estimate::or_fallback(confidence, Decimal::ZERO, Fallback::ArithmeticOverflow)
    }

    pub fn range_confidence(&self, swing: &MajorSwing, current_price: Decimal) -> Estimate<Decimal> {
        if current_price <= Decimal::ZERO {
            return Estimate::Fallback {
                value: Decimal::ZERO,
                reason: Fallback::NonPositivePrice,
            };
        }

        let confidence = swing
            .high
            .checked_sub(swing.low)
            .and_then(|range| range.checked_div(current_price))
            .and_then(|ratio| ratio.checked_mul(self.range_confidence_multiplier))
            .map(unit_clamp);

        Estimate::or_fallback(confidence, Decimal::ZERO, Fallback::ArithmeticOverflow)
    }

    /// Volume coefficient of variation, using the sample standard deviation.
    pub fn volume_confidence(&self, bars: &[Bar]) -> Estimate<Decimal> {
        let Some(dispersion) = Dispersion::calculate(bars.iter().map(|bar| bar.volume)) else {
            return Estimate::Fallback {
                value: self.default_volume_confidence,
                reason: Fallback::ArithmeticOverflow,
            };
        };

        if dispersion.mean <= Decimal::ZERO {
            return Estimate::Fallback {
                value: self.default_volume_confidence,
                reason: Fallback::ZeroMeanVolume,
            };
        }

        Estimate::or_fallback(
            dispersion.sample_coefficient_of_variation().map(unit_clamp),
            self.default_volume_confidence,
            Fallback::ArithmeticOverflow,
        )
    }
}

fn unit_clamp(value: Decimal) -> Decimal {
    value.clamp(Decimal::ZERO, Decimal::ONE)
}
