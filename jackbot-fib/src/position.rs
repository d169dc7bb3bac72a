use crate::{
    config::AnalysisConfig,
    estimate::{Estimate, Fallback},
    fibonacci::FibonacciLevels,
};
use derive_more::{Constructor, Display};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Directional bias derived from where the current price sits within the major swing.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Display, Deserialize, Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TrendBias {
    #[display("bullish")]
    Bullish,
    #[display("neutral")]
    Neutral,
    #[display("bearish")]
    Bearish,
}

/// Location of the current price relative to the major swing and its retracement levels.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PricePosition {
    /// `(current - low) / (high - low) * 100`, or 0 for a degenerate swing.
    pub swing_range_pct: Decimal,
    /// Highest level strictly below the current price.
    pub nearest_support: Option<Decimal>,
    /// Lowest level strictly above the current price.
    pub nearest_resistance: Option<Decimal>,
    pub trend_bias: TrendBias,
}

/// Locates the current price within the swing range & nearest levels.
#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct PricePositionAnalyzer {
    pub bullish_threshold_pct: Decimal,
    pub bearish_threshold_pct: Decimal,
}

impl PricePositionAnalyzer {
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.bullish_threshold_pct, config.bearish_threshold_pct)
    }

    pub fn analyse(
        &self,
        levels: &FibonacciLevels,
        current_price: Decimal,
    ) -> Estimate<PricePosition> {
        let swing_range_pct = swing_range_pct(levels, current_price);

        let candidates = levels
            .retracement
            .iter()
            .map(|level| level.price)
            .chain([levels.swing_high, levels.swing_low]);

        let (nearest_support, nearest_resistance) = candidates.fold(
            (None, None),
            |(support, resistance): (Option<Decimal>, Option<Decimal>), price| {
                if price < current_price {
                    (support.max(Some(price)), resistance)
                } else if price > current_price {
                    let resistance = match resistance {
                        Some(current) => Some(price.min(current)),
                        None => Some(price),
                    };
                    (support, resistance)
                } else {
                    (support, resistance)
                }
            },
        );

        // No range to position within, so no directional bias either
        let degenerate = swing_range_pct.is_fallback();

        swing_range_pct.map(|swing_range_pct| PricePosition {
            swing_range_pct,
            nearest_support,
            nearest_resistance,
            trend_bias: if degenerate {
                TrendBias::Neutral
            } else {
                self.trend_bias(swing_range_pct)
            },
        })
    }

    pub fn trend_bias(&self, swing_range_pct: Decimal) -> TrendBias {
        if swing_range_pct > self.bullish_threshold_pct {
            TrendBias::Bullish
        } else if swing_range_pct < self.bearish_threshold_pct {
            TrendBias::Bearish
        } else {
            TrendBias::Neutral
        }
    }
}

fn swing_range_pct(levels: &FibonacciLevels, current_price: Decimal) -> Estimate<Decimal> {
    let Some(range) = levels.swing_high.checked_sub(levels.swing_low) else {
        return Estimate::Fallback {
            value: Decimal::ZERO,
            reason: Fallback::ArithmeticOverflow,
        };
    };
    if range <= Decimal::ZERO {
        return Estimate::Fallback {
            value: Decimal::ZERO,
            reason: Fallback::DegenerateRange,
        };
    }

    let pct = current_price
        .checked_sub(levels.swing_low)
        .and_then(|offset| offset.checked_div(range))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));

    Estimate::or_fallback(pct, Decimal::ZERO, Fallback::ArithmeticOverflow)
}
