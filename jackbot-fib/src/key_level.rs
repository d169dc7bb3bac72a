use crate::{
    estimate::{Estimate, Fallback},
    fibonacci::FibonacciLevels,
};
use derive_more::Display;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Retracement ratios promoted to [`KeyLevel`]s.
pub const KEY_RETRACEMENT_RATIOS: [Decimal; 3] = [dec!(0.382), dec!(0.5), dec!(0.618)];

/// Origin of a [`KeyLevel`].
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Display, Deserialize, Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum LevelCategory {
    #[display("fibonacci_retracement")]
    FibonacciRetracement,
    #[display("swing_high")]
    SwingHigh,
    #[display("swing_low")]
    SwingLow,
}

/// Significance tag of a [`KeyLevel`].
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Display, Deserialize, Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum LevelStrength {
    #[display("high")]
    High,
    #[display("very_high")]
    VeryHigh,
}

/// Candidate support/resistance price with its proximity to the current price.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct KeyLevel {
    pub price: Decimal,
    pub category: LevelCategory,
    /// Fibonacci ratio the level was derived from, if any.
    pub ratio: Option<Decimal>,
    pub strength: LevelStrength,
    /// `|price - current_price| / current_price * 100`
    pub distance_pct: Decimal,
}

/// Merges candidate levels and ranks them by proximity to the current price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyLevelRanker {
    /// Retracement ratios promoted to key levels, defaulting to [`KEY_RETRACEMENT_RATIOS`].
    pub retracement_ratios: Vec<Decimal>,
}

impl Default for KeyLevelRanker {
    fn default() -> Self {
        Self {
            retracement_ratios: KEY_RETRACEMENT_RATIOS.to_vec(),
        }
    }
}

impl KeyLevelRanker {
    /// Rank the `retracement_ratios` levels plus the swing high & low by ascending distance to
    /// the current price. Equal distances keep candidate order (retracements, high, low).
    ///
    /// A non-positive `current_price` cannot be used as a divisor, so every distance is reported
    /// as 0 with [`Fallback::NonPositivePrice`], leaving candidate order intact.
    pub fn rank(&self, levels: &FibonacciLevels, current_price: Decimal) -> Estimate<Vec<KeyLevel>> {
        let retracements = self.retracement_ratios.iter().filter_map(|&ratio| {
            levels.retracement(ratio).map(|price| {
                (
                    price,
                    LevelCategory::FibonacciRetracement,
                    Some(ratio),
                    LevelStrength::High,
                )
            })
        });
        let swings = [
            (levels.swing_high, LevelCategory::SwingHigh, None, LevelStrength::VeryHigh),
            (levels.swing_low, LevelCategory::SwingLow, None, LevelStrength::VeryHigh),
        ];

        let mut fault = None;
        let mut key_levels = retracements
            .chain(swings)
            .map(|(price, category, ratio, strength)| {
                let distance_pct = match distance_pct(price, current_price) {
                    Estimate::Computed(distance) => distance,
                    Estimate::Fallback { value, reason } => {
                        fault.get_or_insert(reason);
                        value
                    }
                };
                KeyLevel {
                    price,
                    category,
                    ratio,
                    strength,
                    distance_pct,
                }
            })
            .collect::<Vec<_>>();

        // Stable sort, so equal distances keep candidate order
        key_levels.sort_by(|a, b| a.distance_pct.cmp(&b.distance_pct));

        match fault {
            None => Estimate::Computed(key_levels),
            Some(reason) => Estimate::Fallback {
                value: key_levels,
                reason,
            },
        }
    }
}

/// Calculates `|price - current_price| / current_price * 100`.
pub fn distance_pct(price: Decimal, current_price: Decimal) -> Estimate<Decimal> {
    if current_price <= Decimal::ZERO {
        return Estimate::Fallback {
            value: Decimal::ZERO,
            reason: Fallback::NonPositivePrice,
        };
    }

    let distance = price
        .checked_sub(current_price)
        .and_then(|diff| diff.abs().checked_div(current_price))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));

    Estimate::or_fallback(distance, Decimal::ZERO, Fallback::ArithmeticOverflow)
}
