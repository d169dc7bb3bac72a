use crate::{
    estimate::{Estimate, Fallback},
    swing::major::MajorSwing,
};
use derive_more::Constructor;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Retracement ratios, each in `(0, 1)`.
pub const RETRACEMENT_RATIOS: [Decimal; 5] =
    [dec!(0.236), dec!(0.382), dec!(0.5), dec!(0.618), dec!(0.786)];

/// Extension ratios, each greater than 1.
pub const EXTENSION_RATIOS: [Decimal; 5] =
    [dec!(1.272), dec!(1.414), dec!(1.618), dec!(2.618), dec!(4.236)];

/// Projection ratios, each greater than 0.
pub const PROJECTION_RATIOS: [Decimal; 4] = [dec!(0.618), dec!(1.0), dec!(1.272), dec!(1.618)];

/// Price level associated with a Fibonacci ratio.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize, Constructor)]
pub struct FibLevel {
    pub ratio: Decimal,
    pub price: Decimal,
}

/// Fibonacci levels derived from a [`MajorSwing`].
///
/// Each level set is ordered by its fixed ratio enumeration (eg/ [`RETRACEMENT_RATIOS`]).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FibonacciLevels {
    pub swing_high: Decimal,
    pub swing_low: Decimal,
    /// `high - (high - low) * ratio`
    pub retracement: Vec<FibLevel>,
    /// `low - (high - low) * (ratio - 1)`
    pub extension: Vec<FibLevel>,
    /// `high + (high - low) * ratio`
    pub projection: Vec<FibLevel>,
}

impl FibonacciLevels {
    /// Calculate the [`FibonacciLevels`] of the provided [`MajorSwing`].
    ///
    /// A degenerate swing (`high == low`) produces flat levels equal to the swing price. If any
    /// level overflows, every level is flattened to the swing high with
    /// [`Fallback::ArithmeticOverflow`].
    pub fn calculate(swing: &MajorSwing) -> Estimate<Self> {
        let high = swing.high;
        let low = swing.low;

        let levels = |ratios: &[Decimal], price: &dyn Fn(Decimal) -> Option<Decimal>| {
            ratios
                .iter()
                .map(|&ratio| price(ratio).map(|price| FibLevel::new(ratio, price)))
                .collect::<Option<Vec<_>>>()
        };

        let calculated = swing.range().and_then(|diff| {
            Some(Self {
                swing_high: high,
                swing_low: low,
                retracement: levels(&RETRACEMENT_RATIOS, &|ratio| {
                    high.checked_sub(diff.checked_mul(ratio)?)
                })?,
                extension: levels(&EXTENSION_RATIOS, &|ratio| {
                    low.checked_sub(diff.checked_mul(ratio - Decimal::ONE)?)
                })?,
                projection: levels(&PROJECTION_RATIOS, &|ratio| {
                    high.checked_add(diff.checked_mul(ratio)?)
                })?,
            })
        });

        match calculated {
            Some(levels) => Estimate::Computed(levels),
            None => Estimate::Fallback {
                value: Self::flat(high, low),
                reason: Fallback::ArithmeticOverflow,
            },
        }
    }

    fn flat(high: Decimal, low: Decimal) -> Self {
        let levels = |ratios: &[Decimal]| {
            ratios
                .iter()
                .map(|&ratio| FibLevel::new(ratio, high))
                .collect::<Vec<_>>()
        };

        Self {
            swing_high: high,
            swing_low: low,
            retracement: levels(&RETRACEMENT_RATIOS),
            extension: levels(&EXTENSION_RATIOS),
            projection: levels(&PROJECTION_RATIOS),
        }
    }

    /// Retracement price of the provided ratio, if it is one of [`RETRACEMENT_RATIOS`].
    pub fn retracement(&self, ratio: Decimal) -> Option<Decimal> {
        find(&self.retracement, ratio)
    }

    /// Extension price of the provided ratio, if it is one of [`EXTENSION_RATIOS`].
    pub fn extension(&self, ratio: Decimal) -> Option<Decimal> {
        find(&self.extension, ratio)
    }

    /// Projection price of the provided ratio, if it is one of [`PROJECTION_RATIOS`].
    pub fn projection(&self, ratio: Decimal) -> Option<Decimal> {
        find(&self.projection, ratio)
    }
}

fn find(levels: &[FibLevel], ratio: Decimal) -> Option<Decimal> {
    levels
        .iter()
        .find(|level| level.ratio == ratio)
        .map(|level| level.price)
}
