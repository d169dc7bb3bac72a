use crate::{
    config::AnalysisConfig,
    error::InsufficientData,
    swing::{SwingKind, SwingPoint},
};
use chrono::{DateTime, Utc};
use derive_more::Constructor;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// The high/low pair acting as the base range for all Fibonacci calculations.
///
/// Invariant: `high >= low`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MajorSwing {
    pub high: Decimal,
    pub high_time: DateTime<Utc>,
    pub low: Decimal,
    pub low_time: DateTime<Utc>,
}

impl MajorSwing {
    /// Construct a [`MajorSwing`] from the selected high & low points. If the high is priced
    /// below the low, the two points swap roles so the range is never inverted.
    pub fn from_points(high: &SwingPoint, low: &SwingPoint) -> Self {
        let (high, low) = if high.price >= low.price {
            (high, low)
        } else {
            (low, high)
        };

        Self {
            high: high.price,
            high_time: high.timestamp,
            low: low.price,
            low_time: low.timestamp,
        }
    }

    /// Size of the swing, `high - low`, or `None` if it overflows.
    pub fn range(&self) -> Option<Decimal> {
        self.high.checked_sub(self.low)
    }

    /// Determine if the swing high equals the swing low.
    pub fn is_degenerate(&self) -> bool {
        self.high == self.low
    }
}

/// Selects the [`MajorSwing`] from the strongest recent [`SwingPoint`]s.
#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct MajorSwingSelector {
    pub strong_strength_threshold: Decimal,
    pub recent_points_per_kind: usize,
    pub fallback_recent_points: usize,
}

impl MajorSwingSelector {
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(
            config.strong_strength_threshold,
            config.recent_points_per_kind,
            config.fallback_recent_points,
        )
    }

    /// Select the [`MajorSwing`] from timestamp ascending swing points.
    ///
    /// 1. Candidates are the points with strength above `strong_strength_threshold`. If fewer
    ///    than 2 qualify, the most recent `fallback_recent_points` are used regardless of
    ///    strength.
    /// 2. The `recent_points_per_kind` most recent highs and lows are taken from the candidates.
    /// 3. The highest priced high and lowest priced low form the swing. Equal prices resolve to
    ///    the earliest point.
    pub fn select(&self, points: &[SwingPoint]) -> Result<MajorSwing, InsufficientData> {
        if points.len() < 2 {
            return Err(InsufficientData::SwingPoints {
                actual: points.len(),
            });
        }

        let strong = points
            .iter()
            .filter(|point| point.strength > self.strong_strength_threshold)
            .collect::<Vec<_>>();

        let candidates = if strong.len() >= 2 {
            strong
        } else {
            debug!(
                strong = strong.len(),
                fallback_recent_points = self.fallback_recent_points,
                "MajorSwingSelector found too few strong swing points, using most recent points"
            );
            let skip = points.len().saturating_sub(self.fallback_recent_points);
            points.iter().skip(skip).collect()
        };

        let high = self
            .recent(&candidates, SwingKind::High)
            .reduce(|best, next| if next.price > best.price { next } else { best })
            .ok_or(InsufficientData::MissingSwingKind(SwingKind::High))?;

        let low = self
            .recent(&candidates, SwingKind::Low)
            .reduce(|best, next| if next.price < best.price { next } else { best })
            .ok_or(InsufficientData::MissingSwingKind(SwingKind::Low))?;

        if high.price < low.price {
            warn!(
                high = %high.price,
                low = %low.price,
                "MajorSwingSelector selected high below low, swapping roles"
            );
        }

        Ok(MajorSwing::from_points(high, low))
    }

    /// Most recent `recent_points_per_kind` candidates of the provided [`SwingKind`], in
    /// timestamp ascending order.
    fn recent<'a>(
        &self,
        candidates: &[&'a SwingPoint],
        kind: SwingKind,
    ) -> impl Iterator<Item = &'a SwingPoint> {
        let of_kind = candidates
            .iter()
            .copied()
            .filter(|point| point.kind == kind)
            .collect::<Vec<_>>();

        let skip = of_kind.len().saturating_sub(self.recent_points_per_kind);
        of_kind.into_iter().skip(skip)
    }
}
