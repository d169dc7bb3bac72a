use crate::{
    config::AnalysisConfig,
    estimate::{Estimate, Fallback},
    statistic::dispersion::Dispersion,
    swing::SwingPoint,
};
use chrono::{DateTime, TimeDelta, Utc};
use derive_more::Constructor;
use itertools::Itertools;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Minimum number of swing points required to estimate a time cycle.
pub const MIN_CYCLE_SWING_POINTS: usize = 3;

const MILLISECONDS_PER_HOUR: Decimal = dec!(3600000);

/// Historical spacing between swing points & the projected next turning point.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TimeCycleEstimate {
    /// Mean time between consecutive swing points, in hours.
    pub average_cycle_hours: Decimal,
    /// Population standard deviation of the cycle lengths divided by their mean. Lower is more
    /// consistent.
    pub cycle_consistency: Decimal,
    /// Last swing point timestamp plus the average cycle.
    pub next_turning_point: DateTime<Utc>,
    /// Hours until the next turning point. Negative if it has already passed.
    pub time_until_next_hours: Decimal,
}

/// Outcome of time cycle estimation. Too few swing points does not abort an analysis, it is
/// reported via [`TimeAnalysis::InsufficientData`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeAnalysis {
    Estimate(TimeCycleEstimate),
    InsufficientData { swing_points: usize },
}

impl TimeAnalysis {
    pub fn estimate(&self) -> Option<&TimeCycleEstimate> {
        match self {
            Self::Estimate(estimate) => Some(estimate),
            Self::InsufficientData { .. } => None,
        }
    }
}

/// Measures historical inter-swing time spacing and projects the next turning point.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Constructor)]
pub struct TimeCycleEstimator {
    pub default_cycle_consistency: Decimal,
}

impl TimeCycleEstimator {
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.default_cycle_consistency)
    }

    /// Estimate the time cycle of timestamp ascending swing points, relative to `now`.
    ///
    /// A zero average cycle uses the default consistency with [`Fallback::ZeroAverageCycle`].
    /// If the calculation overflows, [`TimeAnalysis::InsufficientData`] is reported with
    /// [`Fallback::ArithmeticOverflow`].
    pub fn estimate(&self, points: &[SwingPoint], now: DateTime<Utc>) -> Estimate<TimeAnalysis> {
        let insufficient = TimeAnalysis::InsufficientData {
            swing_points: points.len(),
        };

        let Some(last) = points.last().filter(|_| points.len() >= MIN_CYCLE_SWING_POINTS) else {
            return Estimate::Computed(insufficient);
        };

        let Some(dispersion) = Dispersion::calculate(
            points
                .iter()
                .tuple_windows()
                .map(|(prev, next)| hours(next.timestamp - prev.timestamp)),
        ) else {
            return Estimate::Fallback {
                value: insufficient,
                reason: Fallback::ArithmeticOverflow,
            };
        };

        let average_cycle_hours = dispersion.mean;

        let projection = || -> Option<(DateTime<Utc>, Decimal)> {
            let average_cycle = TimeDelta::try_milliseconds(
                average_cycle_hours
                    .checked_mul(MILLISECONDS_PER_HOUR)?
                    .round()
                    .to_i64()?,
            )?;
            let next_turning_point = last.timestamp.checked_add_signed(average_cycle)?;
            let time_until_next_hours =
                average_cycle_hours.checked_sub(hours(now - last.timestamp))?;
            Some((next_turning_point, time_until_next_hours))
        };

        let Some((next_turning_point, time_until_next_hours)) = projection() else {
            return Estimate::Fallback {
                value: insufficient,
                reason: Fallback::ArithmeticOverflow,
            };
        };

        let cycle_consistency = if average_cycle_hours.is_zero() {
            Estimate::Fallback {
                value: self.default_cycle_consistency,
                reason: Fallback::ZeroAverageCycle,
            }
        } else {
            Estimate::or_fallback(
                dispersion
                    .population_std_dev()
                    .and_then(|std_dev| std_dev.checked_div(average_cycle_hours)),
                self.default_cycle_consistency,
                Fallback::ArithmeticOverflow,
            )
        };

        cycle_consistency.map(|cycle_consistency| {
            TimeAnalysis::Estimate(TimeCycleEstimate {
                average_cycle_hours,
                cycle_consistency,
                next_turning_point,
                time_until_next_hours,
            })
        })
    }
}

/// Converts a [`TimeDelta`] to fractional hours.
fn hours(delta: TimeDelta) -> Decimal {
    Decimal::from(delta.num_milliseconds()) / MILLISECONDS_PER_HOUR
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        swing::SwingKind,
        test_utils::{time_base, time_plus_hours},
    };

    fn points(hours: &[i64]) -> Vec<SwingPoint> {
        hours
            .iter()
            .enumerate()
            .map(|(index, hour)| {
                let kind = if index % 2 == 0 { SwingKind::High } else { SwingKind::Low };
                SwingPoint::new(dec!(100), time_plus_hours(time_base(), *hour), kind, dec!(50))
            })
            .collect()
    }

    fn estimator() -> TimeCycleEstimator {
        TimeCycleEstimator::from_config(&AnalysisConfig::default())
    }

    #[test]
    fn test_estimate_insufficient_points() {
        for count in 0..MIN_CYCLE_SWING_POINTS {
            let hours = (0..count as i64).collect::<Vec<_>>();
            assert_eq!(
                estimator().estimate(&points(&hours), time_base()),
                Estimate::Computed(TimeAnalysis::InsufficientData {
                    swing_points: count
                })
            );
        }
    }

    #[test]
    fn test_estimate() {
        // Deltas: 10, 20, 30 => mean 20, population std dev sqrt(200 / 3)
        let points = points(&[0, 10, 30, 60]);
        let now = time_plus_hours(time_base(), 65);

        let actual = estimator().estimate(&points, now);
        let estimate = *actual.value().estimate().unwrap();

        assert_eq!(actual.fallback(), None);
        assert_eq!(estimate.average_cycle_hours, dec!(20));
        assert!((estimate.cycle_consistency - dec!(0.408248290463863)).abs() < dec!(0.000000000001));
        assert_eq!(estimate.next_turning_point, time_plus_hours(time_base(), 80));
        assert_eq!(estimate.time_until_next_hours, dec!(15));
    }

    #[test]
    fn test_estimate_turning_point_already_passed() {
        let points = points(&[0, 12, 24]);
        let now = time_plus_hours(time_base(), 40);

        let estimate = *estimator()
            .estimate(&points, now)
            .value()
            .estimate()
            .unwrap();

        assert_eq!(estimate.average_cycle_hours, dec!(12));
        assert_eq!(estimate.cycle_consistency, Decimal::ZERO);
        assert_eq!(estimate.next_turning_point, time_plus_hours(time_base(), 36));
        assert_eq!(estimate.time_until_next_hours, dec!(-4));
    }

    #[test]
    fn test_estimate_fractional_hours() {
        let base = time_base();
        let points = [
            SwingPoint::new(dec!(1), base, SwingKind::High, dec!(50)),
            SwingPoint::new(dec!(1), base + TimeDelta::minutes(30), SwingKind::Low, dec!(50)),
            SwingPoint::new(dec!(1), base + TimeDelta::minutes(90), SwingKind::High, dec!(50)),
        ];

        let estimate = *estimator()
            .estimate(&points, base + TimeDelta::minutes(90))
            .value()
            .estimate()
            .unwrap();

        assert_eq!(estimate.average_cycle_hours, dec!(0.75));
        assert_eq!(
            estimate.next_turning_point,
            base + TimeDelta::minutes(135)
        );
        assert_eq!(estimate.time_until_next_hours, dec!(0.75));
    }

    #[test]
    fn test_estimate_zero_average_cycle() {
        let points = points(&[5, 5, 5]);
        let now = time_plus_hours(time_base(), 5);

        let actual = estimator().estimate(&points, now);

        assert_eq!(
            actual,
            Estimate::Fallback {
                value: TimeAnalysis::Estimate(TimeCycleEstimate {
                    average_cycle_hours: Decimal::ZERO,
                    cycle_consistency: dec!(1.0),
                    next_turning_point: now,
                    time_until_next_hours: Decimal::ZERO,
                }),
                reason: Fallback::ZeroAverageCycle,
            }
        );
    }
}
