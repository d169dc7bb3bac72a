use crate::{
    bar::Bar,
    config::AnalysisConfig,
    estimate::{Estimate, Fallback},
    statistic::{algorithm::median, dispersion::mean},
    swing::{SwingKind, SwingPoint},
};
use derive_more::Constructor;
use rust_decimal::Decimal;
use tracing::debug;

/// Detects local highs & lows over a symmetric window of `2 * window + 1` bars, scoring each
/// one's strength.
///
/// A bar at index `i` is a swing high iff its high equals the maximum high over the closed
/// window `[i - window, i + window]`, and a swing low iff its low equals the minimum low. An
/// outside bar engulfing its window is both, emitting a [`SwingKind::High`] then a
/// [`SwingKind::Low`] point at the same timestamp. A flat bar (`high == low`) that is both
/// implies a flat window, so only the [`SwingKind::High`] point is emitted.
#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct SwingPointDetector {
    pub window: usize,
    pub volume_strength_cap: Decimal,
    pub default_strength: Decimal,
}

impl SwingPointDetector {
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(
            config.window,
            config.volume_strength_cap,
            config.default_strength,
        )
    }

    /// Scan the provided bars for swing points, returned in timestamp ascending order.
    ///
    /// Only bars whose full window lies inside the series are eligible, so fewer than
    /// `2 * window + 1` bars yields no swing points.
    pub fn detect(&self, bars: &[Bar]) -> Vec<SwingPoint> {
        let window = self.window;
        if bars.len() < window.saturating_mul(2).saturating_add(1) {
            return Vec::new();
        }

        let series_mean_volume = mean(bars.iter().map(|bar| bar.volume));

        (window..bars.len() - window)
            .flat_map(move |index| {
                let bar = &bars[index];
                let frame = &bars[index - window..=index + window];

                let is_high = is_window_high(bar, frame);
                let is_low = is_window_low(bar, frame) && !(is_high && bar.high == bar.low);

                let high = is_high.then_some((SwingKind::High, bar.high));
                let low = is_low.then_some((SwingKind::Low, bar.low));

                high.into_iter().chain(low).map(move |(kind, price)| {
                    self.swing_point(bar, frame, kind, price, series_mean_volume)
                })
            })
            .collect()
    }

    fn swing_point(
        &self,
        bar: &Bar,
        frame: &[Bar],
        kind: SwingKind,
        price: Decimal,
        series_mean_volume: Option<Decimal>,
    ) -> SwingPoint {
        let strength = self.strength(kind, price, frame, series_mean_volume);
        if let Some(reason) = strength.fallback() {
            debug!(
                %kind,
                %price,
                timestamp = %bar.timestamp,
                %reason,
                "SwingPointDetector using default strength"
            );
        }

        SwingPoint::new(price, bar.timestamp, kind, strength.get())
    }

    /// Score the strength of a swing point in `[0, 100]`.
    ///
    /// `strength = min(price_diff * volume_strength * 100, 100)`, where:
    /// * `price_diff = |price - median(window prices)| / price`, using window highs for a
    ///   [`SwingKind::High`] and window lows for a [`SwingKind::Low`].
    /// * `volume_strength = min(window mean volume / series mean volume, volume_strength_cap)`,
    ///   or 1 if the series mean volume is not positive.
    ///
    /// `series_mean_volume` is `None` if it could not be calculated. Any fault yields the
    /// configured default strength.
    pub fn strength(
        &self,
        kind: SwingKind,
        price: Decimal,
        frame: &[Bar],
        series_mean_volume: Option<Decimal>,
    ) -> Estimate<Decimal> {
        let fallback = |reason| Estimate::Fallback {
            value: self.default_strength,
            reason,
        };

        if frame.is_empty() {
            return fallback(Fallback::EmptyWindow);
        }
        if price <= Decimal::ZERO {
            return fallback(Fallback::NonPositivePrice);
        }

        let window_prices = frame
            .iter()
            .map(|bar| match kind {
                SwingKind::High => bar.high,
                SwingKind::Low => bar.low,
            })
            .collect::<Vec<_>>();

        let score = || -> Option<Decimal> {
            let price_diff = price
                .checked_sub(median(&window_prices)?)?
                .abs()
                .checked_div(price)?;

            let series_mean_volume = series_mean_volume?;
            let volume_strength = if series_mean_volume <= Decimal::ZERO {
                Decimal::ONE
            } else {
                mean(frame.iter().map(|bar| bar.volume))?
                    .checked_div(series_mean_volume)?
                    .min(self.volume_strength_cap)
            };

            let strength = price_diff
                .checked_mul(volume_strength)?
                .checked_mul(Decimal::ONE_HUNDRED)?;

            Some(strength.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED))
        };

        Estimate::or_fallback(
            score(),
            self.default_strength,
            Fallback::ArithmeticOverflow,
        )
    }
}

fn is_window_high(bar: &Bar, frame: &[Bar]) -> bool {
    frame.iter().map(|other| other.high).max() == Some(bar.high)
}

fn is_window_low(bar: &Bar, frame: &[Bar]) -> bool {
    frame.iter().map(|other| other.low).min() == Some(bar.low)
}
