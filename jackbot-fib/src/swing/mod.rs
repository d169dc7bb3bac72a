use chrono::{DateTime, Utc};
use derive_more::{Constructor, Display};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// [`SwingPointDetector`](detector::SwingPointDetector) scanning a bar series for local extrema.
pub mod detector;

/// [`MajorSwing`](major::MajorSwing) selection from the strongest recent swing points.
pub mod major;

/// Kind of local extreme a [`SwingPoint`] represents.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Display, Deserialize, Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SwingKind {
    #[display("high")]
    High,
    #[display("low")]
    Low,
}

/// Local price extreme over a symmetric window of bars.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Deserialize, Serialize, Constructor)]
pub struct SwingPoint {
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
    pub kind: SwingKind,
    /// Strength score in `[0, 100]`.
    pub strength: Decimal,
}

impl SwingPoint {
    pub fn is_high(&self) -> bool {
        self.kind == SwingKind::High
    }

    pub fn is_low(&self) -> bool {
        self.kind == SwingKind::Low
    }
}
