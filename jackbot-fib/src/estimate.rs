use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Named reason a calculation substituted its documented default value.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Display, Deserialize, Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Fallback {
    /// Swing high equals swing low, so range based ratios are undefined.
    #[display("degenerate_range")]
    DegenerateRange,

    /// A price used as a divisor was zero or negative.
    #[display("non_positive_price")]
    NonPositivePrice,

    /// Mean volume was zero, so volume dispersion is undefined.
    #[display("zero_mean_volume")]
    ZeroMeanVolume,

    /// Mean time between swing points was zero.
    #[display("zero_average_cycle")]
    ZeroAverageCycle,

    /// Window contained no values.
    #[display("empty_window")]
    EmptyWindow,

    /// Decimal arithmetic overflowed.
    #[display("arithmetic_overflow")]
    ArithmeticOverflow,
}

/// Outcome of a numeric sub-computation: either the computed value, or the documented default
/// together with the [`Fallback`] reason it was used.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Estimate<T> {
    Computed(T),
    Fallback { value: T, reason: Fallback },
}

impl<T> Estimate<T> {
    /// Construct an [`Estimate`] from an optional computation, substituting `default` when the
    /// computation failed.
    pub fn or_fallback(computed: Option<T>, default: T, reason: Fallback) -> Self {
        match computed {
            Some(value) => Self::Computed(value),
            None => Self::Fallback {
                value: default,
                reason,
            },
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Self::Computed(value) => value,
            Self::Fallback { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Self::Computed(value) => value,
            Self::Fallback { value, .. } => value,
        }
    }

    /// The [`Fallback`] reason, if the default value was used.
    pub fn fallback(&self) -> Option<Fallback> {
        match self {
            Self::Computed(_) => None,
            Self::Fallback { reason, .. } => Some(*reason),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback().is_some()
    }

    pub fn map<U, F>(self, op: F) -> Estimate<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Computed(value) => Estimate::Computed(op(value)),
            Self::Fallback { value, reason } => Estimate::Fallback {
                value: op(value),
                reason,
            },
        }
    }
}

impl<T: Copy> Estimate<T> {
    pub fn get(&self) -> T {
        *self.value()
    }
}
