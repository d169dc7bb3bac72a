use crate::statistic::algorithm::welford_online;
use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

/// Representation of a dataset using its mean and measures of dispersion - variance & standard
/// deviation.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
pub struct Dispersion {
    pub count: usize,
    pub mean: Decimal,
    pub recurrence_relation_m: Decimal,
}

impl Dispersion {
    /// Calculates the [`Dispersion`] of the provided values in one pass.
    ///
    /// Returns `None` if the Decimal arithmetic overflows.
    pub fn calculate<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = Decimal>,
    {
        values
            .into_iter()
            .try_fold(Self::default(), |mut dispersion, value| {
                dispersion.update(value)?;
                Some(dispersion)
            })
    }

    /// Iteratively updates the [`Dispersion`] with the next value in the dataset.
    pub fn update(&mut self, next_value: Decimal) -> Option<()> {
        let count = self.count.checked_add(1)?;
        let prev_mean = self.mean;
        let new_mean = welford_online::calculate_mean(prev_mean, next_value, Decimal::from(count))?;

        self.recurrence_relation_m = welford_online::calculate_recurrence_relation_m(
            self.recurrence_relation_m,
            prev_mean,
            next_value,
            new_mean,
        )?;
        self.mean = new_mean;
        self.count = count;
        Some(())
    }

    pub fn population_variance(&self) -> Decimal {
        welford_online::calculate_population_variance(
            self.recurrence_relation_m,
            Decimal::from(self.count),
        )
    }

    pub fn sample_variance(&self) -> Decimal {
        welford_online::calculate_sample_variance(
            self.recurrence_relation_m,
            Decimal::from(self.count),
        )
    }

    /// Population standard deviation.
    pub fn population_std_dev(&self) -> Option<Decimal> {
        self.population_variance().abs().sqrt()
    }

    /// Sample standard deviation, using Bessel's correction.
    pub fn sample_std_dev(&self) -> Option<Decimal> {
        self.sample_variance().abs().sqrt()
    }

    /// Coefficient of variation, `std_dev / mean`, using the sample standard deviation.
    ///
    /// Returns `None` if the mean is not positive.
    pub fn sample_coefficient_of_variation(&self) -> Option<Decimal> {
        if self.mean <= Decimal::ZERO {
            return None;
        }
        self.sample_std_dev()?.checked_div(self.mean)
    }
}

/// Calculates the arithmetic mean of the provided values.
///
/// Returns `None` for an empty dataset or on overflow.
pub fn mean<I>(values: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    let dispersion = Dispersion::calculate(values)?;
    (dispersion.count > 0).then_some(dispersion.mean)
}
