/// Grouping of [Welford Online](https://en.wikipedia.org/wiki/Algorithms_for_calculating_variance#Welford's_online_algorithm)
/// algorithms for calculating running values such as mean and variance in one pass through.
///
/// All calculations use checked [`Decimal`] arithmetic and return `None` on overflow.
pub mod welford_online {
    use rust_decimal::Decimal;

    /// Calculates the next mean.
    pub fn calculate_mean(prev_mean: Decimal, next_value: Decimal, count: Decimal) -> Option<Decimal> {
        next_value
            .checked_sub(prev_mean)?
            .checked_div(count)
            .and_then(|delta| prev_mean.checked_add(delta))
    }

    /// Calculates the next Welford Online recurrence relation M.
    pub fn calculate_recurrence_relation_m(
        prev_m: Decimal,
        prev_mean: Decimal,
        new_value: Decimal,
        new_mean: Decimal,
    ) -> Option<Decimal> {
        let delta_prev = new_value.checked_sub(prev_mean)?;
        let delta_new = new_value.checked_sub(new_mean)?;
        prev_m.checked_add(delta_prev.checked_mul(delta_new)?)
    }

    /// Calculates the unbiased 'Sample' Variance using Bessel's correction (count - 1), and the
    /// Welford Online recurrence relation M.
    pub fn calculate_sample_variance(recurrence_relation_m: Decimal, count: Decimal) -> Decimal {
        match count < Decimal::TWO {
            true => Decimal::ZERO,
            false => recurrence_relation_m / (count - Decimal::ONE),
        }
    }

    /// Calculates the biased 'Population' Variance using the Welford Online recurrence relation M.
    pub fn calculate_population_variance(
        recurrence_relation_m: Decimal,
        count: Decimal,
    ) -> Decimal {
        match count < Decimal::ONE {
            true => Decimal::ZERO,
            false => recurrence_relation_m / count,
        }
    }
}

use rust_decimal::Decimal;

/// Calculates the median of the provided values, averaging the two middle values of an
/// even-length dataset.
///
/// Returns `None` for an empty dataset.
pub fn median(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let middle = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[middle])
    } else {
        sorted[middle - 1]
            .checked_add(sorted[middle])
            .map(|sum| sum / Decimal::TWO)
    }
}
