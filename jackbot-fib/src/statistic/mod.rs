/// Statistical algorithms for analysing datasets.
pub mod algorithm;

/// Measures of central tendency & dispersion over a dataset of [`Decimal`](rust_decimal::Decimal)s.
///
/// For example, `mean`, `median`, population & sample standard deviation.
pub mod dispersion;
