use std::num::NonZero;

use crate::{
    Multiplier, Result, Series,
    series::{Computed, Placeholder, ensure_min_len},
};

/// Population standard deviation over a sliding window.
///
/// Keeps a running sum and sum of squares, so each bar costs O(1):
///
/// ```text
/// variance = sum_sq / n − mean²
/// ```
///
/// Rounding can push the variance slightly below zero on flat input; it is
/// clamped to `0.0` before the square root.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn rolling_std_dev(values: &[f64], length: usize) -> Result<Computed> {
    if values.is_empty() {
        return Ok(Computed::empty());
    }
    ensure_min_len(values.len(), length)?;

    let reciprocal = 1.0 / length as f64;
    let deviation = |sum: f64, sum_sq: f64| {
        let mean = sum * reciprocal;
        let variance = sum_sq.mul_add(reciprocal, -(mean * mean));
        variance.max(0.0).sqrt()
    };

    let mut sum: f64 = values[..length].iter().sum();
    let mut sum_sq: f64 = values[..length].iter().map(|v| v * v).sum();

    let mut out = Vec::with_capacity(values.len() - length + 1);
    out.push(deviation(sum, sum_sq));

    for (new, old) in values[length..].iter().zip(values) {
        sum += new - old;
        sum_sq += new * new - old * old;
        out.push(deviation(sum, sum_sq));
    }

    Ok(Computed::new(length - 1, out))
}

/// Standard deviation of `values` over `period`, scaled by `deviations`.
///
/// Population (not sample) deviation. The first `period − 1` outputs are
/// `0.0`.
///
/// # Errors
///
/// [`IndicatorError::InsufficientData`](crate::IndicatorError::InsufficientData)
/// if `values` is non-empty and shorter than `period`.
pub fn stddev(values: &[f64], period: NonZero<usize>, deviations: Multiplier) -> Result<Series> {
    let mut computed = rolling_std_dev(values, period.get())?;
    for v in &mut computed.values {
        *v *= deviations.value();
    }
    Ok(computed.into_aligned(values.len(), Placeholder::Zero))
}
