use std::num::NonZero;

use crate::{
    Result, Series,
    series::{Computed, Placeholder, ensure_min_len},
};

/// Linear regression value.
///
/// Fits a least-squares line through each window of `period` values and
/// reports the line's value at the window's last bar. A rolling end-point
/// moving average that follows a steady trend without lag.
///
/// ```text
/// x      = 0, 1, …, n − 1 (oldest first)
/// slope  = (n·Σxy − Σx·Σy) / (n·Σx² − (Σx)²)
/// value  = (Σy − slope·Σx) / n + slope × (n − 1)
/// ```
///
/// The first `period − 1` outputs are `0.0`. A period of one reproduces
/// the input.
///
/// ```
/// use trend_overlay_ta::linearreg;
/// use std::num::NonZero;
///
/// let out = linearreg(&[1.0, 3.0, 2.0, 4.0], NonZero::new(3).unwrap()).unwrap();
/// // window [1, 3, 2]: slope 0.5, value 2.5
/// assert_eq!(out[2], 2.5);
/// ```
///
/// # Errors
///
/// [`IndicatorError::InsufficientData`](crate::IndicatorError::InsufficientData)
/// if `values` is non-empty and shorter than `period`.
pub fn linearreg(values: &[f64], period: NonZero<usize>) -> Result<Series> {
    Ok(regression_end_point(values, period.get())?.into_aligned(values.len(), Placeholder::Zero))
}

#[allow(clippy::cast_precision_loss)]
fn regression_end_point(values: &[f64], length: usize) -> Result<Computed> {
    if values.is_empty() {
        return Ok(Computed::empty());
    }
    ensure_min_len(values.len(), length)?;
    if length == 1 {
        return Ok(Computed::new(0, values.to_vec()));
    }

    let n = length as f64;
    let sum_x = n * (n - 1.0) / 2.0;
    let sum_x_sq = n * (n - 1.0) * (2.0 * n - 1.0) / 6.0;
    let divisor = n * sum_x_sq - sum_x * sum_x;

    let out = values
        .windows(length)
        .map(|window| {
            let (sum_y, sum_xy) = window
                .iter()
                .enumerate()
                .fold((0.0, 0.0), |(sy, sxy), (x, &y)| (sy + y, (x as f64).mul_add(y, sxy)));
            let slope = (n * sum_xy - sum_x * sum_y) / divisor;
            let intercept = (sum_y - slope * sum_x) / n;
            slope.mul_add(n - 1.0, intercept)
        })
        .collect();

    Ok(Computed::new(length - 1, out))
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::{
        IndicatorError,
        test_util::{assert_approx, nz},
    };

    #[test]
    fn straight_line_is_reproduced() {
        let values: Vec<f64> = (0..10).map(|i| 3.0 * f64::from(i) + 1.0).collect();
        let out = linearreg(&values, nz(4)).unwrap();
        assert_eq!(&out[..3], &[0.0; 3]);
        for i in 3..10 {
            assert_approx!(out[i], values[i]);
        }
    }

    #[test]
    fn end_point_of_fit() {
        // window [1, 3, 2]: Σy 6, Σxy 7 → slope 0.5, intercept 1.5
        // window [3, 2, 4]: Σy 9, Σxy 10 → slope 0.5, intercept 2.5
        let out = linearreg(&[1.0, 3.0, 2.0, 4.0], nz(3)).unwrap();
        assert_eq!(out, vec![0.0, 0.0, 2.5, 3.5]);
    }

    #[test]
    fn flat_input_is_flat() {
        let out = linearreg(&[7.0; 6], nz(3)).unwrap();
        assert_eq!(&out[2..], &[7.0; 4]);
    }

    #[test]
    fn period_one_is_identity() {
        let out = linearreg(&[4.0, 1.0, 9.0], nz(1)).unwrap();
        assert_eq!(out, vec![4.0, 1.0, 9.0]);
    }

    #[test]
    fn empty_is_empty() {
        assert!(linearreg(&[], nz(14)).unwrap().is_empty());
    }

    #[test]
    fn shorter_than_period() {
        assert_eq!(
            linearreg(&[1.0, 2.0], nz(3)),
            Err(IndicatorError::InsufficientData {
                required: 3,
                actual: 2
            })
        );
    }
}
