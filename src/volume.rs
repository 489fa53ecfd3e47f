//! Cumulative volume indicators.
//!
//! Both lines start at the first bar, so they have no warm-up region. Their
//! level depends on where the input starts; only changes are meaningful.

use std::cmp::Ordering;

use crate::{Price, Result, Series, series::ensure_same_len};

/// On-Balance Volume (OBV).
///
/// Starts at the first bar's volume, then adds the volume of every bar that
/// closes higher and subtracts the volume of every bar that closes lower.
/// Unchanged closes carry the total forward.
///
/// ```
/// use trend_overlay_ta::obv;
///
/// let out = obv(&[10.0, 11.0, 10.5, 10.5], &[100.0, 40.0, 25.0, 60.0]).unwrap();
/// assert_eq!(out, vec![100.0, 140.0, 115.0, 115.0]);
/// ```
///
/// # Errors
///
/// [`IndicatorError::LengthMismatch`](crate::IndicatorError::LengthMismatch)
/// if `close` and `volume` differ in length.
pub fn obv(close: &[Price], volume: &[f64]) -> Result<Series> {
    ensure_same_len(&[close, volume])?;
    let Some(&first) = volume.first() else {
        return Ok(Vec::new());
    };

    let mut total = first;
    let mut out = Vec::with_capacity(close.len());
    out.push(total);

    for (pair, &vol) in close.windows(2).zip(&volume[1..]) {
        match pair[1].partial_cmp(&pair[0]) {
            Some(Ordering::Greater) => total += vol,
            Some(Ordering::Less) => total -= vol,
            _ => {}
        }
        out.push(total);
    }

    Ok(out)
}

/// Chaikin Accumulation/Distribution line (AD).
///
/// Running total of money flow volume:
///
/// ```text
/// CLV = ((close − low) − (high − close)) / (high − low)
/// AD  = AD[i−1] + CLV × volume
/// ```
///
/// Bars with no range add nothing.
///
/// ```
/// use trend_overlay_ta::ad;
///
/// // closes at the high, then at the low
/// let out = ad(&[12.0, 12.0], &[10.0, 10.0], &[12.0, 10.0], &[50.0, 20.0]).unwrap();
/// assert_eq!(out, vec![50.0, 30.0]);
/// ```
///
/// # Errors
///
/// [`IndicatorError::LengthMismatch`](crate::IndicatorError::LengthMismatch)
/// if the four columns differ in length.
pub fn ad(high: &[Price], low: &[Price], close: &[Price], volume: &[f64]) -> Result<Series> {
    ensure_same_len(&[high, low, close, volume])?;

    let mut total = 0.0;
    Ok((0..close.len())
        .map(|i| {
            let range = high[i] - low[i];
            if range > 0.0 {
                let clv = ((close[i] - low[i]) - (high[i] - close[i])) / range;
                total += clv * volume[i];
            }
            total
        })
        .collect())
}
