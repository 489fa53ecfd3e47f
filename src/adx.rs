use std::num::NonZero;

use crate::{
    Price, Result, Series,
    price_source::true_range,
    series::{Computed, Placeholder, ensure_min_len, ensure_same_len},
};

// Sums below this magnitude are treated as zero.
const EPSILON: f64 = 1e-8;

/// Wilder-smoothed directional movement and true range.
#[derive(Clone, Copy, Debug, Default)]
struct Movement {
    plus_dm: f64,
    minus_dm: f64,
    tr: f64,
}

impl Movement {
    /// Adds one bar's directional movement and true range.
    ///
    /// Only the larger of the up and down moves counts, and only when
    /// positive.
    fn add(&mut self, high: Price, low: Price, prev: (Price, Price, Price)) {
        let (prev_high, prev_low, prev_close) = prev;
        let up = high - prev_high;
        let down = prev_low - low;

        if down > 0.0 && up < down {
            self.minus_dm += down;
        } else if up > 0.0 && up > down {
            self.plus_dm += up;
        }
        self.tr += true_range(high, low, Some(prev_close));
    }

    fn decay(&mut self, n: f64) {
        self.plus_dm -= self.plus_dm / n;
        self.minus_dm -= self.minus_dm / n;
        self.tr -= self.tr / n;
    }

    /// Directional index, `None` while true range or the DI sum is zero.
    fn dx(&self) -> Option<f64> {
        if self.tr.abs() < EPSILON {
            return None;
        }
        let plus_di = 100.0 * self.plus_dm / self.tr;
        let minus_di = 100.0 * self.minus_dm / self.tr;
        let sum = plus_di + minus_di;
        if sum.abs() < EPSILON {
            return None;
        }
        Some(100.0 * (minus_di - plus_di).abs() / sum)
    }
}

/// Average Directional Index (ADX).
///
/// Trend strength on a 0–100 scale, regardless of direction:
///
/// ```text
/// +DM = high − prev_high   if it is positive and beats the down move
/// −DM = prev_low − low     if it is positive and beats the up move
/// +DI = 100 × smoothed(+DM) / smoothed(TR)
/// −DI = 100 × smoothed(−DM) / smoothed(TR)
/// DX  = 100 × |+DI − −DI| / (+DI + −DI)
/// ADX = Wilder average of DX
/// ```
///
/// Movement sums start from the first `period − 1` bar-to-bar changes, then
/// decay Wilder style. The first ADX is the mean of the next `period` DX
/// values and lands at `2 × period − 1`; earlier entries are `0.0`. A bar
/// whose DX is undefined (no range) leaves the ADX unchanged.
///
/// # Example
///
/// ```
/// use trend_overlay_ta::adx;
/// use std::num::NonZero;
///
/// // steady rally: all movement is upward
/// let high: Vec<f64> = (0..10).map(|i| 11.0 + f64::from(i)).collect();
/// let low: Vec<f64> = (0..10).map(|i| 9.0 + f64::from(i)).collect();
/// let close: Vec<f64> = (0..10).map(|i| 10.0 + f64::from(i)).collect();
///
/// let out = adx(&high, &low, &close, NonZero::new(3).unwrap()).unwrap();
/// assert_eq!(out[4], 0.0);
/// assert_eq!(out[5], 100.0);
/// ```
///
/// # Errors
///
/// - [`IndicatorError::LengthMismatch`](crate::IndicatorError::LengthMismatch)
///   if the columns differ in length.
/// - [`IndicatorError::InsufficientData`](crate::IndicatorError::InsufficientData)
///   if there are fewer bars than `period`. Between `period` and
///   `2 × period − 1` bars the output is all `0.0`.
pub fn adx(high: &[Price], low: &[Price], close: &[Price], period: NonZero<usize>) -> Result<Series> {
    let len = ensure_same_len(&[high, low, close])?;
    if len == 0 {
        return Ok(Vec::new());
    }
    let period = period.get();
    ensure_min_len(len, period)?;

    Ok(directional_index(high, low, close, period).into_aligned(len, Placeholder::Zero))
}

#[allow(clippy::cast_precision_loss)]
fn directional_index(high: &[Price], low: &[Price], close: &[Price], period: usize) -> Computed {
    let lookback = 2 * period - 1;
    if close.len() <= lookback {
        return Computed::empty();
    }

    let n = period as f64;
    let prev = |i: usize| (high[i - 1], low[i - 1], close[i - 1]);
    let mut movement = Movement::default();

    for i in 1..period {
        movement.add(high[i], low[i], prev(i));
    }

    let mut sum_dx = 0.0;
    for i in period..=lookback {
        movement.decay(n);
        movement.add(high[i], low[i], prev(i));
        if let Some(dx) = movement.dx() {
            sum_dx += dx;
        }
    }

    let mut adx = sum_dx / n;
    let mut out = Vec::with_capacity(close.len() - lookback);
    out.push(adx);

    for i in lookback + 1..close.len() {
        movement.decay(n);
        movement.add(high[i], low[i], prev(i));
        if let Some(dx) = movement.dx() {
            adx = (adx * (n - 1.0) + dx) / n;
        }
        out.push(adx);
    }

    Computed::new(lookback, out)
}
