use std::num::NonZero;

use crate::{
    MaKind, Result, Series,
    ema::exponential,
    ppo::oscillator,
    series::{Computed, Placeholder, ensure_min_len},
};

/// MACD line, its signal line and the histogram between them.
///
/// All three start at the same bar, the first one with a defined signal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MacdOutput {
    /// `EMA(fast) − EMA(slow)`.
    pub macd: Series,
    /// EMA of the MACD line.
    pub signal: Series,
    /// `macd − signal`.
    pub histogram: Series,
}

impl MacdOutput {
    fn placeholder(len: usize) -> Self {
        let zeros = vec![Placeholder::Zero.value(); len];
        Self {
            macd: zeros.clone(),
            signal: zeros.clone(),
            histogram: zeros,
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.macd.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.macd.is_empty()
    }
}

/// Moving Average Convergence/Divergence.
///
/// ```text
/// macd      = EMA(fast) − EMA(slow)
/// signal    = EMA(macd, signal)
/// histogram = macd − signal
/// ```
///
/// The MACD line is the EMA [`apo`](crate::apo): periods are ordered so
/// the longer one is slow, and both legs start at `slow − 1`. The signal
/// EMA is seeded over the first `signal` MACD values. Every output is
/// `0.0` before `slow + signal − 2`; when the input is too short to reach
/// that bar, all outputs are `0.0`.
///
/// # Example
///
/// ```
/// use trend_overlay_ta::macd;
/// use std::num::NonZero;
///
/// let closes: Vec<f64> = (1..=40).map(f64::from).collect();
/// let out = macd(
///     &closes,
///     NonZero::new(12).unwrap(),
///     NonZero::new(26).unwrap(),
///     NonZero::new(9).unwrap(),
/// )
/// .unwrap();
///
/// assert_eq!(out.macd[32], 0.0);
/// assert!(out.macd[33] > 0.0);
/// ```
///
/// # Errors
///
/// [`IndicatorError::InsufficientData`](crate::IndicatorError::InsufficientData)
/// if `values` is non-empty and shorter than any of the three periods.
pub fn macd(
    values: &[f64],
    fast: NonZero<usize>,
    slow: NonZero<usize>,
    signal: NonZero<usize>,
) -> Result<MacdOutput> {
    let len = values.len();
    if len > 0 {
        ensure_min_len(len, fast.max(slow).max(signal).get())?;
    }

    let line = oscillator(values, fast, slow, MaKind::Ema, |f, s| f - s)?;
    if line.valid_count() < signal.get() {
        tracing::debug!(
            valid = line.valid_count(),
            signal = signal.get(),
            "MACD line too short for signal"
        );
        return Ok(MacdOutput::placeholder(len));
    }

    let signal_line = exponential(&line.values, signal.get())?;
    let begin = line.begin + signal_line.begin;
    let macd_line = line.values[signal_line.begin..].to_vec();
    let histogram = macd_line
        .iter()
        .zip(&signal_line.values)
        .map(|(m, s)| m - s)
        .collect();

    Ok(MacdOutput {
        macd: Computed::new(begin, macd_line).into_aligned(len, Placeholder::Zero),
        signal: signal_line
            .shifted(line.begin)
            .into_aligned(len, Placeholder::Zero),
        histogram: Computed::new(begin, histogram).into_aligned(len, Placeholder::Zero),
    })
}
