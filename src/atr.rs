use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource, Result, Series,
    price_source::true_range,
    series::{Computed, Placeholder, ensure_min_len, ensure_same_len},
};

/// Configuration for the Average True Range ([`Atr`]) indicator.
///
/// # Example
///
/// ```
/// use trend_overlay_ta::{AtrConfig, IndicatorConfig};
/// use std::num::NonZero;
///
/// let config = AtrConfig::new(NonZero::new(14).unwrap());
/// assert_eq!(config.length(), 14);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct AtrConfig {
    length: usize,
}

impl IndicatorConfig for AtrConfig {
    type Builder = AtrConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        AtrConfigBuilder::new()
    }

    #[inline]
    fn length(&self) -> usize {
        self.length
    }
}

impl AtrConfig {
    /// ATR over `length` bars.
    #[must_use]
    pub fn new(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }

    /// ATR(14), Wilder's original setting.
    #[allow(clippy::missing_panics_doc)]
    #[must_use]
    pub fn default_14() -> Self {
        Self::new(NonZero::new(14).unwrap())
    }
}

impl Display for AtrConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AtrConfig({})", self.length)
    }
}

/// Builder for [`AtrConfig`].
///
/// Length must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct AtrConfigBuilder {
    length: Option<usize>,
}

impl AtrConfigBuilder {
    fn new() -> Self {
        Self { length: None }
    }
}

impl IndicatorConfigBuilder<AtrConfig> for AtrConfigBuilder {
    #[inline]
    fn length(mut self, length: NonZero<usize>) -> Self {
        self.length.replace(length.get());
        self
    }

    #[inline]
    fn build(self) -> AtrConfig {
        AtrConfig {
            length: self.length.expect("length is required"),
        }
    }
}

/// Average True Range (ATR).
///
/// Volatility measured as Wilder-smoothed true range:
///
/// ```text
/// TR[0]  = high[0] − low[0]
/// TR[i]  = max(high − low, |high − close[i−1]|, |low − close[i−1]|)
/// ATR[n−1] = mean(TR[0..n])
/// ATR[i] = (ATR[i−1] × (n − 1) + TR[i]) / n
/// ```
///
/// The first `n − 1` outputs are `0.0`. NaN in the input is not rejected;
/// it propagates through the smoothing.
///
/// # Example
///
/// ```
/// use trend_overlay_ta::{Atr, AtrConfig};
/// use std::num::NonZero;
///
/// let atr = Atr::new(AtrConfig::new(NonZero::new(3).unwrap()));
/// let out = atr
///     .compute_hlc(&[10.0; 5], &[8.0; 5], &[9.0; 5])
///     .unwrap();
///
/// assert_eq!(out, vec![0.0, 0.0, 2.0, 2.0, 2.0]);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Atr {
    config: AtrConfig,
}

impl Indicator for Atr {
    type Config = AtrConfig;
    type Output = Series;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn compute(&self, bars: &[impl Ohlcv]) -> Result<Series> {
        let tr = PriceSource::TrueRange.series(bars);
        let computed = wilder_smooth(&tr, self.config.length)?;
        Ok(computed.into_aligned(bars.len(), Placeholder::Zero))
    }
}

impl Atr {
    /// Computes ATR from separate high, low and close columns.
    ///
    /// # Errors
    ///
    /// - [`IndicatorError::LengthMismatch`](crate::IndicatorError::LengthMismatch)
    ///   if the columns differ in length.
    /// - [`IndicatorError::InsufficientData`](crate::IndicatorError::InsufficientData)
    ///   if there are fewer bars than the period. Empty input is not an error.
    pub fn compute_hlc(&self, high: &[Price], low: &[Price], close: &[Price]) -> Result<Series> {
        let len = ensure_same_len(&[high, low, close])?;
        let tr = true_range_series(high, low, close);
        let computed = wilder_smooth(&tr, self.config.length)?;
        Ok(computed.into_aligned(len, Placeholder::Zero))
    }
}

impl Display for Atr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ATR({})", self.config.length)
    }
}

/// True range of every bar; bar 0 uses `high − low`.
///
/// The columns must have equal length.
#[must_use]
pub fn true_range_series(high: &[Price], low: &[Price], close: &[Price]) -> Series {
    debug_assert!(high.len() == low.len() && low.len() == close.len());

    (0..close.len())
        .map(|i| {
            let prev_close = i.checked_sub(1).map(|p| close[p]);
            true_range(high[i], low[i], prev_close)
        })
        .collect()
}

/// Wilder smoothing: SMA seed over the first `period` samples, then
/// `avg = (avg × (period − 1) + x) / period`.
///
/// Reports its first value at `period − 1`.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn wilder_smooth(values: &[f64], period: usize) -> Result<Computed> {
    if values.is_empty() {
        return Ok(Computed::empty());
    }
    ensure_min_len(values.len(), period)?;

    let n = period as f64;
    let seed = values[..period].iter().sum::<f64>() / n;

    let mut out = Vec::with_capacity(values.len() - period + 1);
    out.push(seed);

    let mut avg = seed;
    for &x in &values[period..] {
        avg = (avg * (n - 1.0) + x) / n;
        out.push(avg);
    }

    Ok(Computed::new(period - 1, out))
}

/// Average True Range over high, low and close columns.
///
/// See [`Atr`] for the formula and [`Atr::compute_hlc`] for errors.
///
/// # Errors
///
/// Same as [`Atr::compute_hlc`].
pub fn atr(high: &[Price], low: &[Price], close: &[Price], period: NonZero<usize>) -> Result<Series> {
    Atr::new(AtrConfig::new(period)).compute_hlc(high, low, close)
}
