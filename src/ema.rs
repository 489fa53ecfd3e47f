use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, PriceSource, Result, Series,
    series::{Computed, Placeholder},
    sma::rolling_mean,
};

/// Configuration for the Exponential Moving Average ([`Ema`])
/// indicator.
///
/// # Example
///
/// ```
/// use trend_overlay_ta::{EmaConfig, IndicatorConfig};
/// use std::num::NonZero;
///
/// let config = EmaConfig::close(NonZero::new(20).unwrap());
/// assert_eq!(config.length(), 20);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct EmaConfig {
    length: usize,
    source: PriceSource,
}

impl IndicatorConfig for EmaConfig {
    type Builder = EmaConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        EmaConfigBuilder::new()
    }

    #[inline]
    fn length(&self) -> usize {
        self.length
    }
}

impl EmaConfig {
    /// Price source read from each bar.
    #[inline]
    #[must_use]
    pub fn source(&self) -> &PriceSource {
        &self.source
    }

    /// EMA on closing price.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }
}

impl Display for EmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EmaConfig({}, {})", self.length, self.source)
    }
}

/// Builder for [`EmaConfig`].
///
/// Defaults: source = [`PriceSource::Close`].
/// Length must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct EmaConfigBuilder {
    length: Option<usize>,
    source: PriceSource,
}

impl EmaConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::Close,
        }
    }

    /// Sets the price source.
    #[inline]
    #[must_use]
    pub fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }
}

impl IndicatorConfigBuilder<EmaConfig> for EmaConfigBuilder {
    #[inline]
    fn length(mut self, length: NonZero<usize>) -> Self {
        self.length.replace(length.get());
        self
    }

    #[inline]
    fn build(self) -> EmaConfig {
        EmaConfig {
            length: self.length.expect("length is required"),
            source: self.source,
        }
    }
}

/// Exponential Moving Average (EMA).
///
/// A weighted moving average that gives more weight to recent
/// prices. Uses the standard smoothing factor
/// `α = 2 / (length + 1)`. Each value is computed as:
///
/// ```text
/// EMA = α × price + (1 − α) × prev_EMA
/// ```
///
/// Seeded with the SMA of the first `length` values, so the first
/// `length − 1` outputs are `0.0`.
///
/// # Example
///
/// ```
/// use trend_overlay_ta::{Ema, EmaConfig};
/// use std::num::NonZero;
///
/// let ema = Ema::new(EmaConfig::close(NonZero::new(3).unwrap()));
///
/// // SMA seed = (2 + 4 + 6) / 3 = 4.0, then α = 0.5: 8 × 0.5 + 4 × 0.5 = 6.0
/// assert_eq!(
///     ema.compute_series(&[2.0, 4.0, 6.0, 8.0]).unwrap(),
///     vec![0.0, 0.0, 4.0, 6.0],
/// );
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Ema {
    config: EmaConfig,
}

impl Indicator for Ema {
    type Config = EmaConfig;
    type Output = Series;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn compute(&self, bars: &[impl Ohlcv]) -> Result<Series> {
        self.compute_series(&self.config.source.series(bars))
    }
}

impl Ema {
    /// Computes the EMA of a single series.
    ///
    /// # Errors
    ///
    /// [`IndicatorError::InsufficientData`](crate::IndicatorError::InsufficientData)
    /// if `values` is non-empty and shorter than the window.
    pub fn compute_series(&self, values: &[f64]) -> Result<Series> {
        Ok(exponential(values, self.config.length)?.into_aligned(values.len(), Placeholder::Zero))
    }
}

impl Display for Ema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EMA({}, {})", self.config.length, self.config.source)
    }
}

pub(crate) fn exponential(values: &[f64], length: usize) -> Result<Computed> {
    let seeded = rolling_mean(&values[..values.len().min(length)], length)?;
    let Some(&seed) = seeded.values.first() else {
        return Ok(Computed::empty());
    };

    #[allow(clippy::cast_precision_loss)]
    let alpha = 2.0 / (length + 1) as f64;

    let mut out = Vec::with_capacity(values.len() - length + 1);
    out.push(seed);

    let mut previous = seed;
    for &price in &values[length..] {
        previous = alpha.mul_add(price - previous, previous);
        out.push(previous);
    }

    Ok(Computed::new(length - 1, out))
}

/// Exponential moving average of `values` over `period`.
///
/// # Errors
///
/// Same as [`Ema::compute_series`].
pub fn ema(values: &[f64], period: NonZero<usize>) -> Result<Series> {
    Ema::new(EmaConfig::close(period)).compute_series(values)
}
