use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource, Result, Series,
    atr::wilder_smooth,
    series::{Computed, Placeholder, ensure_min_len},
};

/// Configuration for the Relative Strength Index ([`Rsi`])
/// indicator.
///
/// RSI uses Wilder's smoothing, which has infinite memory: the
/// SMA seed (first `length` price changes) influences all
/// subsequent values. Output begins at bar `length`.
///
/// # Example
///
/// ```
/// use trend_overlay_ta::{IndicatorConfig, RsiConfig};
/// use std::num::NonZero;
///
/// let config = RsiConfig::close(NonZero::new(14).unwrap());
/// assert_eq!(config.length(), 14);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct RsiConfig {
    length: usize,
    source: PriceSource,
}

impl IndicatorConfig for RsiConfig {
    type Builder = RsiConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        RsiConfigBuilder::new()
    }

    #[inline]
    fn length(&self) -> usize {
        self.length
    }
}

impl RsiConfig {
    /// Price source read from each bar.
    #[inline]
    #[must_use]
    pub fn source(&self) -> &PriceSource {
        &self.source
    }

    /// RSI on closing price.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }
}

impl Display for RsiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RsiConfig({}, {})", self.length, self.source)
    }
}

/// Builder for [`RsiConfig`].
///
/// Defaults: source = [`PriceSource::Close`].
/// Length must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct RsiConfigBuilder {
    length: Option<usize>,
    source: PriceSource,
}

impl RsiConfigBuilder {
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

impl IndicatorConfigBuilder<RsiConfig> for RsiConfigBuilder {
    #[inline]
    fn length(mut self, length: NonZero<usize>) -> Self {
        self.length = Some(length.get());
        self
    }

    #[inline]
    fn build(self) -> RsiConfig {
        RsiConfig {
            length: self.length.expect("length is required"),
            source: self.source,
        }
    }
}

/// Relative Strength Index (RSI) with Wilder's smoothing.
///
/// Measures the speed and magnitude of recent price changes on
/// a 0–100 scale. Values above 70 are conventionally considered
/// overbought; below 30, oversold.
///
/// The first `length` price changes are averaged with a simple
/// mean (SMA seed). After seeding, gains and losses are smoothed
/// with Wilder's method (`α = 1 / length`):
///
/// ```text
/// avg_gain = (prev_avg_gain × (length − 1) + gain) / length
/// avg_loss = (prev_avg_loss × (length − 1) + loss) / length
/// RSI      = 100 × avg_gain / (avg_gain + avg_loss)
/// ```
///
/// A window without any price movement reads `0.0`. The first
/// `length` outputs are `0.0` as well.
///
/// # Example
///
/// ```
/// use trend_overlay_ta::{Rsi, RsiConfig};
/// use std::num::NonZero;
///
/// let rsi = Rsi::new(RsiConfig::close(NonZero::new(3).unwrap()));
///
/// // changes = +2, −1, +2 → avg_gain = 4/3, avg_loss = 1/3 → RSI = 80
/// assert_eq!(
///     rsi.compute_series(&[10.0, 12.0, 11.0, 13.0]).unwrap(),
///     vec![0.0, 0.0, 0.0, 80.0],
/// );
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Rsi {
    config: RsiConfig,
}

impl Indicator for Rsi {
    type Config = RsiConfig;
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

impl Rsi {
    /// Computes the RSI of a single series.
    ///
    /// # Errors
    ///
    /// [`IndicatorError::InsufficientData`](crate::IndicatorError::InsufficientData)
    /// if `values` is non-empty and shorter than the period. Exactly
    /// `length` values is not an error but yields only placeholders.
    pub fn compute_series(&self, values: &[f64]) -> Result<Series> {
        Ok(relative_strength(values, self.config.length)?
            .into_aligned(values.len(), Placeholder::Zero))
    }

    #[inline]
    fn gain_and_loss(prev_price: Price, price: Price) -> (Price, Price) {
        let change = price - prev_price;
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        (gain, loss)
    }

    #[inline]
    #[allow(clippy::float_cmp)]
    fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
        let sum = avg_gain + avg_loss;
        if sum == 0.0 {
            0.0
        } else {
            100.0 * avg_gain / sum
        }
    }
}

impl Display for Rsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RSI({}, {})", self.config.length, self.config.source)
    }
}

pub(crate) fn relative_strength(values: &[f64], length: usize) -> Result<Computed> {
    if values.is_empty() {
        return Ok(Computed::empty());
    }
    ensure_min_len(values.len(), length)?;
    if values.len() == length {
        return Ok(Computed::empty());
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = values
        .windows(2)
        .map(|pair| Rsi::gain_and_loss(pair[0], pair[1]))
        .unzip();

    let avg_gain = wilder_smooth(&gains, length)?;
    let avg_loss = wilder_smooth(&losses, length)?;

    let rsi = avg_gain
        .values
        .iter()
        .zip(&avg_loss.values)
        .map(|(&g, &l)| Rsi::rsi_from_averages(g, l))
        .collect();

    // changes are offset by one bar from the prices
    Ok(Computed::new(avg_gain.begin + 1, rsi))
}

/// Relative Strength Index of `values` over `period`.
///
/// # Errors
///
/// Same as [`Rsi::compute_series`].
pub fn rsi(values: &[f64], period: NonZero<usize>) -> Result<Series> {
    Rsi::new(RsiConfig::close(period)).compute_series(values)
}
