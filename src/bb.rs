use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, MaKind, Multiplier, Ohlcv, PriceSource,
    Result, Series,
    series::{Computed, Placeholder},
    stddev::rolling_std_dev,
};

/// Configuration for the Bollinger Bands ([`Bb`]) indicator.
///
/// # Example
///
/// ```
/// use trend_overlay_ta::{BbConfig, IndicatorConfig, IndicatorConfigBuilder, MaKind};
/// use std::num::NonZero;
///
/// // Default: close, SMA middle band, 2.0 std devs either side
/// let config = BbConfig::builder()
///     .length(NonZero::new(20).unwrap())
///     .ma(MaKind::Ema)
///     .build();
///
/// assert_eq!(config.length(), 20);
/// assert_eq!(config.std_dev_up().value(), 2.0);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct BbConfig {
    length: usize,
    source: PriceSource,
    ma: MaKind,
    std_dev_up: Multiplier,
    std_dev_down: Multiplier,
}

impl IndicatorConfig for BbConfig {
    type Builder = BbConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        BbConfigBuilder::new()
    }

    #[inline]
    fn length(&self) -> usize {
        self.length
    }
}

impl BbConfig {
    /// Price source read from each bar.
    #[inline]
    #[must_use]
    pub fn source(&self) -> &PriceSource {
        &self.source
    }

    /// Moving average used for the middle band.
    #[inline]
    #[must_use]
    pub fn ma(&self) -> MaKind {
        self.ma
    }

    /// Standard deviations between the middle and upper band.
    #[inline]
    #[must_use]
    pub fn std_dev_up(&self) -> Multiplier {
        self.std_dev_up
    }

    /// Standard deviations between the middle and lower band.
    #[inline]
    #[must_use]
    pub fn std_dev_down(&self) -> Multiplier {
        self.std_dev_down
    }

    /// BB(20, Close, 2σ), the standard Bollinger Bands setting.
    #[allow(clippy::missing_panics_doc)]
    #[must_use]
    pub fn default_20() -> Self {
        Self::builder().length(NonZero::new(20).unwrap()).build()
    }

    /// BB with custom length, close price, 2σ.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }
}

impl Display for BbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BbConfig({}, {}, {}, {}, {})",
            self.length,
            self.source,
            self.ma,
            self.std_dev_up.value(),
            self.std_dev_down.value()
        )
    }
}

/// Builder for [`BbConfig`].
///
/// Defaults: source = [`PriceSource::Close`], middle band =
/// [`MaKind::Sma`], `std_dev` = `2.0` on both sides.
/// Length must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct BbConfigBuilder {
    length: Option<usize>,
    source: PriceSource,
    ma: MaKind,
    std_dev_up: Multiplier,
    std_dev_down: Multiplier,
}

impl BbConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::Close,
            ma: MaKind::Sma,
            std_dev_up: Multiplier::new(2.0),
            std_dev_down: Multiplier::new(2.0),
        }
    }

    /// Sets the price source.
    #[inline]
    #[must_use]
    pub fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    #[inline]
    #[must_use]
    pub fn ma(mut self, ma: MaKind) -> Self {
        self.ma = ma;
        self
    }

    /// Sets both band multipliers.
    #[inline]
    #[must_use]
    pub fn std_dev(mut self, std_dev: Multiplier) -> Self {
        self.std_dev_up = std_dev;
        self.std_dev_down = std_dev;
        self
    }

    #[inline]
    #[must_use]
    pub fn std_dev_up(mut self, std_dev: Multiplier) -> Self {
        self.std_dev_up = std_dev;
        self
    }

    #[inline]
    #[must_use]
    pub fn std_dev_down(mut self, std_dev: Multiplier) -> Self {
        self.std_dev_down = std_dev;
        self
    }
}

impl IndicatorConfigBuilder<BbConfig> for BbConfigBuilder {
    #[inline]
    fn length(mut self, length: NonZero<usize>) -> Self {
        self.length.replace(length.get());
        self
    }

    #[inline]
    fn build(self) -> BbConfig {
        BbConfig {
            length: self.length.expect("length is required"),
            source: self.source,
            ma: self.ma,
            std_dev_up: self.std_dev_up,
            std_dev_down: self.std_dev_down,
        }
    }
}

/// Bollinger Bands output: upper, middle, and lower bands.
///
/// ```text
/// upper  = MA + k_up × σ
/// middle = MA
/// lower  = MA − k_down × σ
/// ```
///
/// All three hold `0.0` during warm-up.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BbOutput {
    pub upper: Series,
    pub middle: Series,
    pub lower: Series,
}

impl BbOutput {
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.middle.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.middle.is_empty()
    }

    /// Band width, `upper − lower`, per bar.
    ///
    /// Narrow width indicates consolidation (Bollinger squeeze); wide width
    /// indicates high volatility.
    #[must_use]
    pub fn width(&self) -> Series {
        self.upper
            .iter()
            .zip(&self.lower)
            .map(|(u, l)| u - l)
            .collect()
    }
}

/// Bollinger Bands (BB).
///
/// A volatility indicator consisting of three bands: a moving average
/// (middle) with upper and lower bands offset by a configurable number of
/// standard deviations. `σ` is the population standard deviation of the
/// window, whichever average the middle band uses.
///
/// Uses a running sum and sum of squares, so each bar costs O(1). The
/// first `length − 1` outputs are `0.0`.
///
/// # Example
///
/// ```
/// use trend_overlay_ta::{Bb, BbConfig};
/// use std::num::NonZero;
///
/// let bb = Bb::new(BbConfig::close(NonZero::new(2).unwrap()));
/// let out = bb.compute_series(&[3.0, 5.0, 7.0]).unwrap();
///
/// // window [5, 7]: mean 6, σ 1
/// assert_eq!(out.upper[2], 8.0);
/// assert_eq!(out.middle[2], 6.0);
/// assert_eq!(out.lower[2], 4.0);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Bb {
    config: BbConfig,
}

impl Indicator for Bb {
    type Config = BbConfig;
    type Output = BbOutput;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn compute(&self, bars: &[impl Ohlcv]) -> Result<BbOutput> {
        self.compute_series(&self.config.source.series(bars))
    }
}

impl Bb {
    /// Computes the bands of a single series.
    ///
    /// # Errors
    ///
    /// [`IndicatorError::InsufficientData`](crate::IndicatorError::InsufficientData)
    /// if `values` is non-empty and shorter than the window.
    pub fn compute_series(&self, values: &[f64]) -> Result<BbOutput> {
        let length = self.config.length;
        let middle = self.config.ma.smooth(values, length)?;
        let sigma = rolling_std_dev(values, length)?;
        debug_assert_eq!(middle.begin, sigma.begin);

        let up = self.config.std_dev_up.value();
        let down = self.config.std_dev_down.value();
        let (upper, lower) = middle
            .values
            .iter()
            .zip(&sigma.values)
            .map(|(&m, &s)| (s.mul_add(up, m), s.mul_add(-down, m)))
            .unzip();

        let len = values.len();
        let begin = middle.begin;
        Ok(BbOutput {
            upper: Computed::new(begin, upper).into_aligned(len, Placeholder::Zero),
            middle: middle.into_aligned(len, Placeholder::Zero),
            lower: Computed::new(begin, lower).into_aligned(len, Placeholder::Zero),
        })
    }
}

impl Display for Bb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BB({}, {}, {})",
            self.config.length,
            self.config.source,
            self.config.std_dev_up.value(),
        )
    }
}

/// Bollinger Bands of `values`.
///
/// # Errors
///
/// Same as [`Bb::compute_series`].
pub fn bbands(
    values: &[f64],
    period: NonZero<usize>,
    std_dev_up: Multiplier,
    std_dev_down: Multiplier,
    ma: MaKind,
) -> Result<BbOutput> {
    let config = BbConfig::builder()
        .length(period)
        .std_dev_up(std_dev_up)
        .std_dev_down(std_dev_down)
        .ma(ma)
        .build();
    Bb::new(config).compute_series(values)
}
