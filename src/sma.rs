use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, PriceSource, Result, Series,
    series::{Computed, Placeholder, ensure_min_len},
};

/// Configuration for the Simple Moving Average ([`Sma`]) indicator.
///
/// # Example
///
/// ```rust
/// use trend_overlay_ta::{IndicatorConfig, SmaConfig};
/// use std::num::NonZero;
///
/// let config = SmaConfig::close(NonZero::new(20).unwrap());
/// assert_eq!(config.length(), 20);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct SmaConfig {
    length: usize,
    source: PriceSource,
}

impl IndicatorConfig for SmaConfig {
    type Builder = SmaConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        SmaConfigBuilder::new()
    }

    #[inline]
    fn length(&self) -> usize {
        self.length
    }
}

impl SmaConfig {
    /// Price source read from each bar.
    #[inline]
    #[must_use]
    pub fn source(&self) -> &PriceSource {
        &self.source
    }

    /// SMA on closing price.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }

    /// SMA on median price: `(high + low) / 2`.
    #[must_use]
    pub fn hl2(length: NonZero<usize>) -> Self {
        Self::builder()
            .length(length)
            .source(PriceSource::HL2)
            .build()
    }
}

impl Display for SmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SmaConfig({}, {})", self.length, self.source)
    }
}

/// Builder for [`SmaConfig`].
///
/// Defaults: source = [`PriceSource::Close`].
/// Length must be set before calling [`build`](IndicatorConfigBuilder::build).
pub struct SmaConfigBuilder {
    length: Option<usize>,
    source: PriceSource,
}

impl SmaConfigBuilder {
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

impl IndicatorConfigBuilder<SmaConfig> for SmaConfigBuilder {
    #[inline]
    fn length(mut self, length: NonZero<usize>) -> Self {
        self.length.replace(length.get());
        self
    }

    #[inline]
    fn build(self) -> SmaConfig {
        SmaConfig {
            length: self.length.expect("length is required"),
            source: self.source,
        }
    }
}

/// Simple Moving Average (SMA).
///
/// The unweighted mean of the last *n* values. The first `n − 1` outputs are
/// `0.0`. Uses a running sum, so each bar costs O(1).
///
/// # Example
///
/// ```rust
/// use trend_overlay_ta::{Sma, SmaConfig};
/// use std::num::NonZero;
///
/// let sma = Sma::new(SmaConfig::close(NonZero::new(3).unwrap()));
///
/// assert_eq!(
///     sma.compute_series(&[10.0, 20.0, 30.0, 40.0]).unwrap(),
///     vec![0.0, 0.0, 20.0, 30.0],
/// );
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Sma {
    config: SmaConfig,
}

impl Indicator for Sma {
    type Config = SmaConfig;
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

impl Sma {
    /// Computes the SMA of a single series.
    ///
    /// # Errors
    ///
    /// [`IndicatorError::InsufficientData`](crate::IndicatorError::InsufficientData)
    /// if `values` is non-empty and shorter than the window.
    pub fn compute_series(&self, values: &[f64]) -> Result<Series> {
        Ok(rolling_mean(values, self.config.length)?.into_aligned(values.len(), Placeholder::Zero))
    }
}

impl Display for Sma {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SMA({}, {})", self.config.length, self.config.source)
    }
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn rolling_mean(values: &[f64], length: usize) -> Result<Computed> {
    if values.is_empty() {
        return Ok(Computed::empty());
    }
    ensure_min_len(values.len(), length)?;

    let reciprocal = 1.0 / length as f64;
    let mut sum: f64 = values[..length].iter().sum();

    let mut out = Vec::with_capacity(values.len() - length + 1);
    out.push(sum * reciprocal);

    for (new, old) in values[length..].iter().zip(values) {
        sum += new - old;
        out.push(sum * reciprocal);
    }

    Ok(Computed::new(length - 1, out))
}

/// Simple moving average of `values` over `period`.
///
/// # Errors
///
/// Same as [`Sma::compute_series`].
pub fn sma(values: &[f64], period: NonZero<usize>) -> Result<Series> {
    Sma::new(SmaConfig::close(period)).compute_series(values)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::{
        IndicatorError,
        test_util::{Bar, assert_approx, nz},
    };

    fn sma(length: usize) -> Sma {
        Sma::new(SmaConfig::close(nz(length)))
    }

    mod filling {
        use super::*;

        #[test]
        fn zero_until_window_full() {
            let out = sma(3).compute_series(&[10.0, 20.0, 30.0]).unwrap();
            assert_eq!(out, vec![0.0, 0.0, 20.0]);
        }

        #[test]
        fn window_size_one_is_identity() {
            let out = sma(1).compute_series(&[10.0, 20.0, 5.0]).unwrap();
            assert_eq!(out, vec![10.0, 20.0, 5.0]);
        }
    }

    mod sliding {
        use super::*;

        #[test]
        fn drops_oldest_on_advance() {
            let out = sma(2).compute_series(&[10.0, 20.0, 30.0, 40.0, 50.0]).unwrap();
            assert_eq!(out, vec![0.0, 15.0, 25.0, 35.0, 45.0]);
        }

        #[test]
        fn non_integer_mean() {
            let out = sma(3).compute_series(&[15.0, 20.0, 30.0]).unwrap();
            assert_approx!(out[2], 65.0 / 3.0);
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn empty_is_empty() {
            assert!(sma(5).compute_series(&[]).unwrap().is_empty());
        }

        #[test]
        fn shorter_than_window() {
            assert_eq!(
                sma(5).compute_series(&[1.0, 2.0]),
                Err(IndicatorError::InsufficientData {
                    required: 5,
                    actual: 2
                })
            );
        }
    }

    mod price_source {
        use super::*;

        #[test]
        fn uses_configured_source() {
            let sma = Sma::new(SmaConfig::hl2(nz(2)));
            // HL2: 15, 25
            let bars = [
                Bar::new(0.0, 20.0, 10.0, 0.0),
                Bar::new(0.0, 30.0, 20.0, 0.0),
            ];
            assert_eq!(sma.compute(&bars).unwrap(), vec![0.0, 20.0]);
        }
    }

    mod display {
        use super::*;

        #[test]
        fn formats_correctly() {
            assert_eq!(sma(20).to_string(), "SMA(20, Close)");
            assert_eq!(SmaConfig::close(nz(20)).to_string(), "SmaConfig(20, Close)");
        }
    }
}
