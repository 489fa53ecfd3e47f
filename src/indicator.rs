use crate::{Ohlcv, Result};

use std::{
    fmt::{Debug, Display},
    hash::Hash,
    num::NonZero,
};

/// Configuration for a technical [`Indicator`].
///
/// Every indicator has a corresponding config type that holds its parameters
/// (length, multiplier, price source). Configs are value types: cheap to
/// clone, compare, and hash.
pub trait IndicatorConfig: Sized + PartialEq + Eq + Hash + Display + Debug {
    /// Builder type for constructing this config.
    type Builder: IndicatorConfigBuilder<Self>;

    /// Returns a new builder with default values.
    fn builder() -> Self::Builder;

    /// Lookback window length (number of bars).
    fn length(&self) -> usize;
}

/// Builder for an [`IndicatorConfig`].
pub trait IndicatorConfigBuilder<Config>
where
    Config: IndicatorConfig,
{
    /// Sets the lookback window length.
    #[must_use]
    fn length(self, length: NonZero<usize>) -> Self;

    /// Builds the config. Panics if required fields are missing.
    #[must_use]
    fn build(self) -> Config;
}

/// A batch technical indicator.
///
/// Indicators are immutable once built from their config: each call to
/// [`compute`](Indicator::compute) runs over a complete, chronologically
/// ordered bar sequence and returns series aligned to it. No state survives
/// between calls, so one indicator may be shared across threads.
///
/// # Example
///
/// ```
/// use trend_overlay_ta::{Atr, AtrConfig, Indicator};
/// use std::num::NonZero;
/// # use trend_overlay_ta::{Ohlcv, Price};
/// #
/// # struct Bar(f64, f64, f64);
/// # impl Ohlcv for Bar {
/// #     fn open(&self) -> Price { self.2 }
/// #     fn high(&self) -> Price { self.0 }
/// #     fn low(&self) -> Price { self.1 }
/// #     fn close(&self) -> Price { self.2 }
/// # }
///
/// let atr = Atr::new(AtrConfig::new(NonZero::new(2).unwrap()));
/// let bars = [Bar(10.0, 8.0, 9.0), Bar(12.0, 9.0, 11.0), Bar(11.0, 10.0, 10.5)];
///
/// // TR = [2, 3, 1]; seed = (2 + 3) / 2; then (2.5 × 1 + 1) / 2
/// assert_eq!(atr.compute(&bars).unwrap(), vec![0.0, 2.5, 1.75]);
/// ```
pub trait Indicator: Sized + Clone + Display + Debug + Send + Sync {
    /// Configuration type for this indicator.
    type Config: IndicatorConfig;

    /// Computed output type. A [`Series`](crate::Series) for simple
    /// indicators, a struct of series for composite ones.
    type Output: Debug;

    /// Creates a new indicator from the given config.
    fn new(config: Self::Config) -> Self;

    /// The config this indicator was built from.
    fn config(&self) -> &Self::Config;

    /// Computes the indicator over `bars`.
    ///
    /// # Errors
    ///
    /// [`IndicatorError::InsufficientData`](crate::IndicatorError::InsufficientData)
    /// when the bars do not cover the lookback window, or
    /// [`IndicatorError::Upstream`](crate::IndicatorError::Upstream) when
    /// a sub-computation fails.
    fn compute(&self, bars: &[impl Ohlcv]) -> Result<Self::Output>;
}
