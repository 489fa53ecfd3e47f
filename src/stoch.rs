use std::{fmt::Display, num::NonZero};

use crate::{
    Hlc, Indicator, IndicatorConfig, IndicatorConfigBuilder, MaKind, Ohlcv, Price, Result, Series,
    rsi::rsi,
    series::{Computed, Placeholder, derive_from_valid, ensure_min_len, ensure_same_len},
};

/// Configuration for the slow [`Stoch`]astic oscillator.
///
/// `length` is the %K lookback; `slow_k` and `slow_d` are the two
/// smoothing passes on top of it.
///
/// # Example
///
/// ```
/// use trend_overlay_ta::{IndicatorConfig, IndicatorConfigBuilder, MaKind, StochConfig};
/// use std::num::NonZero;
///
/// let config = StochConfig::builder()
///     .length(NonZero::new(14).unwrap())
///     .slow_d(NonZero::new(5).unwrap())
///     .d_ma(MaKind::Ema)
///     .build();
///
/// assert_eq!(config.length(), 14);
/// assert_eq!(config.slow_k(), 3);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct StochConfig {
    fast_k: usize,
    slow_k: usize,
    slow_d: usize,
    k_ma: MaKind,
    d_ma: MaKind,
}

impl IndicatorConfig for StochConfig {
    type Builder = StochConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        StochConfigBuilder::new()
    }

    #[inline]
    fn length(&self) -> usize {
        self.fast_k
    }
}

impl StochConfig {
    #[inline]
    #[must_use]
    pub fn slow_k(&self) -> usize {
        self.slow_k
    }

    #[inline]
    #[must_use]
    pub fn slow_d(&self) -> usize {
        self.slow_d
    }

    /// Average smoothing raw %K into slow %K.
    #[inline]
    #[must_use]
    pub fn k_ma(&self) -> MaKind {
        self.k_ma
    }

    /// Average smoothing slow %K into %D.
    #[inline]
    #[must_use]
    pub fn d_ma(&self) -> MaKind {
        self.d_ma
    }

    /// Stoch(14, 3, 3) with SMA smoothing.
    #[allow(clippy::missing_panics_doc)]
    #[must_use]
    pub fn default_14_3_3() -> Self {
        Self::builder().length(NonZero::new(14).unwrap()).build()
    }

    /// Bars before the first %K and %D value.
    #[inline]
    #[must_use]
    pub fn lookback(&self) -> usize {
        self.fast_k + self.slow_k + self.slow_d - 3
    }
}

impl Display for StochConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "StochConfig({}, {}, {}, {}, {})",
            self.fast_k, self.slow_k, self.slow_d, self.k_ma, self.d_ma
        )
    }
}

/// Builder for [`StochConfig`].
///
/// Defaults: `slow_k` = `3`, `slow_d` = `3`, both smoothed with
/// [`MaKind::Sma`].
/// Length must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct StochConfigBuilder {
    fast_k: Option<usize>,
    slow_k: usize,
    slow_d: usize,
    k_ma: MaKind,
    d_ma: MaKind,
}

impl StochConfigBuilder {
    fn new() -> Self {
        Self {
            fast_k: None,
            slow_k: 3,
            slow_d: 3,
            k_ma: MaKind::Sma,
            d_ma: MaKind::Sma,
        }
    }

    #[inline]
    #[must_use]
    pub fn slow_k(mut self, slow_k: NonZero<usize>) -> Self {
        self.slow_k = slow_k.get();
        self
    }

    #[inline]
    #[must_use]
    pub fn slow_d(mut self, slow_d: NonZero<usize>) -> Self {
        self.slow_d = slow_d.get();
        self
    }

    #[inline]
    #[must_use]
    pub fn k_ma(mut self, k_ma: MaKind) -> Self {
        self.k_ma = k_ma;
        self
    }

    #[inline]
    #[must_use]
    pub fn d_ma(mut self, d_ma: MaKind) -> Self {
        self.d_ma = d_ma;
        self
    }
}

impl IndicatorConfigBuilder<StochConfig> for StochConfigBuilder {
    #[inline]
    fn length(mut self, length: NonZero<usize>) -> Self {
        self.fast_k.replace(length.get());
        self
    }

    #[inline]
    fn build(self) -> StochConfig {
        StochConfig {
            fast_k: self.fast_k.expect("length is required"),
            slow_k: self.slow_k,
            slow_d: self.slow_d,
            k_ma: self.k_ma,
            d_ma: self.d_ma,
        }
    }
}

/// %K and %D lines of a stochastic oscillator, on a 0–100 scale.
///
/// Both start at the first bar with a defined %D and hold `0.0` before.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StochOutput {
    pub k: Series,
    pub d: Series,
}

impl StochOutput {
    fn placeholder(len: usize) -> Self {
        Self {
            k: vec![Placeholder::Zero.value(); len],
            d: vec![Placeholder::Zero.value(); len],
        }
    }

    /// Aligns `k` and `d`, dropping the %K values before %D starts.
    fn from_stages(k: Computed, d: Computed, len: usize) -> Self {
        let skip = d.begin - k.begin;
        let k_values = k.values[skip..].to_vec();
        Self {
            k: Computed::new(d.begin, k_values).into_aligned(len, Placeholder::Zero),
            d: d.into_aligned(len, Placeholder::Zero),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.k.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.k.is_empty()
    }
}

/// Slow stochastic oscillator.
///
/// ```text
/// raw %K = 100 × (close − lowest low) / (highest high − lowest low)
/// %K     = MA(raw %K, slow_k)
/// %D     = MA(%K, slow_d)
/// ```
///
/// Highest high and lowest low span the last `length` bars. A window with
/// no range reads `0.0`. Outputs start at
/// [`StochConfig::lookback`]; when the input reaches the raw %K window
/// but not that bar, both lines are all `0.0`.
///
/// # Example
///
/// ```
/// use trend_overlay_ta::{IndicatorConfig, IndicatorConfigBuilder, Stoch, StochConfig};
/// use std::num::NonZero;
///
/// let one = NonZero::new(1).unwrap();
/// let stoch = Stoch::new(
///     StochConfig::builder()
///         .length(NonZero::new(3).unwrap())
///         .slow_k(one)
///         .slow_d(one)
///         .build(),
/// );
///
/// let out = stoch
///     .compute_hlc(&[3.0, 4.0, 5.0, 6.0], &[1.0, 2.0, 3.0, 4.0], &[2.0, 4.0, 3.0, 6.0])
///     .unwrap();
/// assert_eq!(out.k, vec![0.0, 0.0, 50.0, 100.0]);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Stoch {
    config: StochConfig,
}

impl Indicator for Stoch {
    type Config = StochConfig;
    type Output = StochOutput;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn compute(&self, bars: &[impl Ohlcv]) -> Result<StochOutput> {
        let hlc = Hlc::from_bars(bars);
        self.compute_hlc(&hlc.high, &hlc.low, &hlc.close)
    }
}

impl Stoch {
    /// Computes %K and %D from separate high, low and close columns.
    ///
    /// # Errors
    ///
    /// - [`IndicatorError::LengthMismatch`](crate::IndicatorError::LengthMismatch)
    ///   if the columns differ in length.
    /// - [`IndicatorError::InsufficientData`](crate::IndicatorError::InsufficientData)
    ///   if there are fewer bars than the %K window. Empty input is not an
    ///   error.
    pub fn compute_hlc(&self, high: &[Price], low: &[Price], close: &[Price]) -> Result<StochOutput> {
        let len = ensure_same_len(&[high, low, close])?;
        if len == 0 {
            return Ok(StochOutput::default());
        }
        ensure_min_len(len, self.config.fast_k)?;

        let raw = raw_k(high, low, close, self.config.fast_k);
        let Some(k) = smooth_stage(&raw, self.config.slow_k, self.config.k_ma)? else {
            return Ok(StochOutput::placeholder(len));
        };
        let Some(d) = smooth_stage(&k, self.config.slow_d, self.config.d_ma)? else {
            return Ok(StochOutput::placeholder(len));
        };

        Ok(StochOutput::from_stages(k, d, len))
    }
}

impl Display for Stoch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "STOCH({}, {}, {})",
            self.config.fast_k, self.config.slow_k, self.config.slow_d
        )
    }
}

/// Raw %K over windows of `length` bars, from the first full window.
fn raw_k(high: &[Price], low: &[Price], close: &[Price], length: usize) -> Computed {
    let values = high
        .windows(length)
        .zip(low.windows(length))
        .zip(&close[length - 1..])
        .map(|((highs, lows), &close)| {
            let highest = highs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let lowest = lows.iter().copied().fold(f64::INFINITY, f64::min);
            let range = highest - lowest;
            if range > 0.0 {
                100.0 * (close - lowest) / range
            } else {
                0.0
            }
        })
        .collect();

    Computed::new(length - 1, values)
}

/// Smooths a block in place, or `None` when it is shorter than `length`.
fn smooth_stage(input: &Computed, length: usize, kind: MaKind) -> Result<Option<Computed>> {
    if input.valid_count() < length {
        return Ok(None);
    }
    Ok(Some(kind.smooth(&input.values, length)?.shifted(input.begin)))
}

/// Fast stochastic of a single series, which serves as its own high, low
/// and close. Too short an input yields all-zero lines.
fn fast_stochastic(
    values: &[f64],
    fast_k: usize,
    fast_d: usize,
    kind: MaKind,
) -> Result<StochOutput> {
    let len = values.len();
    if len < fast_k {
        return Ok(StochOutput::placeholder(len));
    }

    let k = raw_k(values, values, values, fast_k);
    let Some(d) = smooth_stage(&k, fast_d, kind)? else {
        return Ok(StochOutput::placeholder(len));
    };

    Ok(StochOutput::from_stages(k, d, len))
}

/// Slow stochastic over high, low and close columns.
///
/// # Errors
///
/// Same as [`Stoch::compute_hlc`].
pub fn stoch(
    high: &[Price],
    low: &[Price],
    close: &[Price],
    config: StochConfig,
) -> Result<StochOutput> {
    Stoch::new(config).compute_hlc(high, low, close)
}

/// Stochastic RSI: the fast stochastic of the RSI line.
///
/// The stochastic runs only over the RSI's valid part, so its lookback
/// windows never see the RSI warm-up zeros. %K is the raw stochastic over
/// `fast_k` RSI values; %D smooths it over `fast_d` with `kind`. Both
/// start at `rsi_period + fast_k + fast_d − 2`.
///
/// A run of RSI readings of exactly `0.0` at the start of the valid part
/// reads as warm-up and delays the stochastic.
///
/// # Errors
///
/// Same as [`rsi`](crate::rsi). A valid RSI part shorter than the
/// stochastic windows is not an error and yields all-zero lines.
pub fn stoch_rsi(
    values: &[f64],
    rsi_period: NonZero<usize>,
    fast_k: NonZero<usize>,
    fast_d: NonZero<usize>,
    kind: MaKind,
) -> Result<StochOutput> {
    let rsi = rsi(values, rsi_period)?;

    let mut d_tail = Vec::new();
    let k = derive_from_valid(&rsi, Placeholder::Zero, "StochRSI stochastic", |valid| {
        let out = fast_stochastic(valid, fast_k.get(), fast_d.get(), kind)?;
        d_tail = out.d;
        Ok(out.k)
    })?;

    let mut d = vec![Placeholder::Zero.value(); k.len() - d_tail.len()];
    d.extend(d_tail);

    Ok(StochOutput { k, d })
}
