use std::{fmt::Display, num::NonZero};

use crate::{
    Atr, AtrConfig, Hlc, Indicator, IndicatorConfig, IndicatorConfigBuilder, Multiplier, Ohlcv,
    Price, Result, Series,
    series::{Placeholder, ensure_same_len},
};

/// Configuration for the [`SuperTrend`] overlay.
///
/// # Example
///
/// ```
/// use trend_overlay_ta::{IndicatorConfig, IndicatorConfigBuilder, Multiplier, SuperTrendConfig};
/// use std::num::NonZero;
///
/// let config = SuperTrendConfig::builder()
///     .length(NonZero::new(7).unwrap())
///     .multiplier(Multiplier::new(3.0))
///     .build();
///
/// assert_eq!(config.length(), 7);
/// assert_eq!(config.multiplier().value(), 3.0);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct SuperTrendConfig {
    atr: AtrConfig,
    multiplier: Multiplier,
}

impl IndicatorConfig for SuperTrendConfig {
    type Builder = SuperTrendConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        SuperTrendConfigBuilder::new()
    }

    #[inline]
    fn length(&self) -> usize {
        self.atr.length()
    }
}

impl SuperTrendConfig {
    /// SuperTrend with ATR over `length` bars and the given band multiplier.
    #[must_use]
    pub fn new(length: NonZero<usize>, multiplier: Multiplier) -> Self {
        Self::builder()
            .length(length)
            .multiplier(multiplier)
            .build()
    }

    /// SuperTrend(10, 3), the common charting default.
    #[allow(clippy::missing_panics_doc)]
    #[must_use]
    pub fn default_10_3() -> Self {
        Self::builder().length(NonZero::new(10).unwrap()).build()
    }

    /// Config of the underlying ATR.
    #[inline]
    #[must_use]
    pub fn atr(&self) -> AtrConfig {
        self.atr
    }

    /// ATR multiplier applied to the basic bands.
    #[inline]
    #[must_use]
    pub fn multiplier(&self) -> Multiplier {
        self.multiplier
    }
}

impl Display for SuperTrendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SuperTrendConfig({}, {})",
            self.length(),
            self.multiplier.value()
        )
    }
}

/// Builder for [`SuperTrendConfig`].
///
/// Defaults: multiplier = `3.0`.
/// Length must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct SuperTrendConfigBuilder {
    length: Option<NonZero<usize>>,
    multiplier: Multiplier,
}

impl SuperTrendConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            multiplier: Multiplier::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn multiplier(mut self, multiplier: Multiplier) -> Self {
        self.multiplier = multiplier;
        self
    }
}

impl IndicatorConfigBuilder<SuperTrendConfig> for SuperTrendConfigBuilder {
    #[inline]
    fn length(mut self, length: NonZero<usize>) -> Self {
        self.length.replace(length);
        self
    }

    #[inline]
    fn build(self) -> SuperTrendConfig {
        SuperTrendConfig {
            atr: AtrConfig::new(self.length.expect("length is required")),
            multiplier: self.multiplier,
        }
    }
}

/// Trend direction of the overlay.
///
/// Encoded as `-1.0`, `0.0` or `1.0` in [`SuperTrendOutput::direction`].
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug)]
pub enum Direction {
    /// Bearish: price is below the resistance band.
    Down,
    /// No trend yet (warm-up).
    #[default]
    Undefined,
    /// Bullish: price is above the support band.
    Up,
}

impl Direction {
    #[inline]
    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Down => -1.0,
            Self::Undefined => 0.0,
            Self::Up => 1.0,
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Unconstrained bands of one bar: `hl2 ± multiplier × atr`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BasicBands {
    pub upper: Price,
    pub lower: Price,
}

impl BasicBands {
    #[inline]
    #[must_use]
    pub fn new(high: Price, low: Price, atr: f64, multiplier: Multiplier) -> Self {
        let mid = f64::midpoint(high, low);
        let offset = multiplier.value() * atr;
        Self {
            upper: mid + offset,
            lower: mid - offset,
        }
    }
}

/// Overlay state carried from one bar to the next.
///
/// `upper` / `lower` are the final (ratcheted) bands. The band opposite the
/// current direction is always `None`, so after a flip the newly active band
/// is re-seeded from that bar's basic band.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BandState {
    pub upper: Option<Price>,
    pub lower: Option<Price>,
    pub direction: Direction,
}

impl BandState {
    /// Advances the overlay by one active bar.
    ///
    /// The lower band only rises and the upper band only falls while they
    /// stay defined. Direction flips when `close` breaks the band on the
    /// opposite side; the first active bar is always [`Direction::Up`].
    #[must_use]
    pub fn advance(self, basic: BasicBands, close: Price) -> Self {
        let lower = self.lower.map_or(basic.lower, |prev| basic.lower.max(prev));
        let upper = self.upper.map_or(basic.upper, |prev| basic.upper.min(prev));

        let direction = match self.direction {
            Direction::Up if close < lower => Direction::Down,
            Direction::Down if close > upper => Direction::Up,
            Direction::Down => Direction::Down,
            Direction::Up | Direction::Undefined => Direction::Up,
        };

        if direction == Direction::Up {
            Self {
                upper: None,
                lower: Some(lower),
                direction,
            }
        } else {
            Self {
                upper: Some(upper),
                lower: None,
                direction,
            }
        }
    }

    /// The band the trend line follows: lower when up, upper when down.
    #[inline]
    #[must_use]
    pub fn trend(&self) -> Option<Price> {
        match self.direction {
            Direction::Up => self.lower,
            Direction::Down => self.upper,
            Direction::Undefined => None,
        }
    }
}

/// SuperTrend series, all aligned to the input bars.
///
/// Warm-up bars (and bars whose ATR is NaN) hold `NaN` in `trend`,
/// `support` and `resistance`, and `0.0` in `direction`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SuperTrendOutput {
    /// Active band: `support` when up, `resistance` when down.
    pub trend: Series,
    /// `1.0` up, `-1.0` down, `0.0` undefined.
    pub direction: Series,
    /// Final lower band while the trend is up, otherwise `NaN`.
    pub support: Series,
    /// Final upper band while the trend is down, otherwise `NaN`.
    pub resistance: Series,
}

impl SuperTrendOutput {
    fn placeholder(len: usize) -> Self {
        let nan = vec![Placeholder::Nan.value(); len];
        Self {
            trend: nan.clone(),
            direction: vec![Direction::Undefined.as_f64(); len],
            support: nan.clone(),
            resistance: nan,
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.trend.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trend.is_empty()
    }
}

/// SuperTrend trend overlay.
///
/// Builds basic bands `hl2 ± multiplier × ATR`, ratchets them into final
/// bands (support never falls, resistance never rises) and flips direction
/// when the close crosses the active band. On each flip the previously
/// inactive band restarts from the current basic band.
///
/// Output starts at bar `length` (one bar after ATR's first value).
///
/// # Example
///
/// ```
/// use trend_overlay_ta::{Multiplier, SuperTrend, SuperTrendConfig};
/// use std::num::NonZero;
///
/// let st = SuperTrend::new(SuperTrendConfig::new(
///     NonZero::new(7).unwrap(),
///     Multiplier::new(3.0),
/// ));
/// let out = st.compute_hlc(&[10.0; 20], &[8.0; 20], &[9.0; 20]).unwrap();
///
/// assert!(out.trend[6].is_nan());
/// assert_eq!(out.direction[7], 1.0);
/// // hl2 − 3 × ATR = 9 − 3 × 2
/// assert_eq!(out.trend[19], 3.0);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct SuperTrend {
    config: SuperTrendConfig,
}

impl Indicator for SuperTrend {
    type Config = SuperTrendConfig;
    type Output = SuperTrendOutput;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn compute(&self, bars: &[impl Ohlcv]) -> Result<SuperTrendOutput> {
        let hlc = Hlc::from_bars(bars);
        self.compute_hlc(&hlc.high, &hlc.low, &hlc.close)
    }
}

impl SuperTrend {
    /// Computes SuperTrend from separate high, low and close columns.
    ///
    /// # Errors
    ///
    /// - [`IndicatorError::LengthMismatch`](crate::IndicatorError::LengthMismatch)
    ///   if the columns differ in length.
    /// - [`IndicatorError::Upstream`](crate::IndicatorError::Upstream) wrapping
    ///   the ATR error when there are fewer bars than the period.
    ///
    /// Empty input yields empty series.
    pub fn compute_hlc(
        &self,
        high: &[Price],
        low: &[Price],
        close: &[Price],
    ) -> Result<SuperTrendOutput> {
        let len = ensure_same_len(&[high, low, close])?;
        if len == 0 {
            return Ok(SuperTrendOutput::default());
        }

        let atr = Atr::new(self.config.atr)
            .compute_hlc(high, low, close)
            .map_err(|e| e.upstream("ATR"))?;

        let length = self.config.length();
        let multiplier = self.config.multiplier;
        let mut out = SuperTrendOutput::placeholder(len);
        let mut state = BandState::default();

        for i in 0..len {
            if i < length || atr[i].is_nan() {
                state = BandState::default();
                continue;
            }

            let basic = BasicBands::new(high[i], low[i], atr[i], multiplier);
            let next = state.advance(basic, close[i]);

            if state.direction != Direction::Undefined && next.direction != state.direction {
                tracing::trace!(
                    bar = i,
                    from = %state.direction,
                    to = %next.direction,
                    close = close[i],
                    band = ?next.trend(),
                    "supertrend direction flip"
                );
            }

            out.direction[i] = next.direction.as_f64();
            if let Some(trend) = next.trend() {
                out.trend[i] = trend;
            }
            if let Some(lower) = next.lower {
                out.support[i] = lower;
            }
            if let Some(upper) = next.upper {
                out.resistance[i] = upper;
            }

            state = next;
        }

        Ok(out)
    }
}

impl Display for SuperTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SuperTrend({}, {})",
            self.config.length(),
            self.config.multiplier.value()
        )
    }
}

/// SuperTrend over high, low and close columns.
///
/// See [`SuperTrend`] for the algorithm.
///
/// # Errors
///
/// Same as [`SuperTrend::compute_hlc`].
pub fn supertrend(
    high: &[Price],
    low: &[Price],
    close: &[Price],
    period: NonZero<usize>,
    multiplier: Multiplier,
) -> Result<SuperTrendOutput> {
    SuperTrend::new(SuperTrendConfig::new(period, multiplier)).compute_hlc(high, low, close)
}
