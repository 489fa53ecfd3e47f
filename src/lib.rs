//! Batch trend-overlay indicators for Rust.
//!
//! Indicators run over complete, chronologically ordered price series and
//! return output series of the same length. Leading bars that the lookback
//! window cannot cover hold a placeholder (`0.0` for ATR and the moving
//! averages, `NaN` for SuperTrend).
//!
//! The centrepiece is [`SuperTrend`]: an [`Atr`]-based volatility band that
//! ratchets support and resistance and flips direction when price crosses
//! the active band.
//!
//! Around it sits the usual batch toolbox: moving averages ([`sma`],
//! [`ema`], [`ma`]), oscillators ([`apo`], [`ppo`], [`macd`], [`rsi`],
//! [`stoch`], [`stoch_rsi`], [`adx`]), volatility ([`stddev`], [`bbands`]),
//! volume ([`obv`], [`ad`]) and [`linearreg`]. Second-order lines such as
//! signal lines run over the valid part of their input only (see
//! [`series::derive_from_valid`]).
//!
//! Each indicator type ([`Atr`], [`SuperTrend`], [`Sma`], [`Ema`], [`Rsi`],
//! [`Bb`], [`Stoch`]) exposes [`new`](Atr::new) and
//! [`compute`](Atr::compute) as inherent methods, no trait import needed.
//! Import [`Indicator`] only for generic code. The free functions ([`atr`],
//! [`supertrend`], ...) take plain slices.
//!
//! ```
//! use trend_overlay_ta::{Multiplier, supertrend};
//! use std::num::NonZero;
//!
//! let out = supertrend(
//!     &[10.0; 20],
//!     &[8.0; 20],
//!     &[9.0; 20],
//!     NonZero::new(7).unwrap(),
//!     Multiplier::new(3.0),
//! )
//! .unwrap();
//!
//! assert_eq!(out.len(), 20);
//! assert_eq!(out.trend[7], 3.0);
//! ```

mod adx;
mod atr;
mod bb;
mod ema;
mod error;
mod indicator;
mod linearreg;
mod ma;
mod macd;
mod multiplier;
mod ohlcv;
mod ppo;
mod price_source;
mod rsi;
pub mod series;
mod sma;
mod stddev;
mod stoch;
mod supertrend;
mod volume;

pub use crate::error::{IndicatorError, Result};
pub use crate::indicator::{Indicator, IndicatorConfig, IndicatorConfigBuilder};
pub use crate::ohlcv::{Hlc, Ohlcv, Price, Series};
pub use crate::price_source::{PriceSource, true_range};

pub use crate::ma::{MaKind, ma};
pub use crate::multiplier::Multiplier;

pub use crate::adx::adx;
pub use crate::atr::{Atr, AtrConfig, AtrConfigBuilder, atr, true_range_series};
pub use crate::bb::{Bb, BbConfig, BbConfigBuilder, BbOutput, bbands};
pub use crate::ema::{Ema, EmaConfig, EmaConfigBuilder, ema};
pub use crate::linearreg::linearreg;
pub use crate::macd::{MacdOutput, macd};
pub use crate::ppo::{PpoOutput, apo, ppo, ppo_with_signal};
pub use crate::rsi::{Rsi, RsiConfig, RsiConfigBuilder, rsi};
pub use crate::sma::{Sma, SmaConfig, SmaConfigBuilder, sma};
pub use crate::stddev::stddev;
pub use crate::stoch::{Stoch, StochConfig, StochConfigBuilder, StochOutput, stoch, stoch_rsi};
pub use crate::supertrend::{
    BandState, BasicBands, Direction, SuperTrend, SuperTrendConfig, SuperTrendConfigBuilder,
    SuperTrendOutput, supertrend,
};
pub use crate::volume::{ad, obv};

macro_rules! impl_indicator_methods {
    ($type:ty, $config:ty, $output:ty) => {
        impl $type {
            /// See [`Indicator::new`].
            #[must_use]
            pub fn new(config: $config) -> Self {
                <Self as Indicator>::new(config)
            }

            /// See [`Indicator::compute`].
            ///
            /// # Errors
            ///
            /// See [`Indicator::compute`].
            #[inline]
            pub fn compute(&self, bars: &[impl Ohlcv]) -> Result<$output> {
                <Self as Indicator>::compute(self, bars)
            }
        }
    };
}

impl_indicator_methods!(Atr, AtrConfig, Series);
impl_indicator_methods!(SuperTrend, SuperTrendConfig, SuperTrendOutput);
impl_indicator_methods!(Sma, SmaConfig, Series);
impl_indicator_methods!(Ema, EmaConfig, Series);
impl_indicator_methods!(Rsi, RsiConfig, Series);
impl_indicator_methods!(Bb, BbConfig, BbOutput);
impl_indicator_methods!(Stoch, StochConfig, StochOutput);

#[cfg(test)]
mod test_util;
