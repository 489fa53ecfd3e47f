use crate::{Ohlcv, Price};

use std::fmt::{Debug, Display};

/// Price source extracted from an [`Ohlcv`] bar before feeding a
/// single-series indicator ([`Sma`](crate::Sma), [`Ema`](crate::Ema)).
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug)]
pub enum PriceSource {
    /// Opening price.
    Open,
    /// Highest price.
    High,
    /// Closing price.
    #[default]
    Close,
    /// Lowest price.
    Low,
    /// Median price: `(high + low) / 2`.
    HL2,
    /// Typical price: `(high + low + close) / 3`.
    HLC3,
    /// Average price: `(open + high + low + close) / 4`.
    OHLC4,
    /// Weighted close: `(high + low + close + close) / 4`.
    HLCC4,
    /// True range: `max(high - low, |high - prev_close|, |low - prev_close|)`.
    ///
    /// On the first bar (no previous close), falls back to `high - low`.
    TrueRange,
}

impl Display for PriceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl PriceSource {
    #[inline]
    pub(crate) fn extract(self, ohlcv: &impl Ohlcv, prev_close: Option<Price>) -> Price {
        match self {
            Self::Open => ohlcv.open(),
            Self::High => ohlcv.high(),
            Self::Close => ohlcv.close(),
            Self::Low => ohlcv.low(),
            Self::HL2 => f64::midpoint(ohlcv.high(), ohlcv.low()),
            Self::HLC3 => (ohlcv.high() + ohlcv.low() + ohlcv.close()) / 3.0,
            Self::OHLC4 => (ohlcv.open() + ohlcv.high() + ohlcv.low() + ohlcv.close()) / 4.0,
            Self::HLCC4 => (ohlcv.high() + ohlcv.low() + ohlcv.close() + ohlcv.close()) / 4.0,
            Self::TrueRange => true_range(ohlcv.high(), ohlcv.low(), prev_close),
        }
    }

    /// Extracts this source from every bar, in order.
    pub(crate) fn series(self, bars: &[impl Ohlcv]) -> Vec<Price> {
        let mut prev_close = None;

        bars.iter()
            .map(|bar| {
                let price = self.extract(bar, prev_close);
                prev_close = Some(bar.close());
                price
            })
            .collect()
    }
}

/// True range of one bar against the previous close.
///
/// Without a previous close (first bar) this is `high - low`.
#[inline]
#[must_use]
pub fn true_range(high: Price, low: Price, prev_close: Option<Price>) -> Price {
    let hl = high - low;

    match prev_close {
        Some(prev_close) => {
            let hc = (high - prev_close).abs();
            let lc = (low - prev_close).abs();
            max_propagating(max_propagating(hl, hc), lc)
        }
        None => hl,
    }
}

// `f64::max` drops a NaN operand; NaN in the input must reach the output.
#[inline]
fn max_propagating(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}
