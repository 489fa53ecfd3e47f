/// A price value.
///
/// Semantic alias for [`f64`]. Documents intent in function signatures
/// without introducing newtype construction overhead.
pub type Price = f64;

/// An indicator output series.
///
/// Always the same length as the input it was computed from. Entries before
/// the first computable bar hold the indicator's placeholder value.
pub type Series = Vec<f64>;

/// OHLCV bar data used as input to the bar-based indicator API.
///
/// Implement this on your own kline/candle type to feed a slice of bars to
/// [`Indicator::compute`](crate::Indicator::compute) without building
/// separate price columns by hand. Bars are read in slice order, which must be
/// chronological.
///
/// # Example
///
/// ```
/// use trend_overlay_ta::{Ohlcv, Price};
///
/// struct MyKline {
///     o: f64, h: f64, l: f64, c: f64,
/// }
///
/// impl Ohlcv for MyKline {
///     fn open(&self) -> Price { self.o }
///     fn high(&self) -> Price { self.h }
///     fn low(&self) -> Price { self.l }
///     fn close(&self) -> Price { self.c }
/// }
/// ```
pub trait Ohlcv {
    /// Opening price of the bar.
    fn open(&self) -> Price;

    /// Highest price during the bar.
    fn high(&self) -> Price;

    /// Lowest price during the bar.
    fn low(&self) -> Price;

    /// Closing price of the bar.
    fn close(&self) -> Price;

    /// Trade volume during the bar. Defaults to `0.0`.
    ///
    /// None of the trend-overlay indicators read volume.
    fn volume(&self) -> f64 {
        0.0
    }
}

/// High, low and close columns split out of a bar sequence.
///
/// The three columns always have equal length, so indicators computed from
/// an `Hlc` can never fail with a length mismatch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hlc {
    pub high: Vec<Price>,
    pub low: Vec<Price>,
    pub close: Vec<Price>,
}

impl Hlc {
    /// Copies the high, low and close of every bar into columns.
    #[must_use]
    pub fn from_bars(bars: &[impl Ohlcv]) -> Self {
        let mut hlc = Self {
            high: Vec::with_capacity(bars.len()),
            low: Vec::with_capacity(bars.len()),
            close: Vec::with_capacity(bars.len()),
        };

        for bar in bars {
            hlc.high.push(bar.high());
            hlc.low.push(bar.low());
            hlc.close.push(bar.close());
        }

        hlc
    }

    /// Number of bars.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.close.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::Bar;

    #[test]
    fn splits_columns_in_order() {
        let bars = [
            Bar::new(1.0, 2.0, 0.5, 1.5),
            Bar::new(1.5, 3.0, 1.0, 2.5),
        ];
        let hlc = Hlc::from_bars(&bars);

        assert_eq!(hlc.high, vec![2.0, 3.0]);
        assert_eq!(hlc.low, vec![0.5, 1.0]);
        assert_eq!(hlc.close, vec![1.5, 2.5]);
        assert_eq!(hlc.len(), 2);
    }

    #[test]
    fn empty_bars_give_empty_columns() {
        let bars: [Bar; 0] = [];
        let hlc = Hlc::from_bars(&bars);
        assert!(hlc.is_empty());
        assert!(hlc.high.is_empty() && hlc.low.is_empty());
    }

    #[test]
    fn volume_defaults_to_zero() {
        struct NoVolume;
        impl Ohlcv for NoVolume {
            fn open(&self) -> Price {
                1.0
            }
            fn high(&self) -> Price {
                1.0
            }
            fn low(&self) -> Price {
                1.0
            }
            fn close(&self) -> Price {
                1.0
            }
        }

        assert!(NoVolume.volume().abs() < f64::EPSILON);
    }
}
