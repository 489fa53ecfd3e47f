#![allow(dead_code)]

use serde::{Deserialize, de::DeserializeOwned};
use trend_overlay_ta::{Hlc, Ohlcv, Price};

/// OHLCV bar parsed from the hourly CSV sample.
#[derive(Debug, Clone, Deserialize)]
pub struct RefBar {
    pub open_time: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Ohlcv for RefBar {
    fn open(&self) -> Price {
        self.open
    }

    fn high(&self) -> Price {
        self.high
    }

    fn low(&self) -> Price {
        self.low
    }

    fn close(&self) -> Price {
        self.close
    }

    fn volume(&self) -> f64 {
        self.volume
    }
}

/// Reference value with timestamp. Warm-up rows hold `0.0`.
#[derive(Debug, Deserialize)]
pub struct RefValue {
    pub open_time: u64,
    pub expected: f64,
}

/// Reference SuperTrend row. Undefined bands are written as `NaN`.
#[derive(Debug, Deserialize)]
pub struct RefSuperTrend {
    pub open_time: u64,
    pub trend: f64,
    pub direction: f64,
    pub support: f64,
    pub resistance: f64,
}

/// Reference Bollinger Bands row.
#[derive(Debug, Deserialize)]
pub struct RefBands {
    pub open_time: u64,
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Reference MACD row.
#[derive(Debug, Deserialize)]
pub struct RefMacd {
    pub open_time: u64,
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Reference stochastic row (%K and %D).
#[derive(Debug, Deserialize)]
pub struct RefStoch {
    pub open_time: u64,
    pub k: f64,
    pub d: f64,
}

const OHLCV_PATH: &str = "tests/fixtures/data/btcusdt-1h.csv";

/// Load reference OHLCV bars.
pub fn load_reference_ohlcvs() -> Vec<RefBar> {
    load_records(OHLCV_PATH, "invalid OHLCV record")
}

/// Load reference bars split into high, low and close columns.
pub fn load_reference_hlc() -> Hlc {
    Hlc::from_bars(&load_reference_ohlcvs())
}

/// Load the volume column of the reference bars.
pub fn load_reference_volume() -> Vec<f64> {
    load_reference_ohlcvs().iter().map(|bar| bar.volume).collect()
}

/// Load single-value reference data (ATR, SMA, EMA, RSI, ...).
pub fn load_ref_values(path: &str) -> Vec<RefValue> {
    load_records(path, "invalid reference record")
}

/// Load SuperTrend reference data (trend, direction, support, resistance).
pub fn load_supertrend_ref(path: &str) -> Vec<RefSuperTrend> {
    load_records(path, "invalid SuperTrend reference record")
}

/// Load Bollinger Bands reference data (upper, middle, lower).
pub fn load_bands_ref(path: &str) -> Vec<RefBands> {
    load_records(path, "invalid BB reference record")
}

/// Load MACD reference data (macd, signal, histogram).
pub fn load_macd_ref(path: &str) -> Vec<RefMacd> {
    load_records(path, "invalid MACD reference record")
}

/// Load stochastic reference data (k, d).
pub fn load_stoch_ref(path: &str) -> Vec<RefStoch> {
    load_records(path, "invalid stochastic reference record")
}

/// Assert two f64 values are within tolerance.
pub fn assert_near(actual: f64, expected: f64, tolerance: f64, context: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{context}: expected {expected:.10}, got {actual:.10}, diff {diff:.2e} > tolerance {tolerance:.2e}"
    );
}

/// Like [`assert_near`], but `NaN` must line up with `NaN`.
pub fn assert_near_or_nan(actual: f64, expected: f64, tolerance: f64, context: &str) {
    if expected.is_nan() {
        assert!(actual.is_nan(), "{context}: expected NaN, got {actual:.10}");
    } else {
        assert_near(actual, expected, tolerance, context);
    }
}

/// Assert every value of `actual` matches the reference series row by row.
pub fn assert_series_matches(actual: &[f64], reference: &[RefValue], tolerance: f64, name: &str) {
    assert_eq!(
        actual.len(),
        reference.len(),
        "{name}: output length differs from reference"
    );
    for (i, (value, row)) in actual.iter().zip(reference).enumerate() {
        assert_near(
            *value,
            row.expected,
            tolerance,
            &format!("{name} at bar {i} (t={})", row.open_time),
        );
    }
}

fn load_records<T: DeserializeOwned>(path: &str, context: &str) -> Vec<T> {
    let mut reader = csv::Reader::from_path(path)
        .unwrap_or_else(|e| panic!("failed to open {path}: {e}"));
    reader
        .deserialize()
        .map(|r| r.unwrap_or_else(|e| panic!("{context} in {path}: {e}")))
        .collect()
}

/// Generate a reference match test for a single-series indicator.
///
/// Usage: `reference_test!(sma_20, Sma, SmaConfig::close(nz(20)), "tests/fixtures/data/sma-20-close.csv", 1e-6);`
#[allow(unused_macros)]
macro_rules! reference_test {
    ($name:ident, $ind:ty, $config:expr, $ref_path:expr, $tolerance:expr) => {
        mod $name {
            use super::fixtures::*;
            use std::num::NonZero;
            use trend_overlay_ta::*;

            fn nz(n: usize) -> NonZero<usize> {
                NonZero::new(n).unwrap()
            }

            #[test]
            fn matches_reference() {
                let bars = load_reference_ohlcvs();
                let reference = load_ref_values($ref_path);
                let out = <$ind>::new($config).compute(&bars).unwrap();

                assert_series_matches(&out, &reference, $tolerance, stringify!($name));
            }

            #[test]
            fn prefix_agrees_with_full_run() {
                let bars = load_reference_ohlcvs();
                let ind = <$ind>::new($config);
                let full = ind.compute(&bars).unwrap();
                let half = ind.compute(&bars[..bars.len() / 2]).unwrap();

                assert_eq!(&full[..half.len()], &half[..]);
            }
        }
    };
}

#[allow(unused_imports)]
pub(crate) use reference_test;
