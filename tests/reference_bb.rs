mod fixtures;

use fixtures::{RefBands, assert_near, load_bands_ref, load_reference_hlc, load_reference_ohlcvs};
use std::num::NonZero;
use trend_overlay_ta::{Bb, BbConfig, BbOutput, MaKind, Multiplier, bbands, stddev};

const REF_PATH: &str = "tests/fixtures/data/bb-20-2.csv";

// Tolerance: 1e-6 (~$0.000001 for BTC prices).
// The running sum of squares loses a few digits to cancellation at BTC
// price levels; the reference computes each window in two passes.
const TOLERANCE: f64 = 1e-6;

fn assert_matches(out: &BbOutput, reference: &[RefBands], name: &str) {
    assert_eq!(out.len(), reference.len(), "{name}: length differs");

    for (i, row) in reference.iter().enumerate() {
        let ctx = format!("{name} at bar {i} (t={})", row.open_time);
        assert_near(out.upper[i], row.upper, TOLERANCE, &format!("{ctx} upper"));
        assert_near(out.middle[i], row.middle, TOLERANCE, &format!("{ctx} middle"));
        assert_near(out.lower[i], row.lower, TOLERANCE, &format!("{ctx} lower"));
    }
}

#[test]
fn bb_20_2_close_matches_reference() {
    let bars = load_reference_ohlcvs();
    let reference = load_bands_ref(REF_PATH);

    let out = Bb::new(BbConfig::default_20()).compute(&bars).unwrap();
    assert_matches(&out, &reference, "BB(20, 2)");
}

#[test]
fn slice_api_matches_reference() {
    let hlc = load_reference_hlc();
    let reference = load_bands_ref(REF_PATH);

    let two = Multiplier::new(2.0);
    let out = bbands(&hlc.close, NonZero::new(20).unwrap(), two, two, MaKind::Sma).unwrap();
    assert_matches(&out, &reference, "bbands(20, 2)");
}

#[test]
fn band_offset_is_scaled_stddev() {
    let hlc = load_reference_hlc();
    let period = NonZero::new(20).unwrap();

    let out = bbands(
        &hlc.close,
        period,
        Multiplier::new(2.0),
        Multiplier::new(2.0),
        MaKind::Sma,
    )
    .unwrap();
    let sigma = stddev(&hlc.close, period, Multiplier::new(2.0)).unwrap();

    for i in 19..out.len() {
        assert_near(
            out.upper[i] - out.middle[i],
            sigma[i],
            TOLERANCE,
            &format!("offset at bar {i}"),
        );
    }
}
