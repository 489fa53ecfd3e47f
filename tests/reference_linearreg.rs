mod fixtures;

use fixtures::{assert_series_matches, load_ref_values, load_reference_hlc};
use std::num::NonZero;
use trend_overlay_ta::linearreg;

const REF_PATH: &str = "tests/fixtures/data/linearreg-14-close.csv";

// Tolerance: 1e-8.
// The reference fits centred x; the raw sums here lose a few digits at BTC
// price levels.
const TOLERANCE: f64 = 1e-8;

#[test]
fn linearreg_14_close_matches_reference() {
    let hlc = load_reference_hlc();
    let reference = load_ref_values(REF_PATH);

    let out = linearreg(&hlc.close, NonZero::new(14).unwrap()).unwrap();
    assert_series_matches(&out, &reference, TOLERANCE, "linearreg(14)");
}

#[test]
fn prefix_agrees_with_full_run() {
    let hlc = load_reference_hlc();
    let period = NonZero::new(14).unwrap();
    let full = linearreg(&hlc.close, period).unwrap();
    let half = linearreg(&hlc.close[..hlc.close.len() / 2], period).unwrap();

    assert_eq!(&full[..half.len()], &half[..]);
}
