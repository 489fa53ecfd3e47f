//! Price oscillators built from two moving averages, and the signal line
//! derived from them.
//!
//! The signal line is the standard example of a second-order indicator: it
//! is an EMA over an oscillator that has its own warm-up region, so it is
//! computed with [`derive_from_valid`] over the oscillator's valid suffix
//! only.

use std::num::NonZero;

use crate::{
    MaKind, Result, Series,
    ema::exponential,
    series::{Computed, Placeholder, derive_from_valid, first_valid_index},
};

/// Percentage Price Oscillator with its signal line and histogram.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PpoOutput {
    pub ppo: Series,
    /// EMA of the valid part of `ppo`.
    pub signal: Series,
    /// `ppo − signal` from the first valid PPO bar, `0.0` before. While the
    /// signal is still warming up it reads `0.0`, so the histogram equals
    /// the PPO there.
    pub histogram: Series,
}

/// Absolute Price Oscillator: `fast MA − slow MA`.
///
/// The longer period is always treated as the slow leg, so swapping `fast`
/// and `slow` gives the same result. Both legs start at `slow − 1`, where an
/// EMA fast leg is seeded with the mean of the `fast` bars ending there.
/// Earlier entries are `0.0`.
///
/// # Errors
///
/// [`IndicatorError::InsufficientData`](crate::IndicatorError::InsufficientData)
/// if `values` is non-empty and shorter than either period.
pub fn apo(
    values: &[f64],
    fast: NonZero<usize>,
    slow: NonZero<usize>,
    kind: MaKind,
) -> Result<Series> {
    let computed = oscillator(values, fast, slow, kind, |f, s| f - s)?;
    Ok(computed.into_aligned(values.len(), Placeholder::Zero))
}

/// Percentage Price Oscillator: `(fast MA − slow MA) / slow MA × 100`.
///
/// A zero slow MA yields `0.0`. Periods are ordered as in [`apo`]. Valid
/// from `max(fast, slow) − 1`; earlier entries are `0.0`.
///
/// # Errors
///
/// Same as [`apo`].
#[allow(clippy::float_cmp)]
pub fn ppo(
    values: &[f64],
    fast: NonZero<usize>,
    slow: NonZero<usize>,
    kind: MaKind,
) -> Result<Series> {
    let computed = oscillator(values, fast, slow, kind, |f, s| {
        if s == 0.0 { 0.0 } else { (f - s) / s * 100.0 }
    })?;
    Ok(computed.into_aligned(values.len(), Placeholder::Zero))
}

/// [`ppo`] plus an EMA signal line over its valid region.
///
/// # Errors
///
/// Same as [`ppo`], or
/// [`IndicatorError::Upstream`](crate::IndicatorError::Upstream) named
/// `"PPO signal"` when the valid region is shorter than `signal`.
pub fn ppo_with_signal(
    values: &[f64],
    fast: NonZero<usize>,
    slow: NonZero<usize>,
    signal: NonZero<usize>,
    kind: MaKind,
) -> Result<PpoOutput> {
    let ppo = ppo(values, fast, slow, kind)?;
    let signal_line = derive_from_valid(&ppo, Placeholder::Zero, "PPO signal", |valid| {
        Ok(exponential(valid, signal.get())?.into_aligned(valid.len(), Placeholder::Zero))
    })?;

    let first = first_valid_index(&ppo, Placeholder::Zero).unwrap_or(ppo.len());
    let histogram = ppo
        .iter()
        .zip(&signal_line)
        .enumerate()
        .map(|(i, (p, s))| if i < first { 0.0 } else { p - s })
        .collect();

    Ok(PpoOutput {
        ppo,
        signal: signal_line,
        histogram,
    })
}

/// Combines the two legs from the bar where the slow one becomes valid.
///
/// The fast leg runs over `values[slow − fast..]`, so an EMA fast leg is
/// seeded over the `fast` bars ending at `slow − 1`.
pub(crate) fn oscillator(
    values: &[f64],
    fast: NonZero<usize>,
    slow: NonZero<usize>,
    kind: MaKind,
    combine: impl Fn(f64, f64) -> f64,
) -> Result<Computed> {
    let (fast, slow) = if fast <= slow {
        (fast.get(), slow.get())
    } else {
        (slow.get(), fast.get())
    };

    let slow_leg = kind.smooth(values, slow)?;
    if values.is_empty() {
        return Ok(Computed::empty());
    }
    let fast_leg = kind.smooth(&values[slow - fast..], fast)?;

    let combined = fast_leg
        .values
        .iter()
        .zip(&slow_leg.values)
        .map(|(&f, &s)| combine(f, s))
        .collect();

    Ok(Computed::new(slow_leg.begin, combined))
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::{
        IndicatorError,
        test_util::{assert_approx, nz},
    };

    fn ramp(len: u32) -> Vec<f64> {
        (1..=len).map(f64::from).collect()
    }

    mod oscillators {
        use super::*;

        #[test]
        fn apo_of_ramp_is_constant() {
            // SMA(2) = i + 0.5, SMA(4) = i - 0.5
            let out = apo(&ramp(8), nz(2), nz(4), MaKind::Sma).unwrap();
            assert_eq!(out, vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
        }

        #[test]
        fn ppo_is_relative_to_slow() {
            let out = ppo(&ramp(8), nz(2), nz(4), MaKind::Sma).unwrap();
            assert_eq!(&out[..3], &[0.0, 0.0, 0.0]);
            // 1 / 2.5 × 100
            assert_approx!(out[3], 40.0);
            assert_approx!(out[4], 100.0 / 3.5);
        }

        #[test]
        fn zero_slow_average_yields_zero() {
            let out = ppo(&[0.0; 4], nz(1), nz(2), MaKind::Sma).unwrap();
            assert_eq!(out, vec![0.0; 4]);
        }

        #[test]
        fn ema_legs() {
            let out = apo(&[5.0; 6], nz(2), nz(3), MaKind::Ema).unwrap();
            assert_eq!(out, vec![0.0; 6]);
        }

        #[test]
        fn empty_is_empty() {
            assert!(ppo(&[], nz(12), nz(26), MaKind::Ema).unwrap().is_empty());
        }

        #[test]
        fn longer_period_is_always_slow() {
            let values = ramp(12);
            assert_eq!(
                apo(&values, nz(5), nz(2), MaKind::Sma),
                apo(&values, nz(2), nz(5), MaKind::Sma)
            );
            let out = ppo(&values, nz(5), nz(2), MaKind::Ema).unwrap();
            assert!(out[4..].iter().all(|&v| v > 0.0), "rising prices give positive PPO");
        }

        #[test]
        fn ema_fast_leg_seeded_at_slow_start() {
            // fast EMA(2) seeded with mean(4, 8) = 6, slow EMA(4) with mean(10, 0, 4, 8) = 5.5
            let out = apo(&[10.0, 0.0, 4.0, 8.0], nz(2), nz(4), MaKind::Ema).unwrap();
            assert_eq!(out, vec![0.0, 0.0, 0.0, 0.5]);
        }

        #[test]
        fn shorter_than_slow_period() {
            assert_eq!(
                apo(&ramp(3), nz(2), nz(4), MaKind::Sma),
                Err(IndicatorError::InsufficientData {
                    required: 4,
                    actual: 3
                })
            );
        }
    }

    mod signal {
        use super::*;

        #[test]
        fn computed_over_valid_suffix_only() {
            let out = ppo_with_signal(&ramp(10), nz(2), nz(4), nz(2), MaKind::Sma).unwrap();

            assert_eq!(out.ppo.len(), 10);
            assert_eq!(out.signal.len(), 10);
            assert_eq!(out.histogram.len(), 10);

            // PPO valid from 3, EMA(2) over the suffix valid one bar later
            assert_eq!(&out.signal[..4], &[0.0; 4]);
            assert_approx!(out.signal[4], f64::midpoint(out.ppo[3], out.ppo[4]));
        }

        #[test]
        fn histogram_zero_before_first_valid_ppo() {
            let out = ppo_with_signal(&ramp(10), nz(2), nz(4), nz(2), MaKind::Sma).unwrap();

            assert_eq!(&out.histogram[..3], &[0.0; 3]);
            for i in 3..10 {
                assert_eq!(out.histogram[i], out.ppo[i] - out.signal[i]);
            }
        }

        #[test]
        fn histogram_tracks_ppo_while_signal_warms_up() {
            // PPO valid from 4, EMA(4) signal valid from 7
            let out = ppo_with_signal(&ramp(30), nz(3), nz(5), nz(4), MaKind::Sma).unwrap();

            assert_eq!(&out.signal[4..7], &[0.0; 3]);
            assert_eq!(&out.histogram[4..7], &out.ppo[4..7]);
            assert_approx!(out.ppo[4], 100.0 / 3.0);
            assert_ne!(out.histogram[7], out.ppo[7]);
        }

        #[test]
        fn short_valid_region_is_upstream_error() {
            let err = ppo_with_signal(&ramp(4), nz(2), nz(4), nz(3), MaKind::Sma).unwrap_err();

            assert!(matches!(
                err,
                IndicatorError::Upstream {
                    indicator: "PPO signal",
                    ..
                }
            ));
            assert_eq!(
                err.root_cause(),
                &IndicatorError::InsufficientData {
                    required: 3,
                    actual: 1
                }
            );
        }

        #[test]
        fn flat_prices_leave_everything_placeholder() {
            let out = ppo_with_signal(&[7.0; 8], nz(2), nz(4), nz(3), MaKind::Ema).unwrap();
            assert_eq!(out.signal, vec![0.0; 8]);
            assert_eq!(out.histogram, vec![0.0; 8]);
        }
    }
}
