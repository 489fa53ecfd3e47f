//! Series alignment: every indicator output has the input's length, with
//! the leading warm-up region filled by a placeholder.
//!
//! Computations produce a [`Computed`] block (first valid index plus the
//! valid values) which [`Computed::into_aligned`] spreads over a full-length
//! [`Series`]. Second-order indicators use [`derive_from_valid`] so their own
//! warm-up statistics only ever see valid samples of the first stage.

use crate::{IndicatorError, Result, Series};

/// Value written into the warm-up region of an output series.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum Placeholder {
    /// `0.0`, used by the moving averages, oscillators and ATR.
    Zero,
    /// `NaN`, used by SuperTrend to tell "no trend yet" apart from a
    /// zero price level.
    Nan,
}

impl Placeholder {
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        match self {
            Self::Zero => 0.0,
            Self::Nan => f64::NAN,
        }
    }

    /// Whether `x` reads as this placeholder.
    #[inline]
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn matches(self, x: f64) -> bool {
        match self {
            Self::Zero => x == 0.0,
            Self::Nan => x.is_nan(),
        }
    }
}

/// Valid values of a computation and the input index the first one maps to.
///
/// `values.len()` is the valid count; `begin + values.len()` never exceeds
/// the input length.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Computed {
    pub begin: usize,
    pub values: Vec<f64>,
}

impl Computed {
    #[must_use]
    pub fn new(begin: usize, values: Vec<f64>) -> Self {
        Self { begin, values }
    }

    /// A computation that produced nothing (e.g. over empty input).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn valid_count(&self) -> usize {
        self.values.len()
    }

    /// Moves the block `offset` bars later, for a computation that ran over
    /// a suffix of the input starting at `offset`.
    #[inline]
    #[must_use]
    pub fn shifted(mut self, offset: usize) -> Self {
        self.begin += offset;
        self
    }

    /// Spreads the valid values over a `len`-long series, placeholder first.
    #[must_use]
    pub fn into_aligned(self, len: usize, placeholder: Placeholder) -> Series {
        debug_assert!(
            self.begin + self.values.len() <= len,
            "computed block overruns series: begin={}, count={}, len={len}",
            self.begin,
            self.values.len(),
        );

        let mut out = vec![placeholder.value(); len];
        out[self.begin..self.begin + self.values.len()].copy_from_slice(&self.values);
        out
    }
}

/// Checks that every series has the same length as the first one.
///
/// # Errors
///
/// [`IndicatorError::LengthMismatch`] naming the first length and the first
/// differing one.
pub fn ensure_same_len(series: &[&[f64]]) -> Result<usize> {
    let Some((first, rest)) = series.split_first() else {
        return Ok(0);
    };

    let expected = first.len();
    if let Some(other) = rest.iter().find(|s| s.len() != expected) {
        tracing::debug!(expected, actual = other.len(), "input series length mismatch");
        return Err(IndicatorError::LengthMismatch {
            expected,
            actual: other.len(),
        });
    }

    Ok(expected)
}

/// Checks that `len` bars cover a lookback of `required` bars.
///
/// # Errors
///
/// [`IndicatorError::InsufficientData`] when `len < required`.
pub fn ensure_min_len(len: usize, required: usize) -> Result<()> {
    if len < required {
        tracing::debug!(required, actual = len, "not enough bars for lookback");
        return Err(IndicatorError::InsufficientData {
            required,
            actual: len,
        });
    }

    Ok(())
}

/// Index of the first entry that is not the placeholder, if any.
#[must_use]
pub fn first_valid_index(series: &[f64], placeholder: Placeholder) -> Option<usize> {
    series.iter().position(|&x| !placeholder.matches(x))
}

/// Runs a secondary computation over the valid suffix of `primary`.
///
/// The suffix starts at [`first_valid_index`]. The secondary output (which
/// must have the suffix's length) is shifted back into place and the prefix
/// is filled with `placeholder`. An all-placeholder `primary` yields an
/// all-placeholder result without calling `secondary`.
///
/// # Errors
///
/// Errors from `secondary` are wrapped as [`IndicatorError::Upstream`] under
/// `name`.
pub fn derive_from_valid<F>(
    primary: &[f64],
    placeholder: Placeholder,
    name: &'static str,
    secondary: F,
) -> Result<Series>
where
    F: FnOnce(&[f64]) -> Result<Series>,
{
    let Some(first) = first_valid_index(primary, placeholder) else {
        return Ok(vec![placeholder.value(); primary.len()]);
    };

    let derived = secondary(&primary[first..]).map_err(|e| e.upstream(name))?;
    debug_assert_eq!(derived.len(), primary.len() - first);

    let mut out = Vec::with_capacity(primary.len());
    out.resize(first, placeholder.value());
    out.extend(derived);
    Ok(out)
}
