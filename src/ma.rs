use std::{fmt::Display, num::NonZero};

use crate::{
    Result, Series,
    ema::exponential,
    series::{Computed, Placeholder},
    sma::rolling_mean,
};

/// Moving average type for indicators that take a smoothing selector
/// (oscillator legs, Bollinger middle band, stochastic %K/%D).
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug)]
pub enum MaKind {
    #[default]
    Sma,
    Ema,
}

impl MaKind {
    /// Smooths `values`, reporting the first valid index.
    pub(crate) fn smooth(self, values: &[f64], length: usize) -> Result<Computed> {
        match self {
            Self::Sma => rolling_mean(values, length),
            Self::Ema => exponential(values, length),
        }
    }
}

impl Display for MaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Moving average of `values` over `period`, of the given kind.
///
/// Same as [`sma`](crate::sma) or [`ema`](crate::ema).
///
/// # Errors
///
/// [`IndicatorError::InsufficientData`](crate::IndicatorError::InsufficientData)
/// if `values` is non-empty and shorter than `period`.
pub fn ma(values: &[f64], period: NonZero<usize>, kind: MaKind) -> Result<Series> {
    Ok(kind
        .smooth(values, period.get())?
        .into_aligned(values.len(), Placeholder::Zero))
}
