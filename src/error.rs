//! Error types for batch indicator computation.

use thiserror::Error;

/// Result type alias for indicator operations that may fail.
pub type Result<T> = core::result::Result<T, IndicatorError>;

/// Errors that can occur during indicator computation.
///
/// All variants are deterministic functions of the input: retrying with the
/// same series and parameters reproduces the same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndicatorError {
    /// Input series have different lengths.
    #[error("series length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Length of the first input series.
        expected: usize,
        /// Length of the offending series.
        actual: usize,
    },

    /// Not enough bars to fill the configured lookback window.
    #[error("insufficient data: need {required} points, got {actual}")]
    InsufficientData {
        /// Minimum number of data points for the configured period(s).
        required: usize,
        /// Number of data points provided.
        actual: usize,
    },

    /// A sub-computation this indicator is built on failed.
    #[error("{indicator} calculation failed")]
    Upstream {
        /// Name of the failing sub-computation (e.g. `"ATR"`).
        indicator: &'static str,
        /// The error reported by the sub-computation.
        #[source]
        source: Box<IndicatorError>,
    },
}

impl IndicatorError {
    /// Wraps `self` as having originated in the `indicator` sub-computation.
    #[must_use]
    pub fn upstream(self, indicator: &'static str) -> Self {
        Self::Upstream {
            indicator,
            source: Box::new(self),
        }
    }

    /// Innermost error, looking through any number of [`Upstream`](Self::Upstream)
    /// wrappers.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Upstream { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn length_mismatch_display() {
        let err = IndicatorError::LengthMismatch {
            expected: 5,
            actual: 4,
        };
        assert_eq!(err.to_string(), "series length mismatch: expected 5, got 4");
    }

    #[test]
    fn insufficient_data_display() {
        let err = IndicatorError::InsufficientData {
            required: 14,
            actual: 10,
        };
        assert_eq!(err.to_string(), "insufficient data: need 14 points, got 10");
    }

    #[test]
    fn upstream_chains_source() {
        let inner = IndicatorError::InsufficientData {
            required: 7,
            actual: 3,
        };
        let err = inner.clone().upstream("ATR");

        assert_eq!(err.to_string(), "ATR calculation failed");
        let source = err.source().expect("upstream has a source");
        assert_eq!(source.to_string(), inner.to_string());
    }

    #[test]
    fn root_cause_unwraps_nested_upstream() {
        let inner = IndicatorError::LengthMismatch {
            expected: 3,
            actual: 2,
        };
        let err = inner.clone().upstream("EMA").upstream("PPO signal");
        assert_eq!(err.root_cause(), &inner);
    }

    #[test]
    fn root_cause_of_plain_error_is_itself() {
        let err = IndicatorError::InsufficientData {
            required: 2,
            actual: 1,
        };
        assert_eq!(err.root_cause(), &err);
    }
}
