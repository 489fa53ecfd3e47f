use std::hash::{Hash, Hasher};

/// Band width multiplier.
///
/// Scales a volatility measure into a band offset: ATR for
/// [`SuperTrend`](crate::SuperTrend), standard deviation for
/// [`Bb`](crate::Bb) and [`stddev`](crate::stddev).
///
/// Wraps a positive, finite `f64`. The constructor panics otherwise.
///
/// Defaults to `3.0`.
///
/// Implements `Eq` and `Hash` via bit-level comparison, which is safe because
/// NaN is rejected at construction.
#[derive(Clone, Copy, Debug)]
pub struct Multiplier(f64);

impl Multiplier {
    /// Creates a new band multiplier.
    ///
    /// # Panics
    ///
    /// Panics if `value` is zero, negative, infinite or NaN.
    #[must_use]
    pub fn new(value: f64) -> Self {
        assert!(!value.is_nan(), "multiplier must not be NaN");
        assert!(value.is_finite(), "multiplier must be finite");
        assert!(value > 0.0, "multiplier must be positive");
        Self(value)
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for Multiplier {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Multiplier {}

impl Hash for Multiplier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl Default for Multiplier {
    fn default() -> Self {
        Self(3.0)
    }
}
