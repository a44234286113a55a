//! Kumaraswamy distribution
//!
//! A two-parameter distribution on `[0, 1)` with a closed-form inverse CDF,
//! `F⁻¹(u) = (1 - (1 - u)^(1/b))^(1/a)`. With `a = 1.5, b = 5` the mass sits
//! well to the left, so scaled draws favour small counts and quantities.

use num_traits::ToPrimitive;
use rand::{Rng, distributions::Distribution};

use crate::generator::GeneratorError;

/// Default shape parameter `a`.
pub const DEFAULT_A: f64 = 1.5;

/// Default shape parameter `b`.
pub const DEFAULT_B: f64 = 5.0;

/// Kumaraswamy distribution over `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kumaraswamy {
    inv_a: f64,
    inv_b: f64,
}

impl Kumaraswamy {
    /// Create a distribution with shape parameters `a` and `b`.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidShape`] unless both parameters are
    /// positive and finite.
    pub fn new(a: f64, b: f64) -> Result<Self, GeneratorError> {
        if !(a.is_finite() && a > 0.0 && b.is_finite() && b > 0.0) {
            return Err(GeneratorError::InvalidShape { a, b });
        }

        Ok(Self {
            inv_a: a.recip(),
            inv_b: b.recip(),
        })
    }

    /// Inverse CDF, mapping a uniform draw in `[0, 1)` onto the distribution.
    pub fn inverse_cdf(&self, u: f64) -> f64 {
        (1.0 - (1.0 - u).powf(self.inv_b)).powf(self.inv_a)
    }
}

impl Default for Kumaraswamy {
    fn default() -> Self {
        Self {
            inv_a: DEFAULT_A.recip(),
            inv_b: DEFAULT_B.recip(),
        }
    }
}

impl Distribution<f64> for Kumaraswamy {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.inverse_cdf(rng.r#gen::<f64>())
    }
}

/// Kumaraswamy draws scaled onto the integer range `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KumaraswamyRange {
    inner: Kumaraswamy,
    min: u64,
    max: u64,
    width: f64,
}

impl KumaraswamyRange {
    /// Create a scaled distribution using the default shape parameters.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidRange`] if `min > max` or the range
    /// covers every `u64`.
    pub fn new(min: u64, max: u64) -> Result<Self, GeneratorError> {
        Self::with_shape(Kumaraswamy::default(), min, max)
    }

    /// Create a scaled distribution with an explicit shape.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidRange`] if `min > max` or the range
    /// covers every `u64`.
    pub fn with_shape(inner: Kumaraswamy, min: u64, max: u64) -> Result<Self, GeneratorError> {
        let width = max
            .checked_sub(min)
            .and_then(|span| span.checked_add(1))
            .and_then(|width| width.to_f64())
            .ok_or(GeneratorError::InvalidRange { min, max })?;

        Ok(Self {
            inner,
            min,
            max,
            width,
        })
    }

    /// Smallest value this distribution produces
    pub fn min(&self) -> u64 {
        self.min
    }

    /// Largest value this distribution produces
    pub fn max(&self) -> u64 {
        self.max
    }
}

impl Distribution<u64> for KumaraswamyRange {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        let offset = (self.inner.sample(rng) * self.width)
            .floor()
            .to_u64()
            .unwrap_or(0);

        self.min.saturating_add(offset).min(self.max)
    }
}
