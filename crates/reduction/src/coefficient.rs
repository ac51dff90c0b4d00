//! Force to coefficient normalization.

use tunnel_core::error::ensure_len;
use tunnel_core::{Coefficient, Result};

/// Normalizes forces by dynamic pressure and a reference area.
#[derive(Debug, Clone, Copy)]
pub struct CoefficientNormalizer {
    /// Reference area (m^2).
    reference_area: f64,
}

impl CoefficientNormalizer {
    /// Create a normalizer for a reference area in m^2.
    pub fn new(reference_area: f64) -> Self {
        Self { reference_area }
    }

    pub fn reference_area(&self) -> f64 {
        self.reference_area
    }

    /// Coefficient for one sample. Undefined when `q_pa` is zero.
    #[inline]
    pub fn coefficient(&self, force: f64, q_pa: f64) -> Coefficient {
        if q_pa == 0.0 {
            Coefficient::Missing
        } else {
            Coefficient::Value(force / (q_pa * self.reference_area))
        }
    }

    /// Coefficients for a force series against a matching pressure series.
    pub fn to_coefficients(&self, force: &[f64], q_pa: &[f64]) -> Result<Vec<Coefficient>> {
        ensure_len("coefficient: dynamic pressure", force.len(), q_pa.len())?;
        Ok(force
            .iter()
            .zip(q_pa)
            .map(|(&f, &q)| self.coefficient(f, q))
            .collect())
    }
}

impl Default for CoefficientNormalizer {
    fn default() -> Self {
        Self::new(0.01)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tunnel_core::Error;

    #[test]
    fn test_basic_coefficient() {
        let normalizer = CoefficientNormalizer::default();
        let c = normalizer.coefficient(10.0, 50.0).value().unwrap();
        // 10 / (50 * 0.01)
        assert_relative_eq!(c, 20.0, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_iff_zero_pressure() {
        let normalizer = CoefficientNormalizer::default();
        let q = [0.0, 25.0, -0.0, -3.0, 1e-300, 0.0];
        let force = [5.0, 5.0, 5.0, 5.0, 0.0, 0.0];
        let coeffs = normalizer.to_coefficients(&force, &q).unwrap();

        assert_eq!(coeffs.len(), q.len());
        for (c, &qi) in coeffs.iter().zip(&q) {
            assert_eq!(c.is_missing(), qi == 0.0);
            if let Some(v) = c.value() {
                assert!(!v.is_nan());
            }
        }
        assert_relative_eq!(coeffs[1].value().unwrap(), 20.0, epsilon = 1e-12);
        assert_relative_eq!(coeffs[3].value().unwrap(), -5.0 / 0.03, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_force_with_zero_pressure_is_missing_not_zero() {
        let normalizer = CoefficientNormalizer::default();
        assert_eq!(normalizer.coefficient(0.0, 0.0), Coefficient::Missing);
    }

    #[test]
    fn test_length_mismatch() {
        let normalizer = CoefficientNormalizer::default();
        let err = normalizer.to_coefficients(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert!(matches!(
            err,
            Error::LengthMismatch { expected: 2, actual: 1, .. }
        ));
    }

    #[test]
    fn test_custom_area() {
        let normalizer = CoefficientNormalizer::new(0.5);
        assert_relative_eq!(normalizer.coefficient(2.0, 4.0).value().unwrap(), 1.0);
    }
}
