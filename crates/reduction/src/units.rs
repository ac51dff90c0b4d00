//! Unit conversion.
//!
//! Balance exports arrive in imperial units; everything downstream works in SI.

use tracing::warn;
use tunnel_core::config::AmbientConfig;

/// Newtons per pound-force.
pub const LBF_TO_N: f64 = 4.44822;

/// Newton-metres per inch-pound-force.
pub const IN_LBF_TO_N_M: f64 = 0.1129848333;

/// Pounds per square foot in one pascal.
pub const PSF_PER_PA: f64 = 0.020885;

/// Convert a force from lbf to N.
#[inline]
pub fn lbf_to_newton(lbf: f64) -> f64 {
    lbf * LBF_TO_N
}

/// Convert a moment from in*lbf to N*m.
#[inline]
pub fn in_lbf_to_newton_metre(in_lbf: f64) -> f64 {
    in_lbf * IN_LBF_TO_N_M
}

/// Convert a pressure from psf to Pa.
#[inline]
pub fn psf_to_pascal(psf: f64) -> f64 {
    psf / PSF_PER_PA
}

/// Apply a scalar conversion to every sample.
pub fn convert_all(values: &[f64], f: impl Fn(f64) -> f64) -> Vec<f64> {
    values.iter().map(|&v| f(v)).collect()
}

/// Converter bound to the ambient conditions of a test.
#[derive(Debug, Clone)]
pub struct UnitConverter {
    /// Air density (kg/m^3).
    density: f64,
}

impl UnitConverter {
    /// Create a converter, deriving density from the ideal gas law.
    pub fn new(ambient: &AmbientConfig) -> Self {
        Self {
            density: ambient.density(),
        }
    }

    /// Air density used for velocity (kg/m^3).
    pub fn density(&self) -> f64 {
        self.density
    }

    /// Free-stream velocity (m/s) from dynamic pressure (Pa).
    ///
    /// Slightly negative readings from sensor noise are taken by magnitude.
    #[inline]
    pub fn dynamic_pressure_to_velocity(&self, q_pa: f64) -> f64 {
        (2.0 * q_pa.abs() / self.density).sqrt()
    }

    /// Velocity for every dynamic pressure sample.
    pub fn velocities(&self, q_pa: &[f64]) -> Vec<f64> {
        let negative = q_pa.iter().filter(|&&q| q < 0.0).count();
        if negative > 0 {
            warn!(negative, "Negative dynamic pressure samples taken by magnitude");
        }
        convert_all(q_pa, |q| self.dynamic_pressure_to_velocity(q))
    }

    /// Forces from lbf to N.
    pub fn forces_to_si(&self, lbf: &[f64]) -> Vec<f64> {
        convert_all(lbf, lbf_to_newton)
    }

    /// Moments from in*lbf to N*m.
    pub fn moments_to_si(&self, in_lbf: &[f64]) -> Vec<f64> {
        convert_all(in_lbf, in_lbf_to_newton_metre)
    }

    /// Pressures from psf to Pa.
    pub fn pressures_to_si(&self, psf: &[f64]) -> Vec<f64> {
        convert_all(psf, psf_to_pascal)
    }
}

impl Default for UnitConverter {
    fn default() -> Self {
        Self::new(&AmbientConfig::default())
    }
}
