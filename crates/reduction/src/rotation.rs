//! Body-axis to wind-axis force rotation.

use tunnel_core::error::ensure_len;
use tunnel_core::Result;

/// Wind-axis force pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiftDrag {
    /// Lift force (N).
    pub lift: Vec<f64>,
    /// Drag force (N).
    pub drag: Vec<f64>,
}

/// Rotates normal/axial balance readings through the angle of attack.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForceFrameRotator;

impl ForceFrameRotator {
    /// Rotate one sample. Returns `(lift, drag)`.
    #[inline]
    pub fn rotate(normal: f64, axial: f64, alpha_deg: f64) -> (f64, f64) {
        let (sin, cos) = alpha_deg.to_radians().sin_cos();
        let lift = normal * cos - axial * sin;
        let drag = normal * sin + axial * cos;
        (lift, drag)
    }

    /// Rotate aligned series of normal force, axial force and angle of attack (deg).
    pub fn to_lift_drag(normal: &[f64], axial: &[f64], alpha_deg: &[f64]) -> Result<LiftDrag> {
        let n = normal.len();
        ensure_len("lift/drag rotation: axial force", n, axial.len())?;
        ensure_len("lift/drag rotation: angle of attack", n, alpha_deg.len())?;

        let mut out = LiftDrag {
            lift: Vec::with_capacity(n),
            drag: Vec::with_capacity(n),
        };
        for ((&nf, &af), &alpha) in normal.iter().zip(axial).zip(alpha_deg) {
            let (lift, drag) = Self::rotate(nf, af, alpha);
            out.lift.push(lift);
            out.drag.push(drag);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_identity_at_zero_alpha() {
        let normal = [3.0, -1.25, 0.0, 1e6];
        let axial = [0.5, 7.0, -2.0, 1e-6];
        let out = ForceFrameRotator::to_lift_drag(&normal, &axial, &[0.0; 4]).unwrap();
        assert_eq!(out.lift, normal.to_vec());
        assert_eq!(out.drag, axial.to_vec());
    }

    #[test]
    fn test_quarter_turn() {
        let normal = [10.0, 2.0];
        let axial = [0.0, 3.0];
        let out = ForceFrameRotator::to_lift_drag(&normal, &axial, &[90.0, 90.0]).unwrap();
        for i in 0..2 {
            assert_abs_diff_eq!(out.lift[i], -axial[i], epsilon = 1e-12);
            assert_abs_diff_eq!(out.drag[i], normal[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_preserves_magnitude() {
        for alpha in [-30.0, 12.5, 45.0, 170.0] {
            let (lift, drag) = ForceFrameRotator::rotate(3.0, 4.0, alpha);
            assert_abs_diff_eq!((lift * lift + drag * drag).sqrt(), 5.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_forty_five_degrees() {
        let (lift, drag) = ForceFrameRotator::rotate(1.0, 1.0, 45.0);
        assert_abs_diff_eq!(lift, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(drag, 2.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_length_mismatch() {
        assert!(ForceFrameRotator::to_lift_drag(&[1.0, 2.0], &[1.0, 2.0], &[0.0]).is_err());
        assert!(ForceFrameRotator::to_lift_drag(&[1.0], &[], &[0.0]).is_err());
    }
}
