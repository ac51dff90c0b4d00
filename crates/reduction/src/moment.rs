//! Pitching moment reference transfer.
//!
//! The balance measures moment about its own axis. Each article sits a
//! different distance from that axis, so the moment is shifted along the
//! normal-force line of action to a common reference point:
//!
//! `M_ref = M - (A + D - B) * N`
//!
//! with A the fixed instrument offset, D the article reference diameter and
//! B its moment arm offset, all in metres.

use tunnel_core::error::ensure_len;
use tunnel_core::{ArticleGeometry, Result};

/// Shifts measured moments to the common reference point.
#[derive(Debug, Clone, Copy)]
pub struct MomentReferenceTransfer {
    /// Fixed instrument offset A (m).
    instrument_offset_m: f64,
}

impl MomentReferenceTransfer {
    /// Create a transfer with instrument offset A in metres.
    pub fn new(instrument_offset_m: f64) -> Self {
        Self { instrument_offset_m }
    }

    /// Transfer distance `A + D - B` (m) for an article.
    #[inline]
    pub fn arm(&self, geometry: &ArticleGeometry) -> f64 {
        self.instrument_offset_m + geometry.reference_diameter_m() - geometry.moment_arm_offset_m()
    }

    /// Transfer aligned moment (N*m) and normal force (N) series.
    pub fn transfer(
        &self,
        moment: &[f64],
        normal: &[f64],
        geometry: &ArticleGeometry,
    ) -> Result<Vec<f64>> {
        ensure_len("moment transfer: normal force", moment.len(), normal.len())?;
        let arm = self.arm(geometry);
        Ok(moment
            .iter()
            .zip(normal)
            .map(|(&m, &n)| m - arm * n)
            .collect())
    }
}

impl Default for MomentReferenceTransfer {
    fn default() -> Self {
        Self::new(0.028829)
    }
}
