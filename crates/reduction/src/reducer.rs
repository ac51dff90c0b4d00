//! Dataset reduction.
//!
//! Sequences the conversion, rotation, normalization and moment transfer
//! for each run according to its policy, and assembles the five run records.

use tracing::{debug, info, warn};
use tunnel_core::{
    AbscissaKind, Config, Error, GeometryTable, RawDataset, RawRecordSet, ReducedDataset, Result,
    RunId, RunRecord,
};

use crate::{
    coefficient::CoefficientNormalizer,
    moment::MomentReferenceTransfer,
    rotation::ForceFrameRotator,
    units::UnitConverter,
};

/// Reduces raw balance record sets into run records.
#[derive(Debug, Clone)]
pub struct DatasetReducer {
    /// Unit and velocity conversion.
    converter: UnitConverter,
    /// Coefficient normalization.
    normalizer: CoefficientNormalizer,
    /// Moment reference transfer.
    transfer: MomentReferenceTransfer,
    /// Article geometry lookup.
    geometry: GeometryTable,
    /// Largest |alpha| accepted in velocity-sweep runs (deg).
    alpha_tolerance_deg: Option<f64>,
}

impl DatasetReducer {
    /// Create a reducer from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            converter: UnitConverter::new(&config.ambient),
            normalizer: CoefficientNormalizer::new(config.reduction.reference_area_m2),
            transfer: MomentReferenceTransfer::new(config.reduction.instrument_offset_m),
            geometry: config.geometry_table()?,
            alpha_tolerance_deg: config.reduction.velocity_alpha_tolerance_deg,
        })
    }

    /// Reduce all five runs, in output order.
    ///
    /// The first failing run aborts the reduction.
    pub fn reduce(&self, dataset: &RawDataset) -> Result<ReducedDataset> {
        let records = RunId::ALL
            .iter()
            .map(|&run| self.reduce_run(run, dataset.require(run)?))
            .collect::<Result<Vec<_>>>()?;
        ReducedDataset::new(records)
    }

    /// Reduce a single run.
    pub fn reduce_run(&self, run: RunId, raw: &RawRecordSet) -> Result<RunRecord> {
        let samples = raw.check_aligned(run.as_str())?;
        let policy = run.policy();
        let geometry = self.geometry.get(policy.article)?;
        debug!(%run, samples, rotate = policy.rotate, "Reducing run");

        let normal = self.converter.forces_to_si(&raw.normal_force);
        let axial = self.converter.forces_to_si(&raw.axial_force);
        let moment = self.converter.moments_to_si(&raw.pitching_moment);
        let q_pa = self.converter.pressures_to_si(&raw.dynamic_pressure);

        let abscissa = match policy.abscissa {
            AbscissaKind::AngleOfAttackDeg => Self::require_alpha(run, raw)?.to_vec(),
            AbscissaKind::VelocityMps => {
                self.check_small_angle(run, raw)?;
                self.converter.velocities(&q_pa)
            }
        };

        let (lift_coefficient, drag_coefficient) = if policy.rotate {
            let alpha = Self::require_alpha(run, raw)?;
            let wind = ForceFrameRotator::to_lift_drag(&normal, &axial, alpha)?;
            (
                self.normalizer.to_coefficients(&wind.lift, &q_pa)?,
                self.normalizer.to_coefficients(&wind.drag, &q_pa)?,
            )
        } else {
            // Small-angle runs: normal and axial stand in for lift and drag.
            (
                self.normalizer.to_coefficients(&normal, &q_pa)?,
                self.normalizer.to_coefficients(&axial, &q_pa)?,
            )
        };

        let missing = lift_coefficient.iter().filter(|c| c.is_missing()).count();
        if missing > 0 {
            warn!(%run, missing, "Zero dynamic pressure samples left without coefficients");
        }

        let pitching_moment = self.transfer.transfer(&moment, &normal, geometry)?;

        let record = RunRecord::new(
            run,
            policy.abscissa,
            abscissa,
            normal,
            axial,
            pitching_moment,
            lift_coefficient,
            drag_coefficient,
        )?;
        info!(%run, samples, article = %policy.article, "Reduced run");
        Ok(record)
    }

    fn require_alpha(run: RunId, raw: &RawRecordSet) -> Result<&[f64]> {
        raw.angle_of_attack
            .as_deref()
            .ok_or_else(|| Error::missing_column(run.as_str(), "angle of attack"))
    }

    /// Fail if a velocity-sweep run carries an angle outside tolerance.
    fn check_small_angle(&self, run: RunId, raw: &RawRecordSet) -> Result<()> {
        let (Some(tolerance_deg), Some(alpha)) = (self.alpha_tolerance_deg, &raw.angle_of_attack)
        else {
            return Ok(());
        };

        match alpha.iter().position(|a| a.is_nan() || a.abs() > tolerance_deg) {
            Some(index) => Err(Error::AngleOutOfTolerance {
                run,
                index,
                alpha_deg: alpha[index],
                tolerance_deg,
            }),
            None => Ok(()),
        }
    }
}

impl Default for DatasetReducer {
    fn default() -> Self {
        Self {
            converter: UnitConverter::default(),
            normalizer: CoefficientNormalizer::default(),
            transfer: MomentReferenceTransfer::default(),
            geometry: GeometryTable::standard(),
            alpha_tolerance_deg: Some(2.0),
        }
    }
}
