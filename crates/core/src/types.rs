//! Core data types for the wind-tunnel data reduction system.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ensure_len, Error, Result};

/// Identity of one reduced run (test article plus sweep configuration).
///
/// Declaration order is the fixed output order of a reduced dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunId {
    /// Flat plate swept through angle of attack at fixed velocity.
    FlatPlateAngle,
    /// Flat plate swept through velocity at zero angle of attack.
    FlatPlateVelocity,
    HalfSphere,
    InvertedCup,
    Sphere,
}

impl RunId {
    /// All runs in output order.
    pub const ALL: [RunId; 5] = [
        RunId::FlatPlateAngle,
        RunId::FlatPlateVelocity,
        RunId::HalfSphere,
        RunId::InvertedCup,
        RunId::Sphere,
    ];

    /// Stable kebab-case identity.
    pub fn as_str(self) -> &'static str {
        match self {
            RunId::FlatPlateAngle => "flat-plate-angle",
            RunId::FlatPlateVelocity => "flat-plate-velocity",
            RunId::HalfSphere => "half-sphere",
            RunId::InvertedCup => "inverted-cup",
            RunId::Sphere => "sphere",
        }
    }

    /// Position of this run in a reduced dataset.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Physical article tested in this run.
    pub fn article(self) -> ArticleId {
        match self {
            RunId::FlatPlateAngle | RunId::FlatPlateVelocity => ArticleId::FlatPlate,
            RunId::HalfSphere => ArticleId::HalfSphere,
            RunId::InvertedCup => ArticleId::InvertedCup,
            RunId::Sphere => ArticleId::Sphere,
        }
    }

    /// Reduction policy for this run.
    pub fn policy(self) -> RunPolicy {
        match self {
            RunId::FlatPlateAngle => RunPolicy {
                abscissa: AbscissaKind::AngleOfAttackDeg,
                rotate: true,
                article: self.article(),
            },
            _ => RunPolicy {
                abscissa: AbscissaKind::VelocityMps,
                rotate: false,
                article: self.article(),
            },
        }
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        RunId::ALL
            .into_iter()
            .find(|run| run.as_str() == key)
            .ok_or_else(|| Error::UnknownRun(s.to_string()))
    }
}

/// Physical test article. Both flat-plate runs share one article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArticleId {
    FlatPlate,
    HalfSphere,
    InvertedCup,
    Sphere,
}

impl ArticleId {
    /// Stable kebab-case identity.
    pub fn as_str(self) -> &'static str {
        match self {
            ArticleId::FlatPlate => "flat-plate",
            ArticleId::HalfSphere => "half-sphere",
            ArticleId::InvertedCup => "inverted-cup",
            ArticleId::Sphere => "sphere",
        }
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical meaning of a run record's abscissa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbscissaKind {
    /// Angle of attack in degrees.
    AngleOfAttackDeg,
    /// Free-stream velocity in m/s.
    VelocityMps,
}

impl AbscissaKind {
    /// Axis label with units.
    pub fn label(self) -> &'static str {
        match self {
            AbscissaKind::AngleOfAttackDeg => "alpha [deg]",
            AbscissaKind::VelocityMps => "v_inf [m/s]",
        }
    }
}

/// How a run is reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPolicy {
    /// Abscissa of the reduced record.
    pub abscissa: AbscissaKind,
    /// Rotate body-axis forces into the wind axis before normalizing.
    pub rotate: bool,
    /// Article whose geometry drives the moment transfer.
    pub article: ArticleId,
}

/// One ingested balance record set, in raw instrument units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecordSet {
    /// Dynamic pressure (psf).
    pub dynamic_pressure: Vec<f64>,
    /// Normal force (lbf).
    pub normal_force: Vec<f64>,
    /// Axial force (lbf).
    pub axial_force: Vec<f64>,
    /// Pitching moment (in*lbf).
    pub pitching_moment: Vec<f64>,
    /// Angle of attack (deg), when the export carries it.
    pub angle_of_attack: Option<Vec<f64>>,
}

impl RawRecordSet {
    /// Number of samples, taken from the dynamic pressure column.
    pub fn len(&self) -> usize {
        self.dynamic_pressure.len()
    }

    /// Check if there are no samples.
    pub fn is_empty(&self) -> bool {
        self.dynamic_pressure.is_empty()
    }

    /// Check that every present column has the same length.
    ///
    /// `context` prefixes the error message, normally the run identity.
    pub fn check_aligned(&self, context: &str) -> Result<usize> {
        let n = self.len();
        ensure_len(format!("{context}: normal force"), n, self.normal_force.len())?;
        ensure_len(format!("{context}: axial force"), n, self.axial_force.len())?;
        ensure_len(format!("{context}: pitching moment"), n, self.pitching_moment.len())?;
        if let Some(alpha) = &self.angle_of_attack {
            ensure_len(format!("{context}: angle of attack"), n, alpha.len())?;
        }
        Ok(n)
    }
}

/// Raw record sets for a full test campaign, keyed by run.
#[derive(Debug, Clone, Default)]
pub struct RawDataset {
    runs: BTreeMap<RunId, RawRecordSet>,
}

impl RawDataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the record set for a run, replacing any previous one.
    pub fn insert(&mut self, run: RunId, records: RawRecordSet) {
        self.runs.insert(run, records);
    }

    /// Builder-style insert.
    pub fn with_run(mut self, run: RunId, records: RawRecordSet) -> Self {
        self.insert(run, records);
        self
    }

    /// Get the record set for a run.
    pub fn get(&self, run: RunId) -> Option<&RawRecordSet> {
        self.runs.get(&run)
    }

    /// Get the record set for a run, failing if absent.
    pub fn require(&self, run: RunId) -> Result<&RawRecordSet> {
        self.get(run).ok_or(Error::MissingRun(run))
    }

    /// Number of runs present.
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// Check if no runs are present.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

/// A dimensionless coefficient, or the explicit marker for an undefined sample.
///
/// Serializes as a nullable number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum Coefficient {
    Value(f64),
    /// Dynamic pressure was zero at this sample.
    Missing,
}

impl Coefficient {
    /// Get the value if defined.
    #[inline]
    pub fn value(self) -> Option<f64> {
        match self {
            Coefficient::Value(v) => Some(v),
            Coefficient::Missing => None,
        }
    }

    /// Check if this sample is undefined.
    #[inline]
    pub fn is_missing(self) -> bool {
        matches!(self, Coefficient::Missing)
    }
}

impl From<Option<f64>> for Coefficient {
    fn from(v: Option<f64>) -> Self {
        v.map_or(Coefficient::Missing, Coefficient::Value)
    }
}

impl From<Coefficient> for Option<f64> {
    fn from(c: Coefficient) -> Self {
        c.value()
    }
}

/// Reduced result for one run.
///
/// All sequences are index-aligned and share one length; the constructor
/// enforces this and the record is read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunRecord {
    run: RunId,
    abscissa_kind: AbscissaKind,
    abscissa: Vec<f64>,
    normal_force: Vec<f64>,
    axial_force: Vec<f64>,
    pitching_moment: Vec<f64>,
    lift_coefficient: Vec<Coefficient>,
    drag_coefficient: Vec<Coefficient>,
}

impl RunRecord {
    /// Assemble a record, checking that all sequences are aligned.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        run: RunId,
        abscissa_kind: AbscissaKind,
        abscissa: Vec<f64>,
        normal_force: Vec<f64>,
        axial_force: Vec<f64>,
        pitching_moment: Vec<f64>,
        lift_coefficient: Vec<Coefficient>,
        drag_coefficient: Vec<Coefficient>,
    ) -> Result<Self> {
        let n = abscissa.len();
        ensure_len(format!("{run}: normal force"), n, normal_force.len())?;
        ensure_len(format!("{run}: axial force"), n, axial_force.len())?;
        ensure_len(format!("{run}: pitching moment"), n, pitching_moment.len())?;
        ensure_len(format!("{run}: lift coefficient"), n, lift_coefficient.len())?;
        ensure_len(format!("{run}: drag coefficient"), n, drag_coefficient.len())?;

        Ok(Self {
            run,
            abscissa_kind,
            abscissa,
            normal_force,
            axial_force,
            pitching_moment,
            lift_coefficient,
            drag_coefficient,
        })
    }

    pub fn run(&self) -> RunId {
        self.run
    }

    pub fn abscissa_kind(&self) -> AbscissaKind {
        self.abscissa_kind
    }

    /// Angle of attack (deg) or free-stream velocity (m/s), per `abscissa_kind`.
    pub fn abscissa(&self) -> &[f64] {
        &self.abscissa
    }

    /// Normal force (N).
    pub fn normal_force(&self) -> &[f64] {
        &self.normal_force
    }

    /// Axial force (N).
    pub fn axial_force(&self) -> &[f64] {
        &self.axial_force
    }

    /// Pitching moment about the common reference point (N*m).
    pub fn pitching_moment(&self) -> &[f64] {
        &self.pitching_moment
    }

    pub fn lift_coefficient(&self) -> &[Coefficient] {
        &self.lift_coefficient
    }

    pub fn drag_coefficient(&self) -> &[Coefficient] {
        &self.drag_coefficient
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.abscissa.len()
    }

    /// Check if the record has no samples.
    pub fn is_empty(&self) -> bool {
        self.abscissa.is_empty()
    }
}

/// The five reduced runs, in [`RunId::ALL`] order.
#[derive(Debug, Clone, Serialize)]
pub struct ReducedDataset {
    records: Vec<RunRecord>,
}

impl ReducedDataset {
    /// Wrap records that are already in output order.
    pub fn new(records: Vec<RunRecord>) -> Result<Self> {
        ensure_len("reduced dataset: runs", RunId::ALL.len(), records.len())?;
        for (expected, record) in RunId::ALL.iter().zip(&records) {
            if record.run() != *expected {
                return Err(Error::data(format!(
                    "reduced dataset out of order: expected {expected} at position {}, found {}",
                    expected.index(),
                    record.run()
                )));
            }
        }
        Ok(Self { records })
    }

    /// Records by position.
    pub fn records(&self) -> &[RunRecord] {
        &self.records
    }

    /// Record for a run.
    pub fn get(&self, run: RunId) -> &RunRecord {
        &self.records[run.index()]
    }

    /// Consume into the ordered records.
    pub fn into_records(self) -> Vec<RunRecord> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(run: RunId, n: usize) -> RunRecord {
        RunRecord::new(
            run,
            run.policy().abscissa,
            vec![0.0; n],
            vec![0.0; n],
            vec![0.0; n],
            vec![0.0; n],
            vec![Coefficient::Missing; n],
            vec![Coefficient::Value(1.0); n],
        )
        .unwrap()
    }

    #[test]
    fn test_run_id_round_trip() {
        for run in RunId::ALL {
            assert_eq!(run.as_str().parse::<RunId>().unwrap(), run);
        }
        assert_eq!("Half Sphere".parse::<RunId>().unwrap(), RunId::HalfSphere);
        assert_eq!("inverted_cup".parse::<RunId>().unwrap(), RunId::InvertedCup);
    }

    #[test]
    fn test_unknown_run() {
        let err = "cylinder".parse::<RunId>().unwrap_err();
        assert!(matches!(err, Error::UnknownRun(ref s) if s == "cylinder"));
    }

    #[test]
    fn test_policy_table() {
        let angle = RunId::FlatPlateAngle.policy();
        assert!(angle.rotate);
        assert_eq!(angle.abscissa, AbscissaKind::AngleOfAttackDeg);

        for run in &RunId::ALL[1..] {
            let policy = run.policy();
            assert!(!policy.rotate);
            assert_eq!(policy.abscissa, AbscissaKind::VelocityMps);
        }

        assert_eq!(RunId::FlatPlateVelocity.article(), ArticleId::FlatPlate);
        assert_eq!(RunId::Sphere.article(), ArticleId::Sphere);
    }

    #[test]
    fn test_coefficient_serializes_as_nullable() {
        let coeffs = vec![Coefficient::Value(2.5), Coefficient::Missing];
        let json = serde_json::to_string(&coeffs).unwrap();
        assert_eq!(json, "[2.5,null]");

        let back: Vec<Coefficient> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, coeffs);
    }

    #[test]
    fn test_run_record_rejects_misaligned() {
        let err = RunRecord::new(
            RunId::Sphere,
            AbscissaKind::VelocityMps,
            vec![1.0, 2.0],
            vec![1.0, 2.0],
            vec![1.0],
            vec![1.0, 2.0],
            vec![Coefficient::Missing; 2],
            vec![Coefficient::Missing; 2],
        )
        .unwrap_err();
        assert!(err.to_string().contains("sphere: axial force"));
    }

    #[test]
    fn test_raw_record_set_alignment() {
        let mut raw = RawRecordSet {
            dynamic_pressure: vec![1.0, 2.0],
            normal_force: vec![1.0, 2.0],
            axial_force: vec![1.0, 2.0],
            pitching_moment: vec![1.0, 2.0],
            angle_of_attack: Some(vec![0.0]),
        };
        let err = raw.check_aligned("flat-plate-angle").unwrap_err();
        assert!(err.to_string().contains("flat-plate-angle: angle of attack"));

        raw.angle_of_attack = None;
        assert_eq!(raw.check_aligned("flat-plate-angle").unwrap(), 2);
    }

    #[test]
    fn test_reduced_dataset_order() {
        let records: Vec<RunRecord> = RunId::ALL.iter().map(|&r| record(r, 3)).collect();
        let dataset = ReducedDataset::new(records).unwrap();
        assert_eq!(dataset.get(RunId::InvertedCup).run(), RunId::InvertedCup);
        assert_eq!(dataset.records()[0].run(), RunId::FlatPlateAngle);

        let mut shuffled: Vec<RunRecord> = RunId::ALL.iter().map(|&r| record(r, 1)).collect();
        shuffled.swap(1, 2);
        assert!(ReducedDataset::new(shuffled).is_err());
    }

    #[test]
    fn test_raw_dataset_require() {
        let dataset = RawDataset::new().with_run(RunId::Sphere, RawRecordSet::default());
        assert!(dataset.require(RunId::Sphere).is_ok());
        assert!(matches!(
            dataset.require(RunId::HalfSphere),
            Err(Error::MissingRun(RunId::HalfSphere))
        ));
    }
}
