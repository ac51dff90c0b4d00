//! Run summaries.
//!
//! Condenses a reduced run into a handful of diagnostic figures.

use serde::Serialize;
use statrs::statistics::Statistics;
use tunnel_core::{AbscissaKind, Coefficient, RunId, RunRecord};

/// Mean and spread of the defined samples of a coefficient series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CoefficientStats {
    /// Number of defined samples.
    pub defined: usize,
    /// Number of missing samples.
    pub missing: usize,
    /// Mean of defined samples.
    pub mean: Option<f64>,
    /// Sample standard deviation of defined samples (needs two or more).
    pub std_dev: Option<f64>,
}

impl CoefficientStats {
    /// Compute stats over a coefficient series.
    pub fn from_series(series: &[Coefficient]) -> Self {
        let values: Vec<f64> = series.iter().filter_map(|c| c.value()).collect();
        let defined = values.len();

        Self {
            defined,
            missing: series.len() - defined,
            mean: (defined > 0).then(|| values.iter().mean()),
            std_dev: (defined > 1).then(|| values.iter().std_dev()),
        }
    }
}

/// Summary of one reduced run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run: RunId,
    pub abscissa_kind: AbscissaKind,
    /// Number of samples.
    pub samples: usize,
    /// Smallest abscissa value.
    pub abscissa_min: Option<f64>,
    /// Largest abscissa value.
    pub abscissa_max: Option<f64>,
    pub lift: CoefficientStats,
    pub drag: CoefficientStats,
    /// Largest |pitching moment| (N*m).
    pub peak_moment: Option<f64>,
}

impl RunSummary {
    /// Summarize a reduced run.
    pub fn from_record(record: &RunRecord) -> Self {
        let non_empty = !record.is_empty();

        Self {
            run: record.run(),
            abscissa_kind: record.abscissa_kind(),
            samples: record.len(),
            abscissa_min: non_empty.then(|| record.abscissa().min()),
            abscissa_max: non_empty.then(|| record.abscissa().max()),
            lift: CoefficientStats::from_series(record.lift_coefficient()),
            drag: CoefficientStats::from_series(record.drag_coefficient()),
            peak_moment: non_empty.then(|| record.pitching_moment().abs_max()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn record(abscissa: Vec<f64>, lift: Vec<Coefficient>, moment: Vec<f64>) -> RunRecord {
        let n = abscissa.len();
        RunRecord::new(
            RunId::Sphere,
            AbscissaKind::VelocityMps,
            abscissa,
            vec![0.0; n],
            vec![0.0; n],
            moment,
            lift,
            vec![Coefficient::Missing; n],
        )
        .unwrap()
    }

    #[test]
    fn test_summary() {
        let summary = RunSummary::from_record(&record(
            vec![3.0, 1.0, 2.0],
            vec![
                Coefficient::Missing,
                Coefficient::Value(2.0),
                Coefficient::Value(4.0),
            ],
            vec![0.1, -0.5, 0.2],
        ));

        assert_eq!(summary.samples, 3);
        assert_eq!(summary.abscissa_min, Some(1.0));
        assert_eq!(summary.abscissa_max, Some(3.0));
        assert_eq!(summary.lift.defined, 2);
        assert_eq!(summary.lift.missing, 1);
        assert_relative_eq!(summary.lift.mean.unwrap(), 3.0);
        // Sample std dev of [2, 4]
        assert_relative_eq!(summary.lift.std_dev.unwrap(), 2.0_f64.sqrt(), epsilon = 1e-12);
        assert_eq!(summary.drag.defined, 0);
        assert!(summary.drag.mean.is_none());
        assert_relative_eq!(summary.peak_moment.unwrap(), 0.5);
    }

    #[test]
    fn test_empty_record() {
        let summary = RunSummary::from_record(&record(vec![], vec![], vec![]));
        assert_eq!(summary.samples, 0);
        assert!(summary.abscissa_min.is_none());
        assert!(summary.peak_moment.is_none());
        assert_eq!(summary.lift, CoefficientStats::default());
    }

    #[test]
    fn test_single_defined_sample_has_no_spread() {
        let stats = CoefficientStats::from_series(&[Coefficient::Value(1.5)]);
        assert_eq!(stats.mean, Some(1.5));
        assert!(stats.std_dev.is_none());
    }
}
