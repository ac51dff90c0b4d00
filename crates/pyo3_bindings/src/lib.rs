//! PyO3 bindings for the wind-tunnel data reduction pipeline.
//!
//! Exposes the Rust reduction to Python, where plotting and smoothing live:
//! - Reduced run records
//! - Scalar and series conversions
//! - Single-run and whole-directory reduction

use std::path::PathBuf;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use tunnel_core::{
    AbscissaKind, Config as RustConfig, Error as RustError, RawRecordSet, RunId,
    RunRecord as RustRunRecord,
};
use tunnel_ingestion::load_dataset;
use tunnel_reduction::{CoefficientNormalizer, DatasetReducer, ForceFrameRotator, UnitConverter};

fn to_py_err(err: RustError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

// ============================================================================
// Python-exposed Types
// ============================================================================

/// Reduced result for one run.
#[pyclass(name = "RunRecord", frozen)]
#[derive(Clone)]
pub struct RunRecord {
    inner: RustRunRecord,
}

#[pymethods]
impl RunRecord {
    /// Run identity, e.g. "flat-plate-angle".
    #[getter]
    fn run(&self) -> &'static str {
        self.inner.run().as_str()
    }

    /// "angle_of_attack_deg" or "velocity_mps".
    #[getter]
    fn abscissa_kind(&self) -> &'static str {
        match self.inner.abscissa_kind() {
            AbscissaKind::AngleOfAttackDeg => "angle_of_attack_deg",
            AbscissaKind::VelocityMps => "velocity_mps",
        }
    }

    #[getter]
    fn abscissa(&self) -> Vec<f64> {
        self.inner.abscissa().to_vec()
    }

    #[getter]
    fn normal_force(&self) -> Vec<f64> {
        self.inner.normal_force().to_vec()
    }

    #[getter]
    fn axial_force(&self) -> Vec<f64> {
        self.inner.axial_force().to_vec()
    }

    #[getter]
    fn pitching_moment(&self) -> Vec<f64> {
        self.inner.pitching_moment().to_vec()
    }

    /// Lift coefficients; None where dynamic pressure was zero.
    #[getter]
    fn lift_coefficient(&self) -> Vec<Option<f64>> {
        self.inner.lift_coefficient().iter().map(|c| c.value()).collect()
    }

    /// Drag coefficients; None where dynamic pressure was zero.
    #[getter]
    fn drag_coefficient(&self) -> Vec<Option<f64>> {
        self.inner.drag_coefficient().iter().map(|c| c.value()).collect()
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "RunRecord(run={}, abscissa={}, samples={})",
            self.inner.run(),
            self.inner.abscissa_kind().label(),
            self.inner.len()
        )
    }
}

impl From<RustRunRecord> for RunRecord {
    fn from(inner: RustRunRecord) -> Self {
        RunRecord { inner }
    }
}

/// Dataset reducer wrapper for Python.
#[pyclass(name = "DatasetReducer")]
pub struct PyDatasetReducer {
    inner: DatasetReducer,
    config: RustConfig,
}

#[pymethods]
impl PyDatasetReducer {
    #[new]
    fn new() -> Self {
        PyDatasetReducer {
            inner: DatasetReducer::default(),
            config: RustConfig::default(),
        }
    }

    /// Create from a JSON configuration file.
    #[staticmethod]
    fn from_config_file(path: PathBuf) -> PyResult<Self> {
        let config = RustConfig::from_json_file(&path).map_err(to_py_err)?;
        let inner = DatasetReducer::new(&config).map_err(to_py_err)?;
        Ok(PyDatasetReducer { inner, config })
    }

    /// Reduce one run from raw instrument-unit columns.
    #[pyo3(signature = (run, dynamic_pressure, normal_force, axial_force, pitching_moment, angle_of_attack=None))]
    fn reduce_run(
        &self,
        run: &str,
        dynamic_pressure: Vec<f64>,
        normal_force: Vec<f64>,
        axial_force: Vec<f64>,
        pitching_moment: Vec<f64>,
        angle_of_attack: Option<Vec<f64>>,
    ) -> PyResult<RunRecord> {
        let run: RunId = run.parse().map_err(to_py_err)?;
        let raw = RawRecordSet {
            dynamic_pressure,
            normal_force,
            axial_force,
            pitching_moment,
            angle_of_attack,
        };
        self.inner
            .reduce_run(run, &raw)
            .map(RunRecord::from)
            .map_err(to_py_err)
    }

    /// Load and reduce all five runs from a data directory, in fixed order.
    fn reduce_directory(&self, path: PathBuf) -> PyResult<Vec<RunRecord>> {
        let dataset = load_dataset(&path, &self.config.ingestion).map_err(to_py_err)?;
        let reduced = self.inner.reduce(&dataset).map_err(to_py_err)?;
        Ok(reduced.into_records().into_iter().map(RunRecord::from).collect())
    }
}

// ============================================================================
// Module Functions
// ============================================================================

/// Free-stream velocity (m/s) from dynamic pressure (Pa) at standard lab conditions.
#[pyfunction]
fn dynamic_pressure_to_velocity(q_pa: f64) -> f64 {
    UnitConverter::default().dynamic_pressure_to_velocity(q_pa)
}

/// Force series to coefficients; None where dynamic pressure is zero.
#[pyfunction]
#[pyo3(signature = (force, dynamic_pressure, reference_area=0.01))]
fn to_coefficient(
    force: Vec<f64>,
    dynamic_pressure: Vec<f64>,
    reference_area: f64,
) -> PyResult<Vec<Option<f64>>> {
    let coeffs = CoefficientNormalizer::new(reference_area)
        .to_coefficients(&force, &dynamic_pressure)
        .map_err(to_py_err)?;
    Ok(coeffs.into_iter().map(|c| c.value()).collect())
}

/// Rotate normal/axial forces into (lift, drag).
#[pyfunction]
fn to_lift_drag(
    normal: Vec<f64>,
    axial: Vec<f64>,
    alpha_deg: Vec<f64>,
) -> PyResult<(Vec<f64>, Vec<f64>)> {
    let wind = ForceFrameRotator::to_lift_drag(&normal, &axial, &alpha_deg).map_err(to_py_err)?;
    Ok((wind.lift, wind.drag))
}

/// Reduce one run with the default configuration.
#[pyfunction]
#[pyo3(signature = (run, dynamic_pressure, normal_force, axial_force, pitching_moment, angle_of_attack=None))]
fn reduce_run(
    run: &str,
    dynamic_pressure: Vec<f64>,
    normal_force: Vec<f64>,
    axial_force: Vec<f64>,
    pitching_moment: Vec<f64>,
    angle_of_attack: Option<Vec<f64>>,
) -> PyResult<RunRecord> {
    PyDatasetReducer::new().reduce_run(
        run,
        dynamic_pressure,
        normal_force,
        axial_force,
        pitching_moment,
        angle_of_attack,
    )
}

/// Reduce a data directory with the default configuration.
#[pyfunction]
fn reduce_directory(path: PathBuf) -> PyResult<Vec<RunRecord>> {
    PyDatasetReducer::new().reduce_directory(path)
}

// ============================================================================
// Module Definition
// ============================================================================

/// Wind-tunnel data reduction - Rust core for Python.
#[pymodule]
fn windtunnel_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Types
    m.add_class::<RunRecord>()?;
    m.add_class::<PyDatasetReducer>()?;

    // Functions
    m.add_function(wrap_pyfunction!(dynamic_pressure_to_velocity, m)?)?;
    m.add_function(wrap_pyfunction!(to_coefficient, m)?)?;
    m.add_function(wrap_pyfunction!(to_lift_drag, m)?)?;
    m.add_function(wrap_pyfunction!(reduce_run, m)?)?;
    m.add_function(wrap_pyfunction!(reduce_directory, m)?)?;

    Ok(())
}
