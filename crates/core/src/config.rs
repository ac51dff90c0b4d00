//! Configuration structures for the wind-tunnel data reduction system.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{ArticleGeometry, GeometryTable};
use crate::types::RunId;

/// Main configuration for the reduction pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ambient conditions for the velocity computation.
    pub ambient: AmbientConfig,
    /// Reduction constants.
    pub reduction: ReductionConfig,
    /// Per-article geometry.
    pub geometry: Vec<ArticleGeometry>,
    /// Ingestion layout.
    pub ingestion: IngestionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ambient: AmbientConfig::default(),
            reduction: ReductionConfig::default(),
            geometry: ArticleGeometry::standard(),
            ingestion: IngestionConfig::default(),
        }
    }
}

impl Config {
    /// Load a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Parse a configuration from JSON. Omitted fields take their defaults.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject physically meaningless settings.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("ambient.temperature_k", self.ambient.temperature_k),
            ("ambient.pressure_pa", self.ambient.pressure_pa),
            ("ambient.gas_constant", self.ambient.gas_constant),
            ("reduction.reference_area_m2", self.reduction.reference_area_m2),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::config(format!("{name} must be positive, got {value}")));
            }
        }
        if !self.reduction.instrument_offset_m.is_finite() {
            return Err(Error::config("reduction.instrument_offset_m must be finite"));
        }
        if let Some(tol) = self.reduction.velocity_alpha_tolerance_deg {
            if !tol.is_finite() || tol < 0.0 {
                return Err(Error::config(format!(
                    "reduction.velocity_alpha_tolerance_deg must be non-negative, got {tol}"
                )));
            }
        }
        self.geometry_table()?;
        Ok(())
    }

    /// Build the immutable geometry lookup.
    pub fn geometry_table(&self) -> Result<GeometryTable> {
        GeometryTable::from_entries(&self.geometry)
    }
}

/// Ambient conditions during the test.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    /// Static temperature (K).
    pub temperature_k: f64,
    /// Static pressure (Pa).
    pub pressure_pa: f64,
    /// Specific gas constant for air (J/(kg*K)).
    pub gas_constant: f64,
}

impl AmbientConfig {
    /// Air density from the ideal gas law (kg/m^3).
    pub fn density(&self) -> f64 {
        self.pressure_pa / (self.gas_constant * self.temperature_k)
    }
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            temperature_k: 296.15,
            pressure_pa: 100_914.0,
            gas_constant: 287.0,
        }
    }
}

/// Constants of the reduction itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReductionConfig {
    /// Reference area for coefficients (m^2).
    pub reference_area_m2: f64,
    /// Fixed balance-to-mount offset A (m).
    pub instrument_offset_m: f64,
    /// Largest |alpha| accepted in a velocity-sweep run (deg). `None` skips the check.
    pub velocity_alpha_tolerance_deg: Option<f64>,
}

impl Default for ReductionConfig {
    fn default() -> Self {
        Self {
            reference_area_m2: 0.01,
            instrument_offset_m: 0.028829,
            velocity_alpha_tolerance_deg: Some(2.0),
        }
    }
}

/// Layout of the balance export files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    /// Zero-based rows dropped before parsing. The first kept row is the header.
    pub skip_rows: Vec<usize>,
    /// Field delimiter.
    pub delimiter: char,
    /// Column names.
    pub columns: ColumnNames,
    /// File name per run, relative to the data directory.
    pub files: RunFiles,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            skip_rows: vec![0, 1, 2, 3, 4, 5, 6, 8],
            delimiter: ',',
            columns: ColumnNames::default(),
            files: RunFiles::default(),
        }
    }
}

/// Header names of the balance export columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub dynamic_pressure: String,
    pub normal_force: String,
    pub axial_force: String,
    pub pitching_moment: String,
    pub angle_of_attack: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            dynamic_pressure: "q".to_string(),
            normal_force: "NF/SF".to_string(),
            axial_force: "AF/AF2".to_string(),
            pitching_moment: "PM/YM".to_string(),
            angle_of_attack: "Alpha".to_string(),
        }
    }
}

/// File name of each run's export.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunFiles {
    pub flat_plate_angle: String,
    pub flat_plate_velocity: String,
    pub half_sphere: String,
    pub inverted_cup: String,
    pub sphere: String,
}

impl RunFiles {
    /// File name for a run.
    pub fn for_run(&self, run: RunId) -> &str {
        match run {
            RunId::FlatPlateAngle => &self.flat_plate_angle,
            RunId::FlatPlateVelocity => &self.flat_plate_velocity,
            RunId::HalfSphere => &self.half_sphere,
            RunId::InvertedCup => &self.inverted_cup,
            RunId::Sphere => &self.sphere,
        }
    }
}

impl Default for RunFiles {
    fn default() -> Self {
        Self {
            flat_plate_angle: "Flat Plate Angle.csv".to_string(),
            flat_plate_velocity: "Flat Plate Velocity.csv".to_string(),
            half_sphere: "Half Sphere.csv".to_string(),
            inverted_cup: "Inverted Cup.csv".to_string(),
            sphere: "Sphere.csv".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.reduction.reference_area_m2, 0.01);
        assert_eq!(config.ambient.temperature_k, 296.15);
        assert_eq!(config.ingestion.columns.normal_force, "NF/SF");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_density() {
        let ambient = AmbientConfig::default();
        // 100914 / (287 * 296.15)
        assert_relative_eq!(ambient.density(), 1.187_293, epsilon = 1e-5);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = Config::from_json_str(
            r#"{ "reduction": { "velocity_alpha_tolerance_deg": null } }"#,
        )
        .unwrap();
        assert!(config.reduction.velocity_alpha_tolerance_deg.is_none());
        assert_eq!(config.reduction.reference_area_m2, 0.01);
        assert_eq!(config.geometry.len(), 4);
        assert_eq!(config.ingestion.files.for_run(RunId::Sphere), "Sphere.csv");
    }

    #[test]
    fn test_rejects_non_positive_area() {
        let err = Config::from_json_str(r#"{ "reduction": { "reference_area_m2": 0.0 } }"#)
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_json_file() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(br#"{ "ambient": { "temperature_k": 300.0 } }"#)
            .unwrap();
        let config = Config::from_json_file(temp.path()).unwrap();
        assert_eq!(config.ambient.temperature_k, 300.0);
        assert_eq!(config.ambient.pressure_pa, 100_914.0);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Config::from_json_str("{ not json"),
            Err(Error::Json(_))
        ));
    }
}
