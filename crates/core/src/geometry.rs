//! Per-article geometric constants.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::ArticleId;

/// Geometry of one test article, in millimetres as measured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArticleGeometry {
    /// Article this entry describes.
    pub article: ArticleId,
    /// Reference diameter D (mm).
    pub reference_diameter_mm: f64,
    /// Moment arm offset B (mm).
    pub moment_arm_offset_mm: f64,
}

impl ArticleGeometry {
    /// Reference diameter in metres.
    #[inline]
    pub fn reference_diameter_m(&self) -> f64 {
        self.reference_diameter_mm / 1000.0
    }

    /// Moment arm offset in metres.
    #[inline]
    pub fn moment_arm_offset_m(&self) -> f64 {
        self.moment_arm_offset_mm / 1000.0
    }

    /// Measured geometry of the four campaign articles.
    pub fn standard() -> Vec<ArticleGeometry> {
        vec![
            ArticleGeometry {
                article: ArticleId::FlatPlate,
                reference_diameter_mm: 74.82,
                moment_arm_offset_mm: 98.42,
            },
            ArticleGeometry {
                article: ArticleId::HalfSphere,
                reference_diameter_mm: 75.48,
                moment_arm_offset_mm: 99.27,
            },
            ArticleGeometry {
                article: ArticleId::InvertedCup,
                reference_diameter_mm: 75.40,
                moment_arm_offset_mm: 127.00,
            },
            ArticleGeometry {
                article: ArticleId::Sphere,
                reference_diameter_mm: 76.21,
                moment_arm_offset_mm: 146.92,
            },
        ]
    }
}

/// Immutable lookup from article identity to geometry.
#[derive(Debug, Clone)]
pub struct GeometryTable {
    entries: BTreeMap<ArticleId, ArticleGeometry>,
}

impl GeometryTable {
    /// Build a table, rejecting duplicate or non-finite entries.
    pub fn from_entries(entries: &[ArticleGeometry]) -> Result<Self> {
        let mut map = BTreeMap::new();
        for entry in entries {
            if !entry.reference_diameter_mm.is_finite() || entry.reference_diameter_mm <= 0.0 {
                return Err(Error::config(format!(
                    "reference diameter for {} must be positive, got {}",
                    entry.article, entry.reference_diameter_mm
                )));
            }
            if !entry.moment_arm_offset_mm.is_finite() {
                return Err(Error::config(format!(
                    "moment arm offset for {} must be finite",
                    entry.article
                )));
            }
            if map.insert(entry.article, *entry).is_some() {
                return Err(Error::config(format!(
                    "duplicate geometry entry for {}",
                    entry.article
                )));
            }
        }
        Ok(Self { entries: map })
    }

    /// Table of the four campaign articles.
    pub fn standard() -> Self {
        let entries = ArticleGeometry::standard()
            .into_iter()
            .map(|g| (g.article, g))
            .collect();
        Self { entries }
    }

    /// Look up an article's geometry.
    pub fn get(&self, article: ArticleId) -> Result<&ArticleGeometry> {
        self.entries
            .get(&article)
            .ok_or_else(|| Error::UnknownArticle(article.to_string()))
    }

    /// Number of registered articles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no articles are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for GeometryTable {
    fn default() -> Self {
        Self::standard()
    }
}
