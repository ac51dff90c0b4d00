//! Core types and configuration for the wind-tunnel data reduction system.
//!
//! This crate provides shared types used across all other crates:
//! - Run and test-article identities, article geometry
//! - Raw balance record sets and reduced run records
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod geometry;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use geometry::{ArticleGeometry, GeometryTable};
pub use types::*;
