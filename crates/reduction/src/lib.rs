//! Data reduction for the wind-tunnel force balance.
//!
//! This crate handles:
//! - Unit conversion and dynamic pressure to velocity
//! - Body-axis to wind-axis force rotation
//! - Force to coefficient normalization
//! - Pitching moment reference transfer
//! - Per-run orchestration and run summaries

pub mod coefficient;
pub mod moment;
pub mod reducer;
pub mod rotation;
pub mod summary;
pub mod units;

pub use coefficient::CoefficientNormalizer;
pub use moment::MomentReferenceTransfer;
pub use reducer::DatasetReducer;
pub use rotation::{ForceFrameRotator, LiftDrag};
pub use summary::RunSummary;
pub use units::UnitConverter;
