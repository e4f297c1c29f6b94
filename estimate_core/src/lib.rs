//! # estimate_core - Construction Cost Estimation Engine
//!
//! `estimate_core` prices a house construction project from a handful of
//! quantities (built-up area, floors, fixture counts, quality grades) and keeps
//! named snapshots of past estimates. All inputs and outputs are
//! JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless pricing**: `calculate` is a pure function, recomputed on every change
//! - **Snapshots, not live views**: a saved total is what the rates gave at save time
//! - **Fail-open reads**: a damaged store reads as empty instead of erroring
//!
//! ## Quick Start
//!
//! ```rust
//! use estimate_core::calculations::calculate;
//! use estimate_core::project::ProjectConfiguration;
//!
//! let config = ProjectConfiguration::default();
//! let breakdown = calculate(&config);
//! assert_eq!(breakdown.total, 2_389_000.0);
//! ```
//!
//! ## Modules
//!
//! - [`rates`] - Quality grades, flooring materials and the unit-rate table
//! - [`project`] - Project configuration and saved snapshots
//! - [`calculations`] - Cost breakdown and area suggestions
//! - [`store`] - Saved-project repository over key-value storage
//! - [`file_io`] - File-backed storage with atomic writes and locking
//! - [`format`] - Rupee formatting and amounts in words
//! - [`report`] / [`pdf`] - Export reports
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod errors;
#[cfg(not(target_arch = "wasm32"))]
pub mod file_io;
pub mod format;
pub mod pdf;
pub mod project;
pub mod rates;
pub mod report;
pub mod store;

// Re-export commonly used types at crate root for convenience
pub use calculations::{calculate, suggest_related_areas, CostBreakdown};
pub use errors::{EstimateError, EstimateResult};
#[cfg(not(target_arch = "wasm32"))]
pub use file_io::FileStorage;
pub use project::{ProjectConfiguration, SavedProject};
pub use rates::{FlooringMaterial, QualityGrade, RATES};
pub use store::{KeyValueStorage, MemoryStorage, ProjectStore};
