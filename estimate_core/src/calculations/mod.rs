//! # Cost Calculations
//!
//! Pricing follows the pattern used across this crate:
//!
//! - `ProjectConfiguration` - Input (JSON-serializable)
//! - `CostBreakdown` - Result (JSON-serializable)
//! - `calculate(input) -> CostBreakdown` - Pure calculation function
//!
//! The breakdown is never cached. Callers recompute it after every change to
//! the configuration.
//!
//! ## Available Calculations
//!
//! - [`cost`] - Six-category construction cost breakdown and area suggestions

pub mod cost;

pub use cost::{
    calculate, calculate_validated, civil_unit_rate, suggest_related_areas, CostBreakdown, CostCategory, LineItem,
    RelatedAreas,
};
