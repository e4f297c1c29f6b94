//! # Construction Cost Calculation
//!
//! Prices a [`ProjectConfiguration`] against the process-wide [`RATES`]
//! table.
//!
//! ## Formulas
//!
//! - Civil = area x floors x rate, where rate is the custom rate when it is
//!   above zero, else the grade rate
//! - Painting = painting area x grade rate
//! - Flooring = flooring area x material rate
//! - Electrical = civil area x flat rate
//! - Plumbing = toilets x toilet rate + kitchens x kitchen rate
//! - Openings = doors x door rate + windows x window rate
//!
//! Inputs are not validated: a negative area yields a negative line. Use
//! [`calculate_validated`] to reject such input first.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::calculations::calculate;
//! use estimate_core::project::ProjectConfiguration;
//!
//! let breakdown = calculate(&ProjectConfiguration::default());
//! assert_eq!(breakdown.total, 2_389_000.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::EstimateResult;
use crate::project::{CivilInput, ProjectConfiguration};
use crate::rates::{FlooringMaterial, QualityGrade, RATES};

/// Painting surface per sq.ft of built-up area
const PAINT_TO_BUILT_UP_RATIO: f64 = 3.5;
/// Floor finish per sq.ft of built-up area (carpet share)
const FLOOR_TO_BUILT_UP_RATIO: f64 = 0.9;

/// Cost categories in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CostCategory {
    Civil,
    Painting,
    Flooring,
    Electrical,
    Plumbing,
    #[serde(rename = "doorsWindows")]
    Openings,
}

impl CostCategory {
    pub const ALL: [CostCategory; 6] = [
        CostCategory::Civil,
        CostCategory::Painting,
        CostCategory::Flooring,
        CostCategory::Electrical,
        CostCategory::Plumbing,
        CostCategory::Openings,
    ];

    /// Report label
    pub fn label(&self) -> &'static str {
        match self {
            CostCategory::Civil => "Civil Structure",
            CostCategory::Painting => "Finishing (Paint)",
            CostCategory::Flooring => "Flooring",
            CostCategory::Electrical => "Electrical Systems",
            CostCategory::Plumbing => "Plumbing & Sanitary",
            CostCategory::Openings => "Openings (Doors/Windows)",
        }
    }

    /// Compact label for tables
    pub fn short_label(&self) -> &'static str {
        match self {
            CostCategory::Civil => "Civil",
            CostCategory::Painting => "Paint",
            CostCategory::Flooring => "Floor",
            CostCategory::Electrical => "Elec",
            CostCategory::Plumbing => "Plumb",
            CostCategory::Openings => "D&W",
        }
    }
}

impl std::fmt::Display for CostCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One priced category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub category: CostCategory,
    pub amount: f64,
}

/// Result of pricing a configuration.
///
/// ## JSON Example
///
/// ```json
/// {
///   "civilWork": 1850000.0,
///   "painting": 98000.0,
///   "flooring": 108000.0,
///   "electrical": 180000.0,
///   "plumbing": 65000.0,
///   "doorsWindows": 88000.0,
///   "total": 2389000.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub civil_work: f64,
    pub painting: f64,
    pub flooring: f64,
    pub electrical: f64,
    pub plumbing: f64,
    #[serde(rename = "doorsWindows")]
    pub openings: f64,
    /// Sum of the six lines, with no rounding in between
    pub total: f64,
}

impl CostBreakdown {
    /// Amount for a single category
    pub fn amount(&self, category: CostCategory) -> f64 {
        match category {
            CostCategory::Civil => self.civil_work,
            CostCategory::Painting => self.painting,
            CostCategory::Flooring => self.flooring,
            CostCategory::Electrical => self.electrical,
            CostCategory::Plumbing => self.plumbing,
            CostCategory::Openings => self.openings,
        }
    }

    /// All six lines in report order
    pub fn line_items(&self) -> Vec<LineItem> {
        CostCategory::ALL
            .iter()
            .map(|&category| LineItem {
                category,
                amount: self.amount(category),
            })
            .collect()
    }

    /// Average cost per sq.ft of built-up area. An area of zero is treated as 1.
    pub fn cost_per_sqft(&self, civil_area: f64) -> f64 {
        let area = if civil_area == 0.0 { 1.0 } else { civil_area };
        self.total / area
    }
}

/// Suggested dependent areas for a built-up area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedAreas {
    pub painting_area: f64,
    pub painting_quality: QualityGrade,
    pub flooring_area: f64,
    pub flooring_material: FlooringMaterial,
}

/// Unit rate applied to the civil line.
///
/// A custom rate above zero wins over the grade rate regardless of how it
/// compares to the preset rates.
pub fn civil_unit_rate(civil: &CivilInput) -> f64 {
    civil
        .effective_custom_rate()
        .unwrap_or_else(|| RATES.civil(civil.quality))
}

/// Price a configuration.
///
/// # Arguments
///
/// * `config` - Category inputs
///
/// # Returns
///
/// The six category costs and their sum. Never fails.
pub fn calculate(config: &ProjectConfiguration) -> CostBreakdown {
    let rates = &*RATES;

    let civil_work = config.civil.area * config.civil.floors * civil_unit_rate(&config.civil);
    let painting = config.painting.area * rates.painting(config.painting.quality);
    let flooring = config.flooring.area * rates.flooring(config.flooring.material);
    // Electrical is priced off the civil area, not electrical.area
    let electrical = config.civil.area * rates.electrical;
    let plumbing = config.plumbing.toilets * rates.toilet + config.plumbing.kitchens * rates.kitchen;
    let openings = config.openings.doors * rates.door + config.openings.windows * rates.window;

    CostBreakdown {
        civil_work,
        painting,
        flooring,
        electrical,
        plumbing,
        openings,
        total: civil_work + painting + flooring + electrical + plumbing + openings,
    }
}

/// Validate the configuration, then price it.
///
/// # Errors
///
/// * `EstimateError::InvalidInput` - a quantity is negative or not finite
pub fn calculate_validated(config: &ProjectConfiguration) -> EstimateResult<CostBreakdown> {
    config.validate()?;
    Ok(calculate(config))
}

/// Suggest painting and flooring areas from the built-up area.
///
/// Resets painting to STANDARD and flooring to VITRIFIED. Callers apply the
/// result explicitly (see `ProjectConfiguration::apply_suggestions`).
pub fn suggest_related_areas(civil_area: f64) -> RelatedAreas {
    RelatedAreas {
        painting_area: civil_area * PAINT_TO_BUILT_UP_RATIO,
        painting_quality: QualityGrade::Standard,
        flooring_area: civil_area * FLOOR_TO_BUILT_UP_RATIO,
        flooring_material: FlooringMaterial::Vitrified,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_config() -> ProjectConfiguration {
        let mut config = ProjectConfiguration::default();
        config.civil.custom_rate = Some(0.0);
        config
    }

    fn line_sum(b: &CostBreakdown) -> f64 {
        b.civil_work + b.painting + b.flooring + b.electrical + b.plumbing + b.openings
    }

    #[test]
    fn test_reference_estimate() {
        let b = calculate(&reference_config());
        assert_eq!(b.civil_work, 1_850_000.0);
        assert_eq!(b.painting, 98_000.0);
        assert_eq!(b.flooring, 108_000.0);
        assert_eq!(b.electrical, 180_000.0);
        assert_eq!(b.plumbing, 65_000.0);
        assert_eq!(b.openings, 88_000.0);
        assert_eq!(b.total, 2_389_000.0);
    }

    #[test]
    fn test_total_is_exact_sum_of_lines() {
        let mut config = reference_config();
        config.civil.area = 1234.56;
        config.civil.floors = 3.0;
        config.painting.area = 4321.1;
        config.painting.quality = QualityGrade::Premium;
        config.flooring.area = 1111.11;
        config.flooring.material = FlooringMaterial::Wooden;
        config.plumbing.toilets = 3.0;

        let b = calculate(&config);
        assert_eq!(b.total, line_sum(&b));

        let items: f64 = b.line_items().iter().map(|item| item.amount).sum();
        assert!((items - b.total).abs() < 1e-6);
    }

    #[test]
    fn test_custom_rate_overrides_every_grade() {
        for grade in QualityGrade::ALL {
            for rate in [1.0, 500.0, 1850.0, 9999.0] {
                let mut config = reference_config();
                config.civil.quality = grade;
                config.civil.custom_rate = Some(rate);
                let b = calculate(&config);
                assert_eq!(b.civil_work, 1000.0 * rate);
            }
        }
    }

    #[test]
    fn test_zero_or_cleared_custom_rate_falls_back_to_grade() {
        for grade in QualityGrade::ALL {
            let mut config = reference_config();
            config.civil.quality = grade;

            config.civil.custom_rate = Some(0.0);
            assert_eq!(calculate(&config).civil_work, 1000.0 * RATES.civil(grade));

            config.civil.custom_rate = None;
            assert_eq!(calculate(&config).civil_work, 1000.0 * RATES.civil(grade));
        }
    }

    #[test]
    fn test_negative_custom_rate_is_ignored() {
        let mut config = reference_config();
        config.civil.custom_rate = Some(-100.0);
        assert_eq!(calculate(&config).civil_work, 1_850_000.0);
    }

    #[test]
    fn test_floors_multiply_civil_only() {
        let mut config = reference_config();
        config.civil.floors = 2.0;
        let b = calculate(&config);
        assert_eq!(b.civil_work, 3_700_000.0);
        assert_eq!(b.electrical, 180_000.0);
    }

    #[test]
    fn test_electrical_ignores_electrical_inputs() {
        let mut config = reference_config();
        config.electrical.area = 50_000.0;
        config.electrical.points_count = 500.0;
        assert_eq!(calculate(&config).electrical, 180_000.0);

        config.civil.area = 2000.0;
        assert_eq!(calculate(&config).electrical, 360_000.0);
    }

    #[test]
    fn test_negative_input_propagates() {
        let mut config = reference_config();
        config.painting.area = -100.0;
        let b = calculate(&config);
        assert_eq!(b.painting, -2800.0);
        assert_eq!(b.total, line_sum(&b));
    }

    #[test]
    fn test_calculate_validated_rejects_negative() {
        let mut config = reference_config();
        assert_eq!(calculate_validated(&config).unwrap().total, 2_389_000.0);

        config.flooring.area = -1.0;
        let err = calculate_validated(&config).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_suggest_related_areas() {
        let s = suggest_related_areas(1000.0);
        assert_eq!(s.painting_area, 3500.0);
        assert_eq!(s.flooring_area, 900.0);
        assert_eq!(s.painting_quality, QualityGrade::Standard);
        assert_eq!(s.flooring_material, FlooringMaterial::Vitrified);
    }

    #[test]
    fn test_cost_per_sqft() {
        let b = calculate(&reference_config());
        assert_eq!(b.cost_per_sqft(1000.0), 2389.0);
        assert_eq!(b.cost_per_sqft(0.0), b.total);
    }

    #[test]
    fn test_breakdown_serialization() {
        let b = calculate(&reference_config());
        let json = serde_json::to_value(&b).unwrap();
        assert_eq!(json["civilWork"], 1_850_000.0);
        assert_eq!(json["doorsWindows"], 88_000.0);
        assert_eq!(json["total"], 2_389_000.0);
    }
}
