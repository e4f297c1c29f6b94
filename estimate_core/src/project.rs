//! # Project Data Structures
//!
//! `ProjectConfiguration` holds the six category inputs the calculator
//! prices. `SavedProject` is a named snapshot of a configuration and the
//! total it produced at save time.
//!
//! ## Structure
//!
//! ```text
//! SavedProject
//! ├── id, name, timestamp (epoch millis)
//! ├── state: ProjectConfiguration
//! │   ├── civil       (area, quality, floors, customRate?)
//! │   ├── painting    (area, quality)
//! │   ├── flooring    (area, material)
//! │   ├── electrical  (area, pointsCount)
//! │   ├── plumbing    (toilets, kitchens)
//! │   └── doorsWindows (doors, windows)
//! └── total
//! ```
//!
//! Field names serialize in camelCase so stored collections stay readable by
//! other tools working on the same layout.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::project::ProjectConfiguration;
//! use estimate_core::rates::QualityGrade;
//!
//! let mut config = ProjectConfiguration::default();
//! config.civil.area = 1200.0;
//! config.civil.set_quality(QualityGrade::Premium);
//!
//! let json = serde_json::to_string_pretty(&config).unwrap();
//! assert!(json.contains("\"doorsWindows\""));
//! ```

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::calculations::RelatedAreas;
use crate::errors::{EstimateError, EstimateResult};
use crate::rates::{FlooringMaterial, QualityGrade};

/// Civil structure input.
///
/// ## JSON Example
///
/// ```json
/// { "area": 1000.0, "quality": "STANDARD", "floors": 1.0, "customRate": 2100.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CivilInput {
    /// Built-up area per floor (sq.ft)
    pub area: f64,

    pub quality: QualityGrade,

    pub floors: f64,

    /// Per sq.ft override of the grade rate. Only a value > 0 takes effect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_rate: Option<f64>,
}

impl CivilInput {
    /// Select a quality grade. Leaves custom-rate mode.
    pub fn set_quality(&mut self, quality: QualityGrade) {
        self.quality = quality;
        self.custom_rate = None;
    }

    /// Set the custom rate. Zero or a negative value clears the override.
    pub fn set_custom_rate(&mut self, rate: f64) {
        self.custom_rate = if rate > 0.0 { Some(rate) } else { None };
    }

    /// The custom rate when it overrides the grade rate
    pub fn effective_custom_rate(&self) -> Option<f64> {
        self.custom_rate.filter(|rate| *rate > 0.0)
    }

    pub fn is_custom_rate(&self) -> bool {
        self.effective_custom_rate().is_some()
    }
}

impl Default for CivilInput {
    fn default() -> Self {
        CivilInput {
            area: 1000.0,
            quality: QualityGrade::Standard,
            floors: 1.0,
            custom_rate: None,
        }
    }
}

/// Painting input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaintingInput {
    /// Paintable wall/ceiling surface (sq.ft)
    pub area: f64,
    pub quality: QualityGrade,
}

impl Default for PaintingInput {
    fn default() -> Self {
        PaintingInput {
            area: 3500.0,
            quality: QualityGrade::Standard,
        }
    }
}

/// Flooring input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlooringInput {
    pub area: f64,
    pub material: FlooringMaterial,
}

impl Default for FlooringInput {
    fn default() -> Self {
        FlooringInput {
            area: 900.0,
            material: FlooringMaterial::Vitrified,
        }
    }
}

/// Electrical input.
///
/// Neither field feeds the price: electrical cost is derived from the civil
/// area. Both are kept so saved projects round-trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectricalInput {
    #[serde(default)]
    pub area: f64,
    #[serde(default)]
    pub points_count: f64,
}

impl Default for ElectricalInput {
    fn default() -> Self {
        ElectricalInput {
            area: 1000.0,
            points_count: 40.0,
        }
    }
}

/// Plumbing fixtures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlumbingInput {
    pub toilets: f64,
    pub kitchens: f64,
}

impl Default for PlumbingInput {
    fn default() -> Self {
        PlumbingInput {
            toilets: 2.0,
            kitchens: 1.0,
        }
    }
}

/// Doors and windows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningsInput {
    pub doors: f64,
    pub windows: f64,
}

impl Default for OpeningsInput {
    fn default() -> Self {
        OpeningsInput { doors: 4.0, windows: 5.0 }
    }
}

/// Everything the calculator needs to price a project.
///
/// `Default` is the starting estimate offered for a new project.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectConfiguration {
    pub civil: CivilInput,
    pub painting: PaintingInput,
    pub flooring: FlooringInput,
    pub electrical: ElectricalInput,
    pub plumbing: PlumbingInput,
    #[serde(rename = "doorsWindows", alias = "openings")]
    pub openings: OpeningsInput,
}

impl ProjectConfiguration {
    /// Validate input quantities.
    ///
    /// The calculator itself never calls this; it is an opt-in check for
    /// callers that want to reject bad input before pricing.
    pub fn validate(&self) -> EstimateResult<()> {
        let quantities = [
            ("civil.area", self.civil.area),
            ("civil.floors", self.civil.floors),
            ("painting.area", self.painting.area),
            ("flooring.area", self.flooring.area),
            ("electrical.area", self.electrical.area),
            ("electrical.pointsCount", self.electrical.points_count),
            ("plumbing.toilets", self.plumbing.toilets),
            ("plumbing.kitchens", self.plumbing.kitchens),
            ("doorsWindows.doors", self.openings.doors),
            ("doorsWindows.windows", self.openings.windows),
        ];

        for (field, value) in quantities {
            check_quantity(field, value)?;
        }

        if let Some(rate) = self.civil.custom_rate {
            check_quantity("civil.customRate", rate)?;
        }

        Ok(())
    }

    /// Prefill dependent areas from a suggestion.
    ///
    /// Writes the suggested painting and flooring areas and copies the civil
    /// area into the electrical area. Painting grade and flooring material
    /// are left as chosen.
    ///
    /// # Errors
    ///
    /// * `EstimateError::InvalidInput` - if the civil area is not positive
    pub fn apply_suggestions(&mut self, suggestion: &RelatedAreas) -> EstimateResult<()> {
        if self.civil.area <= 0.0 {
            return Err(EstimateError::invalid_input(
                "civil.area",
                self.civil.area.to_string(),
                "Enter a valid built-up area before syncing related areas",
            ));
        }

        self.painting.area = suggestion.painting_area;
        self.flooring.area = suggestion.flooring_area;
        self.electrical.area = self.civil.area;
        Ok(())
    }
}

fn check_quantity(field: &str, value: f64) -> EstimateResult<()> {
    if !value.is_finite() {
        return Err(EstimateError::invalid_input(field, value.to_string(), "Value must be a finite number"));
    }
    if value < 0.0 {
        return Err(EstimateError::invalid_input(field, value.to_string(), "Value cannot be negative"));
    }
    Ok(())
}

/// A named snapshot of a configuration and its total at save time.
///
/// `total` is not recomputed on read; it keeps the value the rate table
/// produced when the project was saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedProject {
    pub id: String,

    pub name: String,

    /// Save time in milliseconds since the Unix epoch
    pub timestamp: i64,

    pub state: ProjectConfiguration,

    pub total: f64,
}

impl SavedProject {
    /// Save time as a UTC datetime. `None` if the stored value is out of range.
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }
}
