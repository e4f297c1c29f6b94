//! # Rate Table
//!
//! Unit rates used by the pricing calculator. Area-based categories are
//! priced in rupees per square foot; plumbing and openings are priced per
//! fixture.
//!
//! The table is a process-wide constant built once on first use and never
//! mutated afterwards.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::rates::{QualityGrade, FlooringMaterial, RATES};
//!
//! assert_eq!(RATES.civil(QualityGrade::Standard), 1850.0);
//! assert_eq!(RATES.flooring(FlooringMaterial::Marble), 350.0);
//! ```

use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};

/// Quality tier selecting the civil and painting unit rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualityGrade {
    Basic,
    #[default]
    Standard,
    Premium,
}

impl QualityGrade {
    /// All grades in ascending order of cost
    pub const ALL: [QualityGrade; 3] = [QualityGrade::Basic, QualityGrade::Standard, QualityGrade::Premium];

    /// Stored code (e.g., "STANDARD")
    pub fn code(&self) -> &'static str {
        match self {
            QualityGrade::Basic => "BASIC",
            QualityGrade::Standard => "STANDARD",
            QualityGrade::Premium => "PREMIUM",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> EstimateResult<Self> {
        match s.trim().to_uppercase().as_str() {
            "BASIC" | "B" => Ok(QualityGrade::Basic),
            "STANDARD" | "STD" | "S" => Ok(QualityGrade::Standard),
            "PREMIUM" | "P" => Ok(QualityGrade::Premium),
            _ => Err(EstimateError::invalid_input(
                "quality",
                s,
                "Expected one of BASIC, STANDARD, PREMIUM",
            )),
        }
    }
}

impl std::fmt::Display for QualityGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for QualityGrade {
    type Err = EstimateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QualityGrade::from_str_flexible(s)
    }
}

/// Floor finish material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlooringMaterial {
    #[default]
    Vitrified,
    Marble,
    Granite,
    Wooden,
}

impl FlooringMaterial {
    pub const ALL: [FlooringMaterial; 4] = [
        FlooringMaterial::Vitrified,
        FlooringMaterial::Marble,
        FlooringMaterial::Granite,
        FlooringMaterial::Wooden,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            FlooringMaterial::Vitrified => "VITRIFIED",
            FlooringMaterial::Marble => "MARBLE",
            FlooringMaterial::Granite => "GRANITE",
            FlooringMaterial::Wooden => "WOODEN",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> EstimateResult<Self> {
        match s.trim().to_uppercase().replace([' ', '-'], "_").as_str() {
            "VITRIFIED" | "VITRIFIED_TILE" | "TILE" => Ok(FlooringMaterial::Vitrified),
            "MARBLE" => Ok(FlooringMaterial::Marble),
            "GRANITE" => Ok(FlooringMaterial::Granite),
            "WOODEN" | "WOOD" => Ok(FlooringMaterial::Wooden),
            _ => Err(EstimateError::invalid_input(
                "material",
                s,
                "Expected one of VITRIFIED, MARBLE, GRANITE, WOODEN",
            )),
        }
    }
}

impl std::fmt::Display for FlooringMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for FlooringMaterial {
    type Err = EstimateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FlooringMaterial::from_str_flexible(s)
    }
}

/// Rates per quality grade
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradeRates {
    pub basic: f64,
    pub standard: f64,
    pub premium: f64,
}

impl GradeRates {
    pub fn get(&self, grade: QualityGrade) -> f64 {
        match grade {
            QualityGrade::Basic => self.basic,
            QualityGrade::Standard => self.standard,
            QualityGrade::Premium => self.premium,
        }
    }
}

/// Rates per flooring material (per sq.ft)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlooringRates {
    pub vitrified: f64,
    pub marble: f64,
    pub granite: f64,
    pub wooden: f64,
}

/// Complete unit-rate table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateTable {
    /// Civil structure, per sq.ft of built-up area per floor
    pub civil: GradeRates,
    /// Painting, per sq.ft of paintable surface
    pub painting: GradeRates,
    pub flooring: FlooringRates,
    /// Electrical flat rate, per sq.ft of civil area
    pub electrical: f64,
    pub toilet: f64,
    pub kitchen: f64,
    pub door: f64,
    pub window: f64,
}

impl RateTable {
    fn standard() -> Self {
        RateTable {
            civil: GradeRates {
                basic: 1600.0,
                standard: 1850.0,
                premium: 2400.0,
            },
            painting: GradeRates {
                basic: 18.0,
                standard: 28.0,
                premium: 45.0,
            },
            flooring: FlooringRates {
                vitrified: 120.0,
                marble: 350.0,
                granite: 280.0,
                wooden: 220.0,
            },
            electrical: 180.0,
            toilet: 25_000.0,
            kitchen: 15_000.0,
            door: 12_000.0,
            window: 8_000.0,
        }
    }

    pub fn civil(&self, grade: QualityGrade) -> f64 {
        self.civil.get(grade)
    }

    pub fn painting(&self, grade: QualityGrade) -> f64 {
        self.painting.get(grade)
    }

    pub fn flooring(&self, material: FlooringMaterial) -> f64 {
        match material {
            FlooringMaterial::Vitrified => self.flooring.vitrified,
            FlooringMaterial::Marble => self.flooring.marble,
            FlooringMaterial::Granite => self.flooring.granite,
            FlooringMaterial::Wooden => self.flooring.wooden,
        }
    }
}

/// The process-wide rate table
pub static RATES: Lazy<RateTable> = Lazy::new(RateTable::standard);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_rates_ascend() {
        for rates in [RATES.civil, RATES.painting] {
            assert!(rates.basic < rates.standard);
            assert!(rates.standard < rates.premium);
        }
    }

    #[test]
    fn test_flooring_lookup() {
        assert_eq!(RATES.flooring(FlooringMaterial::Vitrified), 120.0);
        assert_eq!(RATES.flooring(FlooringMaterial::Granite), 280.0);
        assert_eq!(RATES.flooring(FlooringMaterial::Wooden), 220.0);
    }

    #[test]
    fn test_grade_serialization() {
        let json = serde_json::to_string(&QualityGrade::Premium).unwrap();
        assert_eq!(json, "\"PREMIUM\"");
        let roundtrip: FlooringMaterial = serde_json::from_str("\"MARBLE\"").unwrap();
        assert_eq!(roundtrip, FlooringMaterial::Marble);
    }

    #[test]
    fn test_flexible_parsing() {
        assert_eq!("std".parse::<QualityGrade>().unwrap(), QualityGrade::Standard);
        assert_eq!("wood".parse::<FlooringMaterial>().unwrap(), FlooringMaterial::Wooden);
        let err = "gold".parse::<FlooringMaterial>().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }
}
