//! # Estimate Reports
//!
//! Turns a [`SavedProject`] into an export report. The set of fields is
//! fixed; layout is not:
//!
//! - project name, generation time and save time
//! - grand total (the snapshot total) as currency and in words
//! - the six category subtotals, recomputed from the stored configuration
//! - built-up area and the civil rate basis
//!
//! ## Example
//!
//! ```rust
//! use chrono::Utc;
//! use estimate_core::project::{ProjectConfiguration, SavedProject};
//! use estimate_core::report::EstimateReport;
//!
//! let project = SavedProject {
//!     id: "p-1".to_string(),
//!     name: "My Dream Home".to_string(),
//!     timestamp: Utc::now().timestamp_millis(),
//!     state: ProjectConfiguration::default(),
//!     total: 2_389_000.0,
//! };
//!
//! let text = EstimateReport::from_project(&project, Utc::now()).to_text();
//! assert!(text.contains("Total Estimated Project Cost: ₹23,89,000"));
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::calculations::{calculate, CostBreakdown, CostCategory};
use crate::format::{amount_in_words, format_inr};
use crate::project::{CivilInput, SavedProject};

const RULE: &str = "===============================";

/// Everything an export carries
#[derive(Debug, Clone, Serialize)]
pub struct EstimateReport {
    pub project_name: String,
    pub generated_at: DateTime<Utc>,
    /// `None` when the stored timestamp is out of range
    pub saved_at: Option<DateTime<Utc>>,
    /// Snapshot total from save time
    pub total: f64,
    pub total_in_words: String,
    /// Recomputed from the stored configuration with current rates
    pub breakdown: CostBreakdown,
    pub built_up_area: f64,
    pub rate_basis: String,
}

impl EstimateReport {
    pub fn from_project(project: &SavedProject, generated_at: DateTime<Utc>) -> Self {
        EstimateReport {
            project_name: project.name.clone(),
            generated_at,
            saved_at: project.saved_at(),
            total: project.total,
            total_in_words: amount_in_words(project.total),
            breakdown: calculate(&project.state),
            built_up_area: project.state.civil.area,
            rate_basis: rate_basis(&project.state.civil),
        }
    }

    /// Fixed-layout plain-text report
    pub fn to_text(&self) -> String {
        let mut lines = vec![
            "EASYBUILD CONSTRUCTION ESTIMATE".to_string(),
            RULE.to_string(),
            format!("Project Name: {}", self.project_name),
            format!("Generated: {}", format_timestamp(&self.generated_at)),
            format!("Saved: {}", self.saved_at.as_ref().map(format_timestamp).unwrap_or_else(|| "unknown".to_string())),
            String::new(),
            "FINANCIAL SUMMARY".to_string(),
            "-----------------".to_string(),
            format!("Total Estimated Project Cost: {}", format_inr(self.total)),
            format!("Words: {}", self.total_in_words),
            String::new(),
            "COMPONENT BREAKDOWN".to_string(),
            "-------------------".to_string(),
        ];

        for (index, category) in CostCategory::ALL.iter().enumerate() {
            lines.push(format!(
                "{}. {}: {}",
                index + 1,
                category.label(),
                format_inr(self.breakdown.amount(*category))
            ));
        }

        lines.extend([
            String::new(),
            "TECHNICAL SPECS".to_string(),
            "---------------".to_string(),
            format!("- Built-up Area: {} sq.ft", self.built_up_area),
            format!("- Rate Basis: {}", self.rate_basis),
            RULE.to_string(),
        ]);

        lines.join("\n")
    }
}

/// How the civil rate was chosen: `CUSTOM (₹2100)` or `STANDARD (PREMIUM)`
pub fn rate_basis(civil: &CivilInput) -> String {
    match civil.effective_custom_rate() {
        Some(rate) => format!("CUSTOM (₹{})", rate),
        None => format!("STANDARD ({})", civil.quality),
    }
}

/// Download name for an export: whitespace runs become `_`, and path
/// separators or other characters file systems reject become `_` too, so the
/// name never leaves the export directory.
pub fn export_file_name(project_name: &str, extension: &str) -> String {
    let safe: String = project_name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => ' ',
            c => c,
        })
        .collect();
    let stem = safe.split_whitespace().collect::<Vec<_>>().join("_");
    let stem = if stem.is_empty() { "Untitled_Project".to_string() } else { stem };
    format!("{}_Estimate.{}", stem, extension)
}

fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}
