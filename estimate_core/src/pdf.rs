//! # PDF Export
//!
//! Renders an [`EstimateReport`] to PDF with Typst. The document carries the
//! same fields as the plain-text export.
//!
//! ## Architecture
//!
//! - The Typst template is an embedded string constant
//! - Report values are escaped and substituted before compilation
//! - Fonts come from `typst-assets`; output is raw PDF bytes
//!
//! ## Example
//!
//! ```rust,no_run
//! use chrono::Utc;
//! use estimate_core::pdf::render_estimate_pdf;
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
//! let report = EstimateReport::from_project(&project, Utc::now());
//! let pdf = render_estimate_pdf(&report).unwrap();
//! std::fs::write("My_Dream_Home_Estimate.pdf", pdf).unwrap();
//! ```

use chrono::{Datelike, Utc};
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::calculations::CostCategory;
use crate::errors::{EstimateError, EstimateResult};
use crate::format::format_inr;
use crate::report::EstimateReport;

/// Single-document Typst world with bundled fonts and no file access.
struct EstimateWorld {
    main: Source,
    book: LazyHash<FontBook>,
    fonts: Vec<Font>,
    library: LazyHash<Library>,
}

impl EstimateWorld {
    fn new(source: String) -> Self {
        let fonts: Vec<Font> = typst_assets::fonts()
            .flat_map(|data| Font::iter(Bytes::new(data.to_vec())))
            .collect();
        let book = FontBook::from_fonts(&fonts);

        EstimateWorld {
            main: Source::detached(source),
            book: LazyHash::new(book),
            fonts,
            library: LazyHash::new(Library::default()),
        }
    }
}

impl World for EstimateWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(now.year(), now.month() as u8, now.day() as u8)
    }
}

const ESTIMATE_TEMPLATE: &str = r##"
#set page(
  paper: "a4",
  margin: (top: 2cm, bottom: 2cm, left: 2cm, right: 2cm),
  header: align(right)[
    #text(size: 9pt, fill: gray)[EasyBuild Construction Estimate]
  ],
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr),
      align(left)[#text(size: 9pt)[{{PROJECT_NAME}}]],
      align(right)[#text(size: 9pt)[Generated {{GENERATED}}]],
    )
  ]
)

#set text(size: 11pt)

#align(center)[
  #block(width: 100%, fill: rgb("#e0f2fe"), inset: 12pt, radius: 4pt)[
    #text(size: 18pt, weight: "bold")[Construction Estimate]
    #v(4pt)
    #text(size: 14pt)[{{PROJECT_NAME}}]
  ]
]

#v(12pt)

#table(
  columns: (auto, 1fr),
  stroke: none,
  row-gutter: 4pt,
  [Generated:], [{{GENERATED}}],
  [Saved:], [{{SAVED}}],
  [Built-up Area:], [{{AREA}} sq.ft],
  [Rate Basis:], [{{RATE_BASIS}}],
)

#v(12pt)
#line(length: 100%, stroke: 0.5pt)

== Financial Summary

#align(center)[
  #block(fill: rgb("#fef9c3"), inset: 14pt, radius: 4pt)[
    #text(size: 20pt, weight: "bold")[{{TOTAL}}]
    #v(4pt)
    #text(size: 10pt)[{{TOTAL_WORDS}}]
  ]
]

#v(12pt)

== Component Breakdown

#table(
  columns: (auto, 1fr, auto),
  inset: 8pt,
  stroke: 0.5pt,
  align: (center, left, right),
  table.header([*\#*], [*Component*], [*Cost*]),
{{BREAKDOWN_ROWS}}
)

#v(24pt)
#text(size: 9pt, fill: gray)[
  Estimates use indicative unit rates and are not a quotation.
]
"##;

/// Render an estimate report to PDF bytes.
///
/// # Errors
///
/// * `EstimateError::Internal` - Typst compilation or PDF export failed
pub fn render_estimate_pdf(report: &EstimateReport) -> EstimateResult<Vec<u8>> {
    let saved = report
        .saved_at
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let source = ESTIMATE_TEMPLATE
        .replace("{{PROJECT_NAME}}", &escape_typst(&report.project_name))
        .replace("{{GENERATED}}", &report.generated_at.format("%Y-%m-%d %H:%M").to_string())
        .replace("{{SAVED}}", &saved)
        .replace("{{AREA}}", &escape_typst(&report.built_up_area.to_string()))
        .replace("{{RATE_BASIS}}", &escape_typst(&report.rate_basis))
        .replace("{{TOTAL}}", &escape_typst(&format_inr(report.total)))
        .replace("{{TOTAL_WORDS}}", &escape_typst(&report.total_in_words))
        .replace("{{BREAKDOWN_ROWS}}", &breakdown_rows(report));

    let world = EstimateWorld::new(source);
    let document = typst::compile(&world).output.map_err(|errors| EstimateError::Internal {
        message: format!("Typst compilation failed: {}", join_messages(errors.iter().map(|e| &e.message))),
    })?;

    typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| EstimateError::Internal {
        message: format!("PDF rendering failed: {}", join_messages(errors.iter().map(|e| &e.message))),
    })
}

fn join_messages<'a, M: std::fmt::Display + 'a>(messages: impl Iterator<Item = &'a M>) -> String {
    messages.map(|m| m.to_string()).collect::<Vec<_>>().join("; ")
}

fn breakdown_rows(report: &EstimateReport) -> String {
    CostCategory::ALL
        .iter()
        .enumerate()
        .map(|(index, category)| {
            format!(
                "  [{}], [{}], [{}],",
                index + 1,
                escape_typst(category.label()),
                escape_typst(&format_inr(report.breakdown.amount(*category)))
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escape Typst markup characters in user-provided text
fn escape_typst(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '*' | '_' | '#' | '$' | '@' | '<' | '>' | '\\' | '`' | '[' | ']' | '/' | '~' | '=' | '-') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{ProjectConfiguration, SavedProject};

    #[test]
    fn test_escape_typst() {
        assert_eq!(escape_typst("Villa #2 [east]"), "Villa \\#2 \\[east\\]");
        assert_eq!(escape_typst("Plain name"), "Plain name");
        assert_eq!(escape_typst("a/b"), "a\\/b");
    }

    #[test]
    fn test_breakdown_rows() {
        let project = SavedProject {
            id: "p".to_string(),
            name: "Rows".to_string(),
            timestamp: 0,
            state: ProjectConfiguration::default(),
            total: 0.0,
        };
        let rows = breakdown_rows(&EstimateReport::from_project(&project, Utc::now()));
        assert_eq!(rows.lines().count(), 6);
        assert!(rows.contains("[1], [Civil Structure], [₹18,50,000],"));
        assert!(rows.contains("[6], [Openings (Doors\\/Windows)], [₹88,000],"));
    }

    #[test]
    fn test_pdf_generation() {
        let project = SavedProject {
            id: "p-1".to_string(),
            name: "Test *Villa* #1".to_string(),
            timestamp: Utc::now().timestamp_millis(),
            state: ProjectConfiguration::default(),
            total: 2_389_000.0,
        };
        let report = EstimateReport::from_project(&project, Utc::now());

        let pdf = render_estimate_pdf(&report);
        assert!(pdf.is_ok(), "PDF generation failed: {:?}", pdf.err());

        let bytes = pdf.unwrap();
        assert!(bytes.starts_with(b"%PDF"), "Output is not a valid PDF");
        assert!(bytes.len() > 1000, "PDF seems too small");
    }
}
