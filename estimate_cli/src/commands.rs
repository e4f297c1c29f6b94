//! Command handlers.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use estimate_core::calculations::{calculate, calculate_validated, suggest_related_areas, CostBreakdown};
use estimate_core::format::{amount_in_words, format_inr};
use estimate_core::pdf::render_estimate_pdf;
use estimate_core::project::{ProjectConfiguration, SavedProject};
use estimate_core::report::{export_file_name, rate_basis, EstimateReport};
use tracing::{debug, info};

use crate::cli::{CalcArgs, ExportArgs, SaveArgs};
use crate::config::{resolve_configuration, StoreSettings};

const RULE: &str = "═══════════════════════════════════════";

pub fn calc(args: &CalcArgs) -> Result<()> {
    let config = resolve_configuration(&args.input)?;
    let breakdown = if args.strict {
        calculate_validated(&config)?
    } else {
        calculate(&config)
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
    } else {
        print_breakdown(&config, &breakdown);
    }
    Ok(())
}

pub fn suggest(area: f64) -> Result<()> {
    let s = suggest_related_areas(area);
    println!("Built-up area:  {} sq.ft", area);
    println!("Painting area:  {} sq.ft ({})", s.painting_area, s.painting_quality);
    println!("Flooring area:  {} sq.ft ({})", s.flooring_area, s.flooring_material);
    Ok(())
}

pub fn save(settings: &StoreSettings, args: &SaveArgs) -> Result<()> {
    let config = resolve_configuration(&args.input)?;
    let total = calculate(&config).total;

    let name = match args.name.trim() {
        "" => "Untitled Project",
        trimmed => trimmed,
    };

    let mut store = settings.open();
    let saved = store.save(name, &config, total, args.id.as_deref())?;
    info!(id = %saved.id, name = %saved.name, "Project saved");

    println!("Saved \"{}\" ({})", saved.name, saved.id);
    println!("Total: {}", format_inr(saved.total));
    Ok(())
}

pub fn list(settings: &StoreSettings, json: bool) -> Result<()> {
    let projects = settings.open().list();

    if json {
        println!("{}", serde_json::to_string_pretty(&projects)?);
        return Ok(());
    }

    if projects.is_empty() {
        println!("No saved projects in {}", settings.dir.display());
        return Ok(());
    }

    println!("{:<36}  {:<24}  {:<16}  {:>16}", "ID", "NAME", "SAVED", "TOTAL");
    for project in &projects {
        println!(
            "{:<36}  {:<24}  {:<16}  {:>16}",
            project.id,
            truncate(&project.name, 24),
            saved_label(project),
            format_inr(project.total)
        );
    }
    Ok(())
}

pub fn show(settings: &StoreSettings, id: &str, json: bool) -> Result<()> {
    let project = settings.open().require(id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&project)?);
        return Ok(());
    }

    println!("{}", RULE);
    println!("  {}", project.name);
    println!("{}", RULE);
    println!("ID:     {}", project.id);
    println!("Saved:  {}", saved_label(&project));
    println!("Total at save: {}", format_inr(project.total));
    println!();
    print_breakdown(&project.state, &calculate(&project.state));
    Ok(())
}

pub fn delete(settings: &StoreSettings, id: &str) -> Result<()> {
    if settings.open().delete(id)? {
        println!("Deleted {}", id);
    } else {
        println!("No project with id {}", id);
    }
    Ok(())
}

pub fn export(settings: &StoreSettings, args: &ExportArgs) -> Result<()> {
    let project = settings.open().require(&args.id)?;
    let report = EstimateReport::from_project(&project, Utc::now());

    let (file_name, bytes) = if args.pdf {
        (export_file_name(&project.name, "pdf"), render_estimate_pdf(&report)?)
    } else {
        (export_file_name(&project.name, "txt"), report.to_text().into_bytes())
    };

    fs::create_dir_all(&args.out).with_context(|| format!("creating {}", args.out.display()))?;
    let path: PathBuf = args.out.join(file_name);
    fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
    debug!(path = %path.display(), "Report written");

    println!("Wrote {}", path.display());
    Ok(())
}

fn print_breakdown(config: &ProjectConfiguration, breakdown: &CostBreakdown) {
    println!("{}", RULE);
    println!("  CONSTRUCTION ESTIMATE");
    println!("{}", RULE);
    println!();
    println!("Built-up area: {} sq.ft x {} floor(s)", config.civil.area, config.civil.floors);
    println!("Rate basis:    {}", rate_basis(&config.civil));
    println!();
    for item in breakdown.line_items() {
        println!("  {:<26} {:>16}", item.category.label(), format_inr(item.amount));
    }
    println!();
    println!("{}", RULE);
    println!("  TOTAL: {}", format_inr(breakdown.total));
    println!("  {}", amount_in_words(breakdown.total));
    println!("  AVG: {} / sq.ft", format_inr(breakdown.cost_per_sqft(config.civil.area)));
    println!("{}", RULE);
}

fn saved_label(project: &SavedProject) -> String {
    project
        .saved_at()
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
