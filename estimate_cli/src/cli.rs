//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use estimate_core::rates::{FlooringMaterial, QualityGrade};

/// EasyBuild - construction cost estimator.
#[derive(Debug, Parser)]
#[command(name = "easybuild")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding saved projects
    #[arg(long, global = true, env = "EASYBUILD_STORE_DIR", default_value = ".easybuild")]
    pub store_dir: PathBuf,

    /// Name recorded in the store lock while saving
    #[arg(long, global = true, env = "EASYBUILD_USER")]
    pub user: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Price a configuration and print the breakdown
    Calc(CalcArgs),

    /// Suggest painting and flooring areas for a built-up area
    Suggest {
        /// Built-up area in sq.ft
        #[arg(long)]
        area: f64,
    },

    /// Price a configuration and save it as a named project
    Save(SaveArgs),

    /// List saved projects
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show one saved project
    Show {
        id: String,

        #[arg(long)]
        json: bool,
    },

    /// Delete a saved project
    Delete { id: String },

    /// Write the estimate report for a saved project
    Export(ExportArgs),
}

/// Where the configuration comes from, plus per-field overrides
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// JSON configuration file (defaults to the starter estimate)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Built-up area per floor (sq.ft)
    #[arg(long)]
    pub area: Option<f64>,

    /// Civil quality grade (BASIC, STANDARD, PREMIUM)
    #[arg(long)]
    pub quality: Option<QualityGrade>,

    #[arg(long)]
    pub floors: Option<f64>,

    /// Civil rate per sq.ft; overrides the grade rate when above zero
    #[arg(long)]
    pub custom_rate: Option<f64>,

    /// Painting quality grade
    #[arg(long)]
    pub paint_quality: Option<QualityGrade>,

    /// Flooring material (VITRIFIED, MARBLE, GRANITE, WOODEN)
    #[arg(long)]
    pub material: Option<FlooringMaterial>,

    /// Recompute painting, flooring and electrical areas from the built-up area
    #[arg(long)]
    pub sync_areas: bool,
}

#[derive(Debug, Args)]
pub struct CalcArgs {
    #[command(flatten)]
    pub input: ConfigArgs,

    /// Reject negative or non-numeric quantities before pricing
    #[arg(long)]
    pub strict: bool,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct SaveArgs {
    /// Project name
    #[arg(short, long, default_value = "")]
    pub name: String,

    /// Update the project with this id instead of creating a new one
    #[arg(long)]
    pub id: Option<String>,

    #[command(flatten)]
    pub input: ConfigArgs,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    pub id: String,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub out: PathBuf,

    /// Write a PDF instead of plain text
    #[arg(long)]
    pub pdf: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_calc_overrides() {
        let cli = Cli::try_parse_from([
            "easybuild", "calc", "--area", "1500", "--quality", "premium", "--material", "marble", "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Calc(args) => {
                assert_eq!(args.input.area, Some(1500.0));
                assert_eq!(args.input.quality, Some(QualityGrade::Premium));
                assert_eq!(args.input.material, Some(FlooringMaterial::Marble));
                assert!(args.json);
                assert!(!args.strict);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_grade() {
        assert!(Cli::try_parse_from(["easybuild", "calc", "--quality", "luxury"]).is_err());
    }

    #[test]
    fn test_global_store_dir() {
        let cli = Cli::try_parse_from(["easybuild", "list", "--store-dir", "/tmp/estimates"]).unwrap();
        assert_eq!(cli.store_dir, PathBuf::from("/tmp/estimates"));
    }
}
