//! # EasyBuild CLI
//!
//! Terminal front end for the construction cost estimator: price a
//! configuration, keep named snapshots, and export reports.

mod cli;
mod commands;
mod config;

use std::process::ExitCode;

use clap::Parser;
use estimate_core::EstimateError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::cli::{Cli, Commands};
use crate::config::StoreSettings;

/// Initialize logging.
///
/// `--debug` forces debug level; otherwise `RUST_LOG` applies, defaulting to
/// info. Logs go to stderr so command output stays pipeable.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("easybuild=debug,estimate_core=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("easybuild=info,estimate_core=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let settings = StoreSettings::from_cli(cli);

    match &cli.command {
        Commands::Calc(args) => commands::calc(args),
        Commands::Suggest { area } => commands::suggest(*area),
        Commands::Save(args) => commands::save(&settings, args),
        Commands::List { json } => commands::list(&settings, *json),
        Commands::Show { id, json } => commands::show(&settings, id, *json),
        Commands::Delete { id } => commands::delete(&settings, id),
        Commands::Export(args) => commands::export(&settings, args),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);
    tracing::debug!("easybuild starting with args: {:?}", cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if let Some(core) = e.downcast_ref::<EstimateError>() {
                if let Ok(json) = serde_json::to_string_pretty(core) {
                    eprintln!();
                    eprintln!("Error JSON:");
                    eprintln!("{}", json);
                }
            }
            ExitCode::FAILURE
        }
    }
}
