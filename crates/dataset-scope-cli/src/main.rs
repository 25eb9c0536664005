mod commands;
mod download;
mod logging;
mod progress;
mod render;

use std::path::Path;
use std::process;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use commands::{Cli, Commands, ScanArgs};
use dataset_scope_core::{summarize_csv, AppConfig, ScanEngine};
use dotenv::dotenv;
use progress::CliReporter;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let _guard = logging::init_logger();

    let config = match dataset_scope_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    match args.command {
        Some(Commands::Scan(scan_args)) => {
            if let Err(err) = run_scan(&config, &scan_args) {
                error!("Error: {:#}", err);
                process::exit(1);
            }
        }
        Some(Commands::Inspect { file, json }) => {
            let summary = summarize_csv(Path::new(&file));
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                render::print_summary(&summary);
            }
        }
        Some(Commands::Locate { filename, dir }) => {
            let dataset_dir = dir.unwrap_or_else(|| config.dataset_dir.clone());
            match download::resolve_download(Path::new(&dataset_dir), &filename) {
                Some(path) => println!("{}", path.display()),
                None => {
                    error!("{} not found in {}", filename, dataset_dir);
                    process::exit(2);
                }
            }
        }
        Some(Commands::PrintConfig) => {
            let rendered =
                toml::to_string_pretty(&config).context("Error rendering configuration")?;
            print!("{}", rendered);
        }
        None => {
            let _ = Cli::command().print_long_help();
        }
    }

    Ok(())
}

fn run_scan(config: &AppConfig, args: &ScanArgs) -> anyhow::Result<()> {
    let mut engine = ScanEngine::new(config.clone());
    if let Some(dir) = &args.dir {
        engine = engine.with_dataset_dir(dir);
    }
    if args.parallel {
        engine = engine.with_parallel(true);
    }
    info!("Scanning {}", engine.config().dataset_dir);

    let report = if args.json {
        engine.scan(&dataset_scope_core::SilentReporter)
    } else {
        engine.scan(&CliReporter::new())
    }
    .with_context(|| format!("Error scanning {}", engine.config().dataset_dir))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render::print_report(&report);
    }

    Ok(())
}
