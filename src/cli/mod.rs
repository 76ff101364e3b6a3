//! Command-line interface for the station KML converter.

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::PipelineConfig;
use crate::core::loaders;
use crate::processors::convert;

#[derive(Parser)]
#[command(name = "station-kml")]
#[command(about = "Broadcast station CSV to KML converter", version)]
pub struct Cli {
    /// Path to YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a station CSV export to a KML document
    Convert {
        /// Input station CSV file
        input: PathBuf,
        /// Output KML file
        output: PathBuf,
    },

    /// List the column headers recognized in a station CSV
    Headers {
        /// Input station CSV file
        input: PathBuf,
    },
}

/// Create a spinner for indeterminate operations
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Print a summary box
fn print_summary(title: &str, items: &[(&str, String)]) {
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║ {:<62} ║", title);
    println!("╠══════════════════════════════════════════════════════════════╣");
    for (key, value) in items {
        let display_value = if value.len() > 39 {
            format!("{}...", &value[..36])
        } else {
            value.clone()
        };
        println!("║ {:<20}: {:<39} ║", key, display_value);
    }
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
}

pub fn run() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity (must come first)
    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .format_timestamp_secs()
        .init();

    // Load config
    let config = match &cli.config {
        Some(path) => match PipelineConfig::from_yaml(path) {
            Ok(cfg) => {
                info!("Loaded config from: {}", path.display());
                cfg
            }
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}, using defaults",
                    path.display(),
                    e
                );
                PipelineConfig::default()
            }
        },
        None => PipelineConfig::default(),
    };

    match cli.command {
        Commands::Convert { input, output } => {
            cmd_convert(&input, &output, &config);
        }
        Commands::Headers { input } => {
            cmd_headers(&input, &config);
        }
    }
}

fn cmd_convert(input: &Path, output: &Path, config: &PipelineConfig) {
    let start = Instant::now();

    println!("Converting station CSV to KML...");
    println!("Input: {}", input.display());
    println!("Output: {}", output.display());

    let spinner = create_spinner("Building placemark document...");

    match convert::convert_csv_to_kml(input, output, config) {
        Ok(summary) => {
            spinner.finish_and_clear();

            print_summary(
                "Conversion Complete",
                &[
                    ("Input file", input.display().to_string()),
                    ("Output file", output.display().to_string()),
                    ("Station rows", summary.rows.to_string()),
                    ("Classes", summary.classes.to_string()),
                    ("Cities", summary.cities.to_string()),
                    ("Points written", summary.points.to_string()),
                    ("Duration", format!("{:.2?}", start.elapsed())),
                ],
            );
        }
        Err(e) => {
            spinner.finish_and_clear();
            if let Some(column) = convert::missing_column(&e) {
                error!("Missing column: {}", column);
            } else {
                error!("Conversion failed: {:#}", e);
            }
            std::process::exit(1);
        }
    }
}

fn cmd_headers(input: &Path, config: &PipelineConfig) {
    match loaders::read_headers(input, &config.csv) {
        Ok(headers) => {
            println!("Column headers in CSV file:");
            for header in &headers {
                println!("  {}", header);
            }
        }
        Err(e) => {
            error!("Failed to read {}: {}", input.display(), e);
            std::process::exit(1);
        }
    }
}
