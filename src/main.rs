/// Command-line entry point.
///
/// Usage:
///   precip_analyzer [--config <path>] [--json] [input-file] [stationId]
///
/// With only an input file every station is analyzed in the order it first
/// appears. With a station id only that station is analyzed; an unknown id
/// prints nothing. Without an input file the program does nothing. A station
/// id starting with `-` goes after `--`.

use chrono::{DateTime, Utc};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

use precip_analyzer::analysis::precip::{analyze, analyze_region, PrecipAnalysis};
use precip_analyzer::config::{Config, OutputFormat};
use precip_analyzer::logging::{self, Component};
use precip_analyzer::region::{LoadReport, Region};

#[derive(Parser, Debug)]
#[command(name = "precip_analyzer", version)]
/// Summarises station precipitation readings from a CSV export.
struct Args {
    #[arg(short, long, value_name = "PATH")]
    /// TOML configuration file (default: $PRECIP_CONFIG, then ./precip.toml).
    config: Option<PathBuf>,
    #[arg(long)]
    /// Print one JSON document instead of the text report.
    json: bool,
    /// CSV file with a header line followed by one reading per line.
    input: Option<PathBuf>,
    /// Analyze only this station.
    station_id: Option<String>,
}

/// JSON document printed with `--json`.
#[derive(Serialize)]
struct RunReport<'a> {
    generated_at: DateTime<Utc>,
    input: String,
    load: &'a LoadReport,
    stations: &'a [PrecipAnalysis],
}

fn main() -> ExitCode {
    // Usage errors exit 2, --help and --version exit 0.
    let args = Args::parse();

    let Some(input) = args.input else {
        return ExitCode::SUCCESS;
    };

    let mut config = match Config::resolve(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(1);
        }
    };
    if args.json {
        config.output.format = OutputFormat::Json;
    }
    if let Err(e) = config.init_logging() {
        eprintln!("{}", e);
        return ExitCode::from(1);
    }

    let mut region = Region::new(config.limits);
    let report = match region.load_file(&input) {
        Ok(report) => report,
        Err(_) => return ExitCode::from(1),
    };

    let analyses: Vec<PrecipAnalysis> = match &args.station_id {
        Some(id) => {
            let found: Vec<_> = region.find_station(id).map(analyze).into_iter().collect();
            if found.is_empty() {
                logging::debug(Component::System, Some(id), "Station not found in input");
            }
            found
        }
        None => analyze_region(&region),
    };

    match config.output.format {
        OutputFormat::Text => {
            for analysis in &analyses {
                print!("{}", analysis);
            }
        }
        OutputFormat::Json => {
            let doc = RunReport {
                generated_at: Utc::now(),
                input: input.display().to_string(),
                load: &report,
                stations: &analyses,
            };
            match serde_json::to_string_pretty(&doc) {
                Ok(text) => println!("{}", text),
                Err(e) => {
                    logging::error(Component::System, None, &format!("Cannot encode report: {}", e));
                    return ExitCode::from(1);
                }
            }
        }
    }

    // What was read before the failure is still reported, but the run failed.
    if let Some(e) = &report.read_error {
        logging::error(
            Component::System,
            None,
            &format!("Input {} was only partly read: {}", input.display(), e),
        );
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}
