//! Vital Risk - CLI Entry Point
//!
//! Configuration comes from VITAL_RISK_* environment variables.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use vital_risk::constants;
use vital_risk::{AssessmentError, EngineConfig, RawVitals, RiskEngine};

/// Vital Risk - assess a vitals JSON object and print the result
#[derive(Parser)]
#[command(name = constants::APP_NAME, version, about, long_about = None)]
struct Cli {
    /// Vitals JSON file; `-` or none reads stdin
    #[arg(value_name = "VITALS.json")]
    input: Option<PathBuf>,

    /// Print engine status instead of assessing
    #[arg(long)]
    status: bool,
}

impl Cli {
    /// Input file, None for stdin
    fn input_path(&self) -> Option<&Path> {
        self.input.as_deref().filter(|path| *path != Path::new("-"))
    }
}

fn read_input(path: Option<&Path>) -> Result<String, String> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|e| format!("failed to read {}: {}", path.display(), e)),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("failed to read stdin: {}", e))?;
            Ok(buf)
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let config = EngineConfig::from_env().map_err(|e| e.to_string())?;
    let engine = RiskEngine::from_config(&config).map_err(|e| e.to_string())?;

    let output = if cli.status {
        serde_json::to_string_pretty(&engine.status())
    } else {
        let input = read_input(cli.input_path())?;
        let raw = RawVitals::from_json_str(&input).map_err(|e| format!("invalid vitals JSON: {}", e))?;

        match engine.assess(&raw) {
            Ok(result) => serde_json::to_string_pretty(&result),
            Err(err) => {
                // Structured error on stdout for callers, message on the log
                if let Ok(json) = serde_json::to_string_pretty(&err) {
                    println!("{}", json);
                }
                return Err(match err {
                    AssessmentError::Validation(e) => e.to_string(),
                    AssessmentError::Inference(e) => e.to_string(),
                });
            }
        }
    }
    .map_err(|e| format!("failed to serialize output: {}", e))?;

    println!("{}", output);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(constants::DEFAULT_LOG_FILTER))
        .init();

    log::debug!("Starting {} v{}", constants::APP_NAME, constants::APP_VERSION);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::from(1)
        }
    }
}
