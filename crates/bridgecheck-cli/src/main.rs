//! bridgecheck: verify that frontend `invoke` payloads match backend
//! command signatures.
//!
//! # Usage
//!
//! ```bash
//! bridgecheck --backend src-tauri/src --frontend src
//! bridgecheck --format json
//! ```
//!
//! Exit codes: 0 when every payload matches, 1 when findings exist,
//! 2 when the run itself could not proceed (missing roots, nothing to
//! scan).

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use bridgecheck_core::Report;

#[derive(Debug, Parser)]
#[command(name = "bridgecheck", version, about = "Cross-check frontend invoke payloads against backend command signatures")]
struct Args {
    /// Root of the backend source tree (Rust command handlers)
    #[arg(long, default_value = "src-tauri/src")]
    backend: PathBuf,

    /// Root of the frontend source tree
    #[arg(long, default_value = "src")]
    frontend: PathBuf,

    /// Report format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Frontend file extensions to scan (comma-separated)
    #[arg(
        long = "frontend-ext",
        value_delimiter = ',',
        default_values_t = bridgecheck_cli::FRONTEND_EXTENSIONS.iter().map(|s| s.to_string())
    )]
    frontend_ext: Vec<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn render(report: &Report, format: Format) -> Result<String> {
    match format {
        Format::Text => Ok(report.render_text()),
        Format::Json => {
            let mut json = report.render_json().context("serializing report")?;
            json.push('\n');
            Ok(json)
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let outcome =
        bridgecheck_cli::run_with_extensions(&args.backend, &args.frontend, &args.frontend_ext)
            .and_then(|report| render(&report, args.format).map(|text| (report, text)));

    match outcome {
        Ok((report, text)) => {
            print!("{text}");
            if report.is_clean() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(err) => {
            eprintln!("bridgecheck: {err:#}");
            ExitCode::from(2)
        }
    }
}
