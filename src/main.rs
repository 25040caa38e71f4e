//! `claims-etl` entry point.
//!
//! ```text
//! main()
//!   ├─> init logging (console + rolling files)
//!   ├─> parse CLI, resolve PipelineConfig
//!   └─> run_pipeline ─> print preview on success
//! ```
//!
//! ```bash
//! claims-etl clean --file Car_Insurance_Claim.csv --output clean.csv
//! claims-etl import --file Car_Insurance_Claim.csv --table car_insurance_claims
//! ```

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout)] // The preview table is the binary's output

mod cli;

use anyhow::Result;
use claims_etl::etl::{PipelineOutcome, TracingObserver, run_pipeline};
use clap::Parser as _;

const PREVIEW_ROWS: usize = 5;

fn main() -> Result<()> {
    claims_etl::logging::init()?;

    let cli = cli::Cli::parse();
    let config = cli::resolve_config(cli.command)?;

    let outcome = run_pipeline(&config, &TracingObserver).inspect_err(|e| {
        tracing::error!("--- ETL Pipeline Failed --- {e}");
    })?;

    if let PipelineOutcome::Completed { table } = outcome {
        println!("\n--- First {PREVIEW_ROWS} Rows of Cleaned Data ---");
        println!("{}", table.head(Some(PREVIEW_ROWS)));
    }

    if let Ok(path) = claims_etl::logging::get_current_log_path() {
        tracing::debug!("Log file: {}", path.display());
    }
    Ok(())
}
