//! Extract, transform and load stages for the claims table.
//!
//! ```text
//! extract(path) ──Option<DataFrame>──> transform ──Option<DataFrame>──> TableSink::load
//! ```
//!
//! A `None` from the extractor flows through the transform untouched and
//! stops the run before anything is written.

pub mod binning;
pub mod db;
pub mod extract;
pub mod load;
pub mod naming;
pub mod observer;
pub mod transform;

pub use binning::AgeBins;
pub use db::PostgresSink;
pub use extract::extract;
pub use load::{CsvFileSink, TableSink};
pub use observer::{TracingObserver, TransformEvent, TransformObserver, TransformStep};
pub use transform::{TransformPolicy, transform};

use crate::config::PipelineConfig;
use crate::error::Result;
use polars::prelude::DataFrame;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedStage {
    /// The input file was absent.
    Extract,
    /// The sink reported a failed write.
    Load,
}

#[derive(Debug)]
pub enum PipelineOutcome {
    Completed { table: DataFrame },
    Failed(FailedStage),
}

/// Runs extract, transform and load for one input.
///
/// # Errors
///
/// Only failures no stage treats as recoverable: an invalid bin
/// configuration, an unreadable or unparseable input, a missing required
/// column, or a file sink that cannot write.
pub fn run_pipeline(
    config: &PipelineConfig,
    observer: &dyn TransformObserver,
) -> Result<PipelineOutcome> {
    info!("--- Starting ETL Pipeline ---");
    let policy = config.policy()?;

    let raw = extract(&config.input_path)?;
    let Some(mut clean) = transform(raw.as_ref(), &policy, observer)? else {
        error!("--- ETL Pipeline Failed ---");
        return Ok(PipelineOutcome::Failed(FailedStage::Extract));
    };

    let sink = config.sink.build();
    if sink.load(&mut clean)? {
        info!("--- ETL Pipeline Finished Successfully ---");
        Ok(PipelineOutcome::Completed { table: clean })
    } else {
        error!("--- ETL Pipeline Failed ---");
        Ok(PipelineOutcome::Failed(FailedStage::Load))
    }
}

#[cfg(test)]
mod tests;
