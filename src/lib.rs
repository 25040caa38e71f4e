//! # Claims ETL
//!
//! Batch cleaning for car insurance claims data. A raw CSV export is read
//! into a polars `DataFrame`, repaired and enriched, then written either to a
//! CSV file or into a PostgreSQL table.
//!
//! ```no_run
//! use claims_etl::config::PipelineConfig;
//! use claims_etl::etl::{PipelineOutcome, TracingObserver, run_pipeline};
//!
//! # fn example() -> claims_etl::error::Result<()> {
//! let config = PipelineConfig::default();
//! if let PipelineOutcome::Completed { table } = run_pipeline(&config, &TracingObserver)? {
//!     println!("{}", table.head(Some(5)));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`etl`]: the extract, transform and load stages and the pipeline driver
//!   - [`etl::transform`]: header normalization, median imputation, age
//!     bucketing and the past-accident flag
//! - [`config`]: pipeline and database connection settings
//! - [`error`]: error types
//! - [`logging`]: `tracing` subscriber setup for the binary

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod etl;
pub mod logging;
