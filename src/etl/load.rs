use crate::error::{Result, ResultExt as _};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::info;

/// Somewhere a cleaned table can be persisted.
pub trait TableSink {
    /// Human readable destination, used in log lines.
    fn describe(&self) -> String;

    /// Persists `table`, replacing whatever the destination held before.
    ///
    /// `Ok(false)` means the sink handled a recoverable failure itself and
    /// already logged it.
    ///
    /// # Errors
    ///
    /// Failures the sink does not treat as recoverable.
    fn load(&self, table: &mut DataFrame) -> Result<bool>;
}

/// Writes a CSV file with a header row and no index column.
#[derive(Debug, Clone)]
pub struct CsvFileSink {
    path: PathBuf,
}

impl CsvFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TableSink for CsvFileSink {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self, table: &mut DataFrame) -> Result<bool> {
        info!("Starting data loading to: {}", self.describe());
        save_csv(table, &self.path)?;
        info!(rows = table.height(), "Data loading complete.");
        Ok(true)
    }
}

pub fn save_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create CSV file {}", path.display()))?;
    CsvWriter::new(file)
        .include_header(true)
        .finish(df)
        .context("Failed to write CSV file")?;
    Ok(())
}
