use super::naming::standardise_header;
use super::transform::ID;
use crate::error::{Result, ResultExt as _};
use polars::prelude::*;
use std::io::{BufRead as _, BufReader};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

/// Tokens read as missing, in addition to the empty field.
const NULL_TOKENS: [&str; 12] = [
    "NA", "<NA>", "N/A", "n/a", "#N/A", "NaN", "nan", "-nan", "-NaN", "null", "NULL", "None",
];

const INFER_SCHEMA_ROWS: usize = 10_000;

/// Reads a delimited file with a header row.
///
/// Returns `Ok(None)` when the file does not exist. Identifier columns are
/// kept as text so values like `00123` are not reinterpreted as numbers.
///
/// # Errors
///
/// Any other I/O failure, or a file polars cannot parse as CSV.
pub fn extract(path: &Path) -> Result<Option<DataFrame>> {
    info!("Starting data extraction from: {}", path.display());

    match std::fs::metadata(path) {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            error!("Extraction failed: file not found at {}", path.display());
            return Ok(None);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to stat {}", path.display()));
        }
    }

    let overrides = identifier_overrides(path)?;
    let null_values = NULL_TOKENS.iter().map(|t| PlSmallStr::from(*t)).collect();

    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .with_null_values(Some(NullValues::AllColumns(null_values)))
        .with_dtype_overwrite(overrides)
        .finish()?
        .collect()
        .with_context(|| format!("Failed to read CSV {}", path.display()))?;

    info!("Successfully extracted {} rows of data.", df.height());
    Ok(Some(df))
}

/// Schema forcing every column whose header normalizes to `id` to text.
fn identifier_overrides(path: &Path) -> Result<Option<SchemaRef>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut header = String::new();
    BufReader::new(file).read_line(&mut header)?;

    let fields: Vec<Field> = header
        .trim_start_matches('\u{feff}')
        .trim_end_matches(['\r', '\n'])
        .split(',')
        .map(|raw| raw.trim_matches('"'))
        .filter(|raw| standardise_header(raw) == ID)
        .map(|raw| Field::new(raw.into(), DataType::String))
        .collect();

    if fields.is_empty() {
        Ok(None)
    } else {
        Ok(Some(Arc::new(Schema::from_iter(fields))))
    }
}
