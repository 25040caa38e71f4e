use super::binning::AgeBins;
use super::naming::standardise_headers;
use super::observer::{TransformEvent, TransformObserver, TransformStep};
use crate::error::{EtlError, Result};
use polars::prelude::*;

pub const ID: &str = "id";
pub const AGE: &str = "age";
pub const CREDIT_SCORE: &str = "credit_score";
pub const ANNUAL_MILEAGE: &str = "annual_mileage";
pub const PAST_ACCIDENTS: &str = "past_accidents";
pub const AGE_GROUP: &str = "age_group";
pub const HAD_PAST_ACCIDENTS: &str = "had_past_accidents";

/// Columns the transform reads, named as they are after header normalization.
pub const REQUIRED_COLUMNS: [&str; 5] = [ID, AGE, CREDIT_SCORE, ANNUAL_MILEAGE, PAST_ACCIDENTS];

pub const DEFAULT_AGE_FALLBACK: f64 = 30.0;

/// Fixed constants the transform applies.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformPolicy {
    pub bins: AgeBins,
    /// Fills missing ages when no age in the table could be parsed.
    pub age_fallback: f64,
}

impl Default for TransformPolicy {
    fn default() -> Self {
        Self {
            bins: AgeBins::default(),
            age_fallback: DEFAULT_AGE_FALLBACK,
        }
    }
}

/// Cleans a raw claims table and derives `age_group` and `had_past_accidents`.
///
/// The input table is never modified. An absent input yields an absent
/// output. Rows are neither dropped nor reordered; `age` and
/// `past_accidents` are replaced by the two derived columns, appended after
/// the remaining columns.
///
/// # Errors
///
/// Returns [`EtlError::MissingColumn`] when one of [`REQUIRED_COLUMNS`] is
/// missing after header normalization, and [`EtlError::DataProcessing`] if
/// polars rejects an operation (for example two headers that normalize to the
/// same name). Malformed cells never cause an error.
pub fn transform(
    raw: Option<&DataFrame>,
    policy: &TransformPolicy,
    observer: &dyn TransformObserver,
) -> Result<Option<DataFrame>> {
    let Some(raw) = raw else {
        observer.notify(&TransformEvent::InputAbsent);
        return Ok(None);
    };
    observer.notify(&TransformEvent::Started { rows: raw.height() });

    let mut df = raw.clone();

    // 1. Headers first: every later step uses the normalized names.
    let headers = standardise_headers(df.get_column_names().into_iter().map(PlSmallStr::as_str));
    df.set_column_names(headers)?;
    require_columns(&df)?;
    observer.notify(&TransformEvent::StepCompleted(TransformStep::StandardisedHeaders));

    // 2. Unparseable ages become missing rather than failing the row.
    let ages = coerce_numeric(&df, AGE, observer)?;
    observer.notify(&TransformEvent::StepCompleted(TransformStep::CoercedAge));

    // 3. Medians are taken before filling; the age median sees coerced values only.
    let credit_scores = coerce_numeric(&df, CREDIT_SCORE, observer)?;
    let credit_scores = median_fill(credit_scores, CREDIT_SCORE, None, observer)?;
    df.with_column(credit_scores.into_series())?;

    let mileage = coerce_numeric(&df, ANNUAL_MILEAGE, observer)?;
    let mileage = median_fill(mileage, ANNUAL_MILEAGE, None, observer)?;
    df.with_column(mileage.into_series())?;

    let ages = median_fill(ages, AGE, Some(policy.age_fallback), observer)?;
    observer.notify(&TransformEvent::StepCompleted(TransformStep::ImputedMissing));

    // 4. Identifiers are text; ages are whole years, truncated by the cast.
    let ids = df
        .column(ID)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    df.with_column(ids)?;

    let ages = ages.into_series().cast(&DataType::Int64)?;
    df.with_column(ages.clone())?;
    observer.notify(&TransformEvent::StepCompleted(TransformStep::NormalisedTypes));

    // 5. Ages outside every bucket stay null.
    let age_groups: Vec<Option<&str>> = ages
        .i64()?
        .into_iter()
        .map(|age| age.and_then(|age| policy.bins.label_for(age)))
        .collect();
    df.with_column(Series::new(AGE_GROUP.into(), age_groups))?;
    observer.notify(&TransformEvent::StepCompleted(TransformStep::BinnedAge));

    // 6.
    let accidents = to_float(df.column(PAST_ACCIDENTS)?.as_materialized_series())?;
    let (flags, defaulted) = past_accident_flags(&accidents);
    if defaulted > 0 {
        observer.notify(&TransformEvent::PastAccidentsDefaulted { rows: defaulted });
    }
    df.with_column(Series::new(HAD_PAST_ACCIDENTS.into(), flags))?;
    observer.notify(&TransformEvent::StepCompleted(
        TransformStep::FlaggedPastAccidents,
    ));

    // 7.
    let df = df.drop(AGE)?.drop(PAST_ACCIDENTS)?;
    observer.notify(&TransformEvent::StepCompleted(TransformStep::DroppedSuperseded));

    observer.notify(&TransformEvent::Completed { rows: df.height() });
    Ok(Some(df))
}

fn require_columns(df: &DataFrame) -> Result<()> {
    match REQUIRED_COLUMNS
        .iter()
        .find(|name| df.get_column_index(name).is_none())
    {
        Some(missing) => Err(EtlError::MissingColumn((*missing).to_owned())),
        None => Ok(()),
    }
}

/// Casts a column to `f64`, turning unparseable values and NaN into nulls.
///
/// Reports how many values were present before the cast but missing after it.
fn coerce_numeric(
    df: &DataFrame,
    column: &'static str,
    observer: &dyn TransformObserver,
) -> Result<Float64Chunked> {
    let raw = df.column(column)?.as_materialized_series();
    let coerced = to_float(raw)?;
    let malformed = coerced.null_count().saturating_sub(raw.null_count());
    observer.notify(&TransformEvent::Coerced { column, malformed });
    Ok(coerced)
}

fn to_float(series: &Series) -> Result<Float64Chunked> {
    let coerced = series.cast(&DataType::Float64)?;
    Ok(coerced.f64()?.apply(|v| v.filter(|x| !x.is_nan())))
}

/// Replaces nulls with the median of the non-null values.
///
/// When the column has no values at all, `fallback` is used instead; without
/// a fallback the column is returned unchanged.
fn median_fill(
    values: Float64Chunked,
    column: &'static str,
    fallback: Option<f64>,
    observer: &dyn TransformObserver,
) -> Result<Float64Chunked> {
    let fill = match values.median() {
        Some(median) => Some(median),
        None => {
            observer.notify(&TransformEvent::MedianUnavailable { column, fallback });
            fallback
        }
    };

    match fill {
        Some(fill) if values.null_count() > 0 => Ok(values.fill_null_with_values(fill)?),
        _ => Ok(values),
    }
}

/// `1` where the count is positive, else `0`. Missing counts are flagged `0`
/// and tallied in the second return value.
fn past_accident_flags(accidents: &Float64Chunked) -> (Vec<i32>, usize) {
    let mut defaulted = 0;
    let flags = accidents
        .into_iter()
        .map(|count| match count {
            Some(count) => i32::from(count > 0.0),
            None => {
                defaulted += 1;
                0
            }
        })
        .collect();
    (flags, defaulted)
}
