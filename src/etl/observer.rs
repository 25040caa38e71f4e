//! Progress reporting for the transform.
//!
//! The transform never logs directly. It hands [`TransformEvent`]s to a
//! [`TransformObserver`], so tests can record them and the binary can route
//! them to `tracing` through [`TracingObserver`].

use tracing::{info, warn};

/// The ordered steps of the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformStep {
    StandardisedHeaders,
    CoercedAge,
    ImputedMissing,
    NormalisedTypes,
    BinnedAge,
    FlaggedPastAccidents,
    DroppedSuperseded,
}

impl TransformStep {
    pub fn description(self) -> &'static str {
        match self {
            Self::StandardisedHeaders => "Standardized column names.",
            Self::CoercedAge => "Cleaned 'age' column by coercing non-numeric values to missing.",
            Self::ImputedMissing => {
                "Handled missing values in 'credit_score', 'annual_mileage', and 'age'."
            }
            Self::NormalisedTypes => "Corrected data types.",
            Self::BinnedAge => "Engineered new feature: 'age_group'.",
            Self::FlaggedPastAccidents => "Engineered new feature: 'had_past_accidents'.",
            Self::DroppedSuperseded => "Dropped original columns: 'age', 'past_accidents'.",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransformEvent {
    /// The extractor produced nothing; the transform was skipped.
    InputAbsent,
    Started { rows: usize },
    StepCompleted(TransformStep),
    /// Present values of a numeric column that could not be read as numbers,
    /// NaN included, and are now missing.
    Coerced {
        column: &'static str,
        malformed: usize,
    },
    /// A column had no values to take a median from. `fallback` is the value
    /// used instead, if the column has one.
    MedianUnavailable {
        column: &'static str,
        fallback: Option<f64>,
    },
    /// Rows whose `past_accidents` was missing or non-numeric, flagged as 0.
    PastAccidentsDefaulted { rows: usize },
    Completed { rows: usize },
}

pub trait TransformObserver {
    fn notify(&self, event: &TransformEvent);
}

impl<F> TransformObserver for F
where
    F: Fn(&TransformEvent),
{
    fn notify(&self, event: &TransformEvent) {
        self(event);
    }
}

/// Writes transform events to the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl TransformObserver for TracingObserver {
    fn notify(&self, event: &TransformEvent) {
        match event {
            TransformEvent::InputAbsent => {
                warn!("Transformation skipped: input table is absent.");
            }
            TransformEvent::Started { rows } => {
                info!(rows, "Starting data transformation...");
            }
            TransformEvent::StepCompleted(step) => info!("{}", step.description()),
            TransformEvent::Coerced { malformed: 0, .. } => {}
            TransformEvent::Coerced { column, malformed } => {
                warn!(malformed, "Non-numeric '{column}' values coerced to missing.");
            }
            TransformEvent::MedianUnavailable {
                column,
                fallback: Some(fallback),
            } => {
                warn!("Could not calculate median {column}. Filling missing values with {fallback}.");
            }
            TransformEvent::MedianUnavailable {
                column,
                fallback: None,
            } => {
                warn!("Could not calculate median {column}. Missing values left in place.");
            }
            TransformEvent::PastAccidentsDefaulted { rows } => {
                warn!(rows, "Missing or non-numeric 'past_accidents' treated as no past accidents.");
            }
            TransformEvent::Completed { rows } => {
                info!(rows, "Data transformation complete.");
            }
        }
    }
}
