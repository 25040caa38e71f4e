//! Pipeline configuration.
//!
//! Everything the pipeline needs is passed in as a [`PipelineConfig`]; there
//! are no process-wide settings. Configs are read from JSON:
//!
//! ```json
//! {
//!   "input_path": "Car_Insurance_Claim.csv",
//!   "sink": { "type": "Database", "table": "car_insurance_claims",
//!             "connection": { "host": "localhost", "user": "etl", "password": "...",
//!                             "database": "claims" } },
//!   "bin_edges": [16, 25, 40, 65, 100],
//!   "bin_labels": ["16-25", "26-40", "41-65", "65+"],
//!   "age_fallback_default": 30
//! }
//! ```

use crate::error::{Result, ResultExt as _};
use crate::etl::binning::{AgeBins, DEFAULT_AGE_EDGES, DEFAULT_AGE_LABELS};
use crate::etl::db::PostgresSink;
use crate::etl::load::{CsvFileSink, TableSink};
use crate::etl::transform::{DEFAULT_AGE_FALLBACK, TransformPolicy};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use sqlx::postgres::PgConnectOptions;
use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT_PATH: &str = "Car_Insurance_Claim.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "clean_car_insurance_claim.csv";
pub const DEFAULT_TABLE: &str = "car_insurance_claims";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub input_path: PathBuf,
    pub sink: SinkTarget,
    pub bin_edges: Vec<i64>,
    pub bin_labels: Vec<String>,
    pub age_fallback_default: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            sink: SinkTarget::default(),
            bin_edges: DEFAULT_AGE_EDGES.to_vec(),
            bin_labels: DEFAULT_AGE_LABELS.iter().map(|l| (*l).to_owned()).collect(),
            age_fallback_default: DEFAULT_AGE_FALLBACK,
        }
    }
}

impl PipelineConfig {
    /// Reads a JSON config file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// The file cannot be read or is not valid JSON for this structure.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Validated transform constants.
    ///
    /// # Errors
    ///
    /// Returns a config error when the bin edges and labels do not describe
    /// a valid set of buckets.
    pub fn policy(&self) -> Result<TransformPolicy> {
        Ok(TransformPolicy {
            bins: AgeBins::new(self.bin_edges.clone(), self.bin_labels.clone())?,
            age_fallback: self.age_fallback_default,
        })
    }
}

/// Where the cleaned table goes.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "PascalCase")]
pub enum SinkTarget {
    File {
        path: PathBuf,
    },
    Database {
        #[serde(default)]
        connection: DbSettings,
        #[serde(default = "default_table")]
        table: String,
    },
}

fn default_table() -> String {
    DEFAULT_TABLE.to_owned()
}

impl Default for SinkTarget {
    fn default() -> Self {
        Self::File {
            path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

impl SinkTarget {
    pub fn build(&self) -> Box<dyn TableSink> {
        match self {
            Self::File { path } => Box::new(CsvFileSink::new(path.clone())),
            Self::Database { connection, table } => {
                Box::new(PostgresSink::new(connection.clone(), table.clone()))
            }
        }
    }
}

/// Connection descriptor for the database sink.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DbSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    #[serde(deserialize_with = "deserialize_password")]
    pub password: SecretString,
    pub database: String,
    /// Empty means the connection's default search path.
    pub schema: String,
}

fn deserialize_password<'de, D>(deserializer: D) -> std::result::Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(SecretString::new(s.into()))
}

impl Default for DbSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_owned(),
            port: 5432,
            user: "postgres".to_owned(),
            password: SecretString::new(String::new().into()),
            database: "postgres".to_owned(),
            schema: "public".to_owned(),
        }
    }
}

impl DbSettings {
    pub fn connect_options(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.database);

        match self.password.expose_secret() {
            "" => options,
            password => options.password(password),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_reference_paths() {
        let config = PipelineConfig::default();
        assert_eq!(config.input_path, PathBuf::from("Car_Insurance_Claim.csv"));
        assert!(matches!(
            config.sink,
            SinkTarget::File { ref path } if path == Path::new("clean_car_insurance_claim.csv")
        ));
        assert_eq!(config.policy().expect("default policy is valid"), TransformPolicy::default());
    }

    #[test]
    fn test_parse_database_sink() {
        let json = r#"{
            "input_path": "raw/claims.csv",
            "sink": {
                "type": "Database",
                "connection": { "host": "db.internal", "port": 6543, "user": "etl",
                                "password": "hunter2", "database": "claims" }
            },
            "age_fallback_default": 35
        }"#;
        let config: PipelineConfig = serde_json::from_str(json).expect("valid config");

        assert_eq!(config.input_path, PathBuf::from("raw/claims.csv"));
        assert!((config.age_fallback_default - 35.0).abs() < f64::EPSILON);
        assert_eq!(config.bin_edges, DEFAULT_AGE_EDGES.to_vec());

        let SinkTarget::Database { connection, table } = &config.sink else {
            panic!("expected a database sink, got {:?}", config.sink);
        };
        assert_eq!(table, DEFAULT_TABLE);
        assert_eq!(connection.host, "db.internal");
        assert_eq!(connection.port, 6543);
        assert_eq!(connection.schema, "public");
        assert_eq!(connection.password.expose_secret(), "hunter2");
        assert!(!format!("{connection:?}").contains("hunter2"));
    }

    #[test]
    fn test_mismatched_labels_rejected() {
        let config = PipelineConfig {
            bin_labels: vec!["young".to_owned(), "old".to_owned()],
            ..PipelineConfig::default()
        };
        assert!(config.policy().is_err());
    }
}
