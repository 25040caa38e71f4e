use anyhow::{Context as _, Result};
use claims_etl::config::{DEFAULT_TABLE, DbSettings, PipelineConfig, SinkTarget};
use clap::{Args, Parser, Subcommand};
use secrecy::SecretString;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "claims-etl", about = "Clean car insurance claims data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean a claims file and write the result to CSV
    Clean {
        #[command(flatten)]
        common: CommonArgs,

        /// Output CSV path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Clean a claims file and replace a database table with the result
    Import {
        #[command(flatten)]
        common: CommonArgs,

        /// Target table name
        #[arg(short, long)]
        table: Option<String>,

        /// Target schema name
        #[arg(long)]
        schema: Option<String>,

        #[arg(long, env = "PGHOST")]
        host: Option<String>,

        #[arg(long, env = "PGPORT")]
        port: Option<u16>,

        #[arg(long, env = "PGUSER")]
        user: Option<String>,

        #[arg(long, env = "PGPASSWORD", hide_env_values = true)]
        password: Option<String>,

        #[arg(long, env = "PGDATABASE")]
        database: Option<String>,
    },
}

#[derive(Args, Default)]
pub struct CommonArgs {
    /// Raw claims CSV. Defaults to `Car_Insurance_Claim.csv`.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Path to a JSON pipeline configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl CommonArgs {
    fn base_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => PipelineConfig::default(),
        };
        if let Some(file) = &self.file {
            config.input_path = file.clone();
        }
        Ok(config)
    }
}

/// Builds the pipeline configuration: defaults, then the config file, then flags.
pub fn resolve_config(command: Option<Commands>) -> Result<PipelineConfig> {
    match command {
        None => CommonArgs::default().base_config(),
        Some(Commands::Clean { common, output }) => {
            let mut config = common.base_config()?;
            if let Some(path) = output {
                config.sink = SinkTarget::File { path };
            }
            Ok(config)
        }
        Some(Commands::Import {
            common,
            table,
            schema,
            host,
            port,
            user,
            password,
            database,
        }) => {
            let mut config = common.base_config()?;
            let (mut connection, mut target_table) = match config.sink {
                SinkTarget::Database { connection, table } => (connection, table),
                SinkTarget::File { .. } => (DbSettings::default(), DEFAULT_TABLE.to_owned()),
            };

            if let Some(table) = table {
                target_table = table;
            }
            if let Some(schema) = schema {
                connection.schema = schema;
            }
            if let Some(host) = host {
                connection.host = host;
            }
            if let Some(port) = port {
                connection.port = port;
            }
            if let Some(user) = user {
                connection.user = user;
            }
            if let Some(password) = password {
                connection.password = SecretString::new(password.into());
            }
            if let Some(database) = database {
                connection.database = database;
            }

            config.sink = SinkTarget::Database {
                connection,
                table: target_table,
            };
            Ok(config)
        }
    }
}
