use super::load::TableSink;
use crate::config::DbSettings;
use crate::error::{EtlError, Result, ResultExt as _};
use polars::prelude::*;
use sqlx::postgres::PgConnection;
use sqlx::{Connection as _, Postgres, Transaction};
use tracing::{error, info};

const COPY_CHUNK_ROWS: usize = 10_000;

/// Replaces a PostgreSQL table with the contents of a `DataFrame`.
///
/// One connection per load, no pool and no retries. The drop, create and
/// copy run in a single transaction, so a failed load leaves the previous
/// table in place.
#[derive(Debug, Clone)]
pub struct PostgresSink {
    connection: DbSettings,
    table: String,
}

impl PostgresSink {
    pub fn new(connection: DbSettings, table: impl Into<String>) -> Self {
        Self {
            connection,
            table: table.into(),
        }
    }

    fn qualified_table(&self) -> String {
        match self.connection.schema.as_str() {
            "" => quote_ident(&self.table),
            schema => format!("{}.{}", quote_ident(schema), quote_ident(&self.table)),
        }
    }

    async fn replace_table(&self, df: &mut DataFrame) -> std::result::Result<(), LoadFailure> {
        let mut conn = PgConnection::connect_with(&self.connection.connect_options())
            .await
            .map_err(LoadFailure::Connect)?;

        let result = self.replace_table_with(&mut conn, df).await;
        if let Err(e) = conn.close().await {
            tracing::debug!("Closing database connection failed: {e}");
        }
        result.map_err(LoadFailure::Persist)
    }

    async fn replace_table_with(&self, conn: &mut PgConnection, df: &mut DataFrame) -> Result<()> {
        let target = self.qualified_table();
        let mut tx: Transaction<'_, Postgres> = conn.begin().await?;

        sqlx::query(&format!("DROP TABLE IF EXISTS {target}"))
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to drop table {target}"))?;

        sqlx::query(&create_table_sql(&target, &df.schema()))
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to create table {target}"))?;

        let mut writer = tx
            .copy_in_raw(&format!(
                "COPY {target} FROM STDIN WITH (FORMAT csv, NULL '')"
            ))
            .await
            .context("Failed to initiate COPY command")?;

        let height = df.height();
        for offset in (0..height).step_by(COPY_CHUNK_ROWS) {
            let len = COPY_CHUNK_ROWS.min(height - offset);
            let mut chunk = df.slice(offset as i64, len);

            let mut buf = Vec::new();
            CsvWriter::new(&mut buf)
                .include_header(false)
                .with_separator(b',')
                .with_null_value(String::new())
                .finish(&mut chunk)
                .context("Failed to serialize table chunk to CSV")?;

            writer
                .send(buf)
                .await
                .context("Failed to send data chunk via COPY")?;
        }

        let copied = writer
            .finish()
            .await
            .context("Failed to finish COPY command")?;
        tx.commit().await.context("Failed to commit table replace")?;

        info!(rows = copied, table = %target, "Replaced database table.");
        Ok(())
    }
}

enum LoadFailure {
    Connect(sqlx::Error),
    Persist(EtlError),
}

impl TableSink for PostgresSink {
    fn describe(&self) -> String {
        format!(
            "postgres://{}:{}/{} table {}",
            self.connection.host,
            self.connection.port,
            self.connection.database,
            self.qualified_table()
        )
    }

    /// Never returns `Err`: every failure is logged and reported as `Ok(false)`.
    fn load(&self, table: &mut DataFrame) -> Result<bool> {
        info!("Starting data loading to: {}", self.describe());

        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                error!("Database load failed: could not start async runtime: {e}");
                return Ok(false);
            }
        };

        match runtime.block_on(self.replace_table(table)) {
            Ok(()) => {
                info!("Data loading complete.");
                Ok(true)
            }
            Err(LoadFailure::Connect(e)) => {
                error!("Database connection failed: {e}");
                Ok(false)
            }
            Err(LoadFailure::Persist(e)) => {
                error!("Database load failed: {e}");
                Ok(false)
            }
        }
    }
}

pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

pub fn sql_type(dtype: &DataType) -> &'static str {
    match dtype {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => "BIGINT",
        DataType::Float32 | DataType::Float64 => "DOUBLE PRECISION",
        DataType::Boolean => "BOOLEAN",
        DataType::Date => "DATE",
        DataType::Datetime(_, _) => "TIMESTAMPTZ",
        _ => "TEXT",
    }
}

pub fn create_table_sql(target: &str, schema: &Schema) -> String {
    let columns: Vec<String> = schema
        .iter()
        .map(|(name, dtype)| format!("{} {}", quote_ident(name), sql_type(dtype)))
        .collect();
    format!("CREATE TABLE {target} ({})", columns.join(", "))
}
