//! Primary sink: append a dataset to a MySQL table
//!
//! The table is created when missing, with column types taken from the
//! dataset's inference. Rows go in through batched multi-row INSERTs inside
//! one transaction, so a failure part-way leaves the table as it was.

pub mod sql;

use crate::config::DatabaseConfig;
use crate::dataset::{CellValue, Dataset};
use crate::error::Result;
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{Connection, MySql, QueryBuilder};
use tracing::{debug, info, instrument, warn};

/// A relational table that accepts appended rows
#[async_trait]
pub trait TableSink: Send + Sync {
    /// Append every row of `dataset` to `table`, creating it if absent.
    /// Returns the number of rows written.
    async fn append(&self, table: &str, dataset: &Dataset) -> Result<u64>;
}

pub struct MySqlTableSink {
    options: MySqlConnectOptions,
}

impl MySqlTableSink {
    pub fn new(config: &DatabaseConfig) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database);

        Self { options }
    }
}

#[async_trait]
impl TableSink for MySqlTableSink {
    #[instrument(skip(self, dataset), fields(rows = dataset.row_count()))]
    async fn append(&self, table: &str, dataset: &Dataset) -> Result<u64> {
        let mut conn = MySqlConnection::connect_with(&self.options).await?;
        debug!("Connected to MySQL");

        let create = sql::create_table_sql(table, dataset.columns());
        sqlx::query(&create).execute(&mut conn).await?;

        let prefix = sql::insert_prefix(table, dataset.columns());
        let batch_rows = sql::rows_per_batch(dataset.column_count());
        let mut appended = 0;

        let mut tx = conn.begin().await?;
        for chunk in dataset.rows().chunks(batch_rows) {
            let mut query_builder: QueryBuilder<MySql> = QueryBuilder::new(prefix.as_str());

            query_builder.push_values(chunk, |mut b, row| {
                for (column, cell) in dataset.columns().iter().zip(row) {
                    match column.data_type.convert(cell.as_deref()) {
                        CellValue::Null => b.push_bind(None::<String>),
                        CellValue::Integer(v) => b.push_bind(v),
                        CellValue::Float(v) => b.push_bind(v),
                        CellValue::Boolean(v) => b.push_bind(v),
                        CellValue::Text(v) => b.push_bind(v),
                    };
                }
            });

            let result = query_builder.build().execute(&mut *tx).await?;
            appended += result.rows_affected();
            debug!(batch = chunk.len(), "Inserted batch");
        }
        tx.commit().await?;

        if let Err(e) = conn.close().await {
            warn!(error = %e, "Failed to close MySQL connection cleanly");
        }

        info!("Appended {} rows to {}", appended, table);

        Ok(appended)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::TransferError;

    #[tokio::test]
    async fn test_unreachable_server_is_sink_write_error() {
        let config = DatabaseConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            user: "loader".to_string(),
            password: "secret".to_string(),
            database: "sales".to_string(),
            table: "orders".to_string(),
        };
        let dataset = Dataset::from_csv(b"id,amount\n1,42.5\n").unwrap();

        let err = MySqlTableSink::new(&config)
            .append(&config.table, &dataset)
            .await
            .unwrap_err();

        assert!(matches!(err, TransferError::SinkWrite(_)));
    }
}
