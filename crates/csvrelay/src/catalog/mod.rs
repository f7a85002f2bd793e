//! Fallback sink: register an external table in the Glue Data Catalog
//!
//! Registration only writes metadata. The data is expected to already sit
//! at the descriptor's location.

pub mod descriptor;

pub use descriptor::{CatalogColumn, CatalogTableDescriptor};

use crate::error::{Result, TransferError};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_glue::{
    error::{BuildError, DisplayErrorContext, ProvideErrorMetadata},
    types::{Column, SerDeInfo, StorageDescriptor, TableInput},
    Client,
};
use tracing::{debug, info, instrument};

/// A metadata catalog that can register tables
#[async_trait]
pub trait CatalogSink: Send + Sync {
    async fn create_table(&self, database: &str, descriptor: &CatalogTableDescriptor)
        -> Result<()>;
}

#[derive(Clone)]
pub struct GlueCatalog {
    client: Client,
}

impl GlueCatalog {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        info!("Glue client initialized");
        Self {
            client: Client::new(sdk_config),
        }
    }
}

#[async_trait]
impl CatalogSink for GlueCatalog {
    #[instrument(skip(self, descriptor), fields(table = %descriptor.name))]
    async fn create_table(
        &self,
        database: &str,
        descriptor: &CatalogTableDescriptor,
    ) -> Result<()> {
        let input = table_input(descriptor)
            .map_err(|e| TransferError::catalog_registration(e.to_string()))?;

        debug!(location = %descriptor.location, "Creating Glue table");

        self.client
            .create_table()
            .database_name(database)
            .table_input(input)
            .send()
            .await
            .map_err(|e| {
                let message = e
                    .as_service_error()
                    .and_then(|service| service.message())
                    .map(str::to_string)
                    .unwrap_or_else(|| DisplayErrorContext(&e).to_string());
                TransferError::catalog_registration(message)
            })?;

        info!("Created Glue table {}.{}", database, descriptor.name);

        Ok(())
    }
}

fn table_input(descriptor: &CatalogTableDescriptor) -> std::result::Result<TableInput, BuildError> {
    let columns = descriptor
        .columns
        .iter()
        .map(|c| Column::builder().name(&c.name).r#type(&c.column_type).build())
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let serde_info = descriptor
        .serde_parameters
        .iter()
        .fold(
            SerDeInfo::builder().serialization_library(&descriptor.serialization_library),
            |builder, (key, value)| builder.parameters(key, value),
        )
        .build();

    let storage = StorageDescriptor::builder()
        .set_columns(Some(columns))
        .location(&descriptor.location)
        .input_format(&descriptor.input_format)
        .output_format(&descriptor.output_format)
        .serde_info(serde_info)
        .build();

    TableInput::builder()
        .name(&descriptor.name)
        .storage_descriptor(storage)
        .table_type(&descriptor.table_type)
        .build()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;

    #[test]
    fn test_table_input_mirrors_descriptor() {
        let dataset = Dataset::from_csv(b"id,amount\n1,42.5\n").unwrap();
        let descriptor =
            CatalogTableDescriptor::for_dataset(&dataset, "orders_raw", "s3://landing/daily/");

        let input = table_input(&descriptor).unwrap();
        assert_eq!(input.name(), "orders_raw");
        assert_eq!(input.table_type(), Some("EXTERNAL_TABLE"));

        let storage = input.storage_descriptor().unwrap();
        assert_eq!(storage.location(), Some("s3://landing/daily/"));
        assert_eq!(storage.input_format(), Some(descriptor::TEXT_INPUT_FORMAT));
        assert_eq!(storage.output_format(), Some(descriptor::TEXT_OUTPUT_FORMAT));

        let columns: Vec<(&str, Option<&str>)> = storage
            .columns()
            .iter()
            .map(|c| (c.name(), c.r#type()))
            .collect();
        assert_eq!(columns, [("id", Some("string")), ("amount", Some("string"))]);

        let serde_info = storage.serde_info().unwrap();
        assert_eq!(
            serde_info.serialization_library(),
            Some(descriptor::LAZY_SIMPLE_SERDE)
        );
        assert_eq!(
            serde_info
                .parameters()
                .and_then(|p| p.get("field.delim"))
                .map(String::as_str),
            Some(",")
        );
    }
}
