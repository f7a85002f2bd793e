//! Source reader: one object fetched and parsed into a [`Dataset`]

use crate::config::SourceConfig;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::storage::ObjectStore;
use tracing::{info, instrument};

pub struct SourceReader<'a, S: ObjectStore> {
    store: &'a S,
    source: &'a SourceConfig,
}

impl<'a, S: ObjectStore> SourceReader<'a, S> {
    pub fn new(store: &'a S, source: &'a SourceConfig) -> Self {
        Self { store, source }
    }

    /// Fetch and parse the configured object. Every call reads the object
    /// again from the store.
    #[instrument(skip(self), fields(bucket = %self.source.bucket, key = %self.source.key))]
    pub async fn read(&self) -> Result<Dataset> {
        info!(
            "Reading CSV from s3://{}/{}",
            self.source.bucket, self.source.key
        );

        let body = self
            .store
            .get_object(&self.source.bucket, &self.source.key)
            .await?;
        let dataset = Dataset::from_csv(&body)?;

        info!(
            columns = dataset.column_count(),
            rows = dataset.row_count(),
            "Parsed CSV"
        );

        Ok(dataset)
    }
}
