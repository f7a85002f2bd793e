//! Object storage access
//!
//! The source reader only needs whole-object reads, so [`ObjectStore`] is a
//! single method. [`S3ObjectStore`] is the production implementation.

use crate::config::AwsConfig;
use crate::error::{Result, TransferError};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::{error::DisplayErrorContext, Client};
use tracing::{debug, info, instrument};

/// Read-only access to an object store
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the full body of `bucket/key`
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;
}

#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(sdk_config: &SdkConfig, aws: &AwsConfig) -> Self {
        let mut builder =
            aws_sdk_s3::config::Builder::from(sdk_config).force_path_style(aws.force_path_style);

        if let Some(endpoint) = &aws.endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        info!(
            region = %aws.region,
            endpoint = aws.endpoint.as_deref().unwrap_or("default"),
            "S3 client initialized"
        );

        Self {
            client: Client::from_conf(builder.build()),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    #[instrument(skip(self))]
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        debug!("Downloading from s3://{}/{}", bucket, key);

        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                TransferError::source_unavailable(format!(
                    "failed to get s3://{}/{}: {}",
                    bucket,
                    key,
                    DisplayErrorContext(&e)
                ))
            })?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| {
                TransferError::source_unavailable(format!(
                    "failed to read body of s3://{}/{}: {}",
                    bucket, key, e
                ))
            })?
            .into_bytes()
            .to_vec();

        debug!("Downloaded {} bytes from s3://{}/{}", data.len(), bucket, key);

        Ok(data)
    }
}
