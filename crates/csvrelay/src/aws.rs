//! Shared AWS SDK configuration for the S3 and Glue clients

use crate::config::AwsConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use tracing::debug;

const CREDENTIALS_PROVIDER_NAME: &str = "csvrelay-static";

/// Build an SDK config from explicit static credentials and region.
///
/// The default provider chain is not consulted: the keys given at startup
/// are the only ones used.
pub async fn load_sdk_config(config: &AwsConfig) -> SdkConfig {
    debug!(region = %config.region, "Loading AWS SDK configuration");

    let credentials = Credentials::new(
        &config.access_key_id,
        &config.secret_access_key,
        None,
        None,
        CREDENTIALS_PROVIDER_NAME,
    );

    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .credentials_provider(credentials)
        .load()
        .await
}
