//! Configuration management
//!
//! A [`TransferConfig`] is built once at startup (see [`crate::cli::Cli`]) and
//! handed to each stage by reference. Nothing reads the environment after that.

use std::fmt;

// ============================================================================
// Configuration Constants
// ============================================================================

/// MySQL port used when `RDS_PORT` is not set.
pub const DEFAULT_DATABASE_PORT: u16 = 3306;

const REDACTED: &str = "[redacted]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferConfig {
    pub aws: AwsConfig,
    pub source: SourceConfig,
    pub database: DatabaseConfig,
    pub catalog: CatalogConfig,
}

/// Credentials and region shared by the S3 and Glue clients
#[derive(Clone, PartialEq, Eq)]
pub struct AwsConfig {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    /// Endpoint override for S3-compatible stores (MinIO, LocalStack)
    pub endpoint: Option<String>,
    pub force_path_style: bool,
}

/// Object holding the CSV
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub bucket: String,
    pub key: String,
}

/// Primary sink: a MySQL table
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub table: String,
}

/// Fallback sink: an external Glue table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub database: String,
    pub table: String,
    /// Storage path the registered table points at, e.g. `s3://bucket/prefix/`
    pub location: String,
}

impl fmt::Debug for AwsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsConfig")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &REDACTED)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("force_path_style", &self.force_path_style)
            .finish()
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &REDACTED)
            .field("database", &self.database)
            .field("table", &self.table)
            .finish()
    }
}
