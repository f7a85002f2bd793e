//! Command-line arguments
//!
//! Every setting can come from a flag or from the environment variable the
//! old batch job read; the flag wins. Required settings have no default and
//! the parser rejects a run where one is missing.

use crate::config::{
    AwsConfig, CatalogConfig, DatabaseConfig, SourceConfig, TransferConfig, DEFAULT_DATABASE_PORT,
};
use clap::Parser;

/// Copy a CSV object from S3 into a MySQL table, registering an external
/// Glue table over the data instead when the database load fails.
#[derive(Parser)]
#[command(name = "csvrelay")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Debug-level logging
    #[arg(short, long)]
    pub verbose: bool,

    // ------------------------------------------------------------------
    // AWS
    // ------------------------------------------------------------------
    #[arg(long, env = "AWS_ACCESS_KEY_ID", help_heading = "AWS")]
    pub aws_access_key_id: String,

    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true, help_heading = "AWS")]
    pub aws_secret_access_key: String,

    #[arg(long, env = "AWS_DEFAULT_REGION", help_heading = "AWS")]
    pub aws_region: String,

    /// Endpoint override for S3-compatible stores
    #[arg(long, env = "S3_ENDPOINT", help_heading = "AWS")]
    pub s3_endpoint: Option<String>,

    /// Address buckets as `endpoint/bucket` instead of `bucket.endpoint`
    #[arg(long, env = "S3_FORCE_PATH_STYLE", help_heading = "AWS")]
    pub s3_force_path_style: bool,

    // ------------------------------------------------------------------
    // Source
    // ------------------------------------------------------------------
    #[arg(long, env = "S3_BUCKET_NAME", help_heading = "Source")]
    pub s3_bucket_name: String,

    #[arg(long, env = "CSV_FILE_KEY", help_heading = "Source")]
    pub csv_file_key: String,

    // ------------------------------------------------------------------
    // Primary sink
    // ------------------------------------------------------------------
    #[arg(long, env = "RDS_HOST", help_heading = "Database")]
    pub rds_host: String,

    #[arg(long, env = "RDS_PORT", default_value_t = DEFAULT_DATABASE_PORT, help_heading = "Database")]
    pub rds_port: u16,

    #[arg(long, env = "RDS_USER", help_heading = "Database")]
    pub rds_user: String,

    #[arg(long, env = "RDS_PASSWORD", hide_env_values = true, help_heading = "Database")]
    pub rds_password: String,

    #[arg(long, env = "RDS_DB_NAME", help_heading = "Database")]
    pub rds_db_name: String,

    #[arg(long, env = "RDS_TABLE_NAME", help_heading = "Database")]
    pub rds_table_name: String,

    // ------------------------------------------------------------------
    // Fallback sink
    // ------------------------------------------------------------------
    #[arg(long, env = "GLUE_DB_NAME", help_heading = "Catalog")]
    pub glue_db_name: String,

    #[arg(long, env = "GLUE_TABLE_NAME", help_heading = "Catalog")]
    pub glue_table_name: String,

    /// Location the registered table points at, e.g. s3://bucket/prefix/
    #[arg(long, env = "GLUE_S3_PATH", help_heading = "Catalog")]
    pub glue_s3_path: String,
}

impl Cli {
    pub fn into_config(self) -> TransferConfig {
        TransferConfig {
            aws: AwsConfig {
                access_key_id: self.aws_access_key_id,
                secret_access_key: self.aws_secret_access_key,
                region: self.aws_region,
                endpoint: self.s3_endpoint,
                force_path_style: self.s3_force_path_style,
            },
            source: SourceConfig {
                bucket: self.s3_bucket_name,
                key: self.csv_file_key,
            },
            database: DatabaseConfig {
                host: self.rds_host,
                port: self.rds_port,
                user: self.rds_user,
                password: self.rds_password,
                database: self.rds_db_name,
                table: self.rds_table_name,
            },
            catalog: CatalogConfig {
                database: self.glue_db_name,
                table: self.glue_table_name,
                location: self.glue_s3_path,
            },
        }
    }
}
