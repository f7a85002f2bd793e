//! csvrelay - S3 to MySQL transfer with a Glue catalog fallback

use anyhow::Context;
use clap::Parser;
use csvrelay::{
    aws::load_sdk_config, catalog::GlueCatalog, cli::Cli, database::MySqlTableSink,
    storage::S3ObjectStore, TransferOrchestrator,
};
use csvrelay_common::logging::{init_logging, LogConfig, LogLevel};
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // A missing .env is normal in deployed environments
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let logging = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("csvrelay")
        .build()
        .merge_env()
        .context("invalid logging configuration")
        .and_then(|config| init_logging(&config).context("failed to initialize logging"));

    let _guard = match logging {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        },
    };

    let config = cli.into_config();
    info!(
        bucket = %config.source.bucket,
        key = %config.source.key,
        "Starting transfer"
    );

    let sdk_config = load_sdk_config(&config.aws).await;
    let store = S3ObjectStore::new(&sdk_config, &config.aws);
    let table_sink = MySqlTableSink::new(&config.database);
    let catalog = GlueCatalog::new(&sdk_config);

    let outcome = TransferOrchestrator::new(&store, &table_sink, &catalog, &config)
        .run()
        .await;

    let code = outcome.exit_code();
    if code == 0 {
        info!(state = %outcome.terminal_state(), "Transfer finished");
    } else {
        error!(state = %outcome.terminal_state(), "Transfer failed");
    }

    ExitCode::from(code)
}
