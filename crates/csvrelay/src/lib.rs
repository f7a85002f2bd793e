//! csvrelay
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Moves one CSV object from S3 into a MySQL table. When the load fails the
//! object is read again and registered as an external table in the Glue Data
//! Catalog instead, so the data stays queryable.
//!
//! The three external services sit behind traits ([`storage::ObjectStore`],
//! [`database::TableSink`], [`catalog::CatalogSink`]) and the
//! [`transfer::TransferOrchestrator`] only talks to those.
//!
//! # Example
//!
//! ```no_run
//! use clap::Parser;
//! use csvrelay::{
//!     aws::load_sdk_config, catalog::GlueCatalog, cli::Cli, database::MySqlTableSink,
//!     storage::S3ObjectStore, transfer::TransferOrchestrator,
//! };
//!
//! # async fn run() {
//! let config = Cli::parse().into_config();
//! let sdk_config = load_sdk_config(&config.aws).await;
//!
//! let store = S3ObjectStore::new(&sdk_config, &config.aws);
//! let table_sink = MySqlTableSink::new(&config.database);
//! let catalog = GlueCatalog::new(&sdk_config);
//!
//! let outcome = TransferOrchestrator::new(&store, &table_sink, &catalog, &config)
//!     .run()
//!     .await;
//! println!("finished in {}", outcome.terminal_state());
//! # }
//! ```

pub mod aws;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod database;
pub mod dataset;
pub mod error;
pub mod source;
pub mod storage;
pub mod transfer;

pub use config::TransferConfig;
pub use dataset::Dataset;
pub use error::{Result, TransferError};
pub use transfer::{Completion, TransferOrchestrator, TransferOutcome, TransferState};
