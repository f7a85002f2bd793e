//! Transfer orchestration
//!
//! A run reads the source and appends it to the database. If either step
//! fails, the source is read again from scratch and registered as an
//! external catalog table instead. There is no retry and no way back from
//! the fallback branch:
//!
//! ```text
//! Start -> ReadPrimary -> WritePrimary -> Success
//!              |               |
//!              +-------+-------+
//!                      v
//!                 ReadFallback -> WriteFallback -> FallbackSuccess
//!                      |               |
//!                      +-------+-------+
//!                              v
//!                       FallbackFailure
//! ```

use crate::catalog::{CatalogSink, CatalogTableDescriptor};
use crate::config::TransferConfig;
use crate::database::TableSink;
use crate::error::{Result, TransferError};
use crate::source::SourceReader;
use crate::storage::ObjectStore;
use std::fmt;
use tracing::{debug, error, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferState {
    Start,
    ReadPrimary,
    WritePrimary,
    Success,
    ReadFallback,
    WriteFallback,
    FallbackSuccess,
    FallbackFailure,
}

impl TransferState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransferState::Success | TransferState::FallbackSuccess | TransferState::FallbackFailure
        )
    }
}

impl fmt::Display for TransferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransferState::Start => "start",
            TransferState::ReadPrimary => "read_primary",
            TransferState::WritePrimary => "write_primary",
            TransferState::Success => "success",
            TransferState::ReadFallback => "read_fallback",
            TransferState::WriteFallback => "write_fallback",
            TransferState::FallbackSuccess => "fallback_success",
            TransferState::FallbackFailure => "fallback_failure",
        };
        write!(f, "{}", name)
    }
}

/// How a run ended, with whatever each terminal state carries
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Success {
        rows_appended: u64,
    },
    FallbackSuccess {
        primary_error: TransferError,
        descriptor: CatalogTableDescriptor,
    },
    FallbackFailure {
        primary_error: TransferError,
        fallback_error: TransferError,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransferOutcome {
    pub completion: Completion,
    /// States in the order they were entered, ending with the terminal one
    pub visited: Vec<TransferState>,
}

impl TransferOutcome {
    pub fn terminal_state(&self) -> TransferState {
        match self.completion {
            Completion::Success { .. } => TransferState::Success,
            Completion::FallbackSuccess { .. } => TransferState::FallbackSuccess,
            Completion::FallbackFailure { .. } => TransferState::FallbackFailure,
        }
    }

    /// Process exit status. A completed fallback still counts as success.
    pub fn exit_code(&self) -> u8 {
        match self.completion {
            Completion::Success { .. } | Completion::FallbackSuccess { .. } => 0,
            Completion::FallbackFailure { .. } => 1,
        }
    }
}

pub struct TransferOrchestrator<'a, S, T, C>
where
    S: ObjectStore,
    T: TableSink,
    C: CatalogSink,
{
    store: &'a S,
    table_sink: &'a T,
    catalog: &'a C,
    config: &'a TransferConfig,
}

impl<'a, S, T, C> TransferOrchestrator<'a, S, T, C>
where
    S: ObjectStore,
    T: TableSink,
    C: CatalogSink,
{
    pub fn new(store: &'a S, table_sink: &'a T, catalog: &'a C, config: &'a TransferConfig) -> Self {
        Self {
            store,
            table_sink,
            catalog,
            config,
        }
    }

    /// Read the source and append it to the database table
    pub async fn attempt_primary(&self) -> Result<u64> {
        self.primary(&mut Vec::new()).await
    }

    /// Read the source again and register it as an external catalog table
    pub async fn attempt_fallback(&self) -> Result<CatalogTableDescriptor> {
        self.fallback(&mut Vec::new()).await
    }

    /// Drive one run to a terminal state. Never fails: every error ends up
    /// in the returned outcome.
    #[instrument(skip(self))]
    pub async fn run(&self) -> TransferOutcome {
        let mut visited = vec![TransferState::Start];

        let primary_error = match self.primary(&mut visited).await {
            Ok(rows_appended) => {
                visited.push(TransferState::Success);
                info!("Data uploaded to database ({} rows)", rows_appended);
                return TransferOutcome {
                    completion: Completion::Success { rows_appended },
                    visited,
                };
            },
            Err(e) => {
                warn!(error = %e, "Primary transfer failed");
                e
            },
        };

        info!("Falling back to Glue catalog");

        match self.fallback(&mut visited).await {
            Ok(descriptor) => {
                visited.push(TransferState::FallbackSuccess);
                info!(
                    "Fallback succeeded: Glue table {}.{} created",
                    self.config.catalog.database, descriptor.name
                );
                TransferOutcome {
                    completion: Completion::FallbackSuccess {
                        primary_error,
                        descriptor,
                    },
                    visited,
                }
            },
            Err(fallback_error) => {
                visited.push(TransferState::FallbackFailure);
                error!(error = %fallback_error, "Fallback also failed");
                TransferOutcome {
                    completion: Completion::FallbackFailure {
                        primary_error,
                        fallback_error,
                    },
                    visited,
                }
            },
        }
    }

    /// Each step records its state before it starts, so `visited` names the
    /// step that failed whatever error it returned.
    async fn primary(&self, visited: &mut Vec<TransferState>) -> Result<u64> {
        visited.push(TransferState::ReadPrimary);
        let dataset = self.reader().read().await?;

        visited.push(TransferState::WritePrimary);
        info!(
            "Uploading data to {}.{}",
            self.config.database.database, self.config.database.table
        );
        self.table_sink
            .append(&self.config.database.table, &dataset)
            .await
    }

    async fn fallback(&self, visited: &mut Vec<TransferState>) -> Result<CatalogTableDescriptor> {
        visited.push(TransferState::ReadFallback);
        let dataset = self.reader().read().await?;

        let descriptor = CatalogTableDescriptor::for_dataset(
            &dataset,
            &self.config.catalog.table,
            &self.config.catalog.location,
        );
        if let Ok(columns) = serde_json::to_string(&descriptor.columns) {
            debug!(columns = %columns, "Catalog table schema");
        }

        visited.push(TransferState::WriteFallback);
        self.catalog
            .create_table(&self.config.catalog.database, &descriptor)
            .await?;

        Ok(descriptor)
    }

    fn reader(&self) -> SourceReader<'a, S> {
        SourceReader::new(self.store, &self.config.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        let terminal: Vec<_> = [
            TransferState::Start,
            TransferState::ReadPrimary,
            TransferState::WritePrimary,
            TransferState::Success,
            TransferState::ReadFallback,
            TransferState::WriteFallback,
            TransferState::FallbackSuccess,
            TransferState::FallbackFailure,
        ]
        .into_iter()
        .filter(TransferState::is_terminal)
        .collect();

        assert_eq!(
            terminal,
            [
                TransferState::Success,
                TransferState::FallbackSuccess,
                TransferState::FallbackFailure
            ]
        );
    }

    #[test]
    fn test_exit_codes() {
        let success = TransferOutcome {
            completion: Completion::Success { rows_appended: 3 },
            visited: vec![],
        };
        let failure = TransferOutcome {
            completion: Completion::FallbackFailure {
                primary_error: TransferError::sink_write("refused"),
                fallback_error: TransferError::catalog_registration("exists"),
            },
            visited: vec![],
        };

        assert_eq!(success.exit_code(), 0);
        assert_eq!(success.terminal_state(), TransferState::Success);
        assert_eq!(failure.exit_code(), 1);
        assert_eq!(failure.terminal_state(), TransferState::FallbackFailure);
        assert_eq!(TransferState::FallbackFailure.to_string(), "fallback_failure");
    }
}
