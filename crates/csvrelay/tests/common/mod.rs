//! Shared helpers for csvrelay integration tests
//!
//! - In-memory fakes for the three collaborators, each counting its calls
//! - A MySQL container for the sink tests (requires Docker)

#![allow(dead_code)]

use anyhow::{Context, Result};
use async_trait::async_trait;
use csvrelay::catalog::{CatalogSink, CatalogTableDescriptor};
use csvrelay::config::{AwsConfig, CatalogConfig, DatabaseConfig, SourceConfig, TransferConfig};
use csvrelay::database::TableSink;
use csvrelay::storage::ObjectStore;
use csvrelay::{Dataset, TransferError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use testcontainers::{core::IntoContainerPort, runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::mysql::Mysql;
use tracing::info;

pub const ORDERS_CSV: &[u8] = b"id,amount\n1,42.5\n";

pub fn test_config() -> TransferConfig {
    TransferConfig {
        aws: AwsConfig {
            access_key_id: "AKIAEXAMPLE".to_string(),
            secret_access_key: "secret".to_string(),
            region: "us-east-1".to_string(),
            endpoint: None,
            force_path_style: false,
        },
        source: SourceConfig {
            bucket: "landing".to_string(),
            key: "daily/orders.csv".to_string(),
        },
        database: DatabaseConfig {
            host: "db.internal".to_string(),
            port: 3306,
            user: "loader".to_string(),
            password: "hunter2".to_string(),
            database: "sales".to_string(),
            table: "orders".to_string(),
        },
        catalog: CatalogConfig {
            database: "lake".to_string(),
            table: "orders_raw".to_string(),
            location: "s3://landing/daily/".to_string(),
        },
    }
}

// ============================================================================
// Object store
// ============================================================================

/// Serves scripted responses in order, then `body` forever
pub struct FakeStore {
    scripted: Mutex<VecDeque<Result<Vec<u8>, TransferError>>>,
    body: Result<Vec<u8>, TransferError>,
    calls: AtomicUsize,
}

impl FakeStore {
    pub fn serving(body: &[u8]) -> Self {
        Self::new(Vec::new(), Ok(body.to_vec()))
    }

    pub fn failing(message: &str) -> Self {
        Self::new(Vec::new(), Err(TransferError::source_unavailable(message)))
    }

    pub fn new(
        scripted: Vec<Result<Vec<u8>, TransferError>>,
        body: Result<Vec<u8>, TransferError>,
    ) -> Self {
        Self {
            scripted: Mutex::new(scripted.into()),
            body,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn get_object(&self, _bucket: &str, _key: &str) -> csvrelay::Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.scripted.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.body.clone())
    }
}

// ============================================================================
// Table sink
// ============================================================================

pub struct FakeTableSink {
    fail_with: Option<TransferError>,
    calls: AtomicUsize,
    appended: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeTableSink {
    pub fn accepting() -> Self {
        Self {
            fail_with: None,
            calls: AtomicUsize::new(0),
            appended: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self::failing_with(TransferError::sink_write(message))
    }

    pub fn failing_with(err: TransferError) -> Self {
        Self {
            fail_with: Some(err),
            ..Self::accepting()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// (table, column names) per successful append
    pub fn appended(&self) -> Vec<(String, Vec<String>)> {
        self.appended.lock().unwrap().clone()
    }
}

#[async_trait]
impl TableSink for FakeTableSink {
    async fn append(&self, table: &str, dataset: &Dataset) -> csvrelay::Result<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }

        let columns = dataset.column_names().map(str::to_string).collect();
        self.appended
            .lock()
            .unwrap()
            .push((table.to_string(), columns));
        Ok(dataset.row_count() as u64)
    }
}

// ============================================================================
// Catalog
// ============================================================================

pub struct FakeCatalog {
    fail_with: Option<TransferError>,
    calls: AtomicUsize,
    registered: Mutex<Vec<(String, CatalogTableDescriptor)>>,
}

impl FakeCatalog {
    pub fn accepting() -> Self {
        Self {
            fail_with: None,
            calls: AtomicUsize::new(0),
            registered: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self::failing_with(TransferError::catalog_registration(message))
    }

    pub fn failing_with(err: TransferError) -> Self {
        Self {
            fail_with: Some(err),
            ..Self::accepting()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn registered(&self) -> Vec<(String, CatalogTableDescriptor)> {
        self.registered.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogSink for FakeCatalog {
    async fn create_table(
        &self,
        database: &str,
        descriptor: &CatalogTableDescriptor,
    ) -> csvrelay::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }

        self.registered
            .lock()
            .unwrap()
            .push((database.to_string(), descriptor.clone()));
        Ok(())
    }
}

// ============================================================================
// MySQL Test Container
// ============================================================================

/// MySQL container with the module's defaults: `root` with an empty
/// password and a database named `test`
pub struct TestMysql {
    container: ContainerAsync<Mysql>,
    host: String,
    port: u16,
}

impl TestMysql {
    pub async fn start() -> Result<Self> {
        info!("Starting MySQL test container...");

        let container = Mysql::default()
            .start()
            .await
            .context("Failed to start MySQL container")?;

        let host = container
            .get_host()
            .await
            .context("Failed to get container host")?
            .to_string();
        let port = container
            .get_host_port_ipv4(3306.tcp())
            .await
            .context("Failed to get container port")?;

        Ok(Self {
            container,
            host,
            port,
        })
    }

    pub fn database_config(&self, table: &str) -> DatabaseConfig {
        DatabaseConfig {
            host: self.host.clone(),
            port: self.port,
            user: "root".to_string(),
            password: String::new(),
            database: "test".to_string(),
            table: table.to_string(),
        }
    }

    pub fn connection_string(&self) -> String {
        format!("mysql://root@{}:{}/test", self.host, self.port)
    }
}
