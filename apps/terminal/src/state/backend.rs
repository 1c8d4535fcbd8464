//! # Backend State
//!
//! The store selected at startup, behind the same [`PosStore`] seam the
//! commands are written against.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Backend                                                     │
//! │                                                              │
//! │   kind = "local"  ──►  Local(Database)   SQLite file, WAL    │
//! │   kind = "remote" ──►  Remote(RestStore) PostgREST over HTTP │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both stores are internally pooled and `Send + Sync`, so commands share
//! one `Backend` without locking.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::config::{BackendKind, BackendSettings, ConfigError};
use karu_core::dashboard::DateRange;
use karu_core::{
    Customer, LowStockProduct, Money, NewTransaction, NewTransactionItem, PosStore, Product,
    Transaction,
};
use karu_db::migrations::migration_status;
use karu_db::{Database, DbConfig, DbError};
use karu_remote::{RemoteError, RestStore};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error(transparent)]
    Local(#[from] DbError),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Local(e) => e.into(),
            BackendError::Remote(e) => e.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Backend {
    Local(Database),
    Remote(RestStore),
}

impl Backend {
    /// Connects to the configured store.
    ///
    /// `database_path` is required for the local backend and ignored by
    /// the remote one.
    pub async fn connect(
        settings: &BackendSettings,
        database_path: Option<PathBuf>,
    ) -> Result<Self, StartupError> {
        match settings.kind {
            BackendKind::Local => {
                let database_path = database_path.ok_or(StartupError::NoDatabasePath)?;
                info!(path = %database_path.display(), "Using local backend");
                let db = Database::new(DbConfig::new(database_path)).await?;
                let (total, applied) = migration_status(db.pool()).await?;
                debug!(total, applied, "Migration status");
                if !db.health_check().await {
                    warn!("Local database did not answer the health check");
                }
                Ok(Backend::Local(db))
            }
            BackendKind::Remote => {
                let rest = settings.rest_config()?;
                info!(url = %rest.base_url, "Using remote backend");
                Ok(Backend::Remote(RestStore::new(&rest)?))
            }
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Backend::Local(_) => BackendKind::Local,
            Backend::Remote(_) => BackendKind::Remote,
        }
    }
}

/// Failures before any screen runs.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("No database path for the local backend")]
    NoDatabasePath,

    #[error("Cannot open local database: {0}")]
    Local(#[from] DbError),

    #[error("Cannot set up remote backend: {0}")]
    Remote(#[from] RemoteError),
}

macro_rules! dispatch {
    ($self:ident, $store:ident => $call:expr) => {
        match $self {
            Backend::Local($store) => $call.await.map_err(BackendError::from),
            Backend::Remote($store) => $call.await.map_err(BackendError::from),
        }
    };
}

#[async_trait]
impl PosStore for Backend {
    type Error = BackendError;

    async fn sellable_products(&self) -> Result<Vec<Product>, BackendError> {
        dispatch!(self, s => s.sellable_products())
    }

    async fn list_customers(&self, limit: u32) -> Result<Vec<Customer>, BackendError> {
        dispatch!(self, s => s.list_customers(limit))
    }

    async fn generate_transaction_number(&self) -> Result<String, BackendError> {
        dispatch!(self, s => s.generate_transaction_number())
    }

    async fn insert_transaction(&self, txn: &NewTransaction) -> Result<Transaction, BackendError> {
        dispatch!(self, s => s.insert_transaction(txn))
    }

    async fn insert_transaction_items(&self, items: &[NewTransactionItem]) -> Result<(), BackendError> {
        dispatch!(self, s => s.insert_transaction_items(items))
    }

    async fn set_product_stock(&self, product_id: &str, stock_quantity: i64) -> Result<(), BackendError> {
        dispatch!(self, s => s.set_product_stock(product_id, stock_quantity))
    }

    async fn update_customer_loyalty(
        &self,
        customer_id: &str,
        loyalty_points: i64,
        total_spent: Money,
    ) -> Result<(), BackendError> {
        dispatch!(self, s => s.update_customer_loyalty(customer_id, loyalty_points, total_spent))
    }

    async fn completed_totals(&self, range: Option<DateRange>) -> Result<Vec<Money>, BackendError> {
        dispatch!(self, s => s.completed_totals(range))
    }

    async fn customer_count(&self) -> Result<i64, BackendError> {
        dispatch!(self, s => s.customer_count())
    }

    async fn low_stock_products(&self) -> Result<Vec<LowStockProduct>, BackendError> {
        dispatch!(self, s => s.low_stock_products())
    }

    async fn top_selling_product(&self) -> Result<Option<String>, BackendError> {
        dispatch!(self, s => s.top_selling_product())
    }
}
