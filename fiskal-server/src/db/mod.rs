//! Database Module
//!
//! Handles the embedded SurrealDB instance and schema definition

pub mod models;
pub mod repository;

use shared::AppError;
use std::path::Path;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the embedded database under the given path
    pub async fn new(db_path: &Path) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns("fiskal")
            .use_db("ledger")
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        tracing::info!(path = %db_path.display(), "Database connection established (RocksDB)");

        define_schema(&db).await?;

        Ok(Self { db })
    }
}

/// Declarative schema: tables plus the indexes the invariants lean on.
/// IF NOT EXISTS keeps this idempotent across restarts.
pub async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        "
        DEFINE TABLE IF NOT EXISTS chain_entry SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS chain_entry_seq ON chain_entry
            FIELDS tenant_id, cash_register_id, sequence UNIQUE;

        DEFINE TABLE IF NOT EXISTS fiscal_config SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS fiscal_config_tenant ON fiscal_config
            FIELDS tenant_id UNIQUE;

        DEFINE TABLE IF NOT EXISTS pos_transaction SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS pos_transaction_day ON pos_transaction
            FIELDS tenant_id, timestamp;

        DEFINE TABLE IF NOT EXISTS z_report SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS z_report_tenant_date ON z_report
            FIELDS tenant_id, report_date UNIQUE;

        DEFINE TABLE IF NOT EXISTS transmission_log SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS transmission_log_tenant ON transmission_log
            FIELDS tenant_id, created_at;

        DEFINE TABLE IF NOT EXISTS error_log SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS error_log_tenant ON error_log
            FIELDS tenant_id, created_at;
        ",
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;

    tracing::info!("Database schema defined");
    Ok(())
}
