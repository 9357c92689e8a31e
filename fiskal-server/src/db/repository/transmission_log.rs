//! Transmission Log Repository (append-only)

use super::RepoResult;
use crate::db::models::{TransmissionLogEntry, TransmissionStatus};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct TransmissionLogRepository {
    db: Surreal<Db>,
}

impl TransmissionLogRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// 记一条提交日志（每次尝试一条，含重试）
    pub async fn append(
        &self,
        tenant_id: &str,
        report_date: &str,
        status: TransmissionStatus,
        raw_response: String,
    ) -> RepoResult<TransmissionLogEntry> {
        let entry = TransmissionLogEntry {
            tenant_id: tenant_id.to_string(),
            report_date: report_date.to_string(),
            status,
            raw_response,
            created_at: shared::util::now_millis(),
        };

        let mut result = self
            .db
            .query("CREATE transmission_log CONTENT $data RETURN NONE")
            .bind(("data", entry.clone()))
            .await?;
        let _: Vec<serde_json::Value> = result.take(0)?;
        Ok(entry)
    }

    /// 租户提交历史，新的在前
    pub async fn list(&self, tenant_id: &str) -> RepoResult<Vec<TransmissionLogEntry>> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM transmission_log WHERE tenant_id = $tenant \
                 ORDER BY created_at DESC",
            )
            .bind(("tenant", tenant_id.to_string()))
            .await?;

        let entries: Vec<TransmissionLogEntry> = result.take(0)?;
        Ok(entries)
    }
}
