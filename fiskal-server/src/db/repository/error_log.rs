//! Error Log Repository (append-only)
//!
//! 失败路径先落日志再向上传播。日志写入本身失败时只打 tracing，
//! 不能反过来吞掉原始错误。

use super::RepoResult;
use crate::db::models::ErrorLogEntry;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct ErrorLogRepository {
    db: Surreal<Db>,
}

impl ErrorLogRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// 记一条错误日志
    pub async fn append(
        &self,
        tenant_id: &str,
        scope: &str,
        message: String,
    ) -> RepoResult<ErrorLogEntry> {
        let entry = ErrorLogEntry {
            tenant_id: tenant_id.to_string(),
            scope: scope.to_string(),
            message,
            created_at: shared::util::now_millis(),
        };

        let mut result = self
            .db
            .query("CREATE error_log CONTENT $data RETURN NONE")
            .bind(("data", entry.clone()))
            .await?;
        let _: Vec<serde_json::Value> = result.take(0)?;
        Ok(entry)
    }

    /// 错误传播前的 best-effort 落盘：日志失败只记 tracing
    pub async fn append_best_effort(&self, tenant_id: &str, scope: &str, message: String) {
        if let Err(e) = self.append(tenant_id, scope, message).await {
            tracing::error!(tenant = tenant_id, scope, error = ?e, "Failed to write error log");
        }
    }

    /// 租户错误历史，新的在前
    pub async fn list(&self, tenant_id: &str) -> RepoResult<Vec<ErrorLogEntry>> {
        let mut result = self
            .db
            .query("SELECT * FROM error_log WHERE tenant_id = $tenant ORDER BY created_at DESC")
            .bind(("tenant", tenant_id.to_string()))
            .await?;

        let entries: Vec<ErrorLogEntry> = result.take(0)?;
        Ok(entries)
    }
}
