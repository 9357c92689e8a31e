//! Z-Report Repository
//!
//! (tenant_id, report_date) 上有唯一索引，配合创建即终态的模型，
//! 保证每租户每日最多一份 finalized 报告。

use super::RepoResult;
use crate::db::models::ZReport;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct ZReportRepository {
    db: Surreal<Db>,
}

impl ZReportRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// 按日期查报告
    pub async fn find_by_date(
        &self,
        tenant_id: &str,
        report_date: &str,
    ) -> RepoResult<Option<ZReport>> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM z_report \
                 WHERE tenant_id = $tenant AND report_date = $date LIMIT 1",
            )
            .bind(("tenant", tenant_id.to_string()))
            .bind(("date", report_date.to_string()))
            .await?;

        let reports: Vec<ZReport> = result.take(0)?;
        Ok(reports.into_iter().next())
    }

    /// 写入 finalized 报告（唯一索引兜底防重）
    pub async fn insert(&self, report: ZReport) -> RepoResult<()> {
        let mut result = self
            .db
            .query("CREATE z_report CONTENT $data RETURN NONE")
            .bind(("data", report))
            .await?;
        let _: Vec<serde_json::Value> = result.take(0)?;
        Ok(())
    }

    /// 租户全部报告，按日期升序（导出用）
    pub async fn list_ordered(&self, tenant_id: &str) -> RepoResult<Vec<ZReport>> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM z_report WHERE tenant_id = $tenant \
                 ORDER BY report_date ASC",
            )
            .bind(("tenant", tenant_id.to_string()))
            .await?;

        let reports: Vec<ZReport> = result.take(0)?;
        Ok(reports)
    }
}
