//! Fiscal Config Repository
//!
//! 配置由租户管理端（外部协作方）写入；核心链路只读。
//! `create` 仅供种子数据与测试使用。

use super::RepoResult;
use crate::db::models::FiscalConfig;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct FiscalConfigRepository {
    db: Surreal<Db>,
}

impl FiscalConfigRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// 按租户查配置；缺失即前置条件失败，由调用方映射为 ConfigMissing
    pub async fn find_by_tenant(&self, tenant_id: &str) -> RepoResult<Option<FiscalConfig>> {
        let mut result = self
            .db
            .query("SELECT * FROM fiscal_config WHERE tenant_id = $tenant LIMIT 1")
            .bind(("tenant", tenant_id.to_string()))
            .await?;

        let configs: Vec<FiscalConfig> = result.take(0)?;
        Ok(configs.into_iter().next())
    }

    /// 所有活跃租户的配置（夜间日结扫这份清单）
    pub async fn list_active(&self) -> RepoResult<Vec<FiscalConfig>> {
        let mut result = self
            .db
            .query("SELECT * FROM fiscal_config WHERE status = 'active' ORDER BY tenant_id ASC")
            .await?;

        let configs: Vec<FiscalConfig> = result.take(0)?;
        Ok(configs)
    }

    /// 写入配置（种子数据/测试）
    pub async fn create(&self, config: FiscalConfig) -> RepoResult<()> {
        let mut result = self
            .db
            .query("CREATE fiscal_config CONTENT $data RETURN NONE")
            .bind(("data", config))
            .await?;
        let _: Vec<serde_json::Value> = result.take(0)?;
        Ok(())
    }
}
