//! Chain Entry Repository
//!
//! Append-only 存储：仅提供 `insert` 与有序读取，没有 update/delete。
//! “最后一条”按链内 `sequence` 取，而不是按墙钟时间。

use super::{RepoResult, RepoError};
use crate::db::models::ChainEntry;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// 查询最后一条记录用
#[derive(Debug, serde::Deserialize)]
pub struct LastChainEntry {
    pub sequence: u64,
    pub signature: String,
}

/// COUNT 结果
#[derive(Debug, serde::Deserialize)]
struct CountResult {
    total: u64,
}

#[derive(Clone)]
pub struct ChainEntryRepository {
    db: Surreal<Db>,
}

impl ChainEntryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// 读取 (tenant, register) 链上最后一条条目的序列号和签名
    ///
    /// 调用方必须已持有该链的 append 锁，否则 read-modify-write 会竞争。
    pub async fn last_entry(
        &self,
        tenant_id: &str,
        cash_register_id: &str,
    ) -> RepoResult<Option<LastChainEntry>> {
        let mut result = self
            .db
            .query(
                "SELECT sequence, signature FROM chain_entry \
                 WHERE tenant_id = $tenant AND cash_register_id = $register \
                 ORDER BY sequence DESC LIMIT 1",
            )
            .bind(("tenant", tenant_id.to_string()))
            .bind(("register", cash_register_id.to_string()))
            .await?;

        let last: Vec<LastChainEntry> = result.take(0)?;
        Ok(last.into_iter().next())
    }

    /// 追加一条链条目
    pub async fn insert(&self, entry: ChainEntry) -> RepoResult<()> {
        let mut result = self
            .db
            .query("CREATE chain_entry CONTENT $data RETURN NONE")
            .bind(("data", entry))
            .await?;
        let _: Vec<serde_json::Value> = result.take(0)?;
        Ok(())
    }

    /// 按序列号升序读取租户的完整链（导出/验证用）
    pub async fn all_ordered(&self, tenant_id: &str) -> RepoResult<Vec<ChainEntry>> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM chain_entry WHERE tenant_id = $tenant \
                 ORDER BY sequence ASC",
            )
            .bind(("tenant", tenant_id.to_string()))
            .await?;

        let entries: Vec<ChainEntry> = result.take(0)?;
        Ok(entries)
    }

    /// 分页读取（升序）
    pub async fn list(
        &self,
        tenant_id: &str,
        limit: usize,
        offset: usize,
    ) -> RepoResult<(Vec<ChainEntry>, u64)> {
        let sql = format!(
            "SELECT count() AS total FROM chain_entry WHERE tenant_id = $tenant GROUP ALL; \
             SELECT * FROM chain_entry WHERE tenant_id = $tenant \
             ORDER BY sequence ASC LIMIT {} START {}",
            limit, offset
        );
        let mut result = self
            .db
            .query(&sql)
            .bind(("tenant", tenant_id.to_string()))
            .await?;

        let count_result: Vec<CountResult> = result.take(0)?;
        let total = count_result.first().map(|c| c.total).unwrap_or(0);

        let entries: Vec<ChainEntry> = result.take(1)?;
        Ok((entries, total))
    }

    /// 读取单条（按序列号），测试与排障用
    pub async fn find_by_sequence(
        &self,
        tenant_id: &str,
        cash_register_id: &str,
        sequence: u64,
    ) -> RepoResult<ChainEntry> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM chain_entry \
                 WHERE tenant_id = $tenant AND cash_register_id = $register \
                 AND sequence = $seq LIMIT 1",
            )
            .bind(("tenant", tenant_id.to_string()))
            .bind(("register", cash_register_id.to_string()))
            .bind(("seq", sequence))
            .await?;

        let entries: Vec<ChainEntry> = result.take(0)?;
        entries
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("chain entry #{}", sequence)))
    }
}
