//! Transaction Repository

use super::RepoResult;
use crate::db::models::{ChainStamp, Transaction};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct TransactionRepository {
    db: Surreal<Db>,
}

impl TransactionRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// 写入交易记录
    pub async fn insert(&self, tx: Transaction) -> RepoResult<()> {
        let mut result = self
            .db
            .query("CREATE pos_transaction CONTENT $data RETURN NONE")
            .bind(("data", tx))
            .await?;
        let _: Vec<serde_json::Value> = result.take(0)?;
        Ok(())
    }

    /// 上链成功后回填链戳记
    pub async fn stamp(&self, tenant_id: &str, tx_id: i64, stamp: &ChainStamp) -> RepoResult<()> {
        let mut result = self
            .db
            .query(
                "UPDATE pos_transaction \
                 SET chain_hash = $hash, chain_signature = $sig \
                 WHERE tenant_id = $tenant AND transaction_id = $id RETURN NONE",
            )
            .bind(("hash", stamp.hash.clone()))
            .bind(("sig", stamp.signature.clone()))
            .bind(("tenant", tenant_id.to_string()))
            .bind(("id", tx_id))
            .await?;
        let _: Vec<serde_json::Value> = result.take(0)?;
        Ok(())
    }

    /// 查询 [start, end) 毫秒区间内的租户交易（日结聚合用），按业务时间升序
    pub async fn find_in_range(
        &self,
        tenant_id: &str,
        start_millis: i64,
        end_millis: i64,
    ) -> RepoResult<Vec<Transaction>> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM pos_transaction \
                 WHERE tenant_id = $tenant AND timestamp >= $start AND timestamp < $end \
                 ORDER BY timestamp ASC",
            )
            .bind(("tenant", tenant_id.to_string()))
            .bind(("start", start_millis))
            .bind(("end", end_millis))
            .await?;

        let txs: Vec<Transaction> = result.take(0)?;
        Ok(txs)
    }
}
