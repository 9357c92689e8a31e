//! POS Transaction Model (交易记录)
//!
//! 交易由外部收银端创建后交给本子系统上链；
//! 上链成功后把返回的 hash/signature 回填到记录上。

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 交易记录
///
/// 业务 ID 叫 `transaction_id`，避免与 SurrealDB 的 record id 字段冲突。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Snowflake 风格 ID
    pub transaction_id: i64,
    /// 租户 ID
    pub tenant_id: String,
    /// 总金额（含税）
    pub total_amount: Decimal,
    /// 业务时间（Unix 毫秒）
    pub timestamp: i64,
    /// 上链后的条目哈希
    #[serde(default)]
    pub chain_hash: Option<String>,
    /// 上链后的条目签名
    #[serde(default)]
    pub chain_signature: Option<String>,
    /// 记录创建时间（Unix 毫秒）
    pub created_at: i64,
}

/// 创建交易请求
#[derive(Debug, Clone, Deserialize)]
pub struct NewTransaction {
    pub total_amount: Decimal,
    /// 业务时间；缺省为当前时间
    #[serde(default)]
    pub timestamp: Option<i64>,
}
