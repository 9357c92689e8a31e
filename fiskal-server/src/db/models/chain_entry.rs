//! Chain Entry Model (财政链条目)
//!
//! 每条链条目引用前一条的签名，构成 per (tenant, register) 的防篡改链。
//! 条目一经持久化即不可变，永不更新或删除。

use serde::{Deserialize, Serialize};

/// 链条目载荷类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadKind {
    /// 单笔交易
    Transaction,
    /// 日结 (Z-Report)
    Closing,
}

impl std::fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transaction => write!(f, "transaction"),
            Self::Closing => write!(f, "closing"),
        }
    }
}

/// 财政链条目（不可变）
///
/// - `previous_signature`: 前一条目的签名；链首为哨兵值
/// - `hash`: SHA256Base64(register ‖ canonical(payload) ‖ previous_signature)，
///   可从存储字段独立重算
/// - `signature`: 对 `hash` 字节的签名（Base64）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainEntry {
    /// 租户 ID
    pub tenant_id: String,
    /// 收银机 ID
    pub cash_register_id: String,
    /// 链内递增序列号（读取顺序的依据；链接关系才是真相来源）
    pub sequence: u64,
    /// 载荷类型
    pub payload_kind: PayloadKind,
    /// 不透明载荷（可规范化的 JSON）
    pub payload: serde_json::Value,
    /// 前一条目的签名
    pub previous_signature: String,
    /// 条目哈希 (SHA256, Base64)
    pub hash: String,
    /// 签名 (Base64)
    pub signature: String,
    /// 签名证书序列号
    pub cert_serial_number: String,
    /// 创建时间（Unix 毫秒，仅供参考）
    pub created_at: i64,
}

/// `append` 返回给调用方的链戳记（如用于回填交易记录）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainStamp {
    pub hash: String,
    pub signature: String,
}
