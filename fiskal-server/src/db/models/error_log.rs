//! Error Log Model (错误日志)
//!
//! Append-only 审计日志：所有失败路径在错误向上传播之前先落一条记录，
//! 调用方永远不会观察到静默失败。

use serde::{Deserialize, Serialize};

/// 错误日志条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorLogEntry {
    /// 租户 ID（系统级错误为 "system"）
    pub tenant_id: String,
    /// 出错环节（如 "chain_append", "daily_close", "submission"）
    pub scope: String,
    /// 错误描述
    pub message: String,
    /// 创建时间（Unix 毫秒）
    pub created_at: i64,
}
