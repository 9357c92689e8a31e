//! Transmission Log Model (提交日志)
//!
//! Append-only：每次向税务机关提交（含重试）各记一条，
//! 无论 HTTP 调用成败。

use serde::{Deserialize, Serialize};

/// 提交结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransmissionStatus {
    Success,
    Failed,
}

/// 提交日志条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransmissionLogEntry {
    /// 租户 ID
    pub tenant_id: String,
    /// 提交对应的营业日期 (YYYY-MM-DD)
    pub report_date: String,
    /// 结果
    pub status: TransmissionStatus,
    /// 机关原始响应文本（或传输层错误描述）
    pub raw_response: String,
    /// 创建时间（Unix 毫秒）
    pub created_at: i64,
}
