//! Z-Report Model (日结报告)
//!
//! 每租户每自然日最多一份，由 DailyCloser 创建即终态，
//! 不存在中间持久化状态。

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Z-Report 状态（创建即终态）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZReportStatus {
    Finalized,
}

/// 日结报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZReport {
    /// 租户 ID
    pub tenant_id: String,
    /// 营业日期 (YYYY-MM-DD)
    pub report_date: String,
    /// 当日营业额合计
    pub total_sales: Decimal,
    /// 当日交易笔数
    pub transaction_count: u32,
    /// 承载本报告签名的链条目哈希
    pub hash: String,
    /// 承载本报告签名的链条目签名
    pub signature: String,
    /// 状态
    pub status: ZReportStatus,
    /// 创建时间（Unix 毫秒）
    pub created_at: i64,
}
