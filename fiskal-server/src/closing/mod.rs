//! 日结模块
//!
//! 每租户每日生成一份 Z-Report：聚合当日交易、作为 closing 条目
//! 上链、落 finalized 报告。夜间扫描对所有活跃租户并行执行，
//! 单租户失败不影响其他租户。

pub mod service;
pub mod sweep;

pub use service::{CloseError, CloseOutcome, DailyCloser};
pub use sweep::{ClosingSweep, TenantCloseOutcome, TenantCloseStatus};
