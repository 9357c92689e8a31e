//! 财政链模块
//!
//! Append-only 签名哈希链：每条条目引用前一条的签名，
//! 任何回溯篡改都会破坏链接关系或哈希，可被独立检测。

pub mod digest;
pub mod service;
pub mod verify;

/// 链首条目的哨兵“前签名”
pub const INITIAL_SIGNATURE: &str = "INITIAL_SIGNATURE";

pub use service::{ChainLedger, LedgerError, LedgerResult};
pub use verify::{ChainBreak, ChainVerification};
