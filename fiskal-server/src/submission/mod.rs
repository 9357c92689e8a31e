//! 机关提交模块
//!
//! 把已生成的导出文档连同租户凭据 POST 给税务机关。
//! 无论 HTTP 成败，先落 TransmissionLog 再返回/上抛（log-then-propagate）。

pub mod client;

pub use client::{SubmissionClient, SubmitError};
