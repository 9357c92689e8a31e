//! Fiskal Ledger Server - 财政合规账本子系统
//!
//! # 架构概述
//!
//! 本模块实现收银交易的财政合规账本：
//!
//! - **财政链** (`ledger`): 哈希链接、数字签名的 append-only 日志
//! - **日结** (`closing`): 每租户每日的 Z-Report 聚合与夜间扫描
//! - **导出** (`export`): 链与报告的规范导出文档 (DEP)
//! - **提交** (`submission`): 向税务机关提交导出文档
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **HTTP API** (`api`): RESTful 接口
//!
//! # 模块结构
//!
//! ```text
//! fiskal-server/src/
//! ├── core/          # 配置、状态、服务器、后台任务
//! ├── ledger/        # 财政链追加、摘要、校验
//! ├── closing/       # 日结与夜间扫描
//! ├── export/        # 导出构建与文件存储
//! ├── submission/    # 机关提交客户端
//! ├── api/           # HTTP 路由和处理器
//! └── db/            # 数据库层 (models + repository)
//! ```

pub mod api;
pub mod closing;
pub mod core;
pub mod db;
pub mod export;
pub mod ledger;
pub mod logging;
pub mod submission;

// Re-export 公共类型
pub use closing::{ClosingSweep, DailyCloser};
pub use core::{Config, FiscalState, Server};
pub use export::{ExportBuilder, ExportStore};
pub use ledger::{ChainLedger, ChainVerification, INITIAL_SIGNATURE};
pub use submission::SubmissionClient;

// Re-export unified error types from shared
pub use shared::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
