//! 核心模块 - 服务器配置、状态与生命周期
//!
//! # 模块结构
//!
//! - [`Config`] - 服务器配置
//! - [`FiscalState`] - 服务器状态（持有所有服务）
//! - [`Server`] - HTTP 服务器
//! - [`BackgroundTasks`] - 后台任务管理

pub mod config;
pub mod server;
pub mod state;
pub mod tasks;

pub use config::Config;
pub use server::Server;
pub use state::FiscalState;
pub use tasks::{BackgroundTasks, TaskKind};
