//! 导出模块
//!
//! 把租户的完整链与全部 Z-Report 渲染成权威机构要求的规范文本
//! 文档（DEP）。渲染是存储数据的纯函数：没有新条目时重跑 build
//! 字节级一致。

pub mod builder;
pub mod store;

pub use builder::{ExportBuilder, ExportDocument, ExportError};
pub use store::ExportStore;
