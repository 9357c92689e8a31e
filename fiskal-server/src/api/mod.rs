//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`transactions`] - 交易上链接口
//! - [`chain`] - 链读取与校验接口
//! - [`closings`] - 日结接口
//! - [`z_reports`] - Z-Report 读取接口
//! - [`exports`] - 导出接口
//! - [`submissions`] - 机关提交接口
//! - [`transmissions`] - 提交日志读取接口

pub mod chain;
pub mod closings;
pub mod exports;
pub mod health;
pub mod submissions;
pub mod transactions;
pub mod transmissions;
pub mod z_reports;

use axum::Router;
use chrono::NaiveDate;
use tower_http::trace::TraceLayer;

use crate::core::FiscalState;
use crate::db::models::FiscalConfig;
use shared::AppError;

/// 组装完整应用路由
pub fn app(state: FiscalState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(transactions::router())
        .merge(chain::router())
        .merge(closings::router())
        .merge(z_reports::router())
        .merge(exports::router())
        .merge(submissions::router())
        .merge(transmissions::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 读取租户财政配置；缺失即 ConfigMissing（绝不静默跳过）
pub(crate) async fn fetch_config(
    state: &FiscalState,
    tenant_id: &str,
) -> Result<FiscalConfig, AppError> {
    state
        .configs
        .find_by_tenant(tenant_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| {
            AppError::config_missing(format!("no fiscal config for tenant '{}'", tenant_id))
        })
}

/// 解析 YYYY-MM-DD 日期参数
pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        AppError::validation(format!("invalid date '{}', expected YYYY-MM-DD", raw))
            .with_detail("date", raw)
    })
}
