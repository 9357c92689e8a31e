//! 日结接口

use axum::{
    Router,
    extract::{Path, State},
    routing::post,
};
use serde::Serialize;

use crate::api::{fetch_config, parse_date};
use crate::closing::{CloseOutcome, TenantCloseOutcome};
use crate::core::FiscalState;
use crate::db::models::ZReport;
use shared::{ApiResponse, AppError};

pub fn router() -> Router<FiscalState> {
    Router::new()
        .route("/api/tenants/{tenant_id}/closings/{date}", post(close_day))
        .route("/api/closings/sweep/{date}", post(sweep))
}

#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
enum CloseResponse {
    Closed { report: ZReport },
    Skipped,
}

/// POST /api/tenants/:tenant_id/closings/:date - 关闭单租户的一个日历日
async fn close_day(
    State(state): State<FiscalState>,
    Path((tenant_id, date)): Path<(String, String)>,
) -> Result<ApiResponse<CloseResponse>, AppError> {
    let date = parse_date(&date)?;
    let config = fetch_config(&state, &tenant_id).await?;

    let response = match state.closer.close_day(&config, date).await? {
        CloseOutcome::Closed(report) => CloseResponse::Closed { report },
        CloseOutcome::Skipped => CloseResponse::Skipped,
    };
    Ok(ApiResponse::success(response))
}

/// POST /api/closings/sweep/:date - 手动触发全租户日结扫描
///
/// 返回每个租户一条结果；扫描本身永远整体完成。
async fn sweep(
    State(state): State<FiscalState>,
    Path(date): Path<String>,
) -> Result<ApiResponse<Vec<TenantCloseOutcome>>, AppError> {
    let date = parse_date(&date)?;
    let outcomes = state.sweep.run(date).await;
    Ok(ApiResponse::success(outcomes))
}
