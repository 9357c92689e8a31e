//! 导出接口

use axum::{
    Router,
    extract::{Path, State},
    routing::post,
};
use serde::Serialize;

use crate::api::{fetch_config, parse_date};
use crate::core::FiscalState;
use shared::{ApiResponse, AppError};

pub fn router() -> Router<FiscalState> {
    Router::new().route("/api/tenants/{tenant_id}/exports/{date}", post(build))
}

#[derive(Debug, Serialize)]
struct ExportInfo {
    path: String,
    size_bytes: usize,
    created_at: i64,
}

/// POST /api/tenants/:tenant_id/exports/:date - 构建并落盘导出文档
///
/// 文档覆盖完整链与全部 Z-Report；date 只决定落盘标识，
/// 提交时按该标识取同日最新版本。
async fn build(
    State(state): State<FiscalState>,
    Path((tenant_id, date)): Path<(String, String)>,
) -> Result<ApiResponse<ExportInfo>, AppError> {
    let date = parse_date(&date)?;
    let config = fetch_config(&state, &tenant_id).await?;

    let document = state.exporter.build(&config).await?;
    let path = state.export_store.save(
        &tenant_id,
        &date.format("%Y-%m-%d").to_string(),
        document.created_at,
        &document.content,
    )?;

    Ok(ApiResponse::success(ExportInfo {
        path: path.display().to_string(),
        size_bytes: document.content.len(),
        created_at: document.created_at,
    }))
}
