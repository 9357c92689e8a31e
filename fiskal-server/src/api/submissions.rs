//! 机关提交接口

use axum::{
    Router,
    extract::{Path, State},
    routing::post,
};

use crate::api::{fetch_config, parse_date};
use crate::core::FiscalState;
use crate::db::models::TransmissionLogEntry;
use shared::{ApiResponse, AppError};

pub fn router() -> Router<FiscalState> {
    Router::new().route("/api/tenants/{tenant_id}/submissions/{date}", post(submit))
}

/// POST /api/tenants/:tenant_id/submissions/:date - 提交指定日期的导出文档
///
/// 可重试；每次尝试各落一条 TransmissionLog。
async fn submit(
    State(state): State<FiscalState>,
    Path((tenant_id, date)): Path<(String, String)>,
) -> Result<ApiResponse<TransmissionLogEntry>, AppError> {
    let date = parse_date(&date)?;
    let config = fetch_config(&state, &tenant_id).await?;

    let entry = state
        .submission
        .submit(&config, &date.format("%Y-%m-%d").to_string())
        .await?;
    Ok(ApiResponse::success(entry))
}
