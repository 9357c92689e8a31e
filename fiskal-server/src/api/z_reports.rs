//! Z-Report 读取接口

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};

use crate::core::FiscalState;
use crate::db::models::ZReport;
use shared::{ApiResponse, AppError};

pub fn router() -> Router<FiscalState> {
    Router::new().route("/api/tenants/{tenant_id}/z-reports", get(list))
}

/// GET /api/tenants/:tenant_id/z-reports - 租户全部报告（按日期升序）
async fn list(
    State(state): State<FiscalState>,
    Path(tenant_id): Path<String>,
) -> Result<ApiResponse<Vec<ZReport>>, AppError> {
    let reports = state.closer.list_reports(&tenant_id).await?;
    Ok(ApiResponse::success(reports))
}
