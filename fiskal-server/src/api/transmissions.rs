//! 提交日志读取接口

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};

use crate::core::FiscalState;
use crate::db::models::TransmissionLogEntry;
use crate::db::repository::TransmissionLogRepository;
use shared::{ApiResponse, AppError};

pub fn router() -> Router<FiscalState> {
    Router::new().route("/api/tenants/{tenant_id}/transmissions", get(list))
}

/// GET /api/tenants/:tenant_id/transmissions - 提交历史（新的在前）
async fn list(
    State(state): State<FiscalState>,
    Path(tenant_id): Path<String>,
) -> Result<ApiResponse<Vec<TransmissionLogEntry>>, AppError> {
    let repo = TransmissionLogRepository::new(state.db.clone());
    let entries = repo.list(&tenant_id).await.map_err(AppError::from)?;
    Ok(ApiResponse::success(entries))
}
