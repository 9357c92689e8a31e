//! 交易上链接口

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};

use crate::api::fetch_config;
use crate::core::FiscalState;
use crate::db::models::{NewTransaction, Transaction};
use shared::{ApiResponse, AppError};

pub fn router() -> Router<FiscalState> {
    Router::new().route("/api/tenants/{tenant_id}/transactions", post(record))
}

/// POST /api/tenants/:tenant_id/transactions - 记录交易并上链
///
/// 返回带链戳记（hash/signature）的交易记录。
async fn record(
    State(state): State<FiscalState>,
    Path(tenant_id): Path<String>,
    Json(payload): Json<NewTransaction>,
) -> Result<ApiResponse<Transaction>, AppError> {
    if payload.total_amount.is_sign_negative() {
        return Err(AppError::validation("total_amount must not be negative")
            .with_detail("total_amount", payload.total_amount.to_string()));
    }

    let config = fetch_config(&state, &tenant_id).await?;
    let tx = state.ledger.record_transaction(&config, payload).await?;
    Ok(ApiResponse::success(tx))
}
