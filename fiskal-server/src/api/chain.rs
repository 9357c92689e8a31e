//! 链读取与校验接口

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::core::FiscalState;
use crate::db::models::ChainEntry;
use crate::ledger::ChainVerification;
use shared::{ApiResponse, AppError};

pub fn router() -> Router<FiscalState> {
    Router::new()
        .route("/api/tenants/{tenant_id}/chain", get(list))
        .route("/api/tenants/{tenant_id}/chain/verify", get(verify))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(default = "default_limit")]
    limit: usize,
    #[serde(default)]
    offset: usize,
}

fn default_limit() -> usize {
    50
}

#[derive(Debug, Serialize)]
struct ChainPage {
    entries: Vec<ChainEntry>,
    total: u64,
}

/// GET /api/tenants/:tenant_id/chain - 分页读取链条目（升序）
async fn list(
    State(state): State<FiscalState>,
    Path(tenant_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<ApiResponse<ChainPage>, AppError> {
    let (entries, total) = state
        .ledger
        .list_entries(&tenant_id, query.limit.min(500), query.offset)
        .await?;
    Ok(ApiResponse::success(ChainPage { entries, total }))
}

/// GET /api/tenants/:tenant_id/chain/verify - 重算整条链并核对链接关系
async fn verify(
    State(state): State<FiscalState>,
    Path(tenant_id): Path<String>,
) -> Result<ApiResponse<ChainVerification>, AppError> {
    let entries = state.ledger.full_chain(&tenant_id).await?;
    Ok(ApiResponse::success(ChainVerification::run(&entries)))
}
