//! 健康检查接口

use axum::{Router, routing::get};
use serde::Serialize;

use crate::core::FiscalState;
use shared::ApiResponse;

#[derive(Debug, Serialize)]
pub struct HealthInfo {
    pub status: &'static str,
    pub version: &'static str,
}

pub fn router() -> Router<FiscalState> {
    Router::new().route("/health", get(health))
}

async fn health() -> ApiResponse<HealthInfo> {
    ApiResponse::success(HealthInfo {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
