//! SubmissionClient — 税务机关提交

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Serialize;
use thiserror::Error;

use crate::db::models::{AuthorityEnvironment, FiscalConfig, TransmissionLogEntry, TransmissionStatus};
use crate::db::repository::{RepoError, TransmissionLogRepository};
use crate::export::ExportStore;
use shared::error::{AppError, ErrorCode};

/// 提交错误
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("no export found for tenant '{tenant_id}' on {date}")]
    NotFound { tenant_id: String, date: String },
    #[error("authority rejected submission with status {status}")]
    Rejected { status: u16, body: String },
    #[error("authority unreachable: {0}")]
    Network(String),
    #[error(transparent)]
    Storage(#[from] AppError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<SubmitError> for AppError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::NotFound { tenant_id, date } => AppError::with_message(
                ErrorCode::ExportNotFound,
                format!("no export found for tenant '{}' on {}", tenant_id, date),
            )
            .with_detail("date", date),
            SubmitError::Rejected { status, body } => AppError::with_message(
                ErrorCode::SubmissionRejected,
                format!("authority rejected submission with status {}", status),
            )
            .with_detail("body", body),
            SubmitError::Network(msg) => {
                AppError::with_message(ErrorCode::AuthorityUnreachable, msg)
            }
            SubmitError::Storage(e) => e,
            SubmitError::Repo(e) => e.into(),
        }
    }
}

/// 提交请求体（机关线上格式）
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmissionRequest<'a> {
    participant_id: &'a str,
    user_id: &'a str,
    credential_secret: &'a str,
    /// Base64 编码的导出文档
    export_document: String,
    document_type: &'static str,
    date: &'a str,
}

/// 机关提交客户端
#[derive(Clone)]
pub struct SubmissionClient {
    client: reqwest::Client,
    sandbox_url: String,
    production_url: String,
    store: ExportStore,
    log: TransmissionLogRepository,
}

impl SubmissionClient {
    pub fn new(
        sandbox_url: String,
        production_url: String,
        request_timeout: Duration,
        store: ExportStore,
        log: TransmissionLogRepository,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| AppError::internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            sandbox_url,
            production_url,
            store,
            log,
        })
    }

    fn endpoint_for(&self, env: AuthorityEnvironment) -> &str {
        match env {
            AuthorityEnvironment::Sandbox => &self.sandbox_url,
            AuthorityEnvironment::Production => &self.production_url,
        }
    }

    /// 提交指定日期的导出文档
    ///
    /// 1. 从存储取导出；缺失即 NotFound，不发任何网络请求也不落日志
    /// 2. 带租户凭据 POST 到环境对应端点
    /// 3. 先落 TransmissionLog（成功/失败都落），再返回或上抛
    ///
    /// 调用方可自行重试，每次尝试各落一条日志。
    pub async fn submit(
        &self,
        config: &FiscalConfig,
        date: &str,
    ) -> Result<TransmissionLogEntry, SubmitError> {
        let Some(document) = self.store.load_latest(&config.tenant_id, date)? else {
            return Err(SubmitError::NotFound {
                tenant_id: config.tenant_id.clone(),
                date: date.to_string(),
            });
        };

        let request = SubmissionRequest {
            participant_id: &config.authority.participant_id,
            user_id: &config.authority.user_id,
            credential_secret: &config.authority.secret,
            export_document: BASE64.encode(&document),
            document_type: "FISCAL-CHAIN-EXPORT",
            date,
        };
        let endpoint = self.endpoint_for(config.authority.environment);

        let response = match self.client.post(endpoint).json(&request).send().await {
            Ok(r) => r,
            Err(e) => {
                let message = format!("submission request failed: {e}");
                self.log
                    .append(
                        &config.tenant_id,
                        date,
                        TransmissionStatus::Failed,
                        message.clone(),
                    )
                    .await?;
                return Err(SubmitError::Network(message));
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.is_success() {
            let entry = self
                .log
                .append(&config.tenant_id, date, TransmissionStatus::Success, body)
                .await?;
            tracing::info!(tenant = %config.tenant_id, date, "Submission accepted");
            Ok(entry)
        } else {
            self.log
                .append(
                    &config.tenant_id,
                    date,
                    TransmissionStatus::Failed,
                    body.clone(),
                )
                .await?;
            tracing::warn!(tenant = %config.tenant_id, date, status = status.as_u16(), "Submission rejected");
            Err(SubmitError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}
