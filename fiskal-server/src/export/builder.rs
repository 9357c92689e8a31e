//! ExportBuilder — 规范导出文档

use chrono::DateTime;
use thiserror::Error;

use crate::db::models::{ChainEntry, FiscalConfig, ZReport};
use crate::db::repository::{ChainEntryRepository, RepoError, ZReportRepository};
use shared::error::{AppError, ErrorCode};

/// 导出错误
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("tenant '{0}' has no chain entries to export")]
    EmptyChain(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::EmptyChain(t) => AppError::with_message(
                ErrorCode::ExportEmptyChain,
                format!("tenant '{}' has no chain entries to export", t),
            ),
            ExportError::Repo(e) => e.into(),
        }
    }
}

/// 构建完成的导出文档
#[derive(Debug, Clone)]
pub struct ExportDocument {
    pub content: Vec<u8>,
    /// 文档时间戳 = 链上最新条目的 created_at（存储数据的纯函数）
    pub created_at: i64,
}

/// 导出构建器
#[derive(Clone)]
pub struct ExportBuilder {
    entries: ChainEntryRepository,
    z_reports: ZReportRepository,
}

impl ExportBuilder {
    pub fn new(entries: ChainEntryRepository, z_reports: ZReportRepository) -> Self {
        Self { entries, z_reports }
    }

    /// 读取租户完整链与全部报告，渲染规范文档
    pub async fn build(&self, config: &FiscalConfig) -> Result<ExportDocument, ExportError> {
        let entries = self.entries.all_ordered(&config.tenant_id).await?;
        if entries.is_empty() {
            return Err(ExportError::EmptyChain(config.tenant_id.clone()));
        }
        let reports = self.z_reports.list_ordered(&config.tenant_id).await?;

        let created_at = entries.iter().map(|e| e.created_at).max().unwrap_or(0);
        let content = render(config, &entries, &reports, created_at);

        Ok(ExportDocument { content, created_at })
    }
}

/// 渲染文档（纯函数，同输入必得同字节）
///
/// 行格式（分号分隔）：
/// ```text
/// FISCAL-CHAIN-EXPORT;V1
/// REGISTER;<id>;CERT;<serial>;EXPORTED;<ts>
/// ENTRIES;<n>
/// E;<date>;<amount>;<hash>;<signature>;<previous_signature>
/// ZREPORTS;<m>
/// Z;<date>;<total_sales>;<count>;<hash>;<signature>
/// ```
pub fn render(
    config: &FiscalConfig,
    entries: &[ChainEntry],
    reports: &[ZReport],
    export_timestamp: i64,
) -> Vec<u8> {
    let mut out = String::new();

    out.push_str("FISCAL-CHAIN-EXPORT;V1\n");
    out.push_str(&format!(
        "REGISTER;{};CERT;{};EXPORTED;{}\n",
        config.cash_register_id, config.cert_serial_number, export_timestamp
    ));

    out.push_str(&format!("ENTRIES;{}\n", entries.len()));
    for entry in entries {
        out.push_str(&format!(
            "E;{};{};{};{};{}\n",
            date_of_millis(entry.created_at),
            entry_amount(entry),
            entry.hash,
            entry.signature,
            entry.previous_signature
        ));
    }

    out.push_str(&format!("ZREPORTS;{}\n", reports.len()));
    for report in reports {
        out.push_str(&format!(
            "Z;{};{};{};{};{}\n",
            report.report_date,
            report.total_sales,
            report.transaction_count,
            report.hash,
            report.signature
        ));
    }

    out.into_bytes()
}

/// 条目金额：载荷里的 total_amount；没有则留空
fn entry_amount(entry: &ChainEntry) -> &str {
    entry
        .payload
        .get("total_amount")
        .and_then(|v| v.as_str())
        .unwrap_or("")
}

fn date_of_millis(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
