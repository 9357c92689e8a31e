//! DailyCloser — 单租户日结

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::db::models::{FiscalConfig, PayloadKind, ZReport, ZReportStatus};
use crate::db::repository::{RepoError, TransactionRepository, ZReportRepository};
use crate::ledger::{ChainLedger, LedgerError};
use shared::error::{AppError, ErrorCode};

/// UTC 日长度（Unix 时间无闰秒，固定 86400s）
const DAY_MILLIS: i64 = 86_400_000;

/// 日结错误
#[derive(Debug, Error)]
pub enum CloseError {
    #[error("report date {0} is in the future")]
    FutureDate(NaiveDate),
    #[error("day {0} is already finalized")]
    AlreadyFinalized(NaiveDate),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<CloseError> for AppError {
    fn from(err: CloseError) -> Self {
        match err {
            CloseError::FutureDate(d) => AppError::with_message(
                ErrorCode::FutureReportDate,
                format!("cannot close future date {}", d),
            ),
            CloseError::AlreadyFinalized(d) => AppError::with_message(
                ErrorCode::ReportAlreadyFinalized,
                format!("day {} is already finalized", d),
            )
            .with_detail("date", d.to_string()),
            CloseError::Ledger(e) => e.into(),
            CloseError::Repo(e) => e.into(),
        }
    }
}

/// 日结结果
#[derive(Debug, Clone)]
pub enum CloseOutcome {
    /// 已生成 finalized 报告
    Closed(ZReport),
    /// 当日无交易，整体跳过（不上链、不落报告）
    Skipped,
}

/// 日结服务
#[derive(Clone)]
pub struct DailyCloser {
    ledger: ChainLedger,
    transactions: TransactionRepository,
    z_reports: ZReportRepository,
    /// 每租户一把日结锁；重复检查必须与上链、落报告同处一个临界区
    locks: Arc<DashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl DailyCloser {
    pub fn new(
        ledger: ChainLedger,
        transactions: TransactionRepository,
        z_reports: ZReportRepository,
    ) -> Self {
        Self {
            ledger,
            transactions,
            z_reports,
            locks: Arc::new(DashMap::new()),
        }
    }

    fn close_lock(&self, tenant_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.locks
            .entry(tenant_id.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// 关闭一个租户的一个日历日（UTC）
    ///
    /// 1. 未来日期拒绝
    /// 2. 已 finalized 拒绝（检查在租户日结锁内，唯一索引兜底）
    /// 3. 聚合当日交易；零笔则跳过
    /// 4. 汇总作为 closing 载荷上链
    /// 5. 落 finalized Z-Report，引用链戳记
    pub async fn close_day(
        &self,
        config: &FiscalConfig,
        date: NaiveDate,
    ) -> Result<CloseOutcome, CloseError> {
        let today = Utc::now().date_naive();
        if date > today {
            return Err(CloseError::FutureDate(date));
        }

        // 重复检查到落报告之间不能插入第二次日结：两次并发日结若都
        // 通过检查，append-only 链上会永久留下第二条 closing 条目，
        // 唯一索引只能拦住第二份报告
        let lock = self.close_lock(&config.tenant_id);
        let _guard = lock.lock().await;

        let date_str = date.format("%Y-%m-%d").to_string();
        if self
            .z_reports
            .find_by_date(&config.tenant_id, &date_str)
            .await?
            .is_some()
        {
            return Err(CloseError::AlreadyFinalized(date));
        }

        let start = date.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
        let txs = self
            .transactions
            .find_in_range(&config.tenant_id, start, start + DAY_MILLIS)
            .await?;

        if txs.is_empty() {
            tracing::info!(tenant = %config.tenant_id, date = %date_str, "No transactions, day skipped");
            return Ok(CloseOutcome::Skipped);
        }

        let total_sales: Decimal = txs.iter().map(|t| t.total_amount).sum();
        let transaction_count = txs.len() as u32;

        let payload = serde_json::json!({
            "is_z_report": true,
            "report_date": date_str,
            "total_amount": total_sales.to_string(),
            "transaction_count": transaction_count,
        });
        let stamp = self
            .ledger
            .append(config, PayloadKind::Closing, payload)
            .await?;

        let report = ZReport {
            tenant_id: config.tenant_id.clone(),
            report_date: date_str.clone(),
            total_sales,
            transaction_count,
            hash: stamp.hash,
            signature: stamp.signature,
            status: ZReportStatus::Finalized,
            created_at: shared::util::now_millis(),
        };
        self.z_reports.insert(report.clone()).await?;

        tracing::info!(
            tenant = %config.tenant_id,
            date = %date_str,
            total = %total_sales,
            count = transaction_count,
            "Day finalized"
        );

        Ok(CloseOutcome::Closed(report))
    }

    /// 租户全部报告（升序）
    pub async fn list_reports(&self, tenant_id: &str) -> Result<Vec<ZReport>, CloseError> {
        Ok(self.z_reports.list_ordered(tenant_id).await?)
    }
}
