//! 夜间日结扫描
//!
//! 对所有活跃租户并行执行前一日的日结。租户之间不共享可变状态，
//! 每个租户一个任务；单租户失败（或超时、panic）记 error_log 并
//! 标记 Failed，不打断批次，每个租户恰好产出一条结果。

use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::closing::{CloseError, CloseOutcome, DailyCloser};
use crate::db::repository::{ErrorLogRepository, FiscalConfigRepository};

/// 单租户扫描结果状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantCloseStatus {
    Closed,
    Skipped,
    Failed,
}

/// 单租户扫描结果
#[derive(Debug, Clone, Serialize)]
pub struct TenantCloseOutcome {
    pub tenant_id: String,
    pub status: TenantCloseStatus,
    /// Failed 时的错误描述
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// 日结扫描器
#[derive(Clone)]
pub struct ClosingSweep {
    configs: FiscalConfigRepository,
    closer: DailyCloser,
    error_log: ErrorLogRepository,
    /// 单租户日结的超时上限
    tenant_timeout: Duration,
}

impl ClosingSweep {
    pub fn new(
        configs: FiscalConfigRepository,
        closer: DailyCloser,
        error_log: ErrorLogRepository,
        tenant_timeout: Duration,
    ) -> Self {
        Self {
            configs,
            closer,
            error_log,
            tenant_timeout,
        }
    }

    /// 对全部活跃租户关闭指定日期
    pub async fn run(&self, date: NaiveDate) -> Vec<TenantCloseOutcome> {
        let configs = match self.configs.list_active().await {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Sweep aborted: cannot load tenant configs");
                return Vec::new();
            }
        };

        tracing::info!(date = %date, tenants = configs.len(), "Closing sweep started");

        // 租户 ID 留在句柄旁，任务 panic 后结果仍然指名租户
        let mut handles = Vec::with_capacity(configs.len());
        for config in configs {
            let closer = self.closer.clone();
            let timeout = self.tenant_timeout;
            let tenant_id = config.tenant_id.clone();

            let handle = tokio::spawn(async move {
                let result = tokio::time::timeout(timeout, closer.close_day(&config, date)).await;
                flatten_result(result, timeout)
            });
            handles.push((tenant_id, handle));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (tenant_id, handle) in handles {
            let outcome = match handle.await {
                Ok(Ok(CloseOutcome::Closed(_))) => TenantCloseOutcome {
                    tenant_id,
                    status: TenantCloseStatus::Closed,
                    detail: None,
                },
                Ok(Ok(CloseOutcome::Skipped)) => TenantCloseOutcome {
                    tenant_id,
                    status: TenantCloseStatus::Skipped,
                    detail: None,
                },
                Ok(Err(message)) => {
                    self.error_log
                        .append_best_effort(&tenant_id, "closing_sweep", message.clone())
                        .await;
                    TenantCloseOutcome {
                        tenant_id,
                        status: TenantCloseStatus::Failed,
                        detail: Some(message),
                    }
                }
                Err(join_err) => {
                    let message = format!("tenant close task panicked: {}", join_err);
                    tracing::error!(tenant = %tenant_id, error = %join_err, "Tenant close task panicked");
                    self.error_log
                        .append_best_effort(&tenant_id, "closing_sweep", message.clone())
                        .await;
                    TenantCloseOutcome {
                        tenant_id,
                        status: TenantCloseStatus::Failed,
                        detail: Some(message),
                    }
                }
            };
            outcomes.push(outcome);
        }

        let failed = outcomes
            .iter()
            .filter(|o| o.status == TenantCloseStatus::Failed)
            .count();
        tracing::info!(
            date = %date,
            total = outcomes.len(),
            failed,
            "Closing sweep finished"
        );

        outcomes
    }

    /// 调度循环：每天到达指定 UTC 整点后，对前一日执行扫描
    pub async fn scheduler_loop(self: Arc<Self>, sweep_hour_utc: u32, cancel: CancellationToken) {
        loop {
            let wait = duration_until_hour(sweep_hour_utc);
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Closing scheduler stopped");
                    return;
                }
                _ = tokio::time::sleep(wait) => {}
            }

            let yesterday = Utc::now().date_naive() - ChronoDuration::days(1);
            self.run(yesterday).await;
        }
    }
}

fn flatten_result(
    result: Result<Result<CloseOutcome, CloseError>, tokio::time::error::Elapsed>,
    timeout: Duration,
) -> Result<CloseOutcome, String> {
    match result {
        Ok(Ok(outcome)) => Ok(outcome),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err(format!("tenant close timed out after {:?}", timeout)),
    }
}

/// 距下一次到达指定 UTC 整点的时长
fn duration_until_hour(hour: u32) -> Duration {
    let now = Utc::now();
    let today_at = now
        .date_naive()
        .and_hms_opt(hour.min(23), 0, 0)
        .unwrap_or_else(|| now.naive_utc());
    let target = if now.naive_utc() < today_at {
        today_at
    } else {
        today_at + ChronoDuration::days(1)
    };
    (target - now.naive_utc())
        .to_std()
        .unwrap_or(Duration::from_secs(60))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_until_hour_is_bounded() {
        for hour in [0, 3, 12, 23] {
            let d = duration_until_hour(hour);
            assert!(d <= Duration::from_secs(24 * 3600));
        }
    }

    #[test]
    fn test_hour_is_clamped() {
        // 25 点不存在，钳到 23 点而不是 panic
        let d = duration_until_hour(25);
        assert!(d <= Duration::from_secs(24 * 3600));
    }
}
