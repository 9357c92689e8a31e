use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::closing::{ClosingSweep, DailyCloser};
use crate::core::{BackgroundTasks, Config, TaskKind};
use crate::db::DbService;
use crate::db::repository::{
    ChainEntryRepository, ErrorLogRepository, FiscalConfigRepository, TransactionRepository,
    TransmissionLogRepository, ZReportRepository,
};
use crate::export::{ExportBuilder, ExportStore};
use crate::ledger::ChainLedger;
use crate::submission::SubmissionClient;
use shared::AppError;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 所有字段为浅拷贝（内部 Arc/句柄），Clone 成本极低。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | db | 嵌入式数据库 (SurrealDB) |
/// | configs | 租户财政配置（对本子系统只读） |
/// | ledger | 财政链服务 |
/// | closer | 日结服务 |
/// | sweep | 夜间日结扫描 |
/// | exporter | 导出构建器 |
/// | export_store | 导出文件存储 |
/// | submission | 机关提交客户端 |
#[derive(Clone)]
pub struct FiscalState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub configs: FiscalConfigRepository,
    pub ledger: ChainLedger,
    pub closer: DailyCloser,
    pub sweep: Arc<ClosingSweep>,
    pub exporter: ExportBuilder,
    pub export_store: ExportStore,
    pub submission: SubmissionClient,
}

impl FiscalState {
    /// 初始化全部服务
    ///
    /// 数据库在 `<work_dir>/database/fiskal.db`，
    /// 导出文件在 `<work_dir>/exports/<tenant>/`。
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let work_dir = PathBuf::from(&config.work_dir);
        std::fs::create_dir_all(&work_dir)
            .map_err(|e| AppError::internal(format!("failed to create work dir: {e}")))?;

        let db_path = work_dir.join("database").join("fiskal.db");
        let db_service = DbService::new(&db_path).await?;
        let db = db_service.db;

        let entries = ChainEntryRepository::new(db.clone());
        let transactions = TransactionRepository::new(db.clone());
        let configs = FiscalConfigRepository::new(db.clone());
        let z_reports = ZReportRepository::new(db.clone());
        let transmissions = TransmissionLogRepository::new(db.clone());
        let error_log = ErrorLogRepository::new(db.clone());

        let ledger = ChainLedger::new(
            entries.clone(),
            transactions.clone(),
            error_log.clone(),
            Duration::from_millis(config.sign_timeout_ms),
        );
        let closer = DailyCloser::new(ledger.clone(), transactions.clone(), z_reports.clone());
        let sweep = Arc::new(ClosingSweep::new(
            configs.clone(),
            closer.clone(),
            error_log.clone(),
            Duration::from_millis(config.tenant_close_timeout_ms),
        ));

        let exporter = ExportBuilder::new(entries, z_reports);
        let export_store = ExportStore::new(&work_dir);
        let submission = SubmissionClient::new(
            config.authority_sandbox_url.clone(),
            config.authority_production_url.clone(),
            Duration::from_millis(config.request_timeout_ms),
            export_store.clone(),
            transmissions,
        )?;

        Ok(Self {
            config: config.clone(),
            db,
            configs,
            ledger,
            closer,
            sweep,
            exporter,
            export_store,
            submission,
        })
    }

    /// 注册后台任务（夜间日结调度）
    pub fn start_background_tasks(&self, tasks: &mut BackgroundTasks) {
        let sweep = self.sweep.clone();
        let hour = self.config.sweep_hour_utc;
        let cancel = tasks.shutdown_token();
        tasks.spawn("closing_scheduler", TaskKind::Periodic, async move {
            sweep.scheduler_loop(hour, cancel).await;
        });
    }

    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }
}
