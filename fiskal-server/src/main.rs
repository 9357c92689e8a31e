use std::path::PathBuf;

use fiskal_server::{Config, FiscalState, Server, logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 环境与配置
    dotenv::dotenv().ok();
    let config = Config::from_env();

    // 2. 日志（guard 持有到进程结束）
    let log_dir = PathBuf::from(&config.work_dir).join("logs");
    let _guard = logging::init_logger(&config.log_level, Some(&log_dir))?;

    tracing::info!(environment = %config.environment, "Fiskal ledger server starting...");

    // 3. 初始化状态
    let state = FiscalState::initialize(&config).await?;

    // 4. 启动 HTTP 服务器（含后台日结调度）
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
