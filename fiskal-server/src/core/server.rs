//! Server Implementation
//!
//! HTTP 服务器启动和生命周期管理

use crate::api;
use crate::core::{BackgroundTasks, Config, FiscalState};

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<FiscalState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// 使用已初始化的状态创建（测试共享状态用）
    pub fn with_state(config: Config, state: FiscalState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let state = match self.state {
            Some(s) => s,
            None => FiscalState::initialize(&self.config).await?,
        };

        let mut tasks = BackgroundTasks::new();
        state.start_background_tasks(&mut tasks);
        tracing::info!(tasks = tasks.len(), "Background tasks started");

        let app = api::app(state);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Fiskal ledger server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutting down...");
            })
            .await?;

        tasks.shutdown().await;
        Ok(())
    }
}
