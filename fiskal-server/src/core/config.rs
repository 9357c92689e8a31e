/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/fiskal | 工作目录（数据库、导出、日志） |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | AUTHORITY_SANDBOX_URL | (内置) | 机关沙箱端点 |
/// | AUTHORITY_PRODUCTION_URL | (内置) | 机关生产端点 |
/// | SIGN_TIMEOUT_MS | 15000 | 单次签名超时(毫秒) |
/// | SWEEP_HOUR_UTC | 3 | 夜间日结整点 (UTC) |
/// | TENANT_CLOSE_TIMEOUT_MS | 60000 | 单租户日结超时(毫秒) |
/// | REQUEST_TIMEOUT_MS | 30000 | 对外 HTTP 请求超时(毫秒) |
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、导出文件和日志
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 日志级别
    pub log_level: String,
    /// 机关沙箱提交端点
    pub authority_sandbox_url: String,
    /// 机关生产提交端点
    pub authority_production_url: String,
    /// 单次签名调用超时 (毫秒)
    pub sign_timeout_ms: u64,
    /// 夜间日结扫描的 UTC 整点
    pub sweep_hour_utc: u32,
    /// 单租户日结超时 (毫秒)
    pub tenant_close_timeout_ms: u64,
    /// 对外 HTTP 请求超时 (毫秒)
    pub request_timeout_ms: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/fiskal".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            authority_sandbox_url: std::env::var("AUTHORITY_SANDBOX_URL")
                .unwrap_or_else(|_| "https://sandbox.authority.example/api/submissions".into()),
            authority_production_url: std::env::var("AUTHORITY_PRODUCTION_URL")
                .unwrap_or_else(|_| "https://authority.example/api/submissions".into()),
            sign_timeout_ms: std::env::var("SIGN_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(15_000),
            sweep_hour_utc: std::env::var("SWEEP_HOUR_UTC")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3),
            tenant_close_timeout_ms: std::env::var("TENANT_CLOSE_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(60_000),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30_000),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_overrides() {
        let config = Config::with_overrides("/tmp/fiskal-test", 0);
        assert_eq!(config.work_dir, "/tmp/fiskal-test");
        assert_eq!(config.http_port, 0);
    }

    #[test]
    fn test_defaults_are_sane() {
        let config = Config::with_overrides("/tmp/x", 3000);
        assert!(config.sign_timeout_ms > 0);
        assert!(config.sweep_hour_utc < 24);
    }
}
