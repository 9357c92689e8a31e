//! Tenant Fiscal Config Model (租户财政配置)
//!
//! 由租户管理端（外部协作方）维护；对本子系统只读。
//! 配置缺失或不完整是硬性前置条件失败，绝不静默跳过。

use fiskal_sign::SigningMethod;
use serde::{Deserialize, Serialize};

/// 税务机关环境
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorityEnvironment {
    Sandbox,
    Production,
}

/// 租户状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantStatus {
    Active,
    Suspended,
}

/// 税务机关提交凭据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorityCredentials {
    /// 参与者 ID（机关侧注册号）
    pub participant_id: String,
    /// 机关侧用户 ID
    pub user_id: String,
    /// 凭据密钥
    pub secret: String,
    /// 提交环境（沙箱/生产）
    pub environment: AuthorityEnvironment,
}

/// 租户财政配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiscalConfig {
    /// 租户 ID
    pub tenant_id: String,
    /// 收银机 ID
    pub cash_register_id: String,
    /// 签名证书序列号
    pub cert_serial_number: String,
    /// 签名证书 PEM（可选，用于链下验签）
    #[serde(default)]
    pub certificate_pem: Option<String>,
    /// 签名方式 (tagged union)
    pub signing_method: SigningMethod,
    /// 机关提交凭据
    pub authority: AuthorityCredentials,
    /// 租户状态
    pub status: TenantStatus,
    /// 最近一次日结的引用 (YYYY-MM-DD)，由租户管理端维护
    #[serde(default)]
    pub last_z_report: Option<String>,
}

impl FiscalConfig {
    /// 是否处于活跃状态（夜间日结只扫活跃租户）
    pub fn is_active(&self) -> bool {
        self.status == TenantStatus::Active
    }
}
