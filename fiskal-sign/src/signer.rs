use crate::crypto;
use crate::error::{Result, SignError};
use crate::method::{RemoteProviderKind, SigningMethod};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 签名器接口
///
/// 调用者永远拿不到私钥本身，只能请求“对摘要签名”。
/// 摘要进去，签名字节出来；密钥材料留在本地配置或远程服务商那里。
#[async_trait]
pub trait Signer: Send + Sync + std::fmt::Debug {
    /// 对摘要字节签名
    async fn sign(&self, digest: &[u8]) -> Result<Vec<u8>>;

    /// 签名方式标识（用于日志）
    fn method_name(&self) -> &'static str;
}

/// 本地私钥签名器
///
/// 私钥 PEM 来自租户配置。支持 ECDSA P-256 和 RSA-PKCS1-SHA256。
#[derive(Debug)]
pub struct LocalKeySigner {
    priv_key_pem: String,
}

impl LocalKeySigner {
    pub fn new(priv_key_pem: String) -> Result<Self> {
        if priv_key_pem.trim().is_empty() {
            return Err(SignError::ConfigMissing(
                "local signing key material is empty".into(),
            ));
        }
        Ok(Self { priv_key_pem })
    }
}

#[async_trait]
impl Signer for LocalKeySigner {
    async fn sign(&self, digest: &[u8]) -> Result<Vec<u8>> {
        crypto::sign(&self.priv_key_pem, digest)
    }

    fn method_name(&self) -> &'static str {
        "local_key"
    }
}

/// 远程签名服务请求体
#[derive(Debug, Serialize)]
struct RemoteSignRequest<'a> {
    /// Base64 编码的待签数据
    data: &'a str,
}

/// 远程签名服务响应体
#[derive(Debug, Deserialize)]
struct RemoteSignResponse {
    /// Base64 编码的签名
    signature: String,
}

/// 远程签名服务签名器
///
/// 把摘要 Base64 编码后 POST 给外部签名服务，从响应里取回签名。
/// 非 2xx 响应映射为 [`SignError::ProviderUnavailable`]，并携带原始
/// 响应体用于诊断。
#[derive(Debug)]
pub struct RemoteSigner {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteSigner {
    /// 默认签名请求超时
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

    pub fn new(endpoint: String, api_key: String, timeout: Duration) -> Result<Self> {
        if endpoint.trim().is_empty() || api_key.trim().is_empty() {
            return Err(SignError::ConfigMissing(
                "remote provider endpoint or api_key is empty".into(),
            ));
        }

        let mut headers = reqwest::header::HeaderMap::new();
        let mut auth = reqwest::header::HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|e| SignError::ConfigMissing(format!("invalid api_key: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| SignError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl Signer for RemoteSigner {
    async fn sign(&self, digest: &[u8]) -> Result<Vec<u8>> {
        let url = format!("{}/sign", self.endpoint.trim_end_matches('/'));
        let body = RemoteSignRequest {
            data: &BASE64.encode(digest),
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| SignError::Network(format!("sign request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SignError::ProviderUnavailable { status, body });
        }

        let parsed: RemoteSignResponse = response
            .json()
            .await
            .map_err(|e| SignError::Network(format!("invalid sign response: {}", e)))?;

        tracing::debug!(endpoint = %self.endpoint, "Remote signature obtained");

        BASE64
            .decode(parsed.signature.as_bytes())
            .map_err(|e| SignError::Crypto(format!("provider returned invalid base64: {}", e)))
    }

    fn method_name(&self) -> &'static str {
        "remote_provider"
    }
}

/// 按租户配置构造签名器
///
/// 分发只看 [`SigningMethod`] 的变体；已声明未接入的服务商
/// （如智能卡）在这里显式失败，而不是运行时字符串不匹配。
pub fn signer_for(method: &SigningMethod, remote_timeout: Duration) -> Result<Box<dyn Signer>> {
    match method {
        SigningMethod::LocalKey { private_key_pem } => {
            Ok(Box::new(LocalKeySigner::new(private_key_pem.clone())?))
        }
        SigningMethod::RemoteProvider {
            provider: RemoteProviderKind::ATrust,
            endpoint,
            api_key,
        } => Ok(Box::new(RemoteSigner::new(
            endpoint.clone(),
            api_key.clone(),
            remote_timeout,
        )?)),
        SigningMethod::RemoteProvider {
            provider: provider @ RemoteProviderKind::Smartcard,
            ..
        } => Err(SignError::NotImplemented(provider.to_string())),
    }
}
