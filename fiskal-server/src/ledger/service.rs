//! ChainLedger — 链追加服务
//!
//! 核心正确性要求：同一 (tenant, register) 的 append 必须串行。
//! 两个并发 append 读到同一个 last signature 再各自写入，链就分叉了。
//! 这里用 per-chain 互斥锁序列化 read-modify-write。

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use dashmap::DashMap;
use thiserror::Error;

use crate::db::models::{
    ChainEntry, ChainStamp, FiscalConfig, NewTransaction, PayloadKind, Transaction,
};
use crate::db::repository::{
    ChainEntryRepository, ErrorLogRepository, RepoError, TransactionRepository,
};
use crate::ledger::{INITIAL_SIGNATURE, digest};
use fiskal_sign::{SignError, signer_for};
use shared::error::{AppError, ErrorCode};

/// 链服务错误
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("signing failed: {0}")]
    Sign(#[from] SignError),
    #[error("signing timed out after {0:?}")]
    SignTimeout(Duration),
    #[error("tenant '{0}' is suspended")]
    TenantSuspended(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Sign(SignError::NotImplemented(p)) => AppError::with_message(
                ErrorCode::ProviderNotImplemented,
                format!("signing provider '{}' is not implemented", p),
            ),
            LedgerError::Sign(SignError::ProviderUnavailable { status, body }) => {
                AppError::with_message(
                    ErrorCode::ProviderUnavailable,
                    format!("signing provider returned {}", status),
                )
                .with_detail("body", body)
            }
            LedgerError::Sign(SignError::ConfigMissing(msg)) => AppError::with_message(
                ErrorCode::ConfigIncomplete,
                format!("signing configuration incomplete: {}", msg),
            ),
            LedgerError::Sign(e) => {
                AppError::with_message(ErrorCode::SigningFailed, e.to_string())
            }
            LedgerError::SignTimeout(d) => AppError::with_message(
                ErrorCode::SigningTimeout,
                format!("signing did not complete within {:?}", d),
            ),
            LedgerError::TenantSuspended(t) => AppError::with_message(
                ErrorCode::TenantSuspended,
                format!("tenant '{}' is suspended", t),
            ),
            LedgerError::Repo(e) => e.into(),
        }
    }
}

/// 财政链服务
///
/// Append-only：对外只有 `append` / `record_transaction` 和有序读取。
#[derive(Clone)]
pub struct ChainLedger {
    entries: ChainEntryRepository,
    transactions: TransactionRepository,
    error_log: ErrorLogRepository,
    /// 每条链一把锁，key = "tenant:register"
    locks: Arc<DashMap<String, Arc<tokio::sync::Mutex<()>>>>,
    /// 签名调用的超时上限（锁内等待，必须有界）
    sign_timeout: Duration,
}

impl ChainLedger {
    pub fn new(
        entries: ChainEntryRepository,
        transactions: TransactionRepository,
        error_log: ErrorLogRepository,
        sign_timeout: Duration,
    ) -> Self {
        Self {
            entries,
            transactions,
            error_log,
            locks: Arc::new(DashMap::new()),
            sign_timeout,
        }
    }

    fn chain_lock(&self, tenant_id: &str, cash_register_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let key = format!("{}:{}", tenant_id, cash_register_id);
        self.locks
            .entry(key)
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// 追加一条链条目
    ///
    /// 1. 取链锁，读取最后一条条目的签名（链空则用哨兵）
    /// 2. 计算 hash = SHA256Base64(register ‖ canonical(payload) ‖ prev_sig)
    /// 3. 调签名器对 hash 签名；失败则不落任何条目，错误向上传播
    /// 4. 持久化完整条目（带签名），返回 {hash, signature}
    pub async fn append(
        &self,
        config: &FiscalConfig,
        payload_kind: PayloadKind,
        payload: serde_json::Value,
    ) -> LedgerResult<ChainStamp> {
        if !config.is_active() {
            return Err(LedgerError::TenantSuspended(config.tenant_id.clone()));
        }

        let result = self.append_locked(config, payload_kind, payload).await;

        if let Err(e) = &result {
            self.error_log
                .append_best_effort(&config.tenant_id, "chain_append", e.to_string())
                .await;
        }

        result
    }

    async fn append_locked(
        &self,
        config: &FiscalConfig,
        payload_kind: PayloadKind,
        payload: serde_json::Value,
    ) -> LedgerResult<ChainStamp> {
        // 签名器在锁外构造，配置错误不占锁。
        // 锁内的 tokio 超时是权威上限；传输层超时放宽到两倍，
        // 签名服务挂起时统一走 SignTimeout 而不是传输错误
        let signer = signer_for(&config.signing_method, self.sign_timeout.saturating_mul(2))?;

        let lock = self.chain_lock(&config.tenant_id, &config.cash_register_id);
        let _guard = lock.lock().await;

        // 1. 读取链尾（持锁，串行于其他 append）
        let last = self
            .entries
            .last_entry(&config.tenant_id, &config.cash_register_id)
            .await?;

        let (sequence, previous_signature) = match last {
            Some(last) => (last.sequence + 1, last.signature),
            None => (1, INITIAL_SIGNATURE.to_string()),
        };

        // 2. 计算哈希
        let hash = digest::compute_chain_hash(
            &config.cash_register_id,
            &payload,
            &previous_signature,
        );

        // 3. 签名（锁内等待，超时兜底防止签名服务挂起拖死整条链）
        let signature_bytes =
            tokio::time::timeout(self.sign_timeout, signer.sign(hash.as_bytes()))
                .await
                .map_err(|_| LedgerError::SignTimeout(self.sign_timeout))??;

        let signature = BASE64.encode(&signature_bytes);

        // 4. 持久化（签名已就位，不存在半签名状态）
        let entry = ChainEntry {
            tenant_id: config.tenant_id.clone(),
            cash_register_id: config.cash_register_id.clone(),
            sequence,
            payload_kind,
            payload: digest::normalize_json(&payload),
            previous_signature,
            hash: hash.clone(),
            signature: signature.clone(),
            cert_serial_number: config.cert_serial_number.clone(),
            created_at: shared::util::now_millis(),
        };
        self.entries.insert(entry).await?;

        tracing::debug!(
            tenant = %config.tenant_id,
            register = %config.cash_register_id,
            sequence,
            kind = %payload_kind,
            method = signer.method_name(),
            "Chain entry appended"
        );

        Ok(ChainStamp { hash, signature })
    }

    /// 记录一笔交易并上链
    ///
    /// 交易先落库，再作为载荷追加到链上，最后把链戳记回填到交易记录。
    /// 上链失败时交易保留（无戳记），错误向上传播。
    pub async fn record_transaction(
        &self,
        config: &FiscalConfig,
        new_tx: NewTransaction,
    ) -> LedgerResult<Transaction> {
        let now = shared::util::now_millis();
        let mut tx = Transaction {
            transaction_id: shared::util::snowflake_id(),
            tenant_id: config.tenant_id.clone(),
            total_amount: new_tx.total_amount,
            timestamp: new_tx.timestamp.unwrap_or(now),
            chain_hash: None,
            chain_signature: None,
            created_at: now,
        };
        self.transactions.insert(tx.clone()).await?;

        // 每笔交易都链接真实的前签名，和日结条目走同一条链
        let payload = serde_json::json!({
            "transaction_id": tx.transaction_id,
            "total_amount": tx.total_amount.to_string(),
            "timestamp": tx.timestamp,
        });
        let stamp = self
            .append(config, PayloadKind::Transaction, payload)
            .await?;

        self.transactions
            .stamp(&config.tenant_id, tx.transaction_id, &stamp)
            .await?;

        tx.chain_hash = Some(stamp.hash);
        tx.chain_signature = Some(stamp.signature);
        Ok(tx)
    }

    /// 租户完整链（升序）
    pub async fn full_chain(&self, tenant_id: &str) -> LedgerResult<Vec<ChainEntry>> {
        Ok(self.entries.all_ordered(tenant_id).await?)
    }

    /// 分页读取链条目
    pub async fn list_entries(
        &self,
        tenant_id: &str,
        limit: usize,
        offset: usize,
    ) -> LedgerResult<(Vec<ChainEntry>, u64)> {
        Ok(self.entries.list(tenant_id, limit, offset).await?)
    }
}
