//! 链完整性校验
//!
//! 仅依赖存储字段重走整条链：重算每条哈希、核对链接关系。
//! 不需要私钥，审计方可独立执行。

use serde::Serialize;

use crate::db::models::ChainEntry;
use crate::ledger::{INITIAL_SIGNATURE, digest};

/// 单处断链描述
#[derive(Debug, Clone, Serialize)]
pub struct ChainBreak {
    /// 断链处的序列号
    pub sequence: u64,
    /// 不一致的字段 ("previous_signature" 或 "hash")
    pub field: &'static str,
    pub expected: String,
    pub actual: String,
}

/// 链校验结果
#[derive(Debug, Clone, Serialize)]
pub struct ChainVerification {
    pub total_entries: u64,
    pub chain_intact: bool,
    /// 发现的全部断点（不在第一处停下，报全量便于排障）
    pub breaks: Vec<ChainBreak>,
}

impl ChainVerification {
    /// 校验一条升序排列的链
    pub fn run(entries: &[ChainEntry]) -> Self {
        let mut breaks = Vec::new();
        let mut expected_prev = INITIAL_SIGNATURE.to_string();

        for entry in entries {
            if entry.previous_signature != expected_prev {
                breaks.push(ChainBreak {
                    sequence: entry.sequence,
                    field: "previous_signature",
                    expected: expected_prev.clone(),
                    actual: entry.previous_signature.clone(),
                });
            }

            let recomputed = digest::compute_chain_hash(
                &entry.cash_register_id,
                &entry.payload,
                &entry.previous_signature,
            );
            if entry.hash != recomputed {
                breaks.push(ChainBreak {
                    sequence: entry.sequence,
                    field: "hash",
                    expected: recomputed,
                    actual: entry.hash.clone(),
                });
            }

            expected_prev = entry.signature.clone();
        }

        ChainVerification {
            total_entries: entries.len() as u64,
            chain_intact: breaks.is_empty(),
            breaks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::PayloadKind;
    use serde_json::json;

    fn entry(seq: u64, prev: &str, payload: serde_json::Value, sig: &str) -> ChainEntry {
        ChainEntry {
            tenant_id: "demo".into(),
            cash_register_id: "reg-1".into(),
            sequence: seq,
            payload_kind: PayloadKind::Transaction,
            payload: payload.clone(),
            previous_signature: prev.to_string(),
            hash: digest::compute_chain_hash("reg-1", &payload, prev),
            signature: sig.to_string(),
            cert_serial_number: "0afc3e".into(),
            created_at: 0,
        }
    }

    #[test]
    fn test_empty_chain_is_intact() {
        let v = ChainVerification::run(&[]);
        assert!(v.chain_intact);
        assert_eq!(v.total_entries, 0);
    }

    #[test]
    fn test_valid_chain_passes() {
        let e1 = entry(1, INITIAL_SIGNATURE, json!({"n": 1}), "sig-1");
        let e2 = entry(2, "sig-1", json!({"n": 2}), "sig-2");
        let e3 = entry(3, "sig-2", json!({"n": 3}), "sig-3");

        let v = ChainVerification::run(&[e1, e2, e3]);
        assert!(v.chain_intact);
        assert!(v.breaks.is_empty());
    }

    #[test]
    fn test_broken_link_is_detected() {
        let e1 = entry(1, INITIAL_SIGNATURE, json!({"n": 1}), "sig-1");
        let e2 = entry(2, "forged-prev", json!({"n": 2}), "sig-2");

        let v = ChainVerification::run(&[e1, e2]);
        assert!(!v.chain_intact);
        assert_eq!(v.breaks.len(), 1);
        assert_eq!(v.breaks[0].sequence, 2);
        assert_eq!(v.breaks[0].field, "previous_signature");
    }

    #[test]
    fn test_tampered_payload_is_detected() {
        let e1 = entry(1, INITIAL_SIGNATURE, json!({"n": 1}), "sig-1");
        let mut e2 = entry(2, "sig-1", json!({"amount": "10.00"}), "sig-2");
        // 事后改载荷，hash 不再可重算
        e2.payload = json!({"amount": "999.00"});

        let v = ChainVerification::run(&[e1, e2]);
        assert!(!v.chain_intact);
        assert_eq!(v.breaks[0].field, "hash");
    }

    #[test]
    fn test_first_entry_must_use_sentinel() {
        let e1 = entry(1, "not-the-sentinel", json!({"n": 1}), "sig-1");
        let v = ChainVerification::run(&[e1]);
        assert!(!v.chain_intact);
        assert_eq!(v.breaks[0].expected, INITIAL_SIGNATURE);
    }
}
