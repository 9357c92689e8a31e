//! 链条目摘要计算
//!
//! 哈希必须仅由存储字段可重算，且与载荷的序列化形式无关：
//! 载荷先规范化（键序、数值形态），再参与哈希。

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use sha2::{Digest, Sha256};

/// 规范化 JSON Value — 将 SurrealDB 浮点退化的整数还原为 i64
///
/// SurrealDB 内部将所有数字存为 float，读出后 `5` 变成 `5.0`。
/// 此函数确保 `5.0` → `5`（无小数部分时），使写入时与读出后的
/// 序列化结果一致，哈希才能重算通过。
///
/// 安全范围：f64 尾数 52 bit，仅 |value| ≤ 2^53 的整数可无损转换。
pub fn normalize_json(value: &serde_json::Value) -> serde_json::Value {
    /// f64 可精确表示的最大整数绝对值 (2^53)
    const MAX_SAFE_INT: f64 = (1_i64 << 53) as f64;

    match value {
        serde_json::Value::Number(n) => {
            if let Some(f) = n.as_f64()
                && f.fract() == 0.0
                && f.abs() <= MAX_SAFE_INT
            {
                return serde_json::Value::Number(serde_json::Number::from(f as i64));
            }
            value.clone()
        }
        serde_json::Value::Object(map) => {
            let normalized: serde_json::Map<String, serde_json::Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), normalize_json(v)))
                .collect();
            serde_json::Value::Object(normalized)
        }
        serde_json::Value::Array(arr) => {
            serde_json::Value::Array(arr.iter().map(normalize_json).collect())
        }
        _ => value.clone(),
    }
}

/// 载荷的规范序列化
///
/// serde_json 的 Map 默认按键排序（BTreeMap），配合 normalize_json
/// 保证同一载荷无论来源如何序列化结果字节一致。
pub fn canonical_payload(payload: &serde_json::Value) -> String {
    serde_json::to_string(&normalize_json(payload)).unwrap_or_default()
}

/// 计算链条目哈希
///
/// `SHA256(cash_register_id ‖ \x00 ‖ canonical(payload) ‖ \x00 ‖ previous_signature)`，
/// Base64 编码。变长字段间用 `\x00` 分隔，防止拼接碰撞。
pub fn compute_chain_hash(
    cash_register_id: &str,
    payload: &serde_json::Value,
    previous_signature: &str,
) -> String {
    let mut hasher = Sha256::new();

    hasher.update(cash_register_id.as_bytes());
    hasher.update(b"\x00");
    hasher.update(canonical_payload(payload).as_bytes());
    hasher.update(b"\x00");
    hasher.update(previous_signature.as_bytes());

    BASE64.encode(hasher.finalize())
}
