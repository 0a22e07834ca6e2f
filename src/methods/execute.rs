use base64::Engine;
use serde_json::Value;
use tracing::{debug, info};

use super::params::{optional, required};
use super::{MethodError, MethodResult};
use crate::sui::{BackendError, LedgerBackend};
use crate::translator::transaction_to_legacy;

/// Handler for sui_executeTransactionBlock
pub async fn execute_transaction_block(backend: &dyn LedgerBackend, params: &[Value]) -> MethodResult {
    let raw = required(params, 0, "txBytes")?;
    if matches!(raw, Value::String(s) if s.is_empty()) {
        return Err(MethodError::MissingParameter("txBytes"));
    }
    let transaction = decode_bytes(raw, "txBytes")?;
    let signatures = match optional(params, 1) {
        None => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| decode_bytes(item, "signatures"))
            .collect::<Result<Vec<_>, _>>()?,
        Some(single) => vec![decode_bytes(single, "signatures")?],
    };

    debug!(
        "sui_executeTransactionBlock: tx_len={}, signatures={}",
        transaction.len(),
        signatures.len()
    );

    let executed = backend
        .execute_transaction(transaction, signatures)
        .await?
        .ok_or(BackendError::MissingField("executed transaction"))?;

    info!(
        "Transaction executed: {}",
        executed.digest.as_deref().unwrap_or("<unknown>")
    );

    Ok(transaction_to_legacy(executed))
}

/// Byte payload given as a base64 string, an array of byte values, or a
/// serialized Node buffer `{"type": "Buffer", "data": [...]}`.
pub fn decode_bytes(value: &Value, name: &'static str) -> Result<Vec<u8>, MethodError> {
    match value {
        Value::String(encoded) => base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| MethodError::invalid(name, format!("invalid base64: {}", e))),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_u64()
                    .and_then(|b| u8::try_from(b).ok())
                    .ok_or_else(|| MethodError::invalid(name, format!("{} is not a byte value", item)))
            })
            .collect(),
        Value::Object(fields) if fields.get("type").and_then(Value::as_str) == Some("Buffer") => {
            match fields.get("data") {
                Some(data @ Value::Array(_)) => decode_bytes(data, name),
                _ => Err(MethodError::invalid(name, "buffer has no data")),
            }
        }
        _ => Err(MethodError::invalid(name, "Invalid transaction format")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_all_input_forms() {
        let expected = vec![1u8, 2, 3, 255];
        assert_eq!(decode_bytes(&json!("AQID/w=="), "txBytes").unwrap(), expected);
        assert_eq!(decode_bytes(&json!([1, 2, 3, 255]), "txBytes").unwrap(), expected);
        assert_eq!(
            decode_bytes(&json!({ "type": "Buffer", "data": [1, 2, 3, 255] }), "txBytes").unwrap(),
            expected
        );
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        assert!(decode_bytes(&json!("not base64!"), "txBytes").is_err());
        assert!(decode_bytes(&json!([1, 256]), "txBytes").is_err());
        assert!(decode_bytes(&json!([-1]), "txBytes").is_err());
        assert!(decode_bytes(&json!({ "data": [1] }), "txBytes").is_err());
        assert!(decode_bytes(&json!(42), "txBytes").is_err());
    }
}
