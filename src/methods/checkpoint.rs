use serde_json::Value;
use tracing::debug;

use super::params::{optional_bool, optional_u64, parse_u64, required};
use super::{Backend, MethodError, MethodResult};
use crate::emulator::{paginate, CheckpointSource};
use crate::sui::{CheckpointId, LedgerBackend};
use crate::translator::{build_read_mask, checkpoint_to_legacy, DisplayOptions, Native};

/// Numbers and all-digit strings are sequence numbers; any other string is
/// a digest. An all-digit digest is therefore read as a sequence number.
pub fn parse_checkpoint_id(value: &Value) -> Result<CheckpointId, MethodError> {
    match value {
        Value::String(s) if s.is_empty() => Err(MethodError::MissingParameter("checkpointId")),
        Value::String(s) if s.bytes().all(|b| b.is_ascii_digit()) => {
            parse_u64(value, "checkpointId").map(CheckpointId::SequenceNumber)
        }
        Value::String(s) => Ok(CheckpointId::Digest(s.clone())),
        Value::Number(_) => parse_u64(value, "checkpointId").map(CheckpointId::SequenceNumber),
        _ => Err(MethodError::invalid(
            "checkpointId",
            "expected a sequence number or digest",
        )),
    }
}

/// Handler for sui_getCheckpoint
pub async fn get_checkpoint(backend: &dyn LedgerBackend, params: &[Value]) -> MethodResult {
    let id = parse_checkpoint_id(required(params, 0, "checkpointId")?)?;
    let mask = build_read_mask("sui_getCheckpoint", &DisplayOptions::default());

    debug!("sui_getCheckpoint: id={:?}", id);

    match backend.get_checkpoint(&id, &mask).await {
        Ok(Some(checkpoint)) => Ok(checkpoint_to_legacy(checkpoint)),
        Ok(None) => Ok(Native::Null),
        Err(e) if e.indicates_absence() => {
            debug!("sui_getCheckpoint: {:?} absent: {}", id, e);
            Ok(Native::Null)
        }
        Err(e) => Err(e.into()),
    }
}

/// Handler for sui_getCheckpoints
pub async fn get_checkpoints(backend: Backend, params: &[Value]) -> MethodResult {
    let cursor = optional_u64(params, 0, "cursor")?;
    let limit = optional_u64(params, 1, "limit")?.unwrap_or(1);
    let descending = optional_bool(params, 2, "descending")?.unwrap_or(true);

    debug!(
        "sui_getCheckpoints: cursor={:?}, limit={}, descending={}",
        cursor, limit, descending
    );

    let source = CheckpointSource::new(backend);
    let page = paginate(&source, cursor, limit, descending).await?;
    Ok(page.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_checkpoint_id_classification() {
        assert_eq!(
            parse_checkpoint_id(&json!("1234")).unwrap(),
            CheckpointId::SequenceNumber(1234)
        );
        assert_eq!(
            parse_checkpoint_id(&json!(7)).unwrap(),
            CheckpointId::SequenceNumber(7)
        );
        assert_eq!(
            parse_checkpoint_id(&json!("4btiuiMPvEENsttpZC7CZ53DruC3MAgfznDbASZ7DR6S")).unwrap(),
            CheckpointId::Digest("4btiuiMPvEENsttpZC7CZ53DruC3MAgfznDbASZ7DR6S".into())
        );
    }

    #[test]
    fn test_all_digit_digest_is_a_sequence_number() {
        assert_eq!(
            parse_checkpoint_id(&json!("00000042")).unwrap(),
            CheckpointId::SequenceNumber(42)
        );
    }

    #[test]
    fn test_invalid_checkpoint_ids() {
        assert!(parse_checkpoint_id(&json!(-3)).is_err());
        assert!(parse_checkpoint_id(&json!({ "seq": 1 })).is_err());
        assert!(parse_checkpoint_id(&json!("99999999999999999999999")).is_err());
        assert!(matches!(
            parse_checkpoint_id(&json!("")),
            Err(MethodError::MissingParameter("checkpointId"))
        ));
    }
}
