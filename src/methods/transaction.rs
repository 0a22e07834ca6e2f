use serde_json::Value;
use tracing::debug;

use super::params::{display_options, required_str};
use super::{MethodError, MethodResult};
use crate::sui::LedgerBackend;
use crate::translator::{build_read_mask, transaction_to_legacy};

/// Handler for sui_getTransactionBlock
pub async fn get_transaction_block(backend: &dyn LedgerBackend, params: &[Value]) -> MethodResult {
    let digest = required_str(params, 0, "digest")?;
    let options = display_options(params, 1)?;
    let mask = build_read_mask("sui_getTransactionBlock", &options);

    debug!("sui_getTransactionBlock: digest={}, mask={:?}", digest, mask.paths);

    let executed = backend
        .get_transaction(digest, &mask)
        .await?
        .ok_or_else(|| MethodError::NotFound("Transaction not found".to_string()))?;

    Ok(transaction_to_legacy(executed))
}
