use tracing::{debug, warn};

use super::MethodResult;
use crate::sui::{CheckpointId, LedgerBackend, ReadMask};
use crate::translator::Native;

/// Length of the chain identifier derived from the genesis digest.
const CHAIN_ID_LEN: usize = 8;

/// Handler for suix_getReferenceGasPrice
pub async fn get_reference_gas_price(backend: &dyn LedgerBackend) -> MethodResult {
    let price = backend.get_reference_gas_price().await?.unwrap_or(0);
    debug!("suix_getReferenceGasPrice -> {}", price);
    Ok(Native::U64(price))
}

/// Handler for sui_getChainIdentifier
///
/// The first eight characters of the genesis checkpoint digest, else the
/// service-reported chain id, else an empty string. Never fails.
pub async fn get_chain_identifier(backend: &dyn LedgerBackend) -> MethodResult {
    let genesis = backend
        .get_checkpoint(&CheckpointId::SequenceNumber(0), &ReadMask::new(["digest"]))
        .await;

    match genesis {
        Ok(Some(checkpoint)) => {
            let digest = checkpoint
                .digest
                .or_else(|| checkpoint.summary.and_then(|summary| summary.digest))
                .filter(|digest| !digest.is_empty());
            if let Some(digest) = digest {
                let id: String = digest.chars().take(CHAIN_ID_LEN).collect();
                debug!("sui_getChainIdentifier -> {} (genesis)", id);
                return Ok(Native::String(id));
            }
            warn!("sui_getChainIdentifier: genesis checkpoint has no digest");
        }
        Ok(None) => warn!("sui_getChainIdentifier: genesis checkpoint not available"),
        Err(e) => warn!("sui_getChainIdentifier: genesis lookup failed: {}", e),
    }

    let id = match backend.get_service_info().await {
        Ok(info) => info.chain_id.unwrap_or_default(),
        Err(e) => {
            warn!("sui_getChainIdentifier: service info lookup failed: {}", e);
            String::new()
        }
    };
    debug!("sui_getChainIdentifier -> {:?} (service info)", id);
    Ok(Native::String(id))
}
