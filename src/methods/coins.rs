use serde_json::Value;
use tracing::debug;

use super::params::{optional_str, required_str};
use super::MethodResult;
use crate::sui::types::CoinMetadata;
use crate::sui::LedgerBackend;
use crate::translator::{coin_to_legacy, Native, Record, SUI_COIN_TYPE};

/// Handler for suix_getCoins
pub async fn get_coins(backend: &dyn LedgerBackend, params: &[Value]) -> MethodResult {
    let address = required_str(params, 0, "address")?;
    let coin_type = optional_str(params, 1, "coinType")?.unwrap_or(SUI_COIN_TYPE);
    let cursor = optional_str(params, 2, "cursor")?;

    debug!(
        "suix_getCoins: address={}, coin_type={}, cursor={:?}",
        address, coin_type, cursor
    );

    let page = backend.list_coins(address, coin_type, cursor).await?;
    let data: Vec<Native> = page
        .objects
        .into_iter()
        .map(|coin| coin_to_legacy(coin, coin_type))
        .collect();

    Ok(Record::new()
        .field("data", Native::List(data))
        .field("hasNextPage", page.next_page_token.is_some())
        .field("nextCursor", page.next_page_token)
        .into())
}

/// Handler for suix_getCoinMetadata
pub async fn get_coin_metadata(backend: &dyn LedgerBackend, params: &[Value]) -> MethodResult {
    let coin_type = required_str(params, 0, "coinType")?;

    debug!("suix_getCoinMetadata: coin_type={}", coin_type);

    let info = backend.get_coin_info(coin_type).await?;
    Ok(info.metadata.map(metadata_to_legacy).unwrap_or(Native::Null))
}

fn metadata_to_legacy(metadata: CoinMetadata) -> Native {
    Record::new()
        .field("id", metadata.id)
        .field("decimals", Native::count(metadata.decimals.unwrap_or(0) as usize))
        .field("name", metadata.name.unwrap_or_default())
        .field("symbol", metadata.symbol.unwrap_or_default())
        .field("description", metadata.description.unwrap_or_default())
        .field("iconUrl", metadata.icon_url)
        .into()
}
