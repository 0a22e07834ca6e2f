use serde_json::Value;
use tracing::{debug, warn};

use super::params::{optional_str, required_str};
use super::MethodResult;
use crate::sui::LedgerBackend;
use crate::translator::{canonicalize, Native, Record, SUI_COIN_TYPE};

/// Handler for suix_getBalance
///
/// A missing balance record is reported as a zero balance. The coin object
/// count comes from a second lookup and degrades to `1`/`0` (by whether the
/// balance is positive) when that lookup fails.
pub async fn get_balance(backend: &dyn LedgerBackend, params: &[Value]) -> MethodResult {
    let address = required_str(params, 0, "address")?;
    let coin_type = optional_str(params, 1, "coinType")?.unwrap_or(SUI_COIN_TYPE);

    debug!("suix_getBalance: address={}, coin_type={}", address, coin_type);

    let Some(balance) = backend.get_balance(address, coin_type).await? else {
        return Ok(balance_record(canonicalize(coin_type), 0, 0));
    };

    let total = balance.balance.unwrap_or(0);
    let coin_object_count = match backend.list_coins(address, coin_type, None).await {
        Ok(page) => page.objects.len(),
        Err(e) => {
            warn!(
                "suix_getBalance: coin count lookup failed for {}, estimating: {}",
                address, e
            );
            usize::from(total > 0)
        }
    };

    let reported = balance
        .coin_type
        .as_deref()
        .filter(|reported| !reported.is_empty())
        .unwrap_or(coin_type);

    Ok(balance_record(canonicalize(reported), coin_object_count, total))
}

fn balance_record(coin_type: String, coin_object_count: usize, total: u64) -> Native {
    Record::new()
        .field("coinType", coin_type)
        .field("coinObjectCount", Native::count(coin_object_count))
        .field("totalBalance", total)
        .field("lockedBalance", Record::new())
        .into()
}
