use crate::sui::types::Object;

use super::coin_type::coin_type_from_object_type;
use super::normalize::{Native, Record};

/// Outcome of a historical object lookup.
///
/// Absence is a normal result here, not an error: callers asking for a
/// pruned or deleted version get `ObjectDeleted` back with the identifiers
/// they asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum PastObject {
    VersionFound(Object),
    ObjectDeleted { object_id: String, version: u64 },
}

impl PastObject {
    pub fn status(&self) -> &'static str {
        match self {
            PastObject::VersionFound(_) => "VersionFound",
            PastObject::ObjectDeleted { .. } => "ObjectDeleted",
        }
    }
}

impl From<PastObject> for Native {
    fn from(past: PastObject) -> Self {
        let status = past.status();
        let details: Native = match past {
            PastObject::VersionFound(object) => object_to_legacy(object),
            PastObject::ObjectDeleted { object_id, version } => Record::new()
                .field("objectId", object_id)
                .field("version", version)
                .into(),
        };
        Record::new()
            .field("status", status)
            .field("details", details)
            .into()
    }
}

/// Legacy object-details record. Only fields the backend returned under
/// the read mask are emitted.
pub fn object_to_legacy(object: Object) -> Native {
    let bcs = object
        .bcs
        .as_ref()
        .and_then(|bcs| bcs.value.as_deref())
        .map(|bytes| {
            Record::new()
                .field("dataType", "moveObject")
                .field_opt("type", object.object_type.clone())
                .field_opt("version", object.version)
                .field("bcsBytes", Native::base64(bytes))
        });

    let content = match object.json {
        Some(json) => Some(json),
        None => object
            .contents
            .and_then(|contents| contents.value)
            .map(Native::Bytes),
    };

    Record::new()
        .field_opt("objectId", object.object_id)
        .field_opt("version", object.version)
        .field_opt("digest", object.digest)
        .field_opt("type", object.object_type)
        .field_opt("owner", object.owner)
        .field_opt("previousTransaction", object.previous_transaction)
        .field_opt("storageRebate", object.storage_rebate)
        .field_opt("content", content)
        .field_opt("bcs", bcs)
        .into()
}

/// Legacy coin record for `suix_getCoins`. `requested` is used when the
/// backend did not report an object type.
pub fn coin_to_legacy(coin: Object, requested: &str) -> Native {
    let coin_type = match coin.object_type.as_deref() {
        Some(object_type) => coin_type_from_object_type(object_type),
        None => super::coin_type::canonicalize(requested),
    };

    Record::new()
        .field("coinType", coin_type)
        .field_opt("coinObjectId", coin.object_id)
        .field_opt("version", coin.version)
        .field_opt("digest", coin.digest)
        .field_opt("balance", coin.balance)
        .field_opt("previousTransaction", coin.previous_transaction)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sui::types::Bcs;
    use crate::translator::normalize::normalize;
    use serde_json::json;

    #[test]
    fn test_deleted_variant_carries_requested_identifiers() {
        let past = PastObject::ObjectDeleted {
            object_id: "0x5".to_string(),
            version: 18_446_744_073_709_551_615,
        };
        assert_eq!(
            normalize(past.into()),
            json!({
                "status": "ObjectDeleted",
                "details": { "objectId": "0x5", "version": "18446744073709551615" }
            })
        );
    }

    #[test]
    fn test_found_variant_reshapes_object() {
        let object = Object {
            object_id: Some("0x6".into()),
            version: Some(42),
            digest: Some("Fkz3".into()),
            object_type: Some("0x2::clock::Clock".into()),
            owner: Some(Native::from(json!({ "kind": "SHARED", "version": "1" }))),
            bcs: Some(Bcs { name: None, value: Some(vec![0xde, 0xad]) }),
            contents: Some(Bcs { name: None, value: Some(vec![1]) }),
            storage_rebate: Some(988),
            ..Default::default()
        };

        let value = normalize(PastObject::VersionFound(object).into());
        assert_eq!(value["status"], json!("VersionFound"));
        assert_eq!(
            value["details"],
            json!({
                "objectId": "0x6",
                "version": "42",
                "digest": "Fkz3",
                "type": "0x2::clock::Clock",
                "owner": { "kind": "SHARED", "version": "1" },
                "storageRebate": "988",
                "content": [1],
                "bcs": {
                    "dataType": "moveObject",
                    "type": "0x2::clock::Clock",
                    "version": "42",
                    "bcsBytes": "3q0="
                }
            })
        );
    }

    #[test]
    fn test_json_content_preferred_over_raw_contents() {
        let object = Object {
            object_id: Some("0x7".into()),
            json: Some(Native::from(json!({ "value": 3 }))),
            contents: Some(Bcs { name: None, value: Some(vec![9]) }),
            ..Default::default()
        };
        let value = normalize(object_to_legacy(object));
        assert_eq!(value["content"], json!({ "value": 3 }));
    }

    #[test]
    fn test_coin_record() {
        let coin = Object {
            object_id: Some("0xc0".into()),
            version: Some(3),
            digest: Some("d1".into()),
            object_type: Some(
                "0x0000000000000000000000000000000000000000000000000000000000000002::coin::Coin<0x0000000000000000000000000000000000000000000000000000000000000002::sui::SUI>"
                    .into(),
            ),
            balance: Some(1_000_000_000),
            previous_transaction: Some("p1".into()),
            ..Default::default()
        };
        assert_eq!(
            normalize(coin_to_legacy(coin, "0x2::sui::SUI")),
            json!({
                "coinType": "0x2::sui::SUI",
                "coinObjectId": "0xc0",
                "version": "3",
                "digest": "d1",
                "balance": "1000000000",
                "previousTransaction": "p1"
            })
        );
    }
}
