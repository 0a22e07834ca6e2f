use crate::sui::types::{ExecutedTransaction, GasPayment, Transaction, TransactionEffects, UserSignature};

use super::normalize::{Native, Record};

/// Backend transaction-kind keys and their legacy names.
const KIND_NAMES: [(&str, &str); 4] = [
    ("programmableTransaction", "ProgrammableTransaction"),
    ("changeEpoch", "ChangeEpoch"),
    ("genesis", "Genesis"),
    ("consensusCommitPrologue", "ConsensusCommitPrologue"),
];

/// Reshape an executed transaction into the legacy transaction-block record.
///
/// The backend nests payloads and signatures differently: the envelope is
/// split into `{data, txSignatures}`, the raw transaction is base64, raw
/// effects stay a byte array, and `objects` is renamed to `objectChanges`.
pub fn transaction_to_legacy(executed: ExecutedTransaction) -> Native {
    let raw_transaction = executed
        .transaction
        .as_ref()
        .and_then(|tx| tx.bcs.as_ref())
        .and_then(|bcs| bcs.value.as_deref())
        .map(Native::base64);

    let raw_effects = executed
        .effects
        .as_ref()
        .and_then(|effects| effects.bcs.as_ref())
        .and_then(|bcs| bcs.value.clone())
        .map(Native::Bytes);

    let signatures = &executed.signatures;
    let envelope = executed.transaction.map(|tx| {
        Record::new()
            .field("data", transaction_data(tx))
            .field("txSignatures", Native::List(encode_signatures(signatures)))
    });

    Record::new()
        .field_opt("digest", executed.digest)
        .field_opt("transaction", envelope)
        .field_opt("effects", executed.effects.map(effects_to_native))
        .field_opt("events", executed.events.map(|events| Native::List(events.events)))
        .field_opt("checkpoint", executed.checkpoint)
        .field_opt("timestampMs", executed.timestamp.map(|ts| ts.to_millis()))
        .field_opt("balanceChanges", executed.balance_changes.map(Native::List))
        .field_opt("objectChanges", executed.objects.map(|set| Native::List(set.objects)))
        .field_opt("rawTransaction", raw_transaction)
        .field_opt("rawEffects", raw_effects)
        .into()
}

/// The `transaction.data` record: the backend's JSON rendering when it sent
/// one, otherwise rebuilt from the typed fields.
fn transaction_data(tx: Transaction) -> Native {
    if let Some(json) = tx.json {
        return json;
    }

    let message_version = if tx.version == Some(1) { "v1" } else { "v2" };

    Record::new()
        .field("messageVersion", message_version)
        .field_opt("transaction", tx.kind.map(kind_to_legacy))
        .field_opt("sender", tx.sender)
        .field_opt("gasData", tx.gas_payment.map(gas_data))
        .field_opt("expiration", tx.expiration)
        .into()
}

fn kind_to_legacy(kind: Native) -> Native {
    let name = KIND_NAMES
        .iter()
        .find(|(key, _)| kind.get(key).is_some())
        .map(|(_, name)| *name);

    let programmable = kind
        .get("programmableTransaction")
        .cloned()
        .unwrap_or(Native::Null);

    Record::new()
        .field_opt("kind", name)
        .extend_from(programmable)
        .into()
}

fn gas_data(payment: GasPayment) -> Record {
    Record::new()
        .field("payment", Native::List(payment.objects))
        .field_opt("owner", payment.owner)
        .field_opt("price", payment.price)
        .field_opt("budget", payment.budget)
}

/// Base64 signatures, preferring the full serialized signature and falling
/// back to the bare simple-scheme signature bytes.
fn encode_signatures(signatures: &[UserSignature]) -> Vec<Native> {
    signatures
        .iter()
        .filter_map(|sig| {
            sig.bcs
                .as_ref()
                .and_then(|bcs| bcs.value.as_deref())
                .or_else(|| sig.simple.as_ref().and_then(|s| s.signature.as_deref()))
        })
        .filter(|bytes| !bytes.is_empty())
        .map(Native::base64)
        .collect()
}

fn effects_to_native(effects: TransactionEffects) -> Native {
    let mut record = Record::new();
    if let Some(bcs) = effects.bcs {
        record = record.field(
            "bcs",
            Record::new()
                .field_opt("name", bcs.name)
                .field_opt("value", bcs.value.map(Native::Bytes)),
        );
    }
    for (key, value) in effects.fields {
        record = record.field(&key, Native::from(value));
    }
    record.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sui::types::{Bcs, ObjectSet, SimpleSignature, Timestamp, TransactionEvents};
    use crate::translator::normalize::normalize;
    use serde_json::{json, Map};

    fn sample() -> ExecutedTransaction {
        let mut effect_fields = Map::new();
        effect_fields.insert("status".into(), json!({ "success": true }));

        ExecutedTransaction {
            digest: Some("3Fz8".into()),
            transaction: Some(Transaction {
                bcs: Some(Bcs { name: None, value: Some(b"tx".to_vec()) }),
                version: Some(1),
                kind: Some(Native::from(json!({
                    "kind": "PROGRAMMABLE_TRANSACTION",
                    "programmableTransaction": { "inputs": [], "commands": [] }
                }))),
                sender: Some("0xa11ce".into()),
                gas_payment: Some(GasPayment {
                    objects: vec![],
                    owner: Some("0xa11ce".into()),
                    price: Some(750),
                    budget: Some(5_000_000),
                }),
                ..Default::default()
            }),
            signatures: vec![
                UserSignature { bcs: Some(Bcs { name: None, value: Some(vec![7, 7]) }), simple: None },
                UserSignature {
                    bcs: None,
                    simple: Some(SimpleSignature { signature: Some(vec![8]), public_key: None }),
                },
                UserSignature::default(),
            ],
            effects: Some(TransactionEffects {
                bcs: Some(Bcs { name: Some("TransactionEffects".into()), value: Some(vec![1, 2]) }),
                fields: effect_fields,
            }),
            events: Some(TransactionEvents {
                events: vec![Native::from(json!({ "eventType": "0x2::coin::Mint" }))],
                ..Default::default()
            }),
            checkpoint: Some(1234),
            timestamp: Some(Timestamp { seconds: 1_700_000_001, nanos: 2_500_000 }),
            balance_changes: Some(vec![Native::from(json!({ "amount": "-10" }))]),
            objects: Some(ObjectSet { objects: vec![Native::from(json!({ "objectId": "0x5" }))] }),
        }
    }

    #[test]
    fn test_transaction_reshaping() {
        let value = normalize(transaction_to_legacy(sample()));

        assert_eq!(value["digest"], json!("3Fz8"));
        assert_eq!(value["transaction"]["data"]["messageVersion"], json!("v1"));
        assert_eq!(value["transaction"]["data"]["transaction"]["kind"], json!("ProgrammableTransaction"));
        assert_eq!(value["transaction"]["data"]["transaction"]["commands"], json!([]));
        assert_eq!(value["transaction"]["data"]["gasData"]["budget"], json!("5000000"));
        assert_eq!(value["transaction"]["txSignatures"], json!(["Bwc=", "CA=="]));
        assert_eq!(value["rawTransaction"], json!("dHg="));
        assert_eq!(value["rawEffects"], json!([1, 2]));
        assert_eq!(value["effects"]["bcs"]["value"], json!([1, 2]));
        assert_eq!(value["effects"]["status"], json!({ "success": true }));
        assert_eq!(value["events"], json!([{ "eventType": "0x2::coin::Mint" }]));
        assert_eq!(value["checkpoint"], json!("1234"));
        assert_eq!(value["timestampMs"], json!("1700000001002"));
        assert_eq!(value["objectChanges"], json!([{ "objectId": "0x5" }]));
        assert!(value.get("objects").is_none());
    }

    #[test]
    fn test_backend_json_rendering_wins() {
        let mut executed = sample();
        if let Some(tx) = executed.transaction.as_mut() {
            tx.json = Some(Native::from(json!({ "sender": "0xb0b" })));
        }
        let value = normalize(transaction_to_legacy(executed));
        assert_eq!(value["transaction"]["data"], json!({ "sender": "0xb0b" }));
    }

    #[test]
    fn test_missing_parts_are_omitted() {
        let value = normalize(transaction_to_legacy(ExecutedTransaction {
            digest: Some("only".into()),
            ..Default::default()
        }));
        assert_eq!(value, json!({ "digest": "only" }));
    }
}
