use crate::sui::types::{Checkpoint, GasCostSummary};

use super::normalize::{Native, Record};

/// Flatten a backend checkpoint into the legacy checkpoint record.
pub fn checkpoint_to_legacy(checkpoint: Checkpoint) -> Native {
    let summary = checkpoint.summary.unwrap_or_default();

    let transactions: Vec<Native> = checkpoint
        .contents
        .map(|contents| {
            contents
                .transactions
                .into_iter()
                .filter_map(|info| info.transaction)
                .map(Native::from)
                .collect()
        })
        .unwrap_or_default();

    let validator_signature = checkpoint
        .signature
        .and_then(|sig| sig.signature)
        .map(|bytes| Native::base64(&bytes));

    Record::new()
        .field_opt("epoch", summary.epoch)
        .field_opt("sequenceNumber", checkpoint.sequence_number.or(summary.sequence_number))
        .field_opt("digest", checkpoint.digest.or(summary.digest))
        .field_opt("networkTotalTransactions", summary.total_network_transactions)
        .field_opt("previousDigest", summary.previous_digest)
        .field_opt(
            "epochRollingGasCostSummary",
            summary.epoch_rolling_gas_cost_summary.map(gas_cost_summary),
        )
        .field_opt("timestampMs", summary.timestamp.map(|ts| ts.to_millis()))
        .field("transactions", Native::List(transactions))
        .field("checkpointCommitments", Native::List(summary.commitments))
        .field_opt("validatorSignature", validator_signature)
        .into()
}

fn gas_cost_summary(summary: GasCostSummary) -> Record {
    Record::new()
        .field_opt("computationCost", summary.computation_cost)
        .field_opt("storageCost", summary.storage_cost)
        .field_opt("storageRebate", summary.storage_rebate)
        .field_opt("nonRefundableStorageFee", summary.non_refundable_storage_fee)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sui::types::{
        CheckpointContents, CheckpointSummary, CheckpointedTransactionInfo, Timestamp,
        ValidatorAggregatedSignature,
    };
    use crate::translator::normalize::normalize;
    use serde_json::json;

    #[test]
    fn test_checkpoint_flattening() {
        let checkpoint = Checkpoint {
            sequence_number: Some(9_007_199_254_740_993),
            digest: Some("4btiuiMPvEENsttpZC7CZ53DruC3MAgfznDbASZ7DR6S".into()),
            summary: Some(CheckpointSummary {
                epoch: Some(812),
                total_network_transactions: Some(3_912_000_111),
                previous_digest: Some("9hYyt5Cr2nKrd5HZ4kW5QZVYtbzRFYYgB13L6dS3bBeR".into()),
                epoch_rolling_gas_cost_summary: Some(GasCostSummary {
                    computation_cost: Some(10),
                    storage_cost: Some(20),
                    storage_rebate: Some(5),
                    non_refundable_storage_fee: Some(1),
                }),
                timestamp: Some(Timestamp { seconds: 1_700_000_000, nanos: 456_789_000 }),
                ..Default::default()
            }),
            signature: Some(ValidatorAggregatedSignature {
                epoch: Some(812),
                signature: Some(vec![1, 2, 3]),
            }),
            contents: Some(CheckpointContents {
                digest: None,
                transactions: vec![
                    CheckpointedTransactionInfo { transaction: Some("tx1".into()), effects: None },
                    CheckpointedTransactionInfo { transaction: None, effects: Some("fx".into()) },
                    CheckpointedTransactionInfo { transaction: Some("tx2".into()), effects: None },
                ],
            }),
        };

        assert_eq!(
            normalize(checkpoint_to_legacy(checkpoint)),
            json!({
                "epoch": "812",
                "sequenceNumber": "9007199254740993",
                "digest": "4btiuiMPvEENsttpZC7CZ53DruC3MAgfznDbASZ7DR6S",
                "networkTotalTransactions": "3912000111",
                "previousDigest": "9hYyt5Cr2nKrd5HZ4kW5QZVYtbzRFYYgB13L6dS3bBeR",
                "epochRollingGasCostSummary": {
                    "computationCost": "10",
                    "storageCost": "20",
                    "storageRebate": "5",
                    "nonRefundableStorageFee": "1"
                },
                "timestampMs": "1700000000456",
                "transactions": ["tx1", "tx2"],
                "checkpointCommitments": [],
                "validatorSignature": "AQID"
            })
        );
    }

    #[test]
    fn test_summary_fields_used_as_fallback() {
        let checkpoint = Checkpoint {
            summary: Some(CheckpointSummary {
                digest: Some("summary-digest".into()),
                sequence_number: Some(4),
                ..Default::default()
            }),
            ..Default::default()
        };
        let value = normalize(checkpoint_to_legacy(checkpoint));
        assert_eq!(value["digest"], json!("summary-digest"));
        assert_eq!(value["sequenceNumber"], json!("4"));
        assert!(value.get("validatorSignature").is_none());
        assert_eq!(value["transactions"], json!([]));
    }
}
