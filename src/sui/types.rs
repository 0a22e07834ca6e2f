use convert_case::{Case, Casing};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::translator::normalize::Native;

/// Field selection sent with a backend lookup.
///
/// Paths use the backend's snake_case field names; the JSON transport
/// renders them as a comma-joined lowerCamelCase field mask.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadMask {
    pub paths: Vec<String>,
}

impl ReadMask {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    /// proto3 JSON rendering of a FieldMask, `None` for an empty mask.
    pub fn to_field_mask(&self) -> Option<String> {
        if self.paths.is_empty() {
            return None;
        }
        let rendered: Vec<String> = self
            .paths
            .iter()
            .map(|path| {
                path.split('.')
                    .map(|segment| segment.to_case(Case::Camel))
                    .collect::<Vec<_>>()
                    .join(".")
            })
            .collect();
        Some(rendered.join(","))
    }
}

/// Selector for a single checkpoint lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckpointId {
    SequenceNumber(u64),
    Digest(String),
}

/// proto3 JSON encodes 64-bit integers as strings, but plain numbers are
/// accepted too.
pub(crate) mod u64_string {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Num(u64),
        Str(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Repr>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Repr::Num(n)) => Ok(Some(n)),
            Some(Repr::Str(s)) => s.parse().map(Some).map_err(D::Error::custom),
        }
    }
}

/// Signed counterpart of [`u64_string`] for required fields.
pub(crate) mod i64_string {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Num(i64),
        Str(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Repr::deserialize(deserializer)? {
            Repr::Num(n) => Ok(n),
            Repr::Str(s) => s.parse().map_err(D::Error::custom),
        }
    }
}

/// proto3 JSON encodes `bytes` fields as standard base64.
pub(crate) mod base64_bytes {
    use base64::Engine;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(encoded) => base64::engine::general_purpose::STANDARD
                .decode(encoded.as_bytes())
                .map(Some)
                .map_err(D::Error::custom),
        }
    }
}

/// Backend timestamp, decoded from either an RFC 3339 string (proto3 JSON)
/// or an explicit `{seconds, nanos}` record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: i32,
}

impl Timestamp {
    /// Milliseconds since the epoch: `seconds * 1000 + floor(nanos / 1e6)`.
    pub fn to_millis(&self) -> i64 {
        self.seconds
            .saturating_mul(1000)
            .saturating_add(i64::from(self.nanos.div_euclid(1_000_000)))
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        #[derive(Deserialize)]
        struct Parts {
            #[serde(default, with = "i64_string")]
            seconds: i64,
            #[serde(default)]
            nanos: i32,
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Parts(Parts),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Text(text) => {
                let parsed = chrono::DateTime::parse_from_rfc3339(&text).map_err(D::Error::custom)?;
                Ok(Timestamp {
                    seconds: parsed.timestamp(),
                    nanos: parsed.timestamp_subsec_nanos() as i32,
                })
            }
            Repr::Parts(parts) => Ok(Timestamp {
                seconds: parts.seconds,
                nanos: parts.nanos,
            }),
        }
    }
}

/// BCS-serialized payload attached to many backend messages.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bcs {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, with = "base64_bytes")]
    pub value: Option<Vec<u8>>,
}

/// `google.rpc.Status` as carried inside batch results.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RpcStatus {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

// --- StateService ---

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    #[serde(default)]
    pub coin_type: Option<String>,
    #[serde(default, with = "u64_string")]
    pub balance: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct GetBalanceResponse {
    #[serde(default)]
    pub balance: Option<Balance>,
}

/// One page of owned coin objects.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinPage {
    #[serde(default)]
    pub objects: Vec<Object>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinMetadata {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub decimals: Option<u32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinInfo {
    #[serde(default)]
    pub coin_type: Option<String>,
    #[serde(default)]
    pub metadata: Option<CoinMetadata>,
}

// --- LedgerService ---

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    #[serde(default)]
    pub chain_id: Option<String>,
    #[serde(default)]
    pub chain: Option<String>,
    #[serde(default, with = "u64_string")]
    pub epoch: Option<u64>,
    #[serde(default, with = "u64_string")]
    pub checkpoint_height: Option<u64>,
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
    #[serde(default, with = "u64_string")]
    pub lowest_available_checkpoint: Option<u64>,
    #[serde(default)]
    pub server: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Epoch {
    #[serde(default, with = "u64_string")]
    pub epoch: Option<u64>,
    #[serde(default, with = "u64_string")]
    pub reference_gas_price: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct GetEpochResponse {
    #[serde(default)]
    pub epoch: Option<Epoch>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasCostSummary {
    #[serde(default, with = "u64_string")]
    pub computation_cost: Option<u64>,
    #[serde(default, with = "u64_string")]
    pub storage_cost: Option<u64>,
    #[serde(default, with = "u64_string")]
    pub storage_rebate: Option<u64>,
    #[serde(default, with = "u64_string")]
    pub non_refundable_storage_fee: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointSummary {
    #[serde(default)]
    pub digest: Option<String>,
    #[serde(default, with = "u64_string")]
    pub epoch: Option<u64>,
    #[serde(default, with = "u64_string")]
    pub sequence_number: Option<u64>,
    #[serde(default, with = "u64_string")]
    pub total_network_transactions: Option<u64>,
    #[serde(default)]
    pub previous_digest: Option<String>,
    #[serde(default)]
    pub epoch_rolling_gas_cost_summary: Option<GasCostSummary>,
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
    #[serde(default)]
    pub commitments: Vec<Native>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorAggregatedSignature {
    #[serde(default, with = "u64_string")]
    pub epoch: Option<u64>,
    #[serde(default, with = "base64_bytes")]
    pub signature: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointedTransactionInfo {
    #[serde(default)]
    pub transaction: Option<String>,
    #[serde(default)]
    pub effects: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointContents {
    #[serde(default)]
    pub digest: Option<String>,
    #[serde(default)]
    pub transactions: Vec<CheckpointedTransactionInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    #[serde(default, with = "u64_string")]
    pub sequence_number: Option<u64>,
    #[serde(default)]
    pub digest: Option<String>,
    #[serde(default)]
    pub summary: Option<CheckpointSummary>,
    #[serde(default)]
    pub signature: Option<ValidatorAggregatedSignature>,
    #[serde(default)]
    pub contents: Option<CheckpointContents>,
}

#[derive(Debug, Deserialize)]
pub struct GetCheckpointResponse {
    #[serde(default)]
    pub checkpoint: Option<Checkpoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasPayment {
    #[serde(default)]
    pub objects: Vec<Native>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default, with = "u64_string")]
    pub price: Option<u64>,
    #[serde(default, with = "u64_string")]
    pub budget: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default)]
    pub bcs: Option<Bcs>,
    #[serde(default)]
    pub digest: Option<String>,
    #[serde(default)]
    pub version: Option<i32>,
    #[serde(default)]
    pub kind: Option<Native>,
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub gas_payment: Option<GasPayment>,
    #[serde(default)]
    pub expiration: Option<Native>,
    #[serde(default)]
    pub json: Option<Native>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleSignature {
    #[serde(default, with = "base64_bytes")]
    pub signature: Option<Vec<u8>>,
    #[serde(default, with = "base64_bytes")]
    pub public_key: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSignature {
    #[serde(default)]
    pub bcs: Option<Bcs>,
    #[serde(default)]
    pub simple: Option<SimpleSignature>,
}

/// Effects are reshaped only at the `bcs` payload; every other field is
/// handed through as decoded.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionEffects {
    #[serde(default)]
    pub bcs: Option<Bcs>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionEvents {
    #[serde(default)]
    pub bcs: Option<Bcs>,
    #[serde(default)]
    pub digest: Option<String>,
    #[serde(default)]
    pub events: Vec<Native>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ObjectSet {
    #[serde(default)]
    pub objects: Vec<Native>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutedTransaction {
    #[serde(default)]
    pub digest: Option<String>,
    #[serde(default)]
    pub transaction: Option<Transaction>,
    #[serde(default)]
    pub signatures: Vec<UserSignature>,
    #[serde(default)]
    pub effects: Option<TransactionEffects>,
    #[serde(default)]
    pub events: Option<TransactionEvents>,
    #[serde(default, with = "u64_string")]
    pub checkpoint: Option<u64>,
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
    #[serde(default)]
    pub balance_changes: Option<Vec<Native>>,
    #[serde(default)]
    pub objects: Option<ObjectSet>,
}

#[derive(Debug, Deserialize)]
pub struct GetTransactionResponse {
    #[serde(default)]
    pub transaction: Option<ExecutedTransaction>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Object {
    #[serde(default)]
    pub object_id: Option<String>,
    #[serde(default, with = "u64_string")]
    pub version: Option<u64>,
    #[serde(default)]
    pub digest: Option<String>,
    #[serde(default)]
    pub owner: Option<Native>,
    #[serde(default)]
    pub object_type: Option<String>,
    #[serde(default)]
    pub has_public_transfer: Option<bool>,
    #[serde(default)]
    pub bcs: Option<Bcs>,
    #[serde(default)]
    pub contents: Option<Bcs>,
    #[serde(default)]
    pub previous_transaction: Option<String>,
    #[serde(default, with = "u64_string")]
    pub storage_rebate: Option<u64>,
    #[serde(default)]
    pub json: Option<Native>,
    #[serde(default, with = "u64_string")]
    pub balance: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetObjectResult {
    #[serde(default)]
    pub object: Option<Object>,
    #[serde(default)]
    pub error: Option<RpcStatus>,
}

#[derive(Debug, Deserialize)]
pub struct BatchGetObjectsResponse {
    #[serde(default)]
    pub objects: Vec<GetObjectResult>,
}

/// Outcome of a single object lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectLookup {
    /// The backend returned the object record.
    Found(Object),
    /// The backend reported the record itself as an error.
    Failed(RpcStatus),
    /// No record at all.
    Missing,
}

impl From<GetObjectResult> for ObjectLookup {
    fn from(result: GetObjectResult) -> Self {
        match (result.object, result.error) {
            (_, Some(status)) => ObjectLookup::Failed(status),
            (Some(object), None) => ObjectLookup::Found(object),
            (None, None) => ObjectLookup::Missing,
        }
    }
}

// --- TransactionExecutionService ---

#[derive(Debug, Deserialize)]
pub struct ExecuteTransactionResponse {
    #[serde(default)]
    pub transaction: Option<ExecutedTransaction>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_mask_rendering() {
        let mask = ReadMask::new(["digest", "balance_changes", "effects.bcs", "summary.epoch_rolling_gas_cost_summary"]);
        assert_eq!(
            mask.to_field_mask().as_deref(),
            Some("digest,balanceChanges,effects.bcs,summary.epochRollingGasCostSummary")
        );
        assert_eq!(ReadMask::default().to_field_mask(), None);
    }

    #[test]
    fn test_u64_fields_accept_strings_and_numbers() {
        let epoch: Epoch = serde_json::from_value(json!({
            "epoch": 812,
            "referenceGasPrice": "18446744073709551000"
        }))
        .unwrap();
        assert_eq!(epoch.epoch, Some(812));
        assert_eq!(epoch.reference_gas_price, Some(18_446_744_073_709_551_000));
    }

    #[test]
    fn test_timestamp_from_rfc3339() {
        let ts: Timestamp = serde_json::from_value(json!("2024-05-01T12:00:00.123456789Z")).unwrap();
        assert_eq!(ts.seconds, 1_714_564_800);
        assert_eq!(ts.nanos, 123_456_789);
        assert_eq!(ts.to_millis(), 1_714_564_800_123);
    }

    #[test]
    fn test_timestamp_from_parts() {
        let ts: Timestamp = serde_json::from_value(json!({ "seconds": "1700000000", "nanos": 999_999 })).unwrap();
        assert_eq!(ts.to_millis(), 1_700_000_000_000);
    }

    #[test]
    fn test_bcs_value_is_base64_decoded() {
        let bcs: Bcs = serde_json::from_value(json!({ "name": "TransactionData", "value": "AQID" })).unwrap();
        assert_eq!(bcs.value, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_effects_keep_unknown_fields() {
        let effects: TransactionEffects = serde_json::from_value(json!({
            "bcs": { "value": "AA==" },
            "status": { "success": true },
            "epoch": "12"
        }))
        .unwrap();
        assert_eq!(effects.bcs.unwrap().value, Some(vec![0]));
        assert_eq!(effects.fields.get("epoch"), Some(&json!("12")));
        assert!(effects.fields.contains_key("status"));
    }

    #[test]
    fn test_object_lookup_from_result() {
        let found = GetObjectResult {
            object: Some(Object::default()),
            error: None,
        };
        assert!(matches!(ObjectLookup::from(found), ObjectLookup::Found(_)));

        let failed = GetObjectResult {
            object: None,
            error: Some(RpcStatus { code: 5, message: "Object not found".into() }),
        };
        assert!(matches!(ObjectLookup::from(failed), ObjectLookup::Failed(_)));

        assert_eq!(ObjectLookup::from(GetObjectResult::default()), ObjectLookup::Missing);
    }
}
