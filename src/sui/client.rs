use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error};

use super::error::BackendError;
use super::types::*;
use super::LedgerBackend;

const LEDGER_SERVICE: &str = "sui.rpc.v2.LedgerService";
const STATE_SERVICE: &str = "sui.rpc.v2.StateService";
const EXECUTION_SERVICE: &str = "sui.rpc.v2.TransactionExecutionService";

/// Paths requested for each coin returned by `list_coins`.
const COIN_READ_MASK: &str = "objectId,version,digest,objectType,balance,previousTransaction";

/// Error body returned with non-2xx unary replies.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Client for the ledger backend's unary JSON transport.
///
/// Each call POSTs a proto3-JSON request message to
/// `<base>/<package.Service>/<Method>` and decodes the proto3-JSON reply.
#[derive(Clone)]
pub struct LedgerClient {
    http_client: Client,
    base_url: String,
}

impl LedgerClient {
    /// Create a new backend client.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the backend base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one unary request and decode its reply.
    async fn send_request<T: DeserializeOwned>(
        &self,
        service: &str,
        method: &str,
        body: Value,
    ) -> Result<T, BackendError> {
        debug!("Sending backend request: {}/{}", service, method);

        let url = format!("{}/{}/{}", self.base_url, service, method);
        let response = self.http_client.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let body: ErrorBody = serde_json::from_str(&text).unwrap_or(ErrorBody {
                code: status.as_str().to_string(),
                message: text,
            });
            error!(
                "Backend error from {}/{}: code={}, message={}",
                service, method, body.code, body.message
            );
            return Err(BackendError::Status {
                code: body.code,
                message: body.message,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Attach `readMask` to a request body when the mask is non-empty.
fn with_read_mask(mut body: Value, mask: &ReadMask) -> Value {
    if let (Some(fields), Some(object)) = (mask.to_field_mask(), body.as_object_mut()) {
        object.insert("readMask".to_string(), Value::String(fields));
    }
    body
}

#[async_trait]
impl LedgerBackend for LedgerClient {
    async fn get_balance(&self, owner: &str, coin_type: &str) -> Result<Option<Balance>, BackendError> {
        let body = json!({ "owner": owner, "coinType": coin_type });
        let response: GetBalanceResponse = self.send_request(STATE_SERVICE, "GetBalance", body).await?;
        Ok(response.balance)
    }

    async fn list_coins(
        &self,
        owner: &str,
        coin_type: &str,
        cursor: Option<&str>,
    ) -> Result<CoinPage, BackendError> {
        let mut body = json!({
            "owner": owner,
            "objectType": format!("0x2::coin::Coin<{}>", coin_type),
            "readMask": COIN_READ_MASK,
        });
        if let (Some(cursor), Some(object)) = (cursor, body.as_object_mut()) {
            object.insert("pageToken".to_string(), Value::String(cursor.to_string()));
        }
        self.send_request(STATE_SERVICE, "ListOwnedObjects", body).await
    }

    async fn get_coin_info(&self, coin_type: &str) -> Result<CoinInfo, BackendError> {
        let body = json!({ "coinType": coin_type });
        self.send_request(STATE_SERVICE, "GetCoinInfo", body).await
    }

    async fn get_reference_gas_price(&self) -> Result<Option<u64>, BackendError> {
        let body = json!({ "readMask": "epoch,referenceGasPrice" });
        let response: GetEpochResponse = self.send_request(LEDGER_SERVICE, "GetEpoch", body).await?;
        Ok(response.epoch.and_then(|epoch| epoch.reference_gas_price))
    }

    async fn get_service_info(&self) -> Result<ServiceInfo, BackendError> {
        self.send_request(LEDGER_SERVICE, "GetServiceInfo", json!({})).await
    }

    async fn get_checkpoint(
        &self,
        id: &CheckpointId,
        mask: &ReadMask,
    ) -> Result<Option<Checkpoint>, BackendError> {
        let body = match id {
            CheckpointId::SequenceNumber(sequence) => json!({ "sequenceNumber": sequence.to_string() }),
            CheckpointId::Digest(digest) => json!({ "digest": digest }),
        };
        let response: GetCheckpointResponse = self
            .send_request(LEDGER_SERVICE, "GetCheckpoint", with_read_mask(body, mask))
            .await?;
        Ok(response.checkpoint)
    }

    async fn get_transaction(
        &self,
        digest: &str,
        mask: &ReadMask,
    ) -> Result<Option<ExecutedTransaction>, BackendError> {
        let body = with_read_mask(json!({ "digest": digest }), mask);
        let response: GetTransactionResponse = self
            .send_request(LEDGER_SERVICE, "GetTransaction", body)
            .await?;
        Ok(response.transaction)
    }

    async fn get_object(
        &self,
        object_id: &str,
        version: Option<u64>,
        mask: &ReadMask,
    ) -> Result<ObjectLookup, BackendError> {
        let mut request = json!({ "objectId": object_id });
        if let (Some(version), Some(object)) = (version, request.as_object_mut()) {
            object.insert("version".to_string(), Value::String(version.to_string()));
        }
        let body = with_read_mask(json!({ "requests": [request] }), mask);
        let response: BatchGetObjectsResponse = self
            .send_request(LEDGER_SERVICE, "BatchGetObjects", body)
            .await?;
        Ok(response
            .objects
            .into_iter()
            .next()
            .map(ObjectLookup::from)
            .unwrap_or(ObjectLookup::Missing))
    }

    async fn execute_transaction(
        &self,
        transaction: Vec<u8>,
        signatures: Vec<Vec<u8>>,
    ) -> Result<Option<ExecutedTransaction>, BackendError> {
        let engine = &base64::engine::general_purpose::STANDARD;
        let signatures: Vec<Value> = signatures
            .iter()
            .map(|sig| json!({ "bcs": { "value": engine.encode(sig) } }))
            .collect();
        let body = json!({
            "transaction": { "bcs": { "value": engine.encode(&transaction) } },
            "signatures": signatures,
            "readMask": "finality,transaction",
        });
        let response: ExecuteTransactionResponse = self
            .send_request(EXECUTION_SERVICE, "ExecuteTransaction", body)
            .await?;
        Ok(response.transaction)
    }
}
