//! Boundary to the typed ledger RPC backend.
//!
//! Adapters only ever see [`LedgerBackend`]; [`LedgerClient`] is the HTTP
//! implementation wired up by the server.

pub mod client;
pub mod error;
pub mod types;

use async_trait::async_trait;

pub use client::LedgerClient;
pub use error::BackendError;
pub use types::{
    Balance, CheckpointId, Checkpoint, CoinInfo, CoinPage, ExecutedTransaction, ObjectLookup,
    ReadMask, ServiceInfo,
};

/// Operations the gateway needs from the ledger backend. One call is one
/// backend attempt; retries and timeouts belong to the implementation.
#[async_trait]
pub trait LedgerBackend: Send + Sync {
    /// Balance of `coin_type` held by `owner`, `None` when the backend has no record.
    async fn get_balance(&self, owner: &str, coin_type: &str) -> Result<Option<Balance>, BackendError>;

    /// One page of `Coin<coin_type>` objects owned by `owner`.
    async fn list_coins(
        &self,
        owner: &str,
        coin_type: &str,
        cursor: Option<&str>,
    ) -> Result<CoinPage, BackendError>;

    async fn get_coin_info(&self, coin_type: &str) -> Result<CoinInfo, BackendError>;

    /// Reference gas price of the current epoch.
    async fn get_reference_gas_price(&self) -> Result<Option<u64>, BackendError>;

    async fn get_service_info(&self) -> Result<ServiceInfo, BackendError>;

    async fn get_checkpoint(
        &self,
        id: &CheckpointId,
        mask: &ReadMask,
    ) -> Result<Option<Checkpoint>, BackendError>;

    async fn get_transaction(
        &self,
        digest: &str,
        mask: &ReadMask,
    ) -> Result<Option<ExecutedTransaction>, BackendError>;

    /// Object at `version`, or the latest version when `version` is `None`.
    async fn get_object(
        &self,
        object_id: &str,
        version: Option<u64>,
        mask: &ReadMask,
    ) -> Result<ObjectLookup, BackendError>;

    async fn execute_transaction(
        &self,
        transaction: Vec<u8>,
        signatures: Vec<Vec<u8>>,
    ) -> Result<Option<ExecutedTransaction>, BackendError>;
}
