//! Method adapters and the registry that names them.
//!
//! Every adapter takes the backend handle and the positional params and
//! returns a [`Native`] result; the dispatcher normalizes it onto JSON.

pub mod balance;
pub mod chain;
pub mod checkpoint;
pub mod coins;
pub mod execute;
pub mod object;
pub mod params;
pub mod transaction;

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;
use thiserror::Error;

use crate::sui::{BackendError, LedgerBackend};
use crate::translator::Native;

/// Shared handle to the ledger backend.
pub type Backend = Arc<dyn LedgerBackend>;

pub type MethodResult = Result<Native, MethodError>;
pub type MethodFuture = BoxFuture<'static, MethodResult>;
pub type MethodHandler = Arc<dyn Fn(Vec<Value>) -> MethodFuture + Send + Sync>;

/// Failure inside a method adapter. All variants surface as internal errors
/// on the wire with the `Display` text attached as data.
#[derive(Debug, Error)]
pub enum MethodError {
    #[error("{0} parameter is required")]
    MissingParameter(&'static str),

    #[error("invalid {name} parameter: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl MethodError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        MethodError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Immutable name -> adapter table, built once at startup.
pub struct MethodRegistry {
    handlers: HashMap<String, MethodHandler>,
}

impl MethodRegistry {
    /// Register every supported method against `backend`.
    pub fn new(backend: Backend) -> Self {
        let mut handlers: HashMap<String, MethodHandler> = HashMap::new();
        let mut register = |name: &str, handler: MethodHandler| {
            handlers.insert(name.to_string(), handler);
        };

        register(
            "suix_getBalance",
            adapter(&backend, |b, p| async move { balance::get_balance(b.as_ref(), &p).await }),
        );
        register(
            "suix_getCoins",
            adapter(&backend, |b, p| async move { coins::get_coins(b.as_ref(), &p).await }),
        );
        register(
            "suix_getCoinMetadata",
            adapter(&backend, |b, p| async move { coins::get_coin_metadata(b.as_ref(), &p).await }),
        );
        register(
            "suix_getReferenceGasPrice",
            adapter(&backend, |b, _| async move { chain::get_reference_gas_price(b.as_ref()).await }),
        );
        register(
            "sui_getChainIdentifier",
            adapter(&backend, |b, _| async move { chain::get_chain_identifier(b.as_ref()).await }),
        );
        register(
            "sui_getCheckpoint",
            adapter(&backend, |b, p| async move { checkpoint::get_checkpoint(b.as_ref(), &p).await }),
        );
        register(
            "sui_getCheckpoints",
            adapter(&backend, |b, p| async move { checkpoint::get_checkpoints(b, &p).await }),
        );
        register(
            "sui_getTransactionBlock",
            adapter(&backend, |b, p| async move {
                transaction::get_transaction_block(b.as_ref(), &p).await
            }),
        );
        register(
            "sui_tryGetPastObject",
            adapter(&backend, |b, p| async move { object::try_get_past_object(b.as_ref(), &p).await }),
        );
        register(
            "sui_getObject",
            adapter(&backend, |b, p| async move { object::get_object(b.as_ref(), &p).await }),
        );
        register(
            "sui_executeTransactionBlock",
            adapter(&backend, |b, p| async move {
                execute::execute_transaction_block(b.as_ref(), &p).await
            }),
        );

        Self { handlers }
    }

    /// Registry over an explicit handler set.
    pub fn from_handlers<I>(handlers: I) -> Self
    where
        I: IntoIterator<Item = (String, MethodHandler)>,
    {
        Self {
            handlers: handlers.into_iter().collect(),
        }
    }

    pub fn get(&self, method: &str) -> Option<&MethodHandler> {
        self.handlers.get(method)
    }

    /// Registered method names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Bind an adapter function to the shared backend handle.
fn adapter<F, Fut>(backend: &Backend, f: F) -> MethodHandler
where
    F: Fn(Backend, Vec<Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = MethodResult> + Send + 'static,
{
    let backend = backend.clone();
    Arc::new(move |params| f(backend.clone(), params).boxed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            MethodError::MissingParameter("address").to_string(),
            "address parameter is required"
        );
        assert_eq!(
            MethodError::invalid("version", "expected an unsigned integer").to_string(),
            "invalid version parameter: expected an unsigned integer"
        );
        let backend = MethodError::from(BackendError::MissingField("checkpoint height"));
        assert_eq!(backend.to_string(), "backend response is missing checkpoint height");
    }

    #[test]
    fn test_from_handlers() {
        let handler: MethodHandler = Arc::new(|_params: Vec<Value>| {
            async { Ok::<_, MethodError>(Native::from("pong")) }.boxed()
        });
        let registry = MethodRegistry::from_handlers([("ping".to_string(), handler)]);
        assert_eq!(registry.len(), 1);
        assert!(registry.get("ping").is_some());
        assert!(registry.get("pong").is_none());
    }
}
