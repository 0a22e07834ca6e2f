//! JSON-RPC 2.0 envelope handling: validation, routing, error mapping.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use jsonrpsee::types::{ErrorCode, ErrorObjectOwned};
use serde_json::{json, Value};
use tracing::{debug, error, info};

use crate::methods::MethodRegistry;
use crate::translator::normalize;

pub const JSONRPC_VERSION: &str = "2.0";

/// Routes envelopes to registered method adapters.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<MethodRegistry>,
}

impl Dispatcher {
    pub fn new(registry: MethodRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    /// Handle a request body: one envelope, or an array of envelopes
    /// answered in the same order. Each batch element is independent.
    pub async fn handle(&self, request: Value) -> Value {
        match request {
            Value::Array(batch) => {
                debug!("Handling batch of {} requests", batch.len());
                let responses =
                    join_all(batch.into_iter().map(|envelope| self.handle_single(envelope))).await;
                Value::Array(responses)
            }
            envelope => self.handle_single(envelope).await,
        }
    }

    /// Validate one envelope and produce its response. The `id` is echoed
    /// verbatim, `null` when absent.
    pub async fn handle_single(&self, envelope: Value) -> Value {
        let id = envelope.get("id").cloned().unwrap_or(Value::Null);

        if envelope.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
            return error_response(id, invalid_request("Invalid Request"));
        }

        let method = match envelope.get("method").and_then(Value::as_str) {
            Some(method) if !method.is_empty() => method,
            _ => {
                return error_response(id, invalid_request("Invalid Request: method is required"));
            }
        };

        let params = envelope.get("params").cloned().unwrap_or(Value::Null);

        match self.dispatch(method, params).await {
            Ok(result) => json!({
                "jsonrpc": JSONRPC_VERSION,
                "result": result,
                "id": id,
            }),
            Err(err) => error_response(id, err),
        }
    }

    /// Look up `method` and run it. Adapter failures become internal errors
    /// carrying the adapter's message as data.
    pub async fn dispatch(&self, method: &str, params: Value) -> Result<Value, ErrorObjectOwned> {
        let Some(handler) = self.registry.get(method) else {
            return Err(ErrorObjectOwned::owned(
                ErrorCode::MethodNotFound.code(),
                format!("Method not found: {}", method),
                None::<()>,
            ));
        };

        let params = match params {
            Value::Null => Vec::new(),
            Value::Array(params) => params,
            _ => return Err(internal_error("params must be a positional array")),
        };

        info!("Handling method: {}", method);
        let started = Instant::now();

        match handler(params).await {
            Ok(result) => {
                info!(
                    "Method {} completed in {}ms",
                    method,
                    started.elapsed().as_millis()
                );
                Ok(normalize(result))
            }
            Err(e) => {
                error!(
                    "Method {} failed after {}ms: {}",
                    method,
                    started.elapsed().as_millis(),
                    e
                );
                Err(internal_error(e.to_string()))
            }
        }
    }
}

fn invalid_request(message: &str) -> ErrorObjectOwned {
    ErrorObjectOwned::owned(ErrorCode::InvalidRequest.code(), message, None::<()>)
}

/// `-32603` with the failure message attached as data.
pub fn internal_error(message: impl Into<String>) -> ErrorObjectOwned {
    ErrorObjectOwned::owned(
        ErrorCode::InternalError.code(),
        "Internal error",
        Some(message.into()),
    )
}

fn error_response(id: Value, err: ErrorObjectOwned) -> Value {
    json!({
        "jsonrpc": JSONRPC_VERSION,
        "error": err,
        "id": id,
    })
}
