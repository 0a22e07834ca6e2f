use std::net::SocketAddr;
use std::sync::Arc;
use std::task::{Context as TaskContext, Poll};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use futures::future::BoxFuture;
use http::{header, Method, StatusCode};
use http_body_util::{BodyExt, Limited};
use jsonrpsee::server::{HttpBody, HttpRequest, HttpResponse, RpcModule, Server, ServerHandle};
use jsonrpsee::types::{ErrorCode, ErrorObjectOwned};
use serde_json::{json, Value};
use tower::{Layer, Service};
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::dispatch::{Dispatcher, JSONRPC_VERSION};
use crate::methods::{Backend, MethodRegistry};
use crate::sui::{LedgerBackend, LedgerClient};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Largest request body the gateway buffers.
pub const MAX_REQUEST_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Start the JSON-RPC server.
pub async fn start_server(config: Config) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    info!("Starting Sui RPC gateway on {}", addr);
    info!("Network: {}", config.network);
    info!("Backend: {}", config.backend_url);

    let client = LedgerClient::new(
        &config.backend_url,
        Duration::from_secs(config.backend_timeout_secs),
    )
    .context("Failed to build backend client")?;

    // Check the backend once at startup
    match client.get_service_info().await {
        Ok(info) => {
            info!(
                "Backend reachable: chain={}, checkpoint_height={:?}",
                info.chain.as_deref().unwrap_or("unknown"),
                info.checkpoint_height
            );
        }
        Err(e) => {
            warn!("Could not reach backend (will retry on requests): {}", e);
        }
    }

    let backend: Backend = Arc::new(client);
    let dispatcher = Dispatcher::new(MethodRegistry::new(backend));
    info!(
        "Registered {} methods: {}",
        dispatcher.registry().len(),
        dispatcher.registry().names().join(", ")
    );

    let (local_addr, handle) = serve(addr, dispatcher).await?;
    info!("Sui RPC gateway listening on http://{}", local_addr);

    handle.stopped().await;

    info!("Sui RPC gateway stopped");
    Ok(())
}

/// Bind `addr` and answer every POST body through `dispatcher`.
/// Returns the bound address, so port 0 works.
pub async fn serve(addr: SocketAddr, dispatcher: Dispatcher) -> Result<(SocketAddr, ServerHandle)> {
    let http_middleware = tower::ServiceBuilder::new()
        .layer(CorsLayer::permissive())
        .layer(EnvelopeLayer::new(dispatcher));

    let server = Server::builder()
        .http_only()
        .set_http_middleware(http_middleware)
        .build(addr)
        .await
        .map_err(|e| anyhow!("Failed to bind server to {}: {}", addr, e))?;

    let local_addr = server
        .local_addr()
        .map_err(|e| anyhow!("Failed to read bound address: {}", e))?;

    // POST bodies never reach the module, the envelope layer answers them
    Ok((local_addr, server.start(RpcModule::new(()))))
}

/// HTTP middleware that answers JSON-RPC bodies with [`Dispatcher::handle`].
///
/// Envelope validation stays with the dispatcher, so a request without an
/// `id` is answered with `"id": null` and a missing `method` gets a message
/// naming the field. Other HTTP methods fall through to the inner service.
#[derive(Clone)]
pub struct EnvelopeLayer {
    dispatcher: Dispatcher,
}

impl EnvelopeLayer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

impl<S> Layer<S> for EnvelopeLayer {
    type Service = EnvelopeService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        EnvelopeService {
            inner,
            dispatcher: self.dispatcher.clone(),
        }
    }
}

#[derive(Clone)]
pub struct EnvelopeService<S> {
    inner: S,
    dispatcher: Dispatcher,
}

impl<S> Service<HttpRequest> for EnvelopeService<S>
where
    S: Service<HttpRequest, Response = HttpResponse, Error = BoxError>,
    S::Future: Send + 'static,
{
    type Response = HttpResponse;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<HttpResponse, BoxError>>;

    fn poll_ready(&mut self, cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: HttpRequest) -> Self::Future {
        if request.method() != Method::POST {
            return Box::pin(self.inner.call(request));
        }

        let dispatcher = self.dispatcher.clone();

        Box::pin(async move {
            let body = match Limited::new(request.into_body(), MAX_REQUEST_BODY_BYTES)
                .collect()
                .await
            {
                Ok(collected) => collected.to_bytes(),
                Err(e) => {
                    warn!("Rejected request body: {}", e);
                    return status_response(StatusCode::PAYLOAD_TOO_LARGE);
                }
            };

            let reply = match serde_json::from_slice::<Value>(&body) {
                Ok(payload) => dispatcher.handle(payload).await,
                Err(e) => {
                    debug!("Unparseable request body: {}", e);
                    parse_error(e)
                }
            };

            json_response(&reply)
        })
    }
}

fn parse_error(err: serde_json::Error) -> Value {
    let err = ErrorObjectOwned::owned(ErrorCode::ParseError.code(), "Parse error", Some(err.to_string()));
    json!({
        "jsonrpc": JSONRPC_VERSION,
        "error": err,
        "id": Value::Null,
    })
}

fn json_response(reply: &Value) -> Result<HttpResponse, BoxError> {
    let body = serde_json::to_string(reply)?;
    let response = http::Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .body(HttpBody::from(body))?;
    Ok(response)
}

fn status_response(status: StatusCode) -> Result<HttpResponse, BoxError> {
    let response = http::Response::builder()
        .status(status)
        .body(HttpBody::empty())?;
    Ok(response)
}
