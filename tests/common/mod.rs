//! Shared utilities for integration testing.
//!
//! Every server binds `127.0.0.1:0`, so tests can run in parallel.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use api_gateway::{GatewayConfig, GatewayServer, Shutdown};
use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Registry entry in the shape of `/v1/health/service/{name}`.
pub fn health_entry(service_address: &str, node_address: &str, port: u16) -> Value {
    json!({
        "Node": { "Node": "node-1", "Address": node_address },
        "Service": { "ID": "svc-1", "Service": "svc", "Address": service_address, "Port": port },
        "Checks": [{ "Status": "passing" }]
    })
}

#[derive(Clone, Default)]
struct RegistryState {
    services: Arc<HashMap<String, Value>>,
    hits: Arc<AtomicUsize>,
}

/// Mock health registry. Unknown services get `[]`; a query without
/// `passing=1` gets a 400.
pub struct MockRegistry {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl MockRegistry {
    pub async fn start(services: Vec<(&str, Value)>) -> Self {
        let state = RegistryState {
            services: Arc::new(
                services
                    .into_iter()
                    .map(|(name, entries)| (name.to_string(), entries))
                    .collect(),
            ),
            hits: Arc::new(AtomicUsize::new(0)),
        };
        let hits = state.hits.clone();

        let app = Router::new()
            .route("/v1/health/service/{name}", get(registry_handler))
            .with_state(state);
        let addr = serve(app).await;
        Self { addr, hits }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn registry_handler(
    State(state): State<RegistryState>,
    Path(name): Path<String>,
    RawQuery(query): RawQuery,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    if query.as_deref() != Some("passing=1") {
        return StatusCode::BAD_REQUEST.into_response();
    }
    let entries = state.services.get(&name).cloned().unwrap_or_else(|| json!([]));
    Json(entries).into_response()
}

/// What an upstream saw.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Canned upstream reply.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub headers: Vec<(&'static str, &'static str)>,
    pub body: &'static str,
    pub delay: Duration,
}

impl Reply {
    pub fn ok(body: &'static str) -> Self {
        Self {
            status: StatusCode::OK,
            headers: Vec::new(),
            body,
            delay: Duration::ZERO,
        }
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers.push((name, value));
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Clone)]
struct UpstreamState {
    reply: Reply,
    recorded: Arc<Mutex<Vec<Recorded>>>,
}

/// Upstream that records every request and answers with a fixed reply.
pub struct MockUpstream {
    pub addr: SocketAddr,
    recorded: Arc<Mutex<Vec<Recorded>>>,
}

impl MockUpstream {
    pub async fn start(reply: Reply) -> Self {
        let state = UpstreamState {
            reply,
            recorded: Arc::new(Mutex::new(Vec::new())),
        };
        let recorded = state.recorded.clone();

        let app = Router::new().fallback(upstream_handler).with_state(state);
        let addr = serve(app).await;
        Self { addr, recorded }
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.recorded.lock().unwrap().clone()
    }
}

async fn upstream_handler(
    State(state): State<UpstreamState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.recorded.lock().unwrap().push(Recorded {
        method,
        uri,
        headers,
        body,
    });

    if !state.reply.delay.is_zero() {
        tokio::time::sleep(state.reply.delay).await;
    }

    let mut response = (state.reply.status, state.reply.body).into_response();
    for (name, value) in state.reply.headers.iter().copied() {
        response.headers_mut().insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    response
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// A port nothing is listening on.
pub fn closed_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Config pointing at `registry_url`.
pub fn gateway_config(registry_url: &str) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.discovery.registry_url = registry_url.to_string();
    config.quota.limit = 1000;
    config
}

/// A running gateway; dropping it does not stop the server, call `stop`.
pub struct TestGateway {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestGateway {
    pub async fn start(config: GatewayConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Shutdown::new();
        let server = GatewayServer::new(config).unwrap();
        let rx = shutdown.subscribe();
        tokio::spawn(async move {
            let _ = server.run(listener, rx).await;
        });
        Self { addr, shutdown }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn stop(&self) {
        self.shutdown.trigger();
    }
}

/// Client that never follows redirects or uses an env proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
