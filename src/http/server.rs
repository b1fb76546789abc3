//! HTTP server setup and the gateway handler.
//!
//! # Responsibilities
//! - Create the Axum Router for `/api/{service}/{*path}`
//! - Wire up middleware (tracing, request ID, body limit)
//! - Gate each request through admission control
//! - Resolve the target service and forward the request
//! - Record per-request metrics

use axum::{
    body::Bytes,
    extract::{ConnectInfo, DefaultBodyLimit, Path, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::admission::{Admission, AdmissionController, InMemoryQuotaStore, QuotaStore};
use crate::config::GatewayConfig;
use crate::discovery::{RegistryClient, RegistryError, Resolution, Resolver, UniformRandom};
use crate::forwarding::{ForwardOutcome, Forwarder, HeaderPolicyError};
use crate::http::request::{
    propagate_request_id_layer, request_id, set_request_id_layer, RouteRequest,
};
use crate::observability::metrics;

/// Why the server could not be assembled from a configuration.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("discovery setup failed: {0}")]
    Discovery(#[from] RegistryError),

    #[error("forwarding setup failed: {0}")]
    Forwarding(#[from] HeaderPolicyError),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub admission: AdmissionController,
    pub resolver: Arc<Resolver>,
    pub forwarder: Arc<Forwarder>,
}

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
    admission: AdmissionController,
}

impl GatewayServer {
    /// Create a server with an in-memory quota store.
    pub fn new(config: GatewayConfig) -> Result<Self, ServerError> {
        Self::with_store(config, Arc::new(InMemoryQuotaStore::new()))
    }

    /// Create a server using the given quota store.
    pub fn with_store(
        config: GatewayConfig,
        store: Arc<dyn QuotaStore>,
    ) -> Result<Self, ServerError> {
        let registry = RegistryClient::new(
            &config.discovery.registry_url,
            config.discovery.timeout(),
        )?;
        let resolver = Arc::new(Resolver::new(registry, Box::new(UniformRandom)));
        let forwarder = Arc::new(Forwarder::from_config(&config.forwarding)?);
        let admission = AdmissionController::from_config(store, &config.quota);

        let state = AppState {
            admission: admission.clone(),
            resolver,
            forwarder,
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            admission,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route(
                "/api/{service}/{*path}",
                get(gateway_handler)
                    .post(gateway_handler)
                    .put(gateway_handler)
                    .delete(gateway_handler)
                    .patch(gateway_handler),
            )
            .route("/healthz", get(|| async { "ok" }))
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.listener.max_body_bytes))
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http())
                    .layer(propagate_request_id_layer()),
            )
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            registry = %self.config.discovery.registry_url,
            quota_limit = self.config.quota.limit,
            quota_window_secs = self.config.quota.window_secs,
            "HTTP server starting"
        );

        tokio::spawn(self.admission.clone().run_sweeper(shutdown.resubscribe()));

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        let mut shutdown = shutdown;
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Entry point for `/api/{service}/{*path}`.
async fn gateway_handler(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Path((service, _)): Path<(String, String)>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let started = Instant::now();
    let request_id = request_id(&headers).to_string();
    let request = RouteRequest::from_parts(method, service, &uri, headers, body, addr.ip());

    tracing::debug!(
        request_id = %request_id,
        method = %request.method,
        service = %request.service,
        path = %request.path,
        client = %request.client_ip,
        "Gateway request"
    );

    let outcome = dispatch(&state, &request).await;
    let service_label = outcome.metrics_service(&request.service);
    let response = outcome.into_response();

    let status: StatusCode = response.status();
    metrics::record_request(request.method.as_str(), status.as_u16(), service_label, started);
    tracing::debug!(
        request_id = %request_id,
        service = %request.service,
        status = %status,
        "Gateway response"
    );
    response
}

/// Admission → discovery → forwarding. Every path ends in one outcome.
pub async fn dispatch(state: &AppState, request: &RouteRequest) -> ForwardOutcome {
    let identity = request.client_ip.to_string();
    if let Admission::Rejected { retry_after } = state.admission.try_consume(&identity) {
        return ForwardOutcome::QuotaExceeded { retry_after };
    }

    let target = match state.resolver.resolve(&request.service).await {
        Resolution::Found(instance) => instance,
        Resolution::NotFound | Resolution::RegistryFailure(_) => {
            return ForwardOutcome::ServiceUnresolved {
                service: request.service.clone(),
            };
        }
    };

    state.forwarder.forward(request, &target).await
}
