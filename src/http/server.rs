//! Edge emulator server.
//!
//! # Responsibilities
//! - Create Axum Router with a single catch-all handler
//! - Wire up middleware (request ID, tracing, timeout)
//! - Run the three interceptors in lifecycle order around the origin fetch
//! - Observability (metrics, request IDs)

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::EdgeConfig;
use crate::event::{Headers, S3Origin};
use crate::fallback::{HttpIndexFetcher, IndexFetcher};
use crate::handlers::{self, origin_response::is_fallback_status, EdgeError};
use crate::http::origin::OriginClient;
use crate::http::request::{attach_origin, request_id, to_edge_request};
use crate::http::response::{function_error, into_http_response};
use crate::lifecycle::wait_for_shutdown;
use crate::observability::metrics;
use crate::routing::{region_of, X_BLUE_GREEN_CONTEXT};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub origin: OriginClient,
    pub default_origin: Arc<S3Origin>,
    pub fetcher: Arc<dyn IndexFetcher>,
}

/// HTTP server emulating the CDN edge.
pub struct EdgeServer {
    router: Router,
    config: EdgeConfig,
}

impl EdgeServer {
    /// Create a server that fetches fallback documents over HTTP.
    pub fn new(config: EdgeConfig) -> Result<Self, EdgeError> {
        let fetcher = HttpIndexFetcher::from_config(&config.fallback)?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    /// Create a server with a custom fallback document source.
    pub fn with_fetcher(config: EdgeConfig, fetcher: Arc<dyn IndexFetcher>) -> Self {
        let domain_name = config.origin.domain_name.clone();
        let default_origin = S3Origin {
            auth_method: "none".to_string(),
            custom_headers: Headers::new(),
            region: region_of(&domain_name).unwrap_or_default().to_string(),
            domain_name,
            path: String::new(),
        };

        let state = AppState {
            origin: OriginClient::new(&config.origin.endpoint, config.limits.max_body_bytes),
            default_origin: Arc::new(default_origin),
            fetcher,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &EdgeConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(edge_handler))
            .route("/", any(edge_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// The router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires or the process is signalled.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            origin = %self.config.origin.domain_name,
            endpoint = %self.config.origin.endpoint,
            "Edge server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await?;

        tracing::info!("Edge server stopped");
        Ok(())
    }

    pub fn config(&self) -> &EdgeConfig {
        &self.config
    }
}

/// Runs viewer-request, origin-request, the origin fetch and
/// origin-response for one viewer request.
async fn edge_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let (parts, _body) = request.into_parts();
    let request_id = request_id(&parts);
    let client_ip = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    let viewer = to_edge_request(&parts, client_ip);

    tracing::debug!(
        request_id = %request_id,
        method = %viewer.method,
        uri = %viewer.uri,
        "Edge request"
    );

    let request = match handlers::classify(viewer) {
        Ok(r) => r,
        Err(e) => {
            metrics::record_request("none", 503, start_time);
            return function_error("viewer-request", &request_id, &e);
        }
    };
    let context = request
        .headers
        .first_value(X_BLUE_GREEN_CONTEXT)
        .unwrap_or("none")
        .to_string();

    let request = attach_origin(request, &state.default_origin);
    let request = match handlers::rewrite(request) {
        Ok(r) => r,
        Err(e) => {
            metrics::record_request(&context, 503, start_time);
            return function_error("origin-request", &request_id, &e);
        }
    };

    let upstream = match state.origin.fetch(&request).await {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Upstream error");
            metrics::record_request(&context, 502, start_time);
            return (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response();
        }
    };
    let upstream_status = upstream.status_code().unwrap_or_default();

    let response = match handlers::fallback(&request, upstream, state.fetcher.as_ref()).await {
        Ok(r) => r,
        Err(e) => {
            metrics::record_request(&context, 503, start_time);
            return function_error("origin-response", &request_id, &e);
        }
    };
    if is_fallback_status(upstream_status) {
        metrics::record_fallback(&context);
    }

    let response = into_http_response(&response);

    tracing::debug!(
        request_id = %request_id,
        context = %context,
        upstream_status,
        status = %response.status(),
        "Edge response"
    );
    metrics::record_request(&context, response.status().as_u16(), start_time);

    response
}
