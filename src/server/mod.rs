//! HTTP surface
//!
//! ```text
//! POST /image   - render a snippet; 200 image/png
//! GET  /health  - liveness; 200 "OK"
//! ```

pub mod rate_limit;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use bytes::Bytes;
use log::{debug, error, info};
use serde_json::{json, Value};
use tokio::task::JoinHandle;
use tower_http::compression::CompressionLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::cache::ResponseCache;
use crate::config::ServerConfig;
use crate::pipeline::RenderPipeline;
use crate::Error;

pub use rate_limit::RateLimiter;

/// Body of every 500 response
pub const GENERATION_FAILED: &str = "Image generation failed";

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::InvalidRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            other => {
                error!("Image generation failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": GENERATION_FAILED, "message": other.to_string() })),
                )
                    .into_response()
            }
        }
    }
}

async fn render_image(State(pipeline): State<RenderPipeline>, body: Bytes) -> Response {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            debug!("Rejecting malformed body: {}", e);
            return Error::InvalidRequest("Invalid JSON body".into()).into_response();
        }
    };

    match pipeline.render(payload).await {
        Ok(png) => ([(header::CONTENT_TYPE, "image/png")], png).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn health() -> &'static str {
    "OK"
}

/// Build the application router.
///
/// Rate limiting applies to `/image` only.
pub fn router(pipeline: RenderPipeline, limiter: Arc<RateLimiter>, body_limit: usize) -> Router {
    let image = Router::new()
        .route("/image", post(render_image))
        .route_layer(middleware::from_fn_with_state(limiter, rate_limit::enforce))
        .with_state(pipeline);

    Router::new()
        .route("/health", get(health))
        .merge(image)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("cross-origin-resource-policy"),
            HeaderValue::from_static("same-origin"),
        ))
        .layer(TraceLayer::new_for_http())
}

/// Periodically drop expired cache entries and idle rate-limit buckets
pub fn spawn_housekeeping(
    cache: Arc<ResponseCache>,
    limiter: Arc<RateLimiter>,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let expired = cache.purge_expired();
            let idle = limiter.purge();
            if expired > 0 || idle > 0 {
                debug!("Housekeeping removed {} cache entries, {} idle clients", expired, idle);
            }
        }
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// The HTTP service
pub struct Server {
    config: ServerConfig,
    pipeline: RenderPipeline,
    limiter: Arc<RateLimiter>,
}

impl Server {
    pub fn new(config: ServerConfig, pipeline: RenderPipeline) -> Self {
        let limiter = Arc::new(
            RateLimiter::new(config.rate_limit_window(), config.rate_limit_max)
                .trust_proxy(config.trust_proxy),
        );
        Self {
            config,
            pipeline,
            limiter,
        }
    }

    pub fn addr(&self) -> String {
        self.config.addr()
    }

    pub fn router(&self) -> Router {
        router(
            self.pipeline.clone(),
            self.limiter.clone(),
            self.config.body_limit_bytes,
        )
    }

    /// Serve until Ctrl-C, then close the browser session.
    pub async fn run(self) -> io::Result<()> {
        let housekeeping = spawn_housekeeping(
            self.pipeline.cache().clone(),
            self.limiter.clone(),
            self.config.cache_sweep_interval(),
        );

        let listener = tokio::net::TcpListener::bind(self.addr()).await?;
        info!("Codeshot listening on {}", listener.local_addr()?);

        let served = axum::serve(
            listener,
            self.router()
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await;

        housekeeping.abort();
        self.pipeline.sessions().shutdown().await;
        served
    }
}
