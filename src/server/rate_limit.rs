//! Per-client sliding-window rate limiting

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{ConnectInfo, State};
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dashmap::DashMap;
use log::warn;
use serde_json::json;
use tokio::time::Instant;

/// Bucket shared by every client whose address cannot be determined
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Sliding-window request counter keyed by client
pub struct RateLimiter {
    window: Duration,
    max: usize,
    trust_proxy: bool,
    hits: DashMap<String, VecDeque<Instant>>,
}

impl RateLimiter {
    /// Limiter keyed by the connecting peer address
    pub fn new(window: Duration, max: usize) -> Self {
        Self {
            window,
            max,
            trust_proxy: false,
            hits: DashMap::new(),
        }
    }

    /// Key clients by the first `X-Forwarded-For` entry when present.
    /// Only safe behind a proxy that overwrites the header.
    pub fn trust_proxy(mut self, trust: bool) -> Self {
        self.trust_proxy = trust;
        self
    }

    pub fn client_key<B>(&self, req: &Request<B>) -> String {
        client_key(req, self.trust_proxy)
    }

    /// Record a request from `client`; `false` when it is over the limit.
    /// Rejected requests are not counted.
    pub fn check(&self, client: &str) -> bool {
        let now = Instant::now();
        let mut hits = self.hits.entry(client.to_string()).or_default();
        while hits.front().is_some_and(|t| now.duration_since(*t) >= self.window) {
            hits.pop_front();
        }
        if hits.len() >= self.max {
            return false;
        }
        hits.push_back(now);
        true
    }

    /// Forget clients with no request inside the window; returns how many
    pub fn purge(&self) -> usize {
        let now = Instant::now();
        let before = self.hits.len();
        self.hits.retain(|_, hits| {
            hits.back()
                .is_some_and(|t| now.duration_since(*t) < self.window)
        });
        before.saturating_sub(self.hits.len())
    }

    pub fn tracked_clients(&self) -> usize {
        self.hits.len()
    }
}

/// Peer address, or [`UNKNOWN_CLIENT`] when the connection info is missing.
/// With `trust_proxy`, the first `X-Forwarded-For` entry wins over the peer.
pub fn client_key<B>(req: &Request<B>, trust_proxy: bool) -> String {
    if trust_proxy {
        let forwarded = req
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

pub async fn enforce(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let client = limiter.client_key(&req);
    if !limiter.check(&client) {
        warn!("Rate limit exceeded for {}", client);
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": "Too many requests" })),
        )
            .into_response();
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[tokio::test(start_paused = true)]
    async fn window_slides() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 2);
        assert!(limiter.check("a"));
        assert!(limiter.check("a"));
        assert!(!limiter.check("a"));
        assert!(limiter.check("b"));

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(limiter.check("a"));
    }

    #[tokio::test(start_paused = true)]
    async fn purge_drops_idle_clients() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 5);
        limiter.check("old");
        tokio::time::advance(Duration::from_secs(30)).await;
        limiter.check("recent");
        tokio::time::advance(Duration::from_secs(31)).await;

        assert_eq!(limiter.purge(), 1);
        assert_eq!(limiter.tracked_clients(), 1);
    }

    fn from_peer(forwarded: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder();
        if let Some(value) = forwarded {
            builder = builder.header("x-forwarded-for", value);
        }
        let mut req = builder.body(Body::empty()).unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([198, 51, 100, 2], 4000))));
        req
    }

    #[test]
    fn forwarded_for_is_ignored_by_default() {
        let req = from_peer(Some("203.0.113.7, 10.0.0.1"));
        assert_eq!(client_key(&req, false), "198.51.100.2");
    }

    #[test]
    fn trusted_proxy_uses_first_forwarded_entry() {
        let req = from_peer(Some("203.0.113.7, 10.0.0.1"));
        assert_eq!(client_key(&req, true), "203.0.113.7");

        let req = from_peer(Some("  "));
        assert_eq!(client_key(&req, true), "198.51.100.2");

        let limiter = RateLimiter::new(Duration::from_secs(60), 1).trust_proxy(true);
        assert_eq!(limiter.client_key(&from_peer(Some("203.0.113.7"))), "203.0.113.7");
    }

    #[test]
    fn missing_peer_is_unknown() {
        let req = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_key(&req, false), UNKNOWN_CLIENT);
        assert_eq!(client_key(&req, true), UNKNOWN_CLIENT);
    }
}
