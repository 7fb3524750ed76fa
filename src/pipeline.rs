//! Render pipeline
//!
//! One render goes: normalize → fingerprint → cache lookup → theme and
//! background resolution → highlight → compose → acquire session →
//! rasterize → cache store.
//!
//! Concurrent misses for the same fingerprint share one render. Renders run
//! on their own task, so a client that goes away never leaves a page open.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use bytes::Bytes;
use futures::future::{BoxFuture, FutureExt, Shared};
use log::{debug, info, warn};
use serde_json::Value;

use crate::cache::{CacheKey, ResponseCache, DEFAULT_TTL};
use crate::compose::{self, ComposedDocument, ROOT_SELECTOR};
use crate::config::ServerConfig;
use crate::highlight::{Highlighter, SyntectHighlighter};
use crate::request::RenderRequest;
use crate::session::SessionManager;
use crate::theme::{resolve_background, resolve_theme};
use crate::{Error, RenderSurface, Result, TransientPage};

/// Default rendering deadline
pub const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Device scale factor of the output image
pub const OUTPUT_SCALE: f64 = 2.0;

/// Pipeline tuning
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub cache_ttl: Duration,
    /// Deadline for opening, loading and capturing one page
    pub render_timeout: Duration,
    pub output_scale: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_TTL,
            render_timeout: DEFAULT_RENDER_TIMEOUT,
            output_scale: OUTPUT_SCALE,
        }
    }
}

impl From<&ServerConfig> for PipelineConfig {
    fn from(config: &ServerConfig) -> Self {
        Self {
            cache_ttl: config.cache_ttl(),
            render_timeout: config.render_timeout(),
            output_scale: OUTPUT_SCALE,
        }
    }
}

type PendingRender = Shared<BoxFuture<'static, Result<Bytes>>>;

/// Clears a key from the in-flight table when its render task ends,
/// whether it returns or unwinds.
struct InflightEntry {
    inner: Arc<PipelineInner>,
    key: CacheKey,
}

impl Drop for InflightEntry {
    fn drop(&mut self) {
        self.inner.lock_inflight().remove(&self.key);
    }
}

struct PipelineInner {
    sessions: SessionManager,
    cache: Arc<ResponseCache>,
    highlighter: Arc<dyn Highlighter>,
    config: PipelineConfig,
    inflight: Mutex<HashMap<CacheKey, PendingRender>>,
}

/// Turns request payloads into PNG bytes
#[derive(Clone)]
pub struct RenderPipeline {
    inner: Arc<PipelineInner>,
}

impl RenderPipeline {
    /// Pipeline with the bundled syntect highlighter
    pub fn new(sessions: SessionManager, config: PipelineConfig) -> Self {
        Self::with_highlighter(sessions, config, Arc::new(SyntectHighlighter::new()))
    }

    pub fn with_highlighter(
        sessions: SessionManager,
        config: PipelineConfig,
        highlighter: Arc<dyn Highlighter>,
    ) -> Self {
        Self {
            inner: Arc::new(PipelineInner {
                sessions,
                cache: Arc::new(ResponseCache::new(config.cache_ttl)),
                highlighter,
                config,
                inflight: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.inner.cache
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.inner.sessions
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.inner.config
    }

    /// Render a raw JSON payload to PNG bytes.
    ///
    /// Invalid payloads fail before the cache or the browser is touched.
    pub async fn render(&self, payload: Value) -> Result<Bytes> {
        let request = RenderRequest::from_payload(&payload)?;
        let key = CacheKey::derive(&payload);

        if let Some(bytes) = self.inner.cache.get(&key) {
            debug!("Cache hit for {}", key);
            return Ok(bytes);
        }

        let pending = {
            let mut inflight = self.inner.lock_inflight();
            match inflight.get(&key) {
                Some(pending) => {
                    debug!("Joining in-flight render for {}", key);
                    pending.clone()
                }
                None => {
                    let pending = self.spawn_render(key.clone(), request);
                    inflight.insert(key, pending.clone());
                    pending
                }
            }
        };

        pending.await
    }

    /// Compose the document for a payload without rasterizing it
    pub fn compose(&self, payload: &Value) -> Result<ComposedDocument> {
        let request = RenderRequest::from_payload(payload)?;
        Ok(self.inner.compose(&request))
    }

    fn spawn_render(&self, key: CacheKey, request: RenderRequest) -> PendingRender {
        let entry = InflightEntry {
            inner: self.inner.clone(),
            key,
        };
        let handle = tokio::spawn(async move {
            let result = entry.inner.render_uncached(&entry.key, &request).await;
            drop(entry);
            result
        });

        async move {
            handle
                .await
                .map_err(|e| Error::RenderFailed(format!("Render task failed: {}", e)))?
        }
        .boxed()
        .shared()
    }
}

impl PipelineInner {
    fn lock_inflight(&self) -> MutexGuard<'_, HashMap<CacheKey, PendingRender>> {
        self.inflight.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn compose(&self, request: &RenderRequest) -> ComposedDocument {
        let theme = resolve_theme(&request.theme);
        let background = resolve_background(&request.background, &request.gradient_angle);
        let source = compose::prepare_source(&request.code, &request.language);
        let highlighted = self.highlighter.highlight(&source, &request.language);
        compose::compose(request, theme, &background, &source, &highlighted)
    }

    async fn render_uncached(&self, key: &CacheKey, request: &RenderRequest) -> Result<Bytes> {
        let document = self.compose(request);
        let surface = self.sessions.acquire().await?;
        let png = self.rasterize(surface.as_ref(), &document).await?;

        let bytes = Bytes::from(png);
        self.cache.insert(key.clone(), bytes.clone());
        info!(
            "Rendered {} ({} lines, {} bytes)",
            key,
            compose::line_count(&request.code),
            bytes.len()
        );
        Ok(bytes)
    }

    /// Open a fresh page, load the document and capture the root element,
    /// all under the render deadline. An opened page is closed on every
    /// path, including timeout.
    async fn rasterize(&self, surface: &dyn RenderSurface, document: &ComposedDocument) -> Result<Vec<u8>> {
        let deadline = self.config.render_timeout;
        let mut opened: Option<Box<dyn TransientPage>> = None;

        let outcome = tokio::time::timeout(deadline, async {
            let page = opened.insert(surface.open_page().await?);
            page.set_content(document.as_str()).await?;
            page.capture_element(ROOT_SELECTOR, self.config.output_scale).await
        })
        .await;

        if let Some(page) = opened {
            if let Err(e) = page.close().await {
                warn!("Failed to close page: {}", e);
            }
        }

        match outcome {
            Ok(Ok(png)) => Ok(png),
            Ok(Err(err @ Error::RenderFailed(_))) => Err(err),
            Ok(Err(other)) => Err(Error::RenderFailed(other.to_string())),
            Err(_) => {
                warn!("Render exceeded {}ms deadline", deadline.as_millis());
                Err(Error::RenderTimeout(deadline.as_millis() as u64))
            }
        }
    }
}
