//! Codeshot
//!
//! Renders syntax-highlighted code snippets into styled PNG images ("code
//! screenshots") sized for social-media sharing, and serves them over HTTP.
//!
//! # Features
//!
//! - **CDP Backend** (default): rasterizes through headless Chrome via the
//!   Chrome DevTools Protocol
//! - **Adapter seams**: the browser sits behind [`BrowserLauncher`],
//!   [`RenderSurface`] and [`TransientPage`] so the pipeline can be driven by
//!   any backend (or a fake in tests)
//! - **Shared session**: one lazily launched browser per process, reused
//!   across requests and relaunched after a disconnect
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "cdp")]
//! # async fn demo() -> Result<(), codeshot::Error> {
//! use std::sync::Arc;
//! use codeshot::{cdp::CdpLauncher, LaunchProfile, PipelineConfig, RenderPipeline, SessionManager};
//!
//! let sessions = SessionManager::new(Arc::new(CdpLauncher::new()), LaunchProfile::detect(None));
//! let pipeline = RenderPipeline::new(sessions, PipelineConfig::default());
//! let png = pipeline
//!     .render(serde_json::json!({ "code": "const x = 1;", "theme": "dracula" }))
//!     .await?;
//! std::fs::write("snippet.png", &png).ok();
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use async_trait::async_trait;

pub mod error;
pub use error::{Error, Result};

pub mod cache;
pub mod compose;
pub mod config;
pub mod highlight;
pub mod languages;
pub mod pipeline;
pub mod request;
pub mod server;
pub mod session;
pub mod theme;

// Headless Chrome backend
#[cfg(feature = "cdp")]
pub mod cdp;

pub use cache::{CacheKey, ResponseCache};
pub use compose::ComposedDocument;
pub use config::{ExecutionProfile, ServerConfig};
pub use pipeline::{PipelineConfig, RenderPipeline};
pub use request::RenderRequest;
pub use session::{DisconnectNotifier, LaunchProfile, SessionManager, SessionStatus};
pub use theme::ThemeSpec;

/// Viewport dimensions of the rendering surface
///
/// The default is the recommended LinkedIn share image size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 630,
        }
    }
}

/// Starts a controllable browser process.
///
/// Implementations must either return a fully usable surface or an error;
/// a surface that is still initializing must never escape.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    /// Launch a browser configured for `profile`.
    ///
    /// `on_disconnect` must be fired once if the underlying process goes away
    /// after a successful launch.
    async fn launch(
        &self,
        profile: &LaunchProfile,
        on_disconnect: DisconnectNotifier,
    ) -> Result<Arc<dyn RenderSurface>>;
}

/// A live browser process that can open pages
#[async_trait]
pub trait RenderSurface: Send + Sync {
    /// Open a new page owned exclusively by the caller
    async fn open_page(&self) -> Result<Box<dyn TransientPage>>;

    /// Cheap liveness check; `false` once the process is known to be gone
    fn is_connected(&self) -> bool;

    /// Terminate the browser process
    async fn close(&self) -> Result<()>;
}

/// A short-lived, request-scoped page
#[async_trait]
pub trait TransientPage: Send + Sync {
    /// Replace the page content and wait until it has finished loading
    async fn set_content(&self, html: &str) -> Result<()>;

    /// Rasterize the bounding box of the first element matching `selector`
    /// as PNG at the given device scale factor
    async fn capture_element(&self, selector: &str, scale: f64) -> Result<Vec<u8>>;

    /// Close the page. Safe to call while another call on the page is stalled.
    async fn close(&self) -> Result<()>;
}
