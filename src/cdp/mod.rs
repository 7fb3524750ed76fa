//! Chrome DevTools Protocol backend (uses the `headless_chrome` crate)
//!
//! [`CdpLauncher`] starts headless Chrome on a dedicated worker thread and
//! exposes it through the crate's [`BrowserLauncher`] / [`RenderSurface`] /
//! [`TransientPage`] seams. `headless_chrome` is synchronous, so every page
//! operation runs on the blocking pool.

mod worker;

use std::ffi::OsStr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use headless_chrome::browser::tab::Tab;
use headless_chrome::protocol::cdp::Page;
use headless_chrome::{Browser, LaunchOptions};
use log::debug;

use crate::config::ExecutionProfile;
use crate::{
    BrowserLauncher, DisconnectNotifier, Error, LaunchProfile, RenderSurface, Result,
    TransientPage, Viewport,
};

use worker::WorkerHandle;

/// Flags for constrained serverless hosts
pub const SERVERLESS_ARGS: &[&str] = &[
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--no-first-run",
    "--no-zygote",
    "--single-process",
    "--disable-extensions",
];

/// Flags for local and ordinary server hosts
pub const LOCAL_ARGS: &[&str] = &[
    "--disable-dev-shm-usage",
    "--disable-accelerated-2d-canvas",
    "--no-first-run",
    "--disable-gpu",
];

/// The worker heartbeat keeps the connection busy well inside this.
const IDLE_BROWSER_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// One way of starting the browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub executable: Option<PathBuf>,
    pub args: Vec<&'static str>,
    pub sandbox: bool,
}

impl LaunchPlan {
    fn describe(&self) -> String {
        match &self.executable {
            Some(path) => path.display().to_string(),
            None => "auto-detected executable".to_string(),
        }
    }

    fn options(&self, viewport: Viewport) -> Result<LaunchOptions<'static>> {
        LaunchOptions::default_builder()
            .headless(true)
            .sandbox(self.sandbox)
            .window_size(Some((viewport.width, viewport.height)))
            .path(self.executable.clone())
            .args(self.args.iter().map(|arg| OsStr::new(*arg)).collect())
            .idle_browser_timeout(IDLE_BROWSER_TIMEOUT)
            .build()
            .map_err(|e| Error::SessionLaunchFailed(format!("Failed to build launch options: {}", e)))
    }

    fn launch(&self, viewport: Viewport) -> Result<Browser> {
        let options = self.options(viewport)?;
        Browser::new(options)
            .map_err(|e| Error::SessionLaunchFailed(format!("Failed to launch browser: {}", e)))
    }
}

/// Ordered launch attempts for `profile`.
///
/// Serverless hosts get a single reduced-privilege attempt. Local hosts try
/// the configured (or auto-detected) executable first and then, if given,
/// the `fallback` binary with the sandbox disabled.
pub fn launch_plans(profile: &LaunchProfile, fallback: Option<PathBuf>) -> Vec<LaunchPlan> {
    match profile.execution {
        ExecutionProfile::Serverless => vec![LaunchPlan {
            executable: profile.executable.clone(),
            args: SERVERLESS_ARGS.to_vec(),
            sandbox: false,
        }],
        ExecutionProfile::Local => {
            let mut plans = vec![LaunchPlan {
                executable: profile.executable.clone(),
                args: LOCAL_ARGS.to_vec(),
                sandbox: true,
            }];
            if let Some(path) = fallback {
                let mut args = vec!["--no-sandbox", "--disable-setuid-sandbox"];
                args.extend_from_slice(LOCAL_ARGS);
                plans.push(LaunchPlan {
                    executable: Some(path),
                    args,
                    sandbox: false,
                });
            }
            plans
        }
    }
}

/// First existing Chrome/Chromium binary from the well-known install paths
pub fn find_chrome() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    let paths: &[&str] = &[
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
    ];

    #[cfg(target_os = "windows")]
    let paths: &[&str] = &[
        r"C:\Program Files\Google\Chrome\Application\chrome.exe",
        r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
    ];

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let paths: &[&str] = &[
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/snap/bin/chromium",
    ];

    paths.iter().map(|p| PathBuf::from(*p)).find(|p| p.exists())
}

/// Launches headless Chrome
#[derive(Debug, Default, Clone)]
pub struct CdpLauncher;

impl CdpLauncher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BrowserLauncher for CdpLauncher {
    async fn launch(
        &self,
        profile: &LaunchProfile,
        on_disconnect: DisconnectNotifier,
    ) -> Result<Arc<dyn RenderSurface>> {
        let fallback = match profile.execution {
            ExecutionProfile::Local => find_chrome().filter(|p| Some(p) != profile.executable.as_ref()),
            ExecutionProfile::Serverless => None,
        };
        let plans = launch_plans(profile, fallback);
        let worker = WorkerHandle::start(plans, profile.viewport, on_disconnect).await?;
        Ok(Arc::new(CdpSurface { worker }))
    }
}

/// A running headless Chrome
pub struct CdpSurface {
    worker: WorkerHandle,
}

#[async_trait]
impl RenderSurface for CdpSurface {
    async fn open_page(&self) -> Result<Box<dyn TransientPage>> {
        let tab = self.worker.new_page().await?;
        Ok(Box::new(CdpPage { tab }))
    }

    fn is_connected(&self) -> bool {
        self.worker.is_connected()
    }

    async fn close(&self) -> Result<()> {
        self.worker.close().await
    }
}

/// One browser tab
pub struct CdpPage {
    tab: Arc<Tab>,
}

impl CdpPage {
    async fn blocking<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Tab) -> Result<T> + Send + 'static,
    {
        let tab = self.tab.clone();
        tokio::task::spawn_blocking(move || op(&tab))
            .await
            .map_err(|e| Error::RenderFailed(format!("Page task failed: {}", e)))?
    }
}

#[async_trait]
impl TransientPage for CdpPage {
    async fn set_content(&self, html: &str) -> Result<()> {
        let html = html.to_string();
        self.blocking(move |tab| {
            tab.navigate_to("about:blank")
                .and_then(|tab| tab.wait_until_navigated())
                .map_err(|e| Error::RenderFailed(format!("Navigation failed: {}", e)))?;

            let frame_id = tab
                .call_method(Page::GetFrameTree(None))
                .map_err(|e| Error::RenderFailed(format!("Failed to read frame tree: {}", e)))?
                .frame_tree
                .frame
                .id;

            tab.call_method(Page::SetDocumentContent { frame_id, html })
                .map_err(|e| Error::RenderFailed(format!("Failed to set content: {}", e)))?;
            Ok(())
        })
        .await
    }

    async fn capture_element(&self, selector: &str, scale: f64) -> Result<Vec<u8>> {
        let selector = selector.to_string();
        self.blocking(move |tab| {
            let element = tab
                .wait_for_element(&selector)
                .map_err(|e| Error::RenderFailed(format!("Element '{}' not found: {}", selector, e)))?;
            let mut clip = element
                .get_box_model()
                .map_err(|e| Error::RenderFailed(format!("Failed to measure '{}': {}", selector, e)))?
                .border_viewport();
            clip.scale = scale;
            debug!("Capturing {} at {}x{} scale {}", selector, clip.width, clip.height, scale);

            tab.capture_screenshot(Page::CaptureScreenshotFormatOption::Png, None, Some(clip), true)
                .map_err(|e| Error::RenderFailed(format!("Screenshot failed: {}", e)))
        })
        .await
    }

    async fn close(&self) -> Result<()> {
        self.blocking(|tab| {
            tab.close(true)
                .map(|_| ())
                .map_err(|e| Error::RenderFailed(format!("Failed to close page: {}", e)))
        })
        .await
    }
}
