//! In-process browser fakes for driving the pipeline without Chrome
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use codeshot::config::ExecutionProfile;
use codeshot::highlight::Highlighter;
use codeshot::{
    BrowserLauncher, DisconnectNotifier, Error, LaunchProfile, PipelineConfig, RenderPipeline,
    RenderSurface, Result, SessionManager, TransientPage,
};

pub const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake-image";

/// Shared counters and switches behind every fake object
#[derive(Default)]
pub struct FakeState {
    pub launches: AtomicUsize,
    pub pages_opened: AtomicUsize,
    pub pages_closed: AtomicUsize,
    pub captures: AtomicUsize,

    pub fail_launch: AtomicBool,
    pub fail_capture: AtomicBool,
    pub stall_open: AtomicBool,
    pub stall_capture: AtomicBool,
    pub capture_delay: Mutex<Option<Duration>>,

    pub last_html: Mutex<Option<String>>,
    pub last_capture: Mutex<Option<(String, f64)>>,
    notifiers: Mutex<Vec<DisconnectNotifier>>,
}

impl FakeState {
    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn pages_opened(&self) -> usize {
        self.pages_opened.load(Ordering::SeqCst)
    }

    pub fn pages_closed(&self) -> usize {
        self.pages_closed.load(Ordering::SeqCst)
    }

    pub fn set(&self, switch: &AtomicBool, on: bool) {
        switch.store(on, Ordering::SeqCst);
    }

    pub fn set_capture_delay(&self, delay: Duration) {
        *self.capture_delay.lock().unwrap() = Some(delay);
    }

    /// Simulate the most recently launched browser going away
    pub fn disconnect(&self) {
        let notifier = self.notifiers.lock().unwrap().last().cloned();
        if let Some(notifier) = notifier {
            notifier.notify();
        }
    }
}

#[derive(Clone, Default)]
pub struct FakeLauncher {
    pub state: Arc<FakeState>,
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(
        &self,
        _profile: &LaunchProfile,
        on_disconnect: DisconnectNotifier,
    ) -> Result<Arc<dyn RenderSurface>> {
        self.state.launches.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_launch.load(Ordering::SeqCst) {
            return Err(Error::SessionLaunchFailed("fake browser refused to start".into()));
        }
        self.state.notifiers.lock().unwrap().push(on_disconnect);
        Ok(Arc::new(FakeSurface {
            state: self.state.clone(),
        }))
    }
}

pub struct FakeSurface {
    state: Arc<FakeState>,
}

#[async_trait]
impl RenderSurface for FakeSurface {
    async fn open_page(&self) -> Result<Box<dyn TransientPage>> {
        if self.state.stall_open.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        self.state.pages_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakePage {
            state: self.state.clone(),
        }))
    }

    fn is_connected(&self) -> bool {
        true
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

pub struct FakePage {
    state: Arc<FakeState>,
}

#[async_trait]
impl TransientPage for FakePage {
    async fn set_content(&self, html: &str) -> Result<()> {
        *self.state.last_html.lock().unwrap() = Some(html.to_string());
        Ok(())
    }

    async fn capture_element(&self, selector: &str, scale: f64) -> Result<Vec<u8>> {
        *self.state.last_capture.lock().unwrap() = Some((selector.to_string(), scale));

        if self.state.stall_capture.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        let delay = *self.state.capture_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.state.fail_capture.load(Ordering::SeqCst) {
            return Err(Error::RenderFailed("fake capture failed".into()));
        }

        self.state.captures.fetch_add(1, Ordering::SeqCst);
        Ok(FAKE_PNG.to_vec())
    }

    async fn close(&self) -> Result<()> {
        self.state.pages_closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn fake_sessions() -> (SessionManager, Arc<FakeState>) {
    let launcher = FakeLauncher::default();
    let state = launcher.state.clone();
    let sessions = SessionManager::new(
        Arc::new(launcher),
        LaunchProfile::new(ExecutionProfile::Local, None),
    );
    (sessions, state)
}

/// Pipeline over a fresh fake browser
pub fn fake_pipeline(config: PipelineConfig) -> (RenderPipeline, Arc<FakeState>) {
    let (sessions, state) = fake_sessions();
    (RenderPipeline::new(sessions, config), state)
}

pub fn fake_pipeline_with_highlighter(
    config: PipelineConfig,
    highlighter: Arc<dyn Highlighter>,
) -> (RenderPipeline, Arc<FakeState>) {
    let (sessions, state) = fake_sessions();
    (RenderPipeline::with_highlighter(sessions, config, highlighter), state)
}

/// Escapes text as-is but panics on its first call
#[derive(Default)]
pub struct PanicOnceHighlighter {
    fired: AtomicBool,
}

impl Highlighter for PanicOnceHighlighter {
    fn highlight(&self, code: &str, _language: &str) -> String {
        if !self.fired.swap(true, Ordering::SeqCst) {
            panic!("highlighter blew up");
        }
        code.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
    }
}
