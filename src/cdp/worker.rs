//! Browser-owning worker thread
//!
//! The worker owns the `headless_chrome::Browser` for its whole life. Async
//! callers talk to it through a command channel and receive replies on
//! oneshot channels. Between commands the worker pings the browser; when a
//! ping fails the session is reported as disconnected and the worker exits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use headless_chrome::browser::tab::Tab;
use headless_chrome::Browser;
use log::{debug, info, warn};
use tokio::sync::oneshot;

use super::LaunchPlan;
use crate::{DisconnectNotifier, Error, Result, Viewport};

/// How long the worker waits for a command before pinging the browser
pub(crate) const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);

pub(crate) enum Command {
    NewPage(oneshot::Sender<Result<Arc<Tab>>>),
    Close(oneshot::Sender<Result<()>>),
}

/// Handle to a running worker
pub(crate) struct WorkerHandle {
    cmd_tx: Sender<Command>,
    connected: Arc<AtomicBool>,
}

impl WorkerHandle {
    /// Launch the browser on a fresh worker thread, trying each plan in
    /// order, and wait until it is usable.
    pub(crate) async fn start(
        plans: Vec<LaunchPlan>,
        viewport: Viewport,
        on_disconnect: DisconnectNotifier,
    ) -> Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (init_tx, init_rx) = oneshot::channel::<Result<()>>();
        let connected = Arc::new(AtomicBool::new(false));
        let flag = connected.clone();

        thread::Builder::new()
            .name(format!("codeshot-browser-{}", on_disconnect.generation()))
            .spawn(move || {
                let browser = match launch_first(&plans, viewport) {
                    Ok(browser) => browser,
                    Err(err) => {
                        let _ = init_tx.send(Err(err));
                        return;
                    }
                };

                flag.store(true, Ordering::SeqCst);
                let _ = init_tx.send(Ok(()));

                run(browser, cmd_rx, &flag, on_disconnect);
            })
            .map_err(|e| Error::SessionLaunchFailed(format!("Failed to spawn browser worker: {}", e)))?;

        init_rx
            .await
            .map_err(|e| Error::SessionLaunchFailed(format!("Browser worker exited during launch: {}", e)))??;

        Ok(Self { cmd_tx, connected })
    }

    pub(crate) fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub(crate) async fn new_page(&self) -> Result<Arc<Tab>> {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::NewPage(resp_tx))
            .map_err(|_| Error::RenderFailed("Browser worker is gone".into()))?;
        resp_rx
            .await
            .map_err(|_| Error::RenderFailed("Browser worker dropped the page request".into()))?
    }

    pub(crate) async fn close(&self) -> Result<()> {
        let (resp_tx, resp_rx) = oneshot::channel();
        if self.cmd_tx.send(Command::Close(resp_tx)).is_err() {
            // Worker already exited; nothing left to close.
            return Ok(());
        }
        resp_rx.await.unwrap_or(Ok(()))
    }
}

fn launch_first(plans: &[LaunchPlan], viewport: Viewport) -> Result<Browser> {
    let mut last = Error::SessionLaunchFailed("no launch plan available".into());
    for (attempt, plan) in plans.iter().enumerate() {
        match plan.launch(viewport) {
            Ok(browser) => {
                info!("Browser started (attempt {}, {})", attempt + 1, plan.describe());
                return Ok(browser);
            }
            Err(err) => {
                warn!("Browser launch attempt {} failed ({}): {}", attempt + 1, plan.describe(), err);
                last = err;
            }
        }
    }
    Err(last)
}

fn run(
    browser: Browser,
    cmd_rx: mpsc::Receiver<Command>,
    connected: &AtomicBool,
    on_disconnect: DisconnectNotifier,
) {
    loop {
        match cmd_rx.recv_timeout(HEARTBEAT_INTERVAL) {
            Ok(Command::NewPage(resp)) => {
                let res = browser
                    .new_tab()
                    .map_err(|e| Error::RenderFailed(format!("Failed to open page: {}", e)));
                let failed = res.is_err();
                let _ = resp.send(res);
                if failed && !alive(&browser) {
                    break;
                }
            }
            Ok(Command::Close(resp)) => {
                connected.store(false, Ordering::SeqCst);
                drop(browser);
                let _ = resp.send(Ok(()));
                return;
            }
            Err(RecvTimeoutError::Timeout) => {
                if !alive(&browser) {
                    break;
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                // Every handle is gone; shut the browser down with us.
                connected.store(false, Ordering::SeqCst);
                return;
            }
        }
    }

    connected.store(false, Ordering::SeqCst);
    warn!("Browser session {} stopped responding", on_disconnect.generation());
    on_disconnect.notify();
}

fn alive(browser: &Browser) -> bool {
    match browser.get_version() {
        Ok(version) => {
            debug!("Browser heartbeat ok ({})", version.product);
            true
        }
        Err(e) => {
            warn!("Browser heartbeat failed: {}", e);
            false
        }
    }
}
