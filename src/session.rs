//! Browser session manager
//!
//! Owns the single long-lived browser handle for the process. The session is
//! a small state machine:
//!
//! ```text
//! Unset --acquire--> Launching --ok--> Ready --disconnect--> Unset
//!                        |
//!                        +--err--> Failed (sticky until restart)
//! ```
//!
//! Concurrent callers that arrive while a launch is in flight await the same
//! shared launch future, so at most one browser process is ever started at a
//! time.

use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use futures::future::{BoxFuture, FutureExt, Shared};
use log::{error, info, warn};

use crate::config::ExecutionProfile;
use crate::{BrowserLauncher, Error, RenderSurface, Result, Viewport};

/// Everything a launcher needs to start a browser, fixed at startup
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchProfile {
    pub execution: ExecutionProfile,
    /// Explicit browser executable; `None` lets the backend pick one
    pub executable: Option<PathBuf>,
    pub viewport: Viewport,
}

impl LaunchProfile {
    pub fn new(execution: ExecutionProfile, executable: Option<PathBuf>) -> Self {
        Self {
            execution,
            executable,
            viewport: Viewport::default(),
        }
    }

    /// Profile for the current process environment
    pub fn detect(executable: Option<PathBuf>) -> Self {
        Self::new(ExecutionProfile::detect(), executable)
    }
}

/// Observable session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Unset,
    Launching,
    Ready,
    Failed,
}

type LaunchFuture = Shared<BoxFuture<'static, Result<Arc<dyn RenderSurface>>>>;

enum SessionState {
    Unset,
    Launching {
        generation: u64,
        pending: LaunchFuture,
    },
    Ready {
        generation: u64,
        surface: Arc<dyn RenderSurface>,
    },
    Failed(Error),
}

struct SessionInner {
    launcher: Arc<dyn BrowserLauncher>,
    profile: LaunchProfile,
    state: Mutex<SessionState>,
    launches: AtomicU64,
}

impl SessionInner {
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn finish_launch(&self, generation: u64, outcome: &Result<Arc<dyn RenderSurface>>) {
        let mut state = self.lock();
        let current = matches!(&*state, SessionState::Launching { generation: g, .. } if *g == generation);
        if !current {
            return;
        }
        let next = match outcome {
            Ok(surface) => {
                info!("Browser session {} ready", generation);
                SessionState::Ready {
                    generation,
                    surface: surface.clone(),
                }
            }
            Err(err) => {
                error!("Browser session {} failed to launch: {}", generation, err);
                SessionState::Failed(err.clone())
            }
        };
        let previous = std::mem::replace(&mut *state, next);
        drop(state);
        drop(previous);
    }

    fn on_disconnect(&self, generation: u64) {
        let mut state = self.lock();
        if matches!(&*state, SessionState::Ready { generation: g, .. } if *g == generation) {
            warn!("Browser session {} disconnected; next request relaunches", generation);
            let previous = std::mem::replace(&mut *state, SessionState::Unset);
            drop(state);
            drop(previous);
        }
    }
}

/// Handle given to a launcher so it can report that its process went away.
///
/// Notifications from an older session generation are ignored.
#[derive(Clone)]
pub struct DisconnectNotifier {
    session: Weak<SessionInner>,
    generation: u64,
}

impl DisconnectNotifier {
    /// A notifier not attached to any session; `notify` is a no-op.
    pub fn detached() -> Self {
        Self {
            session: Weak::new(),
            generation: 0,
        }
    }

    /// Launch number of the session this notifier belongs to; 0 when detached
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Report that the browser behind this notifier is gone.
    pub fn notify(&self) {
        if let Some(session) = self.session.upgrade() {
            session.on_disconnect(self.generation);
        }
    }
}

impl fmt::Debug for DisconnectNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisconnectNotifier")
            .field("generation", &self.generation)
            .field("attached", &(self.session.strong_count() > 0))
            .finish()
    }
}

/// Lazily launches, shares and recovers the process-wide browser session
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionInner>,
}

impl SessionManager {
    pub fn new(launcher: Arc<dyn BrowserLauncher>, profile: LaunchProfile) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                launcher,
                profile,
                state: Mutex::new(SessionState::Unset),
                launches: AtomicU64::new(0),
            }),
        }
    }

    pub fn profile(&self) -> &LaunchProfile {
        &self.inner.profile
    }

    pub fn status(&self) -> SessionStatus {
        match &*self.inner.lock() {
            SessionState::Unset => SessionStatus::Unset,
            SessionState::Launching { .. } => SessionStatus::Launching,
            SessionState::Ready { .. } => SessionStatus::Ready,
            SessionState::Failed(_) => SessionStatus::Failed,
        }
    }

    /// Number of launches started since the manager was created
    pub fn launch_count(&self) -> u64 {
        self.inner.launches.load(Ordering::SeqCst)
    }

    /// Return the ready session, launching it first if needed.
    ///
    /// Fails with [`Error::SessionLaunchFailed`] if this or any earlier launch
    /// failed; a failed launch is never retried by the manager.
    pub async fn acquire(&self) -> Result<Arc<dyn RenderSurface>> {
        let pending = {
            let mut state = self.inner.lock();
            match &*state {
                SessionState::Ready {
                    surface,
                    generation,
                } => {
                    if surface.is_connected() {
                        return Ok(surface.clone());
                    }
                    warn!("Browser session {} is no longer connected; relaunching", generation);
                    self.start_launch(&mut state)
                }
                SessionState::Failed(err) => return Err(err.clone()),
                SessionState::Launching { pending, .. } => pending.clone(),
                SessionState::Unset => self.start_launch(&mut state),
            }
        };
        pending.await
    }

    fn start_launch(&self, state: &mut SessionState) -> LaunchFuture {
        let generation = self.inner.launches.fetch_add(1, Ordering::SeqCst) + 1;
        let inner = self.inner.clone();
        let notifier = DisconnectNotifier {
            session: Arc::downgrade(&self.inner),
            generation,
        };

        let pending = async move {
            info!(
                "Launching browser session {} ({} profile)",
                generation,
                inner.profile.execution.as_str()
            );
            let outcome = inner
                .launcher
                .launch(&inner.profile, notifier)
                .await
                .map_err(|err| match err {
                    Error::SessionLaunchFailed(_) => err,
                    other => Error::SessionLaunchFailed(other.to_string()),
                });
            inner.finish_launch(generation, &outcome);
            outcome
        }
        .boxed()
        .shared();

        *state = SessionState::Launching {
            generation,
            pending: pending.clone(),
        };
        pending
    }

    /// Close the live browser, if any. Best-effort; used on process shutdown.
    pub async fn shutdown(&self) {
        let surface = {
            let mut state = self.inner.lock();
            match std::mem::replace(&mut *state, SessionState::Unset) {
                SessionState::Ready { surface, .. } => Some(surface),
                other => {
                    *state = other;
                    None
                }
            }
        };
        if let Some(surface) = surface {
            info!("Closing browser session");
            if let Err(e) = surface.close().await {
                warn!("Failed to close browser session: {}", e);
            }
        }
    }
}
