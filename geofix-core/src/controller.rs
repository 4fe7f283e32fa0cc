//! Location fetch controller
//!
//! One trigger = ensure permission, then fetch one fix, superseding any
//! fetch already in flight. The controller owns the only "current fetch"
//! handle; it is swapped under a lock on every trigger, and the previous
//! fetch is told to stop through its [`CancellationToken`] before the new
//! one is created.
//!
//! Delivery goes through the same lock and is accepted only if the fetch is
//! still the current one, so a superseded fetch that resolves late can never
//! overwrite a newer result on the [`DisplaySink`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::error::Elapsed;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::fix::{FetchOutcome, FetchPhase, FetchRequest, LocationFix, Priority};
use crate::permission::{ensure_permission, Permission, PermissionGate};
use crate::provider::{LocationProvider, ProviderError};

/// Upper bound on waiting for a fix.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Transient messages shown outside the location fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    PermissionDenied,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::PermissionDenied => f.write_str("Location permission denied"),
        }
    }
}

/// Consumer of fetch results.
pub trait DisplaySink: Send + 'static {
    /// A fetch was started and is now the current one.
    #[allow(unused_variables)]
    fn fetch_started(&mut self, request: FetchRequest) {}

    /// The current fetch resolved. Never called for superseded fetches.
    fn show(&mut self, request: FetchRequest, outcome: FetchOutcome);

    fn notice(&mut self, notice: Notice);
}

#[derive(Clone, Debug)]
pub struct FetchOptions {
    pub permission: Permission,
    pub priority: Priority,
    pub timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            permission: Permission::FineLocation,
            priority: Priority::HighAccuracy,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Result of a full trigger (permission + fetch).
#[derive(Debug)]
pub enum Trigger {
    Started(FetchHandle),
    Denied,
}

/// Handle to one started fetch.
#[derive(Debug)]
pub struct FetchHandle {
    request: FetchRequest,
    join: JoinHandle<Option<FetchOutcome>>,
}

impl FetchHandle {
    pub fn request(&self) -> FetchRequest {
        self.request
    }

    /// Wait for the fetch to finish.
    ///
    /// `None` means the fetch was superseded or cancelled and delivered
    /// nothing.
    pub async fn outcome(self) -> Option<FetchOutcome> {
        self.join.await.ok().flatten()
    }
}

struct Slot<S> {
    phase: FetchPhase,
    last: FetchRequest,
    token: Option<CancellationToken>,
    sink: S,
}

pub struct LocationController<S> {
    provider: Arc<dyn LocationProvider>,
    gate: Arc<dyn PermissionGate>,
    options: FetchOptions,
    slot: Arc<Mutex<Slot<S>>>,
}

impl<S: DisplaySink> LocationController<S> {
    pub fn new(
        provider: Arc<dyn LocationProvider>,
        gate: Arc<dyn PermissionGate>,
        sink: S,
    ) -> Self {
        Self {
            provider,
            gate,
            options: FetchOptions::default(),
            slot: Arc::new(Mutex::new(Slot {
                phase: FetchPhase::Idle,
                last: FetchRequest::from_raw(0),
                token: None,
                sink,
            })),
        }
    }

    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    pub async fn ensure_permission(&self) -> bool {
        ensure_permission(self.gate.as_ref(), self.options.permission).await
    }

    /// Handle a trigger: initial load or button press.
    ///
    /// On denial the sink gets one [`Notice::PermissionDenied`] and the
    /// in-flight fetch, if any, is left alone.
    pub async fn request_location(&self) -> Trigger {
        if !self.ensure_permission().await {
            info!(permission = %self.options.permission, "permission denied");
            self.slot.lock().await.sink.notice(Notice::PermissionDenied);
            return Trigger::Denied;
        }
        Trigger::Started(self.fetch_current().await)
    }

    /// Start a new fetch, superseding the current one.
    pub async fn fetch_current(&self) -> FetchHandle {
        let (request, token) = {
            let mut slot = self.slot.lock().await;
            if let Some(previous) = slot.token.take() {
                previous.cancel();
            }
            let request = slot.last.next();
            slot.last = request;
            if let Some(superseded) = slot.phase.start(request) {
                debug!(%superseded, by = %request, "fetch superseded");
            }
            let token = CancellationToken::new();
            slot.token = Some(token.clone());
            slot.sink.fetch_started(request);
            (request, token)
        };

        info!(
            %request,
            priority = ?self.options.priority,
            timeout_ms = self.options.timeout.as_millis() as u64,
            "fetch started"
        );
        let join = tokio::spawn(run_fetch(
            self.provider.clone(),
            self.options.clone(),
            self.slot.clone(),
            request,
            token,
        ));
        FetchHandle { request, join }
    }

    /// Abandon the in-flight fetch without starting another.
    pub async fn cancel(&self) {
        let mut slot = self.slot.lock().await;
        if let Some(token) = slot.token.take() {
            token.cancel();
        }
        if let Some(request) = slot.phase.cancel() {
            debug!(%request, "fetch cancelled");
        }
    }

    pub async fn phase(&self) -> FetchPhase {
        self.slot.lock().await.phase
    }

    /// Inspect the sink, e.g. to read what a recording sink captured.
    pub async fn with_sink<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.slot.lock().await.sink)
    }
}

async fn run_fetch<S: DisplaySink>(
    provider: Arc<dyn LocationProvider>,
    options: FetchOptions,
    slot: Arc<Mutex<Slot<S>>>,
    request: FetchRequest,
    token: CancellationToken,
) -> Option<FetchOutcome> {
    let lookup = provider.current_location(options.priority, token.child_token());
    let outcome = tokio::select! {
        _ = token.cancelled() => {
            debug!(%request, "fetch abandoned");
            return None;
        }
        result = tokio::time::timeout(options.timeout, lookup) => normalize(request, result),
    };

    let mut slot = slot.lock().await;
    if !slot.phase.deliver(request) {
        debug!(%request, "dropping result of stale fetch");
        return None;
    }
    slot.token = None;
    info!(%request, found = outcome.is_found(), "fetch delivered");
    slot.sink.show(request, outcome);
    Some(outcome)
}

fn normalize(
    request: FetchRequest,
    result: Result<Result<Option<LocationFix>, ProviderError>, Elapsed>,
) -> FetchOutcome {
    match result {
        Ok(Ok(Some(fix))) => FetchOutcome::Found(fix),
        Ok(Ok(None)) => {
            debug!(%request, "provider returned no fix");
            FetchOutcome::NotFound
        }
        Ok(Err(e)) => {
            warn!(%request, error = %e, "provider failed");
            FetchOutcome::NotFound
        }
        Err(_) => {
            warn!(%request, "timed out waiting for a fix");
            FetchOutcome::NotFound
        }
    }
}
