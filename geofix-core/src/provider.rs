//! Location provider capability and a simulated implementation

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::fix::{LocationFix, Priority};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("location request cancelled")]
    Cancelled,
    #[error("location services unavailable: {0}")]
    Unavailable(String),
    #[error("location request failed: {0}")]
    Request(String),
}

/// "Request current location with priority and cancellation token".
///
/// Implementations may suspend indefinitely. When `cancel` fires they must
/// stop and return [`ProviderError::Cancelled`] (or any value; the controller
/// discards it) instead of touching any shared state.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_location(
        &self,
        priority: Priority,
        cancel: CancellationToken,
    ) -> Result<Option<LocationFix>, ProviderError>;
}

/// What a simulated request resolves to.
#[derive(Clone, Debug, PartialEq)]
pub enum SimulatedResult {
    Fix(LocationFix),
    Nothing,
    Fail(String),
}

#[derive(Clone, Debug)]
struct SimulatedStep {
    delay: Duration,
    result: SimulatedResult,
}

/// Provider that answers after a delay with a canned result.
///
/// Extra steps queued with [`then`](Self::then) are used for successive
/// calls; once they run out the base step repeats.
#[derive(Debug)]
pub struct SimulatedProvider {
    base: SimulatedStep,
    script: Mutex<VecDeque<SimulatedStep>>,
    calls: AtomicUsize,
}

impl SimulatedProvider {
    pub fn new(delay: Duration, result: SimulatedResult) -> Self {
        Self {
            base: SimulatedStep { delay, result },
            script: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Answer with `fix` after `delay`.
    pub fn fix(delay: Duration, fix: LocationFix) -> Self {
        Self::new(delay, SimulatedResult::Fix(fix))
    }

    /// Queue a step for the next call that has no step yet.
    pub fn then(self, delay: Duration, result: SimulatedResult) -> Self {
        let mut script = self.script.into_inner();
        script.push_back(SimulatedStep { delay, result });
        Self {
            script: Mutex::new(script),
            ..self
        }
    }

    /// Number of requests received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationProvider for SimulatedProvider {
    async fn current_location(
        &self,
        priority: Priority,
        cancel: CancellationToken,
    ) -> Result<Option<LocationFix>, ProviderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self
            .script
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| self.base.clone());
        debug!(call, ?priority, delay_ms = step.delay.as_millis() as u64, "simulated request");

        tokio::select! {
            _ = cancel.cancelled() => Err(ProviderError::Cancelled),
            _ = tokio::time::sleep(step.delay) => match step.result {
                SimulatedResult::Fix(fix) => Ok(Some(fix)),
                SimulatedResult::Nothing => Ok(None),
                SimulatedResult::Fail(reason) => Err(ProviderError::Unavailable(reason)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_simulated_fix_after_delay() {
        let fix = LocationFix::new(37.422, -122.084);
        let provider = SimulatedProvider::fix(Duration::from_secs(2), fix);

        let started = tokio::time::Instant::now();
        let result = provider
            .current_location(Priority::HighAccuracy, CancellationToken::new())
            .await;

        assert_eq!(result.ok().flatten(), Some(fix));
        assert!(started.elapsed() >= Duration::from_secs(2));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_honors_cancellation() {
        let provider = SimulatedProvider::fix(Duration::from_secs(60), LocationFix::new(0.0, 0.0));
        let token = CancellationToken::new();

        let cancel = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            cancel.cancel();
        });

        let result = provider.current_location(Priority::HighAccuracy, token).await;
        assert!(matches!(result, Err(ProviderError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_script_then_base() {
        let provider = SimulatedProvider::new(Duration::ZERO, SimulatedResult::Nothing)
            .then(Duration::ZERO, SimulatedResult::Fail("gps off".into()));

        let first = provider
            .current_location(Priority::LowPower, CancellationToken::new())
            .await;
        assert!(matches!(first, Err(ProviderError::Unavailable(ref r)) if r == "gps off"));

        let second = provider
            .current_location(Priority::LowPower, CancellationToken::new())
            .await;
        assert!(matches!(second, Ok(None)));
    }
}
