//! Terminal input: polling crossterm and normalizing events

use std::time::Duration;

use crossterm::event::{self, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Raw event from crossterm before processing
#[derive(Debug)]
pub enum RawEvent {
    Key(KeyEvent),
    Resize(u16, u16),
}

/// The event payload components receive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Keyboard event (presses and repeats only)
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
}

/// Spawn the event polling task with cancellation support
///
/// Polls crossterm in batches and forwards key and resize events through
/// `tx`. The task stops when `cancel_token` is cancelled or the receiver is
/// dropped.
pub fn spawn_event_poller(
    tx: mpsc::UnboundedSender<RawEvent>,
    poll_timeout: Duration,
    loop_sleep: Duration,
    cancel_token: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticks = tokio::time::interval(loop_sleep);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel_token.cancelled() => {
                    // Leave nothing buffered for the shell we hand back to
                    while event::poll(Duration::ZERO).unwrap_or(false) {
                        let _ = event::read();
                    }
                    info!("event poller stopped");
                    return;
                }
                _ = ticks.tick() => {
                    for raw in read_batch(poll_timeout) {
                        if tx.send(raw).is_err() {
                            debug!("event channel closed, stopping poller");
                            return;
                        }
                    }
                }
            }
        }
    })
}

/// Drain up to `MAX_BATCH` pending terminal events.
fn read_batch(poll_timeout: Duration) -> Vec<RawEvent> {
    const MAX_BATCH: usize = 20;

    let mut batch = Vec::new();
    while batch.len() < MAX_BATCH && event::poll(poll_timeout).unwrap_or(false) {
        match event::read() {
            Ok(event::Event::Key(key)) => batch.push(RawEvent::Key(key)),
            Ok(event::Event::Resize(w, h)) => batch.push(RawEvent::Resize(w, h)),
            Ok(_) => {}
            Err(e) => {
                debug!(error = %e, "failed to read terminal event");
                break;
            }
        }
    }
    batch
}

/// Process a raw event into an `EventKind`
///
/// Key releases are dropped; some platforms report both edges and a button
/// press must trigger exactly one fetch.
pub fn process_raw_event(raw: RawEvent) -> Option<EventKind> {
    match raw {
        RawEvent::Key(key) if key.kind == KeyEventKind::Release => None,
        RawEvent::Key(key) => Some(EventKind::Key(key)),
        RawEvent::Resize(w, h) => Some(EventKind::Resize(w, h)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    fn key_with_kind(kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code: KeyCode::Char('g'),
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::empty(),
        }
    }

    #[test]
    fn test_process_raw_event_key_press() {
        let kind = process_raw_event(RawEvent::Key(key_with_kind(KeyEventKind::Press)));
        assert!(matches!(kind, Some(EventKind::Key(k)) if k.code == KeyCode::Char('g')));
    }

    #[test]
    fn test_process_raw_event_drops_release() {
        let kind = process_raw_event(RawEvent::Key(key_with_kind(KeyEventKind::Release)));
        assert!(kind.is_none());
    }

    #[test]
    fn test_process_raw_event_resize() {
        let kind = process_raw_event(RawEvent::Resize(80, 24));
        assert_eq!(kind, Some(EventKind::Resize(80, 24)));
    }
}
