//! Display sinks: where controller output goes

use chrono::Local;
use geofix_core::{DisplaySink, FetchOutcome, FetchRequest, Notice};
use tokio::sync::mpsc;
use tracing::debug;

use crate::action::Action;

/// Local wall-clock time as `HH:MM:SS.mmm`.
pub fn timestamp() -> String {
    Local::now().format("%H:%M:%S%.3f").to_string()
}

/// Feeds controller output back into the screen's action loop.
#[derive(Clone, Debug)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Action>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<Action>) -> Self {
        Self { tx }
    }

    fn send(&self, action: Action) {
        // Receiver dropped means the screen is gone
        if self.tx.send(action).is_err() {
            debug!("action channel closed, dropping sink output");
        }
    }
}

impl DisplaySink for ChannelSink {
    fn fetch_started(&mut self, request: FetchRequest) {
        self.send(Action::LocationDidStart {
            request,
            at: timestamp(),
        });
    }

    fn show(&mut self, request: FetchRequest, outcome: FetchOutcome) {
        self.send(Action::LocationDidResolve {
            request,
            outcome,
            at: timestamp(),
        });
    }

    fn notice(&mut self, notice: Notice) {
        self.send(Action::NoticeShow(notice));
    }
}

/// Prints controller output as lines, for `--once`.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl DisplaySink for StdoutSink {
    fn fetch_started(&mut self, _request: FetchRequest) {
        println!("timeStart: {}", timestamp());
    }

    fn show(&mut self, _request: FetchRequest, outcome: FetchOutcome) {
        println!("{}", outcome);
        if outcome.is_found() {
            println!("endTime: {}", timestamp());
        }
    }

    fn notice(&mut self, notice: Notice) {
        eprintln!("{}", notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geofix_core::LocationFix;

    #[test]
    fn test_timestamp_shape() {
        let ts = timestamp();
        assert_eq!(ts.len(), "12:34:56.789".len());
        assert_eq!(ts.as_bytes()[2], b':');
        assert_eq!(ts.as_bytes()[8], b'.');
    }

    #[test]
    fn test_channel_sink_forwards_actions() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut sink = ChannelSink::new(tx);
        let request = FetchRequest::from_raw(3);
        let outcome = FetchOutcome::Found(LocationFix::new(37.422, -122.084));

        sink.fetch_started(request);
        sink.show(request, outcome);
        sink.notice(Notice::PermissionDenied);

        assert!(matches!(
            rx.try_recv(),
            Ok(Action::LocationDidStart { request: r, .. }) if r == request
        ));
        assert!(matches!(
            rx.try_recv(),
            Ok(Action::LocationDidResolve { outcome: o, .. }) if o == outcome
        ));
        assert_eq!(
            rx.try_recv().ok(),
            Some(Action::NoticeShow(Notice::PermissionDenied))
        );
    }

    #[test]
    fn test_channel_sink_tolerates_closed_channel() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let mut sink = ChannelSink::new(tx);
        sink.show(FetchRequest::from_raw(1), FetchOutcome::NotFound);
    }
}
