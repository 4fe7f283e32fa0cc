//! Test utilities for geofix screens
//!
//! - [`key`]: Create a `KeyEvent` from a string (e.g. `key("enter")`)
//! - [`RenderHarness`]: Render into an in-memory buffer and read it back
//! - [`RecordingSink`]: A [`DisplaySink`] that remembers what it was shown
//! - [`ActionAssertions`]: Fluent checks on the actions a component emitted

use std::fmt::Debug;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::{Frame, Terminal};

use crate::controller::{DisplaySink, Notice};
use crate::fix::{FetchOutcome, FetchRequest};

/// Create a `KeyEvent` from a key string.
///
/// Accepts single characters, `ctrl+<char>`, and the names `enter`, `space`,
/// `esc`, `tab`, `up`, `down`, `left`, `right`, `f1`..`f12`.
///
/// # Panics
///
/// Panics if the key string cannot be parsed.
pub fn key(s: &str) -> KeyEvent {
    let lower = s.to_lowercase();
    let (modifiers, name) = match lower.strip_prefix("ctrl+") {
        Some(rest) => (KeyModifiers::CONTROL, rest),
        None => (KeyModifiers::NONE, lower.as_str()),
    };

    let code = match name {
        "enter" => KeyCode::Enter,
        "space" => KeyCode::Char(' '),
        "esc" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        f if f.len() > 1 && f.starts_with('f') => match f[1..].parse::<u8>() {
            Ok(n) => KeyCode::F(n),
            Err(_) => panic!("Invalid key string: {:?}", s),
        },
        c if c.chars().count() == 1 => KeyCode::Char(s.chars().last().unwrap_or(' ')),
        _ => panic!("Invalid key string: {:?}", s),
    };

    KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

/// Render components into a fixed-size in-memory terminal.
pub struct RenderHarness {
    terminal: Terminal<TestBackend>,
}

impl RenderHarness {
    /// # Panics
    ///
    /// Panics if the test backend cannot be created.
    pub fn new(width: u16, height: u16) -> Self {
        let terminal =
            Terminal::new(TestBackend::new(width, height)).expect("test backend terminal");
        Self { terminal }
    }

    /// Render one frame and return its text, one line per row, trailing
    /// spaces trimmed.
    pub fn render_to_string_plain(&mut self, render: impl FnOnce(&mut Frame)) -> String {
        self.terminal.draw(render).expect("draw to test backend");
        buffer_to_string_plain(self.terminal.backend().buffer())
    }
}

/// Flatten a buffer into plain text without styles.
pub fn buffer_to_string_plain(buffer: &Buffer) -> String {
    let width = buffer.area.width.max(1) as usize;
    buffer
        .content
        .chunks(width)
        .map(|row| {
            let line: String = row.iter().map(|cell| cell.symbol()).collect();
            line.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Everything a [`RecordingSink`] observed, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum SinkEvent {
    Started(FetchRequest),
    Shown(FetchRequest, FetchOutcome),
    Notice(Notice),
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Vec<SinkEvent>,
}

impl RecordingSink {
    pub fn events(&self) -> &[SinkEvent] {
        &self.events
    }

    /// Display text of every delivered outcome.
    pub fn shown_texts(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SinkEvent::Shown(_, outcome) => Some(outcome.to_string()),
                _ => None,
            })
            .collect()
    }
}

impl DisplaySink for RecordingSink {
    fn fetch_started(&mut self, request: FetchRequest) {
        self.events.push(SinkEvent::Started(request));
    }

    fn show(&mut self, request: FetchRequest, outcome: FetchOutcome) {
        self.events.push(SinkEvent::Shown(request, outcome));
    }

    fn notice(&mut self, notice: Notice) {
        self.events.push(SinkEvent::Notice(notice));
    }
}

/// Assertions over the actions a component returned.
pub trait ActionAssertions<A> {
    fn assert_empty(&self);
    fn assert_count(&self, n: usize);
    fn assert_first(&self, expected: A);
    fn assert_contains(&self, expected: A);
}

impl<A: PartialEq + Debug> ActionAssertions<A> for Vec<A> {
    fn assert_empty(&self) {
        assert!(self.is_empty(), "Expected no actions, got: {:?}", self);
    }

    fn assert_count(&self, n: usize) {
        assert_eq!(self.len(), n, "Expected {} actions, got: {:?}", n, self);
    }

    fn assert_first(&self, expected: A) {
        assert_eq!(
            self.first(),
            Some(&expected),
            "Expected first action {:?}, got: {:?}",
            expected,
            self
        );
    }

    fn assert_contains(&self, expected: A) {
        assert!(
            self.contains(&expected),
            "Expected {:?} among: {:?}",
            expected,
            self
        );
    }
}
