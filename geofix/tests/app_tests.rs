//! Event loop tests: input routing and teardown

use std::io;

use geofix::action::Action;
use geofix::app::{LocationUi, run_app};
use geofix::config::{Config, PermissionMode};
use geofix::state::AppState;
use geofix_core::testing::key;
use geofix_core::{EventKind, Permission};
use ratatui::Terminal;
use ratatui::backend::{Backend, ClearType, TestBackend, WindowSize};
use ratatui::buffer::Cell;
use ratatui::layout::{Position, Size};
use tokio_util::sync::CancellationToken;

/// A terminal whose output can no longer be flushed.
struct BrokenBackend(TestBackend);

impl Backend for BrokenBackend {
    fn draw<'a, I>(&mut self, content: I) -> io::Result<()>
    where
        I: Iterator<Item = (u16, u16, &'a Cell)>,
    {
        self.0.draw(content)
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        self.0.hide_cursor()
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        self.0.show_cursor()
    }

    fn get_cursor_position(&mut self) -> io::Result<Position> {
        self.0.get_cursor_position()
    }

    fn set_cursor_position<P: Into<Position>>(&mut self, position: P) -> io::Result<()> {
        self.0.set_cursor_position(position)
    }

    fn clear(&mut self) -> io::Result<()> {
        self.0.clear()
    }

    fn clear_region(&mut self, clear_type: ClearType) -> io::Result<()> {
        self.0.clear_region(clear_type)
    }

    fn size(&self) -> io::Result<Size> {
        self.0.size()
    }

    fn window_size(&mut self) -> io::Result<WindowSize> {
        self.0.window_size()
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "terminal gone"))
    }
}

#[tokio::test]
async fn test_draw_failure_still_shuts_down() {
    let mut terminal = Terminal::new(BrokenBackend(TestBackend::new(60, 16))).expect("terminal");
    let mut config = Config::default();
    config.permission.mode = PermissionMode::Granted;
    let shutdown = CancellationToken::new();

    let result = run_app(&mut terminal, &config, shutdown.clone()).await;

    assert_eq!(
        result.map_err(|e| e.kind()),
        Err(io::ErrorKind::BrokenPipe)
    );
    assert!(shutdown.is_cancelled(), "input poller must be told to stop");
}

#[test]
fn test_ctrl_c_quits_even_with_prompt_open() {
    let mut ui = LocationUi::new();
    let state = AppState {
        prompt: Some(Permission::FineLocation),
        ..Default::default()
    };

    let actions = ui.map_event(&EventKind::Key(key("ctrl+c")), &state);
    assert_eq!(actions, vec![Action::Quit]);
}

#[test]
fn test_open_prompt_takes_keys_from_screen() {
    let mut ui = LocationUi::new();
    let state = AppState {
        prompt: Some(Permission::FineLocation),
        ..Default::default()
    };

    assert!(ui.map_event(&EventKind::Key(key("g")), &state).is_empty());
    assert_eq!(
        ui.map_event(&EventKind::Key(key("y")), &state),
        vec![Action::PermissionAnswer(true)]
    );
}

#[test]
fn test_resize_is_forwarded() {
    let mut ui = LocationUi::new();
    let state = AppState::default();

    assert_eq!(
        ui.map_event(&EventKind::Resize(100, 30), &state),
        vec![Action::UiTerminalResize(100, 30)]
    );
}
