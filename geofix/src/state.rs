//! Application state - single source of truth
//!
//! Components receive `&AppState` as props; only the reducer mutates it.

use geofix_core::{FetchPhase, Notice, Permission};

/// Spinner frame period, in ticks.
pub const SPINNER_TICKS: u32 = 2;

/// A notice on screen and how many ticks it has left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActiveNotice {
    pub notice: Notice,
    pub remaining_ticks: u32,
}

#[derive(Clone, Debug)]
pub struct AppState {
    /// Tracks which fetch may still write to the location fields
    pub phase: FetchPhase,

    /// "Lat: x, Lng: y" or "Location not found"; None before the first result
    pub location_text: Option<String>,

    /// Local time the current fetch started
    pub start_time: Option<String>,

    /// Local time of the last successful fix
    pub end_time: Option<String>,

    /// Permission the gate is waiting on, if the prompt is open
    pub prompt: Option<Permission>,

    pub notice: Option<ActiveNotice>,

    /// How long a notice stays up, in ticks
    pub notice_ticks: u32,

    pub tick_count: u32,

    pub terminal_size: (u16, u16),
}

impl AppState {
    pub fn new(notice_ticks: u32) -> Self {
        Self {
            phase: FetchPhase::Idle,
            location_text: None,
            start_time: None,
            end_time: None,
            prompt: None,
            notice: None,
            notice_ticks: notice_ticks.max(1),
            tick_count: 0,
            terminal_size: (80, 24),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase.is_requesting()
    }
}

impl Default for AppState {
    fn default() -> Self {
        // 2s at the default 100ms tick
        Self::new(20)
    }
}
