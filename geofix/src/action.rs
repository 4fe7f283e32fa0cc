//! Screen actions
//!
//! Naming convention: the prefix is the category (`Location*`, `Permission*`,
//! `Notice*`, `Ui*`), and `Did` marks the result of async work.

use geofix_core::{
    Action as ActionTrait, ActionSummary, FetchOutcome, FetchRequest, Notice, Permission,
};

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    // ===== Location =====
    /// Intent: initial load or button press
    LocationRequest,

    /// Result: the controller started `request` and it is now current
    LocationDidStart { request: FetchRequest, at: String },

    /// Result: `request` resolved
    LocationDidResolve {
        request: FetchRequest,
        outcome: FetchOutcome,
        at: String,
    },

    // ===== Permission =====
    /// The gate is waiting for the user to answer
    PermissionPromptOpen(Permission),

    /// The user answered the prompt
    PermissionAnswer(bool),

    // ===== Notice =====
    NoticeShow(Notice),

    // ===== UI =====
    UiTerminalResize(u16, u16),

    // ===== Global =====
    /// Periodic tick for the spinner and notice expiry
    Tick,

    Quit,
}

impl ActionTrait for Action {
    fn name(&self) -> &'static str {
        match self {
            Action::LocationRequest => "LocationRequest",
            Action::LocationDidStart { .. } => "LocationDidStart",
            Action::LocationDidResolve { .. } => "LocationDidResolve",
            Action::PermissionPromptOpen(_) => "PermissionPromptOpen",
            Action::PermissionAnswer(_) => "PermissionAnswer",
            Action::NoticeShow(_) => "NoticeShow",
            Action::UiTerminalResize(..) => "UiTerminalResize",
            Action::Tick => "Tick",
            Action::Quit => "Quit",
        }
    }
}

impl ActionSummary for Action {
    fn summary(&self) -> String {
        match self {
            Action::LocationDidResolve {
                request, outcome, ..
            } => format!("LocationDidResolve {{ {}: {} }}", request, outcome),
            Action::LocationDidStart { request, .. } => format!("LocationDidStart({})", request),
            _ => format!("{:?}", self),
        }
    }
}
