//! Core types for geofix
//!
//! Two halves live here:
//!
//! - The location kernel: [`LocationController`] runs one trigger at a time
//!   (permission, then fetch) against a [`LocationProvider`] and a
//!   [`PermissionGate`], superseding any fetch still in flight, and reports
//!   to a [`DisplaySink`].
//! - The screen plumbing: actions, an effect-aware store, components, and
//!   terminal event polling, following a Redux/Elm-style loop.
//!
//! # Basic Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use geofix_core::prelude::*;
//!
//! let provider = Arc::new(SimulatedProvider::fix(
//!     Duration::from_secs(2),
//!     LocationFix::new(37.422, -122.084),
//! ));
//! let controller = LocationController::new(provider, Arc::new(FixedGate::granted()), sink);
//!
//! if let Trigger::Started(handle) = controller.request_location().await {
//!     println!("{:?}", handle.outcome().await);
//! }
//! ```
//!
//! # Async Handler Pattern
//!
//! Screens use a two-phase action pattern:
//!
//! 1. **Intent actions** trigger async work (`LocationRequest`)
//! 2. **Result actions** carry the outcome back (`LocationDidResolve`)
//!
//! The reducer turns intents into effects, the main loop runs them, and the
//! sink feeds results back through the action channel.

pub mod action;
pub mod component;
pub mod controller;
pub mod effect;
pub mod event;
pub mod fix;
pub mod permission;
pub mod provider;
pub mod tasks;
pub mod testing;

pub use action::{Action, ActionSummary};
pub use component::Component;
pub use controller::{
    DisplaySink, FetchHandle, FetchOptions, LocationController, Notice, Trigger, DEFAULT_TIMEOUT,
};
pub use effect::{DispatchResult, EffectReducer, EffectStore};
pub use event::{process_raw_event, spawn_event_poller, EventKind, RawEvent};
pub use fix::{FetchOutcome, FetchPhase, FetchRequest, LocationFix, Priority, NOT_FOUND_TEXT};
pub use permission::{ensure_permission, FixedGate, Permission, PermissionGate};
pub use provider::{LocationProvider, ProviderError, SimulatedProvider, SimulatedResult};
pub use tasks::{TaskKey, TaskManager};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::{Action, ActionSummary};
    pub use crate::component::Component;
    pub use crate::controller::{
        DisplaySink, FetchHandle, FetchOptions, LocationController, Notice, Trigger,
    };
    pub use crate::effect::{DispatchResult, EffectStore};
    pub use crate::event::{process_raw_event, spawn_event_poller, EventKind, RawEvent};
    pub use crate::fix::{FetchOutcome, FetchPhase, FetchRequest, LocationFix, Priority};
    pub use crate::permission::{FixedGate, Permission, PermissionGate};
    pub use crate::provider::{LocationProvider, SimulatedProvider, SimulatedResult};
    pub use crate::tasks::{TaskKey, TaskManager};
}
