//! geofix - fetch the current location on demand
//!
//! The binary wires these modules into a terminal screen; they are exposed
//! as a library so integration tests can render components and drive the
//! reducer directly.

pub mod action;
pub mod app;
pub mod components;
pub mod config;
pub mod effect;
pub mod gate;
pub mod ip_provider;
pub mod reducer;
pub mod sink;
pub mod state;
