//! Location values and the per-request fetch state machine

use std::fmt;

use serde::{Deserialize, Serialize};

/// Text shown when a fetch produced no fix.
pub const NOT_FOUND_TEXT: &str = "Location not found";

/// A resolved latitude/longitude pair, in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationFix {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for LocationFix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lat: {:?}, Lng: {:?}", self.latitude, self.longitude)
    }
}

/// The only two outcomes a fetch can surface.
///
/// A null fix, a timeout and a provider error all collapse into `NotFound`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FetchOutcome {
    Found(LocationFix),
    NotFound,
}

impl FetchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, FetchOutcome::Found(_))
    }
}

impl From<Option<LocationFix>> for FetchOutcome {
    fn from(fix: Option<LocationFix>) -> Self {
        fix.map_or(FetchOutcome::NotFound, FetchOutcome::Found)
    }
}

impl fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchOutcome::Found(fix) => write!(f, "{}", fix),
            FetchOutcome::NotFound => f.write_str(NOT_FOUND_TEXT),
        }
    }
}

/// Accuracy/power trade-off requested from the provider.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    #[default]
    HighAccuracy,
    BalancedPowerAccuracy,
    LowPower,
    Passive,
}

/// Opaque handle for one fetch. Ids are strictly increasing per controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FetchRequest(u64);

impl FetchRequest {
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for FetchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// `Idle -> Requesting -> Delivered`, with superseded requests dropped
/// silently.
///
/// Only the request currently in `Requesting` may be delivered. Starting a new
/// request from any state supersedes the one in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FetchPhase {
    #[default]
    Idle,
    Requesting(FetchRequest),
    Delivered(FetchRequest),
}

impl FetchPhase {
    /// Move to `Requesting(request)`. Returns the request this superseded.
    pub fn start(&mut self, request: FetchRequest) -> Option<FetchRequest> {
        let superseded = match *self {
            FetchPhase::Requesting(previous) => Some(previous),
            _ => None,
        };
        *self = FetchPhase::Requesting(request);
        superseded
    }

    /// Accept the result of `request` if it is the one in flight.
    ///
    /// Returns `false` for superseded or already delivered requests; their
    /// results must be discarded.
    pub fn deliver(&mut self, request: FetchRequest) -> bool {
        match *self {
            FetchPhase::Requesting(current) if current == request => {
                *self = FetchPhase::Delivered(request);
                true
            }
            _ => false,
        }
    }

    /// Abandon the in-flight request without starting another.
    pub fn cancel(&mut self) -> Option<FetchRequest> {
        match *self {
            FetchPhase::Requesting(previous) => {
                *self = FetchPhase::Idle;
                Some(previous)
            }
            _ => None,
        }
    }

    pub fn is_requesting(&self) -> bool {
        matches!(self, FetchPhase::Requesting(_))
    }
}
