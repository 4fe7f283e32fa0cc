//! Side effects declared by the reducer
//!
//! The reducer stays pure; the main loop turns these into controller calls.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run one trigger: permission check, then a fetch that supersedes any
    /// fetch in flight
    RequestLocation,
    /// Resolve the pending permission prompt
    AnswerPermission(bool),
}
