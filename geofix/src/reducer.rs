//! Reducer - (state, action) -> (changed, effects)
//!
//! All state mutations happen here. Async work is only ever requested
//! through an [`Effect`].

use geofix_core::DispatchResult;

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{ActiveNotice, AppState};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Location =====
        Action::LocationRequest => DispatchResult::effect(Effect::RequestLocation),

        Action::LocationDidStart { request, at } => {
            state.phase.start(request);
            state.start_time = Some(at);
            DispatchResult::changed()
        }

        Action::LocationDidResolve {
            request,
            outcome,
            at,
        } => {
            // Only the in-flight request may write the location fields
            if !state.phase.deliver(request) {
                return DispatchResult::unchanged();
            }
            state.location_text = Some(outcome.to_string());
            if outcome.is_found() {
                state.end_time = Some(at);
            }
            DispatchResult::changed()
        }

        // ===== Permission =====
        Action::PermissionPromptOpen(permission) => {
            state.prompt = Some(permission);
            DispatchResult::changed()
        }

        Action::PermissionAnswer(granted) => match state.prompt.take() {
            Some(_) => DispatchResult::changed_with(Effect::AnswerPermission(granted)),
            None => DispatchResult::unchanged(),
        },

        // ===== Notice =====
        Action::NoticeShow(notice) => {
            state.notice = Some(ActiveNotice {
                notice,
                remaining_ticks: state.notice_ticks,
            });
            DispatchResult::changed()
        }

        // ===== UI =====
        Action::UiTerminalResize(width, height) => {
            if state.terminal_size != (width, height) {
                state.terminal_size = (width, height);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        // ===== Global =====
        Action::Tick => {
            state.tick_count = state.tick_count.wrapping_add(1);
            let mut changed = state.is_loading();
            if let Some(active) = state.notice.as_mut() {
                active.remaining_ticks = active.remaining_ticks.saturating_sub(1);
                if active.remaining_ticks == 0 {
                    state.notice = None;
                    changed = true;
                }
            }
            if changed {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        // Quit is handled in the main loop
        Action::Quit => DispatchResult::unchanged(),
    }
}
