//! The screen's event loop
//!
//! FRAMEWORK PATTERN: effect loop
//! - Terminal events -> components -> actions
//! - Actions -> reducer -> state change + effects
//! - Effects spawn keyed tasks that drive the LocationController
//! - The controller reports back through ChannelSink as actions

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyModifiers};
use geofix_core::{
    EffectStore, EventKind, FixedGate, LocationController, PermissionGate, RawEvent, TaskManager,
    Trigger, process_raw_event, spawn_event_poller,
};
use ratatui::{Frame, Terminal, backend::Backend, layout::Rect};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::action::Action;
use crate::components::{
    Component, LocationScreen, LocationScreenProps, PermissionPrompt, PermissionPromptProps,
};
use crate::config::{Config, PermissionMode};
use crate::effect::Effect;
use crate::gate::PromptGate;
use crate::reducer::reducer;
use crate::sink::ChannelSink;
use crate::state::AppState;

const POLL_TIMEOUT: Duration = Duration::from_millis(10);
const LOOP_SLEEP: Duration = Duration::from_millis(16);

pub struct LocationUi {
    screen: LocationScreen,
    prompt: PermissionPrompt,
}

impl Default for LocationUi {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationUi {
    pub fn new() -> Self {
        Self {
            screen: LocationScreen,
            prompt: PermissionPrompt,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let props = LocationScreenProps {
            state,
            is_focused: state.prompt.is_none(),
        };
        self.screen.render(frame, area, props);

        if let Some(permission) = state.prompt {
            let props = PermissionPromptProps {
                permission,
                is_focused: true,
            };
            self.prompt.render(frame, area, props);
        }
    }

    pub fn map_event(&mut self, event: &EventKind, state: &AppState) -> Vec<Action> {
        match event {
            EventKind::Resize(width, height) => {
                return vec![Action::UiTerminalResize(*width, *height)];
            }
            EventKind::Key(key)
                if key.code == KeyCode::Char('c')
                    && key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                return vec![Action::Quit];
            }
            _ => {}
        }

        if let Some(permission) = state.prompt {
            let props = PermissionPromptProps {
                permission,
                is_focused: true,
            };
            return self.prompt.handle_event(event, props);
        }

        let props = LocationScreenProps {
            state,
            is_focused: true,
        };
        self.screen.handle_event(event, props)
    }
}

struct EffectContext {
    tasks: TaskManager,
    controller: Arc<LocationController<ChannelSink>>,
    prompt_gate: Option<Arc<PromptGate>>,
}

/// Run the screen until the user quits or drawing fails.
///
/// `shutdown` stops the input poller. It is cancelled on every exit path,
/// together with the in-flight fetch and any open prompt.
pub async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    config: &Config,
    shutdown: CancellationToken,
) -> io::Result<()> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    let prompt_gate = match config.permission.mode {
        PermissionMode::Denied => None,
        mode => Some(Arc::new(PromptGate::new(
            action_tx.clone(),
            mode == PermissionMode::Granted,
        ))),
    };
    let gate: Arc<dyn PermissionGate> = match &prompt_gate {
        Some(gate) => gate.clone(),
        None => Arc::new(FixedGate::answering(false)),
    };

    let controller = LocationController::new(
        config.location_provider(),
        gate,
        ChannelSink::new(action_tx.clone()),
    )
    .with_options(config.fetch_options());

    let mut ctx = EffectContext {
        tasks: TaskManager::new(),
        controller: Arc::new(controller),
        prompt_gate,
    };
    let mut store = EffectStore::new(AppState::new(config.notice_ticks()), reducer);
    let mut ui = LocationUi::new();

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<RawEvent>();
    let _poller = spawn_event_poller(event_tx, POLL_TIMEOUT, LOOP_SLEEP, shutdown.clone());

    let mut ticks = tokio::time::interval(config.tick());

    // Request once on load
    let _ = action_tx.send(Action::LocationRequest);

    let result: io::Result<()> = async {
        let mut should_render = true;
        loop {
            if should_render {
                let state = store.state();
                terminal.draw(|frame| ui.render(frame, frame.area(), state))?;
                should_render = false;
            }

            tokio::select! {
                Some(raw_event) = event_rx.recv() => {
                    let Some(event) = process_raw_event(raw_event) else {
                        continue;
                    };
                    for action in ui.map_event(&event, store.state()) {
                        let _ = action_tx.send(action);
                    }
                }

                Some(action) = action_rx.recv() => {
                    if matches!(action, Action::Quit) {
                        break;
                    }
                    let result = store.dispatch(action);
                    for effect in result.effects {
                        handle_effect(effect, &mut ctx);
                    }
                    should_render |= result.changed;
                }

                _ = ticks.tick() => {
                    should_render |= store.dispatch(Action::Tick).changed;
                }
            }
        }
        Ok(())
    }
    .await;

    // Leaving the screen abandons the fetch and any open prompt
    shutdown.cancel();
    ctx.tasks.cancel_all();
    ctx.controller.cancel().await;
    match &result {
        Ok(()) => info!("screen closed"),
        Err(e) => warn!(error = %e, "screen closed on draw failure"),
    }

    result
}

fn handle_effect(effect: Effect, ctx: &mut EffectContext) {
    match effect {
        Effect::RequestLocation => {
            let controller = ctx.controller.clone();
            ctx.tasks.spawn("location", move |token| async move {
                tokio::select! {
                    _ = token.cancelled() => {}
                    trigger = controller.request_location() => {
                        if let Trigger::Started(handle) = trigger {
                            info!(request = %handle.request(), "location requested");
                        }
                    }
                }
            });
        }
        Effect::AnswerPermission(granted) => match &ctx.prompt_gate {
            Some(gate) => {
                let gate = gate.clone();
                tokio::spawn(async move { gate.answer(granted).await });
            }
            None => warn!(granted, "answer with no prompt gate"),
        },
    }
}
