//! Effect-based state management
//!
//! Reducers stay pure: they mutate state and describe side effects as data.
//! The main loop executes the effects (spawning fetches, answering prompts).
//!
//! ```ignore
//! fn reducer(state: &mut ScreenState, action: ScreenAction) -> DispatchResult<Effect> {
//!     match action {
//!         ScreenAction::LocationRequest => DispatchResult::effect(Effect::RequestLocation),
//!         ScreenAction::LocationDidResolve(outcome) => {
//!             state.text = outcome.to_string();
//!             DispatchResult::changed()
//!         }
//!     }
//! }
//!
//! let mut store = EffectStore::new(ScreenState::default(), reducer);
//! for effect in store.dispatch(ScreenAction::LocationRequest).effects {
//!     handle_effect(effect);
//! }
//! ```

use std::marker::PhantomData;

use tracing::debug;

use crate::action::{Action, ActionSummary};

/// Result of dispatching an action to an [`EffectStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult<E> {
    /// Whether the state was modified by this action.
    pub changed: bool,
    /// Effects to be processed after dispatch.
    pub effects: Vec<E>,
}

impl<E> Default for DispatchResult<E> {
    fn default() -> Self {
        Self::unchanged()
    }
}

impl<E> DispatchResult<E> {
    /// No state change and no effects.
    #[inline]
    pub fn unchanged() -> Self {
        Self {
            changed: false,
            effects: vec![],
        }
    }

    /// State changed, no effects.
    #[inline]
    pub fn changed() -> Self {
        Self {
            changed: true,
            effects: vec![],
        }
    }

    /// A single effect without a state change.
    #[inline]
    pub fn effect(effect: E) -> Self {
        Self {
            changed: false,
            effects: vec![effect],
        }
    }

    /// State changed with a single effect.
    #[inline]
    pub fn changed_with(effect: E) -> Self {
        Self {
            changed: true,
            effects: vec![effect],
        }
    }

    /// Add an effect to this result.
    #[inline]
    pub fn with(mut self, effect: E) -> Self {
        self.effects.push(effect);
        self
    }

    #[inline]
    pub fn has_effects(&self) -> bool {
        !self.effects.is_empty()
    }
}

/// A reducer function that can emit effects.
pub type EffectReducer<S, A, E> = fn(&mut S, A) -> DispatchResult<E>;

/// State container whose reducer returns [`DispatchResult<E>`].
///
/// Every dispatched action is logged at debug level using its
/// [`ActionSummary`].
pub struct EffectStore<S, A, E> {
    state: S,
    reducer: EffectReducer<S, A, E>,
    _marker: PhantomData<(A, E)>,
}

impl<S, A, E> EffectStore<S, A, E>
where
    A: ActionSummary,
{
    pub fn new(state: S, reducer: EffectReducer<S, A, E>) -> Self {
        Self {
            state,
            reducer,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Mutable access for initialization. Prefer dispatching actions.
    #[inline]
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    pub fn dispatch(&mut self, action: A) -> DispatchResult<E> {
        let name = action.name();
        debug!(action = name, summary = %action.summary(), "dispatch");
        let result = (self.reducer)(&mut self.state, action);
        debug!(
            action = name,
            changed = result.changed,
            effects = result.effects.len(),
            "reduced"
        );
        result
    }
}
