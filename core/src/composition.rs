//! Reducer composition utilities
//!
//! - **`scope_reducer`**: Embed a child feature (state, actions, environment)
//!   inside a parent feature
//!
//! # Examples
//!
//! ## Scoping a child feature
//!
//! ```ignore
//! use larder_core::composition::scope_reducer;
//!
//! // The parent owns one tracker; its actions wrap the tracker's actions.
//! let tracker = scope_reducer(
//!     RequestReducer::new(TrackerConfig::default()),
//!     |state: &mut AppState| &mut state.request,
//!     |action: AppAction| match action {
//!         AppAction::Request(inner) => Some(inner),
//!         _ => None,
//!     },
//!     AppAction::Request,
//!     |env: &AppEnvironment| &env.request,
//! );
//! ```

use crate::SmallVec;
use crate::effect::Effect;
use crate::reducer::Reducer;

/// Scopes a child reducer into a parent feature.
///
/// - `state` focuses the parent state on the child's state
/// - `extract` picks the child's actions out of the parent's action type;
///   parent actions it rejects are ignored
/// - `embed` wraps child actions produced by effects back into the parent type
/// - `environment` focuses the parent environment on the child's dependencies
///
/// # Type Parameters
///
/// - `S`, `A`, `E`: The parent state, action and environment types
/// - `R`: The child reducer
pub fn scope_reducer<S, A, E, R>(
    reducer: R,
    state: fn(&mut S) -> &mut R::State,
    extract: fn(A) -> Option<R::Action>,
    embed: fn(R::Action) -> A,
    environment: fn(&E) -> &R::Environment,
) -> ScopedReducer<S, A, E, R>
where
    R: Reducer,
{
    ScopedReducer {
        reducer,
        state,
        extract,
        embed,
        environment,
    }
}

/// A scoped reducer that runs a child reducer inside a parent feature.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, A, E, R>
where
    R: Reducer,
{
    reducer: R,
    state: fn(&mut S) -> &mut R::State,
    extract: fn(A) -> Option<R::Action>,
    embed: fn(R::Action) -> A,
    environment: fn(&E) -> &R::Environment,
}

impl<S, A, E, R> ScopedReducer<S, A, E, R>
where
    R: Reducer,
{
    /// The wrapped child reducer
    #[must_use]
    pub const fn inner(&self) -> &R {
        &self.reducer
    }
}

impl<S, A, E, R> Clone for ScopedReducer<S, A, E, R>
where
    R: Reducer + Clone,
{
    fn clone(&self) -> Self {
        Self {
            reducer: self.reducer.clone(),
            state: self.state,
            extract: self.extract,
            embed: self.embed,
            environment: self.environment,
        }
    }
}

impl<S, A, E, R> Reducer for ScopedReducer<S, A, E, R>
where
    R: Reducer,
    R::Action: Send + 'static,
    A: Send + 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let Some(child_action) = (self.extract)(action) else {
            return SmallVec::new();
        };

        let child_state = (self.state)(state);
        let child_env = (self.environment)(env);

        self.reducer
            .reduce(child_state, child_action, child_env)
            .into_iter()
            .map(|effect| effect.map(self.embed))
            .collect()
    }
}
