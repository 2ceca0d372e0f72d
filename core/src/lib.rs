//! # Larder Core
//!
//! Core traits and types for the Larder architecture.
//!
//! This crate provides the fundamental abstractions for building small,
//! request-driven applications with the Reducer pattern: state changes happen
//! in pure reducers, and all I/O is described as [`Effect`] values that a
//! runtime executes.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature
//! - **Action**: All possible inputs to a reducer (user intents and completions)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits
//!
//! ## Building Blocks
//!
//! - [`http`]: Transport-neutral HTTP request descriptions
//! - [`request`]: The request-lifecycle tracker, a reusable reducer that
//!   follows one logical network operation from `send` to success or failure
//! - [`composition`]: Combining and scoping reducers
//!
//! ## Example
//!
//! ```ignore
//! use larder_core::*;
//!
//! #[derive(Clone, Debug)]
//! enum PantryAction {
//!     Refresh,
//!     Loaded { items: Vec<String> },
//! }
//!
//! impl Reducer for PantryReducer {
//!     type State = PantryState;
//!     type Action = PantryAction;
//!     type Environment = PantryEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut PantryState,
//!         action: PantryAction,
//!         env: &PantryEnvironment,
//!     ) -> SmallVec<[Effect<PantryAction>; 4]> {
//!         // Business logic goes here
//!         SmallVec::new()
//!     }
//! }
//! ```

// Re-export commonly used types
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

pub use effect::{Effect, EffectId};
pub use reducer::Reducer;

/// Reducer composition utilities
pub mod composition;

/// HTTP request descriptions and transport errors
pub mod http;

/// Request-lifecycle tracker
pub mod request;

/// Declarative macros for building effects
mod effect_macros;

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::{SmallVec, effect::Effect};

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for PantryReducer {
    ///     type State = PantryState;
    ///     type Action = PantryAction;
    ///     type Environment = PantryEnvironment;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut PantryState,
    ///         action: PantryAction,
    ///         env: &PantryEnvironment,
    ///     ) -> SmallVec<[Effect<PantryAction>; 4]> {
    ///         match action {
    ///             PantryAction::Refresh => smallvec![Effect::None],
    ///             PantryAction::Loaded { items } => {
    ///                 state.items = items;
    ///                 SmallVec::new()
    ///             }
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Updates state in place
        /// 2. Returns effect descriptions to be executed
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Returns
        ///
        /// Effects to be executed by the runtime
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and are composable and cancellable.
pub mod effect {
    use futures::FutureExt;
    use std::borrow::Cow;
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Identifier grouping in-flight effects so they can be cancelled together
    ///
    /// Used with [`Effect::Cancellable`] and [`Effect::Cancel`].
    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    pub struct EffectId(Cow<'static, str>);

    impl EffectId {
        /// Create an id from a static name
        #[must_use]
        pub const fn new(name: &'static str) -> Self {
            Self(Cow::Borrowed(name))
        }

        /// The id as a string slice
        #[must_use]
        pub fn as_str(&self) -> &str {
            &self.0
        }
    }

    impl From<String> for EffectId {
        fn from(name: String) -> Self {
            Self(Cow::Owned(name))
        }
    }

    impl From<&'static str> for EffectId {
        fn from(name: &'static str) -> Self {
            Self::new(name)
        }
    }

    impl std::fmt::Display for EffectId {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Delayed action (debounce timers, timeouts)
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),

        /// Run `effect` under `id`, aborting whatever is still in flight under the same id
        Cancellable {
            /// Cancellation group
            id: EffectId,
            /// The effect to run
            effect: Box<Effect<Action>>,
        },

        /// Abort every in-flight effect registered under `id`
        Cancel {
            /// Cancellation group
            id: EffectId,
        },
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
                Effect::Cancellable { id, effect } => f
                    .debug_struct("Effect::Cancellable")
                    .field("id", id)
                    .field("effect", effect)
                    .finish(),
                Effect::Cancel { id } => f.debug_struct("Effect::Cancel").field("id", id).finish(),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Make this effect cancellable under `id`
        #[must_use]
        pub fn cancellable(self, id: impl Into<EffectId>) -> Effect<Action> {
            Effect::Cancellable {
                id: id.into(),
                effect: Box::new(self),
            }
        }

        /// Transform the actions this effect produces
        ///
        /// Used to lift a child reducer's effects into its parent's action type.
        #[must_use]
        pub fn map<B>(self, f: fn(Action) -> B) -> Effect<B>
        where
            Action: Send + 'static,
            B: Send + 'static,
        {
            match self {
                Effect::None => Effect::None,
                Effect::Parallel(effects) => {
                    Effect::Parallel(effects.into_iter().map(|e| e.map(f)).collect())
                },
                Effect::Sequential(effects) => {
                    Effect::Sequential(effects.into_iter().map(|e| e.map(f)).collect())
                },
                Effect::Delay { duration, action } => Effect::Delay {
                    duration,
                    action: Box::new(f(*action)),
                },
                Effect::Future(fut) => Effect::Future(Box::pin(fut.map(move |a| a.map(f)))),
                Effect::Cancellable { id, effect } => Effect::Cancellable {
                    id,
                    effect: Box::new(effect.map(f)),
                },
                Effect::Cancel { id } => Effect::Cancel { id },
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use crate::http::{HttpError, HttpRequest};
    use std::future::Future;
    use std::pin::Pin;

    /// `HttpClient` trait - executes described requests against a JSON API
    ///
    /// Implementations send `request.body` (if any) as JSON with
    /// `Content-Type: application/json` and decode the response body as JSON.
    /// A non-2xx status is an error.
    ///
    /// # Dyn Compatibility
    ///
    /// This trait uses explicit `Pin<Box<dyn Future>>` returns instead of `async fn`
    /// so that reducers can capture an `Arc<dyn HttpClient>` inside effects.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Production - talks to the network
    /// let http: Arc<dyn HttpClient> = Arc::new(DocStoreClient::new());
    ///
    /// // Test - scripted responses
    /// let http: Arc<dyn HttpClient> = Arc::new(MockHttpClient::new());
    /// ```
    pub trait HttpClient: Send + Sync {
        /// Execute a request and decode its JSON response body
        ///
        /// # Errors
        ///
        /// - `Transport`: the request could not be sent or the body not read
        /// - `Status`: the server answered with a non-success status
        /// - `Decode`: the body is not valid JSON
        fn execute(
            &self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, HttpError>> + Send + '_>>;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[derive(Clone, Debug, PartialEq)]
    enum Child {
        Ping,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum Parent {
        Child(Child),
    }

    #[test]
    fn effect_id_display() {
        assert_eq!(EffectId::new("search").to_string(), "search");
        assert_eq!(EffectId::from("x".to_string()), EffectId::new("x"));
    }

    #[test]
    fn map_rewrites_delayed_action() {
        let effect = Effect::Delay {
            duration: Duration::from_millis(5),
            action: Box::new(Child::Ping),
        }
        .cancellable("debounce");

        match effect.map(Parent::Child) {
            Effect::Cancellable { id, effect } => {
                assert_eq!(id.as_str(), "debounce");
                assert!(matches!(
                    *effect,
                    Effect::Delay { ref action, .. } if **action == Parent::Child(Child::Ping)
                ));
            },
            other => unreachable!("unexpected effect {other:?}"),
        }
    }

    #[tokio::test]
    async fn map_rewrites_future_output() {
        let effect: Effect<Child> = Effect::Future(Box::pin(async { Some(Child::Ping) }));

        let Effect::Future(fut) = effect.map(Parent::Child) else {
            unreachable!("map keeps the variant");
        };
        assert_eq!(fut.await, Some(Parent::Child(Child::Ping)));
    }
}
