//! Request-lifecycle tracker.
//!
//! A small reusable reducer that follows the most recent network operation of a
//! feature: `send` marks it pending and issues the request as an effect, and the
//! completion arrives later as a [`RequestAction::Response`] or
//! [`RequestAction::Failure`] fed back through the store. Callers never await an
//! individual send; they observe [`RequestState`].
//!
//! # Semantics worth knowing
//!
//! - There is no queue. A `Send` while another request is pending overwrites the
//!   state, and completions are applied in arrival order, so the last *response*
//!   wins even when it belongs to the earlier call.
//! - `Clear` resets the state but does not stop the request in flight; a late
//!   completion moves the tracker out of `Idle` again. Setting
//!   [`TrackerConfig::cancellation`] changes both behaviours: a newer send aborts
//!   the older request and `Clear` aborts whatever is in flight.
//! - Every failure (transport, status, decoding) surfaces as the same
//!   [`GENERIC_ERROR_MESSAGE`]; the cause is only logged.
//!
//! # Example
//!
//! ```ignore
//! let reducer = RequestReducer::<Tag, Id>::new(TrackerConfig::default());
//! let effects = reducer.reduce(
//!     &mut state,
//!     RequestAction::send(HttpRequest::delete(url), Some(id), Some(Tag::Remove)),
//!     &env,
//! );
//! assert!(state.is_loading());
//! ```

use crate::effect::{Effect, EffectId};
use crate::environment::HttpClient;
use crate::http::HttpRequest;
use crate::reducer::Reducer;
use crate::{SmallVec, async_effect, smallvec};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;

/// Message stored in the state for every failed request
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong!";

/// Lifecycle phase of the tracked request
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Nothing sent yet, or cleared
    #[default]
    Idle,
    /// A request was sent and has not completed
    Pending,
    /// The last completion carried a decoded payload
    Succeeded,
    /// The last completion was a failure
    Failed,
}

/// Observable state of a tracker
///
/// Fields are private so that the invariants hold for every reachable state:
/// a payload is present only when `Succeeded`, an error only when `Failed`.
///
/// # Type Parameters
///
/// - `T`: Tag naming which logical operation the request was
/// - `C`: Correlation value echoed back on completion
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RequestState<T, C> {
    phase: Phase,
    payload: Option<Value>,
    error: Option<String>,
    tag: Option<T>,
    correlation: Option<C>,
}

impl<T, C> Default for RequestState<T, C> {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            payload: None,
            error: None,
            tag: None,
            correlation: None,
        }
    }
}

impl<T, C> RequestState<T, C> {
    /// A fresh, idle tracker state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// True while a request is pending
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Pending)
    }

    /// Decoded payload of the last successful completion
    #[must_use]
    pub const fn data(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// Error message of the last failed completion
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Tag of the request the state currently describes
    #[must_use]
    pub const fn tag(&self) -> Option<&T> {
        self.tag.as_ref()
    }

    /// Correlation value of the request the state currently describes
    #[must_use]
    pub const fn correlation(&self) -> Option<&C> {
        self.correlation.as_ref()
    }

    fn begin(&mut self, tag: Option<T>, correlation: Option<C>) {
        self.phase = Phase::Pending;
        self.payload = None;
        self.error = None;
        self.tag = tag;
        self.correlation = correlation;
    }

    fn succeed(&mut self, payload: Value, tag: Option<T>, correlation: Option<C>) {
        self.phase = Phase::Succeeded;
        self.payload = Some(payload);
        self.error = None;
        self.tag = tag;
        self.correlation = correlation;
    }

    fn fail(&mut self, message: String, tag: Option<T>, correlation: Option<C>) {
        self.phase = Phase::Failed;
        self.payload = None;
        self.error = Some(message);
        self.tag = tag;
        self.correlation = correlation;
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Transitions of the tracker
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RequestAction<T, C> {
    /// Start a request; the tracker becomes `Pending`
    Send {
        /// What to execute
        request: HttpRequest,
        /// Echoed back on completion
        correlation: Option<C>,
        /// Names the logical operation
        tag: Option<T>,
    },

    /// A request completed with a decoded body
    Response {
        /// Decoded JSON body
        payload: Value,
        /// Correlation of the call that produced this response
        correlation: Option<C>,
        /// Tag of the call that produced this response
        tag: Option<T>,
    },

    /// A request failed
    Failure {
        /// User-facing message
        message: String,
        /// Correlation of the call that failed
        correlation: Option<C>,
        /// Tag of the call that failed
        tag: Option<T>,
    },

    /// Reset to `Idle`
    Clear,
}

impl<T, C> RequestAction<T, C> {
    /// Shorthand for [`RequestAction::Send`]
    #[must_use]
    pub const fn send(request: HttpRequest, correlation: Option<C>, tag: Option<T>) -> Self {
        Self::Send {
            request,
            correlation,
            tag,
        }
    }
}

/// What a failure does with the failing call's tag and correlation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureContext {
    /// Keep them, so callers can tell which operation failed
    #[default]
    Retain,
    /// Drop them, leaving only the error message
    Discard,
}

/// Tracker behaviour switches
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Handling of tag/correlation on failure
    pub failure_context: FailureContext,
    /// When set, requests run as cancellable effects under this id: a newer
    /// send aborts the older request and `Clear` aborts the one in flight.
    pub cancellation: Option<EffectId>,
}

impl TrackerConfig {
    /// Set the failure context policy
    #[must_use]
    pub const fn with_failure_context(mut self, failure_context: FailureContext) -> Self {
        self.failure_context = failure_context;
        self
    }

    /// Run requests as cancellable effects under `id`
    #[must_use]
    pub fn with_cancellation(mut self, id: impl Into<EffectId>) -> Self {
        self.cancellation = Some(id.into());
        self
    }
}

/// Dependencies of the tracker
#[derive(Clone)]
pub struct RequestEnvironment {
    /// Executes the requests
    pub http: Arc<dyn HttpClient>,
}

impl RequestEnvironment {
    /// Creates a new `RequestEnvironment`
    #[must_use]
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }
}

/// Reducer for the request-lifecycle tracker
#[derive(Debug)]
pub struct RequestReducer<T, C> {
    config: TrackerConfig,
    _marker: PhantomData<fn() -> (T, C)>,
}

impl<T, C> RequestReducer<T, C> {
    /// Creates a tracker reducer with the given behaviour
    #[must_use]
    pub const fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            _marker: PhantomData,
        }
    }

    /// The configured behaviour
    #[must_use]
    pub const fn config(&self) -> &TrackerConfig {
        &self.config
    }
}

impl<T, C> Clone for RequestReducer<T, C> {
    fn clone(&self) -> Self {
        Self::new(self.config.clone())
    }
}

impl<T, C> Default for RequestReducer<T, C> {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

impl<T, C> Reducer for RequestReducer<T, C>
where
    T: Clone + std::fmt::Debug + Send + 'static,
    C: Clone + Send + 'static,
{
    type State = RequestState<T, C>;
    type Action = RequestAction<T, C>;
    type Environment = RequestEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            RequestAction::Send {
                request,
                correlation,
                tag,
            } => {
                tracing::debug!(request = %request, tag = ?tag, "Sending request");
                state.begin(tag.clone(), correlation.clone());

                let http = Arc::clone(&env.http);
                let effect = async_effect! {
                    let completion = match http.execute(request).await {
                        Ok(payload) => {
                            metrics::counter!("request.completed", "outcome" => "success")
                                .increment(1);
                            RequestAction::Response { payload, correlation, tag }
                        },
                        Err(error) => {
                            metrics::counter!("request.completed", "outcome" => "failure")
                                .increment(1);
                            tracing::warn!(error = %error, tag = ?tag, "Request failed");
                            RequestAction::Failure {
                                message: GENERIC_ERROR_MESSAGE.to_string(),
                                correlation,
                                tag,
                            }
                        },
                    };
                    Some(completion)
                };

                match &self.config.cancellation {
                    Some(id) => smallvec![effect.cancellable(id.clone())],
                    None => smallvec![effect],
                }
            },

            RequestAction::Response {
                payload,
                correlation,
                tag,
            } => {
                if state.phase() != Phase::Pending {
                    tracing::debug!(phase = ?state.phase(), tag = ?tag, "Response arrived outside Pending");
                }
                state.succeed(payload, tag, correlation);
                SmallVec::new()
            },

            RequestAction::Failure {
                message,
                correlation,
                tag,
            } => {
                match self.config.failure_context {
                    FailureContext::Retain => state.fail(message, tag, correlation),
                    FailureContext::Discard => state.fail(message, None, None),
                }
                SmallVec::new()
            },

            RequestAction::Clear => {
                state.reset();
                match &self.config.cancellation {
                    Some(id) => smallvec![Effect::Cancel { id: id.clone() }],
                    None => SmallVec::new(),
                }
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::http::HttpError;
    use proptest::prelude::*;
    use serde_json::json;
    use std::future::Future;
    use std::pin::Pin;

    type Tracker = RequestReducer<&'static str, u32>;
    type State = RequestState<&'static str, u32>;
    type Action = RequestAction<&'static str, u32>;

    struct StubHttp(Result<Value, HttpError>);

    impl HttpClient for StubHttp {
        fn execute(
            &self,
            _request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<Value, HttpError>> + Send + '_>> {
            let outcome = self.0.clone();
            Box::pin(async move { outcome })
        }
    }

    fn env(outcome: Result<Value, HttpError>) -> RequestEnvironment {
        RequestEnvironment::new(Arc::new(StubHttp(outcome)))
    }

    fn send(tag: &'static str, correlation: u32) -> Action {
        RequestAction::send(
            HttpRequest::get("http://db/items.json"),
            Some(correlation),
            Some(tag),
        )
    }

    fn response(tag: &'static str, correlation: u32, payload: Value) -> Action {
        RequestAction::Response {
            payload,
            correlation: Some(correlation),
            tag: Some(tag),
        }
    }

    fn failure(tag: &'static str, correlation: u32) -> Action {
        RequestAction::Failure {
            message: GENERIC_ERROR_MESSAGE.to_string(),
            correlation: Some(correlation),
            tag: Some(tag),
        }
    }

    async fn run_single_effect(effects: SmallVec<[Effect<Action>; 4]>) -> Option<Action> {
        assert_eq!(effects.len(), 1);
        match effects.into_iter().next() {
            Some(Effect::Future(fut)) => fut.await,
            other => unreachable!("expected a future effect, got {other:?}"),
        }
    }

    #[test]
    fn send_moves_to_pending_and_records_context() {
        let tracker = Tracker::default();
        let mut state = State::new();

        let effects = tracker.reduce(&mut state, send("LIST", 1), &env(Ok(json!({}))));

        assert_eq!(state.phase(), Phase::Pending);
        assert!(state.is_loading());
        assert_eq!(state.tag(), Some(&"LIST"));
        assert_eq!(state.correlation(), Some(&1));
        assert!(state.data().is_none());
        assert!(state.error().is_none());
        assert!(matches!(effects.as_slice(), [Effect::Future(_)]));
    }

    #[test]
    fn send_clears_previous_outcome() {
        let tracker = Tracker::default();
        let env = env(Ok(json!({})));
        let mut state = State::new();
        let _ = tracker.reduce(&mut state, failure("ADD", 3), &env);
        assert_eq!(state.phase(), Phase::Failed);

        let _ = tracker.reduce(&mut state, send("REMOVE", 4), &env);

        assert_eq!(state.phase(), Phase::Pending);
        assert!(state.error().is_none());
        assert_eq!(state.tag(), Some(&"REMOVE"));
    }

    #[tokio::test]
    async fn successful_request_resolves_to_response() {
        let tracker = Tracker::default();
        let body = json!({"k1": {"title": "Apple", "amount": "5"}});
        let env = env(Ok(body.clone()));
        let mut state = State::new();

        let effects = tracker.reduce(&mut state, send("LIST", 0), &env);
        let completion = run_single_effect(effects).await.unwrap();
        assert_eq!(completion, response("LIST", 0, body.clone()));

        let _ = tracker.reduce(&mut state, completion, &env);
        assert_eq!(state.phase(), Phase::Succeeded);
        assert_eq!(state.data(), Some(&body));
        assert_eq!(state.tag(), Some(&"LIST"));
        assert!(state.error().is_none());
    }

    #[tokio::test]
    async fn failed_request_resolves_to_generic_failure() {
        let tracker = Tracker::default();
        let env = env(Err(HttpError::Status { status: 500 }));
        let mut state = State::new();

        let effects = tracker.reduce(&mut state, send("ADD", 9), &env);
        let completion = run_single_effect(effects).await.unwrap();
        let _ = tracker.reduce(&mut state, completion, &env);

        assert_eq!(state.phase(), Phase::Failed);
        assert_eq!(state.error(), Some(GENERIC_ERROR_MESSAGE));
        assert!(state.data().is_none());
        assert_eq!(state.tag(), Some(&"ADD"));
        assert_eq!(state.correlation(), Some(&9));
    }

    #[test]
    fn discard_policy_drops_context_on_failure() {
        let tracker = Tracker::new(
            TrackerConfig::default().with_failure_context(FailureContext::Discard),
        );
        let env = env(Ok(Value::Null));
        let mut state = State::new();
        let _ = tracker.reduce(&mut state, send("ADD", 9), &env);

        let _ = tracker.reduce(&mut state, failure("ADD", 9), &env);

        assert_eq!(state.phase(), Phase::Failed);
        assert!(state.tag().is_none());
        assert!(state.correlation().is_none());
    }

    #[test]
    fn clear_resets_even_while_pending() {
        let tracker = Tracker::default();
        let env = env(Ok(Value::Null));
        let mut state = State::new();
        let _ = tracker.reduce(&mut state, send("LIST", 1), &env);

        let effects = tracker.reduce(&mut state, RequestAction::Clear, &env);

        assert_eq!(state, State::new());
        assert!(effects.is_empty());
    }

    #[test]
    fn late_response_after_clear_leaves_idle() {
        let tracker = Tracker::default();
        let env = env(Ok(Value::Null));
        let mut state = State::new();
        let _ = tracker.reduce(&mut state, send("LIST", 1), &env);
        let _ = tracker.reduce(&mut state, RequestAction::Clear, &env);

        let _ = tracker.reduce(&mut state, response("LIST", 1, json!({"stale": true})), &env);

        assert_eq!(state.phase(), Phase::Succeeded);
        assert_eq!(state.data(), Some(&json!({"stale": true})));
    }

    #[test]
    fn last_response_wins_over_last_call() {
        let tracker = Tracker::default();
        let env = env(Ok(Value::Null));
        let mut state = State::new();
        let _ = tracker.reduce(&mut state, send("FIRST", 1), &env);
        let _ = tracker.reduce(&mut state, send("SECOND", 2), &env);

        let _ = tracker.reduce(&mut state, response("SECOND", 2, json!(2)), &env);
        let _ = tracker.reduce(&mut state, response("FIRST", 1, json!(1)), &env);

        assert_eq!(state.tag(), Some(&"FIRST"));
        assert_eq!(state.correlation(), Some(&1));
        assert_eq!(state.data(), Some(&json!(1)));
    }

    #[test]
    fn cancellation_wraps_send_and_clear() {
        let tracker = Tracker::new(TrackerConfig::default().with_cancellation("list-request"));
        let env = env(Ok(Value::Null));
        let mut state = State::new();

        let effects = tracker.reduce(&mut state, send("LIST", 1), &env);
        assert!(matches!(
            effects.as_slice(),
            [Effect::Cancellable { id, effect }]
                if id.as_str() == "list-request" && matches!(**effect, Effect::Future(_))
        ));

        let effects = tracker.reduce(&mut state, RequestAction::Clear, &env);
        assert!(matches!(
            effects.as_slice(),
            [Effect::Cancel { id }] if id.as_str() == "list-request"
        ));
    }

    #[derive(Clone, Debug)]
    enum Op {
        Send(u32),
        Respond(u32),
        Fail(u32),
        Clear,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            any::<u32>().prop_map(Op::Send),
            any::<u32>().prop_map(Op::Respond),
            any::<u32>().prop_map(Op::Fail),
            Just(Op::Clear),
        ]
    }

    fn apply(tracker: &Tracker, state: &mut State, op: Op, env: &RequestEnvironment) {
        let action = match op {
            Op::Send(n) => send("OP", n),
            Op::Respond(n) => response("OP", n, json!(n)),
            Op::Fail(n) => failure("OP", n),
            Op::Clear => RequestAction::Clear,
        };
        let _ = tracker.reduce(state, action, env);
    }

    proptest! {
        #[test]
        fn payload_and_error_are_exclusive(ops in prop::collection::vec(op(), 0..32)) {
            let tracker = Tracker::default();
            let env = env(Ok(Value::Null));
            let mut state = State::new();
            for op in ops {
                apply(&tracker, &mut state, op, &env);
                prop_assert!(!(state.data().is_some() && state.error().is_some()));
                prop_assert_eq!(state.data().is_some(), state.phase() == Phase::Succeeded);
                prop_assert_eq!(state.error().is_some(), state.phase() == Phase::Failed);
            }
        }

        #[test]
        fn clear_always_returns_to_idle(ops in prop::collection::vec(op(), 0..32)) {
            let tracker = Tracker::default();
            let env = env(Ok(Value::Null));
            let mut state = State::new();
            for op in ops {
                apply(&tracker, &mut state, op, &env);
            }
            apply(&tracker, &mut state, Op::Clear, &env);
            prop_assert_eq!(state, State::new());
        }

        #[test]
        fn send_always_yields_clean_pending(
            ops in prop::collection::vec(op(), 0..32),
            n in any::<u32>(),
        ) {
            let tracker = Tracker::default();
            let env = env(Ok(Value::Null));
            let mut state = State::new();
            for op in ops {
                apply(&tracker, &mut state, op, &env);
            }
            apply(&tracker, &mut state, Op::Send(n), &env);
            prop_assert_eq!(state.phase(), Phase::Pending);
            prop_assert!(state.data().is_none());
            prop_assert!(state.error().is_none());
            prop_assert_eq!(state.correlation(), Some(&n));
        }
    }
}
