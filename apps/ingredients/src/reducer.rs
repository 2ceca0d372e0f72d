//! Reducer for the ingredient manager.
//!
//! Add and remove share one request tracker, search has its own. Successful
//! tracker responses are reconciled into the list here: an `Add` response
//! appends the new ingredient under the key the store assigned, a `Remove`
//! response drops the removed key, and a search response replaces the list.

use crate::environment::IngredientsEnvironment;
use crate::list::{ListAction, ListReducer};
use crate::search::{self, parse_listing};
use crate::types::{
    Correlation, IngredientId, IngredientRequest, IngredientsAction, IngredientsState,
    ListRequestAction, NewIngredient, SearchRequestAction,
};
use larder_core::composition::{ScopedReducer, scope_reducer};
use larder_core::http::HttpRequest;
use larder_core::request::{
    FailureContext, RequestAction, RequestEnvironment, RequestReducer, TrackerConfig,
};
use larder_core::{Effect, Reducer, SmallVec, smallvec};
use serde_json::Value;

/// Cancellation id of the add/remove request, when in-flight cancellation is on
pub const LIST_REQUEST: &str = "list-request";
/// Cancellation id of the search request, when in-flight cancellation is on
pub const SEARCH_REQUEST: &str = "search-request";

/// How both request trackers behave
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequestPolicy {
    /// Whether a failure keeps the failing call's tag and correlation
    pub failure_context: FailureContext,
    /// Abort the in-flight request on a newer send or on dismiss
    pub cancel_in_flight: bool,
}

impl RequestPolicy {
    fn tracker(self, id: &'static str) -> TrackerConfig {
        let config = TrackerConfig::default().with_failure_context(self.failure_context);
        if self.cancel_in_flight {
            config.with_cancellation(id)
        } else {
            config
        }
    }
}

type ListTracker = ScopedReducer<
    IngredientsState,
    IngredientsAction,
    IngredientsEnvironment,
    RequestReducer<IngredientRequest, Correlation>,
>;

type SearchTracker = ScopedReducer<
    IngredientsState,
    IngredientsAction,
    IngredientsEnvironment,
    RequestReducer<IngredientRequest, String>,
>;

/// Reducer for the ingredient manager
#[derive(Clone)]
pub struct IngredientsReducer {
    list_tracker: ListTracker,
    search_tracker: SearchTracker,
}

impl Default for IngredientsReducer {
    fn default() -> Self {
        Self::new(RequestPolicy::default())
    }
}

impl IngredientsReducer {
    /// Creates the reducer with the given tracker policy
    #[must_use]
    pub fn new(policy: RequestPolicy) -> Self {
        Self {
            list_tracker: scope_reducer(
                RequestReducer::new(policy.tracker(LIST_REQUEST)),
                |state: &mut IngredientsState| &mut state.list_request,
                IngredientsAction::into_list_request,
                IngredientsAction::ListRequest,
                request_environment,
            ),
            search_tracker: scope_reducer(
                RequestReducer::new(policy.tracker(SEARCH_REQUEST)),
                |state: &mut IngredientsState| &mut state.search_request,
                IngredientsAction::into_search_request,
                IngredientsAction::SearchRequest,
                request_environment,
            ),
        }
    }

    fn send_list_request(
        &self,
        state: &mut IngredientsState,
        request: HttpRequest,
        correlation: Correlation,
        tag: IngredientRequest,
        env: &IngredientsEnvironment,
    ) -> SmallVec<[Effect<IngredientsAction>; 4]> {
        self.list_tracker.reduce(
            state,
            IngredientsAction::ListRequest(RequestAction::send(
                request,
                Some(correlation),
                Some(tag),
            )),
            env,
        )
    }

    /// The list change a successful add/remove response implies
    fn reconcile(
        payload: &Value,
        correlation: Option<&Correlation>,
        tag: Option<&IngredientRequest>,
    ) -> Option<ListAction> {
        match (tag, correlation) {
            (Some(IngredientRequest::Add), Some(Correlation::New(ingredient))) => {
                match payload.get("name").and_then(Value::as_str) {
                    Some(key) => Some(ListAction::Append(
                        ingredient.clone().stored_as(IngredientId::new(key)),
                    )),
                    None => {
                        tracing::warn!(payload = %payload, "Add response without a key, ignoring");
                        None
                    },
                }
            },
            (Some(IngredientRequest::Remove), Some(Correlation::Id(id))) => {
                Some(ListAction::RemoveById(id.clone()))
            },
            (tag, _) => {
                tracing::warn!(tag = ?tag, "List response without matching context, ignoring");
                None
            },
        }
    }

    fn on_list_request(
        &self,
        state: &mut IngredientsState,
        action: ListRequestAction,
        env: &IngredientsEnvironment,
    ) -> SmallVec<[Effect<IngredientsAction>; 4]> {
        let change = match &action {
            RequestAction::Response {
                payload,
                correlation,
                tag,
            } => Self::reconcile(payload, correlation.as_ref(), tag.as_ref()),
            _ => None,
        };

        let effects = self
            .list_tracker
            .reduce(state, IngredientsAction::ListRequest(action), env);

        if let Some(change) = change {
            ListReducer::apply(&mut state.ingredients, change);
        }
        effects
    }

    fn on_search_request(
        &self,
        state: &mut IngredientsState,
        action: SearchRequestAction,
        env: &IngredientsEnvironment,
    ) -> SmallVec<[Effect<IngredientsAction>; 4]> {
        let change = match &action {
            RequestAction::Response { payload, .. } => match parse_listing(payload) {
                Ok(ingredients) => Some(ListAction::Replace(ingredients)),
                Err(error) => {
                    tracing::warn!(error = %error, "Ignoring search response");
                    None
                },
            },
            _ => None,
        };

        let effects = self
            .search_tracker
            .reduce(state, IngredientsAction::SearchRequest(action), env);

        if let Some(change) = change {
            ListReducer::apply(&mut state.ingredients, change);
        }
        effects
    }
}

fn request_environment(env: &IngredientsEnvironment) -> &RequestEnvironment {
    &env.request
}

impl Reducer for IngredientsReducer {
    type State = IngredientsState;
    type Action = IngredientsAction;
    type Environment = IngredientsEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        if !state.auth.permits(&action) {
            tracing::debug!(action = action.name(), "Ignoring command while logged out");
            return SmallVec::new();
        }

        match action {
            // ========== Commands ==========
            IngredientsAction::Login => {
                if !state.auth.login() {
                    return SmallVec::new();
                }
                tracing::info!("Logged in");
                // The search view loads the collection as soon as it appears
                smallvec![search::debounce(state.filter.clone(), env.debounce)]
            },

            IngredientsAction::AddIngredient { title, amount } => {
                let ingredient = NewIngredient::new(title, amount);
                let request = HttpRequest::post(env.collection.url(), ingredient.to_document());
                self.send_list_request(
                    state,
                    request,
                    Correlation::New(ingredient),
                    IngredientRequest::Add,
                    env,
                )
            },

            IngredientsAction::RemoveIngredient { id } => {
                let request = HttpRequest::delete(env.collection.document_url(id.as_str()));
                self.send_list_request(
                    state,
                    request,
                    Correlation::Id(id),
                    IngredientRequest::Remove,
                    env,
                )
            },

            IngredientsAction::FilterChanged { text } => {
                state.filter.clone_from(&text);
                smallvec![search::debounce(text, env.debounce)]
            },

            IngredientsAction::DismissError => self.list_tracker.reduce(
                state,
                IngredientsAction::ListRequest(RequestAction::Clear),
                env,
            ),

            IngredientsAction::DismissSearchError => self.search_tracker.reduce(
                state,
                IngredientsAction::SearchRequest(RequestAction::Clear),
                env,
            ),

            // ========== Events ==========
            IngredientsAction::DebounceElapsed { text } => {
                if text != state.filter {
                    tracing::trace!(text = %text, filter = %state.filter, "Stale debounce");
                    return SmallVec::new();
                }
                let request = search::search_request(&env.collection, &text);
                self.search_tracker.reduce(
                    state,
                    IngredientsAction::SearchRequest(RequestAction::send(
                        request,
                        Some(text),
                        Some(IngredientRequest::Search),
                    )),
                    env,
                )
            },

            IngredientsAction::ListRequest(action) => self.on_list_request(state, action, env),

            IngredientsAction::SearchRequest(action) => {
                self.on_search_request(state, action, env)
            },
        }
    }
}
