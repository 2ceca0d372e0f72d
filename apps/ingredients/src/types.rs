//! Domain types for the ingredient manager.
//!
//! An ingredient is a titled amount stored in a remote collection under an
//! opaque key chosen by the store. The application state owns the list, the
//! current filter, the authentication flag and two request trackers: one
//! shared by add/remove, one for search.

use crate::auth::AuthState;
use larder_core::request::{RequestAction, RequestState};
use larder_macros::Action;
use serde::{Deserialize, Serialize};

/// Key of an ingredient in the remote collection
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IngredientId(String);

impl IngredientId {
    /// Wraps a key returned by the store
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The key as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for IngredientId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for IngredientId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for IngredientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored ingredient
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Store key
    pub id: IngredientId,
    /// Display name
    pub title: String,
    /// Quantity, kept as the text the user entered
    pub amount: String,
}

/// An ingredient that has not been stored yet
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIngredient {
    /// Display name
    pub title: String,
    /// Quantity
    pub amount: String,
}

impl NewIngredient {
    /// Creates a new, unsaved ingredient
    #[must_use]
    pub fn new(title: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            amount: amount.into(),
        }
    }

    /// JSON document sent to the store: `{"title": .., "amount": ..}`
    #[must_use]
    pub fn to_document(&self) -> serde_json::Value {
        serde_json::json!({ "title": self.title, "amount": self.amount })
    }

    /// The stored ingredient once the store has assigned `id`
    #[must_use]
    pub fn stored_as(self, id: IngredientId) -> Ingredient {
        Ingredient {
            id,
            title: self.title,
            amount: self.amount,
        }
    }
}

/// Which logical operation a tracked request was
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IngredientRequest {
    /// `POST` of a new ingredient
    Add,
    /// `DELETE` of one ingredient
    Remove,
    /// Filtered `GET` of the collection
    Search,
}

/// Value echoed back with a list request's completion
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Correlation {
    /// The ingredient being added
    New(NewIngredient),
    /// The key being removed
    Id(IngredientId),
}

/// Tracker shared by add and remove
pub type ListRequestState = RequestState<IngredientRequest, Correlation>;
/// Transitions of the add/remove tracker
pub type ListRequestAction = RequestAction<IngredientRequest, Correlation>;
/// Search tracker; the correlation is the filter text searched for
pub type SearchRequestState = RequestState<IngredientRequest, String>;
/// Transitions of the search tracker
pub type SearchRequestAction = RequestAction<IngredientRequest, String>;

/// Application state
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IngredientsState {
    /// Login flag
    pub auth: AuthState,
    /// Ingredients in display order
    pub ingredients: Vec<Ingredient>,
    /// Current filter text
    pub filter: String,
    /// Add/remove request tracker
    pub list_request: ListRequestState,
    /// Search request tracker
    pub search_request: SearchRequestState,
}

impl IngredientsState {
    /// Logged out, empty list, idle trackers
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True while either tracker has a request in flight
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.list_request.is_loading() || self.search_request.is_loading()
    }

    /// Looks up an ingredient by key
    #[must_use]
    pub fn get(&self, id: &IngredientId) -> Option<&Ingredient> {
        self.ingredients.iter().find(|ingredient| &ingredient.id == id)
    }
}

/// Everything that can happen to the ingredient manager
#[derive(Action, Clone, Debug, PartialEq)]
pub enum IngredientsAction {
    // ========== Commands ==========
    /// Command: Log in (no credentials)
    #[command]
    Login,

    /// Command: Store a new ingredient
    #[command]
    AddIngredient {
        /// Display name
        title: String,
        /// Quantity
        amount: String,
    },

    /// Command: Delete a stored ingredient
    #[command]
    RemoveIngredient {
        /// Key to delete
        id: IngredientId,
    },

    /// Command: The filter text changed
    #[command]
    FilterChanged {
        /// New filter text
        text: String,
    },

    /// Command: Dismiss the add/remove error banner
    #[command]
    DismissError,

    /// Command: Dismiss the search error banner
    #[command]
    DismissSearchError,

    // ========== Events ==========
    /// Event: The debounce timer for `text` elapsed
    #[event]
    DebounceElapsed {
        /// Filter text the timer was armed with
        text: String,
    },

    /// Event: Add/remove tracker transition
    #[event]
    ListRequest(ListRequestAction),

    /// Event: Search tracker transition
    #[event]
    SearchRequest(SearchRequestAction),
}

impl IngredientsAction {
    /// The add/remove tracker transition, if this is one
    #[must_use]
    pub fn into_list_request(self) -> Option<ListRequestAction> {
        match self {
            Self::ListRequest(inner) => Some(inner),
            _ => None,
        }
    }

    /// The search tracker transition, if this is one
    #[must_use]
    pub fn into_search_request(self) -> Option<SearchRequestAction> {
        match self {
            Self::SearchRequest(inner) => Some(inner),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_ingredient_document_has_title_and_amount() {
        let flour = NewIngredient::new("Flour", "3");

        assert_eq!(flour.to_document(), json!({"title": "Flour", "amount": "3"}));
    }

    #[test]
    fn stored_as_keeps_fields() {
        let stored = NewIngredient::new("Flour", "3").stored_as(IngredientId::from("k9"));

        assert_eq!(
            stored,
            Ingredient {
                id: IngredientId::from("k9"),
                title: "Flour".to_string(),
                amount: "3".to_string(),
            }
        );
    }

    #[test]
    fn actions_are_classified() {
        assert!(IngredientsAction::Login.is_command());
        assert!(IngredientsAction::ListRequest(ListRequestAction::Clear).is_event());
        assert_eq!(
            IngredientsAction::DebounceElapsed {
                text: String::new()
            }
            .name(),
            "DebounceElapsed"
        );
    }

    #[test]
    fn fresh_state_is_logged_out_and_idle() {
        let state = IngredientsState::new();

        assert!(!state.auth.is_authenticated());
        assert!(!state.is_loading());
        assert!(state.ingredients.is_empty());
    }
}
