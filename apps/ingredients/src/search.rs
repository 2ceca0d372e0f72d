//! Debounced search.
//!
//! Every filter change restarts a timer registered under [`SEARCH_DEBOUNCE`];
//! only a timer whose text still matches the filter when it fires issues the
//! search. Search results replace the list.

use crate::types::{Ingredient, IngredientId, IngredientsAction};
use larder_core::http::HttpRequest;
use larder_core::{Effect, EffectId, cancellable, delay};
use larder_docstore::Collection;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Cancellation id of the pending debounce timer
pub const SEARCH_DEBOUNCE: EffectId = EffectId::new("search-debounce");

/// Default quiet period before a filter change triggers a search
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Arm (or re-arm) the debounce timer for `text`
#[must_use]
pub fn debounce(text: String, quiet: Duration) -> Effect<IngredientsAction> {
    cancellable! {
        id: SEARCH_DEBOUNCE,
        effect: delay! {
            duration: quiet,
            action: IngredientsAction::DebounceElapsed { text }
        }
    }
}

/// The search for `filter`: unfiltered when empty, title equality otherwise
#[must_use]
pub fn search_request(collection: &Collection, filter: &str) -> HttpRequest {
    HttpRequest::get(collection.query_url(filter))
}

/// A search response that is not a listing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("expected a mapping of key to ingredient, got {0}")]
pub struct ListingError(&'static str);

#[derive(Deserialize)]
struct StoredIngredient {
    title: String,
    amount: Amount,
}

/// Amounts are written as strings but older documents hold numbers
#[derive(Deserialize)]
#[serde(untagged)]
enum Amount {
    Text(String),
    Number(serde_json::Number),
}

impl Amount {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

/// Convert a collection listing into ingredients, in key order
///
/// The result is sorted by key rather than kept in the order the server sent.
/// Store-generated keys sort chronologically, so key order is insertion order.
/// `null` (an empty collection) is an empty list. Entries that are not
/// `{title, amount}` documents are skipped with a warning.
///
/// # Errors
///
/// Returns [`ListingError`] if the payload is neither `null` nor an object.
pub fn parse_listing(payload: &Value) -> Result<Vec<Ingredient>, ListingError> {
    let entries = match payload {
        Value::Null => return Ok(Vec::new()),
        Value::Object(entries) => entries,
        Value::Array(_) => return Err(ListingError("an array")),
        Value::Bool(_) => return Err(ListingError("a boolean")),
        Value::Number(_) => return Err(ListingError("a number")),
        Value::String(_) => return Err(ListingError("a string")),
    };

    let mut ingredients: Vec<Ingredient> = entries
        .iter()
        .filter_map(|(key, document)| {
            match StoredIngredient::deserialize(document) {
                Ok(stored) => Some(Ingredient {
                    id: IngredientId::new(key.as_str()),
                    title: stored.title,
                    amount: stored.amount.into_text(),
                }),
                Err(error) => {
                    tracing::warn!(key = %key, error = %error, "Skipping malformed ingredient");
                    None
                },
            }
        })
        .collect();
    ingredients.sort_by(|a, b| a.id.cmp(&b.id));

    Ok(ingredients)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn collection() -> Collection {
        Collection::new("https://db.test", "ingredients").unwrap()
    }

    #[test]
    fn debounce_is_a_cancellable_delay() {
        match debounce("Ap".to_string(), DEFAULT_DEBOUNCE) {
            Effect::Cancellable { id, effect } => {
                assert_eq!(id, SEARCH_DEBOUNCE);
                assert!(matches!(
                    *effect,
                    Effect::Delay { duration, ref action }
                        if duration == Duration::from_millis(500)
                        && **action == IngredientsAction::DebounceElapsed { text: "Ap".to_string() }
                ));
            },
            other => unreachable!("unexpected effect {other:?}"),
        }
    }

    #[test]
    fn empty_filter_fetches_everything() {
        assert_eq!(
            search_request(&collection(), "").url,
            "https://db.test/ingredients.json"
        );
    }

    #[test]
    fn filter_queries_by_title() {
        let request = search_request(&collection(), "Apple");

        assert_eq!(
            request.url,
            "https://db.test/ingredients.json?orderBy=%22title%22&equalTo=%22Apple%22"
        );
        assert!(request.body.is_none());
    }

    #[test]
    fn listing_is_parsed_in_key_order() {
        let payload = json!({
            "k2": {"title": "Flour", "amount": "3"},
            "k1": {"title": "Apple", "amount": 5},
        });

        let ingredients = parse_listing(&payload).unwrap();

        assert_eq!(
            ingredients,
            vec![
                Ingredient {
                    id: IngredientId::from("k1"),
                    title: "Apple".to_string(),
                    amount: "5".to_string(),
                },
                Ingredient {
                    id: IngredientId::from("k2"),
                    title: "Flour".to_string(),
                    amount: "3".to_string(),
                },
            ]
        );
    }

    #[test]
    fn null_listing_is_empty() {
        assert_eq!(parse_listing(&Value::Null), Ok(Vec::new()));
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let payload = json!({
            "k1": {"title": "Apple", "amount": "5"},
            "k2": {"name": "no title"},
            "k3": 42,
        });

        let ingredients = parse_listing(&payload).unwrap();

        assert_eq!(ingredients.len(), 1);
        assert_eq!(ingredients[0].id.as_str(), "k1");
    }

    #[test]
    fn non_object_listing_is_rejected() {
        assert!(parse_listing(&json!([1, 2])).is_err());
        assert!(parse_listing(&json!("oops")).is_err());
    }
}
