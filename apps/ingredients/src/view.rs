//! Plain-text rendering of the ingredient manager.

use crate::types::IngredientsState;
use std::fmt::Write;

/// Render `state` as the screen the shell prints
#[must_use]
pub fn render(state: &IngredientsState) -> String {
    let mut out = String::new();

    if !state.auth.is_authenticated() {
        out.push_str("== Authentication ==\n");
        out.push_str("Please log in to continue: type `login`\n");
        return out;
    }

    out.push_str("== Ingredients ==\n");
    if let Some(error) = state.list_request.error() {
        let _ = writeln!(out, "! {error} (type `dismiss`)");
    }
    if let Some(error) = state.search_request.error() {
        let _ = writeln!(out, "! {error} (type `dismiss search`)");
    }
    if state.is_loading() {
        out.push_str("Loading...\n");
    }

    if state.filter.is_empty() {
        out.push_str("Filter: (none)\n");
    } else {
        let _ = writeln!(out, "Filter: {}", state.filter);
    }

    if state.ingredients.is_empty() {
        out.push_str("  (no ingredients)\n");
    }
    for ingredient in &state.ingredients {
        let _ = writeln!(
            out,
            "  {:<24} {:>6}   [{}]",
            ingredient.title, ingredient.amount, ingredient.id
        );
    }

    out
}
