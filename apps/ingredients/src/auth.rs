//! Authentication gate.
//!
//! There are no credentials: logging in flips a flag. The flag lives in the
//! application state, and every command except `Login` is refused until it is
//! set.

use crate::types::IngredientsAction;
use serde::{Deserialize, Serialize};

/// Whether the user has logged in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    authenticated: bool,
}

impl AuthState {
    /// True once `login` has been called
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Log in; returns `true` if this changed the state
    pub const fn login(&mut self) -> bool {
        let changed = !self.authenticated;
        self.authenticated = true;
        changed
    }

    /// Whether `action` may run in the current state
    ///
    /// Events always pass; they are completions of work started while
    /// logged in.
    #[must_use]
    pub const fn permits(&self, action: &IngredientsAction) -> bool {
        self.authenticated
            || !action.is_command()
            || matches!(action, IngredientsAction::Login)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_is_idempotent() {
        let mut auth = AuthState::default();

        assert!(auth.login());
        assert!(!auth.login());
        assert!(auth.is_authenticated());
    }

    #[test]
    fn logged_out_only_permits_login_and_events() {
        let auth = AuthState::default();

        assert!(auth.permits(&IngredientsAction::Login));
        assert!(auth.permits(&IngredientsAction::DebounceElapsed {
            text: String::new()
        }));
        assert!(!auth.permits(&IngredientsAction::FilterChanged {
            text: "Ap".to_string()
        }));
        assert!(!auth.permits(&IngredientsAction::DismissError));
    }

    #[test]
    fn logged_in_permits_everything() {
        let mut auth = AuthState::default();
        auth.login();

        assert!(auth.permits(&IngredientsAction::AddIngredient {
            title: "Flour".to_string(),
            amount: "1".to_string(),
        }));
    }
}
