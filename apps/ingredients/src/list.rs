//! List reducer: the in-memory ingredient list.

use crate::types::{Ingredient, IngredientId};
use larder_core::{Effect, Reducer, SmallVec};

/// Changes to the ingredient list
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListAction {
    /// Adopt the given list, in the given order
    Replace(Vec<Ingredient>),
    /// Add one ingredient at the end
    Append(Ingredient),
    /// Drop the ingredient with this key, keeping the others in order
    RemoveById(IngredientId),
}

/// Pure reducer over `Vec<Ingredient>`; never produces effects
#[derive(Clone, Copy, Debug, Default)]
pub struct ListReducer;

impl ListReducer {
    /// Apply one change to `list`
    pub fn apply(list: &mut Vec<Ingredient>, action: ListAction) {
        match action {
            ListAction::Replace(all) => *list = all,
            ListAction::Append(one) => list.push(one),
            ListAction::RemoveById(id) => list.retain(|ingredient| ingredient.id != id),
        }
    }
}

impl Reducer for ListReducer {
    type State = Vec<Ingredient>;
    type Action = ListAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        Self::apply(state, action);
        SmallVec::new()
    }
}
