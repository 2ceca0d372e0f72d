//! Ingredient manager built on the larder reducer runtime.
//!
//! A logged-in user keeps a list of ingredients stored in a remote JSON
//! document store. It demonstrates:
//!
//! - Two request-lifecycle trackers composed into one reducer with
//!   `scope_reducer` (add/remove share one, search has its own)
//! - A 500 ms debounced search built from a cancellable delay effect
//! - A pure list reducer reconciling server responses into the list
//! - Testing with `ReducerTest`, `MockHttpClient` and paused tokio time
//!
//! # Quick Start
//!
//! ```no_run
//! use ingredients::{IngredientsAction, IngredientsEnvironment, IngredientsReducer, IngredientsState};
//! use larder_docstore::{Collection, DocStoreClient};
//! use larder_runtime::Store;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let collection = Collection::new("https://pantry.example.com", "ingredients")?;
//! let env = IngredientsEnvironment::new(collection, Arc::new(DocStoreClient::new()));
//! let store = Store::new(IngredientsState::new(), IngredientsReducer::default(), env);
//!
//! store.send(IngredientsAction::Login).await?;
//! store
//!     .send(IngredientsAction::AddIngredient {
//!         title: "Flour".to_string(),
//!         amount: "3".to_string(),
//!     })
//!     .await?;
//!
//! let count = store.state(|s| s.ingredients.len()).await;
//! println!("Ingredients: {count}");
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod environment;
pub mod list;
pub mod reducer;
pub mod search;
pub mod shell;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use config::{AppConfig, ConfigError};
pub use environment::IngredientsEnvironment;
pub use reducer::{IngredientsReducer, RequestPolicy};
pub use types::{
    Correlation, Ingredient, IngredientId, IngredientRequest, IngredientsAction, IngredientsState,
    NewIngredient,
};
