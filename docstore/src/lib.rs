//! # Larder Document Store
//!
//! Adapter for REST-style JSON document stores (Firebase Realtime Database
//! style): every collection and document is addressed by a URL ending in
//! `.json`, and collections can be filtered with `orderBy`/`equalTo`.
//!
//! ## Example
//!
//! ```no_run
//! use larder_docstore::{Collection, DocStoreClient};
//!
//! # fn main() -> Result<(), larder_docstore::EndpointError> {
//! let collection = Collection::new("https://pantry.example.com", "ingredients")?;
//! let client = DocStoreClient::new();
//!
//! assert_eq!(collection.url(), "https://pantry.example.com/ingredients.json");
//! # let _ = client;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`endpoint`]: collection and document URL building
//! - [`client`]: `reqwest` implementation of `larder_core::environment::HttpClient`

pub mod client;
pub mod endpoint;
pub mod error;

pub use client::DocStoreClient;
pub use endpoint::Collection;
pub use error::EndpointError;
