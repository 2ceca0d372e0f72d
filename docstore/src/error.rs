//! Error types for the document store adapter

use thiserror::Error;

/// Errors building collection endpoints
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EndpointError {
    /// The base URL does not parse
    #[error("Invalid base URL {url:?}: {reason}")]
    InvalidBase {
        /// The rejected input
        url: String,
        /// Parser message
        reason: String,
    },

    /// The base URL cannot carry a path (e.g. `mailto:`)
    #[error("Base URL {0:?} cannot be used as a collection base")]
    CannotBeABase(String),

    /// The collection name is empty or contains a path separator
    #[error("Invalid collection name {0:?}")]
    InvalidCollection(String),
}
