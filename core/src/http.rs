//! HTTP request descriptions.
//!
//! Reducers never perform I/O; they describe requests with [`HttpRequest`] and hand
//! them to an [`HttpClient`](crate::environment::HttpClient) inside an effect.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HTTP method of a described request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// The method's wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to be executed by an `HttpClient`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HttpRequest {
    /// Method
    pub method: HttpMethod,
    /// Absolute target URL
    pub url: String,
    /// JSON body, if any
    pub body: Option<serde_json::Value>,
}

impl HttpRequest {
    /// A request without a body
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
        }
    }

    /// `GET url`
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// `POST url` with a JSON body
    #[must_use]
    pub fn post(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self::new(HttpMethod::Post, url).with_body(body)
    }

    /// `DELETE url`
    #[must_use]
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, url)
    }

    /// Replace the body
    #[must_use]
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

impl std::fmt::Display for HttpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

/// Errors an `HttpClient` can report
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HttpError {
    /// The request never produced a response (connection, TLS, timeout, body read)
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status
    #[error("unexpected status {status}")]
    Status {
        /// HTTP status code
        status: u16,
    },

    /// The response body is not valid JSON
    #[error("failed to decode response body: {0}")]
    Decode(String),
}
