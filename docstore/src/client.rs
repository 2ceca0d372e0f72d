//! `reqwest` implementation of [`HttpClient`]

use larder_core::environment::HttpClient;
use larder_core::http::{HttpError, HttpMethod, HttpRequest};
use reqwest::{Client, Method, header};
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Document store client
///
/// Sends bodies as JSON with `Content-Type: application/json`, treats any
/// non-2xx status as an error, and decodes the response body as JSON. An empty
/// body decodes to `null`.
///
/// There is no timeout unless one is set with [`DocStoreClient::with_timeout`].
#[derive(Clone, Debug, Default)]
pub struct DocStoreClient {
    client: Client,
    timeout: Option<Duration>,
}

impl DocStoreClient {
    /// Create a client with a fresh connection pool and no timeout
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client that shares an existing connection pool
    #[must_use]
    pub const fn from_client(client: Client) -> Self {
        Self {
            client,
            timeout: None,
        }
    }

    /// Fail requests that take longer than `timeout`
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    async fn send(&self, request: HttpRequest) -> Result<Value, HttpError> {
        tracing::debug!(request = %request, "Sending document store request");

        let mut builder = self.client.request(method(request.method), &request.url);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(body) = &request.body {
            builder = builder
                .header(header::CONTENT_TYPE, "application/json")
                .json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| HttpError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), request = %request, "Non-success status");
            return Err(HttpError::Status {
                status: status.as_u16(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| HttpError::Transport(e.to_string()))?;

        decode(&text)
    }
}

impl HttpClient for DocStoreClient {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Value, HttpError>> + Send + '_>> {
        Box::pin(self.send(request))
    }
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn decode(text: &str) -> Result<Value, HttpError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|e| HttpError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_body_decodes_to_null() {
        assert_eq!(decode(""), Ok(Value::Null));
        assert_eq!(decode("  \n"), Ok(Value::Null));
        assert_eq!(decode("null"), Ok(Value::Null));
    }

    #[test]
    fn json_body_decodes() {
        assert_eq!(decode(r#"{"name":"k9"}"#), Ok(json!({"name": "k9"})));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(decode("<html>"), Err(HttpError::Decode(_))));
    }

    #[test]
    fn methods_map_one_to_one() {
        assert_eq!(method(HttpMethod::Delete), Method::DELETE);
        assert_eq!(method(HttpMethod::Post), Method::POST);
    }
}
