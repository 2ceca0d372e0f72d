//! # Larder Testing
//!
//! Testing utilities and helpers for the Larder architecture.
//!
//! This crate provides:
//! - [`MockHttpClient`]: scripted responses per route, recorded requests, and
//!   responses held back until the test releases them (for ordering races)
//! - [`ReducerTest`]: Given-When-Then builder for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use larder_testing::MockHttpClient;
//!
//! let http = Arc::new(MockHttpClient::new());
//! http.respond(HttpMethod::Get, "http://db/ingredients.json", Ok(json!({})));
//!
//! let store = Store::new(state, reducer, environment_with(http.clone()));
//! store.send(Action::Login).await?;
//! assert_eq!(http.requests().len(), 1);
//! ```


/// Mock implementations of Environment traits
pub mod mocks {
    use larder_core::environment::HttpClient;
    use larder_core::http::{HttpError, HttpMethod, HttpRequest};
    use serde_json::Value;
    use std::collections::{HashMap, VecDeque};
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::{Mutex, MutexGuard, PoisonError};
    use tokio::sync::oneshot;

    type Outcome = Result<Value, HttpError>;

    struct Scripted {
        outcome: Outcome,
        gate: Option<oneshot::Receiver<()>>,
    }

    /// Releases a held response
    ///
    /// Dropping it without calling [`Release::release`] also lets the
    /// response through.
    #[derive(Debug)]
    pub struct Release(oneshot::Sender<()>);

    impl Release {
        /// Let the held response complete
        pub fn release(self) {
            let _ = self.0.send(());
        }
    }

    /// Scripted `HttpClient` for tests
    ///
    /// Outcomes are queued per `(method, url)` and consumed in order. A route
    /// with nothing queued answers with the fallback outcome, which defaults to
    /// a 404 status error. Every executed request is recorded.
    pub struct MockHttpClient {
        routes: Mutex<HashMap<(HttpMethod, String), VecDeque<Scripted>>>,
        fallback: Outcome,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl Default for MockHttpClient {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockHttpClient {
        /// An empty mock; unscripted routes answer `404`
        #[must_use]
        pub fn new() -> Self {
            Self::with_fallback(Err(HttpError::Status { status: 404 }))
        }

        /// An empty mock answering unscripted routes with `fallback`
        #[must_use]
        pub fn with_fallback(fallback: Outcome) -> Self {
            Self {
                routes: Mutex::new(HashMap::new()),
                fallback,
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Queue an outcome for the next request to `method url`
        pub fn respond(&self, method: HttpMethod, url: impl Into<String>, outcome: Outcome) {
            self.push(method, url.into(), Scripted { outcome, gate: None });
        }

        /// Queue an outcome that is only delivered once the returned handle is released
        #[must_use]
        pub fn respond_when_released(
            &self,
            method: HttpMethod,
            url: impl Into<String>,
            outcome: Outcome,
        ) -> Release {
            let (tx, rx) = oneshot::channel();
            self.push(
                method,
                url.into(),
                Scripted {
                    outcome,
                    gate: Some(rx),
                },
            );
            Release(tx)
        }

        /// All requests executed so far, in call order
        #[must_use]
        pub fn requests(&self) -> Vec<HttpRequest> {
            lock(&self.requests).clone()
        }

        /// Requests executed so far with the given method
        #[must_use]
        pub fn requests_with(&self, method: HttpMethod) -> Vec<HttpRequest> {
            lock(&self.requests)
                .iter()
                .filter(|request| request.method == method)
                .cloned()
                .collect()
        }

        fn push(&self, method: HttpMethod, url: String, scripted: Scripted) {
            lock(&self.routes)
                .entry((method, url))
                .or_default()
                .push_back(scripted);
        }

        fn next(&self, request: &HttpRequest) -> Option<Scripted> {
            lock(&self.routes)
                .get_mut(&(request.method, request.url.clone()))
                .and_then(VecDeque::pop_front)
        }
    }

    impl HttpClient for MockHttpClient {
        fn execute(
            &self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<Value, HttpError>> + Send + '_>> {
            tracing::debug!(request = %request, "Mock request");
            let scripted = self.next(&request);
            lock(&self.requests).push(request);

            Box::pin(async move {
                match scripted {
                    Some(Scripted { outcome, gate }) => {
                        if let Some(gate) = gate {
                            let _ = gate.await;
                        }
                        outcome
                    },
                    None => self.fallback.clone(),
                }
            })
        }
    }

    fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Test helpers and utilities
pub mod helpers {
    /// Install a test-writer `tracing` subscriber for the current thread
    ///
    /// Returns a guard; log output is captured per test while it lives.
    #[must_use]
    pub fn test_tracing() -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }
}

// Re-export commonly used items
pub use mocks::{MockHttpClient, Release};
pub use reducer_test::{ReducerTest, assertions};
