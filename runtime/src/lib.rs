//! # Larder Runtime
//!
//! Runtime implementation for the Larder architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to reducers
//! - **Cancellation**: Effects registered under an `EffectId` can be aborted
//!   before they produce their action (debounce timers, superseded requests)
//!
//! ## Example
//!
//! ```ignore
//! use larder_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething).await?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use larder_core::{Effect, EffectId, Reducer};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{RwLock, watch};

/// Metric descriptions for observability
pub mod metrics;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        ///
        /// Some effects were still running when the timeout elapsed.
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for terminal action
        ///
        /// Returned by `send_and_wait_for` when the timeout expires before
        /// a matching action is received.
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`] to allow waiting for the effects of one action
/// to complete. Effects of actions those effects feed back are not included.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(Action::Start).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// // All effects from Action::Start are now complete (or cancelled)
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    /// Create a new effect handle and the tracking context used by the executor
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: tx,
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    ///
    /// Useful for initialization in loops where you need a `last_handle`.
    #[must_use]
    pub fn completed() -> Self {
        let (tx, rx) = watch::channel(());
        let _ = tx.send(());

        Self {
            effects: Arc::new(AtomicUsize::new(0)),
            completion: rx,
        }
    }

    /// Number of effects still running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }

    /// Wait for all effects to complete
    ///
    /// Returns when the effect counter reaches zero. Cancelled effects count
    /// as complete.
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                break;
            }
        }
    }

    /// Wait for all effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires before all effects complete.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: Effect tracking context passed through effect execution
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: watch::Sender<()>,
}

impl EffectTracking {
    /// Increment the effect counter (effect started)
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    /// Decrement the effect counter (effect completed)
    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements effect counter on drop
///
/// Ensures the effect counter is always decremented, even if the effect panics
/// or is aborted.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements an atomic counter on drop (for shutdown tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Internal: abort handles of in-flight effects, grouped by cancellation id
#[derive(Clone, Default)]
struct Cancellations(Arc<Mutex<HashMap<EffectId, Vec<futures::future::AbortHandle>>>>);

impl Cancellations {
    /// Register a new in-flight effect under `id`
    fn register(&self, id: &EffectId) -> futures::future::AbortRegistration {
        let (handle, registration) = futures::future::AbortHandle::new_pair();
        let mut map = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        let handles = map.entry(id.clone()).or_default();
        handles.retain(|h| !h.is_aborted());
        handles.push(handle);
        registration
    }

    /// Abort everything registered under `id`, returning how many handles were aborted
    fn cancel(&self, id: &EffectId) -> usize {
        let handles = {
            let mut map = self.0.lock().unwrap_or_else(PoisonError::into_inner);
            map.remove(id).unwrap_or_default()
        };
        for handle in &handles {
            handle.abort();
        }
        handles.len()
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicCounterGuard, AtomicUsize, Cancellations, DecrementGuard,
        Duration, Effect, EffectHandle, EffectId, EffectTracking, Ordering, Reducer, RwLock,
        StoreError,
    };
    use futures::future::{Abortable, Aborted};
    use std::future::Future;
    use tokio::sync::{broadcast, watch};

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent access)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop and cancellation)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    ///
    /// # Example
    ///
    /// ```ignore
    /// let store = Store::new(
    ///     IngredientsState::default(),
    ///     IngredientsReducer::new(config),
    ///     environment,
    /// );
    ///
    /// store.send(IngredientsAction::Login).await?;
    /// ```
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
        cancellations: Cancellations,
        /// Action broadcast channel for observing actions produced by effects.
        ///
        /// All actions produced by effects (e.g., request completions, elapsed
        /// timers) are broadcast to observers such as a rendering loop.
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// The action broadcast channel buffers 16 actions; use
        /// [`Store::with_broadcast_capacity`] for slow observers.
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_broadcast_capacity(initial_state, reducer, environment, 16)
        }

        /// Create a new Store with custom action broadcast capacity
        ///
        /// # Arguments
        ///
        /// - `initial_state`: The starting state for the store
        /// - `reducer`: The reducer implementation (business logic)
        /// - `environment`: Injected dependencies
        /// - `capacity`: Action broadcast channel capacity (number of actions buffered)
        #[must_use]
        pub fn with_broadcast_capacity(
            initial_state: S,
            reducer: R,
            environment: E,
            capacity: usize,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(capacity);
            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                cancellations: Cancellations::default(),
                action_broadcast,
            }
        }

        /// Number of effects currently running across all actions
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.pending_effects.load(Ordering::Acquire)
        }

        /// Initiate graceful shutdown of the store
        ///
        /// This method:
        /// 1. Sets the shutdown flag (rejecting new actions)
        /// 2. Waits for pending effects to complete (with timeout)
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before all
        /// pending effects complete.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            metrics::counter!("store.shutdown.initiated").increment(1);

            self.shutdown.store(true, Ordering::Release);

            let start = std::time::Instant::now();
            let poll_interval = Duration::from_millis(50);

            loop {
                let pending = self.pending_effects.load(Ordering::Acquire);

                if pending == 0 {
                    tracing::info!("All effects completed, shutdown successful");
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    tracing::error!(
                        pending_effects = pending,
                        "Shutdown timeout: {} effects still running",
                        pending
                    );
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tokio::time::sleep(poll_interval).await;
            }
        }

        /// Send an action to the store
        ///
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Starts the returned effects asynchronously
        /// 4. Effects may produce more actions (feedback loop)
        ///
        /// `send()` returns after starting effect execution, not completion.
        /// Concurrent `send()` calls serialize at the reducer level; effects
        /// complete in whatever order their I/O finishes.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        ///
        /// # Example
        ///
        /// ```ignore
        /// let mut handle = store.send(IngredientsAction::Login).await?;
        /// handle.wait().await;
        /// ```
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError>
        where
            R: Clone,
            E: Clone,
        {
            self.dispatch(action, false).await
        }

        /// Reduce `action` and start its effects
        ///
        /// When `observed` is set the action is broadcast once the reducer has
        /// applied it and the state lock is released, so observers reading
        /// state on receipt see its result.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        async fn dispatch(&self, action: A, observed: bool) -> Result<EffectHandle, StoreError>
        where
            R: Clone,
            E: Clone,
        {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            tracing::debug!("Processing action");
            metrics::counter!("store.commands.total").increment(1);

            let (handle, tracking) = EffectHandle::new();
            let broadcast = observed.then(|| action.clone());

            let effects = {
                let mut state = self.state.write().await;
                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();

                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut *state, action, &self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());

                tracing::trace!("Reducer completed, returned {} effects", effects.len());
                effects
            };

            if let Some(action) = broadcast {
                // No receivers is fine
                let _ = self.action_broadcast.send(action);
            }

            for effect in effects {
                self.execute_effect(effect, &tracking, None);
            }

            Ok(handle)
        }

        /// Send an action and wait for a matching action produced by its effects
        ///
        /// Subscribes to the action broadcast *before* sending, so a fast
        /// completion cannot be missed. The matching action has already been
        /// applied to the state when this returns.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`]: Timeout expired before matching action received
        /// - [`StoreError::ChannelClosed`]: Action broadcast channel closed
        /// - [`StoreError::ShutdownInProgress`]: Store is shutting down
        pub async fn send_and_wait_for<F>(
            &self,
            action: A,
            predicate: F,
            timeout: Duration,
        ) -> Result<A, StoreError>
        where
            R: Clone,
            E: Clone,
            F: Fn(&A) -> bool,
        {
            let mut rx = self.action_broadcast.subscribe();

            self.send(action).await?;

            tokio::time::timeout(timeout, async {
                loop {
                    match rx.recv().await {
                        Ok(action) if predicate(&action) => return Ok(action),
                        Ok(_) => {},
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Action observer lagged, {} actions skipped", skipped);
                        },
                        Err(broadcast::error::RecvError::Closed) => {
                            return Err(StoreError::ChannelClosed);
                        },
                    }
                }
            })
            .await
            .map_err(|_| StoreError::Timeout)?
        }

        /// Subscribe to all actions produced by effects
        ///
        /// Only actions produced by effects are broadcast (not the actions passed
        /// to [`Store::send`]), each after the reducer has applied it; actions
        /// rejected during shutdown are not broadcast. A lagging receiver gets
        /// `RecvError::Lagged`.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let count = store.state(|s| s.ingredients.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Execute an effect with tracking
        ///
        /// `scope` is the cancellation id of the nearest enclosing
        /// `Effect::Cancellable`; spawned work is registered under it.
        ///
        /// Effects are fire-and-forget: a panicking effect task is isolated in
        /// its own tokio task and the guards still release its tracking.
        fn execute_effect(&self, effect: Effect<A>, tracking: &EffectTracking, scope: Option<&EffectId>)
        where
            R: Clone,
            E: Clone,
        {
            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Future(fut) => {
                    tracing::trace!("Executing Effect::Future");
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    self.spawn_tracked(fut, tracking, scope);
                },
                Effect::Delay { duration, action } => {
                    tracing::trace!("Executing Effect::Delay (duration: {:?})", duration);
                    metrics::counter!("store.effects.executed", "type" => "delay").increment(1);
                    self.spawn_tracked(
                        async move {
                            tokio::time::sleep(duration).await;
                            Some(*action)
                        },
                        tracking,
                        scope,
                    );
                },
                Effect::Parallel(effects) => {
                    tracing::trace!("Executing Effect::Parallel with {} effects", effects.len());
                    metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
                    for effect in effects {
                        self.execute_effect(effect, tracking, scope);
                    }
                },
                Effect::Sequential(effects) => {
                    let effect_count = effects.len();
                    tracing::trace!("Executing Effect::Sequential with {} effects", effect_count);
                    metrics::counter!("store.effects.executed", "type" => "sequential").increment(1);

                    let store = self.clone();
                    let inner_scope = scope.cloned();
                    self.spawn_tracked(
                        async move {
                            for (idx, effect) in effects.into_iter().enumerate() {
                                tracing::trace!(
                                    "Executing sequential effect {} of {}",
                                    idx + 1,
                                    effect_count
                                );

                                let (sub_tx, mut sub_rx) = watch::channel(());
                                let sub_tracking = EffectTracking {
                                    counter: Arc::new(AtomicUsize::new(0)),
                                    notifier: sub_tx,
                                };

                                store.execute_effect(effect, &sub_tracking, inner_scope.as_ref());

                                while sub_tracking.counter.load(Ordering::SeqCst) > 0 {
                                    if sub_rx.changed().await.is_err() {
                                        break;
                                    }
                                }
                            }
                            tracing::trace!("Effect::Sequential completed");
                            None
                        },
                        tracking,
                        scope,
                    );
                },
                Effect::Cancellable { id, effect } => {
                    let cancelled = self.cancellations.cancel(&id);
                    tracing::trace!(id = %id, cancelled, "Executing Effect::Cancellable");
                    metrics::counter!("store.effects.executed", "type" => "cancellable").increment(1);
                    if cancelled > 0 {
                        metrics::counter!("store.effects.cancelled").increment(cancelled as u64);
                    }
                    self.execute_effect(*effect, tracking, Some(&id));
                },
                Effect::Cancel { id } => {
                    let cancelled = self.cancellations.cancel(&id);
                    tracing::debug!(id = %id, cancelled, "Cancelled in-flight effects");
                    metrics::counter!("store.effects.executed", "type" => "cancel").increment(1);
                    metrics::counter!("store.effects.cancelled").increment(cancelled as u64);
                },
            }
        }

        /// Spawn an effect future, feeding the action it produces back into the store
        ///
        /// Only the future itself is abortable. Once it has produced an action,
        /// feeding that action back always completes.
        fn spawn_tracked<F>(&self, fut: F, tracking: &EffectTracking, scope: Option<&EffectId>)
        where
            F: Future<Output = Option<A>> + Send + 'static,
            R: Clone,
            E: Clone,
        {
            tracking.increment();
            let guard = DecrementGuard(tracking.clone());

            self.pending_effects.fetch_add(1, Ordering::SeqCst);
            let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

            let registration = scope.map(|id| (id.clone(), self.cancellations.register(id)));
            let store = self.clone();

            tokio::spawn(async move {
                let _guard = guard;
                let _pending_guard = pending_guard;

                let produced = match registration {
                    Some((id, registration)) => match Abortable::new(fut, registration).await {
                        Ok(produced) => produced,
                        Err(Aborted) => {
                            tracing::trace!(id = %id, "Effect cancelled before completion");
                            return;
                        },
                    },
                    None => fut.await,
                };

                if let Some(action) = produced {
                    tracing::trace!("Effect produced an action, sending to store");
                    let _ = store.dispatch(action, true).await;
                } else {
                    tracing::trace!("Effect completed with no action");
                }
            });
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
                cancellations: self.cancellations.clone(),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}

// Re-export for convenience
pub use store::Store;
