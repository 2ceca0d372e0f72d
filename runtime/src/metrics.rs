//! Metric descriptions for observability and monitoring.
//!
//! The runtime records through the [`metrics`] facade:
//! - Store commands and reducer execution time
//! - Effect execution by type, and cancellations
//! - Request completions by outcome (recorded by the request tracker)
//! - Shutdown activity
//!
//! No exporter is installed here. Applications that want the numbers install a
//! recorder of their choice and call [`register_metrics`] once at startup so the
//! recorder knows units and descriptions.
//!
//! # Example
//!
//! ```ignore
//! larder_runtime::metrics::register_metrics();
//! ```

use metrics::{Unit, describe_counter, describe_histogram};

// Re-export metrics macros for use in other modules
pub use metrics::{counter, histogram};

/// Register all metric descriptions.
///
/// Calling this more than once is harmless; later descriptions overwrite
/// earlier ones.
pub fn register_metrics() {
    // Store
    describe_counter!(
        "store.commands.total",
        Unit::Count,
        "Total number of actions sent to stores"
    );
    describe_histogram!(
        "store.reducer.duration_seconds",
        Unit::Seconds,
        "Time spent inside reducers"
    );
    describe_counter!(
        "store.shutdown.initiated",
        Unit::Count,
        "Number of graceful shutdowns started"
    );
    describe_counter!(
        "store.shutdown.rejected_actions",
        Unit::Count,
        "Actions rejected because the store was shutting down"
    );

    // Effects
    describe_counter!(
        "store.effects.executed",
        Unit::Count,
        "Effects executed, labelled by effect type"
    );
    describe_counter!(
        "store.effects.cancelled",
        Unit::Count,
        "In-flight effects aborted by a cancellation id"
    );

    // Requests
    describe_counter!(
        "request.completed",
        Unit::Count,
        "Tracked requests completed, labelled by outcome (success or failure)"
    );
}
