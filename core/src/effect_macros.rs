//! Declarative macros for ergonomic effect construction
//!
//! These macros reduce boilerplate when creating `Effect` variants, particularly
//! for async requests and debounce timers.

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust,ignore
/// use larder_core::async_effect;
///
/// async_effect! {
///     let payload = http.execute(request).await.ok()?;
///     Some(PantryAction::Loaded { payload })
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

/// Create an `Effect::Delay` for scheduling delayed actions
///
/// # Example
///
/// ```rust,ignore
/// use larder_core::delay;
/// use std::time::Duration;
///
/// delay! {
///     duration: Duration::from_millis(500),
///     action: SearchAction::DebounceElapsed { text }
/// }
/// ```
#[macro_export]
macro_rules! delay {
    (
        duration: $duration:expr,
        action: $action:expr
    ) => {
        $crate::effect::Effect::Delay {
            duration: $duration,
            action: ::std::boxed::Box::new($action),
        }
    };
}

/// Create an `Effect::Cancellable` that replaces anything in flight under the same id
///
/// Combined with [`delay!`] this is a debounce: every new effect restarts the timer.
///
/// # Example
///
/// ```rust,ignore
/// use larder_core::{cancellable, delay};
///
/// cancellable! {
///     id: "search-debounce",
///     effect: delay! {
///         duration: Duration::from_millis(500),
///         action: SearchAction::DebounceElapsed { text }
///     }
/// }
/// ```
#[macro_export]
macro_rules! cancellable {
    (
        id: $id:expr,
        effect: $effect:expr
    ) => {
        $crate::effect::Effect::Cancellable {
            id: ::std::convert::Into::into($id),
            effect: ::std::boxed::Box::new($effect),
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::effect::{Effect, EffectId};
    use std::time::Duration;

    #[derive(Clone, Debug)]
    enum TestAction {
        Loaded { value: i32 },
        DebounceElapsed,
    }

    #[test]
    fn test_async_effect_macro() {
        let effect = async_effect! {
            Some(TestAction::Loaded { value: 42 })
        };

        assert!(matches!(effect, Effect::Future(_)));
    }

    #[test]
    fn test_delay_macro() {
        let effect = delay! {
            duration: Duration::from_millis(500),
            action: TestAction::DebounceElapsed
        };

        assert!(matches!(effect, Effect::Delay { .. }));
    }

    #[test]
    fn test_cancellable_macro() {
        let effect = cancellable! {
            id: "search-debounce",
            effect: delay! {
                duration: Duration::from_millis(500),
                action: TestAction::DebounceElapsed
            }
        };

        match effect {
            Effect::Cancellable { id, effect } => {
                assert_eq!(id, EffectId::new("search-debounce"));
                assert!(matches!(*effect, Effect::Delay { .. }));
            },
            other => unreachable!("expected cancellable, got {other:?}"),
        }
    }
}
