// Status module for dispatching status events to registered handlers
//
// Long-running operations (downloads) report what they are doing through a
// `Hook`; whoever wants to react to those reports registers a handler for the
// status code on the `StatusHandler` that produced the hook.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Error raised by the dispatcher itself.
///
/// Failures of a registered handler are never wrapped in this type; they reach
/// the caller of the hook as the handler returned them.
#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    #[error("no handler registered for status {code}")]
    NoHandler { code: String },
}

/// A handler invoked with the payload of a status event
pub type Handler<P> = Arc<dyn Fn(P) -> anyhow::Result<()> + Send + Sync>;

type Registry<C, P> = Arc<Mutex<HashMap<C, Handler<P>>>>;

fn lock<C, P>(registry: &Registry<C, P>) -> MutexGuard<'_, HashMap<C, Handler<P>>> {
    // Handlers run outside the lock, so a poisoned map is still consistent
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Registry mapping status codes to handlers
pub struct StatusHandler<C, P> {
    handlers: Registry<C, P>,
}

impl<C, P> Default for StatusHandler<C, P>
where
    C: Eq + Hash + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<C, P> StatusHandler<C, P>
where
    C: Eq + Hash + Debug,
{
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Register `handler` for `code`, replacing any handler already registered for it
    pub fn register_handler<F>(&self, code: C, handler: F)
    where
        F: Fn(P) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        lock(&self.handlers).insert(code, Arc::new(handler));
    }

    /// Check whether a handler is registered for `code`
    pub fn is_registered(&self, code: &C) -> bool {
        lock(&self.handlers).contains_key(code)
    }

    /// Get a hook bound to this registry.
    ///
    /// The hook shares the registry rather than copying it, so handlers
    /// registered after this call are visible through it.
    pub fn get_hook(&self) -> Hook<C, P> {
        Hook {
            handlers: Arc::clone(&self.handlers),
        }
    }
}

/// Entry point used by emitters to report a status event
pub struct Hook<C, P> {
    handlers: Registry<C, P>,
}

impl<C, P> Clone for Hook<C, P> {
    fn clone(&self) -> Self {
        Self {
            handlers: Arc::clone(&self.handlers),
        }
    }
}

impl<C, P> Hook<C, P>
where
    C: Eq + Hash + Debug,
{
    /// Invoke the handler registered for `code` with `payload`.
    ///
    /// Returns `StatusError::NoHandler` when nothing is registered for `code`.
    /// An error returned by the handler is passed through untouched.
    pub fn call(&self, code: C, payload: P) -> anyhow::Result<()> {
        let handler = lock(&self.handlers).get(&code).cloned();

        match handler {
            Some(handler) => handler(payload),
            None => Err(StatusError::NoHandler {
                code: format!("{:?}", code),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    fn is_no_handler(err: &anyhow::Error) -> bool {
        matches!(
            err.downcast_ref::<StatusError>(),
            Some(StatusError::NoHandler { .. })
        )
    }

    #[test]
    fn test_handler_tuple() {
        let handler: StatusHandler<i32, (&str, &str)> = StatusHandler::new();

        handler.register_handler(2, |arguments| {
            assert_eq!(arguments, ("herp", "preh"));
            Ok(())
        });
        handler.register_handler(1, |arguments| {
            assert_eq!(arguments.0, "test");
            assert_eq!(arguments.1, "tset");
            Ok(())
        });

        let hook = handler.get_hook();
        hook.call(1, ("test", "tset")).unwrap();
        hook.call(2, ("herp", "preh")).unwrap();
    }

    #[test]
    fn test_handler_single_value() {
        let handler: StatusHandler<i32, &str> = StatusHandler::new();

        handler.register_handler(1, |arguments| {
            assert_eq!(arguments, "test");
            Ok(())
        });
        handler.register_handler(2, |arguments| {
            assert_eq!(arguments, "herp");
            Ok(())
        });

        let hook = handler.get_hook();
        hook.call(1, "test").unwrap();
        hook.call(2, "herp").unwrap();
    }

    #[test]
    fn test_each_handler_invoked_once() {
        let handler: StatusHandler<i32, String> = StatusHandler::new();
        let (ones, twos) = (counter(), counter());

        let seen = Arc::clone(&twos);
        handler.register_handler(2, move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let seen = Arc::clone(&ones);
        handler.register_handler(1, move |payload| {
            assert_eq!(payload, "one");
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let hook = handler.get_hook();
        hook.call(1, "one".to_string()).unwrap();
        assert_eq!(ones.load(Ordering::SeqCst), 1);
        assert_eq!(twos.load(Ordering::SeqCst), 0);

        hook.call(2, "two".to_string()).unwrap();
        assert_eq!(ones.load(Ordering::SeqCst), 1);
        assert_eq!(twos.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handler_overwrite() {
        let handler: StatusHandler<i32, Option<()>> = StatusHandler::new();
        let calls = counter();

        handler.register_handler(1, |_| panic!("overwritten handler must not run"));
        let seen = Arc::clone(&calls);
        handler.register_handler(1, move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        handler.get_hook().call(1, None).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handler_no_handler() {
        let handler: StatusHandler<i32, Option<()>> = StatusHandler::new();

        let err = handler.get_hook().call(1, None).unwrap_err();
        assert!(is_no_handler(&err));
        assert_eq!(err.to_string(), "no handler registered for status 1");
    }

    #[test]
    fn test_unregistered_code_fails_when_others_exist() {
        let handler: StatusHandler<i32, ()> = StatusHandler::new();
        handler.register_handler(1, |_| Ok(()));

        let hook = handler.get_hook();
        for code in [0, 2, -1, 42] {
            let err = hook.call(code, ()).unwrap_err();
            assert!(is_no_handler(&err), "code {} should have no handler", code);
        }
        assert!(hook.call(1, ()).is_ok());
    }

    #[test]
    fn test_hook_sees_later_registrations() {
        let handler: StatusHandler<i32, ()> = StatusHandler::new();
        let hook = handler.get_hook();

        assert!(hook.call(1, ()).is_err());
        handler.register_handler(1, |_| Ok(()));
        assert!(hook.call(1, ()).is_ok());
        assert!(handler.is_registered(&1));
        assert!(!handler.is_registered(&2));
    }

    #[test]
    fn test_handler_error_passes_through() {
        let handler: StatusHandler<i32, ()> = StatusHandler::new();
        handler.register_handler(1, |_| anyhow::bail!("disk full"));

        let err = handler.get_hook().call(1, ()).unwrap_err();
        assert!(!is_no_handler(&err));
        assert_eq!(err.to_string(), "disk full");
    }

    #[test]
    fn test_handler_can_register_from_inside_hook() {
        let handler = Arc::new(StatusHandler::<i32, ()>::new());

        let registry = Arc::clone(&handler);
        handler.register_handler(1, move |_| {
            registry.register_handler(2, |_| Ok(()));
            Ok(())
        });

        let hook = handler.get_hook();
        hook.call(1, ()).unwrap();
        hook.call(2, ()).unwrap();
    }
}
