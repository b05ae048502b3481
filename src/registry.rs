//! Single-slot callback registry
//!
//! Holds at most one consumer callback. The bridge snapshots the slot once
//! per log event; only explicit `set` calls write to it.

use crate::logging::Priority;
use parking_lot::RwLock;
use std::ffi::{c_char, CStr};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// C consumer: receives the priority and a NUL-terminated message
pub type NativeCallback = unsafe extern "C" fn(Priority, *const c_char);

/// The registered consumer of formatted messages
#[derive(Clone)]
pub enum LogCallback {
    /// Rust closure receiving the message as `&str`
    Closure(Arc<dyn Fn(Priority, &str) + Send + Sync>),
    /// C function receiving a pointer valid only for the duration of the call
    Native(NativeCallback),
}

impl LogCallback {
    /// Wrap a closure
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(Priority, &str) + Send + Sync + 'static,
    {
        Self::Closure(Arc::new(callback))
    }

    /// Wrap a C function pointer
    ///
    /// # Safety
    ///
    /// `callback` must be safe to call from any thread with any valid
    /// NUL-terminated string, and must not keep the pointer after returning.
    pub unsafe fn native(callback: NativeCallback) -> Self {
        Self::Native(callback)
    }

    /// Invoke with a message whose text and C view share one buffer
    pub(crate) fn invoke(&self, priority: Priority, text: &str, c_text: &CStr) {
        match self {
            Self::Closure(callback) => callback(priority, text),
            // SAFETY: upheld by the contract of `LogCallback::native`;
            // `c_text` outlives the call.
            Self::Native(callback) => unsafe { callback(priority, c_text.as_ptr()) },
        }
    }

    pub(crate) fn is_native(&self) -> bool {
        matches!(self, Self::Native(_))
    }
}

impl fmt::Debug for LogCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closure(_) => f.write_str("LogCallback::Closure(..)"),
            Self::Native(callback) => write!(f, "LogCallback::Native({:p})", *callback as *const ()),
        }
    }
}

/// Process- or instance-wide slot for the current consumer
#[derive(Default)]
pub struct CallbackRegistry {
    slot: RwLock<Option<LogCallback>>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the consumer; `None` clears it
    pub fn set(&self, callback: Option<LogCallback>) {
        match &callback {
            Some(cb) => debug!(native = cb.is_native(), "log callback registered"),
            None => debug!("log callback cleared"),
        }
        *self.slot.write() = callback;
    }

    /// Snapshot of the current consumer
    ///
    /// The lock is released before this returns, so the consumer may call
    /// `set` while it runs.
    pub fn current(&self) -> Option<LogCallback> {
        self.slot.read().clone()
    }

    pub fn is_set(&self) -> bool {
        self.slot.read().is_some()
    }
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("slot", &*self.slot.read())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(counter: &Arc<AtomicUsize>) -> LogCallback {
        let counter = counter.clone();
        LogCallback::new(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    fn fire(registry: &CallbackRegistry) {
        if let Some(cb) = registry.current() {
            cb.invoke(Priority::INFO, "x", c"x");
        }
    }

    #[test]
    fn test_empty_by_default() {
        let registry = CallbackRegistry::new();
        assert!(!registry.is_set());
        assert!(registry.current().is_none());
    }

    #[test]
    fn test_holds_last_value_set() {
        let registry = CallbackRegistry::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        registry.set(Some(counting(&first)));
        registry.set(Some(counting(&second)));
        fire(&registry);

        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_clear() {
        let registry = CallbackRegistry::new();
        registry.set(Some(LogCallback::new(|_, _| {})));
        assert!(registry.is_set());

        registry.set(None);
        assert!(!registry.is_set());
    }

    #[test]
    fn test_snapshot_survives_replacement() {
        let registry = CallbackRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));
        registry.set(Some(counting(&hits)));

        let snapshot = registry.current().unwrap();
        registry.set(None);
        snapshot.invoke(Priority::DEBUG, "late", c"late");

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_callback_may_reregister_while_running() {
        let registry = Arc::new(CallbackRegistry::new());
        let inner = registry.clone();
        registry.set(Some(LogCallback::new(move |_, _| inner.set(None))));

        fire(&registry);
        assert!(!registry.is_set());
    }

    #[test]
    fn test_debug_format() {
        let registry = CallbackRegistry::new();
        assert!(format!("{:?}", registry).contains("None"));
        registry.set(Some(LogCallback::new(|_, _| {})));
        assert!(format!("{:?}", registry).contains("Closure"));
    }
}
