//! Logging glue
//!
//! - `Priority` - libinput message severity
//! - `init_tracing` - subscriber setup for hosts without their own
//! - `tracing_callback` - consumer that re-emits libinput messages as `tracing` events

pub mod priority;

pub use priority::Priority;

use crate::constants::{DEFAULT_FILTER, TRACING_TARGET, VERBOSE_FILTER};
use crate::registry::LogCallback;
use tracing::Level;

/// Initialize a compact `tracing` subscriber
///
/// Call early, before any logging occurs. Set `verbose` to true for
/// debug-level output. Does nothing if a global subscriber is already set.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_file(false)
                .compact(),
        )
        .with(tracing_subscriber::EnvFilter::new(level))
        .try_init();
}

/// Consumer forwarding every message to `tracing` under the `libinput` target
pub fn tracing_callback() -> LogCallback {
    LogCallback::new(forward_to_tracing)
}

/// Emit one libinput message as a `tracing` event
///
/// libinput terminates its messages with '\n'; it is trimmed here.
pub fn forward_to_tracing(priority: Priority, message: &str) {
    let message = message.trim_end();
    match priority.tracing_level() {
        Level::ERROR => tracing::error!(target: TRACING_TARGET, "{}", message),
        Level::WARN => tracing::warn!(target: TRACING_TARGET, priority = priority.as_raw(), "{}", message),
        Level::INFO => tracing::info!(target: TRACING_TARGET, "{}", message),
        _ => tracing::debug!(target: TRACING_TARGET, "{}", message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::layer::SubscriberExt;

    /// Captures formatted events for one test
    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn captured<F: FnOnce()>(f: F) -> String {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .without_time()
                .with_writer(move || writer.clone()),
        );
        tracing::subscriber::with_default(subscriber, f);
        let bytes = capture.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_forward_error_level() {
        let out = captured(|| forward_to_tracing(Priority::ERROR, "event3: kernel bug\n"));
        assert!(out.contains("ERROR"));
        assert!(out.contains("libinput"));
        assert!(out.contains("event3: kernel bug"));
    }

    #[test]
    fn test_forward_unknown_priority_as_warn() {
        let out = captured(|| forward_to_tracing(Priority::from_raw(25), "odd"));
        assert!(out.contains("WARN"));
        assert!(out.contains("priority=25"));
    }

    #[test]
    fn test_tracing_callback_through_bridge() {
        let bridge = crate::Bridge::new();
        bridge.set_callback(Some(tracing_callback()));

        let out = captured(|| bridge.log(Priority::INFO, "%s added", &["event7".into()]));
        assert!(out.contains("INFO"));
        assert!(out.contains("event7 added"));
    }

    #[test]
    fn test_init_tracing_is_repeatable() {
        init_tracing(false);
        init_tracing(true);
    }
}
