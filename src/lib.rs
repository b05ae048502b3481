//! libinput log bridge
//!
//! libinput reports diagnostics through a printf-style handler taking a
//! `va_list`. This crate installs one such handler and turns each message
//! into a single formatted string delivered to one registered callback:
//!
//! ```ignore
//! use libinput_log_bridge::{get_log_handler_entry_point, register_log_callback, LogCallback};
//!
//! register_log_callback(Some(LogCallback::new(|priority, msg| {
//!     eprint!("[{}] {}", priority, msg);
//! })));
//! unsafe { libinput_log_set_handler(li, Some(get_log_handler_entry_point())) };
//! ```
//!
//! The callback can be swapped or cleared at any time without touching
//! libinput again. Messages that cannot be rendered, or for which no buffer
//! can be allocated, are dropped silently.
//!
//! Independent `Bridge` instances can be created for Rust-side producers
//! (`Bridge::log` takes a printf template and `Arg` slice). On unix,
//! `Bridge::log_va_list` accepts a C template and `va_list` directly.

pub mod bridge;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod printf;
pub mod registry;

#[cfg(unix)]
pub mod native;

pub use bridge::{Bridge, BufferAllocator, Render, SystemAllocator};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::{init_tracing, tracing_callback, Priority};
pub use printf::{Arg, Printf};
pub use registry::{CallbackRegistry, LogCallback, NativeCallback};

#[cfg(unix)]
pub use native::LogHandler;

use std::sync::OnceLock;

/// The process-wide bridge used by the native handler
pub fn global() -> &'static Bridge {
    static GLOBAL: OnceLock<Bridge> = OnceLock::new();
    GLOBAL.get_or_init(Bridge::new)
}

/// Install or clear the process-wide consumer
pub fn register_log_callback(callback: Option<LogCallback>) {
    global().set_callback(callback);
}

/// Handler to pass to `libinput_log_set_handler`
///
/// Always the same function; it is not the registered callback.
#[cfg(unix)]
pub fn get_log_handler_entry_point() -> LogHandler {
    native::entry_point()
}
