//! Format bridge
//!
//! Turns one log event into one formatted message and hands it to the
//! registered consumer:
//!
//! 1. Snapshot the registry; nothing registered means nothing else happens
//! 2. Measure: render into a zero-capacity counter
//! 3. Allocate exactly `len + 1` bytes
//! 4. Render again into the buffer
//! 5. Invoke the consumer
//! 6. Release the buffer (on every path once step 3 succeeded)
//!
//! Every failure drops the event silently. Nothing is reported back to the
//! caller and nothing is logged about the drop.
//!
//! Consumers taking `&str` see invalid UTF-8 (possible only from native
//! `va_list` sources) replaced by U+FFFD; native consumers get the bytes.

mod buffer;
mod render;

pub use buffer::{BufferAllocator, SystemAllocator};
pub use render::Render;

pub(crate) use buffer::MessageBuffer;

use crate::logging::Priority;
use crate::printf::{Arg, Printf, RenderError};
use crate::registry::{CallbackRegistry, LogCallback};
use buffer::ByteCounter;
use std::ffi::CStr;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// Result of one bridge invocation (never surfaced outside the crate)
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// Consumer was invoked once with the rendered message
    Delivered,
    /// No consumer registered
    Idle,
    /// Event discarded
    Dropped(DropReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DropReason {
    /// Measuring pass failed
    Render(RenderError),
    /// No buffer for `len + 1` bytes
    Alloc { len: usize },
    /// Second pass failed or produced a different length
    LengthMismatch,
    /// Message contains a NUL byte
    InteriorNul,
    /// Consumer panicked
    CallbackPanicked,
    /// `vsnprintf` failed or no template was given
    #[cfg(unix)]
    NativeFormat,
}

/// Registry plus buffer source for one bridge instance
pub struct Bridge {
    registry: CallbackRegistry,
    allocator: Box<dyn BufferAllocator>,
}

impl Bridge {
    pub fn new() -> Self {
        Self::with_allocator(SystemAllocator)
    }

    /// Bridge drawing message buffers from `allocator`
    pub fn with_allocator<A: BufferAllocator + 'static>(allocator: A) -> Self {
        Self {
            registry: CallbackRegistry::new(),
            allocator: Box::new(allocator),
        }
    }

    pub fn registry(&self) -> &CallbackRegistry {
        &self.registry
    }

    pub(crate) fn allocator(&self) -> &dyn BufferAllocator {
        self.allocator.as_ref()
    }

    /// Replace or clear the consumer
    pub fn set_callback(&self, callback: Option<LogCallback>) {
        self.registry.set(callback);
    }

    /// Render a printf template with `args` and deliver it
    pub fn log(&self, priority: Priority, template: &str, args: &[Arg<'_>]) {
        self.emit(priority, &Printf::new(template, args));
    }

    /// Deliver `format_args!` output
    pub fn log_fmt(&self, priority: Priority, args: fmt::Arguments<'_>) {
        self.emit(priority, &args);
    }

    /// Deliver any renderable source
    pub fn emit<R: Render + ?Sized>(&self, priority: Priority, source: &R) {
        let _ = self.dispatch(priority, source);
    }

    pub(crate) fn dispatch<R: Render + ?Sized>(&self, priority: Priority, source: &R) -> Outcome {
        match self.registry.current() {
            Some(callback) => self.deliver(&callback, priority, source),
            None => Outcome::Idle,
        }
    }

    /// Steps 2-6 for an already snapshotted consumer
    pub(crate) fn deliver<R: Render + ?Sized>(
        &self,
        callback: &LogCallback,
        priority: Priority,
        source: &R,
    ) -> Outcome {
        match self.try_deliver(callback, priority, source) {
            Ok(()) => Outcome::Delivered,
            Err(reason) => Outcome::Dropped(reason),
        }
    }

    fn try_deliver<R: Render + ?Sized>(
        &self,
        callback: &LogCallback,
        priority: Priority,
        source: &R,
    ) -> Result<(), DropReason> {
        let mut counter = ByteCounter::default();
        source.render(&mut counter).map_err(DropReason::Render)?;
        let len = counter.len;

        let mut buffer = MessageBuffer::allocate(self.allocator.as_ref(), len)
            .ok_or(DropReason::Alloc { len })?;

        source
            .render(&mut buffer)
            .map_err(|_| DropReason::LengthMismatch)?;

        if buffer.written().len() != len {
            return Err(DropReason::LengthMismatch);
        }
        let c_text = buffer.finish().ok_or(DropReason::InteriorNul)?;

        invoke_consumer(callback, priority, c_text)
    }
}

/// Step 5; a panicking consumer counts as a drop
pub(crate) fn invoke_consumer(
    callback: &LogCallback,
    priority: Priority,
    c_text: &CStr,
) -> Result<(), DropReason> {
    let text = String::from_utf8_lossy(c_text.to_bytes());
    panic::catch_unwind(AssertUnwindSafe(|| callback.invoke(priority, &text, c_text)))
        .map_err(|_| DropReason::CallbackPanicked)
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bridge")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
