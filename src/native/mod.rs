//! libinput log handler entry point
//!
//! `log_handler` matches `libinput_log_handler`:
//!
//! ```c
//! void (*)(struct libinput *, enum libinput_log_priority, const char *format, va_list args);
//! ```
//!
//! It routes into the process-wide bridge. The variadic arguments are
//! formatted by the C library through a small shim (`vformat.c`): one
//! `vsnprintf` on a `va_copy` measures, a second one renders straight into
//! the buffer drawn from the bridge's `BufferAllocator`.

use crate::bridge::{self, Bridge, DropReason, MessageBuffer, Outcome};
use crate::logging::Priority;
use crate::registry::LogCallback;
use libc::{c_char, c_int, c_void, size_t};

/// `va_list` as received by the handler
///
/// On the supported ABIs (x86_64 and aarch64 SysV) a `va_list` parameter is
/// passed as a pointer, so it is carried here as an opaque one.
pub type RawVaList = *mut c_void;

/// Signature libinput expects for `libinput_log_set_handler`
pub type LogHandler = unsafe extern "C" fn(*mut c_void, Priority, *const c_char, RawVaList);

extern "C" {
    fn log_bridge_measure(format: *const c_char, args: RawVaList) -> c_int;

    fn log_bridge_render(
        buffer: *mut c_char,
        size: size_t,
        format: *const c_char,
        args: RawVaList,
    ) -> c_int;

    /// Call `handler` the way libinput does, with a `va_list` over the
    /// trailing arguments
    ///
    /// Lets C-side code (and tests) feed messages through a handler.
    pub fn log_bridge_emit(
        handler: LogHandler,
        libinput: *mut c_void,
        priority: Priority,
        format: *const c_char, ...
    );
}

/// Handler to install with `libinput_log_set_handler`
///
/// # Safety
///
/// Must only be called by libinput (or with the same guarantees): `format`
/// is a valid printf template and `args` a live `va_list` matching it.
pub unsafe extern "C" fn log_handler(
    _libinput: *mut c_void,
    priority: Priority,
    format: *const c_char,
    args: RawVaList,
) {
    // SAFETY: same contract as this function.
    unsafe { crate::global().log_va_list(priority, format, args) };
}

/// Entry point of the process-wide bridge, as a function pointer
pub fn entry_point() -> LogHandler {
    log_handler
}

impl Bridge {
    /// Deliver one libinput message through this bridge
    ///
    /// # Safety
    ///
    /// `format` is null or a NUL-terminated printf template, and `args` a
    /// live `va_list` matching it. `args` is only read through copies.
    pub unsafe fn log_va_list(&self, priority: Priority, format: *const c_char, args: RawVaList) {
        // SAFETY: forwarded.
        let _ = unsafe { self.dispatch_va_list(priority, format, args) };
    }

    pub(crate) unsafe fn dispatch_va_list(
        &self,
        priority: Priority,
        format: *const c_char,
        args: RawVaList,
    ) -> Outcome {
        let Some(callback) = self.registry().current() else {
            return Outcome::Idle;
        };
        // SAFETY: forwarded.
        match unsafe { self.try_deliver_va_list(&callback, priority, format, args) } {
            Ok(()) => Outcome::Delivered,
            Err(reason) => Outcome::Dropped(reason),
        }
    }

    unsafe fn try_deliver_va_list(
        &self,
        callback: &LogCallback,
        priority: Priority,
        format: *const c_char,
        args: RawVaList,
    ) -> Result<(), DropReason> {
        if format.is_null() {
            return Err(DropReason::NativeFormat);
        }

        // SAFETY: valid template and live `va_list`; the shim reads a copy.
        let measured = unsafe { log_bridge_measure(format, args) };
        let len = usize::try_from(measured).map_err(|_| DropReason::NativeFormat)?;

        let mut buffer =
            MessageBuffer::allocate(self.allocator(), len).ok_or(DropReason::Alloc { len })?;

        // SAFETY: `vsnprintf` never writes more than `size` bytes.
        let filled = unsafe {
            buffer.fill_raw(|ptr, size| log_bridge_render(ptr.cast(), size, format, args))
        };
        if !filled {
            return Err(DropReason::LengthMismatch);
        }
        let c_text = buffer.finish().ok_or(DropReason::InteriorNul)?;

        bridge::invoke_consumer(callback, priority, c_text)
    }
}
