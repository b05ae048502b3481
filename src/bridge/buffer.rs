//! Message buffers
//!
//! - `BufferAllocator`: where message buffers come from and go back to
//! - `MessageBuffer`: one event's owned buffer, released exactly once on drop
//! - `ByteCounter`: zero-capacity sink for the measuring pass

use std::ffi::CStr;
use std::fmt;

#[cfg(unix)]
use std::ffi::c_int;

/// Source of message buffers
///
/// `allocate` returns an empty `Vec` able to hold `capacity` bytes, or `None`
/// when memory is unavailable. Every buffer handed out comes back through
/// `release` exactly once.
pub trait BufferAllocator: Send + Sync {
    fn allocate(&self, capacity: usize) -> Option<Vec<u8>>;

    fn release(&self, buffer: Vec<u8>) {
        drop(buffer);
    }
}

/// Global-allocator backed buffers (fallible reservation, no abort on OOM)
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAllocator;

impl BufferAllocator for SystemAllocator {
    fn allocate(&self, capacity: usize) -> Option<Vec<u8>> {
        let mut buffer = Vec::new();
        buffer.try_reserve_exact(capacity).ok()?;
        Some(buffer)
    }
}

/// Counts the bytes a render would produce without storing them
#[derive(Debug, Default)]
pub(crate) struct ByteCounter {
    pub len: usize,
}

impl fmt::Write for ByteCounter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.len = self.len.checked_add(s.len()).ok_or(fmt::Error)?;
        Ok(())
    }
}

/// One event's message: `len` text bytes plus a NUL terminator
pub(crate) struct MessageBuffer<'a> {
    bytes: Option<Vec<u8>>,
    len: usize,
    allocator: &'a dyn BufferAllocator,
}

impl<'a> MessageBuffer<'a> {
    /// Reserve room for `len` bytes and the terminator
    pub fn allocate(allocator: &'a dyn BufferAllocator, len: usize) -> Option<Self> {
        let bytes = allocator.allocate(len.checked_add(1)?)?;
        Some(Self {
            bytes: Some(bytes),
            len,
            allocator,
        })
    }

    /// Text written so far
    pub fn written(&self) -> &[u8] {
        self.bytes.as_deref().unwrap_or_default()
    }

    /// Let a C-style writer fill the empty buffer
    ///
    /// `write` gets the buffer start and its size (`len + 1`, terminator
    /// included) and returns the length it produced, as `vsnprintf` does.
    /// Returns `false` unless that length is exactly `len`.
    ///
    /// # Safety
    ///
    /// `write` must not write more bytes than the size it is given.
    #[cfg(unix)]
    pub unsafe fn fill_raw<F>(&mut self, write: F) -> bool
    where
        F: FnOnce(*mut u8, usize) -> c_int,
    {
        let size = self.len + 1;
        let Some(bytes) = self.bytes.as_mut() else {
            return false;
        };
        if !bytes.is_empty() || bytes.capacity() < size {
            return false;
        }

        let produced = write(bytes.as_mut_ptr(), size);
        if usize::try_from(produced) != Ok(self.len) {
            return false;
        }
        // SAFETY: the writer initialized `len` bytes (and the terminator)
        // inside the reserved capacity.
        unsafe { bytes.set_len(self.len) };
        true
    }

    /// Terminate and expose the message
    ///
    /// Returns `None` unless exactly `len` bytes were written and none of
    /// them is NUL.
    pub fn finish(&mut self) -> Option<&CStr> {
        let bytes = self.bytes.as_mut()?;
        if bytes.len() != self.len || bytes.contains(&0) {
            return None;
        }
        bytes.push(0);
        CStr::from_bytes_with_nul(bytes).ok()
    }
}

impl fmt::Write for MessageBuffer<'_> {
    /// Refuses to grow past the measured length
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes = self.bytes.as_mut().ok_or(fmt::Error)?;
        if bytes.len() + s.len() > self.len {
            return Err(fmt::Error);
        }
        bytes.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

impl Drop for MessageBuffer<'_> {
    fn drop(&mut self) {
        if let Some(bytes) = self.bytes.take() {
            self.allocator.release(bytes);
        }
    }
}
