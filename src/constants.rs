//! Crate-wide constants
//!
//! Centralized constants to avoid duplication and ensure consistency.

// =============================================================================
// libinput priorities (enum libinput_log_priority)
// =============================================================================

/// LIBINPUT_LOG_PRIORITY_DEBUG
pub const PRIORITY_DEBUG: u32 = 10;

/// LIBINPUT_LOG_PRIORITY_INFO
pub const PRIORITY_INFO: u32 = 20;

/// LIBINPUT_LOG_PRIORITY_ERROR
pub const PRIORITY_ERROR: u32 = 30;

// =============================================================================
// Tracing
// =============================================================================

/// Target used when forwarding libinput messages to `tracing`
pub const TRACING_TARGET: &str = "libinput";

/// Filter directive used by `init_tracing(true)`
pub const VERBOSE_FILTER: &str = "debug";

/// Filter directive used by `init_tracing(false)`
pub const DEFAULT_FILTER: &str = "warn";

// =============================================================================
// printf
// =============================================================================

/// Precision used by `%f`, `%e` and `%g` when none is given
pub const DEFAULT_FLOAT_PRECISION: usize = 6;

/// Largest width or precision accepted (C's `INT_MAX`)
pub const MAX_COUNT: usize = i32::MAX as usize;

/// Fraction digits past which an `f64` has only zeros left
///
/// A finite double has at most 1074 significant fraction digits; anything
/// requested beyond this is written as padding instead of formatted.
pub const EXACT_FLOAT_DIGITS: usize = 1100;
