//! Integration tests for the native handler, called with a real `va_list`
//!
//! `log_bridge_emit` builds the `va_list` in C and calls the handler the
//! way libinput does. Every test drives the process-wide bridge, so each
//! one holds `GLOBAL_LOCK`.

#![cfg(unix)]

use libinput_log_bridge::native::log_bridge_emit;
use libinput_log_bridge::{get_log_handler_entry_point, register_log_callback, LogCallback, Priority};
use parking_lot::Mutex;
use std::ffi::{c_int, CStr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

static GLOBAL_LOCK: Mutex<()> = parking_lot::const_mutex(());

type Seen = Arc<Mutex<Vec<(Priority, String)>>>;

fn recorder() -> (LogCallback, Seen) {
    let seen: Seen = Arc::default();
    let sink = seen.clone();
    let callback = LogCallback::new(move |priority, msg| {
        sink.lock().push((priority, msg.to_string()));
    });
    (callback, seen)
}

// =============================================================================
// Entry point
// =============================================================================

#[test]
fn test_disconnect_through_entry_point() {
    let _guard = GLOBAL_LOCK.lock();
    let (callback, seen) = recorder();
    register_log_callback(Some(callback));

    unsafe {
        log_bridge_emit(
            get_log_handler_entry_point(),
            std::ptr::null_mut(),
            Priority::ERROR,
            c"disconnect: %s".as_ptr(),
            c"device0".as_ptr(),
        );
    }
    register_log_callback(None);

    assert_eq!(
        *seen.lock(),
        vec![(Priority::ERROR, "disconnect: device0".to_string())]
    );
}

#[test]
fn test_libinput_style_line() {
    let _guard = GLOBAL_LOCK.lock();
    let (callback, seen) = recorder();
    register_log_callback(Some(callback));

    unsafe {
        log_bridge_emit(
            get_log_handler_entry_point(),
            std::ptr::null_mut(),
            Priority::INFO,
            c"%-7s - %s: device is a touchpad\n".as_ptr(),
            c"event5".as_ptr(),
            c"SynPS/2 Synaptics TouchPad".as_ptr(),
        );
    }
    register_log_callback(None);

    assert_eq!(
        seen.lock()[0].1,
        "event5  - SynPS/2 Synaptics TouchPad: device is a touchpad\n"
    );
}

#[test]
fn test_no_callback_is_noop() {
    let _guard = GLOBAL_LOCK.lock();
    register_log_callback(None);

    unsafe {
        log_bridge_emit(
            get_log_handler_entry_point(),
            std::ptr::null_mut(),
            Priority::INFO,
            c"event%d: ready".as_ptr(),
            2 as c_int,
        );
    }
}

#[test]
fn test_cleared_callback_stops_delivery() {
    let _guard = GLOBAL_LOCK.lock();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    register_log_callback(Some(LogCallback::new(move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
    })));

    let handler = get_log_handler_entry_point();
    unsafe {
        log_bridge_emit(handler, std::ptr::null_mut(), Priority::INFO, c"one".as_ptr());
    }
    register_log_callback(None);
    unsafe {
        log_bridge_emit(handler, std::ptr::null_mut(), Priority::INFO, c"two".as_ptr());
    }

    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

// =============================================================================
// Input the C library accepts but Rust strings do not
// =============================================================================

#[test]
fn test_non_utf8_device_name_is_delivered() {
    let _guard = GLOBAL_LOCK.lock();
    let (callback, seen) = recorder();
    register_log_callback(Some(callback));
    let name = CStr::from_bytes_with_nul(b"Caf\xe9 mouse\0").unwrap();

    unsafe {
        log_bridge_emit(
            get_log_handler_entry_point(),
            std::ptr::null_mut(),
            Priority::INFO,
            c"%s: added".as_ptr(),
            name.as_ptr(),
        );
    }
    register_log_callback(None);

    assert_eq!(
        *seen.lock(),
        vec![(Priority::INFO, "Caf\u{fffd} mouse: added".to_string())]
    );
}

#[test]
fn test_nul_character_is_dropped() {
    let _guard = GLOBAL_LOCK.lock();
    let (callback, seen) = recorder();
    register_log_callback(Some(callback));

    unsafe {
        log_bridge_emit(
            get_log_handler_entry_point(),
            std::ptr::null_mut(),
            Priority::INFO,
            c"before%cafter".as_ptr(),
            0 as c_int,
        );
    }
    register_log_callback(None);

    assert!(seen.lock().is_empty());
}
