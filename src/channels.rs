//! Inter-task signalling
//!
//! The control task owns the output word outright; other tasks only hear
//! about presses after they have been committed.

use crate::types::RouteEvent;
use embassy_sync::blocking_mutex::raw::ThreadModeRawMutex;
use embassy_sync::signal::Signal;

/// Latest serviced press, consumed by the status LED task.
/// Overwrites: only the most recent press matters for a blink.
pub static ROUTE_ACTIVITY: Signal<ThreadModeRawMutex, RouteEvent> = Signal::new();
