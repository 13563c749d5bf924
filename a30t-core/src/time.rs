//! Millisecond timestamps
//!
//! The host hands in a free-running `u32` millisecond counter that wraps
//! after ~49 days. Deadlines are compared on the wrapped difference.

/// Check if `deadline` has been reached at `now_ms`
pub fn elapsed(now_ms: u32, deadline: u32) -> bool {
    (now_ms.wrapping_sub(deadline) as i32) >= 0
}
