//! Host command queue

/// Queue that accepts G-code for the host firmware
pub trait CommandQueue {
    /// Append one G-code line, executed after everything already queued
    ///
    /// The text is a single line without terminator. Implementations may
    /// block until the queue has room.
    fn enqueue(&mut self, gcode: &str);
}
