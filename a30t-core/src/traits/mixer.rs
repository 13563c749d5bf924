//! Mixing hotend

use a30t_protocol::mix::MIX_CHANNELS;

/// Colour mixer of the three-in-one-out hotend
pub trait Mixer {
    /// Current collector weights, E0 first
    fn collector(&self) -> [f32; MIX_CHANNELS];

    /// Replace the collector weights
    ///
    /// Weights need not sum to one; the host normalizes them.
    fn set_collector(&mut self, weights: [f32; MIX_CHANNELS]);
}
