//! Colour mix encoding for the three-channel mixing hotend
//!
//! The display shows the mix as percentages of E0, E1 and E2. In status
//! telegrams they travel packed into one integer with 7 bits per channel,
//! E2 in the most significant position. The display sends mixes back with an
//! 8 bit stride instead.

/// Number of mixing channels
pub const MIX_CHANNELS: usize = 3;

/// Bit width of one channel in status telegrams
pub const STATUS_CHANNEL_BITS: u32 = 7;

/// Bit stride of one channel in `M2135` values from the display
pub const DISPLAY_CHANNEL_STRIDE: u32 = 8;

/// Mask applied to the lower channels of display values
pub const CHANNEL_MASK: u32 = 0x7F;

/// Channel percentages, index 0 is E0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MixRatio {
    percent: [u8; MIX_CHANNELS],
}

impl Default for MixRatio {
    fn default() -> Self {
        Self::single(0)
    }
}

impl MixRatio {
    /// Create from raw channel percentages
    pub const fn new(percent: [u8; MIX_CHANNELS]) -> Self {
        Self { percent }
    }

    /// 100 % on one channel
    pub fn single(channel: usize) -> Self {
        let mut percent = [0; MIX_CHANNELS];
        percent[channel % MIX_CHANNELS] = 100;
        Self { percent }
    }

    /// Convert host mixer weights into percentages summing to exactly 100
    ///
    /// Each channel is rounded on its own; whatever rounding leaves over
    /// (or takes away) is applied to the largest channel. All-zero weights
    /// report 100 % on E0.
    pub fn from_weights(weights: [f32; MIX_CHANNELS]) -> Self {
        let total: f32 = weights.iter().map(|w| w.max(0.0)).sum();
        if total <= 0.0 {
            return Self::single(0);
        }

        let mut percent = [0u8; MIX_CHANNELS];
        let mut sum: i16 = 0;
        let mut largest = 0;
        for (i, w) in weights.iter().enumerate() {
            let share = (w.max(0.0) / total * 100.0 + 0.5) as i16;
            percent[i] = share.clamp(0, 100) as u8;
            sum += percent[i] as i16;
            if percent[i] > percent[largest] {
                largest = i;
            }
        }

        let corrected = percent[largest] as i16 + (100 - sum);
        percent[largest] = corrected.clamp(0, 100) as u8;
        Self { percent }
    }

    /// Channel percentages
    pub fn percent(&self) -> [u8; MIX_CHANNELS] {
        self.percent
    }

    /// Percentages as weights for the host mixer
    pub fn weights(&self) -> [f32; MIX_CHANNELS] {
        self.percent.map(|p| p as f32 / 100.0)
    }

    /// Pack for the `MR:` field of the print info telegram
    pub fn pack(&self) -> u32 {
        self.percent
            .iter()
            .rev()
            .fold(0, |acc, &p| (acc << STATUS_CHANNEL_BITS) | (p as u32 & CHANNEL_MASK))
    }

    /// Inverse of [`MixRatio::pack`]
    pub fn unpack(value: u32) -> Self {
        let mut percent = [0u8; MIX_CHANNELS];
        for (i, p) in percent.iter_mut().enumerate() {
            *p = ((value >> (i as u32 * STATUS_CHANNEL_BITS)) & CHANNEL_MASK) as u8;
        }
        Self { percent }
    }

    /// Decode the value of an `M2135 P<value>` command
    ///
    /// E0 and E1 are masked to 7 bits, E2 takes the whole upper byte.
    pub fn from_display_value(value: u32) -> Self {
        let e0 = value & CHANNEL_MASK;
        let e1 = (value >> DISPLAY_CHANNEL_STRIDE) & CHANNEL_MASK;
        let e2 = (value >> (2 * DISPLAY_CHANNEL_STRIDE)) & 0xFF;
        Self {
            percent: [e0 as u8, e1 as u8, e2 as u8],
        }
    }
}
