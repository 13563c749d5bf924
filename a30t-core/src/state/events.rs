//! Events that drive the extruder action machine

/// Requests from `M2105` and the adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExtruderEvent {
    /// Feed filament in (`S2`)
    Load,
    /// Pull filament out (`S3`)
    Unload,
    /// Purge through each channel in turn (`S5`)
    Clean,
    /// Stop all extruder motion (`S4` and anything unknown)
    Stop,
}
