//! Status values reported in telegrams

/// Print state shown on the display (`PS:` field)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PrintStatus {
    Idle,
    Printing,
    Paused,
    Finished,
}

/// Raw print-job flags as reported by the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PrintJobFlags {
    /// A print job timer is running
    pub job_ongoing: bool,
    /// Printing from SD/USB media
    pub printing_from_media: bool,
    /// Print job paused
    pub paused: bool,
    /// Media print paused
    pub media_paused: bool,
    /// A media file is open
    pub file_open: bool,
    /// The open media file was read to its end
    pub file_at_end: bool,
}

impl PrintStatus {
    /// Resolve the display state from host flags; first match wins
    pub fn resolve(flags: &PrintJobFlags) -> Self {
        if flags.job_ongoing || flags.printing_from_media {
            PrintStatus::Printing
        } else if flags.paused || flags.media_paused {
            PrintStatus::Paused
        } else if flags.file_open && flags.file_at_end {
            PrintStatus::Finished
        } else {
            PrintStatus::Idle
        }
    }

    /// Wire code
    pub fn code(self) -> u8 {
        match self {
            PrintStatus::Idle => 0,
            PrintStatus::Printing => 1,
            PrintStatus::Paused => 2,
            PrintStatus::Finished => 4,
        }
    }
}

/// Filament runout sensor state (`FT:` field)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FilamentSensor {
    Disabled,
    Runout,
    Present,
}

impl FilamentSensor {
    /// Build from the host's sensor enable flag and reading
    pub fn from_host(enabled: bool, filament_present: bool) -> Self {
        match (enabled, filament_present) {
            (false, _) => FilamentSensor::Disabled,
            (true, true) => FilamentSensor::Present,
            (true, false) => FilamentSensor::Runout,
        }
    }

    /// Wire code
    pub fn code(self) -> u8 {
        match self {
            FilamentSensor::Disabled => 255,
            FilamentSensor::Runout => 0,
            FilamentSensor::Present => 1,
        }
    }
}
