//! Print job and filament sensor

use a30t_protocol::PrintJobFlags;

/// State of the current print job
pub trait PrintJob {
    fn job_flags(&self) -> PrintJobFlags;

    /// Check if an SD card / USB stick is inserted
    fn media_present(&self) -> bool;

    /// Name of the selected media file, empty if none
    fn file_name(&self) -> &str;

    fn progress_percent(&self) -> u8;

    fn elapsed_seconds(&self) -> u32;
}

/// Filament runout sensor
pub trait FilamentRunout {
    fn runout_enabled(&self) -> bool;

    fn set_runout_enabled(&mut self, enabled: bool);

    /// Check if the sensor currently detects filament
    fn filament_present(&self) -> bool;
}
