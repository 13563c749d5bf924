//! Persistent printer settings

/// EEPROM-style settings store of the host firmware
pub trait Settings {
    /// Reload all settings from persistent storage
    fn load(&mut self);

    /// Write all settings to persistent storage
    fn save(&mut self);

    /// Host firmware version string
    fn firmware_version(&self) -> &str;
}
