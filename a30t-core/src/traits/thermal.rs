//! Temperature and fan queries

/// Heater selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Heater {
    Bed,
    Hotend(u8),
}

/// Read-only view of the temperature controller
pub trait Thermal {
    /// Measured temperature in °C
    fn actual_celsius(&self, heater: Heater) -> f32;

    /// Target temperature in °C, 0 when off
    fn target_celsius(&self, heater: Heater) -> f32;

    /// Fan speed in percent
    fn fan_percent(&self, fan: u8) -> f32;
}
