//! Motion planner and positioning traits

/// Planner limits shown on the display's settings pages
///
/// Axis arrays are ordered X, Y, Z, E.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionParameters {
    pub steps_per_mm: [f32; 4],
    /// mm/s
    pub max_feedrate: [f32; 4],
    /// mm/s
    pub min_feedrate: f32,
    /// mm/s
    pub min_travel_feedrate: f32,
    /// Print acceleration in mm/s²
    pub acceleration: f32,
    /// Firmware retract feedrate in mm/s
    pub retract_feedrate: f32,
    /// mm/s²
    pub max_acceleration: [u32; 4],
    /// mm/s
    pub jerk: [f32; 4],
}

/// Non-blocking access to the motion system
pub trait Motion {
    /// Logical X, Y, Z position in mm
    fn position(&self) -> [f32; 3];

    /// Current feedrate in mm/s
    fn feedrate_mm_s(&self) -> f32;

    /// Feedrate override in percent
    fn feedrate_percent(&self) -> f32;

    /// Check if any stepper is energized
    fn steppers_enabled(&self) -> bool;

    /// Z home offset in mm
    fn home_offset_z(&self) -> f32;

    fn set_home_offset_z(&mut self, offset_mm: f32);

    /// Z offset of the bed probe in mm
    fn probe_offset_z(&self) -> f32;

    fn set_probe_offset_z(&mut self, offset_mm: f32);

    /// Second Z endstop adjustment in mm
    fn z2_endstop_adjust(&self) -> f32;

    fn set_z2_endstop_adjust(&mut self, adjust_mm: f32);

    /// Queue a Z babystep
    fn babystep_z(&mut self, distance_mm: f32);

    /// Queue a relative move of the active extruder, ignoring flow scaling
    fn extrude_relative(&mut self, distance_mm: f32, feedrate_mm_s: f32);

    fn parameters(&self) -> MotionParameters;

    fn set_parameters(&mut self, parameters: &MotionParameters);
}

/// Motion calls that return only after the move finished
///
/// Every method is a suspension point: the adapter's poll stalls until
/// the host completes the motion. The display keeps waiting meanwhile.
pub trait BlockingMotion {
    /// Home all axes unless the position is already trusted
    fn home_if_needed(&mut self);

    /// Move Z to an absolute position, at `feedrate_mm_s` or the default
    fn move_to_z(&mut self, z_mm: f32, feedrate_mm_s: Option<f32>);

    /// Move X/Y to an absolute position
    fn move_to_xy(&mut self, x_mm: f32, y_mm: f32);

    /// Probe the bed at X/Y, returning the measured Z
    ///
    /// `None` when the probe did not trigger.
    fn probe_at(&mut self, x_mm: f32, y_mm: f32) -> Option<f32>;
}
