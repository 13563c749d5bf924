//! Recording host and telegram sink for unit tests

use std::string::String;
use std::vec::Vec;

use a30t_protocol::mix::MIX_CHANNELS;
use a30t_protocol::{PrintJobFlags, TelegramError};

use crate::link::TelegramSink;
use crate::traits::{
    BlockingMotion, CommandQueue, FilamentRunout, Heater, Mixer, Motion, MotionParameters,
    PrintJob, Settings, Thermal,
};

/// A blocking motion request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionCall {
    Home,
    Z(f32, Option<f32>),
    Xy(f32, f32),
    Probe(f32, f32),
}

/// Actual and target temperatures, `[actual, target]`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Temps {
    pub bed: [f32; 2],
    pub hotend: [f32; 2],
}

/// Host that records every call and answers from its fields
#[derive(Debug)]
pub struct MockHost {
    pub queued: Vec<String>,
    pub motion: Vec<MotionCall>,
    pub position: [f32; 3],
    pub feedrate_mm_s: f32,
    pub feedrate_percent: f32,
    pub steppers_enabled: bool,
    pub home_offset_z: f32,
    pub probe_offset_z: f32,
    /// Value returned by `probe_at`
    pub probe_result: Option<f32>,
    pub z2_adjust: f32,
    pub babysteps: Vec<f32>,
    /// `(distance, feedrate)` per extrude call
    pub extrusions: Vec<(f32, f32)>,
    pub parameters: MotionParameters,
    pub parameter_writes: usize,
    pub temps: Temps,
    pub fan_percent: f32,
    pub flags: PrintJobFlags,
    pub media_present: bool,
    pub file_name: String,
    pub progress: u8,
    pub elapsed_s: u32,
    pub runout_enabled: bool,
    pub filament_present: bool,
    pub collector: [f32; MIX_CHANNELS],
    /// Every collector the adapter set, in order
    pub collector_writes: Vec<[f32; MIX_CHANNELS]>,
    pub saves: usize,
    pub loads: usize,
    pub firmware: &'static str,
}

impl Default for MockHost {
    fn default() -> Self {
        Self {
            queued: Vec::new(),
            motion: Vec::new(),
            position: [0.0; 3],
            feedrate_mm_s: 0.0,
            feedrate_percent: 100.0,
            steppers_enabled: false,
            home_offset_z: 0.0,
            probe_offset_z: 0.0,
            probe_result: Some(0.0),
            z2_adjust: 0.0,
            babysteps: Vec::new(),
            extrusions: Vec::new(),
            parameters: MotionParameters::default(),
            parameter_writes: 0,
            temps: Temps::default(),
            fan_percent: 0.0,
            flags: PrintJobFlags::default(),
            media_present: false,
            file_name: String::new(),
            progress: 0,
            elapsed_s: 0,
            runout_enabled: false,
            filament_present: false,
            collector: [1.0, 0.0, 0.0],
            collector_writes: Vec::new(),
            saves: 0,
            loads: 0,
            firmware: "2.1.2-a30t",
        }
    }
}

impl CommandQueue for MockHost {
    fn enqueue(&mut self, gcode: &str) {
        self.queued.push(String::from(gcode));
    }
}

impl Motion for MockHost {
    fn position(&self) -> [f32; 3] {
        self.position
    }

    fn feedrate_mm_s(&self) -> f32 {
        self.feedrate_mm_s
    }

    fn feedrate_percent(&self) -> f32 {
        self.feedrate_percent
    }

    fn steppers_enabled(&self) -> bool {
        self.steppers_enabled
    }

    fn home_offset_z(&self) -> f32 {
        self.home_offset_z
    }

    fn set_home_offset_z(&mut self, offset_mm: f32) {
        self.home_offset_z = offset_mm;
    }

    fn probe_offset_z(&self) -> f32 {
        self.probe_offset_z
    }

    fn set_probe_offset_z(&mut self, offset_mm: f32) {
        self.probe_offset_z = offset_mm;
    }

    fn z2_endstop_adjust(&self) -> f32 {
        self.z2_adjust
    }

    fn set_z2_endstop_adjust(&mut self, adjust_mm: f32) {
        self.z2_adjust = adjust_mm;
    }

    fn babystep_z(&mut self, distance_mm: f32) {
        self.babysteps.push(distance_mm);
    }

    fn extrude_relative(&mut self, distance_mm: f32, feedrate_mm_s: f32) {
        self.extrusions.push((distance_mm, feedrate_mm_s));
    }

    fn parameters(&self) -> MotionParameters {
        self.parameters
    }

    fn set_parameters(&mut self, parameters: &MotionParameters) {
        self.parameters = *parameters;
        self.parameter_writes += 1;
    }
}

impl BlockingMotion for MockHost {
    fn home_if_needed(&mut self) {
        self.motion.push(MotionCall::Home);
    }

    fn move_to_z(&mut self, z_mm: f32, feedrate_mm_s: Option<f32>) {
        self.motion.push(MotionCall::Z(z_mm, feedrate_mm_s));
    }

    fn move_to_xy(&mut self, x_mm: f32, y_mm: f32) {
        self.motion.push(MotionCall::Xy(x_mm, y_mm));
    }

    fn probe_at(&mut self, x_mm: f32, y_mm: f32) -> Option<f32> {
        self.motion.push(MotionCall::Probe(x_mm, y_mm));
        self.probe_result
    }
}

impl Thermal for MockHost {
    fn actual_celsius(&self, heater: Heater) -> f32 {
        match heater {
            Heater::Bed => self.temps.bed[0],
            Heater::Hotend(_) => self.temps.hotend[0],
        }
    }

    fn target_celsius(&self, heater: Heater) -> f32 {
        match heater {
            Heater::Bed => self.temps.bed[1],
            Heater::Hotend(_) => self.temps.hotend[1],
        }
    }

    fn fan_percent(&self, _fan: u8) -> f32 {
        self.fan_percent
    }
}

impl PrintJob for MockHost {
    fn job_flags(&self) -> PrintJobFlags {
        self.flags
    }

    fn media_present(&self) -> bool {
        self.media_present
    }

    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn progress_percent(&self) -> u8 {
        self.progress
    }

    fn elapsed_seconds(&self) -> u32 {
        self.elapsed_s
    }
}

impl FilamentRunout for MockHost {
    fn runout_enabled(&self) -> bool {
        self.runout_enabled
    }

    fn set_runout_enabled(&mut self, enabled: bool) {
        self.runout_enabled = enabled;
    }

    fn filament_present(&self) -> bool {
        self.filament_present
    }
}

impl Mixer for MockHost {
    fn collector(&self) -> [f32; MIX_CHANNELS] {
        self.collector
    }

    fn set_collector(&mut self, weights: [f32; MIX_CHANNELS]) {
        self.collector = weights;
        self.collector_writes.push(weights);
    }
}

impl Settings for MockHost {
    fn load(&mut self) {
        self.loads += 1;
    }

    fn save(&mut self) {
        self.saves += 1;
    }

    fn firmware_version(&self) -> &str {
        self.firmware
    }
}

/// Sink that keeps the unframed telegram text
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub lines: Vec<String>,
}

impl TelegramSink for RecordingSink {
    type Error = TelegramError;

    fn send(&mut self, text: &str) -> Result<(), Self::Error> {
        self.lines.push(String::from(text));
        Ok(())
    }
}
