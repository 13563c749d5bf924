//! Host collaborator traits
//!
//! These traits define the interface between the adapter and the printer
//! firmware it runs in. The adapter never touches hardware directly.

pub mod job;
pub mod mixer;
pub mod motion;
pub mod queue;
pub mod settings;
pub mod thermal;

pub use job::{FilamentRunout, PrintJob};
pub use mixer::Mixer;
pub use motion::{BlockingMotion, Motion, MotionParameters};
pub use queue::CommandQueue;
pub use settings::Settings;
pub use thermal::{Heater, Thermal};

/// Everything the adapter needs from the host firmware
pub trait Host:
    CommandQueue + Motion + BlockingMotion + Thermal + PrintJob + FilamentRunout + Mixer + Settings
{
}

impl<T> Host for T where
    T: CommandQueue
        + Motion
        + BlockingMotion
        + Thermal
        + PrintJob
        + FilamentRunout
        + Mixer
        + Settings
{
}
