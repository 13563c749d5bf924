//! Display adapter
//!
//! Ties the serial link to the dispatcher. The host calls [`Adapter::poll`]
//! from its idle loop and the lifecycle callbacks from the matching firmware
//! events.

use embedded_hal::delay::DelayNs;
use embedded_io::{Read, ReadReady, Write};

use a30t_protocol::{decode_line, telegram, Command};

use crate::config::AdapterConfig;
use crate::dispatch::Dispatcher;
use crate::error::LinkError;
use crate::link::{DisplayLink, TelegramSink};
use crate::traits::Host;

/// The A30T display adapter
pub struct Adapter<T, D> {
    link: DisplayLink<T, D>,
    dispatcher: Dispatcher,
}

impl<T, D> Adapter<T, D>
where
    T: Read + ReadReady + Write,
    D: DelayNs,
{
    pub fn new(transport: T, delay: D, config: AdapterConfig) -> Self {
        let link = DisplayLink::new(
            transport,
            delay,
            config.timing.settle_delay_ms,
            config.telemetry.checksum_outbound,
        );
        Self {
            link,
            dispatcher: Dispatcher::new(config),
        }
    }

    /// Host finished booting; the first status cycle goes out on the next poll
    pub fn startup(&mut self, now_ms: u32) {
        let timing = &self.dispatcher.config().timing;
        info!(
            "A30T display adapter up, status every {} ms",
            timing.status_period_ms
        );
        self.dispatcher.state_mut().next_status_due = now_ms;
    }

    /// Run one adapter cycle from the host's idle hook
    ///
    /// Reads and dispatches up to `max_lines_per_poll` complete lines, sends
    /// the status telegrams when due and drives the extruder actions.
    ///
    /// This is a suspension point: wizard commands wait inside
    /// [`BlockingMotion`](crate::traits::BlockingMotion) calls until the
    /// printer stopped, and every outbound telegram is followed by the
    /// settle delay.
    pub fn poll<H: Host>(&mut self, host: &mut H, now_ms: u32) -> Result<(), LinkError<T::Error>> {
        if !self.dispatcher.state().input_paused {
            let max_lines = self.dispatcher.config().timing.max_lines_per_poll;
            for _ in 0..max_lines {
                let Some(line) = self.link.read_line()? else {
                    break;
                };
                self.handle_line(&line, now_ms, host)?;
            }
        }

        self.dispatcher
            .send_status_if_due(now_ms, host, &mut self.link)?;
        self.dispatcher.service_extruder(now_ms, host);
        Ok(())
    }

    fn handle_line<H: Host>(
        &mut self,
        raw: &[u8],
        now_ms: u32,
        host: &mut H,
    ) -> Result<(), LinkError<T::Error>> {
        let decoded = match decode_line(raw) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!("dropped line: {:?}", e);
                return Ok(());
            }
        };
        trace!("RX {}", decoded.text);

        let command = Command::parse(decoded.text);
        self.dispatcher
            .dispatch(&command, now_ms, host, &mut self.link)
    }

    /// Homing started; position telemetry would be meaningless
    pub fn on_homing_start(&mut self) {
        debug!("homing started");
        self.dispatcher.state_mut().axis_telemetry_suppressed = true;
    }

    pub fn on_homing_complete(&mut self) {
        debug!("homing complete");
        self.dispatcher.state_mut().axis_telemetry_suppressed = false;
    }

    pub fn on_leveling_start(&mut self) {
        debug!("leveling started");
        self.dispatcher.state_mut().axis_telemetry_suppressed = true;
    }

    /// Probe `index` of `total` done
    pub fn on_leveling_progress(&mut self, index: u8, total: u8) {
        debug!("leveling point {} of {}", index, total);
    }

    pub fn on_leveling_done(&mut self) {
        debug!("leveling done");
        let state = self.dispatcher.state_mut();
        state.axis_telemetry_suppressed = false;
        state.auto_level_shadow = true;
    }

    /// Leave inbound lines unread while the host is busy
    pub fn set_input_paused(&mut self, paused: bool) {
        debug!("input paused {}", paused);
        self.dispatcher.state_mut().input_paused = paused;
    }

    /// Show `text` on the display's status line (`L14`)
    pub fn show_status(&mut self, text: &str) -> Result<(), LinkError<T::Error>> {
        self.link.send(&telegram::message(text)?)
    }

    /// Show a predefined message (`L18`)
    pub fn show_user_message(&mut self, code: u16) -> Result<(), LinkError<T::Error>> {
        self.link.send(&telegram::user_message(code)?)
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher {
        &mut self.dispatcher
    }

    pub fn link(&self) -> &DisplayLink<T, D> {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut DisplayLink<T, D> {
        &mut self.link
    }

    /// Give back the transport and delay
    pub fn release(self) -> (T, D) {
        self.link.release()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::mock::{MockDelay, MockTransport};
    use crate::state::ExtruderAction;
    use crate::testing::MockHost;

    type TestAdapter = Adapter<MockTransport, MockDelay>;

    fn adapter() -> TestAdapter {
        Adapter::new(
            MockTransport::default(),
            MockDelay::default(),
            AdapterConfig::default(),
        )
    }

    fn feed(adapter: &mut TestAdapter, bytes: &[u8]) {
        adapter.link_mut().transport_mut().feed(bytes);
    }

    #[test]
    fn test_load_extrudes_once_per_period_until_stopped() {
        let mut adapter = adapter();
        let mut host = MockHost::default();

        feed(&mut adapter, b"N-0 M2105 S2*37\n");
        adapter.poll(&mut host, 0).unwrap();
        assert_eq!(
            adapter.dispatcher().state().extruder.action(),
            ExtruderAction::Loading
        );
        assert_eq!(host.extrusions, [(1.0, 1.0)]);

        adapter.poll(&mut host, 500).unwrap();
        assert_eq!(host.extrusions.len(), 1);
        adapter.poll(&mut host, 1000).unwrap();
        assert_eq!(host.extrusions.len(), 2);

        feed(&mut adapter, b"N-0 M2105 S4*33\n");
        adapter.poll(&mut host, 2000).unwrap();
        adapter.poll(&mut host, 5000).unwrap();
        assert_eq!(host.extrusions.len(), 2);
        assert_eq!(
            adapter.dispatcher().state().extruder.action(),
            ExtruderAction::Idle
        );
    }

    #[test]
    fn test_clean_rotates_through_channels() {
        let mut adapter = adapter();
        let mut host = MockHost::default();

        feed(&mut adapter, b"M2105 S5\n");
        adapter.poll(&mut host, 0).unwrap();
        adapter.poll(&mut host, 10_000).unwrap();
        adapter.poll(&mut host, 20_000).unwrap();

        assert_eq!(
            host.collector_writes,
            [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
        );
        assert_eq!(host.extrusions, [(1.0, 1.0); 3]);
    }

    #[test]
    fn test_partial_line_is_kept_between_polls() {
        let mut adapter = adapter();
        let mut host = MockHost::default();

        feed(&mut adapter, b"N-0 G2");
        adapter.poll(&mut host, 0).unwrap();
        assert!(host.queued.is_empty());

        feed(&mut adapter, b"8*62\n");
        adapter.poll(&mut host, 10).unwrap();
        assert_eq!(host.queued, ["G28"]);
    }

    #[test]
    fn test_lines_per_poll_are_bounded() {
        let mut adapter = adapter();
        let mut host = MockHost::default();

        for _ in 0..12 {
            feed(&mut adapter, b"G28\n");
        }
        adapter.poll(&mut host, 0).unwrap();
        assert_eq!(host.queued.len(), 10);
        adapter.poll(&mut host, 10).unwrap();
        assert_eq!(host.queued.len(), 12);
    }

    #[test]
    fn test_paused_input_is_left_unread() {
        let mut adapter = adapter();
        let mut host = MockHost::default();

        adapter.set_input_paused(true);
        feed(&mut adapter, b"G28\n");
        adapter.poll(&mut host, 0).unwrap();
        assert!(host.queued.is_empty());

        adapter.set_input_paused(false);
        adapter.poll(&mut host, 10).unwrap();
        assert_eq!(host.queued, ["G28"]);
    }

    #[test]
    fn test_invalid_utf8_is_dropped() {
        let mut adapter = adapter();
        let mut host = MockHost::default();

        feed(&mut adapter, &[0xFF, 0xFE, b'\n']);
        feed(&mut adapter, b"G28\n");
        adapter.poll(&mut host, 0).unwrap();
        assert_eq!(host.queued, ["G28"]);
    }

    #[test]
    fn test_status_cycle_is_framed_and_settled() {
        let mut adapter = adapter();
        let mut host = MockHost::default();

        adapter.startup(0);
        adapter.poll(&mut host, 0).unwrap();

        let (transport, delay) = adapter.release();
        let lines = transport.sent_lines();
        assert_eq!(lines.len(), 9);
        assert!(lines[0].starts_with("N-0 L1 X0.000 Y0.000 Z0.000 F0*"));
        assert!(lines[7].starts_with("N-0 L2 B:"));
        assert!(lines[8].starts_with("N-0 L3 PS:0 "));
        assert_eq!(delay.total_ns, 9 * 20_000_000);
    }

    #[test]
    fn test_command_with_immediate_status_reschedules_cycle() {
        let mut adapter = adapter();
        let mut host = MockHost::default();

        adapter.poll(&mut host, 0).unwrap();
        adapter.link_mut().transport_mut().clear_sent();

        feed(&mut adapter, b"M2106 S1\n");
        adapter.poll(&mut host, 300).unwrap();
        assert!(host.runout_enabled);

        let lines = adapter.link().transport().sent_lines();
        let l3 = lines.iter().find(|l| l.starts_with("N-0 L3 ")).unwrap();
        assert!(l3.contains(" FT:0 "));
    }

    #[test]
    fn test_homing_suppresses_axis_telemetry() {
        let mut adapter = adapter();
        let mut host = MockHost::default();

        adapter.on_homing_start();
        adapter.poll(&mut host, 0).unwrap();
        let lines = adapter.link().transport().sent_lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("N-0 L2 "));

        adapter.on_homing_complete();
        adapter.link_mut().transport_mut().clear_sent();
        adapter.poll(&mut host, 1000).unwrap();
        assert!(adapter.link().transport().sent_lines()[0].starts_with("N-0 L1 "));
    }

    #[test]
    fn test_leveling_done_restores_switch() {
        let mut adapter = adapter();
        adapter.dispatcher_mut().state_mut().auto_level_shadow = false;

        adapter.on_leveling_start();
        assert!(adapter.dispatcher().state().axis_telemetry_suppressed);
        adapter.on_leveling_progress(3, 25);
        adapter.on_leveling_done();
        assert!(!adapter.dispatcher().state().axis_telemetry_suppressed);
        assert!(adapter.dispatcher().state().auto_level_shadow);
    }

    #[test]
    fn test_messages() {
        let mut adapter = adapter();
        adapter.show_status("Printing").unwrap();
        adapter.show_user_message(3).unwrap();

        let lines = adapter.link().transport().sent_lines();
        assert!(lines[0].starts_with("N-0 L14 Printing*"));
        assert!(lines[1].starts_with("N-0 L18 P26 S3*"));
    }
}
