//! Serial link to the display
//!
//! Assembles inbound bytes into lines and writes framed telegrams, pausing
//! after each one so the display can keep up.

use embedded_hal::delay::DelayNs;
use embedded_io::{Read, ReadReady, Write};
use heapless::Vec;

use a30t_protocol::frame::{encode_line, MAX_INBOUND_LINE};
use a30t_protocol::TelegramError;

use crate::error::LinkError;

/// One inbound line without its `\n`
pub type Line = Vec<u8, MAX_INBOUND_LINE>;

/// Destination for outbound telegrams
pub trait TelegramSink {
    type Error: From<TelegramError>;

    /// Send one line of text, framed as configured
    fn send(&mut self, text: &str) -> Result<(), Self::Error>;
}

/// Line-oriented display connection over a byte transport
pub struct DisplayLink<T, D> {
    transport: T,
    delay: D,
    settle_delay_ms: u32,
    checksum: bool,
    rx: Line,
    /// Current line overflowed; drop bytes until its end
    discarding: bool,
}

impl<T, D> DisplayLink<T, D>
where
    T: Read + ReadReady + Write,
    D: DelayNs,
{
    pub fn new(transport: T, delay: D, settle_delay_ms: u32, checksum: bool) -> Self {
        Self {
            transport,
            delay,
            settle_delay_ms,
            checksum,
            rx: Vec::new(),
            discarding: false,
        }
    }

    /// Return the next complete line, if one has arrived
    ///
    /// Never blocks: only bytes the transport reports as ready are read.
    /// Bytes of an unterminated line stay buffered for the next call.
    pub fn read_line(&mut self) -> Result<Option<Line>, LinkError<T::Error>> {
        let mut byte = [0u8; 1];
        while self.transport.read_ready().map_err(LinkError::Transport)? {
            let n = self.transport.read(&mut byte).map_err(LinkError::Transport)?;
            if n == 0 {
                break;
            }

            if byte[0] == b'\n' {
                if self.discarding {
                    self.discarding = false;
                    warn!("dropped over-long line");
                    continue;
                }
                return Ok(Some(core::mem::take(&mut self.rx)));
            }

            if !self.discarding && self.rx.push(byte[0]).is_err() {
                self.rx.clear();
                self.discarding = true;
            }
        }
        Ok(None)
    }

    /// Send a line with explicit framing choice
    pub fn send_framed(&mut self, text: &str, with_checksum: bool) -> Result<(), LinkError<T::Error>> {
        let encoded = encode_line(text, with_checksum)?;
        self.transport
            .write_all(&encoded)
            .map_err(LinkError::Transport)?;
        self.transport.flush().map_err(LinkError::Transport)?;
        trace!("TX {}", text);
        self.delay.delay_ms(self.settle_delay_ms);
        Ok(())
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Give back the transport and delay
    pub fn release(self) -> (T, D) {
        (self.transport, self.delay)
    }
}

impl<T, D> TelegramSink for DisplayLink<T, D>
where
    T: Read + ReadReady + Write,
    D: DelayNs,
{
    type Error = LinkError<T::Error>;

    fn send(&mut self, text: &str) -> Result<(), Self::Error> {
        let checksum = self.checksum;
        self.send_framed(text, checksum)
    }
}
