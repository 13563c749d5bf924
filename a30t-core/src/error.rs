//! Adapter error types

use a30t_protocol::{FrameError, TelegramError};

/// Errors returned from the display link and the poll loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError<E> {
    /// Serial transport failed
    Transport(E),
    /// Outbound line could not be framed
    Frame(FrameError),
    /// Telegram did not fit its buffer
    Telegram(TelegramError),
}

impl<E> From<FrameError> for LinkError<E> {
    fn from(e: FrameError) -> Self {
        LinkError::Frame(e)
    }
}

impl<E> From<TelegramError> for LinkError<E> {
    fn from(e: TelegramError) -> Self {
        LinkError::Telegram(e)
    }
}

impl<E: embedded_io::Error> embedded_io::Error for LinkError<E> {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            LinkError::Transport(e) => e.kind(),
            LinkError::Frame(_) | LinkError::Telegram(_) => embedded_io::ErrorKind::InvalidData,
        }
    }
}
