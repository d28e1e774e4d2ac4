//! Serial transport layer.
//!
//! This module provides the byte-channel seam the rest of the crate talks
//! through: a duplex link with a bounded per-read timeout, plus the
//! production serial implementation and a scripted one for tests.

pub mod config;
mod mock;
mod serial;

pub use config::SerialConfig;
pub use mock::ScriptedTransport;
pub use serial::SerialTransport;

use crate::error::Result;

/// Duplex byte channel with a bounded per-read timeout.
///
/// Reads never block past the configured timeout; a return of `0` bytes
/// means the line stayed silent for a full timeout window. That silence is
/// the protocol's only end-of-transmission signal, so it is reported as
/// data, not as an error.
pub trait Transport {
    /// Read whatever bytes are available into `buf`, waiting at most the
    /// configured read timeout. Returns the number of bytes read; `0`
    /// means silence.
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Write the whole buffer to the link.
    fn write_all(&mut self, data: &[u8]) -> Result<()>;

    /// Release the underlying device.
    fn close(self) -> Result<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}
