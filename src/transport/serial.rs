//! Serial transport backed by the `serialport` crate.

use std::io::{self, Read, Write};

use log::{debug, trace};
use serialport::SerialPort;

use super::Transport;
use super::config::SerialConfig;
use crate::error::{Result, TransportError};

/// Serial transport wrapping a platform serial port.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open the device described by `config`.
    pub fn open(config: &SerialConfig) -> Result<Self> {
        let port = serialport::new(&config.path, config.baud)
            .timeout(config.read_timeout)
            .open()
            .map_err(|source| TransportError::OpenFailed {
                path: config.path.clone(),
                source,
            })?;

        debug!(
            "opened {} at {} baud, read timeout {:?}",
            config.path, config.baud, config.read_timeout
        );

        Ok(Self { port })
    }
}

impl Transport for SerialTransport {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize> {
        match self.port.read(buf) {
            Ok(n) => {
                trace!("read {} byte(s)", n);
                Ok(n)
            }
            // A timed-out read is the far end saying "done for now".
            Err(e)
                if e.kind() == io::ErrorKind::TimedOut
                    || e.kind() == io::ErrorKind::WouldBlock =>
            {
                Ok(0)
            }
            Err(e) => Err(TransportError::Io(e).into()),
        }
    }

    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        trace!("write {} byte(s)", data.len());
        self.port
            .write_all(data)
            .map_err(TransportError::Io)?;
        Ok(())
    }

    fn close(self) -> Result<()> {
        debug!("releasing serial port");
        // Dropping the boxed port closes the device handle.
        Ok(())
    }
}
