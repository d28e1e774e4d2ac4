//! Serial link configuration.

use std::time::Duration;

use serde::Deserialize;

/// Serial link configuration.
///
/// The read timeout doubles as the protocol's silence threshold: the
/// monitor has no end-of-message marker, so "nothing arrived for one
/// timeout window" is how the far end says it is done sending.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Device path, e.g. `/dev/ttyUSB0`.
    pub path: String,

    /// Baud rate. The monitor's boot ROM sets the UART up at 9600.
    pub baud: u32,

    /// Per-read timeout.
    #[serde(with = "humantime_serde")]
    pub read_timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            path: "/dev/ttyUSB0".to_string(),
            baud: 9600,
            read_timeout: Duration::from_millis(100),
        }
    }
}
