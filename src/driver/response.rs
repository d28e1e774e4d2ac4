//! Response type for sector reads.

use std::time::Duration;

use crate::plan::SectorAddress;

/// Result of one sector read.
///
/// The returned bytes are treated as opaque text; no length or content
/// validation happens here. `text` is exactly what went to the log sink.
#[derive(Debug, Clone)]
pub struct SectorResponse {
    /// The address that was requested.
    pub address: SectorAddress,

    /// The framed response text (embedded line feeds included, trailing
    /// prompt artifact excluded).
    pub text: String,

    /// Whether the monitor's prompt trailed the response. Its absence
    /// usually means the read timeout fired before the monitor finished.
    pub had_prompt: bool,

    /// Time from command write to channel silence.
    pub elapsed: Duration,
}

impl SectorResponse {
    /// Whether the monitor sent any payload at all.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The framed lines as an iterator.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }
}

impl std::fmt::Display for SectorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}
