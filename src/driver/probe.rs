//! Endpoint probing and classification.
//!
//! The remote end answers a bare carriage return differently depending on
//! what owns the link: the monitor echoes it and prints its prompt, a
//! resident OS answers with its own sentinel. The trailing character of a
//! silence-delimited drain is enough to tell them apart; nothing else in
//! the echoed bytes needs parsing. The raw character mapping lives in this
//! module only; everything else works with [`ProbeOutcome`].

/// Trailing character the monitor prints when ready for a command.
const MONITOR_PROMPT: u8 = b'>';

/// Trailing character printed when a resident OS owns the link.
const OS_SENTINEL: u8 = b'%';

/// Outcome of a single probe cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The monitor answered with its command prompt.
    MonitorReady,

    /// A resident operating system owns the link; the monitor's command
    /// protocol is not available.
    OsRunning,

    /// Nothing came back before the read timeout.
    NoResponse,

    /// Something answered, but not with a recognized prompt. Carries the
    /// trailing character for diagnostics.
    Other(char),
}

impl ProbeOutcome {
    /// Classify a drained response by its trailing character.
    ///
    /// An empty drain is a valid outcome, not a failure: it means no
    /// endpoint spoke up within the timeout.
    pub fn classify(response: &[u8]) -> Self {
        match response.last() {
            None => Self::NoResponse,
            Some(&MONITOR_PROMPT) => Self::MonitorReady,
            Some(&OS_SENTINEL) => Self::OsRunning,
            Some(&other) => Self::Other(other as char),
        }
    }
}
