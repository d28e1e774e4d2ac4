//! Builder for sessions.

use std::time::Duration;

use super::session::{DEFAULT_RETRY_DELAY, Session};
use crate::plan::ProbeConfig;
use crate::transport::Transport;

/// Builder for constructing a [`Session`] around an open transport.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use diskmon::transport::{SerialConfig, SerialTransport};
/// use diskmon::Session;
///
/// # fn example() -> diskmon::error::Result<()> {
/// let transport = SerialTransport::open(&SerialConfig::default())?;
/// let session = Session::builder(transport)
///     .retry_delay(Duration::from_millis(500))
///     .max_attempts(40)
///     .build();
/// # Ok(())
/// # }
/// ```
pub struct SessionBuilder<T: Transport> {
    transport: T,
    retry_delay: Duration,
    max_attempts: Option<u32>,
}

impl<T: Transport> SessionBuilder<T> {
    pub(crate) fn new(transport: T) -> Self {
        Self {
            transport,
            retry_delay: DEFAULT_RETRY_DELAY,
            max_attempts: None,
        }
    }

    /// Set the delay between probe attempts (default: 500 ms).
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Cap the number of probe attempts. Probing is unbounded by default;
    /// a cap keeps unattended runs finite.
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Apply probe tuning from a read plan.
    pub fn probe_config(mut self, config: &ProbeConfig) -> Self {
        self.retry_delay = config.retry_delay;
        self.max_attempts = config.max_attempts;
        self
    }

    /// Build the session.
    pub fn build(self) -> Session<T> {
        Session::new(self.transport, self.retry_delay, self.max_attempts)
    }
}
