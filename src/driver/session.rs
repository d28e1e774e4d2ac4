//! Session controller: flush, probe, then walk the read plan.
//!
//! The session exclusively owns the open link and guarantees it is released
//! exactly once on every exit path: after the last sector on the success
//! path, immediately on abandonment, and on error propagation.

use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use super::builder::SessionBuilder;
use super::probe::ProbeOutcome;
use super::response::SectorResponse;
use crate::channel::{LineFramer, drain_silent};
use crate::error::{Result, SessionError};
use crate::plan::SectorAddress;
use crate::sink::LogSink;
use crate::transport::Transport;

/// Delay between probe attempts when the endpoint has not answered yet.
pub(crate) const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Terminal state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The monitor answered and every planned sector was read.
    Completed {
        /// Number of sectors read and logged.
        sectors: usize,
    },

    /// A resident operating system owns the link; no sectors were read.
    OsResident,

    /// The probe attempt cap was reached without a recognized endpoint.
    Unreachable,
}

/// Serial session against the remote monitor.
///
/// Drive it with [`run`](Self::run), which walks the whole state machine:
/// flush stale bytes, probe until a terminal state, read the planned
/// sectors in monitor mode, release the link.
pub struct Session<T: Transport> {
    transport: Option<T>,
    retry_delay: Duration,
    max_attempts: Option<u32>,
}

impl<T: Transport> Session<T> {
    /// Start building a session around an open transport.
    pub fn builder(transport: T) -> SessionBuilder<T> {
        SessionBuilder::new(transport)
    }

    pub(crate) fn new(transport: T, retry_delay: Duration, max_attempts: Option<u32>) -> Self {
        Self {
            transport: Some(transport),
            retry_delay,
            max_attempts,
        }
    }

    /// Whether the link is still held.
    pub fn is_open(&self) -> bool {
        self.transport.is_some()
    }

    fn link(&mut self) -> Result<&mut T> {
        Ok(self.transport.as_mut().ok_or(SessionError::LinkReleased)?)
    }

    /// Discard whatever is sitting in the receive buffer.
    ///
    /// A prior unterminated session can leave stale bytes queued on the
    /// link; anything already buffered would otherwise contaminate the
    /// first probe. Returns how many bytes were discarded.
    pub fn flush(&mut self) -> Result<usize> {
        let link = self.link()?;
        let stale = drain_silent(link)?;
        debug!("flush discarded {} stale byte(s)", stale.len());
        Ok(stale.len())
    }

    /// One probe cycle: send a bare carriage return, drain the response,
    /// classify the endpoint from the trailing character.
    ///
    /// Never fails on silence; an empty drain is a classified outcome.
    pub fn probe(&mut self) -> Result<ProbeOutcome> {
        let link = self.link()?;
        link.write_all(b"\r")?;
        let response = drain_silent(link)?;
        let outcome = ProbeOutcome::classify(&response);
        debug!("probe: {} byte(s) back -> {:?}", response.len(), outcome);
        Ok(outcome)
    }

    /// Request one sector and frame the response.
    ///
    /// Writes `r <cyl> <head> <sector>\r`, frames everything that comes
    /// back until the line goes silent, surfaces each completed line as it
    /// arrives, and appends the framed text to the sink in a single write.
    pub fn read_sector(
        &mut self,
        address: SectorAddress,
        sink: &mut dyn LogSink,
    ) -> Result<SectorResponse> {
        let link = self.link()?;
        let command = address.read_command();
        link.write_all(command.as_bytes())?;
        let start = Instant::now();

        let mut framer = LineFramer::new();
        let mut buf = [0u8; 256];
        loop {
            let n = link.read_chunk(&mut buf)?;
            if n == 0 {
                break;
            }
            for line in framer.feed(&buf[..n]) {
                info!("{}", line);
            }
        }

        let framed = framer.finish();
        if let Some(tail) = &framed.tail {
            info!("{}", tail);
        }

        let elapsed = start.elapsed();
        if framed.text.is_empty() {
            warn!("sector {}: monitor sent nothing back", address);
        } else if !framed.had_prompt {
            debug!("sector {}: response ended without a prompt", address);
        }

        sink.append(&framed.text)?;

        Ok(SectorResponse {
            address,
            text: framed.text,
            had_prompt: framed.had_prompt,
            elapsed,
        })
    }

    /// Drive the whole session, releasing the link on every path.
    ///
    /// Sectors are read in the order given; each one lands in the sink as
    /// exactly one append. Probing retries on the configured delay until
    /// the endpoint identifies itself or the optional attempt cap runs out.
    pub fn run(
        mut self,
        addresses: &[SectorAddress],
        sink: &mut dyn LogSink,
    ) -> Result<SessionOutcome> {
        let result = self.drive(addresses, sink);
        let released = self.close();
        let outcome = result?;
        released?;
        Ok(outcome)
    }

    fn drive(
        &mut self,
        addresses: &[SectorAddress],
        sink: &mut dyn LogSink,
    ) -> Result<SessionOutcome> {
        let discarded = self.flush()?;
        info!("flush done ({} stale byte(s))", discarded);

        let mut attempts = 0u32;
        loop {
            info!("probing ...");
            match self.probe()? {
                ProbeOutcome::MonitorReady => break,
                ProbeOutcome::OsRunning => {
                    info!("a resident OS owns the link; abandoning session");
                    return Ok(SessionOutcome::OsResident);
                }
                ProbeOutcome::NoResponse => debug!("no response"),
                ProbeOutcome::Other(c) => {
                    warn!("unrecognized trailing character {:?}; retrying", c);
                }
            }

            attempts += 1;
            if let Some(cap) = self.max_attempts {
                if attempts >= cap {
                    warn!("no endpoint after {} probe attempt(s); giving up", attempts);
                    return Ok(SessionOutcome::Unreachable);
                }
            }
            thread::sleep(self.retry_delay);
        }
        info!("talking to the monitor");

        for address in addresses {
            debug!("requesting sector {}", address);
            let response = self.read_sector(*address, sink)?;
            debug!(
                "sector {}: {} byte(s) logged in {:?}",
                address,
                response.text.len(),
                response.elapsed
            );
        }

        Ok(SessionOutcome::Completed {
            sectors: addresses.len(),
        })
    }

    /// Release the link. Idempotent; `run` calls this on every path.
    pub fn close(&mut self) -> Result<()> {
        if let Some(transport) = self.transport.take() {
            transport.close()?;
        }
        Ok(())
    }
}

impl<T: Transport> Drop for Session<T> {
    fn drop(&mut self) {
        if self.transport.is_some() {
            warn!("session dropped with the link still open");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemoryLog;
    use crate::transport::ScriptedTransport;

    fn fast_session(transport: ScriptedTransport) -> Session<ScriptedTransport> {
        Session::builder(transport)
            .retry_delay(Duration::from_millis(1))
            .build()
    }

    #[test]
    fn test_full_monitor_session() {
        let mut transport = ScriptedTransport::new();
        // stale bytes from a dead session, cleared by the flush
        transport.push_read(b"old junk");
        transport.push_silence();
        // probe answer: echoed CR plus the monitor prompt
        transport.push_read(b"\r\n>");
        transport.push_silence();
        // sector response: command echo, header, payload, prompt
        transport.push_read(b"r 99 2 4\r\n");
        transport.push_read(b"CHS = 99 2 4  0\n");
        transport.push_read(b"00ff00ff\n%");

        let writes = transport.writes();
        let closes = transport.close_count();
        let mut sink = MemoryLog::default();

        let outcome = fast_session(transport)
            .run(&[SectorAddress::new(99, 2, 4)], &mut sink)
            .unwrap();

        assert_eq!(outcome, SessionOutcome::Completed { sectors: 1 });
        assert_eq!(
            *writes.lock().unwrap(),
            vec![b"\r".to_vec(), b"r 99 2 4\r".to_vec()]
        );
        assert_eq!(*closes.lock().unwrap(), 1);
        assert_eq!(
            sink.entries,
            vec!["r 99 2 4\r\nCHS = 99 2 4  0\n00ff00ff\n".to_string()]
        );
    }

    #[test]
    fn test_os_resident_abandons_without_reading() {
        let mut transport = ScriptedTransport::new();
        transport.push_silence(); // flush finds nothing
        transport.push_read(b"\r\n%");

        let writes = transport.writes();
        let closes = transport.close_count();
        let mut sink = MemoryLog::default();

        let outcome = fast_session(transport)
            .run(&[SectorAddress::new(0, 0, 0)], &mut sink)
            .unwrap();

        assert_eq!(outcome, SessionOutcome::OsResident);
        // only the probe went out, never a read command
        assert_eq!(*writes.lock().unwrap(), vec![b"\r".to_vec()]);
        assert_eq!(*closes.lock().unwrap(), 1);
        assert!(sink.entries.is_empty());
    }

    #[test]
    fn test_probe_retries_until_monitor_answers() {
        let mut transport = ScriptedTransport::new();
        transport.push_silence(); // flush
        transport.push_silence(); // probe 1: nothing there
        transport.push_read(b"\r\n?"); // probe 2: noise
        transport.push_silence();
        transport.push_read(b"\r\n>"); // probe 3: monitor
        transport.push_silence();

        let writes = transport.writes();

        let outcome = fast_session(transport).run(&[], &mut MemoryLog::default()).unwrap();

        assert_eq!(outcome, SessionOutcome::Completed { sectors: 0 });
        let writes = writes.lock().unwrap();
        assert_eq!(writes.len(), 3);
        assert!(writes.iter().all(|w| w == b"\r"));
    }

    #[test]
    fn test_attempt_cap_gives_up() {
        let transport = ScriptedTransport::new(); // permanently silent line
        let writes = transport.writes();
        let closes = transport.close_count();

        let outcome = Session::builder(transport)
            .retry_delay(Duration::from_millis(1))
            .max_attempts(3)
            .build()
            .run(&[SectorAddress::new(1, 0, 0)], &mut MemoryLog::default())
            .unwrap();

        assert_eq!(outcome, SessionOutcome::Unreachable);
        assert_eq!(writes.lock().unwrap().len(), 3);
        assert_eq!(*closes.lock().unwrap(), 1);
    }

    #[test]
    fn test_silent_sector_still_gets_its_append() {
        let mut transport = ScriptedTransport::new();
        transport.push_silence(); // flush
        transport.push_read(b">"); // probe
        transport.push_silence();
        // monitor dies before the sector response: nothing queued

        let mut sink = MemoryLog::default();
        let outcome = fast_session(transport)
            .run(&[SectorAddress::new(5, 1, 2)], &mut sink)
            .unwrap();

        assert_eq!(outcome, SessionOutcome::Completed { sectors: 1 });
        assert_eq!(sink.entries, vec![String::new()]);
    }

    #[test]
    fn test_sectors_read_in_plan_order() {
        let mut transport = ScriptedTransport::new();
        transport.push_silence(); // flush
        transport.push_read(b">");
        transport.push_silence();
        transport.push_read(b"first\n%");
        transport.push_silence();
        transport.push_read(b"second\n%");

        let writes = transport.writes();
        let mut sink = MemoryLog::default();

        let addresses = [SectorAddress::new(7, 0, 1), SectorAddress::new(7, 0, 2)];
        let outcome = fast_session(transport).run(&addresses, &mut sink).unwrap();

        assert_eq!(outcome, SessionOutcome::Completed { sectors: 2 });
        assert_eq!(
            writes.lock().unwrap()[1..],
            [b"r 7 0 1\r".to_vec(), b"r 7 0 2\r".to_vec()]
        );
        assert_eq!(
            sink.entries,
            vec!["first\n".to_string(), "second\n".to_string()]
        );
    }
}
