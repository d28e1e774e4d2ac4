//! Session driver for the remote monitor.
//!
//! The driver layer owns the protocol conversation: probing the endpoint,
//! walking the handshake state machine, and issuing sector-read commands.

mod builder;
mod probe;
mod response;
mod session;

pub(crate) use session::DEFAULT_RETRY_DELAY;

pub use builder::SessionBuilder;
pub use probe::ProbeOutcome;
pub use response::SectorResponse;
pub use session::{Session, SessionOutcome};
