//! # diskmon
//!
//! Serial-link scraper for a legacy disk monitor.
//!
//! diskmon drives the line-oriented command protocol of a bespoke debug
//! monitor running on an embedded disk controller, reading fixed-geometry
//! cylinder/head/sector sectors and appending the returned text to a log.
//! It exists for one job: pulling data off drives whose only remaining
//! interface is a serial console.
//!
//! ## Features
//!
//! - Handshake probing that tells the monitor apart from a resident OS
//!   using nothing but the trailing character of an unlabelled byte stream
//! - Silence-delimited framing of echo-contaminated responses, with the
//!   trailing prompt artifact stripped
//! - Declarative TOML read plans (link parameters, probe tuning, sector
//!   lists and track sweeps)
//! - Append-only logging with one durable write per sector
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use diskmon::{FileLog, ReadPlan, Session, SessionOutcome};
//! use diskmon::transport::SerialTransport;
//!
//! fn main() -> Result<(), diskmon::Error> {
//!     let plan = ReadPlan::from_path("plan.toml".as_ref())?;
//!
//!     let transport = SerialTransport::open(&plan.link)?;
//!     let mut sink = FileLog::create(&plan.log)?;
//!
//!     let outcome = Session::builder(transport)
//!         .probe_config(&plan.probe)
//!         .build()
//!         .run(&plan.addresses(), &mut sink)?;
//!
//!     match outcome {
//!         SessionOutcome::Completed { sectors } => println!("read {sectors} sector(s)"),
//!         other => println!("abandoned: {other:?}"),
//!     }
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod driver;
pub mod error;
pub mod plan;
pub mod sink;
pub mod transport;

// Re-export main types for convenience
pub use driver::{ProbeOutcome, SectorResponse, Session, SessionBuilder, SessionOutcome};
pub use error::Error;
pub use plan::{ReadPlan, SectorAddress, TrackSweep};
pub use sink::{FileLog, LogSink, MemoryLog};
pub use transport::{SerialConfig, SerialTransport, Transport};
