//! Error types for diskmon.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Main error type for diskmon operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Serial transport errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Session-level errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Log sink errors
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    /// Read plan errors
    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),
}

/// Transport layer errors (serial device access).
///
/// A read that times out with nothing to deliver is *not* an error at this
/// layer; it comes back as a zero-length chunk and means the far end has
/// gone silent.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to open the serial device
    #[error("Failed to open {path}: {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: serialport::Error,
    },

    /// I/O error on the open link
    #[error("Serial I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Session controller errors.
#[derive(Error, Debug)]
pub enum SessionError {
    /// An operation was attempted after the link was released
    #[error("Session link already released")]
    LinkReleased,
}

/// Log sink errors.
#[derive(Error, Debug)]
pub enum SinkError {
    /// Failed to open the log destination
    #[error("Failed to open log {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to append to the log
    #[error("Failed to append to log: {0}")]
    Append(#[source] io::Error),
}

/// Read plan errors.
#[derive(Error, Debug)]
pub enum PlanError {
    /// Failed to read the plan file
    #[error("Failed to read plan {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The plan file is not valid TOML for a read plan
    #[error("Invalid plan: {0}")]
    Parse(#[from] toml::de::Error),

    /// The plan names no sectors to read
    #[error("Plan lists no sectors")]
    Empty,
}

/// Result type alias using diskmon's Error.
pub type Result<T> = std::result::Result<T, Error>;
