//! Channel layer: silence-delimited reads and line framing.
//!
//! The monitor's wire format has no length fields and no end-of-message
//! marker. The only framing signals available are the line feed between
//! lines and the read timeout at the end of a transmission; this module
//! turns those into discrete lines and a drained byte buffer.

mod framer;

pub use framer::{FramedResponse, LineFramer};

use bytes::BytesMut;

use crate::error::Result;
use crate::transport::Transport;

/// Read until a single read attempt comes back empty, concatenating
/// everything received.
///
/// This is the silence-delimited read: a zero-byte read means the far end
/// has finished sending for now, not that the link is down.
pub fn drain_silent(transport: &mut impl Transport) -> Result<Vec<u8>> {
    let mut out = BytesMut::new();
    let mut buf = [0u8; 256];

    loop {
        let n = transport.read_chunk(&mut buf)?;
        if n == 0 {
            break;
        }
        out.extend_from_slice(&buf[..n]);
    }

    Ok(out.to_vec())
}
