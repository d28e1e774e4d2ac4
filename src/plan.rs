//! Read plan: which sectors to request, over which link.
//!
//! The whole configuration surface lives in one TOML file (serial link
//! parameters, probe tuning, log destination, and the ordered list of
//! sector addresses) so a recovery run is reproducible from the plan
//! alone.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::driver::DEFAULT_RETRY_DELAY;
use crate::error::{PlanError, Result};
use crate::transport::SerialConfig;

/// A cylinder/head/sector address in the drive's native geometry.
///
/// Field widths follow the controller's command block: 16-bit cylinder,
/// 8-bit head and sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SectorAddress {
    pub cylinder: u16,
    pub head: u8,
    pub sector: u8,
}

impl SectorAddress {
    /// Create an address.
    pub fn new(cylinder: u16, head: u8, sector: u8) -> Self {
        Self {
            cylinder,
            head,
            sector,
        }
    }

    /// Encode the monitor's read command for this address.
    ///
    /// The wire format is exact: `r`, the three coordinates as unpadded
    /// decimal integers separated by single spaces, and a lone carriage
    /// return, no line feed.
    pub fn read_command(&self) -> String {
        format!("r {} {} {}\r", self.cylinder, self.head, self.sector)
    }
}

impl fmt::Display for SectorAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.cylinder, self.head, self.sector)
    }
}

/// A contiguous run of sectors on one track.
///
/// Expands to `count` consecutive addresses starting at `start`, all on
/// the same cylinder and head.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TrackSweep {
    pub cylinder: u16,
    pub head: u8,

    /// First sector of the run.
    #[serde(default)]
    pub start: u8,

    /// Number of sectors to read.
    pub count: u8,
}

impl TrackSweep {
    /// The addresses covered by this sweep, in ascending sector order.
    pub fn addresses(&self) -> impl Iterator<Item = SectorAddress> + '_ {
        (0..self.count)
            .map(|i| SectorAddress::new(self.cylinder, self.head, self.start + i))
    }
}

/// Probe loop tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Delay between probe attempts.
    #[serde(with = "humantime_serde")]
    pub retry_delay: Duration,

    /// Give up after this many attempts. Unbounded when absent.
    pub max_attempts: Option<u32>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            retry_delay: DEFAULT_RETRY_DELAY,
            max_attempts: None,
        }
    }
}

/// Full configuration for one recovery session.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadPlan {
    /// Serial link parameters.
    #[serde(default)]
    pub link: SerialConfig,

    /// Probe loop tuning.
    #[serde(default)]
    pub probe: ProbeConfig,

    /// Append-only log destination.
    #[serde(default = "default_log_path")]
    pub log: PathBuf,

    /// Individual sectors, read first in file order.
    #[serde(default)]
    pub sectors: Vec<SectorAddress>,

    /// Track sweeps, expanded after the individual sectors, in file order.
    #[serde(default)]
    pub tracks: Vec<TrackSweep>,
}

fn default_log_path() -> PathBuf {
    PathBuf::from("monitor.log")
}

impl ReadPlan {
    /// Load and validate a plan from a TOML file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| PlanError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let plan: Self = toml::from_str(&text).map_err(PlanError::Parse)?;

        if plan.sectors.is_empty() && plan.tracks.iter().all(|t| t.count == 0) {
            return Err(PlanError::Empty.into());
        }
        Ok(plan)
    }

    /// The full ordered list of addresses to read: explicit sectors first,
    /// then each track sweep.
    pub fn addresses(&self) -> Vec<SectorAddress> {
        let mut out = self.sectors.clone();
        for track in &self.tracks {
            out.extend(track.addresses());
        }
        out
    }
}
