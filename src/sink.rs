//! Append-only sinks for recovered sector text.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Result, SinkError};

/// Append-only destination for framed responses.
///
/// The session performs exactly one append per sector read, containing the
/// whole framed text for that sector.
pub trait LogSink {
    /// Append one framed response.
    fn append(&mut self, text: &str) -> Result<()>;
}

/// Log file on disk, opened in append mode.
///
/// Each append is flushed straight through, so a session that dies mid-run
/// keeps everything it already recovered.
pub struct FileLog {
    path: PathBuf,
    file: File,
}

impl FileLog {
    /// Open (creating if needed) the log at `path` for appending.
    pub fn create(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| SinkError::OpenFailed {
                path: path.to_path_buf(),
                source,
            })?;
        debug!("logging to {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Where this log writes.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileLog {
    fn append(&mut self, text: &str) -> Result<()> {
        self.file
            .write_all(text.as_bytes())
            .and_then(|()| self.file.flush())
            .map_err(SinkError::Append)?;
        Ok(())
    }
}

/// In-memory sink for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryLog {
    /// One entry per append, in order.
    pub entries: Vec<String>,
}

impl LogSink for MemoryLog {
    fn append(&mut self, text: &str) -> Result<()> {
        self.entries.push(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_file_log_appends_across_calls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monitor.log");

        let mut log = FileLog::create(&path).unwrap();
        log.append("one\n").unwrap();
        log.append("two\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn test_file_log_preserves_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monitor.log");
        fs::write(&path, "earlier run\n").unwrap();

        FileLog::create(&path).unwrap().append("this run\n").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "earlier run\nthis run\n"
        );
    }

    #[test]
    fn test_memory_log_keeps_one_entry_per_append() {
        let mut log = MemoryLog::default();
        log.append("a\nb\n").unwrap();
        log.append("").unwrap();
        assert_eq!(log.entries, vec!["a\nb\n".to_string(), String::new()]);
    }
}
