//! Completed-session archive
//!
//! - Append-only, one JSON record per line
//! - File writes are flushed and synced before `append` returns
//! - No retention or purging; long-term storage is an external concern

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::result::SessionRecord;

/// Destination for completed sessions.
pub trait SessionArchive: Send + Sync {
    /// Append a record. The record must be durable when this returns.
    fn append(&self, record: &SessionRecord) -> io::Result<()>;

    /// Sync the archive to durable storage.
    fn sync(&self) -> io::Result<()>;
}

fn poisoned() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "archive lock poisoned")
}

/// JSON-lines file archive.
pub struct FileSessionArchive {
    path: PathBuf,
    writer: Arc<Mutex<BufWriter<File>>>,
}

impl FileSessionArchive {
    /// Open or create an archive file, appending to existing content.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path,
            writer: Arc::new(Mutex::new(BufWriter::new(file))),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionArchive for FileSessionArchive {
    fn append(&self, record: &SessionRecord) -> io::Result<()> {
        let line = record.to_json_line().map_err(io::Error::from)?;
        let mut writer = self.writer.lock().map_err(|_| poisoned())?;
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        writer.get_ref().sync_all()
    }

    fn sync(&self) -> io::Result<()> {
        let writer = self.writer.lock().map_err(|_| poisoned())?;
        writer.get_ref().sync_all()
    }
}

/// In-memory archive, used when no archive path is configured and in tests.
#[derive(Debug, Default)]
pub struct MemorySessionArchive {
    records: Mutex<Vec<SessionRecord>>,
}

impl MemorySessionArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// All archived records, oldest first
    pub fn records(&self) -> Vec<SessionRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionArchive for MemorySessionArchive {
    fn append(&self, record: &SessionRecord) -> io::Result<()> {
        self.records
            .lock()
            .map_err(|_| poisoned())?
            .push(record.clone());
        Ok(())
    }

    fn sync(&self) -> io::Result<()> {
        Ok(())
    }
}
