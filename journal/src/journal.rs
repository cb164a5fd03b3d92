use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::JournalError;
use crate::record::Record;

/// An append-only NDJSON event log for a single session.
///
/// Writes are serialized through a single mutex, matching a "single mutex (or a
/// single-writer actor)" discipline: the Journal is the only cross-task mutable
/// resource in the system.
pub struct Journal {
    path: PathBuf,
    writer: Mutex<File>,
}

impl Journal {
    /// Opens (creating if necessary) the journal file at `path` for appending.
    pub fn open(path: impl Into<PathBuf>) -> Result<Journal, JournalError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Journal {
            path,
            writer: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends a single record as one JSON line. A single `write_all` call of the
    /// serialized line (plus trailing `\n`) gives a full-line-or-nothing guarantee on
    /// crash for lines under `PIPE_BUF`.
    pub fn append(&self, record: &Record) -> Result<(), JournalError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        let mut writer = self.writer.lock();
        writer.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Flushes and fsyncs the underlying file. Called before a session transitions to
    /// `session_complete`/`session_abort` so the terminal record is durable.
    pub fn sync(&self) -> Result<(), JournalError> {
        let writer = self.writer.lock();
        writer.sync_all()?;
        Ok(())
    }
}

/// Reads records from a journal file in file order. Malformed lines are logged at
/// `warn` and skipped rather than halting iteration.
pub fn iterate(path: impl AsRef<Path>) -> Result<Vec<Record>, JournalError> {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };
    let reader = BufReader::new(file);
    let mut records = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Record>(&line) {
            Ok(record) => records.push(record),
            Err(err) => {
                log::warn!(
                    "skipping malformed journal record at {}:{}: {err}",
                    path.display(),
                    line_no + 1
                );
            }
        }
    }
    Ok(records)
}
