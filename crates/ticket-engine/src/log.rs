//! Append-only CSV log of generated tickets.

use std::borrow::Cow;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use tracing::debug;

/// Column header written when the log file is first created.
const HEADER: &str = "ticket_id,prefix,number,generated_at";

/// One generated ticket.
#[derive(Debug, Clone, Serialize)]
pub struct TicketRecord {
    pub ticket_id: String,
    pub prefix: String,
    pub number: u64,
    /// Local wall-clock time, `YYYY-MM-DD HH:MM:SS`.
    pub generated_at: String,
}

impl TicketRecord {
    /// Build a record stamped with the current local time.
    pub fn now(prefix: &str, number: u64) -> Self {
        Self {
            ticket_id: format!("{prefix}{number}"),
            prefix: prefix.to_string(),
            number,
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Append-only CSV log, created with a header row on first use.
///
/// Rows are never rewritten or deduplicated; regenerating a ticket appends
/// another row.
#[derive(Debug, Clone)]
pub struct TicketLog {
    path: PathBuf,
}

impl TicketLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, writing the header first if the file is new.
    pub fn append(&self, record: &TicketRecord) -> std::io::Result<()> {
        let is_new = !self.path.exists();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if is_new {
            writeln!(file, "{HEADER}")?;
        }
        writeln!(
            file,
            "{},{},{},{}",
            escape(&record.ticket_id),
            escape(&record.prefix),
            record.number,
            record.generated_at
        )?;
        debug!(ticket_id = %record.ticket_id, path = %self.path.display(), "Appended log row");
        Ok(())
    }
}

/// Quote a field that contains a delimiter, quote, or newline.
fn escape(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
