//! # View History
//!
//! Remembers which stories were watched, in `~/.pixie/history.json`.
//!
//! One record is appended per viewing session when the viewer closes.
//! The file is capped at `max_records`, keeping the newest. All writes use
//! atomic rename (write `.tmp`, then `rename()`) for crash safety.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::core::state::Viewer;

const HISTORY_FILE: &str = "history.json";

/// One finished viewing session.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ViewRecord {
    pub id: String,
    pub subject: String,
    pub items_seen: usize,
    pub total_items: usize,
    /// True when the viewer ran past the last item rather than being closed.
    pub completed: bool,
    pub viewed_at: i64,
}

impl ViewRecord {
    pub fn from_viewer(viewer: &Viewer) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            subject: viewer.queue().subject().to_string(),
            items_seen: viewer.items_seen(),
            total_items: viewer.queue().len(),
            completed: viewer.is_completed(),
            viewed_at: Utc::now().timestamp(),
        }
    }

    /// Fully viewed means every item was on screen at some point.
    pub fn fully_viewed(&self) -> bool {
        self.completed || self.items_seen >= self.total_items
    }
}

/// Records stored oldest first.
#[derive(Serialize, Deserialize, Default, Debug)]
pub struct ViewHistory {
    pub records: Vec<ViewRecord>,
}

/// Returns `~/.pixie/`, creating it if needed.
pub fn history_dir() -> io::Result<PathBuf> {
    let dir = crate::core::config::pixie_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory"))?;
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Load the history from `dir`. A missing file is an empty history.
pub fn load_history(dir: &Path) -> io::Result<ViewHistory> {
    let path = dir.join(HISTORY_FILE);
    if !path.exists() {
        return Ok(ViewHistory::default());
    }
    let json = fs::read_to_string(path)?;
    serde_json::from_str(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Append a record, dropping the oldest beyond `max_records`. The new
/// record is always kept, so a cap below one counts as one.
pub fn append_record(dir: &Path, record: ViewRecord, max_records: usize) -> io::Result<()> {
    let max_records = max_records.max(1);
    let mut history = load_history(dir).unwrap_or_else(|e| {
        warn!("Discarding unreadable history: {}", e);
        ViewHistory::default()
    });
    history.records.push(record);
    if history.records.len() > max_records {
        let excess = history.records.len() - max_records;
        history.records.drain(..excess);
    }
    atomic_write_json(&dir.join(HISTORY_FILE), &history)
}

/// Newest first, at most `limit` records.
pub fn recent(history: &ViewHistory, limit: usize) -> Vec<&ViewRecord> {
    history.records.iter().rev().take(limit).collect()
}

/// One line for `pixie history`: `"Jan 15 14:02  Dennis  3/3 ✓"`.
pub fn format_record(record: &ViewRecord) -> String {
    use chrono::{DateTime, Local};
    let when: DateTime<Local> = DateTime::<Utc>::from_timestamp(record.viewed_at, 0)
        .unwrap_or_default()
        .with_timezone(&Local);
    let mark = if record.fully_viewed() { " ✓" } else { "" };
    format!(
        "{}  {}  {}/{}{}",
        when.format("%b %d %H:%M"),
        record.subject,
        record.items_seen,
        record.total_items,
        mark
    )
}

/// Save a record for a closed viewer. This is the single entry point for
/// history persistence; failures are logged, never fatal.
pub fn record_session(viewer: &Viewer, max_records: usize) {
    let record = ViewRecord::from_viewer(viewer);
    let result = history_dir().and_then(|dir| append_record(&dir, record.clone(), max_records));
    match result {
        Ok(()) => debug!(
            "History saved: {} ({}/{} items)",
            record.subject, record.items_seen, record.total_items
        ),
        Err(e) => warn!("Failed to save view history: {}", e),
    }
}
