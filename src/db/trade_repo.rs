use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};

use crate::errors::JournalError;
use crate::models::TradeRecord;

/// Header row of the backing file, in `TradeRecord` field order.
pub const COLUMNS: [&str; 30] = [
    "Trade ID",
    "Date/Time",
    "Market Bias",
    "Trade Type",
    "Setup/Strategy Name",
    "Entry Price",
    "Exit Price",
    "Stop Loss (SL)",
    "Take Profit (TP)",
    "Lot Size",
    "Risk ($ or %)",
    "Reward ($ or %)",
    "Result (Win/Loss/BE)",
    "P/L ($)",
    "R Multiple",
    "Emotional State (Before)",
    "Emotional State (During)",
    "Emotional State (After)",
    "Execution Grade",
    "Screenshot (Entry/Exit)",
    "Mistake Made? (Yes/No + What?)",
    "Lesson Learned",
    "Next Action Plan",
    "Session",
    "News Impact (Yes/No)",
    "Slippage",
    "Volatility Measure",
    "Market Conditions",
    "Time in Trade",
    "Confidence Rating (1–10)",
];

/// The journal table and the CSV file backing it.
///
/// Every mutation rewrites the whole file. The in-memory table only changes
/// once the write has succeeded, so a failed mutation can be retried as-is.
#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    records: Vec<TradeRecord>,
}

impl RecordStore {
    /// Bind a store to `path`. Nothing is read until `load`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records of the last successful load or mutation, in insertion order.
    pub fn records(&self) -> &[TradeRecord] {
        &self.records
    }

    /// Re-read the backing file. A missing file is created with just the
    /// header row. On a read failure the in-memory table is emptied.
    pub fn load(&mut self) -> Result<&[TradeRecord], JournalError> {
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "Journal file missing, creating empty table");
            write_table(&self.path, &[])?;
            self.records.clear();
            return Ok(&self.records);
        }

        match read_table(&self.path) {
            Ok(records) => {
                self.records = records;
                Ok(&self.records)
            }
            Err(e) => {
                self.records.clear();
                Err(e)
            }
        }
    }

    /// Exact, case-sensitive lookup against the current table.
    pub fn exists(&self, trade_id: &str) -> bool {
        self.find(trade_id).is_some()
    }

    pub fn find(&self, trade_id: &str) -> Option<&TradeRecord> {
        self.records.iter().find(|r| r.trade_id == trade_id)
    }

    /// Add `record` as the last row and persist.
    pub fn append(&mut self, record: TradeRecord) -> Result<(), JournalError> {
        if record.trade_id.trim().is_empty() {
            return Err(JournalError::Validation("Trade ID is required".into()));
        }
        if self.exists(&record.trade_id) {
            return Err(JournalError::DuplicateKey(record.trade_id));
        }

        let mut next = self.records.clone();
        next.push(record);
        self.commit(next)
    }

    /// Overwrite the screenshot reference of one record and persist.
    pub fn update_screenshot_path(
        &mut self,
        trade_id: &str,
        screenshot_path: Option<String>,
    ) -> Result<(), JournalError> {
        let idx = self
            .records
            .iter()
            .position(|r| r.trade_id == trade_id)
            .ok_or_else(|| JournalError::NotFound(trade_id.to_string()))?;

        let mut next = self.records.clone();
        next[idx].screenshot_path = screenshot_path;
        self.commit(next)
    }

    /// Write the current in-memory table over the backing file.
    pub fn persist(&self) -> Result<(), JournalError> {
        write_table(&self.path, &self.records)
    }

    /// Persist `records` as the whole table and adopt them on success.
    pub fn replace_all(&mut self, records: Vec<TradeRecord>) -> Result<(), JournalError> {
        self.commit(records)
    }

    /// Raw bytes of the backing file, for download.
    pub fn export_bytes(&mut self) -> Result<Vec<u8>, JournalError> {
        if !self.path.exists() {
            write_table(&self.path, &[])?;
        }
        fs::read(&self.path).map_err(|e| JournalError::StorageRead(e.to_string()))
    }

    fn commit(&mut self, next: Vec<TradeRecord>) -> Result<(), JournalError> {
        write_table(&self.path, &next)?;
        self.records = next;
        Ok(())
    }
}

fn read_table(path: &Path) -> Result<Vec<TradeRecord>, JournalError> {
    let read_err = |e: csv::Error| JournalError::StorageRead(format!("{}: {e}", path.display()));

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(read_err)?;

    let headers = reader.headers().map_err(read_err)?;
    if headers.iter().ne(COLUMNS) {
        return Err(JournalError::StorageRead(format!(
            "{}: unexpected header row",
            path.display()
        )));
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(read_err)?;
        // Positional: header names differ from field names.
        let record: TradeRecord = row.deserialize(None).map_err(read_err)?;
        records.push(record);
    }

    Ok(records)
}

/// Serialize the table to a sibling temp file and rename it into place, so
/// a failed write leaves the previous file intact.
fn write_table(path: &Path, records: &[TradeRecord]) -> Result<(), JournalError> {
    let write_err = |e: std::io::Error| JournalError::StorageWrite(format!("{}: {e}", path.display()));

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let bytes = encode_table(records).map_err(|e| JournalError::StorageWrite(e.to_string()))?;

    let tmp_path = path.with_extension("csv.tmp");
    if let Err(e) = replace_file(path, &tmp_path, &bytes) {
        let _ = fs::remove_file(&tmp_path);
        tracing::warn!(path = %path.display(), error = %e, "Journal write failed");
        return Err(write_err(e));
    }

    tracing::debug!(path = %path.display(), rows = records.len(), "Journal persisted");
    Ok(())
}

fn encode_table(records: &[TradeRecord]) -> csv::Result<Vec<u8>> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    writer.write_record(COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

fn replace_file(path: &Path, tmp_path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(tmp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    fs::rename(tmp_path, path)
}
