//! Request handling for the journal.
//!
//! Every user action runs one full cycle against the backing file: load,
//! mutate, persist, then rebuild the render model from what is on disk.
//! Nothing but the backing file and the screenshot directory survives
//! between actions.

pub mod view;

pub use view::{Notice, NoticeLevel, RenderModel, TradeView};

use std::path::Path;

use chrono::Local;
use metrics::{counter, gauge};

use crate::db::attachment_store::content_type;
use crate::db::{AttachmentManager, RecordStore};
use crate::errors::JournalError;
use crate::models::{NewTrade, TradeRecord};

/// An uploaded screenshot as received from the form.
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub bytes: Vec<u8>,
    /// Extension of the uploaded file name, if it had one.
    pub extension: Option<String>,
}

#[derive(Debug, Clone)]
pub enum JournalAction {
    /// Just render the history.
    View,
    Submit {
        trade: NewTrade,
        screenshot: Option<Upload>,
    },
    DeleteScreenshot {
        trade_id: String,
    },
}

/// Result of one action: the view to render and, if the action failed,
/// why. The view is produced either way.
#[derive(Debug)]
pub struct ActionOutcome {
    pub view: RenderModel,
    pub error: Option<JournalError>,
}

/// A stored screenshot ready to be served.
#[derive(Debug, Clone, PartialEq)]
pub struct Screenshot {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

#[derive(Debug)]
pub struct Journal {
    store: RecordStore,
    attachments: AttachmentManager,
}

impl Journal {
    pub fn new(store: RecordStore, attachments: AttachmentManager) -> Self {
        Self { store, attachments }
    }

    /// Run one user action and render the journal afterwards.
    pub fn handle(&mut self, action: JournalAction) -> ActionOutcome {
        let mut notices = Vec::new();

        // A corrupt file must not lock the user out of the form.
        if let Err(e) = self.reload() {
            notices.push(Notice::warning(format!(
                "{e}. Showing an empty journal; saving will overwrite the file."
            )));
        }

        let result = match action {
            JournalAction::View => Ok(None),
            JournalAction::Submit { trade, screenshot } => self
                .submit(trade, screenshot)
                .map(|_| Some("Trade saved successfully!".to_string())),
            JournalAction::DeleteScreenshot { trade_id } => self
                .delete_screenshot(&trade_id)
                .map(|_| Some(format!("Screenshot for trade '{trade_id}' deleted"))),
        };

        let error = match result {
            Ok(Some(message)) => {
                notices.push(Notice::success(message));
                None
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Journal action rejected");
                notices.push(Notice::error(e.to_string()));
                Some(e)
            }
        };

        gauge!("journal_rows").set(self.store.records().len() as f64);

        ActionOutcome {
            view: RenderModel::build(self.store.records(), &self.attachments, notices),
            error,
        }
    }

    /// Expanded view of a single record.
    pub fn trade(&mut self, trade_id: &str) -> Result<TradeView, JournalError> {
        self.reload()?;
        let record = self
            .store
            .find(trade_id)
            .ok_or_else(|| JournalError::NotFound(trade_id.to_string()))?;

        Ok(TradeView::new(record, &self.attachments))
    }

    pub fn screenshot(&mut self, trade_id: &str) -> Result<Screenshot, JournalError> {
        self.reload()?;
        let record = self
            .store
            .find(trade_id)
            .ok_or_else(|| JournalError::NotFound(trade_id.to_string()))?;

        let path = record.screenshot_path.as_deref();
        let bytes = self.attachments.load(path)?;

        Ok(Screenshot {
            bytes,
            content_type: path.map(content_type).unwrap_or("application/octet-stream"),
        })
    }

    /// Raw backing file bytes, unchanged.
    pub fn export(&mut self) -> Result<Vec<u8>, JournalError> {
        self.store.export_bytes()
    }

    /// Row count of the backing file, failing if it cannot be read.
    pub fn check(&mut self) -> Result<usize, JournalError> {
        self.reload()?;
        Ok(self.store.records().len())
    }

    fn reload(&mut self) -> Result<(), JournalError> {
        match self.store.load() {
            Ok(_) => Ok(()),
            Err(e) => {
                counter!("storage_read_errors_total").increment(1);
                tracing::warn!(
                    path = %self.store.path().display(),
                    error = %e,
                    "Journal unreadable, falling back to an empty table"
                );
                Err(e)
            }
        }
    }

    fn submit(
        &mut self,
        trade: NewTrade,
        screenshot: Option<Upload>,
    ) -> Result<TradeRecord, JournalError> {
        // Both checks run before anything touches the disk.
        if trade.trade_id.trim().is_empty() {
            return Err(JournalError::Validation("Trade ID is required".into()));
        }
        if self.store.exists(&trade.trade_id) {
            counter!("duplicate_rejections_total").increment(1);
            return Err(JournalError::DuplicateKey(trade.trade_id));
        }

        let screenshot_path = match &screenshot {
            Some(upload) => {
                let path = self.attachments.save(
                    &upload.bytes,
                    &trade.trade_id,
                    upload.extension.as_deref(),
                )?;
                counter!("screenshots_saved_total").increment(1);
                Some(path)
            }
            None => None,
        };

        let record = trade.into_record(Local::now().naive_local(), screenshot_path.clone());
        if let Err(e) = self.store.append(record.clone()) {
            counter!("storage_write_errors_total").increment(1);
            if let Some(path) = &screenshot_path {
                self.attachments.delete(path);
            }
            return Err(e);
        }

        counter!("trades_appended_total").increment(1);
        tracing::info!(
            trade_id = %record.trade_id,
            result = %record.result,
            has_screenshot = record.screenshot_path.is_some(),
            "Trade saved"
        );

        Ok(record)
    }

    fn delete_screenshot(&mut self, trade_id: &str) -> Result<(), JournalError> {
        let record = self
            .store
            .find(trade_id)
            .ok_or_else(|| JournalError::NotFound(trade_id.to_string()))?;
        let path = record.screenshot_path.clone().ok_or_else(|| {
            JournalError::AttachmentNotFound(format!("trade '{trade_id}' has no screenshot"))
        })?;

        if !self.attachments.delete(&path) {
            if Path::new(&path).exists() {
                return Err(JournalError::AttachmentWrite(format!(
                    "could not remove {path}"
                )));
            }
            tracing::info!(trade_id, path = %path, "Clearing reference to missing screenshot");
        }

        // Not atomic with the removal above; a crash here leaves a path to
        // a missing file, which every reader already treats as no screenshot.
        self.store.update_screenshot_path(trade_id, None)?;
        counter!("screenshots_deleted_total").increment(1);

        Ok(())
    }
}
