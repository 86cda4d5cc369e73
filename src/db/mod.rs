pub mod attachment_store;
pub mod trade_repo;

pub use attachment_store::AttachmentManager;
pub use trade_repo::RecordStore;

use crate::config::AppConfig;

/// Open the journal file and screenshot directory named by the config.
pub fn init_storage(config: &AppConfig) -> anyhow::Result<(RecordStore, AttachmentManager)> {
    let mut store = RecordStore::new(&config.journal_path);
    let attachments = AttachmentManager::new(&config.attachment_dir);

    attachments.ensure_store_directory()?;

    // Verify the journal is readable; a corrupt file is reported, not fatal.
    match store.load() {
        Ok(records) => tracing::info!(rows = records.len(), "Journal loaded"),
        Err(e) => tracing::warn!(error = %e, "Journal unreadable, starting from an empty table"),
    }

    Ok((store, attachments))
}
