pub mod export;
pub mod health;
pub mod metrics;
pub mod trades;

use std::sync::Arc;

use crate::errors::AppError;
use crate::journal::Journal;
use crate::AppState;

/// Run `f` against the journal on the blocking pool, holding the journal
/// lock for the whole action so no two actions interleave.
pub async fn with_journal<T, F>(state: &AppState, f: F) -> Result<T, AppError>
where
    F: FnOnce(&mut Journal) -> T + Send + 'static,
    T: Send + 'static,
{
    let journal = Arc::clone(&state.journal);

    tokio::task::spawn_blocking(move || -> Result<T, AppError> {
        let mut guard = journal
            .lock()
            .map_err(|_| anyhow::anyhow!("journal lock poisoned"))?;
        Ok(f(&mut *guard))
    })
    .await
    .map_err(|e| AppError::Internal(e.into()))?
}
