use std::env;
use std::path::PathBuf;

const DEFAULT_JOURNAL_FILE: &str = "US100_Trade_Journal_Entries.csv";
const DEFAULT_ATTACHMENT_DIR: &str = "screenshots";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,

    // Storage
    pub journal_path: PathBuf,
    pub attachment_dir: PathBuf,

    /// Request body cap for form submissions, screenshot included.
    pub max_upload_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8501".into())
                .parse()?,

            journal_path: env::var("JOURNAL_FILE")
                .unwrap_or_else(|_| DEFAULT_JOURNAL_FILE.into())
                .into(),
            attachment_dir: env::var("ATTACHMENT_DIR")
                .unwrap_or_else(|_| DEFAULT_ATTACHMENT_DIR.into())
                .into(),

            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        })
    }

    /// Config rooted in `dir`, for tests and throwaway journals.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            journal_path: dir.join(DEFAULT_JOURNAL_FILE),
            attachment_dir: dir.join(DEFAULT_ATTACHMENT_DIR),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}
