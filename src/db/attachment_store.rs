use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

use crate::errors::JournalError;

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];
const DEFAULT_EXTENSION: &str = "png";
const MAX_NAME_ATTEMPTS: u32 = 100;

/// Flat directory of trade screenshots named `{trade_id}_{YYYYMMDD_HHMMSS}.{ext}`.
#[derive(Debug, Clone)]
pub struct AttachmentManager {
    dir: PathBuf,
}

impl AttachmentManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ensure_store_directory(&self) -> Result<(), JournalError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            JournalError::AttachmentWrite(format!("{}: {e}", self.dir.display()))
        })
    }

    /// Write `bytes` for `trade_id`, stamped with the current local time.
    pub fn save(
        &self,
        bytes: &[u8],
        trade_id: &str,
        extension: Option<&str>,
    ) -> Result<String, JournalError> {
        self.save_at(bytes, trade_id, extension, Local::now().naive_local())
    }

    /// Same as `save` with an explicit timestamp. Never overwrites: when the
    /// name is taken (distinct ids can share a sanitized stem) a `_2`, `_3`,
    /// ... suffix is added.
    pub fn save_at(
        &self,
        bytes: &[u8],
        trade_id: &str,
        extension: Option<&str>,
        at: NaiveDateTime,
    ) -> Result<String, JournalError> {
        self.ensure_store_directory()?;

        let stem = format!("{}_{}", file_stem(trade_id), at.format("%Y%m%d_%H%M%S"));
        let (path, mut file) = self.create_unique(&stem, normalize_extension(extension))?;

        if let Err(e) = file.write_all(bytes).and_then(|_| file.sync_all()) {
            drop(file);
            let _ = fs::remove_file(&path);
            return Err(JournalError::AttachmentWrite(format!("{}: {e}", path.display())));
        }

        tracing::info!(trade_id, path = %path.display(), size = bytes.len(), "Screenshot saved");
        Ok(path.to_string_lossy().into_owned())
    }

    fn create_unique(&self, stem: &str, ext: &str) -> Result<(PathBuf, File), JournalError> {
        for attempt in 1..=MAX_NAME_ATTEMPTS {
            let file_name = if attempt == 1 {
                format!("{stem}.{ext}")
            } else {
                format!("{stem}_{attempt}.{ext}")
            };
            let path = self.dir.join(file_name);

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(JournalError::AttachmentWrite(format!("{}: {e}", path.display())))
                }
            }
        }

        Err(JournalError::AttachmentWrite(format!(
            "no free file name for {stem}.{ext} in {}",
            self.dir.display()
        )))
    }

    /// Read a stored screenshot. An absent path or a file removed behind our
    /// back are both `AttachmentNotFound`.
    pub fn load(&self, path: Option<&str>) -> Result<Vec<u8>, JournalError> {
        let path = path.ok_or_else(|| JournalError::AttachmentNotFound("no screenshot".into()))?;

        fs::read(path).map_err(|e| {
            tracing::debug!(path, error = %e, "Screenshot unreadable");
            JournalError::AttachmentNotFound(path.to_string())
        })
    }

    pub fn exists(&self, path: Option<&str>) -> bool {
        path.is_some_and(|p| Path::new(p).is_file())
    }

    /// Remove a stored screenshot, returning whether the file was removed.
    pub fn delete(&self, path: &str) -> bool {
        match fs::remove_file(path) {
            Ok(()) => {
                tracing::info!(path, "Screenshot deleted");
                true
            }
            Err(e) => {
                tracing::warn!(path, error = %e, "Screenshot delete failed");
                false
            }
        }
    }
}

/// MIME type for a stored screenshot, by extension.
pub fn content_type(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

/// Extension to store an upload under: the uploaded one when it is a known
/// image type, png otherwise.
pub fn normalize_extension(extension: Option<&str>) -> &'static str {
    let ext = extension
        .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
        .unwrap_or_default();

    ALLOWED_EXTENSIONS
        .iter()
        .find(|allowed| **allowed == ext)
        .copied()
        .unwrap_or(DEFAULT_EXTENSION)
}

/// Trade ids are free text; keep only characters that are safe in a file
/// name so the attachment stays inside the directory.
fn file_stem(trade_id: &str) -> String {
    let stem: String = trade_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if stem.is_empty() {
        "trade".into()
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 2)
            .unwrap()
            .and_hms_opt(9, 5, 7)
            .unwrap()
    }

    #[test]
    fn test_save_load_delete() {
        let dir = tempfile::tempdir().unwrap();
        let manager = AttachmentManager::new(dir.path().join("shots"));
        let bytes = b"\x89PNG\r\n\x1a\nfake image";

        let path = manager.save(bytes, "T1", Some("png")).unwrap();
        assert_eq!(manager.load(Some(path.as_str())).unwrap(), bytes);
        assert!(manager.exists(Some(path.as_str())));

        assert!(manager.delete(&path));
        let err = manager.load(Some(path.as_str())).unwrap_err();
        assert!(matches!(err, JournalError::AttachmentNotFound(_)));
        assert!(!manager.exists(Some(path.as_str())));
    }

    #[test]
    fn test_file_name_from_trade_id_and_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let manager = AttachmentManager::new(dir.path());

        let path = manager.save_at(b"x", "US100-42", Some("JPG"), at()).unwrap();

        assert_eq!(
            Path::new(&path).file_name().unwrap(),
            "US100-42_20250602_090507.jpg"
        );
        assert_eq!(Path::new(&path).parent().unwrap(), dir.path());
    }

    #[test]
    fn test_unsafe_trade_id_stays_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        let manager = AttachmentManager::new(dir.path());

        let path = manager.save_at(b"x", "../../etc/passwd", None, at()).unwrap();

        assert_eq!(Path::new(&path).parent().unwrap(), dir.path());
        assert_eq!(
            Path::new(&path).file_name().unwrap(),
            "______etc_passwd_20250602_090507.png"
        );
    }

    #[test]
    fn test_colliding_stems_get_distinct_files() {
        let dir = tempfile::tempdir().unwrap();
        let manager = AttachmentManager::new(dir.path());

        let first = manager.save_at(b"first", "T/1", None, at()).unwrap();
        let second = manager.save_at(b"second", "T_1", None, at()).unwrap();
        let third = manager.save_at(b"third", "T.1", None, at()).unwrap();

        assert_eq!(Path::new(&first).file_name().unwrap(), "T_1_20250602_090507.png");
        assert_eq!(Path::new(&second).file_name().unwrap(), "T_1_20250602_090507_2.png");
        assert_eq!(Path::new(&third).file_name().unwrap(), "T_1_20250602_090507_3.png");
        assert_eq!(manager.load(Some(first.as_str())).unwrap(), b"first");
        assert_eq!(manager.load(Some(second.as_str())).unwrap(), b"second");

        assert!(manager.delete(&second));
        assert_eq!(manager.load(Some(first.as_str())).unwrap(), b"first");
    }

    #[test]
    fn test_load_absent_path() {
        let manager = AttachmentManager::new("unused");
        let err = manager.load(None).unwrap_err();
        assert!(matches!(err, JournalError::AttachmentNotFound(_)));
    }

    #[test]
    fn test_delete_missing_file_returns_false() {
        let dir = tempfile::tempdir().unwrap();
        let manager = AttachmentManager::new(dir.path());
        let missing = dir.path().join("gone.png");

        assert!(!manager.delete(&missing.to_string_lossy()));
    }

    #[test]
    fn test_ensure_store_directory_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let manager = AttachmentManager::new(dir.path().join("a").join("b"));

        manager.ensure_store_directory().unwrap();
        manager.ensure_store_directory().unwrap();
        assert!(manager.dir().is_dir());
    }

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension(Some("PNG")), "png");
        assert_eq!(normalize_extension(Some(".jpeg")), "jpeg");
        assert_eq!(normalize_extension(Some("exe")), "png");
        assert_eq!(normalize_extension(None), "png");
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type("a/T1_20250101_000000.jpg"), "image/jpeg");
        assert_eq!(content_type("T1.png"), "image/png");
        assert_eq!(content_type("T1"), "application/octet-stream");
    }
}
