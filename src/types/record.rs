//! File Record
//!
//! Immutable metadata snapshot of one file, taken from the exact bytes that
//! are analyzed so the content hash and the report always agree.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: PathBuf,
    pub name: String,
    pub size_bytes: u64,
    pub size_human: String,
    /// Lowercased with a leading dot; empty when the file has no extension
    pub extension: String,
    pub mime_type: Option<String>,
    /// SHA-256 hex digest of the analyzed bytes
    pub content_hash: String,
}

impl FileRecord {
    /// Build a record from a byte snapshot.
    ///
    /// `mime_override` replaces the extension-based guess entirely.
    pub fn from_bytes(path: impl AsRef<Path>, bytes: &[u8], mime_override: Option<&str>) -> Self {
        let path = path.as_ref();
        let extension = normalize_extension(path);
        let mime_type = match mime_override {
            Some(mime) => Some(mime.to_string()),
            None => guess_mime(path),
        };
        let size_bytes = bytes.len() as u64;

        Self {
            path: path.to_path_buf(),
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            size_bytes,
            size_human: format_size(size_bytes),
            extension,
            mime_type,
            content_hash: sha256_hex(bytes),
        }
    }
}

/// Lowercased extension with leading dot, or empty string.
///
/// A dotfile such as `.env` has no extension of its own, so its whole name
/// stands in for one.
pub fn normalize_extension(path: &Path) -> String {
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        return format!(".{}", ext.to_lowercase());
    }
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) if name.len() > 1 && name.starts_with('.') => name.to_lowercase(),
        _ => String::new(),
    }
}

/// Best-effort MIME guess from the path
pub fn guess_mime(path: &Path) -> Option<String> {
    mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Human-readable size, 1024 base with one decimal
pub fn format_size(size_bytes: u64) -> String {
    let mut size = size_bytes as f64;
    for unit in ["bytes", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{:.1} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.1} TB", size)
}
