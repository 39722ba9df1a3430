//! # Export Cache
//!
//! Writes the encoded workbook to a transient location and hands back a
//! handle that the share and mail collaborators can point at.
//!
//! ## Platform-Specific Paths
//! - **macOS**: `~/Library/Caches/com.packlist.station/PackingList.xlsx`
//! - **Windows**: `%LOCALAPPDATA%\packlist\station\cache\PackingList.xlsx`
//! - **Linux**: `~/.cache/packlist-station/PackingList.xlsx`
//!
//! Every export overwrites the previous file; nothing here is kept across
//! sessions on purpose.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::error::{ExportError, ExportResult};

/// Where exports are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportCache {
    dir: PathBuf,
    file_name: String,
}

impl ExportCache {
    /// Creates a cache rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        ExportCache {
            dir: dir.into(),
            file_name: file_name.into(),
        }
    }

    /// Uses `dir_override` if given, otherwise the platform cache directory.
    pub fn resolve(dir_override: Option<&Path>, file_name: &str) -> ExportResult<Self> {
        if let Some(dir) = dir_override {
            debug!(?dir, "Using configured export directory");
            return Ok(Self::new(dir, file_name));
        }

        let dirs = ProjectDirs::from("com", "packlist", "station").ok_or_else(|| {
            ExportError::CacheDirUnavailable("no home directory for this user".to_string())
        })?;

        Ok(Self::new(dirs.cache_dir(), file_name))
    }

    /// Directory the export file lives in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of the export file.
    pub fn file_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

/// Location of a persisted export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportHandle {
    /// Path on the local file system.
    pub path: PathBuf,

    /// `file://` URI of `path`, as shared with other apps.
    pub uri: String,

    /// Size of the written file.
    pub size_bytes: u64,
}

impl ExportHandle {
    fn for_path(path: PathBuf, size_bytes: u64) -> ExportResult<Self> {
        let uri = file_uri(&path)?.to_string();
        Ok(ExportHandle {
            path,
            uri,
            size_bytes,
        })
    }
}

/// Percent-encoded `file://` URI of `path`, resolved against the working
/// directory when relative.
fn file_uri(path: &Path) -> ExportResult<Url> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|_| ExportError::FileUri(path.to_path_buf()))?
            .join(path)
    };
    Url::from_file_path(&absolute).map_err(|()| ExportError::FileUri(absolute))
}

/// Writes `bytes` to the cache location and returns its handle.
///
/// The cache directory is created when missing. Any I/O failure surfaces as
/// `ExportError::WriteFailed`; the caller retries the whole export.
pub async fn persist(bytes: &[u8], cache: &ExportCache) -> ExportResult<ExportHandle> {
    tokio::fs::create_dir_all(&cache.dir)
        .await
        .map_err(|e| ExportError::write_failed(&cache.dir, e))?;

    let path = cache.file_path();
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| ExportError::write_failed(&path, e))?;

    info!(?path, bytes = bytes.len(), "Export written");
    ExportHandle::for_path(path, bytes.len() as u64)
}
