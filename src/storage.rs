use async_trait::async_trait;
use axum::body::Bytes;
use std::{
    collections::BTreeSet,
    io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};
use tokio::fs;
use uuid::Uuid;

/// UploadedFile
///
/// One file part taken from a multipart submission.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Multipart field name the file arrived under.
    pub field: String,
    /// Client-side filename; only its extension is kept.
    pub file_name: String,
    pub bytes: Bytes,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("i/o on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

// 1. StorageService Contract
/// StorageService
///
/// Defines the contract for persisting uploaded files. Paths returned by `store` are
/// relative (`/uploads/<folder>/<name>.<ext>`) and are what gets written into the row, so
/// the same value can later be handed back to `delete`.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Writes the file under a freshly generated name inside `folder`.
    async fn store(&self, file: &UploadedFile, folder: &str) -> Result<String, StorageError>;

    /// Removes a previously stored file. A missing file is an error.
    async fn delete(&self, path: &str) -> Result<(), StorageError>;
}

/// sanitize_key
///
/// Strips directory navigation components (`..`, `.`) and empty segments from a
/// client-influenced path so every resolved path stays under the storage root.
fn sanitize_key(key: &str) -> String {
    key.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".." && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Extension of the client filename, reduced to alphanumerics; `bin` when absent.
fn extension(file_name: &str) -> String {
    let ext: String = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();

    if ext.is_empty() { "bin".to_string() } else { ext.to_ascii_lowercase() }
}

fn generated_path(file: &UploadedFile, folder: &str) -> String {
    format!(
        "/uploads/{}/{}.{}",
        sanitize_key(folder),
        Uuid::new_v4().simple(),
        extension(&file.file_name)
    )
}

// 2. The Real Implementation (local disk)
/// LocalStorage
///
/// Writes files beneath `base_dir` with `tokio::fs`, creating folders on demand.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_dir: PathBuf,
}

impl LocalStorage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.base_dir.join(sanitize_key(path))
    }
}

#[async_trait]
impl StorageService for LocalStorage {
    async fn store(&self, file: &UploadedFile, folder: &str) -> Result<String, StorageError> {
        let relative = generated_path(file, folder);
        let target = self.resolve(&relative);

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::io(parent, e))?;
        }
        fs::write(&target, &file.bytes)
            .await
            .map_err(|e| StorageError::io(&target, e))?;

        tracing::debug!(path = %relative, size = file.bytes.len(), "stored upload");
        Ok(relative)
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        let target = self.resolve(path);
        fs::remove_file(&target)
            .await
            .map_err(|e| StorageError::io(&target, e))?;

        tracing::debug!(path, "deleted upload");
        Ok(())
    }
}

// 3. The Mock Implementation (For Tests)
/// MockStorageService
///
/// In-memory `StorageService` that records which paths currently exist. Handler tests
/// assert on `files()` to check that replacements leave exactly one file behind.
#[derive(Default)]
pub struct MockStorageService {
    /// When true, `store` returns a simulated failure.
    pub should_fail: bool,
    files: Mutex<BTreeSet<String>>,
}

impl MockStorageService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Pretends `path` was stored earlier.
    pub fn with_file(self, path: &str) -> Self {
        self.lock().insert(path.to_string());
        self
    }

    pub fn files(&self) -> Vec<String> {
        self.lock().iter().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeSet<String>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn store(&self, file: &UploadedFile, folder: &str) -> Result<String, StorageError> {
        if self.should_fail {
            return Err(StorageError::Unavailable(
                "Mock Storage Error: Simulation requested".to_string(),
            ));
        }

        let path = generated_path(file, folder);
        self.lock().insert(path.clone());
        Ok(path)
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        if self.lock().remove(path) {
            Ok(())
        } else {
            Err(StorageError::Io {
                path: path.to_string(),
                source: io::Error::from(io::ErrorKind::NotFound),
            })
        }
    }
}

/// StorageState
///
/// The shared storage handle carried in `AppState`.
pub type StorageState = Arc<dyn StorageService>;
