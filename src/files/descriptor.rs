use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

/// Identity of a selected file. Two selections with the same name, size and
/// modification time are treated as the same logical file, so re-dropping a
/// file never duplicates it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileKey {
    pub name: String,
    pub size: u64,
    pub last_modified_ms: i64,
}

impl fmt::Display for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.name, self.size, self.last_modified_ms)
    }
}

/// Immutable reference to a user-selected file. The path is where the bytes
/// live on this machine; it is not part of the identity key.
#[derive(Debug, Clone)]
pub struct FileDescriptor {
    pub name: String,
    pub size: u64,
    pub mime: String,
    pub last_modified_ms: i64,
    pub path: PathBuf,
}

impl FileDescriptor {
    /// Builds a descriptor from a picked or dropped path. Returns `None` for
    /// paths that are not regular readable files.
    pub fn from_path(path: &Path) -> Option<Self> {
        let metadata = fs::metadata(path).ok()?;
        if !metadata.is_file() {
            return None;
        }

        let name = path.file_name()?.to_str()?.to_string();
        let last_modified_ms = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);
        let mime = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string();

        Some(Self {
            name,
            size: metadata.len(),
            mime,
            last_modified_ms,
            path: path.to_path_buf(),
        })
    }

    pub fn key(&self) -> FileKey {
        FileKey {
            name: self.name.clone(),
            size: self.size,
            last_modified_ms: self.last_modified_ms,
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }

    pub fn is_video(&self) -> bool {
        self.mime.starts_with("video/")
    }
}

#[cfg(test)]
pub(crate) fn test_descriptor(name: &str, size: u64, mime: &str) -> FileDescriptor {
    FileDescriptor {
        name: name.to_string(),
        size,
        mime: mime.to_string(),
        last_modified_ms: 1_700_000_000_000,
        path: PathBuf::from(name),
    }
}
