use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

use crate::files::FileKey;

/// Per-file upload state. Attached to a file only once a submission attempt
/// starts; transitions are monotonic (Pending → Uploading → terminal) and a
/// terminal state never reverts within an attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    Pending,
    Uploading,
    Succeeded,
    Failed(String),
}

/// Result contract of the upload endpoint. A response missing `successful`
/// (or not parseable as this shape at all) is treated as fatal.
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub successful: Option<Vec<String>>,
    #[serde(default)]
    pub failed: HashMap<String, String>,
    pub message: Option<String>,
}

/// Terminal state of one submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Every bundle was processed.
    Completed,
    /// A fatal error stopped the run; later bundles were never attempted.
    Aborted,
}

/// Events streamed from the upload worker back to the UI thread.
#[derive(Debug)]
pub enum UploadEvent {
    /// A bundle request is about to be issued for these files.
    BundleStarted { index: usize, keys: Vec<FileKey> },
    /// Terminal status for a single file.
    FileResult { key: FileKey, status: UploadStatus },
    /// `message` from a recognized server response, for the result area.
    ServerMessage(String),
    /// Fatal diagnostic payload; the run stops after the current bundle.
    Fatal(String),
    /// The attempt reached a terminal state.
    Finished(SubmitOutcome),
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected server response")]
    UnexpectedResponse { raw: String },
}
