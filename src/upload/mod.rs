mod coordinator;
mod types;

pub use coordinator::{spawn_submission, UploadCoordinator, BUNDLE_SIZE, UPLOAD_URL};
pub use types::{SubmitOutcome, UploadError, UploadEvent, UploadResponse, UploadStatus};
