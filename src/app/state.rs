use std::collections::HashMap;
use std::sync::mpsc::Receiver;

use crate::files::FileKey;
use crate::upload::{SubmitOutcome, UploadEvent, UploadStatus};

/// Submission attempt state machine. Submit is disabled for the whole
/// Submitting phase; Completed and Aborted both re-enable it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Submitting {
        total_bundles: usize,
        current_bundle: usize,
    },
    Completed,
    Aborted,
}

impl SubmitPhase {
    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting { .. })
    }
}

/// Per-attempt submission state owned by the UI thread. All mutation happens
/// here, fed by worker events; the worker itself never touches shared state.
#[derive(Default)]
pub struct SubmissionState {
    pub phase: SubmitPhase,
    /// Absent before the first submission attempt.
    pub statuses: HashMap<FileKey, UploadStatus>,
    /// Result area content: server message, or fatal diagnostic payload.
    pub result_text: Option<String>,
    pub event_receiver: Option<Receiver<UploadEvent>>,
}

impl SubmissionState {
    /// Enters Submitting: every file of the attempt starts out Pending, which
    /// is how never-attempted bundles remain distinguishable from failed ones.
    pub fn begin(&mut self, keys: Vec<FileKey>, total_bundles: usize, events: Receiver<UploadEvent>) {
        self.statuses = keys
            .into_iter()
            .map(|key| (key, UploadStatus::Pending))
            .collect();
        self.result_text = None;
        self.event_receiver = Some(events);
        self.phase = SubmitPhase::Submitting {
            total_bundles,
            current_bundle: 0,
        };
    }

    pub fn apply_event(&mut self, event: UploadEvent) {
        match event {
            UploadEvent::BundleStarted { index, keys } => {
                if let SubmitPhase::Submitting { current_bundle, .. } = &mut self.phase {
                    *current_bundle = index + 1;
                }
                for key in keys {
                    // Pending → Uploading only; terminal statuses never revert.
                    if self.statuses.get(&key) == Some(&UploadStatus::Pending) {
                        self.statuses.insert(key, UploadStatus::Uploading);
                    }
                }
            }
            UploadEvent::FileResult { key, status } => {
                self.statuses.insert(key, status);
            }
            UploadEvent::ServerMessage(message) | UploadEvent::Fatal(message) => {
                self.result_text = Some(message);
            }
            UploadEvent::Finished(outcome) => {
                self.phase = match outcome {
                    SubmitOutcome::Completed => SubmitPhase::Completed,
                    SubmitOutcome::Aborted => SubmitPhase::Aborted,
                };
                self.event_receiver = None;
            }
        }
    }

    pub fn status_of(&self, key: &FileKey) -> Option<&UploadStatus> {
        self.statuses.get(key)
    }

    /// Share of files with a terminal status, for the progress bar.
    pub fn progress(&self) -> f32 {
        if self.statuses.is_empty() {
            return 0.0;
        }
        let settled = self
            .statuses
            .values()
            .filter(|status| {
                matches!(status, UploadStatus::Succeeded | UploadStatus::Failed(_))
            })
            .count();
        settled as f32 / self.statuses.len() as f32
    }
}
