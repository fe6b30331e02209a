use std::fs;
use std::sync::mpsc::{channel, Receiver, Sender};

use reqwest::multipart::{Form, Part};

use super::types::{SubmitOutcome, UploadError, UploadEvent, UploadResponse, UploadStatus};
use crate::files::{FileDescriptor, FileKey};

pub const UPLOAD_URL: &str = "https://wedding-upload.azurewebsites.net/api/Upload";

/// The endpoint constrains per-request payload size; five files per request
/// bounds the worst case and keeps failure attribution to one bundle.
pub const BUNDLE_SIZE: usize = 5;

/// Drives one submission attempt: partitions the accepted set into bundles of
/// [`BUNDLE_SIZE`] and submits them strictly one at a time, stopping at the
/// first fatal error. Progress flows back through [`UploadEvent`]s.
pub struct UploadCoordinator {
    endpoint: String,
    client: reqwest::Client,
}

impl Default for UploadCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadCoordinator {
    pub fn new() -> Self {
        Self::with_endpoint(UPLOAD_URL)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    pub async fn submit(
        &self,
        display_name: &str,
        files: &[FileDescriptor],
        events: &Sender<UploadEvent>,
    ) -> SubmitOutcome {
        let total_bundles = files.len().div_ceil(BUNDLE_SIZE);
        log::info!(
            "submitting {} files in {} bundles",
            files.len(),
            total_bundles
        );

        for (index, bundle) in files.chunks(BUNDLE_SIZE).enumerate() {
            let _ = events.send(UploadEvent::BundleStarted {
                index,
                keys: bundle.iter().map(|f| f.key()).collect(),
            });

            let (form, shipped, unreadable) = build_bundle_form(display_name, bundle);
            for (key, reason) in unreadable {
                log::warn!("excluding {key} from bundle {index}: {reason}");
                let _ = events.send(UploadEvent::FileResult {
                    key,
                    status: UploadStatus::Failed(reason),
                });
            }
            if shipped.is_empty() {
                continue;
            }

            match self.submit_bundle(form).await {
                Ok((response, raw)) => {
                    let message = response.message.clone().unwrap_or(raw);
                    let _ = events.send(UploadEvent::ServerMessage(message));
                    for (key, status) in bundle_statuses(&shipped, &response) {
                        let _ = events.send(UploadEvent::FileResult { key, status });
                    }
                }
                Err(error) => {
                    // Fatal: the files of this bundle fail, everything after
                    // it is never attempted and stays Pending.
                    log::error!("bundle {index} failed fatally: {error}");
                    let reason = fatal_reason(&error);
                    for file in &shipped {
                        let _ = events.send(UploadEvent::FileResult {
                            key: file.key(),
                            status: UploadStatus::Failed(reason.to_string()),
                        });
                    }
                    let _ = events.send(UploadEvent::Fatal(fatal_diagnostic(&error)));
                    let _ = events.send(UploadEvent::Finished(SubmitOutcome::Aborted));
                    return SubmitOutcome::Aborted;
                }
            }
        }

        let _ = events.send(UploadEvent::Finished(SubmitOutcome::Completed));
        SubmitOutcome::Completed
    }

    async fn submit_bundle(&self, form: Form) -> Result<(UploadResponse, String), UploadError> {
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;
        let raw = response.text().await?;
        let parsed = parse_response(&raw)?;
        Ok((parsed, raw))
    }
}

/// Spawns the worker thread owning the whole attempt; the returned receiver is
/// the only channel back to the UI thread.
pub fn spawn_submission(display_name: String, files: Vec<FileDescriptor>) -> Receiver<UploadEvent> {
    let (tx, rx) = channel();
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(error) => {
                let _ = tx.send(UploadEvent::Fatal(format!(
                    "Upload failed: could not start runtime: {error}"
                )));
                let _ = tx.send(UploadEvent::Finished(SubmitOutcome::Aborted));
                return;
            }
        };
        runtime.block_on(async {
            UploadCoordinator::new()
                .submit(&display_name, &files, &tx)
                .await;
        });
    });
    rx
}

/// Multipart body per the endpoint contract: one `name` text field plus a
/// `files` part per file. Files that cannot be read are reported back and
/// left out; the bundle still ships with the rest.
fn build_bundle_form(
    display_name: &str,
    bundle: &[FileDescriptor],
) -> (Form, Vec<FileDescriptor>, Vec<(FileKey, String)>) {
    let mut form = Form::new().text("name", display_name.to_string());
    let mut shipped = Vec::new();
    let mut unreadable = Vec::new();

    for file in bundle {
        let bytes = match fs::read(&file.path) {
            Ok(bytes) => bytes,
            Err(error) => {
                unreadable.push((file.key(), format!("could not read file: {error}")));
                continue;
            }
        };
        let part = match Part::bytes(bytes)
            .file_name(file.name.clone())
            .mime_str(&file.mime)
        {
            Ok(part) => part,
            Err(error) => {
                unreadable.push((file.key(), format!("could not prepare file: {error}")));
                continue;
            }
        };
        form = form.part("files", part);
        shipped.push(file.clone());
    }

    (form, shipped, unreadable)
}

/// A response is recognized only if it parses as the contract shape with the
/// `successful` field present; an empty list still counts as recognized.
fn parse_response(raw: &str) -> Result<UploadResponse, UploadError> {
    let response: UploadResponse =
        serde_json::from_str(raw).map_err(|_| UploadError::UnexpectedResponse {
            raw: raw.to_string(),
        })?;
    if response.successful.is_none() {
        return Err(UploadError::UnexpectedResponse {
            raw: raw.to_string(),
        });
    }
    Ok(response)
}

fn bundle_statuses(
    bundle: &[FileDescriptor],
    response: &UploadResponse,
) -> Vec<(FileKey, UploadStatus)> {
    let successful: &[String] = response.successful.as_deref().unwrap_or(&[]);
    bundle
        .iter()
        .map(|file| {
            let status = if successful.iter().any(|name| name == &file.name) {
                UploadStatus::Succeeded
            } else if let Some(reason) = response.failed.get(&file.name) {
                UploadStatus::Failed(reason.clone())
            } else {
                UploadStatus::Failed("unknown error".to_string())
            };
            (file.key(), status)
        })
        .collect()
}

fn fatal_reason(error: &UploadError) -> &'static str {
    match error {
        UploadError::Transport(_) => "network error",
        UploadError::UnexpectedResponse { .. } => "server error",
    }
}

fn fatal_diagnostic(error: &UploadError) -> String {
    match error {
        UploadError::Transport(inner) => format!("Upload failed: {inner}"),
        UploadError::UnexpectedResponse { raw } => raw.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::mpsc::channel;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn media_files(dir: &tempfile::TempDir, count: usize) -> Vec<FileDescriptor> {
        (0..count)
            .map(|i| {
                let file_path = dir.path().join(format!("photo{i}.jpg"));
                std::fs::write(&file_path, b"not really a jpeg").unwrap();
                FileDescriptor::from_path(&file_path).unwrap()
            })
            .collect()
    }

    fn drain(events: Receiver<UploadEvent>) -> Vec<UploadEvent> {
        events.try_iter().collect()
    }

    fn statuses(events: &[UploadEvent]) -> Vec<(&FileKey, &UploadStatus)> {
        events
            .iter()
            .filter_map(|event| match event {
                UploadEvent::FileResult { key, status } => Some((key, status)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn parse_rejects_non_json_bodies() {
        let error = parse_response("<html>Bad Gateway</html>").unwrap_err();
        match error {
            UploadError::UnexpectedResponse { raw } => assert!(raw.contains("Bad Gateway")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_rejects_json_without_successful_field() {
        assert!(parse_response(r#"{"error": "boom"}"#).is_err());
    }

    #[test]
    fn parse_accepts_empty_successful_list() {
        let response = parse_response(r#"{"successful": []}"#).unwrap();
        assert_eq!(response.successful.as_deref(), Some(&[][..]));
    }

    #[test]
    fn bundle_statuses_cover_success_failure_and_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let files = media_files(&dir, 3);
        let response = parse_response(
            &json!({
                "successful": ["photo0.jpg"],
                "failed": {"photo1.jpg": "zu unscharf"}
            })
            .to_string(),
        )
        .unwrap();

        let statuses = bundle_statuses(&files, &response);
        assert_eq!(statuses[0].1, UploadStatus::Succeeded);
        assert_eq!(
            statuses[1].1,
            UploadStatus::Failed("zu unscharf".to_string())
        );
        assert_eq!(
            statuses[2].1,
            UploadStatus::Failed("unknown error".to_string())
        );
    }

    #[tokio::test]
    async fn seven_files_go_out_as_two_sequential_bundles() {
        let dir = tempfile::tempdir().unwrap();
        let files = media_files(&dir, 7);
        let names: Vec<String> = files.iter().map(|f| f.name.clone()).collect();

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/Upload"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"successful": names, "message": "Danke!"})),
            )
            .expect(2)
            .mount(&server)
            .await;

        let coordinator = UploadCoordinator::with_endpoint(format!("{}/api/Upload", server.uri()));
        let (tx, rx) = channel();
        let outcome = coordinator.submit("Anna", &files, &tx).await;
        assert_eq!(outcome, SubmitOutcome::Completed);

        let events = drain(rx);
        let bundle_sizes: Vec<usize> = events
            .iter()
            .filter_map(|event| match event {
                UploadEvent::BundleStarted { keys, .. } => Some(keys.len()),
                _ => None,
            })
            .collect();
        assert_eq!(bundle_sizes, [5, 2]);

        let statuses = statuses(&events);
        assert_eq!(statuses.len(), 7);
        assert!(statuses
            .iter()
            .all(|(_, status)| **status == UploadStatus::Succeeded));
        assert!(matches!(
            events.last(),
            Some(UploadEvent::Finished(SubmitOutcome::Completed))
        ));
    }

    #[tokio::test]
    async fn per_file_server_rejections_do_not_stop_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let files = media_files(&dir, 6);

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/Upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "successful": ["photo0.jpg", "photo1.jpg", "photo2.jpg", "photo3.jpg", "photo5.jpg"],
                "failed": {"photo4.jpg": "file corrupt"}
            })))
            .expect(2)
            .mount(&server)
            .await;

        let coordinator = UploadCoordinator::with_endpoint(format!("{}/api/Upload", server.uri()));
        let (tx, rx) = channel();
        let outcome = coordinator.submit("Anna", &files, &tx).await;

        // The per-file rejection in bundle one must not abort bundle two.
        assert_eq!(outcome, SubmitOutcome::Completed);
        let events = drain(rx);
        let statuses = statuses(&events);
        assert_eq!(statuses.len(), 6);
        assert_eq!(
            *statuses[4].1,
            UploadStatus::Failed("file corrupt".to_string())
        );
        assert_eq!(*statuses[5].1, UploadStatus::Succeeded);
    }

    #[tokio::test]
    async fn transport_failure_aborts_before_later_bundles() {
        let dir = tempfile::tempdir().unwrap();
        let files = media_files(&dir, 7);

        // Nothing listens here, so the first request errors at connect time.
        let coordinator = UploadCoordinator::with_endpoint("http://127.0.0.1:9/api/Upload");
        let (tx, rx) = channel();
        let outcome = coordinator.submit("Anna", &files, &tx).await;
        assert_eq!(outcome, SubmitOutcome::Aborted);

        let events = drain(rx);
        let bundle_count = events
            .iter()
            .filter(|event| matches!(event, UploadEvent::BundleStarted { .. }))
            .count();
        assert_eq!(bundle_count, 1);

        // All five files of the attempted bundle fail; the last two never get
        // a result and therefore stay Pending on the caller's side.
        let statuses = statuses(&events);
        assert_eq!(statuses.len(), 5);
        assert!(statuses
            .iter()
            .all(|(_, status)| **status == UploadStatus::Failed("network error".to_string())));
        assert!(events
            .iter()
            .any(|event| matches!(event, UploadEvent::Fatal(_))));
    }

    #[tokio::test]
    async fn unparseable_body_is_fatal_and_surfaces_the_raw_payload() {
        let dir = tempfile::tempdir().unwrap();
        let files = media_files(&dir, 2);

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/Upload"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<html>Bad Gateway</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let coordinator = UploadCoordinator::with_endpoint(format!("{}/api/Upload", server.uri()));
        let (tx, rx) = channel();
        let outcome = coordinator.submit("Anna", &files, &tx).await;
        assert_eq!(outcome, SubmitOutcome::Aborted);

        let events = drain(rx);
        let statuses = statuses(&events);
        assert!(statuses
            .iter()
            .all(|(_, status)| **status == UploadStatus::Failed("server error".to_string())));
        let fatal = events.iter().find_map(|event| match event {
            UploadEvent::Fatal(diagnostic) => Some(diagnostic.clone()),
            _ => None,
        });
        assert_eq!(fatal.as_deref(), Some("<html>Bad Gateway</html>"));
    }

    #[tokio::test]
    async fn response_without_successful_indicator_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let files = media_files(&dir, 1);

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/Upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "quota"})))
            .expect(1)
            .mount(&server)
            .await;

        let coordinator = UploadCoordinator::with_endpoint(format!("{}/api/Upload", server.uri()));
        let (tx, rx) = channel();
        assert_eq!(
            coordinator.submit("Anna", &files, &tx).await,
            SubmitOutcome::Aborted
        );
        assert!(drain(rx)
            .iter()
            .any(|event| matches!(event, UploadEvent::Finished(SubmitOutcome::Aborted))));
    }
}
