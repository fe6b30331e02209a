mod state;
mod ui;

use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;

use eframe::egui;

use crate::files::{
    reconcile, validate, FileDescriptor, FileKey, FileRegistry, ListDelta, RegistrySignal,
    ValidationResult,
};
use crate::preview::{spawn_preview_loads, ImagePreviewLoader, PreviewImage, PreviewLoader};
use crate::upload::{spawn_submission, BUNDLE_SIZE};
use crate::utils::DisplayNameStore;

pub use state::{SubmissionState, SubmitPhase};

/// One rendered row of the file list. Rows survive reconciliation untouched
/// unless their key leaves the working set, so a loaded thumbnail texture is
/// never recreated by a later merge.
pub struct ListEntry {
    pub descriptor: FileDescriptor,
    pub key: FileKey,
    pub validation: ValidationResult,
    pub texture: Option<egui::TextureHandle>,
}

pub struct WeddingUploader {
    display_name: String,
    registry: FileRegistry,
    entries: Vec<ListEntry>,
    submission: SubmissionState,
    name_store: DisplayNameStore,
    preview_loader: Arc<dyn PreviewLoader>,
    preview_receivers: Vec<Receiver<(FileKey, PreviewImage)>>,
    selection_note: Option<String>,
}

impl WeddingUploader {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let name_store = DisplayNameStore::default_location();
        let display_name = name_store.load().unwrap_or_default();
        log::info!("starting wedding uploader");

        Self {
            display_name,
            registry: FileRegistry::new(),
            entries: Vec::new(),
            submission: SubmissionState::default(),
            name_store,
            preview_loader: Arc::new(ImagePreviewLoader),
            preview_receivers: Vec::new(),
            selection_note: None,
        }
    }

    /// Command: a batch of files was picked or dropped. Merges additively into
    /// the working set and reconciles the rendered list.
    pub fn on_files_selected(&mut self, descriptors: Vec<FileDescriptor>) -> ListDelta {
        let count = descriptors.len();
        self.registry.merge_add(descriptors);
        self.selection_note = Some(format!("{count} Datei(en) ausgewählt"));
        self.reconcile_entries()
    }

    /// Command: the remove affordance of a single entry.
    pub fn on_remove(&mut self, key: &FileKey) -> ListDelta {
        let signal = self.registry.remove(key);
        let delta = self.reconcile_entries();
        self.handle_signal(signal);
        delta
    }

    /// Command: drop every entry currently failing validation.
    pub fn on_remove_invalid(&mut self) -> ListDelta {
        let signal = self.registry.remove_all_invalid();
        let delta = self.reconcile_entries();
        self.handle_signal(signal);
        delta
    }

    /// Command: submit the accepted set. Guarded by a non-empty trimmed name
    /// and a fully valid, non-empty working set; each violated guard raises a
    /// blocking prompt instead of starting the attempt.
    pub fn on_submit(&mut self) {
        if self.submission.phase.is_submitting() {
            return;
        }

        let name = self.display_name.trim().to_string();
        if name.is_empty() {
            prompt("Please enter your name.");
            return;
        }
        if self.registry.is_empty() {
            prompt("Please select valid image/video files.");
            return;
        }
        if self.registry.has_invalid() {
            prompt("Please remove all invalid files before uploading.");
            return;
        }

        if let Err(error) = self.name_store.save(&name) {
            // Not worth blocking an upload over; the prefill just won't work.
            log::warn!("could not persist display name: {error}");
        }

        let files = self.registry.files().to_vec();
        let keys: Vec<FileKey> = files.iter().map(|f| f.key()).collect();
        let total_bundles = files.len().div_ceil(BUNDLE_SIZE);
        let events = spawn_submission(name, files);
        self.submission.begin(keys, total_bundles, events);
    }

    /// Drains worker channels into UI state. Everything mutable lives on this
    /// thread; the workers only ever talk through their channels.
    fn update_state(&mut self, ctx: &egui::Context) {
        self.drain_previews(ctx);

        let mut received = Vec::new();
        if let Some(receiver) = &self.submission.event_receiver {
            while let Ok(event) = receiver.try_recv() {
                received.push(event);
            }
        }
        for event in received {
            self.submission.apply_event(event);
        }

        if self.submission.phase.is_submitting() || !self.preview_receivers.is_empty() {
            ctx.request_repaint();
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() {
            return;
        }
        let descriptors: Vec<FileDescriptor> = dropped
            .iter()
            .filter_map(|file| file.path.as_deref())
            .filter_map(FileDescriptor::from_path)
            .collect();
        log::debug!("drop: {} files, {} usable", dropped.len(), descriptors.len());
        if !descriptors.is_empty() {
            self.on_files_selected(descriptors);
        }
    }

    fn open_file_picker(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter(
                "Fotos & Videos",
                &["jpg", "jpeg", "png", "gif", "webp", "mp4", "mov", "avi", "mkv"],
            )
            .pick_files();
        if let Some(paths) = picked {
            let descriptors: Vec<FileDescriptor> = paths
                .iter()
                .filter_map(|path| FileDescriptor::from_path(path))
                .collect();
            if !descriptors.is_empty() {
                self.on_files_selected(descriptors);
            }
        }
    }

    /// Applies the minimal delta between rendered entries and the working set.
    fn reconcile_entries(&mut self) -> ListDelta {
        let rendered: Vec<FileKey> = self.entries.iter().map(|e| e.key.clone()).collect();
        let delta = reconcile(&rendered, self.registry.files());

        self.entries.retain(|entry| !delta.removed.contains(&entry.key));

        let mut added_files = Vec::new();
        for key in &delta.added {
            if let Some(descriptor) = self.registry.files().iter().find(|f| &f.key() == key) {
                let descriptor = descriptor.clone();
                self.entries.push(ListEntry {
                    key: key.clone(),
                    validation: validate(&descriptor),
                    texture: None,
                    descriptor: descriptor.clone(),
                });
                added_files.push(descriptor);
            }
        }
        if !added_files.is_empty() {
            self.preview_receivers
                .push(spawn_preview_loads(Arc::clone(&self.preview_loader), added_files));
        }

        delta
    }

    fn handle_signal(&mut self, signal: RegistrySignal) {
        if signal == RegistrySignal::ResetInput {
            log::debug!("working set emptied, clearing selection surface");
            self.selection_note = None;
        }
    }

    fn drain_previews(&mut self, ctx: &egui::Context) {
        let mut alive = Vec::new();
        for receiver in std::mem::take(&mut self.preview_receivers) {
            loop {
                match receiver.try_recv() {
                    Ok((key, preview)) => self.install_preview(ctx, key, preview),
                    Err(TryRecvError::Empty) => {
                        alive.push(receiver);
                        break;
                    }
                    Err(TryRecvError::Disconnected) => break,
                }
            }
        }
        self.preview_receivers = alive;
    }

    fn install_preview(&mut self, ctx: &egui::Context, key: FileKey, preview: PreviewImage) {
        let Some(entry) = self.entries.iter_mut().find(|entry| entry.key == key) else {
            // Entry was removed while its preview was still decoding.
            return;
        };
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [preview.width, preview.height],
            &preview.rgba,
        );
        entry.texture =
            Some(ctx.load_texture(format!("thumb-{key}"), image, egui::TextureOptions::LINEAR));
    }
}

fn prompt(message: &str) {
    let _ = rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Warning)
        .set_title("Wedding Upload")
        .set_description(message)
        .show();
}

impl eframe::App for WeddingUploader {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.handle_dropped_files(ctx);
        self.render(ctx);
    }
}
