use eframe::egui::{self, Color32, RichText};

use super::state::SubmitPhase;
use super::{ListEntry, WeddingUploader};
use crate::files::FileKey;
use crate::upload::UploadStatus;
use crate::utils::{color, format_size};

impl WeddingUploader {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(20.0);
                ui.vertical_centered(|ui| {
                    ui.heading("Hochzeits-Upload 📸");
                    ui.add_space(5.0);
                    ui.label(
                        RichText::new("Teilt eure Fotos und Videos mit uns")
                            .color(ui.visuals().text_color().gamma_multiply(0.7)),
                    );
                });

                ui.add_space(20.0);

                ui.group(|ui| {
                    ui.horizontal(|ui| {
                        ui.label("Name:");
                        ui.add(
                            egui::TextEdit::singleline(&mut self.display_name)
                                .hint_text("Euer Name")
                                .desired_width(240.0),
                        );
                    });
                });

                ui.add_space(10.0);
                self.render_dropzone(ui, ctx);
                ui.add_space(10.0);
                self.render_file_list(ui);
                ui.add_space(10.0);
                self.render_actions(ui);
                self.render_progress(ui);
                self.render_result(ui);
                ui.add_space(20.0);
            });
        });
    }

    fn render_dropzone(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let drag_hover = ctx.input(|i| !i.raw.hovered_files.is_empty());
        let stroke = if drag_hover {
            egui::Stroke::new(2.0, color::ACCENT)
        } else {
            ui.visuals().widgets.noninteractive.bg_stroke
        };

        let response = egui::Frame::none()
            .stroke(stroke)
            .rounding(egui::Rounding::same(6.0))
            .inner_margin(egui::Margin::same(18.0))
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label("Fotos & Videos hierher ziehen");
                    ui.label(RichText::new("oder klicken zum Auswählen").small());
                    if let Some(note) = &self.selection_note {
                        ui.add_space(4.0);
                        ui.label(RichText::new(note).small().color(color::NEUTRAL));
                    }
                });
            })
            .response
            .interact(egui::Sense::click());

        if response.clicked() {
            self.open_file_picker();
        }
    }

    fn render_file_list(&mut self, ui: &mut egui::Ui) {
        if self.entries.is_empty() {
            return;
        }

        let mut to_remove: Option<FileKey> = None;
        egui::Frame::none()
            .fill(ui.style().visuals.extreme_bg_color)
            .rounding(egui::Rounding::same(4.0))
            .show(ui, |ui| {
                ui.add_space(8.0);
                for entry in &self.entries {
                    ui.horizontal(|ui| {
                        if ui.button("🗑").on_hover_text("Datei entfernen").clicked() {
                            to_remove = Some(entry.key.clone());
                        }
                        render_thumbnail(ui, entry);
                        ui.vertical(|ui| {
                            ui.label(format!(
                                "{} ({})",
                                entry.descriptor.name,
                                format_size(entry.descriptor.size)
                            ));
                            match entry.validation.reason {
                                Some(reason) => {
                                    ui.colored_label(color::FAILURE, format!("❌ {reason}"))
                                }
                                None => ui.colored_label(color::SUCCESS, "✅ OK"),
                            };
                            if let Some(status) = self.submission.status_of(&entry.key) {
                                let (text, text_color) = status_label(status);
                                ui.colored_label(text_color, text);
                            }
                        });
                    });
                    ui.add_space(4.0);
                }
                ui.add_space(8.0);
            });

        if let Some(key) = to_remove {
            self.on_remove(&key);
        }
    }

    fn render_actions(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            if self.registry.has_invalid() {
                if ui.button("Ungültige Dateien entfernen").clicked() {
                    self.on_remove_invalid();
                }
                ui.add_space(5.0);
            }

            let submitting = self.submission.phase.is_submitting();
            let label = if submitting {
                "⏳ Uploading..."
            } else {
                "📤 Upload"
            };
            let enabled = self.registry.can_submit() && !submitting;
            ui.add_enabled_ui(enabled, |ui| {
                let button = egui::Button::new(label).min_size(egui::vec2(200.0, 40.0));
                if ui.add(button).clicked() {
                    self.on_submit();
                }
            });
        });
    }

    fn render_progress(&mut self, ui: &mut egui::Ui) {
        if self.submission.phase == SubmitPhase::Idle {
            return;
        }
        ui.add_space(10.0);
        ui.group(|ui| {
            let label = match &self.submission.phase {
                SubmitPhase::Submitting {
                    total_bundles,
                    current_bundle,
                } => format!("📤 Paket {current_bundle}/{total_bundles} wird hochgeladen"),
                SubmitPhase::Completed => "Upload abgeschlossen".to_string(),
                SubmitPhase::Aborted => "Upload abgebrochen".to_string(),
                SubmitPhase::Idle => String::new(),
            };
            ui.label(label);
            let progress_bar = egui::ProgressBar::new(self.submission.progress())
                .show_percentage()
                .fill(color::ACCENT);
            ui.add(progress_bar);
        });
    }

    fn render_result(&mut self, ui: &mut egui::Ui) {
        let Some(text) = &self.submission.result_text else {
            return;
        };
        ui.add_space(10.0);
        ui.group(|ui| {
            if self.submission.phase == SubmitPhase::Aborted {
                ui.colored_label(color::FAILURE, RichText::new(text).monospace());
            } else {
                ui.label(RichText::new(text).monospace());
            }
        });
    }
}

fn render_thumbnail(ui: &mut egui::Ui, entry: &ListEntry) {
    if let Some(texture) = &entry.texture {
        ui.image((texture.id(), egui::vec2(60.0, 40.0)));
    } else if !entry.validation.valid {
        ui.label("🚫").on_hover_text("Keine Vorschau");
    } else if entry.descriptor.is_video() {
        ui.label("🎬");
    } else {
        ui.label("🖼");
    }
}

/// Localized per-file status line, as the original page showed it. The core
/// keeps plain English reasons; only the rendering is German.
fn status_label(status: &UploadStatus) -> (String, Color32) {
    match status {
        UploadStatus::Pending => ("⏳ Ausstehend".to_string(), color::NEUTRAL),
        UploadStatus::Uploading => ("📤 Wird hochgeladen…".to_string(), color::ACCENT),
        UploadStatus::Succeeded => ("Erfolgreich hochgeladen".to_string(), color::SUCCESS),
        UploadStatus::Failed(reason) => (
            format!("Hochladen Fehlgeschlagen: {}", localize_reason(reason)),
            color::FAILURE,
        ),
    }
}

fn localize_reason(reason: &str) -> &str {
    match reason {
        "network error" => "Netzwerkfehler",
        "server error" => "Serverfehler",
        "unknown error" => "Unbekannter Fehler",
        // Server-supplied reasons are passed through as-is.
        other => other,
    }
}
