//! Document upload panel
//!
//! Drop target and file picker for PDFs, a website URL field, and the
//! current submission status banner. File and URL submission are mutually
//! exclusive while one is in flight.

use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use crate::upload::{format_file_size, UploadStatus};
use egui::{self, Color32, RichText};

pub struct UploadPanel<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> UploadPanel<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        ui.label(
            RichText::new("Documents")
                .size(16.0)
                .strong()
                .color(self.theme.text_primary),
        );
        ui.add_space(self.theme.spacing_sm);

        self.show_status_banner(ui);
        self.show_drop_zone(ui);
        ui.add_space(self.theme.spacing_sm);
        self.show_selected_file(ui);

        ui.add_space(self.theme.spacing);
        ui.separator();
        ui.add_space(self.theme.spacing);

        self.show_website_form(ui);
    }

    fn show_drop_zone(&mut self, ui: &mut egui::Ui) {
        let busy = self.state.upload.is_busy();

        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .stroke(egui::Stroke::new(1.0, self.theme.bg_tertiary))
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("📄").size(28.0));
                    ui.label(
                        RichText::new("Drop a PDF here")
                            .size(13.0)
                            .color(self.theme.text_secondary),
                    );
                    ui.label(
                        RichText::new("PDF files only")
                            .size(11.0)
                            .color(self.theme.text_muted),
                    );
                });
            });

        // Files dropped anywhere in the window select into this panel
        let dropped: Vec<egui::DroppedFile> =
            ui.ctx().input(|i| i.raw.dropped_files.clone());
        if !busy {
            if let Some(file) = dropped.into_iter().next() {
                if let Some(path) = file.path {
                    self.state.select_file(&path);
                }
            }
        }
    }

    fn show_selected_file(&mut self, ui: &mut egui::Ui) {
        let Some(file) = self.state.upload.selected.clone() else {
            return;
        };
        let busy = self.state.upload.is_busy();

        egui::Frame::none()
            .fill(self.theme.bg_tertiary)
            .rounding(self.theme.card_rounding)
            .inner_margin(egui::Margin::symmetric(10.0, 8.0))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.label(
                            RichText::new(&file.name)
                                .size(12.0)
                                .strong()
                                .color(self.theme.text_primary),
                        );
                        ui.label(
                            RichText::new(format_file_size(file.size))
                                .size(11.0)
                                .color(self.theme.text_muted),
                        );
                    });

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let remove = ui
                            .add_enabled(!busy, egui::Button::new("✕").small())
                            .on_hover_text("Remove file");
                        remove.widget_info(|| {
                            egui::WidgetInfo::labeled(egui::WidgetType::Button, true, "Remove file")
                        });
                        if remove.clicked() {
                            self.state.clear_selected_file();
                        }
                    });
                });
            });

        ui.add_space(self.theme.spacing_sm);

        let upload = ui.add_enabled(
            !busy,
            egui::Button::new(RichText::new("Upload").color(Color32::WHITE))
                .fill(self.theme.primary)
                .rounding(self.theme.button_rounding),
        );
        if upload.clicked() {
            self.state.submit_upload();
        }
    }

    fn show_website_form(&mut self, ui: &mut egui::Ui) {
        let busy = self.state.upload.is_busy();

        ui.label(
            RichText::new("Add a website")
                .size(13.0)
                .strong()
                .color(self.theme.text_secondary),
        );
        ui.add_space(4.0);

        let text_edit = egui::TextEdit::singleline(&mut self.state.upload.url_input)
            .hint_text("https://example.com")
            .font(egui::TextStyle::Body)
            .margin(egui::Margin::symmetric(10.0, 6.0));
        ui.add_enabled(!busy, text_edit);

        ui.add_space(4.0);

        let can_submit = !busy && !self.state.upload.url_input.trim().is_empty();
        let submit = ui.add_enabled(
            can_submit,
            egui::Button::new("Add Website").rounding(self.theme.button_rounding),
        );
        if submit.clicked() {
            self.state.submit_website();
        }
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        let (text, color) = match &self.state.upload.status {
            UploadStatus::Idle => return,
            UploadStatus::Uploading(percent) => {
                (format!("Uploading… {percent}%"), self.theme.primary)
            }
            UploadStatus::Indexing => ("Processing document…".to_string(), self.theme.warning),
            UploadStatus::Success => ("Document ready for questions".to_string(), self.theme.success),
            UploadStatus::Failed(Some(message)) => (message.clone(), self.theme.error),
            UploadStatus::Failed(None) => ("Upload failed. Please try again.".to_string(), self.theme.error),
            UploadStatus::Timeout => (
                "The server took too long to respond.".to_string(),
                self.theme.error,
            ),
        };

        egui::Frame::none()
            .fill(color.gamma_multiply(0.15))
            .rounding(self.theme.card_rounding)
            .inner_margin(egui::Margin::symmetric(10.0, 6.0))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(text).size(12.0).color(color));
            });

        if let UploadStatus::Uploading(percent) = self.state.upload.status {
            ui.add(
                egui::ProgressBar::new(f32::from(percent) / 100.0)
                    .desired_height(6.0)
                    .fill(self.theme.primary),
            );
        } else if self.state.upload.status == UploadStatus::Indexing {
            ui.add(egui::ProgressBar::new(1.0).animate(true).desired_height(6.0));
        }

        ui.add_space(self.theme.spacing_sm);
        ui.ctx().request_repaint_after(std::time::Duration::from_millis(250));
    }
}
