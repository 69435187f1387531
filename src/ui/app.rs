//! Main application struct and eframe integration

use crate::backend::Backend;
use crate::config::{Config, Settings};
use crate::ui::components::{AnswerView, InputBar, QuestionList, UploadPanel};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use crate::voice::RecordingState;
use egui::{self, CentralPanel, RichText, SidePanel, TopBottomPanel};
use tracing::error;

pub struct DocChatApp {
    state: AppState,
    theme: Theme,
}

impl DocChatApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);

        let backend = match Backend::new(config) {
            Ok(backend) => Some(backend),
            Err(e) => {
                // The UI still runs; every submission will simply fail
                error!("Backend unavailable: {e}");
                None
            }
        };
        let settings = Settings::load();

        Self {
            state: AppState::new(backend, settings),
            theme,
        }
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_secondary)
                    .inner_margin(12.0),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("Docchat")
                            .size(20.0)
                            .strong()
                            .color(self.theme.text_primary),
                    );
                    ui.label(
                        RichText::new("Ask your documents")
                            .size(14.0)
                            .color(self.theme.text_muted),
                    );
                });
            });
    }

    fn show_question_list(&mut self, ctx: &egui::Context) {
        SidePanel::left("question_list")
            .resizable(true)
            .default_width(220.0)
            .min_width(180.0)
            .max_width(360.0)
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                QuestionList::new(&self.state, &self.theme).show(ui);
            });
    }

    fn show_upload_panel(&mut self, ctx: &egui::Context) {
        SidePanel::right("upload_panel")
            .resizable(true)
            .default_width(260.0)
            .min_width(220.0)
            .max_width(400.0)
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                UploadPanel::new(&mut self.state, &self.theme).show(ui);
            });
    }

    fn show_input_area(&mut self, ctx: &egui::Context) {
        TopBottomPanel::bottom("input_area")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                InputBar::new(&mut self.state, &self.theme).show(ui);
            });
    }

    fn show_content(&mut self, ctx: &egui::Context) {
        CentralPanel::default()
            .frame(egui::Frame::none().fill(self.theme.bg_primary))
            .show(ctx, |ui| {
                AnswerView::new(&mut self.state, &self.theme).show(ui);
            });
    }
}

impl eframe::App for DocChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Buffered microphone chunks and async results, once per frame
        self.state.voice.pump();
        self.state.poll_events();

        self.show_header(ctx);
        self.show_question_list(ctx);
        self.show_upload_panel(ctx);
        self.show_input_area(ctx);
        self.show_content(ctx);

        // Keep polling while anything is in flight
        if self.state.loading
            || self.state.recording_state() != RecordingState::Idle
            || self.state.upload.is_busy()
            || self.state.speaking_entry.is_some()
        {
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        }
    }
}
