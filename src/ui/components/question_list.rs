//! Question history sidebar
//!
//! Lists the questions asked this session, newest last, with a count in
//! the header.

use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, RichText};

pub struct QuestionList<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> QuestionList<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let questions = self.state.transcript.user_questions();

        ui.label(
            RichText::new(format!("Questions ({})", questions.len()))
                .size(16.0)
                .strong()
                .color(self.theme.text_primary),
        );
        ui.add_space(self.theme.spacing_sm);

        if questions.is_empty() {
            ui.label(
                RichText::new("No questions yet")
                    .size(12.0)
                    .color(self.theme.text_muted),
            );
            return;
        }

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for entry in &questions {
                    egui::Frame::none()
                        .fill(self.theme.bg_secondary)
                        .rounding(self.theme.card_rounding)
                        .inner_margin(egui::Margin::symmetric(10.0, 8.0))
                        .show(ui, |ui| {
                            ui.set_width(ui.available_width());
                            ui.label(
                                RichText::new(&entry.text)
                                    .size(12.0)
                                    .color(self.theme.text_secondary),
                            );
                            ui.label(
                                RichText::new(entry.timestamp.format("%H:%M").to_string())
                                    .size(10.0)
                                    .color(self.theme.text_muted),
                            );
                        });
                    ui.add_space(4.0);
                }
            });
    }
}
