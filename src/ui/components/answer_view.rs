//! Conversation view
//!
//! Renders the question/answer transcript: user bubbles on the right,
//! assistant bubbles with source citations on the left, and a typing
//! indicator while an answer is pending.

use crate::transcript::{DeliveryStatus, Entry, SourceRef};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, Align, Color32, RichText, Vec2};

pub struct AnswerView<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> AnswerView<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        let entries = self.state.transcript.get_all();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.add_space(self.theme.spacing);

                    if entries.is_empty() && !self.state.loading {
                        self.show_empty_state(ui);
                    } else {
                        for entry in &entries {
                            self.show_entry(ui, entry);
                            ui.add_space(self.theme.spacing_sm);
                        }

                        if self.state.loading {
                            self.show_typing_indicator(ui);
                        }
                    }

                    ui.add_space(self.theme.spacing);
                });
            });
    }

    fn show_empty_state(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(100.0);

            ui.label(
                RichText::new("Ask your documents anything")
                    .size(24.0)
                    .color(self.theme.text_primary),
            );

            ui.add_space(self.theme.spacing);

            ui.label(
                RichText::new(
                    "Upload a PDF or add a website, then type a question or use the microphone.",
                )
                .size(14.0)
                .color(self.theme.text_muted),
            );
        });
    }

    fn show_entry(&mut self, ui: &mut egui::Ui, entry: &Entry) {
        let is_user = entry.is_user();
        let bubble_color = if is_user {
            self.theme.user_bubble
        } else {
            self.theme.assistant_bubble
        };
        let text_color = if is_user {
            Color32::WHITE
        } else {
            self.theme.text_primary
        };
        let align = if is_user { Align::RIGHT } else { Align::LEFT };

        ui.with_layout(egui::Layout::top_down(align), |ui| {
            ui.label(
                RichText::new(if is_user { "You" } else { "Assistant" })
                    .size(12.0)
                    .color(self.theme.text_muted),
            );
            ui.add_space(2.0);

            let max_width = ui.available_width() * 0.75;

            egui::Frame::none()
                .fill(bubble_color)
                .rounding(self.theme.bubble_rounding)
                .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                .show(ui, |ui| {
                    ui.set_max_width(max_width);
                    ui.label(RichText::new(&entry.text).color(text_color));

                    if !entry.sources.is_empty() {
                        ui.add_space(self.theme.spacing_sm);
                        self.show_sources(ui, &entry.sources);
                    }

                    if entry.has_tabular_data {
                        ui.add_space(4.0);
                        ui.label(
                            RichText::new("Includes data from tables in the document")
                                .size(11.0)
                                .italics()
                                .color(self.theme.text_muted),
                        );
                    }
                });

            ui.horizontal(|ui| {
                let time_str = entry.timestamp.format("%H:%M").to_string();
                ui.label(
                    RichText::new(time_str)
                        .size(10.0)
                        .color(self.theme.text_muted),
                );

                match entry.status {
                    DeliveryStatus::Pending if is_user => {
                        ui.label(
                            RichText::new("Sending…")
                                .size(10.0)
                                .color(self.theme.text_muted),
                        );
                    }
                    DeliveryStatus::Failed if is_user => {
                        ui.label(
                            RichText::new("Not answered")
                                .size(10.0)
                                .color(self.theme.error),
                        );
                    }
                    _ => {}
                }

                if !is_user {
                    self.show_listen_button(ui, entry);
                }
            });
        });
    }

    /// Per-answer listen control; acts as a stop button while this entry
    /// is the one playing.
    fn show_listen_button(&mut self, ui: &mut egui::Ui, entry: &Entry) {
        let is_speaking = self.state.speaking_entry == Some(entry.id);
        let (icon, label) = if is_speaking {
            ("⏹", "Stop reading")
        } else {
            ("🔊", "Read aloud")
        };

        let response = ui
            .add(
                egui::Button::new(RichText::new(icon).size(12.0).color(self.theme.text_muted))
                    .small()
                    .frame(false),
            )
            .on_hover_text(label);
        response.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::Button, true, label)
        });

        if response.clicked() {
            self.state.toggle_speech_for(entry.id, &entry.text);
        }
    }

    fn show_sources(&self, ui: &mut egui::Ui, sources: &[SourceRef]) {
        ui.label(
            RichText::new("Sources")
                .size(11.0)
                .strong()
                .color(self.theme.text_muted),
        );

        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing = Vec2::splat(4.0);
            for source in sources {
                self.show_source_chip(ui, source);
            }
        });
    }

    fn show_source_chip(&self, ui: &mut egui::Ui, source: &SourceRef) {
        egui::Frame::none()
            .fill(self.theme.bg_tertiary)
            .rounding(self.theme.button_rounding)
            .inner_margin(egui::Margin::symmetric(8.0, 4.0))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(format!("Page {}", source.page))
                            .size(11.0)
                            .color(self.theme.text_secondary),
                    );
                    ui.label(
                        RichText::new(format!("{:.0}%", source.relevance_score * 100.0))
                            .size(11.0)
                            .color(self.theme.text_muted),
                    );
                    if source.is_table() {
                        ui.label(
                            RichText::new("TABLE")
                                .size(10.0)
                                .strong()
                                .color(self.theme.warning),
                        );
                    }
                });
            });
    }

    fn show_typing_indicator(&self, ui: &mut egui::Ui) {
        ui.with_layout(egui::Layout::top_down(Align::LEFT), |ui| {
            ui.label(
                RichText::new("Assistant")
                    .size(12.0)
                    .color(self.theme.text_muted),
            );
            ui.add_space(2.0);

            egui::Frame::none()
                .fill(self.theme.assistant_bubble)
                .rounding(self.theme.bubble_rounding)
                .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        for i in 0..3 {
                            let t = ui.ctx().input(|i| i.time);
                            let alpha = ((t * 3.0 + i as f64 * 0.5).sin() * 0.5 + 0.5) as f32;
                            ui.label(
                                RichText::new("●")
                                    .size(10.0)
                                    .color(self.theme.text_muted.gamma_multiply(alpha)),
                            );
                        }
                    });
                });
        });

        ui.ctx().request_repaint();
    }
}
