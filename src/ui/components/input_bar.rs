//! Question input bar
//!
//! Text input, record toggle, voice-response toggle and send controls.

use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use crate::voice::RecordingState;
use egui::{self, Key, RichText, Vec2};

pub struct InputBar<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> InputBar<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                if let Some(notice) = self.state.notice.clone() {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(&notice).size(12.0).color(self.theme.error));
                        if ui.small_button("✕").clicked() {
                            self.state.notice = None;
                        }
                    });
                    ui.add_space(self.theme.spacing_sm);
                }

                ui.horizontal(|ui| {
                    self.show_record_button(ui);
                    ui.add_space(self.theme.spacing_sm);
                    self.show_text_input(ui);
                    ui.add_space(self.theme.spacing_sm);
                    self.show_send_button(ui);
                    self.show_tts_toggle(ui);
                });
            });
    }

    /// Click to start, click again to stop and transcribe.
    fn show_record_button(&mut self, ui: &mut egui::Ui) {
        let recording_state = self.state.recording_state();
        let is_recording = recording_state == RecordingState::Recording;
        let is_processing = recording_state == RecordingState::Processing;

        let (icon, label, color) = match recording_state {
            RecordingState::Idle => ("🎤", "Record a question", self.theme.text_secondary),
            RecordingState::Recording => ("⏹", "Stop recording", self.theme.recording),
            RecordingState::Processing => ("⏳", "Transcribing…", self.theme.warning),
        };

        let button = egui::Button::new(RichText::new(icon).size(20.0).color(color))
            .min_size(Vec2::splat(44.0))
            .rounding(self.theme.button_rounding);
        let button = if is_recording {
            button.fill(self.theme.recording.gamma_multiply(0.2))
        } else {
            button
        };

        let response = ui.add_enabled(!is_processing && !self.state.loading, button);
        response.widget_info(|| egui::WidgetInfo::labeled(egui::WidgetType::Button, true, label));
        let button_rect = response.rect;

        if response.clicked() {
            self.state.toggle_recording();
        }
        // Right-click discards the take without transcribing
        if response.secondary_clicked() && is_recording {
            self.state.cancel_recording();
        }
        response.on_hover_text(label);

        if is_recording {
            let t = ui.ctx().input(|i| i.time);
            let pulse = ((t * 3.0).sin() * 0.5 + 0.5) as f32;

            let painter = ui.painter();
            let center = button_rect.center();
            let radius = button_rect.width() / 2.0 + 2.0 + pulse * 3.0;
            painter.circle_stroke(
                center,
                radius,
                egui::Stroke::new(
                    2.0 * pulse,
                    self.theme.recording.gamma_multiply(1.0 - pulse * 0.5),
                ),
            );

            ui.ctx().request_repaint();
        }
    }

    fn show_text_input(&mut self, ui: &mut egui::Ui) {
        let is_recording = self.state.recording_state() != RecordingState::Idle;

        // Reserve space for the send and voice buttons
        let available_width = ui.available_width() - 110.0;

        let text_edit = egui::TextEdit::singleline(&mut self.state.input_text)
            .hint_text("Ask a question about your documents...")
            .desired_width(available_width)
            .font(egui::TextStyle::Body)
            .margin(egui::Margin::symmetric(12.0, 8.0));

        let response = ui.add_enabled(!is_recording, text_edit);

        if response.has_focus() && !self.state.input_text.trim().is_empty() {
            let enter_pressed = ui.input(|i| i.key_pressed(Key::Enter));
            let shift_held = ui.input(|i| i.modifiers.shift);
            if enter_pressed && !shift_held {
                self.state.send_question();
            }
        }
    }

    fn show_send_button(&mut self, ui: &mut egui::Ui) {
        let can_send = !self.state.input_text.trim().is_empty()
            && !self.state.loading
            && self.state.recording_state() == RecordingState::Idle;

        let button_color = if can_send {
            self.theme.primary
        } else {
            self.theme.text_muted
        };

        let button = egui::Button::new(RichText::new("➤").size(18.0).color(egui::Color32::WHITE))
            .min_size(Vec2::splat(44.0))
            .rounding(self.theme.button_rounding)
            .fill(button_color);

        let response = ui.add_enabled(can_send, button);
        response.widget_info(|| egui::WidgetInfo::labeled(egui::WidgetType::Button, true, "Send"));

        if response.clicked() {
            self.state.send_question();
        }
        response.on_hover_text("Send question (Enter)");
    }

    fn show_tts_toggle(&mut self, ui: &mut egui::Ui) {
        let (icon, label, color) = if self.state.tts_enabled {
            ("🔊", "Voice responses on", self.theme.primary)
        } else {
            ("🔇", "Voice responses off", self.theme.text_muted)
        };

        let button = egui::Button::new(RichText::new(icon).size(18.0).color(color))
            .min_size(Vec2::splat(44.0))
            .rounding(self.theme.button_rounding);

        let response = ui.add(button);
        response.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::Button, true, "Voice responses")
        });

        if response.clicked() {
            self.state.toggle_tts();
        }
        response.on_hover_text(label);
    }
}
