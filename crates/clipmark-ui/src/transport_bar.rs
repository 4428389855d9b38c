//! Playback controls above the track.

use clipmark_core::format_clock;
use egui::{self, RichText};

use crate::editor::EditorSession;
use crate::theme::Theme;
use crate::widgets;

const RATES: [f64; 5] = [0.5, 0.75, 1.0, 1.5, 2.0];

/// Rewind, skip, play/pause, clock, rate, volume, and the marking toggle.
pub fn show_transport_bar(ui: &mut egui::Ui, session: &mut EditorSession) {
    let snapshot = session.snapshot();
    let enabled = snapshot.controls_enabled;

    ui.horizontal(|ui| {
        if ui
            .add_enabled(enabled, egui::Button::new("⏮"))
            .on_hover_text("Back to start")
            .clicked()
        {
            session.rewind();
        }
        if ui
            .add_enabled(enabled, egui::Button::new("⏪"))
            .on_hover_text(format!("Back {}s", session.config().skip_secs))
            .clicked()
        {
            session.skip_backward();
        }
        let play = if snapshot.playing { "⏸" } else { "▶" };
        if ui.add_enabled(enabled, egui::Button::new(play)).clicked() {
            session.toggle_playback();
        }
        if ui
            .add_enabled(enabled, egui::Button::new("⏩"))
            .on_hover_text(format!("Forward {}s", session.config().skip_secs))
            .clicked()
        {
            session.skip_forward();
        }

        ui.label(
            RichText::new(format!(
                "{} / {}",
                format_clock(snapshot.current_time),
                format_clock(snapshot.duration)
            ))
            .family(egui::FontFamily::Monospace)
            .size(Theme::FONT_SM)
            .color(Theme::t1()),
        );

        ui.add_space(Theme::SPACE_MD);
        ui.add_enabled_ui(enabled, |ui| {
            egui::ComboBox::from_id_salt("playback_rate")
                .selected_text(format!("{}x", snapshot.playback_rate))
                .width(64.0)
                .show_ui(ui, |ui| {
                    for rate in RATES {
                        let current = (snapshot.playback_rate - rate).abs() < f64::EPSILON;
                        if ui.selectable_label(current, format!("{}x", rate)).clicked() {
                            session.set_playback_rate(rate);
                        }
                    }
                });
        });

        let mut volume = snapshot.volume;
        if widgets::level_slider(ui, &mut volume, 90.0, enabled) {
            session.set_volume(volume);
        }

        ui.add_space(Theme::SPACE_MD);
        ui.label(RichText::new("Mark").size(Theme::FONT_SM).color(Theme::t2()));
        if widgets::toggle_switch(ui, snapshot.marking, enabled) {
            session.set_marking(!snapshot.marking);
        }
    });
}
