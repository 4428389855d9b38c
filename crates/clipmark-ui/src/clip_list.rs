//! Clip list panel: select, preview, rename, and delete stored clips.
//!
//! The panel only renders a snapshot and reports [`ClipListAction`]s;
//! [`apply_actions`] runs them against the session.

use clipmark_core::format_clock;
use clipmark_timeline::ClipId;
use egui::{self, RichText};
use tracing::warn;

use crate::editor::{EditorSession, EditorSnapshot};
use crate::theme::Theme;

/// Something the user asked for in the clip list.
#[derive(Debug, Clone, PartialEq)]
pub enum ClipListAction {
    Select(ClipId),
    Play(ClipId),
    BeginEdit(ClipId),
    CommitEdit { id: ClipId, name: String },
    CancelEdit(ClipId),
    Delete(ClipId),
}

/// Text buffer for the clip being renamed.
#[derive(Debug, Default)]
pub struct ClipListState {
    editing: Option<ClipId>,
    name: String,
    error: Option<String>,
}

impl ClipListState {
    /// Rename error to show under the edited row.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Keep the buffer in step with the session's edit mode.
    fn sync(&mut self, snapshot: &EditorSnapshot) {
        let editing = snapshot.clips.iter().find(|view| view.editing);
        match editing {
            Some(view) if self.editing.as_ref() != Some(&view.clip.id) => {
                self.editing = Some(view.clip.id.clone());
                self.name = view.clip.name.clone();
                self.error = None;
            }
            None if self.editing.is_some() => {
                self.editing = None;
                self.name.clear();
                self.error = None;
            }
            _ => {}
        }
    }
}

/// Draw the clip list.
pub fn show_clip_list(
    ui: &mut egui::Ui,
    snapshot: &EditorSnapshot,
    state: &mut ClipListState,
) -> Vec<ClipListAction> {
    state.sync(snapshot);
    let mut actions = Vec::new();

    ui.label(
        RichText::new(format!("Clips ({})", snapshot.clips.len()))
            .size(Theme::FONT_MD)
            .color(Theme::t1()),
    );
    if snapshot.clips.is_empty() {
        ui.label(
            RichText::new("Turn on marking and click the track twice to add a clip.")
                .size(Theme::FONT_SM)
                .color(Theme::t3()),
        );
        return actions;
    }

    let enabled = snapshot.controls_enabled;
    egui::ScrollArea::vertical().show(ui, |ui| {
        for view in &snapshot.clips {
            let id = &view.clip.id;
            Theme::row_frame(view.selected).show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.push_id(id, |ui| {
                    if view.editing {
                        edit_row(ui, id, state, &mut actions);
                    } else {
                        ui.horizontal(|ui| {
                            let title = ui.add_enabled(
                                enabled,
                                egui::Label::new(
                                    RichText::new(&view.clip.name).color(Theme::t1()),
                                )
                                .sense(egui::Sense::click()),
                            );
                            if title.clicked() {
                                actions.push(ClipListAction::Select(id.clone()));
                            }
                            if title.double_clicked() {
                                actions.push(ClipListAction::BeginEdit(id.clone()));
                            }
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                if ui.add_enabled(enabled, egui::Button::new("Delete")).clicked() {
                                    actions.push(ClipListAction::Delete(id.clone()));
                                }
                                if ui.add_enabled(enabled, egui::Button::new("Edit")).clicked() {
                                    actions.push(ClipListAction::BeginEdit(id.clone()));
                                }
                                if ui.add_enabled(enabled, egui::Button::new("▶")).clicked() {
                                    actions.push(ClipListAction::Play(id.clone()));
                                }
                            });
                        });
                    }
                    ui.label(
                        RichText::new(format!(
                            "{} - {}",
                            format_clock(view.clip.start),
                            format_clock(view.clip.end)
                        ))
                        .size(Theme::FONT_XS)
                        .color(Theme::t2())
                        .family(egui::FontFamily::Monospace),
                    );
                });
            });
            ui.add_space(Theme::SPACE_XS);
        }
    });
    actions
}

fn edit_row(
    ui: &mut egui::Ui,
    id: &ClipId,
    state: &mut ClipListState,
    actions: &mut Vec<ClipListAction>,
) {
    ui.horizontal(|ui| {
        let field = ui.text_edit_singleline(&mut state.name);
        let submitted = field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("Save").clicked() || submitted {
            actions.push(ClipListAction::CommitEdit {
                id: id.clone(),
                name: state.name.clone(),
            });
        }
        if ui.button("Cancel").clicked() || ui.input(|i| i.key_pressed(egui::Key::Escape)) {
            actions.push(ClipListAction::CancelEdit(id.clone()));
        }
    });
    if let Some(error) = &state.error {
        ui.label(RichText::new(error).size(Theme::FONT_XS).color(Theme::red()));
    }
}

/// Run list actions against the session.
pub fn apply_actions(
    session: &mut EditorSession,
    state: &mut ClipListState,
    actions: Vec<ClipListAction>,
) {
    for action in actions {
        match action {
            ClipListAction::Select(id) => {
                session.select_clip(&id);
            }
            ClipListAction::Play(id) => {
                session.play_clip(&id);
            }
            ClipListAction::BeginEdit(id) => {
                session.begin_edit(&id);
            }
            ClipListAction::CommitEdit { id, name } => {
                if let Err(e) = session.commit_edit(&id, &name) {
                    warn!(id = %id, "rename rejected: {}", e);
                    state.error = Some(e.to_string());
                }
            }
            ClipListAction::CancelEdit(id) => {
                session.cancel_edit(&id);
            }
            ClipListAction::Delete(id) => {
                session.delete_clip(&id);
            }
        }
    }
}
