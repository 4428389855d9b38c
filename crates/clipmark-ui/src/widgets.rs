//! Small shared widgets: toggle switch and level slider.

use crate::theme::Theme;
use egui::{self, Pos2, Rounding, Stroke, Vec2};

/// Pill toggle. Returns `true` when clicked while enabled.
pub fn toggle_switch(ui: &mut egui::Ui, on: bool, enabled: bool) -> bool {
    let sense = if enabled {
        egui::Sense::click()
    } else {
        egui::Sense::hover()
    };
    let (resp, painter) = ui.allocate_painter(Vec2::new(30.0, 16.0), sense);
    let rect = resp.rect;

    let pill = Rounding::same(rect.height() / 2.0);
    let track = if on {
        Theme::with_alpha(Theme::accent(), 90)
    } else {
        Theme::white_04()
    };
    painter.rect_filled(rect, pill, track);
    painter.rect_stroke(rect, pill, Stroke::new(0.5, Theme::white_08()));

    let radius = 6.0;
    let t = ui
        .ctx()
        .animate_bool_with_time(resp.id.with("toggle_anim"), on, 0.15);
    let x = egui::lerp(rect.left() + radius + 2.0..=rect.right() - radius - 2.0, t);
    let thumb = match (on, enabled) {
        (_, false) => Theme::t3(),
        (true, true) => Theme::accent(),
        (false, true) => Theme::white_25(),
    };
    painter.circle_filled(Pos2::new(x, rect.center().y), radius, thumb);

    enabled && resp.clicked()
}

/// Horizontal 0..=1 slider. Returns `true` when the value changed.
pub fn level_slider(ui: &mut egui::Ui, value: &mut f32, width: f32, enabled: bool) -> bool {
    let sense = if enabled {
        egui::Sense::click_and_drag()
    } else {
        egui::Sense::hover()
    };
    let (resp, painter) = ui.allocate_painter(Vec2::new(width, 20.0), sense);
    let bar = egui::Rect::from_center_size(resp.rect.center(), Vec2::new(width, 4.0));

    painter.rect_filled(bar, Rounding::same(2.0), Theme::white_08());
    let frac = value.clamp(0.0, 1.0);
    let fill = egui::Rect::from_min_size(bar.min, Vec2::new(bar.width() * frac, bar.height()));
    let color = if enabled { Theme::accent() } else { Theme::t3() };
    painter.rect_filled(fill, Rounding::same(2.0), color);
    painter.circle_filled(Pos2::new(fill.right(), bar.center().y), 5.0, Theme::t1());

    if !(resp.dragged() || resp.clicked()) {
        return false;
    }
    let Some(pos) = resp.interact_pointer_pos() else {
        return false;
    };
    let next = ((pos.x - bar.left()) / bar.width().max(1.0)).clamp(0.0, 1.0);
    let changed = (next - *value).abs() > f32::EPSILON;
    *value = next;
    changed
}
