//! Track widget: ruler, stored clips, the editable range with its two
//! markers, and the playhead.

use std::time::Instant;

use clipmark_core::{format_clock, Boundary, TrackGeometry};
use egui::{self, Pos2, Rect, Rounding, Stroke, Vec2};

use crate::drag::GestureToken;
use crate::editor::{ClickOutcome, EditorSession};
use crate::theme::Theme;

/// Per-widget interaction state kept across frames.
#[derive(Debug, Default)]
pub struct TimelineState {
    gesture: Option<GestureToken>,
    hovered_marker: Option<Boundary>,
}

/// Draw the track and feed pointer input into the session.
///
/// Returns what a plain click on the track did, if there was one.
pub fn show_timeline(
    ui: &mut egui::Ui,
    session: &mut EditorSession,
    state: &mut TimelineState,
    now: Instant,
) -> Option<ClickOutcome> {
    let width = ui.available_width();
    let (response, painter) = ui.allocate_painter(
        Vec2::new(width, Theme::RULER_HEIGHT + Theme::TRACK_HEIGHT),
        egui::Sense::click(),
    );
    let rect = response.rect;
    let geometry = TrackGeometry::new(rect.left(), rect.width());
    session.set_track_geometry(geometry);

    // Release outside any marker, or the marker vanished mid-drag.
    if let Some(token) = state.gesture {
        if !ui.input(|i| i.pointer.any_down()) {
            session.pointer_up(token, now);
            state.gesture = None;
        }
    }

    let snapshot = session.snapshot();
    let duration = snapshot.duration;
    let x_at = |t: f64| geometry.x_at_time(t, duration);

    painter.rect_filled(rect, 0.0, Theme::bg());
    let ruler = Rect::from_min_size(rect.min, Vec2::new(rect.width(), Theme::RULER_HEIGHT));
    draw_ruler(&painter, ruler, duration);
    let track = Rect::from_min_max(Pos2::new(rect.left(), ruler.bottom()), rect.max);

    // Stored clips
    for view in &snapshot.clips {
        let bar = Rect::from_x_y_ranges(
            x_at(view.clip.start)..=x_at(view.clip.end),
            track.top() + 6.0..=track.bottom() - 6.0,
        );
        painter.rect_filled(bar, Rounding::same(3.0), Theme::clip_fill(view.selected));
        if view.editing {
            painter.rect_stroke(bar, Rounding::same(3.0), Stroke::new(1.0, Theme::accent()));
        }
        painter.text(
            bar.left_top() + Vec2::new(4.0, 3.0),
            egui::Align2::LEFT_TOP,
            &view.clip.name,
            egui::FontId::proportional(Theme::FONT_XS),
            Theme::t1(),
        );
    }

    if let Some((start, end)) = snapshot.pending_creation {
        let band = Rect::from_x_y_ranges(x_at(start)..=x_at(end), track.y_range());
        painter.rect_filled(band, 0.0, Theme::pending_fill());
    }

    // Editable range and markers
    let range = snapshot.range;
    if let Some((start, end)) = range.bounds() {
        let (a, b) = (x_at(start.min(end)), x_at(start.max(end)));
        painter.rect_filled(
            Rect::from_x_y_ranges(a..=b, track.y_range()),
            0.0,
            Theme::range_fill(),
        );
    }
    state.hovered_marker = None;
    for target in [Boundary::Start, Boundary::End] {
        let Some(t) = range.get(target) else {
            continue;
        };
        let x = x_at(t);
        let handle = Rect::from_center_size(
            Pos2::new(x, track.center().y),
            Vec2::new(Theme::MARKER_WIDTH, track.height()),
        );
        let marker = ui.interact(handle, ui.id().with(("marker", target)), egui::Sense::drag());
        let color = Theme::marker(snapshot.drag_enabled);
        painter.line_segment(
            [Pos2::new(x, track.top()), Pos2::new(x, track.bottom())],
            Stroke::new(2.0, color),
        );
        painter.rect_filled(
            Rect::from_center_size(Pos2::new(x, track.top() + 6.0), Vec2::splat(8.0)),
            Rounding::same(2.0),
            color,
        );
        if marker.hovered() {
            state.hovered_marker = Some(target);
            if snapshot.drag_enabled {
                ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
            }
        }
        handle_marker(ui, &marker, target, session, state, now);
    }

    // Playhead
    let px = x_at(snapshot.current_time);
    painter.line_segment(
        [Pos2::new(px, rect.top()), Pos2::new(px, rect.bottom())],
        Stroke::new(Theme::PLAYHEAD_WIDTH, Theme::red()),
    );

    if let Some(message) = &snapshot.error {
        painter.rect_filled(track, 0.0, Theme::with_alpha(Theme::bg(), 200));
        painter.text(
            track.center(),
            egui::Align2::CENTER_CENTER,
            message,
            egui::FontId::proportional(Theme::FONT_SM),
            Theme::red(),
        );
    }

    // A press on a marker also reports a click on the track beneath it;
    // the session drops those while the drag settles.
    let clicked = response
        .clicked()
        .then(|| response.interact_pointer_pos())
        .flatten()
        .filter(|_| state.gesture.is_none() && state.hovered_marker.is_none())
        .map(|pos| session.track_click(pos.x, now));

    if snapshot.playing {
        ui.ctx().request_repaint();
    } else if let Some(wait) = session.next_deadline(now) {
        ui.ctx().request_repaint_after(wait);
    }
    clicked
}

fn handle_marker(
    ui: &egui::Ui,
    marker: &egui::Response,
    target: Boundary,
    session: &mut EditorSession,
    state: &mut TimelineState,
    now: Instant,
) {
    if marker.drag_started() && state.gesture.is_none() {
        state.gesture = session.marker_pointer_down(target);
    }
    let Some(token) = state.gesture else {
        return;
    };
    // The other marker's response carries no motion for this gesture.
    if !marker.dragged() && !marker.drag_stopped() {
        return;
    }
    if marker.dragged() {
        if let Some(pos) = ui.ctx().pointer_interact_pos() {
            session.pointer_move(token, pos.x);
        }
    }
    if marker.drag_stopped() {
        session.pointer_up(token, now);
        state.gesture = None;
    }
}

fn draw_ruler(painter: &egui::Painter, rect: Rect, duration: f64) {
    painter.rect_filled(rect, 0.0, Theme::bg1());
    painter.line_segment(
        [rect.left_bottom(), rect.right_bottom()],
        Stroke::new(Theme::STROKE_SUBTLE, Theme::white_08()),
    );
    if duration <= 0.0 || rect.width() <= 0.0 {
        return;
    }

    let step = tick_step(duration, rect.width());
    let mut t = 0.0;
    while t <= duration {
        let x = rect.left() + (t / duration) as f32 * rect.width();
        painter.line_segment(
            [Pos2::new(x, rect.bottom() - 5.0), Pos2::new(x, rect.bottom())],
            Stroke::new(Theme::STROKE_SUBTLE, Theme::t3()),
        );
        painter.text(
            Pos2::new(x + 2.0, rect.top() + 2.0),
            egui::Align2::LEFT_TOP,
            format_clock(t),
            egui::FontId::monospace(Theme::FONT_XS),
            Theme::t3(),
        );
        t += step;
    }
}

/// Label spacing in seconds that keeps ticks at least 70 px apart.
fn tick_step(duration: f64, width: f32) -> f64 {
    const STEPS: [f64; 9] = [1.0, 5.0, 10.0, 15.0, 30.0, 60.0, 300.0, 600.0, 1800.0];
    let min_secs = duration * 70.0 / f64::from(width.max(1.0));
    STEPS
        .iter()
        .copied()
        .find(|&step| step >= min_secs)
        .unwrap_or(3600.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_step_scales_with_zoom() {
        assert_eq!(tick_step(60.0, 1200.0), 5.0);
        assert_eq!(tick_step(3600.0, 1200.0), 300.0);
        assert_eq!(tick_step(86_400.0, 100.0), 3600.0);
    }
}
