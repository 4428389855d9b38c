//! Dark editor theme: palette, spacing and frame builders.

use egui::{Color32, Rounding, Stroke, Vec2};

/// Shared colors and metrics for every clipmark widget.
pub struct Theme;

impl Theme {
    // ── Typography ─────────────────────────────────────────────
    pub const FONT_XS: f32 = 11.0; // ruler labels, timestamps
    pub const FONT_SM: f32 = 13.0; // body, buttons
    pub const FONT_MD: f32 = 15.0; // section headers

    // ── Spacing (4px base) ─────────────────────────────────────
    pub const SPACE_XS: f32 = 4.0;
    pub const SPACE_SM: f32 = 8.0;
    pub const SPACE_MD: f32 = 16.0;

    // ── Shapes ─────────────────────────────────────────────────
    pub const RADIUS: f32 = 6.0;
    pub const STROKE_SUBTLE: f32 = 0.5;
    pub const STROKE_EMPHASIS: f32 = 1.0;

    // ── Timeline metrics ───────────────────────────────────────
    pub const RULER_HEIGHT: f32 = 18.0;
    pub const TRACK_HEIGHT: f32 = 56.0;
    pub const MARKER_WIDTH: f32 = 10.0;
    pub const PLAYHEAD_WIDTH: f32 = 2.0;

    // ── Backgrounds ────────────────────────────────────────────
    pub const fn bg() -> Color32 {
        Color32::from_rgb(18, 18, 22)
    }
    pub const fn bg1() -> Color32 {
        Color32::from_rgb(28, 28, 34)
    }
    pub const fn bg2() -> Color32 {
        Color32::from_rgb(35, 35, 42)
    }
    pub const fn bg3() -> Color32 {
        Color32::from_rgb(45, 45, 55)
    }

    // ── Text ───────────────────────────────────────────────────
    pub const fn t1() -> Color32 {
        Color32::from_rgba_premultiplied(235, 235, 235, 235)
    }
    pub const fn t2() -> Color32 {
        Color32::from_rgba_premultiplied(153, 153, 153, 153)
    }
    pub const fn t3() -> Color32 {
        Color32::from_rgba_premultiplied(89, 89, 89, 89)
    }

    // ── Accent & semantic ──────────────────────────────────────
    pub const fn accent() -> Color32 {
        Color32::from_rgb(86, 130, 255)
    }
    pub const fn red() -> Color32 {
        Color32::from_rgb(255, 88, 85)
    }
    pub const fn green() -> Color32 {
        Color32::from_rgb(48, 213, 160)
    }
    pub const fn amber() -> Color32 {
        Color32::from_rgb(255, 184, 48)
    }

    // ── Overlays ───────────────────────────────────────────────
    pub const fn white_04() -> Color32 {
        Color32::from_rgba_premultiplied(10, 10, 10, 10)
    }
    pub const fn white_08() -> Color32 {
        Color32::from_rgba_premultiplied(20, 20, 20, 20)
    }
    pub const fn white_25() -> Color32 {
        Color32::from_rgba_premultiplied(64, 64, 64, 64)
    }

    // ── Timeline roles ─────────────────────────────────────────
    /// Stored clip bar.
    pub fn clip_fill(selected: bool) -> Color32 {
        if selected {
            Self::with_alpha(Self::accent(), 110)
        } else {
            Self::with_alpha(Self::accent(), 40)
        }
    }
    /// Range being defined or dragged.
    pub fn range_fill() -> Color32 {
        Self::with_alpha(Self::amber(), 60)
    }
    /// Range waiting for its creation debounce.
    pub fn pending_fill() -> Color32 {
        Self::with_alpha(Self::green(), 50)
    }
    pub fn marker(enabled: bool) -> Color32 {
        if enabled {
            Self::amber()
        } else {
            Self::t3()
        }
    }

    /// Return a color with replaced alpha.
    pub const fn with_alpha(c: Color32, a: u8) -> Color32 {
        Color32::from_rgba_premultiplied(
            (c.r() as u16 * a as u16 / 255) as u8,
            (c.g() as u16 * a as u16 / 255) as u8,
            (c.b() as u16 * a as u16 / 255) as u8,
            a,
        )
    }

    // ── Frames ─────────────────────────────────────────────────

    pub fn panel_frame() -> egui::Frame {
        egui::Frame::none()
            .fill(Self::bg1())
            .inner_margin(egui::Margin::same(Self::SPACE_SM))
    }

    /// Row frame in the clip list.
    pub fn row_frame(selected: bool) -> egui::Frame {
        let (fill, stroke) = if selected {
            (Self::with_alpha(Self::accent(), 30), Self::accent())
        } else {
            (Self::bg2(), Self::white_04())
        };
        egui::Frame::none()
            .fill(fill)
            .stroke(Stroke::new(Self::STROKE_SUBTLE, stroke))
            .rounding(Rounding::same(Self::RADIUS))
            .inner_margin(egui::Margin::symmetric(Self::SPACE_SM, Self::SPACE_XS))
    }

    /// Apply the theme to an egui context.
    pub fn apply(ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();
        let visuals = &mut style.visuals;
        *visuals = egui::Visuals::dark();

        visuals.panel_fill = Self::bg1();
        visuals.window_fill = Self::bg2();
        visuals.extreme_bg_color = Self::bg();

        visuals.widgets.inactive.bg_fill = Self::bg3();
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, Self::t2());
        visuals.widgets.inactive.rounding = Rounding::same(Self::RADIUS);
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, Self::t1());
        visuals.widgets.hovered.rounding = Rounding::same(Self::RADIUS);
        visuals.widgets.active.fg_stroke = Stroke::new(Self::STROKE_EMPHASIS, Self::accent());
        visuals.widgets.active.rounding = Rounding::same(Self::RADIUS);

        visuals.selection.stroke = Stroke::new(1.0, Self::accent());
        style.spacing.item_spacing = Vec2::new(Self::SPACE_SM, Self::SPACE_XS);

        ctx.set_style(style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_alpha_premultiplies() {
        let c = Theme::with_alpha(Color32::from_rgb(255, 0, 128), 51);
        assert_eq!(c.a(), 51);
        assert_eq!(c.r(), 51);
        assert_eq!(c.g(), 0);
    }

    #[test]
    fn test_selected_clip_is_more_opaque() {
        assert!(Theme::clip_fill(true).a() > Theme::clip_fill(false).a());
    }
}
