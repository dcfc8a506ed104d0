use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

/// Tracks whether the overlay style has been pushed into egui yet.
#[derive(Resource, Default)]
pub struct ThemeApplied(pub bool);

/// Overlay color palette.
pub mod colors {
    use bevy_egui::egui::Color32;

    pub const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(24, 24, 27, 248);
    pub const BG_DARKEST: Color32 = Color32::from_rgb(18, 18, 21);

    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(222, 222, 222);
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(164, 164, 164);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(118, 118, 118);

    pub const ACCENT_BLUE: Color32 = Color32::from_rgb(92, 156, 214);
    pub const ACCENT_ORANGE: Color32 = Color32::from_rgb(206, 148, 88);

    pub const SELECTION_BG: Color32 = Color32::from_rgb(40, 78, 118);
    pub const WIDGET_BORDER: Color32 = Color32::from_rgb(68, 68, 74);

    // Graph-pane state colors: running, focused, focused while running,
    // everything else.
    pub const STATE_ACTIVE: Color32 = Color32::from_rgb(88, 200, 118);
    pub const STATE_FOCUSED: Color32 = Color32::from_rgb(228, 200, 82);
    pub const STATE_FOCUSED_ACTIVE: Color32 = Color32::from_rgb(178, 230, 60);
    pub const STATE_IDLE: Color32 = Color32::from_rgb(222, 98, 98);

    pub const AXIS_X: Color32 = Color32::from_rgb(226, 92, 92);
    pub const AXIS_Y: Color32 = Color32::from_rgb(94, 198, 94);
    pub const AXIS_Z: Color32 = Color32::from_rgb(94, 142, 226);
}

/// Apply the overlay's dark style once.
pub fn apply_theme(mut contexts: EguiContexts, mut applied: ResMut<ThemeApplied>) {
    if applied.0 {
        return;
    }
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(8.0, 4.0);
    style.spacing.button_padding = egui::vec2(8.0, 3.0);
    style.spacing.indent = 18.0;
    style.visuals.window_fill = colors::PANEL_BG;
    style.visuals.panel_fill = colors::PANEL_BG;
    style.visuals.window_stroke = egui::Stroke::new(1.0, colors::WIDGET_BORDER);
    style.visuals.extreme_bg_color = colors::BG_DARKEST;
    style.visuals.selection.bg_fill = colors::SELECTION_BG;
    style.visuals.selection.stroke = egui::Stroke::new(1.0, colors::ACCENT_BLUE);
    style.visuals.hyperlink_color = colors::ACCENT_BLUE;
    style.visuals.override_text_color = Some(colors::TEXT_PRIMARY);
    ctx.set_style(style);

    applied.0 = true;
}
