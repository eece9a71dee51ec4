use eframe::egui;

/// Dark slate palette.
pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(96, 165, 250);
pub const ACCENT_ALT: egui::Color32 = egui::Color32::from_rgb(167, 139, 250);
pub const TEXT_PRIMARY: egui::Color32 = egui::Color32::WHITE;
pub const TEXT_SECONDARY: egui::Color32 =
    egui::Color32::from_rgba_premultiplied(200, 200, 200, 200);
pub const TEXT_TERTIARY: egui::Color32 =
    egui::Color32::from_rgba_premultiplied(139, 139, 139, 139);
pub const TEXT_DISABLED: egui::Color32 =
    egui::Color32::from_rgba_premultiplied(92, 92, 92, 92);
pub const PANEL_BG: egui::Color32 = egui::Color32::from_rgb(13, 36, 56);
pub const CARD_BG: egui::Color32 = egui::Color32::from_rgba_premultiplied(30, 30, 30, 30);
pub const CARD_BG_HOVER: egui::Color32 = egui::Color32::from_rgba_premultiplied(58, 58, 58, 58);
pub const STROKE_SUBTLE: egui::Color32 = egui::Color32::from_rgba_premultiplied(64, 64, 64, 64);
pub const DANGER: egui::Color32 = egui::Color32::from_rgb(255, 100, 100);
pub const SUCCESS: egui::Color32 = egui::Color32::from_rgb(74, 222, 128);
pub const WARNING: egui::Color32 = egui::Color32::from_rgb(250, 204, 21);

pub fn status_color(status: crate::model::ProjectStatus) -> egui::Color32 {
    use crate::model::ProjectStatus::*;
    match status {
        Planning => WARNING,
        InProgress => ACCENT,
        Completed => SUCCESS,
    }
}

pub fn apply(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    style.visuals.dark_mode = true;
    style.visuals.override_text_color = Some(TEXT_PRIMARY);
    style.visuals.panel_fill = egui::Color32::from_rgb(15, 23, 42);
    style.visuals.window_fill = egui::Color32::from_rgba_premultiplied(44, 44, 44, 245);
    style.visuals.window_stroke = egui::Stroke::new(1.0, STROKE_SUBTLE);
    style.visuals.widgets.noninteractive.bg_fill = egui::Color32::TRANSPARENT;
    style.visuals.widgets.inactive.bg_fill = CARD_BG;
    style.visuals.widgets.hovered.bg_fill = CARD_BG_HOVER;
    style.visuals.widgets.active.bg_fill =
        egui::Color32::from_rgba_premultiplied(255, 255, 255, 30);
    style.visuals.selection.bg_fill =
        egui::Color32::from_rgba_premultiplied(96, 165, 250, 40);
    style.visuals.selection.stroke = egui::Stroke::new(1.0, ACCENT);

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(10.0, 5.0);

    style.visuals.window_corner_radius = egui::CornerRadius::same(8u8);
    style.visuals.widgets.noninteractive.corner_radius = egui::CornerRadius::same(4u8);
    style.visuals.widgets.inactive.corner_radius = egui::CornerRadius::same(4u8);
    style.visuals.widgets.hovered.corner_radius = egui::CornerRadius::same(4u8);
    style.visuals.widgets.active.corner_radius = egui::CornerRadius::same(4u8);

    ctx.set_style(style);
}
