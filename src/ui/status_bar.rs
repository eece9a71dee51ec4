use eframe::egui;

use super::style;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

pub fn show(
    ui: &mut egui::Ui,
    backend_label: &str,
    status: &str,
    kind: ToastKind,
    shown_count: usize,
    total_count: usize,
) {
    let frame = egui::Frame::new()
        .fill(egui::Color32::from_rgba_premultiplied(15, 15, 15, 150))
        .inner_margin(egui::Margin { left: 12, right: 12, top: 0, bottom: 0 });

    frame.show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.allocate_ui_with_layout(
            egui::vec2(ui.available_width(), 24.0),
            egui::Layout::left_to_right(egui::Align::Center),
            |ui| {
                ui.label(
                    egui::RichText::new(backend_label)
                        .size(11.0)
                        .color(style::ACCENT)
                        .strong(),
                );
                ui.label(
                    egui::RichText::new("\u{2502}")
                        .size(11.0)
                        .color(style::STROKE_SUBTLE),
                );

                if !status.is_empty() {
                    let color = match kind {
                        ToastKind::Info => style::TEXT_TERTIARY,
                        ToastKind::Success => style::SUCCESS,
                        ToastKind::Error => style::DANGER,
                    };
                    ui.label(egui::RichText::new(status).size(11.0).color(color));
                } else if total_count > 0 {
                    ui.label(
                        egui::RichText::new(format!(
                            "{} of {} projects",
                            shown_count, total_count
                        ))
                        .size(11.0)
                        .color(style::TEXT_TERTIARY),
                    );
                }
            },
        );
    });
}
