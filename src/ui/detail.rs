use eframe::egui;

use crate::model::ProjectDetail;

use super::style;

pub enum DetailAction {
    None,
    Back,
    OpenLink(String),
}

/// Full project view reached by clicking a card.
pub fn show(ui: &mut egui::Ui, detail: &ProjectDetail) -> DetailAction {
    let mut action = DetailAction::None;

    if ui
        .add(egui::Button::new("\u{2190} Back to projects").frame(false))
        .clicked()
    {
        action = DetailAction::Back;
    }
    ui.add_space(10.0);

    ui.label(
        egui::RichText::new(&detail.title)
            .size(24.0)
            .color(style::TEXT_PRIMARY)
            .strong(),
    );
    if !detail.short_description.is_empty() {
        ui.label(
            egui::RichText::new(&detail.short_description)
                .size(13.0)
                .color(style::TEXT_SECONDARY),
        );
    }

    ui.add_space(6.0);
    ui.horizontal_wrapped(|ui| {
        if !detail.status.is_empty() {
            badge(ui, &detail.status, style::ACCENT);
        }
        if !detail.start_date.is_empty() {
            let range = if detail.end_date.is_empty() {
                format!("{} \u{2013} ongoing", detail.start_date)
            } else {
                format!("{} \u{2013} {}", detail.start_date, detail.end_date)
            };
            badge(ui, &range, style::TEXT_TERTIARY);
        }
        if !detail.client.is_empty() {
            badge(ui, &detail.client, style::ACCENT_ALT);
        }
    });

    ui.add_space(10.0);
    ui.separator();
    ui.add_space(10.0);

    if !detail.full_description.is_empty() {
        ui.label(
            egui::RichText::new(&detail.full_description)
                .size(13.0)
                .color(style::TEXT_SECONDARY),
        );
        ui.add_space(12.0);
    }

    if !detail.features.is_empty() {
        section_title(ui, "Features");
        for feature in &detail.features {
            ui.label(
                egui::RichText::new(format!("\u{2022} {}", feature))
                    .size(12.5)
                    .color(style::TEXT_SECONDARY),
            );
        }
        ui.add_space(12.0);
    }

    if !detail.technologies.is_empty() {
        section_title(ui, "Technologies");
        ui.horizontal_wrapped(|ui| {
            for tech in &detail.technologies {
                badge(ui, tech, style::ACCENT);
            }
        });
        ui.add_space(12.0);
    }

    if !detail.gallery.is_empty() {
        section_title(ui, "Gallery");
        for item in &detail.gallery {
            ui.label(
                egui::RichText::new(item)
                    .size(11.5)
                    .color(style::TEXT_TERTIARY)
                    .monospace(),
            );
        }
        ui.add_space(12.0);
    }

    ui.horizontal(|ui| {
        if let Some(url) = &detail.live_demo {
            if ui
                .add(
                    egui::Button::new(
                        egui::RichText::new("Live demo \u{2197}").color(egui::Color32::BLACK),
                    )
                    .fill(style::ACCENT),
                )
                .clicked()
            {
                action = DetailAction::OpenLink(url.clone());
            }
        }
        if let Some(url) = &detail.source_code {
            if ui.button("Source code \u{2197}").clicked() {
                action = DetailAction::OpenLink(url.clone());
            }
        }
    });

    action
}

fn section_title(ui: &mut egui::Ui, title: &str) {
    ui.label(
        egui::RichText::new(title.to_uppercase())
            .size(11.0)
            .color(style::TEXT_TERTIARY)
            .strong(),
    );
    ui.add_space(4.0);
}

fn badge(ui: &mut egui::Ui, text: &str, color: egui::Color32) {
    egui::Frame::new()
        .fill(egui::Color32::from_rgba_premultiplied(255, 255, 255, 10))
        .corner_radius(egui::CornerRadius::same(4u8))
        .inner_margin(egui::Margin::symmetric(8, 3))
        .show(ui, |ui| {
            ui.label(egui::RichText::new(text).size(11.0).color(color));
        });
}
