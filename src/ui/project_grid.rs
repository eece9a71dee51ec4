use eframe::egui;

use crate::model::Project;

use super::style;

pub enum GridAction {
    None,
    Open(i64),
}

const COLUMNS: usize = 3;

fn branch_icon(p: &Project) -> &'static str {
    match p.branches.first().map(String::as_str) {
        Some("web") => "\u{1F310}",
        Some("mobile") => "\u{1F4F1}",
        Some("games") => "\u{1F3AE}",
        _ => "\u{1F4C1}",
    }
}

/// Card grid for a visible slice of projects. Returns the clicked card's id.
pub fn show(ui: &mut egui::Ui, projects: &[&Project]) -> GridAction {
    let mut action = GridAction::None;

    for row in projects.chunks(COLUMNS) {
        ui.columns(COLUMNS, |cols| {
            for (col, project) in cols.iter_mut().zip(row.iter()) {
                if card(col, project) {
                    action = GridAction::Open(project.id);
                }
            }
        });
        ui.add_space(8.0);
    }

    action
}

fn card(ui: &mut egui::Ui, project: &Project) -> bool {
    let frame = egui::Frame::new()
        .fill(style::CARD_BG)
        .corner_radius(egui::CornerRadius::same(6u8))
        .stroke(egui::Stroke::new(1.0, style::STROKE_SUBTLE))
        .inner_margin(egui::Margin::same(12));

    let frame_resp = frame.show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.set_min_height(110.0);

        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(branch_icon(project))
                    .size(16.0)
                    .color(style::TEXT_SECONDARY),
            );
            ui.label(
                egui::RichText::new(&project.title)
                    .size(14.0)
                    .color(style::TEXT_PRIMARY)
                    .strong(),
            );
        });

        // Truncated like a card excerpt; the full text lives in the details view.
        let excerpt: String = project.description.chars().take(120).collect();
        ui.label(
            egui::RichText::new(excerpt)
                .size(11.5)
                .color(style::TEXT_SECONDARY),
        );

        if !project.tags.is_empty() {
            ui.horizontal_wrapped(|ui| {
                for tag in project.tags.iter().take(4) {
                    ui.label(
                        egui::RichText::new(format!("#{}", tag))
                            .size(10.0)
                            .color(style::ACCENT),
                    );
                }
            });
        }
    });

    let response = frame_resp
        .response
        .interact(egui::Sense::click())
        .on_hover_cursor(egui::CursorIcon::PointingHand);
    response.clicked()
}
