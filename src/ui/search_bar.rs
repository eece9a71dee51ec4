use eframe::egui;

use super::style;

pub struct SearchBarChange {
    pub query_edited: bool,
    pub branch_changed: bool,
    pub reset: bool,
}

/// Search box plus branch selector for the Projects page.
pub fn show(
    ui: &mut egui::Ui,
    query: &mut String,
    branch: &mut String,
    branches: &[String],
    is_filtering: bool,
) -> SearchBarChange {
    let mut change = SearchBarChange {
        query_edited: false,
        branch_changed: false,
        reset: false,
    };

    let frame = egui::Frame::new()
        .fill(egui::Color32::from_rgba_premultiplied(255, 255, 255, 10))
        .corner_radius(egui::CornerRadius::same(8u8))
        .inner_margin(egui::Margin { left: 12, right: 8, top: 8, bottom: 8 })
        .stroke(egui::Stroke::new(1.0, style::STROKE_SUBTLE));

    frame.show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new("\u{1F50D}")
                    .size(14.0)
                    .color(style::TEXT_TERTIARY),
            );

            let response = ui.add(
                egui::TextEdit::singleline(query)
                    .hint_text(
                        egui::RichText::new("Search projects...")
                            .color(style::TEXT_DISABLED),
                    )
                    .frame(false)
                    .desired_width(ui.available_width() - 220.0),
            );
            change.query_edited = response.changed();

            let selected_label = if branch.is_empty() {
                "All branches".to_string()
            } else {
                branch.clone()
            };
            egui::ComboBox::from_id_salt("branch_filter")
                .selected_text(selected_label)
                .width(140.0)
                .show_ui(ui, |ui| {
                    if ui
                        .selectable_label(branch.is_empty(), "All branches")
                        .clicked()
                        && !branch.is_empty()
                    {
                        branch.clear();
                        change.branch_changed = true;
                    }
                    for b in branches {
                        if ui.selectable_label(branch == b, b).clicked() && branch != b {
                            *branch = b.clone();
                            change.branch_changed = true;
                        }
                    }
                });

            if is_filtering && ui.button("Clear").clicked() {
                change.reset = true;
            }
        });
    });

    change
}
