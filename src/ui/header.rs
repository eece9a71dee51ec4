use eframe::egui;

use super::style;
use super::Page;

const TABS: [(&str, Page); 5] = [
    ("Home", Page::Home),
    ("About", Page::About),
    ("Projects", Page::Projects),
    ("Contact", Page::Contact),
    ("Dashboard", Page::Dashboard),
];

/// Top navigation bar. Returns the page the user clicked, if any.
pub fn show(ui: &mut egui::Ui, owner_name: &str, current: &Page) -> Option<Page> {
    let mut clicked = None;

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new(owner_name)
                .size(16.0)
                .color(style::ACCENT)
                .strong(),
        );

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            for (label, page) in TABS.iter().rev() {
                // Details is a sub-page of Projects for highlighting purposes.
                let active = current == page
                    || (*page == Page::Projects
                        && matches!(current, Page::ProjectDetails(_)));
                let text = if active {
                    egui::RichText::new(*label).color(style::ACCENT).strong()
                } else {
                    egui::RichText::new(*label).color(style::TEXT_SECONDARY)
                };
                if ui.add(egui::Button::new(text).frame(false)).clicked() {
                    clicked = Some(page.clone());
                }
            }
        });
    });
    ui.add_space(6.0);

    clicked
}
