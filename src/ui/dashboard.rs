use eframe::egui;

use crate::api::store::StoreStats;
use crate::model::{Page, ProjectStatus, SortKey, SortOrder, StoredProject};

use super::style;

pub enum DashboardAction {
    None,
    Add,
    Edit(i64),
    Delete(i64),
    Refresh,
    /// Sort, filter or page changed; the caller should re-fetch.
    QueryChanged,
}

pub struct DashboardQuery {
    pub search: String,
    pub status: Option<ProjectStatus>,
    pub sort_key: SortKey,
    pub sort_order: SortOrder,
    pub page: usize,
}

impl Default for DashboardQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: None,
            sort_key: SortKey::default(),
            sort_order: SortOrder::default(),
            page: 1,
        }
    }
}

impl DashboardQuery {
    /// Never goes below page 1, even if the backend claims a previous page.
    fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    fn next_page(&mut self) {
        self.page += 1;
    }
}

const SORT_KEYS: [(SortKey, &str); 4] = [
    (SortKey::UpdatedAt, "Updated"),
    (SortKey::CreatedAt, "Created"),
    (SortKey::Title, "Title"),
    (SortKey::Status, "Status"),
];

/// Owner dashboard: stat cards plus a manageable listing of store entries.
pub fn show(
    ui: &mut egui::Ui,
    stats: Option<&StoreStats>,
    branch_count: usize,
    listing: Option<&Page<StoredProject>>,
    query: &mut DashboardQuery,
    loading: bool,
) -> DashboardAction {
    let mut action = DashboardAction::None;

    ui.add_space(12.0);
    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new("Dashboard")
                .size(22.0)
                .color(style::TEXT_PRIMARY)
                .strong(),
        );
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .add(
                    egui::Button::new(
                        egui::RichText::new("+ New project").color(egui::Color32::BLACK),
                    )
                    .fill(style::ACCENT),
                )
                .clicked()
            {
                action = DashboardAction::Add;
            }
            if ui.button("\u{21BB} Refresh").clicked() {
                action = DashboardAction::Refresh;
            }
        });
    });
    ui.add_space(8.0);

    if let Some(stats) = stats {
        ui.columns(4, |cols| {
            stat_card(&mut cols[0], "Total", stats.total, style::ACCENT);
            stat_card(&mut cols[1], "Seed", stats.seed, style::TEXT_TERTIARY);
            stat_card(&mut cols[2], "Custom", stats.custom, style::ACCENT_ALT);
            stat_card(&mut cols[3], "Branches", branch_count, style::SUCCESS);
        });
        ui.add_space(12.0);
    }

    // Filter and sort controls.
    ui.horizontal(|ui| {
        let search = ui.add(
            egui::TextEdit::singleline(&mut query.search)
                .hint_text("Filter entries...")
                .desired_width(200.0),
        );
        if search.changed() {
            query.page = 1;
            action = DashboardAction::QueryChanged;
        }

        let status_label = match query.status {
            None => "Any status",
            Some(s) => s.label(),
        };
        egui::ComboBox::from_id_salt("dash_status")
            .selected_text(status_label)
            .width(120.0)
            .show_ui(ui, |ui| {
                if ui.selectable_label(query.status.is_none(), "Any status").clicked() {
                    query.status = None;
                    query.page = 1;
                    action = DashboardAction::QueryChanged;
                }
                for status in ProjectStatus::ALL {
                    if ui
                        .selectable_label(query.status == Some(status), status.label())
                        .clicked()
                    {
                        query.status = Some(status);
                        query.page = 1;
                        action = DashboardAction::QueryChanged;
                    }
                }
            });

        let sort_label = SORT_KEYS
            .iter()
            .find(|(k, _)| *k == query.sort_key)
            .map(|(_, l)| *l)
            .unwrap_or("Updated");
        egui::ComboBox::from_id_salt("dash_sort")
            .selected_text(format!("Sort: {}", sort_label))
            .width(130.0)
            .show_ui(ui, |ui| {
                for (key, label) in SORT_KEYS {
                    if ui.selectable_label(query.sort_key == key, label).clicked() {
                        query.sort_key = key;
                        query.page = 1;
                        action = DashboardAction::QueryChanged;
                    }
                }
            });

        let order_icon = match query.sort_order {
            SortOrder::Asc => "\u{2191}",
            SortOrder::Desc => "\u{2193}",
        };
        if ui.button(order_icon).clicked() {
            query.sort_order = match query.sort_order {
                SortOrder::Asc => SortOrder::Desc,
                SortOrder::Desc => SortOrder::Asc,
            };
            query.page = 1;
            action = DashboardAction::QueryChanged;
        }
    });
    ui.add_space(8.0);

    if loading {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label(
                egui::RichText::new("Loading entries...")
                    .size(12.0)
                    .color(style::TEXT_TERTIARY),
            );
        });
        return action;
    }

    let Some(listing) = listing else {
        ui.label(
            egui::RichText::new("Entry management is only available on the mock backend.")
                .size(12.5)
                .color(style::TEXT_TERTIARY),
        );
        return action;
    };

    for entry in &listing.items {
        if let Some(row_action) = entry_row(ui, entry) {
            action = row_action;
        }
    }

    if listing.items.is_empty() {
        ui.label(
            egui::RichText::new("No entries match the current filter.")
                .size(12.5)
                .color(style::TEXT_TERTIARY),
        );
    }

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        if ui.add_enabled(listing.has_prev, egui::Button::new("\u{2190} Prev")).clicked() {
            query.prev_page();
            action = DashboardAction::QueryChanged;
        }
        ui.label(
            egui::RichText::new(format!(
                "Page {} \u{00B7} {} entries",
                listing.page, listing.total
            ))
            .size(11.0)
            .color(style::TEXT_TERTIARY),
        );
        if ui.add_enabled(listing.has_next, egui::Button::new("Next \u{2192}")).clicked() {
            query.next_page();
            action = DashboardAction::QueryChanged;
        }
    });

    action
}

fn stat_card(ui: &mut egui::Ui, label: &str, value: usize, color: egui::Color32) {
    egui::Frame::new()
        .fill(style::CARD_BG)
        .corner_radius(egui::CornerRadius::same(6u8))
        .stroke(egui::Stroke::new(1.0, style::STROKE_SUBTLE))
        .inner_margin(egui::Margin::same(12))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new(value.to_string()).size(22.0).color(color).strong());
            ui.label(
                egui::RichText::new(label.to_uppercase())
                    .size(10.0)
                    .color(style::TEXT_TERTIARY),
            );
        });
}

fn entry_row(ui: &mut egui::Ui, entry: &StoredProject) -> Option<DashboardAction> {
    let mut action = None;

    egui::Frame::new()
        .fill(style::CARD_BG)
        .corner_radius(egui::CornerRadius::same(4u8))
        .inner_margin(egui::Margin::symmetric(10, 6))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(format!("#{}", entry.id))
                        .size(11.0)
                        .color(style::TEXT_TERTIARY)
                        .monospace(),
                );
                ui.label(
                    egui::RichText::new(&entry.title)
                        .size(13.0)
                        .color(style::TEXT_PRIMARY),
                );
                ui.label(
                    egui::RichText::new(entry.status.label())
                        .size(10.5)
                        .color(style::status_color(entry.status)),
                );
                if entry.provenance == crate::model::Provenance::Seed {
                    ui.label(
                        egui::RichText::new("seed")
                            .size(10.0)
                            .color(style::TEXT_DISABLED),
                    );
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("Delete").clicked() {
                        action = Some(DashboardAction::Delete(entry.id));
                    }
                    if ui.small_button("Edit").clicked() {
                        action = Some(DashboardAction::Edit(entry.id));
                    }
                    ui.label(
                        egui::RichText::new(entry.updated_at.format("%Y-%m-%d").to_string())
                            .size(10.5)
                            .color(style::TEXT_TERTIARY),
                    );
                });
            });
        });

    action
}
