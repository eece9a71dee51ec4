use eframe::egui;

use crate::model::{CreateProject, ProjectStatus, Provenance, StoredProject, UpdateProject};

use super::style;

/// Editable form state for the add/edit project dialog. Tag and technology
/// lists are edited as comma-separated text.
#[derive(Clone, Default)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub image: String,
    pub tags_input: String,
    pub technologies_input: String,
    pub github: String,
    pub demo: String,
    pub status: ProjectStatus,
}

impl ProjectDraft {
    pub fn from_entry(entry: &StoredProject) -> Self {
        Self {
            title: entry.title.clone(),
            description: entry.description.clone(),
            image: entry.image.clone(),
            tags_input: entry.tags.join(", "),
            technologies_input: entry.technologies.join(", "),
            github: entry.github.clone().unwrap_or_default(),
            demo: entry.demo.clone().unwrap_or_default(),
            status: entry.status,
        }
    }

    pub fn to_create(&self) -> CreateProject {
        CreateProject {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            image: self.image.trim().to_string(),
            tags: split_csv(&self.tags_input),
            technologies: split_csv(&self.technologies_input),
            github: non_empty(&self.github),
            demo: non_empty(&self.demo),
            status: self.status,
        }
    }

    pub fn to_update(&self) -> UpdateProject {
        UpdateProject {
            title: Some(self.title.trim().to_string()),
            description: Some(self.description.trim().to_string()),
            image: Some(self.image.trim().to_string()),
            tags: Some(split_csv(&self.tags_input)),
            technologies: Some(split_csv(&self.technologies_input)),
            github: non_empty(&self.github),
            demo: non_empty(&self.demo),
            status: Some(self.status),
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty() && !self.description.trim().is_empty()
    }
}

fn split_csv(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub enum ModalState {
    None,
    EditProject {
        /// None = creating a new entry.
        id: Option<i64>,
        draft: ProjectDraft,
    },
    ConfirmDelete {
        id: i64,
        title: String,
        provenance: Provenance,
    },
}

pub enum ModalResult {
    None,
    SaveProject { id: Option<i64>, draft: ProjectDraft },
    ConfirmDelete { id: i64 },
}

pub fn show(ctx: &egui::Context, modal: &mut ModalState) -> ModalResult {
    let mut result = ModalResult::None;
    let mut close = false;

    match modal {
        ModalState::None => {}

        ModalState::EditProject { id, draft } => {
            overlay(ctx);

            let title = if id.is_some() { "Edit project" } else { "New project" };
            egui::Window::new(title)
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .fixed_size(egui::vec2(420.0, 0.0))
                .show(ctx, |ui| {
                    ui.add_space(8.0);

                    field(ui, "Title", &mut draft.title, "Project title");
                    ui.add_space(6.0);

                    field_label(ui, "Description");
                    ui.add(
                        egui::TextEdit::multiline(&mut draft.description)
                            .hint_text("What the project does")
                            .desired_rows(3)
                            .desired_width(f32::INFINITY),
                    );
                    ui.add_space(6.0);

                    field(ui, "Image", &mut draft.image, "/images/example.webp");
                    ui.add_space(6.0);
                    field(ui, "Tags", &mut draft.tags_input, "react, rust, ...");
                    ui.add_space(6.0);
                    field(
                        ui,
                        "Technologies",
                        &mut draft.technologies_input,
                        "tokio, egui, ...",
                    );
                    ui.add_space(6.0);
                    field(ui, "Source URL", &mut draft.github, "https://github.com/...");
                    ui.add_space(6.0);
                    field(ui, "Demo URL", &mut draft.demo, "https://...");
                    ui.add_space(6.0);

                    field_label(ui, "Status");
                    ui.horizontal(|ui| {
                        for status in ProjectStatus::ALL {
                            ui.selectable_value(&mut draft.status, status, status.label());
                        }
                    });

                    ui.add_space(12.0);

                    ui.horizontal(|ui| {
                        ui.with_layout(
                            egui::Layout::right_to_left(egui::Align::Center),
                            |ui| {
                                let save_label = if id.is_some() { "Save" } else { "Create" };
                                if ui
                                    .add(
                                        egui::Button::new(
                                            egui::RichText::new(save_label)
                                                .color(egui::Color32::BLACK),
                                        )
                                        .fill(style::ACCENT),
                                    )
                                    .clicked()
                                    && draft.is_valid()
                                {
                                    result = ModalResult::SaveProject {
                                        id: *id,
                                        draft: draft.clone(),
                                    };
                                    close = true;
                                }

                                if ui.button("Cancel").clicked() {
                                    close = true;
                                }
                            },
                        );
                    });
                });

            if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
                close = true;
            }
        }

        ModalState::ConfirmDelete { id, title, provenance } => {
            overlay(ctx);

            let seed = *provenance == Provenance::Seed;
            egui::Window::new("Delete project")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .fixed_size(egui::vec2(340.0, 0.0))
                .show(ctx, |ui| {
                    ui.add_space(8.0);
                    ui.label(
                        egui::RichText::new("\u{26A0}")
                            .size(24.0)
                            .color(style::WARNING),
                    );
                    ui.add_space(4.0);

                    let message = if seed {
                        format!(
                            "\"{}\" is a seed entry from the static catalogue; the store will refuse to delete it.",
                            title
                        )
                    } else {
                        format!("Delete \"{}\"? This cannot be undone.", title)
                    };
                    ui.label(
                        egui::RichText::new(message)
                            .size(12.5)
                            .color(style::TEXT_SECONDARY),
                    );

                    ui.add_space(12.0);

                    ui.horizontal(|ui| {
                        ui.with_layout(
                            egui::Layout::right_to_left(egui::Align::Center),
                            |ui| {
                                if ui
                                    .add(
                                        egui::Button::new(
                                            egui::RichText::new("Delete")
                                                .color(egui::Color32::WHITE),
                                        )
                                        .fill(style::DANGER),
                                    )
                                    .clicked()
                                {
                                    result = ModalResult::ConfirmDelete { id: *id };
                                    close = true;
                                }

                                if ui.button("Cancel").clicked() {
                                    close = true;
                                }
                            },
                        );
                    });
                });

            if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
                close = true;
            }
            // Enter confirms unless a text field has keyboard focus.
            if ctx.input(|i| i.key_pressed(egui::Key::Enter)) && !ctx.wants_keyboard_input() {
                result = ModalResult::ConfirmDelete { id: *id };
                close = true;
            }
        }
    }

    if close {
        *modal = ModalState::None;
    }

    result
}

fn overlay(ctx: &egui::Context) {
    let overlay = egui::Area::new(egui::Id::new("modal_overlay"))
        .order(egui::Order::Foreground)
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(0.0, 0.0));

    overlay.show(ctx, |ui| {
        let screen = ctx.screen_rect();
        let (rect, _) = ui.allocate_exact_size(screen.size(), egui::Sense::click());
        ui.painter().rect_filled(
            rect,
            0.0,
            egui::Color32::from_rgba_unmultiplied(0, 0, 0, 115),
        );
    });
}

fn field_label(ui: &mut egui::Ui, label: &str) {
    ui.label(
        egui::RichText::new(label.to_uppercase())
            .size(10.0)
            .color(style::TEXT_TERTIARY)
            .strong(),
    );
}

fn field(ui: &mut egui::Ui, label: &str, value: &mut String, hint: &str) {
    field_label(ui, label);
    ui.add(
        egui::TextEdit::singleline(value)
            .hint_text(hint)
            .desired_width(f32::INFINITY),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_csv_fields_are_trimmed() {
        let draft = ProjectDraft {
            title: "  CLI tool  ".into(),
            description: "desc".into(),
            tags_input: " rust , cli ,, ".into(),
            github: "   ".into(),
            demo: " https://demo.test ".into(),
            ..Default::default()
        };
        let payload = draft.to_create();
        assert_eq!(payload.title, "CLI tool");
        assert_eq!(payload.tags, vec!["rust", "cli"]);
        assert_eq!(payload.github, None);
        assert_eq!(payload.demo, Some("https://demo.test".into()));
    }

    #[test]
    fn test_draft_validation_requires_title_and_description() {
        let mut draft = ProjectDraft::default();
        assert!(!draft.is_valid());
        draft.title = "CLI tool".into();
        assert!(!draft.is_valid());
        draft.description = "desc".into();
        assert!(draft.is_valid());
    }
}
