use eframe::egui;

use crate::model::{Project, SocialLink};

use super::project_grid::{self, GridAction};
use super::style;

pub enum HomeAction {
    None,
    Open(i64),
    ViewAll,
}

/// Landing page: hero strip plus a teaser grid of the first six projects.
pub fn home(
    ui: &mut egui::Ui,
    owner_name: &str,
    owner_tagline: &str,
    projects: &[Project],
) -> HomeAction {
    let mut action = HomeAction::None;

    ui.add_space(24.0);
    ui.vertical_centered(|ui| {
        ui.label(
            egui::RichText::new(format!("Hi, I'm {}", owner_name))
                .size(28.0)
                .color(style::TEXT_PRIMARY)
                .strong(),
        );
        ui.label(
            egui::RichText::new(owner_tagline)
                .size(14.0)
                .color(style::TEXT_SECONDARY),
        );
    });
    ui.add_space(24.0);

    ui.label(
        egui::RichText::new("FEATURED WORK")
            .size(11.0)
            .color(style::TEXT_TERTIARY)
            .strong(),
    );
    ui.add_space(8.0);

    let teaser: Vec<&Project> = projects.iter().take(6).collect();
    if let GridAction::Open(id) = project_grid::show(ui, &teaser) {
        action = HomeAction::Open(id);
    }

    ui.add_space(12.0);
    ui.vertical_centered(|ui| {
        if ui
            .add(
                egui::Button::new(
                    egui::RichText::new("View all projects").color(egui::Color32::BLACK),
                )
                .fill(style::ACCENT),
            )
            .clicked()
        {
            action = HomeAction::ViewAll;
        }
    });

    action
}

pub fn about(ui: &mut egui::Ui, owner_name: &str, owner_tagline: &str) {
    ui.add_space(24.0);
    ui.label(
        egui::RichText::new("About")
            .size(22.0)
            .color(style::TEXT_PRIMARY)
            .strong(),
    );
    ui.add_space(8.0);
    ui.label(
        egui::RichText::new(format!(
            "{} \u{2014} {}",
            owner_name, owner_tagline
        ))
        .size(13.0)
        .color(style::TEXT_SECONDARY),
    );
    ui.add_space(8.0);
    ui.label(
        egui::RichText::new(
            "I build software for the web, mobile and games. Browse the projects \
             page for a closer look at what I have been working on, or use the \
             contact page to get in touch.",
        )
        .size(13.0)
        .color(style::TEXT_SECONDARY),
    );
}

#[derive(Default)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactDraft {
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.email.trim().is_empty()
            && !self.message.trim().is_empty()
    }
}

pub enum ContactAction {
    None,
    Send,
    OpenLink(String),
}

pub fn contact(
    ui: &mut egui::Ui,
    contact_email: &str,
    draft: &mut ContactDraft,
    socials: &[SocialLink],
) -> ContactAction {
    let mut action = ContactAction::None;

    ui.add_space(24.0);
    ui.label(
        egui::RichText::new("Get in touch")
            .size(22.0)
            .color(style::TEXT_PRIMARY)
            .strong(),
    );
    if !contact_email.is_empty() {
        ui.label(
            egui::RichText::new(contact_email)
                .size(12.0)
                .color(style::TEXT_TERTIARY),
        );
    }
    ui.add_space(12.0);

    ui.label(
        egui::RichText::new("NAME")
            .size(10.0)
            .color(style::TEXT_TERTIARY)
            .strong(),
    );
    ui.add(
        egui::TextEdit::singleline(&mut draft.name)
            .hint_text("Your name")
            .desired_width(360.0),
    );
    ui.add_space(6.0);

    ui.label(
        egui::RichText::new("EMAIL")
            .size(10.0)
            .color(style::TEXT_TERTIARY)
            .strong(),
    );
    ui.add(
        egui::TextEdit::singleline(&mut draft.email)
            .hint_text("you@example.com")
            .desired_width(360.0),
    );
    ui.add_space(6.0);

    ui.label(
        egui::RichText::new("MESSAGE")
            .size(10.0)
            .color(style::TEXT_TERTIARY)
            .strong(),
    );
    ui.add(
        egui::TextEdit::multiline(&mut draft.message)
            .hint_text("What can I help with?")
            .desired_rows(4)
            .desired_width(360.0),
    );
    ui.add_space(10.0);

    let send = egui::Button::new(
        egui::RichText::new("Send message").color(egui::Color32::BLACK),
    )
    .fill(style::ACCENT);
    if ui.add_enabled(draft.is_complete(), send).clicked() {
        action = ContactAction::Send;
    }

    if !socials.is_empty() {
        ui.add_space(20.0);
        ui.label(
            egui::RichText::new("ELSEWHERE")
                .size(10.0)
                .color(style::TEXT_TERTIARY)
                .strong(),
        );
        ui.add_space(4.0);
        for link in socials {
            let label = format!("{} \u{2197}", link.name);
            if ui
                .add(
                    egui::Button::new(
                        egui::RichText::new(label).size(12.0).color(style::ACCENT),
                    )
                    .frame(false),
                )
                .clicked()
            {
                action = ContactAction::OpenLink(link.url.clone());
            }
        }
    }

    action
}
