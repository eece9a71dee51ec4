pub mod dashboard;
pub mod detail;
pub mod header;
pub mod modal;
pub mod pages;
pub mod project_grid;
pub mod search_bar;
pub mod status_bar;
pub mod style;

use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui;
use log::{info, warn};
use tokio::runtime::Handle;

use crate::api::statics::StaticCatalog;
use crate::api::store::StoreStats;
use crate::api::ProjectsApi;
use crate::config::Config;
use crate::error::ApiResult;
use crate::filter::{Pagination, ProjectFilter};
use crate::model::{
    Page as Listing, Project, ProjectDetail, ProjectQuery, SocialLink, StoredProject,
};
use crate::nav::{self, SessionStore};

use dashboard::{DashboardAction, DashboardQuery};
use detail::DetailAction;
use modal::{ModalResult, ModalState};
use pages::{ContactAction, ContactDraft, HomeAction};
use project_grid::GridAction;
use status_bar::ToastKind;

const STATUS_LINGER: Duration = Duration::from_secs(4);
const DASH_PAGE_SIZE: usize = 10;

#[derive(Clone, Debug, PartialEq)]
pub enum Page {
    Home,
    About,
    Projects,
    ProjectDetails(i64),
    Contact,
    Dashboard,
}

/// Completion messages from background tasks, drained each frame.
enum AsyncResponse {
    Projects {
        generation: u64,
        result: ApiResult<Vec<Project>>,
    },
    Detail {
        id: i64,
        result: ApiResult<ProjectDetail>,
    },
    Socials(ApiResult<Vec<SocialLink>>),
    DashboardList {
        generation: u64,
        result: ApiResult<Listing<StoredProject>>,
    },
    Stats(Option<StoreStats>),
    EntrySaved(ApiResult<StoredProject>),
    EntryDeleted(ApiResult<i64>),
}

pub struct FolioApp {
    page: Page,

    // Catalogue listing shared by Home and Projects.
    projects: Vec<Project>,
    projects_loading: bool,
    projects_error: Option<String>,
    fetch_generation: u64,

    filter: ProjectFilter,
    pagination: Pagination,
    session: SessionStore,
    pending_scroll: Option<f32>,
    pending_anchor: Option<i64>,
    current_scroll: f32,

    detail: Option<ProjectDetail>,
    detail_loading: bool,
    detail_error: Option<String>,

    socials: Vec<SocialLink>,
    contact_draft: ContactDraft,

    dash_listing: Option<Listing<StoredProject>>,
    dash_stats: Option<StoreStats>,
    dash_query: DashboardQuery,
    dash_loading: bool,
    dash_generation: u64,

    modal: ModalState,
    status: String,
    status_kind: ToastKind,
    status_clear_at: Option<Instant>,

    async_tx: mpsc::Sender<AsyncResponse>,
    async_rx: mpsc::Receiver<AsyncResponse>,

    catalog: Arc<StaticCatalog>,
    api: Arc<ProjectsApi>,
    runtime: Handle,

    owner_name: String,
    owner_tagline: String,
    contact_email: String,
}

impl FolioApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: &Config,
        catalog: Arc<StaticCatalog>,
        api: Arc<ProjectsApi>,
        runtime: Handle,
    ) -> Self {
        style::apply(&cc.egui_ctx);

        let (async_tx, async_rx) = mpsc::channel();

        let mut app = Self {
            page: Page::Home,
            projects: Vec::new(),
            projects_loading: false,
            projects_error: None,
            fetch_generation: 0,
            filter: ProjectFilter::new(),
            pagination: Pagination::new(),
            session: SessionStore::new(),
            pending_scroll: None,
            pending_anchor: None,
            current_scroll: 0.0,
            detail: None,
            detail_loading: false,
            detail_error: None,
            socials: Vec::new(),
            contact_draft: ContactDraft::default(),
            dash_listing: None,
            dash_stats: None,
            dash_query: DashboardQuery::default(),
            dash_loading: false,
            dash_generation: 0,
            modal: ModalState::None,
            status: String::new(),
            status_kind: ToastKind::Info,
            status_clear_at: None,
            async_tx,
            async_rx,
            catalog,
            api,
            runtime,
            owner_name: config.owner_name.clone(),
            owner_tagline: config.owner_tagline.clone(),
            contact_email: config.contact_email.clone(),
        };

        app.fetch_projects();
        app.fetch_socials();
        app
    }

    // ── Background fetches ──

    fn fetch_projects(&mut self) {
        self.fetch_generation += 1;
        let generation = self.fetch_generation;
        self.projects_loading = true;
        self.projects_error = None;

        let catalog = Arc::clone(&self.catalog);
        let tx = self.async_tx.clone();
        self.runtime.spawn(async move {
            let result = catalog.projects().await;
            let _ = tx.send(AsyncResponse::Projects { generation, result });
        });
    }

    fn fetch_detail(&mut self, id: i64) {
        self.detail = None;
        self.detail_error = None;
        self.detail_loading = true;

        let catalog = Arc::clone(&self.catalog);
        let tx = self.async_tx.clone();
        self.runtime.spawn(async move {
            let result = catalog.project_detail(id).await;
            let _ = tx.send(AsyncResponse::Detail { id, result });
        });
    }

    fn fetch_socials(&mut self) {
        let catalog = Arc::clone(&self.catalog);
        let tx = self.async_tx.clone();
        self.runtime.spawn(async move {
            let result = catalog.social_links().await;
            let _ = tx.send(AsyncResponse::Socials(result));
        });
    }

    fn fetch_dashboard(&mut self) {
        self.dash_generation += 1;
        let generation = self.dash_generation;
        self.dash_loading = true;

        let query = ProjectQuery {
            search: (!self.dash_query.search.trim().is_empty())
                .then(|| self.dash_query.search.trim().to_string()),
            status: self.dash_query.status,
            tags: Vec::new(),
            sort_key: self.dash_query.sort_key,
            sort_order: self.dash_query.sort_order,
            page: self.dash_query.page,
            limit: DASH_PAGE_SIZE,
        };

        let api = Arc::clone(&self.api);
        let tx = self.async_tx.clone();
        self.runtime.spawn(async move {
            let result = api.list(&query).await;
            let _ = tx.send(AsyncResponse::DashboardList { generation, result });
            let stats = api.stats().await;
            let _ = tx.send(AsyncResponse::Stats(stats));
        });
    }

    fn save_entry(&mut self, id: Option<i64>, draft: modal::ProjectDraft) {
        let api = Arc::clone(&self.api);
        let tx = self.async_tx.clone();
        self.runtime.spawn(async move {
            let result = match id {
                Some(id) => api.update(id, draft.to_update()).await,
                None => api.create(draft.to_create()).await,
            };
            let _ = tx.send(AsyncResponse::EntrySaved(result));
        });
    }

    fn delete_entry(&mut self, id: i64) {
        let api = Arc::clone(&self.api);
        let tx = self.async_tx.clone();
        self.runtime.spawn(async move {
            let result = api.delete(id).await;
            let _ = tx.send(AsyncResponse::EntryDeleted(result));
        });
    }

    fn poll_responses(&mut self) {
        while let Ok(response) = self.async_rx.try_recv() {
            match response {
                AsyncResponse::Projects { generation, result } => {
                    if generation != self.fetch_generation {
                        continue; // stale fetch, a newer one is in flight
                    }
                    self.projects_loading = false;
                    match result {
                        Ok(projects) => {
                            info!("loaded {} projects", projects.len());
                            self.projects = projects;
                        }
                        Err(e) => self.projects_error = Some(e.to_string()),
                    }
                }
                AsyncResponse::Detail { id, result } => {
                    // Only apply if we are still looking at that project.
                    if self.page != Page::ProjectDetails(id) {
                        continue;
                    }
                    self.detail_loading = false;
                    match result {
                        Ok(detail) => self.detail = Some(detail),
                        Err(e) => self.detail_error = Some(e.to_string()),
                    }
                }
                AsyncResponse::Socials(result) => match result {
                    Ok(socials) => self.socials = socials,
                    Err(e) => warn!("social links unavailable: {}", e),
                },
                AsyncResponse::DashboardList { generation, result } => {
                    if generation != self.dash_generation {
                        continue;
                    }
                    self.dash_loading = false;
                    match result {
                        Ok(listing) => self.dash_listing = Some(listing),
                        Err(e) => self.set_status(e.to_string(), ToastKind::Error),
                    }
                }
                AsyncResponse::Stats(stats) => self.dash_stats = stats,
                AsyncResponse::EntrySaved(result) => match result {
                    Ok(entry) => {
                        self.set_status(
                            format!("Saved \"{}\"", entry.title),
                            ToastKind::Success,
                        );
                        self.fetch_dashboard();
                    }
                    Err(e) => self.set_status(e.to_string(), ToastKind::Error),
                },
                AsyncResponse::EntryDeleted(result) => match result {
                    Ok(id) => {
                        self.set_status(format!("Deleted project #{}", id), ToastKind::Success);
                        self.fetch_dashboard();
                    }
                    Err(e) => self.set_status(e.to_string(), ToastKind::Error),
                },
            }
        }
    }

    // ── Navigation ──

    fn navigate(&mut self, to: Page) {
        if self.page == to {
            return;
        }

        // Leaving the listing: snapshot filter, window and scroll position.
        if self.page == Page::Projects {
            nav::snapshot_list(
                &mut self.session,
                &self.filter,
                &self.pagination,
                self.current_scroll,
            );
        }

        match &to {
            Page::Projects => {
                self.pending_scroll =
                    nav::restore_list(&mut self.session, &mut self.filter, &mut self.pagination);
                self.pending_anchor = nav::take_last_viewed(&mut self.session);
                if self.projects.is_empty() && !self.projects_loading {
                    self.fetch_projects();
                }
            }
            Page::ProjectDetails(id) => {
                nav::save_last_viewed(&mut self.session, *id);
                self.fetch_detail(*id);
            }
            Page::Dashboard => {
                self.fetch_dashboard();
            }
            Page::Home => {
                if self.projects.is_empty() && !self.projects_loading {
                    self.fetch_projects();
                }
            }
            _ => {}
        }

        self.page = to;
    }

    fn set_status(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.status = message.into();
        self.status_kind = kind;
        self.status_clear_at = Some(Instant::now() + STATUS_LINGER);
    }

    fn open_link(&mut self, url: &str) {
        if let Err(e) = open::that(url) {
            warn!("failed to open {}: {}", url, e);
            self.set_status("Could not open link", ToastKind::Error);
        }
    }

    // ── Page bodies ──

    fn show_projects(&mut self, ui: &mut egui::Ui) {
        ui.add_space(12.0);
        ui.label(
            egui::RichText::new("Projects")
                .size(22.0)
                .color(style::TEXT_PRIMARY)
                .strong(),
        );
        ui.add_space(8.0);

        let branches = ProjectFilter::branches(&self.projects);
        let is_filtering = self.filter.is_active();
        let change = search_bar::show(
            ui,
            &mut self.filter.query,
            &mut self.filter.branch,
            &branches,
            is_filtering,
        );
        if change.query_edited {
            self.filter.note_edit(Instant::now());
        }
        if change.branch_changed {
            self.pagination.reset();
        }
        if change.reset {
            self.filter.reset();
            self.pagination.reset();
        }
        ui.add_space(10.0);

        if self.projects_loading {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.spinner();
                ui.label(
                    egui::RichText::new("Loading projects...")
                        .size(12.0)
                        .color(style::TEXT_TERTIARY),
                );
            });
            return;
        }

        if let Some(error) = self.projects_error.clone() {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.label(egui::RichText::new(error).size(13.0).color(style::DANGER));
                ui.add_space(8.0);
                if ui.button("Retry").clicked() {
                    self.fetch_projects();
                }
            });
            return;
        }

        let filtered = self.filter.apply(&self.projects);

        // A card opened from the listing is scrolled back into view on return,
        // widening the visible window if needed.
        if let Some(anchor) = self.pending_anchor.take() {
            if let Some(index) = filtered.iter().position(|p| p.id == anchor) {
                self.pagination.ensure_visible(index);
            }
        }

        if filtered.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.label(
                    egui::RichText::new("No projects match your search.")
                        .size(13.0)
                        .color(style::TEXT_TERTIARY),
                );
            });
            return;
        }

        let visible = self.pagination.slice(&filtered);
        let has_more = self.pagination.has_more(filtered.len());

        let mut scroll = egui::ScrollArea::vertical().id_salt("projects_scroll");
        if let Some(offset) = self.pending_scroll.take() {
            scroll = scroll.vertical_scroll_offset(offset);
        }

        let mut open_id = None;
        let mut load_more = false;
        let output = scroll.show(ui, |ui| {
            if let GridAction::Open(id) = project_grid::show(ui, visible) {
                open_id = Some(id);
            }

            if has_more {
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    let label = format!(
                        "Load more ({} of {})",
                        visible.len(),
                        filtered.len()
                    );
                    if ui.button(label).clicked() {
                        load_more = true;
                    }
                });
            }
            ui.add_space(16.0);
        });
        self.current_scroll = output.state.offset.y;

        if load_more {
            self.pagination.load_more();
        }
        if let Some(id) = open_id {
            self.navigate(Page::ProjectDetails(id));
        }
    }

    fn show_detail(&mut self, ui: &mut egui::Ui) {
        ui.add_space(12.0);

        if self.detail_loading {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.spinner();
            });
            return;
        }

        if let Some(error) = self.detail_error.clone() {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.label(egui::RichText::new(error).size(13.0).color(style::DANGER));
                ui.add_space(8.0);
                if ui.button("Back to projects").clicked() {
                    self.navigate(Page::Projects);
                }
            });
            return;
        }

        let Some(project_detail) = self.detail.clone() else {
            return;
        };
        let action = egui::ScrollArea::vertical()
            .id_salt("detail_scroll")
            .show(ui, |ui| detail::show(ui, &project_detail))
            .inner;

        match action {
            DetailAction::Back => self.navigate(Page::Projects),
            DetailAction::OpenLink(url) => self.open_link(&url),
            DetailAction::None => {}
        }
    }

    fn show_dashboard(&mut self, ui: &mut egui::Ui) {
        let branch_count = ProjectFilter::branches(&self.projects).len();
        let action = egui::ScrollArea::vertical()
            .id_salt("dashboard_scroll")
            .show(ui, |ui| {
                dashboard::show(
                    ui,
                    self.dash_stats.as_ref(),
                    branch_count,
                    self.dash_listing.as_ref(),
                    &mut self.dash_query,
                    self.dash_loading,
                )
            })
            .inner;

        match action {
            DashboardAction::Add => {
                self.modal = ModalState::EditProject {
                    id: None,
                    draft: modal::ProjectDraft::default(),
                };
            }
            DashboardAction::Edit(id) => {
                let entry = self
                    .dash_listing
                    .as_ref()
                    .and_then(|l| l.items.iter().find(|e| e.id == id));
                if let Some(entry) = entry {
                    self.modal = ModalState::EditProject {
                        id: Some(id),
                        draft: modal::ProjectDraft::from_entry(entry),
                    };
                }
            }
            DashboardAction::Delete(id) => {
                let entry = self
                    .dash_listing
                    .as_ref()
                    .and_then(|l| l.items.iter().find(|e| e.id == id));
                if let Some(entry) = entry {
                    self.modal = ModalState::ConfirmDelete {
                        id,
                        title: entry.title.clone(),
                        provenance: entry.provenance,
                    };
                }
            }
            DashboardAction::Refresh | DashboardAction::QueryChanged => {
                self.fetch_dashboard();
            }
            DashboardAction::None => {}
        }
    }
}

impl eframe::App for FolioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_responses();

        nav::tick_list(&mut self.filter, &mut self.pagination, Instant::now());

        if let Some(clear_at) = self.status_clear_at {
            if Instant::now() >= clear_at {
                self.status.clear();
                self.status_clear_at = None;
            }
        }

        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::new().fill(style::PANEL_BG))
            .show(ctx, |ui| {
                if let Some(page) = header::show(ui, &self.owner_name, &self.page) {
                    self.navigate(page);
                }
            });

        let (shown, total) = if self.page == Page::Projects {
            let filtered_len = self.filter.apply(&self.projects).len();
            (self.pagination.visible().min(filtered_len), filtered_len)
        } else {
            (0, 0)
        };
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            status_bar::show(
                ui,
                self.api.backend_label(),
                &self.status,
                self.status_kind,
                shown,
                total,
            );
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let inner = egui::Frame::new().inner_margin(egui::Margin {
                left: 24,
                right: 24,
                top: 0,
                bottom: 0,
            });
            inner.show(ui, |ui| match self.page.clone() {
                Page::Home => {
                    match pages::home(ui, &self.owner_name, &self.owner_tagline, &self.projects)
                    {
                        HomeAction::Open(id) => self.navigate(Page::ProjectDetails(id)),
                        HomeAction::ViewAll => self.navigate(Page::Projects),
                        HomeAction::None => {}
                    }
                }
                Page::About => pages::about(ui, &self.owner_name, &self.owner_tagline),
                Page::Projects => self.show_projects(ui),
                Page::ProjectDetails(_) => self.show_detail(ui),
                Page::Contact => {
                    match pages::contact(
                        ui,
                        &self.contact_email,
                        &mut self.contact_draft,
                        &self.socials,
                    ) {
                        ContactAction::Send => {
                            self.contact_draft = ContactDraft::default();
                            self.set_status(
                                "Message sent, thank you!",
                                ToastKind::Success,
                            );
                        }
                        ContactAction::OpenLink(url) => self.open_link(&url),
                        ContactAction::None => {}
                    }
                }
                Page::Dashboard => self.show_dashboard(ui),
            });
        });

        match modal::show(ctx, &mut self.modal) {
            ModalResult::SaveProject { id, draft } => self.save_entry(id, draft),
            ModalResult::ConfirmDelete { id } => self.delete_entry(id),
            ModalResult::None => {}
        }

        // Keep ticking while a debounce, toast or background task is pending.
        ctx.request_repaint_after(Duration::from_millis(50));
    }
}
