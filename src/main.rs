#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use log::warn;
use mimalloc::MiMalloc;
use tokio::sync::Mutex;

use folio_lib::api::client::ApiClient;
use folio_lib::api::statics::StaticCatalog;
use folio_lib::api::store::ProjectStore;
use folio_lib::api::ProjectsApi;
use folio_lib::config;
use folio_lib::ui::FolioApp;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn get_app_data_dir() -> std::path::PathBuf {
    let base = std::env::var("APPDATA")
        .or_else(|_| std::env::var("XDG_DATA_HOME"))
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            format!("{}/.local/share", home)
        });
    std::path::PathBuf::from(base).join("folio")
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // ── Config ──
    let data_dir = get_app_data_dir();
    std::fs::create_dir_all(&data_dir).ok();
    let config_path = data_dir.join("config.json");
    let mut config = config::load_config(&config_path);
    config.apply_env_overrides();

    // ── Tokio runtime ──
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // ── API client and static catalogue ──
    let client = ApiClient::new(&config.api_base_url)?;
    let catalog = Arc::new(StaticCatalog::new(client.clone()));

    // ── Mock store, seeded from the catalogue when it is reachable ──
    let latency = Duration::from_millis(config.simulated_latency_ms);
    let mut store = ProjectStore::new(data_dir.join("custom_projects.json"), latency);
    runtime.block_on(async {
        match catalog.projects().await {
            Ok(projects) => store.seed(&projects),
            Err(e) => warn!("seeding skipped, catalogue unreachable: {}", e),
        }
    });
    let store = Arc::new(Mutex::new(store));

    // ── Backend selection ──
    let api = runtime.block_on(ProjectsApi::select(&config, store, client));
    let api = Arc::new(api);

    // ── eframe window ──
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 780.0])
            .with_min_inner_size([760.0, 520.0])
            .with_title("Folio"),
        ..Default::default()
    };

    let rt_handle = runtime.handle().clone();

    eframe::run_native(
        "Folio",
        options,
        Box::new(move |cc| {
            Ok(Box::new(FolioApp::new(cc, &config, catalog, api, rt_handle)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("failed to run eframe application: {}", e))
}
