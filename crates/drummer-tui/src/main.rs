mod action;
mod api;
mod app;
mod catalog;
mod component;
mod components;
mod core;
mod download;
mod edit;
mod focus;
mod notify;
mod progress;
mod submit;
mod theme;
mod widgets;

use std::sync::Arc;

use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = drummer_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let log_path = data_dir.join("drummer.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // RUST_LOG wins; otherwise keep HTTP client internals quiet.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    eprintln!("drummer log: {}", log_path.display());
    tracing::info!("drummer starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config = match drummer_proto::config::Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("config load failed, using defaults: {}", e);
            drummer_proto::config::Config::default()
        }
    };
    tracing::info!("backend: {}", config.server.base_url);

    // ── CoreEvent channel (background tasks → core) ──────────────────────────
    let (event_tx, event_rx) = mpsc::channel::<core::CoreEvent>(1024);

    let backend = api::HttpBackend::new(&config.server.base_url);
    let core = core::LibraryCore::new(
        Arc::new(backend),
        core::CoreSettings::from_config(&config),
        event_tx,
    );

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let result = app::App::new(core).run(event_rx).await;
    if let Err(ref e) = result {
        tracing::error!("app exited with error: {:#}", e);
    }
    result
}
