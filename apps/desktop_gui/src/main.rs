use std::path::PathBuf;

use clap::Parser;
use client_core::{
    config::load_settings, session::open_history_store_or_warn, AskClient, ClassificationTable,
    QuestionForm,
};
use crossbeam_channel::bounded;
use eframe::egui;
use shared::domain::{Catalog, History};
use tracing_subscriber::EnvFilter;

mod backend_bridge;
mod controller;
mod ui;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::CurioNestApp;

#[derive(Parser, Debug)]
#[command(name = "curionest-gui")]
struct Args {
    /// Base url of the answering service.
    #[arg(long)]
    api_url: Option<String>,
    /// Directory holding the persisted history record.
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Keep history in memory only.
    #[arg(long)]
    no_history: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut settings = load_settings();
    if let Some(url) = &args.api_url {
        settings.set_api_base_url(url)?;
    }
    if let Some(dir) = args.data_dir {
        settings.data_dir = Some(dir);
    }
    if args.no_history {
        settings.persist_history = false;
    }

    let mut history_store = open_history_store_or_warn(&settings);
    let history = history_store
        .as_mut()
        .map(|store| store.load())
        .unwrap_or_else(History::default);
    let form = QuestionForm::new(
        Catalog::default(),
        ClassificationTable::with_duplicate_trigger(&settings.duplicate_marker),
    )
    .with_history(history);

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(16);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("CurioNest")
            .with_inner_size([720.0, 760.0])
            .with_min_inner_size([480.0, 520.0]),
        ..Default::default()
    };
    let server_url = settings.api_base_url.clone();
    let client = AskClient::from_settings(&settings);
    let tick = settings.thinking_tick();

    eframe::run_native(
        "CurioNest",
        options,
        Box::new(move |cc| {
            let repaint_ctx = cc.egui_ctx.clone();
            backend_bridge::runtime::launch(client, tick, cmd_rx, ui_tx, move || {
                repaint_ctx.request_repaint()
            });
            Ok(Box::new(CurioNestApp::new(
                form,
                cmd_tx,
                ui_rx,
                history_store,
                server_url,
            )))
        }),
    )
    .map_err(|err| anyhow::anyhow!("desktop gui failed: {err}"))
}
