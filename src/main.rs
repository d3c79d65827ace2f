mod action;
mod app;
mod cli;
mod components;
mod config;
mod display;
mod event;
mod fetch;
mod git;
mod highlight;
mod logging;
mod state;
mod theme;
mod tui;

use anyhow::Result;
use clap::Parser;
use std::env;
use std::sync::Arc;

use crate::app::App;
use crate::cli::Cli;
use crate::event::EventReader;
use crate::git::{GitSource, RepoCache};
use crate::highlight::HighlightEngine;
use crate::state::ViewportState;

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restore so the user gets their shell back
        tui::restore();
        default_hook(panic_info);
    }));
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install().ok();
    install_panic_hook();

    let _cli = Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("hunkwatch: {e:#}");
        std::process::exit(1);
    }

    let cwd = env::current_dir()?;

    // Validate we're in a git work tree before launching the TUI
    let workdir = match RepoCache::open(&cwd) {
        Ok(repo) => repo.workdir().to_path_buf(),
        Err(e) => {
            tracing::info!("startup aborted: {e:#}");
            eprintln!("hunkwatch: not a git repository (or any of the parent directories)");
            std::process::exit(1);
        }
    };

    let config = config::load_config();
    tracing::info!(
        workdir = %workdir.display(),
        interval = ?config.refresh_interval,
        theme = %config.theme.name,
        "starting"
    );
    theme::init(config.theme.clone());

    let source = Arc::new(GitSource::new(
        &workdir,
        config.path_filter(),
        config.untracked,
    ));
    let viewport = ViewportState::new(Box::new(HighlightEngine::new()));
    let events = EventReader::new();
    let mut app = App::new(source, &events, viewport, config.refresh_interval);

    let mut terminal = match tui::init() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("hunkwatch: {e:#}");
            std::process::exit(1);
        }
    };
    let result = app.run(&mut terminal, events).await;
    tui::restore();

    if let Err(ref e) = result {
        eprintln!("hunkwatch: {e:#}");
    }

    result
}
