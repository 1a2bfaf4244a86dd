use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scene_host::{InMemoryScene, InMemoryViews, ModuleRegistry, SceneNode, ViewSnapshot};
use serde::Serialize;
use shared::{
    domain::{EntityId, ModuleName},
    error::ErrorReport,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use view_sync::{
    load_settings, load_volume_by_path, preload_modules, select_module, AutoContour,
    InitializationSequencer, SceneReactor, Settings,
};

#[derive(Parser, Debug)]
#[command(name = "viewer-shell", about = "Volume viewer shell with synchronized slice and 3-D views")]
struct Cli {
    /// Settings file; `viewer.toml` in the working directory is used when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load volumes, apply default views, and print the resulting view state.
    Open {
        paths: Vec<String>,
        /// Run auto-contouring on the background volume after loading.
        #[arg(long)]
        contour: bool,
        /// Switch to this module once loading finishes.
        #[arg(long)]
        select: Option<String>,
    },
    /// Preload the required modules and list which ones are available.
    Modules,
}

#[derive(Debug, Serialize)]
struct SessionSummary {
    views: ViewSnapshot,
    background: Option<EntityId>,
    foreground: Vec<EntityId>,
    nodes: Vec<SceneNode>,
    preloaded: Vec<ModuleName>,
    current_module: Option<String>,
    errors: Vec<ErrorReport>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let settings = load_settings(cli.config.as_deref()).context("failed to load settings")?;

    match cli.command {
        Command::Open {
            paths,
            contour,
            select,
        } => {
            let summary = open(&settings, &paths, contour, select.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Modules => {
            let mut modules = ModuleRegistry::standard();
            let loaded = preload_modules(&mut modules, &settings.required_modules);
            println!("{}", serde_json::to_string_pretty(&loaded)?);
        }
    }

    Ok(())
}

fn open(
    settings: &Settings,
    paths: &[String],
    contour: bool,
    select: Option<&str>,
) -> Result<SessionSummary> {
    let mut scene = InMemoryScene::new();
    let mut modules = ModuleRegistry::standard();
    let mut errors = Vec::new();

    let preloaded = preload_modules(&mut modules, &settings.required_modules);

    let mut reactor = SceneReactor::new(InMemoryViews::new(settings.slice_views.clone()))
        .with_foreground_opacity(settings.foreground_opacity);
    InitializationSequencer::new(settings.startup_layout)
        .run(&scene, &mut reactor)
        .context("failed to apply startup view defaults")?;
    reactor.attach(&mut scene);

    for raw in paths {
        match load_volume_by_path(&mut scene, raw) {
            Ok(volume) => info!(volume = %volume.id, name = %volume.name, "opened"),
            Err(err) => {
                warn!(path = %raw, error = %err, "volume not loaded");
                errors.push(ErrorReport::from(err));
            }
        }
        reactor.process_pending(&mut scene);
    }

    if contour {
        match reactor.ledger().background().cloned() {
            Some(volume_id) => {
                let auto_contour =
                    AutoContour::default().with_name_suffix(settings.auto_contour_suffix.clone());
                match auto_contour.run(&mut scene, &volume_id) {
                    Ok(Some(segmentation)) => info!(%segmentation, "auto-contour finished"),
                    Ok(None) => info!(volume = %volume_id, "volume has no image data to contour"),
                    Err(err) => errors.push(ErrorReport::new(err.category(), err.to_string())),
                }
                reactor.process_pending(&mut scene);
            }
            None => warn!("no volume loaded; skipping auto-contour"),
        }
    }

    if let Some(name) = select {
        if let Err(err) = select_module(&mut modules, name) {
            warn!(module = name, error = %err, "module navigation unavailable");
            errors.push(ErrorReport::new(err.category(), err.to_string()));
        }
    }

    let ledger = reactor.ledger();
    let background = ledger.background().cloned();
    let mut foreground: Vec<EntityId> = ledger.assigned_foreground().iter().cloned().collect();
    foreground.sort();
    let views = reactor.registry().backend().snapshot();
    reactor.detach();

    Ok(SessionSummary {
        views,
        background,
        foreground,
        nodes: scene.nodes().to_vec(),
        preloaded,
        current_module: modules.current().map(str::to_string),
        errors,
    })
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
