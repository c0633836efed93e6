//! jointdeck URDF viewer CLI.
//!
//! Opens a window, loads the first readable URDF from the source list, and
//! shows the robot with an orbit camera and a joint slider panel. All viewer
//! settings can come from a TOML config file, command-line flags, or both;
//! flags win.

use std::path::PathBuf;

use bevy::prelude::*;
use clap::Parser;

use jointdeck_core::{ColorSpec, ConfigError, ViewerConfig};
use jointdeck_viewer::JointdeckViewerPlugin;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Interactive URDF robot viewer.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// URDF source candidates, tried in order. Overrides sources from
    /// --config when both are given.
    sources: Vec<PathBuf>,

    /// TOML config file with the same settings as the flags below.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// package:// root, either NAME=PATH (repeatable) or a bare fallback
    /// PATH used for every package without a named entry.
    #[arg(short, long)]
    package: Vec<String>,

    /// Up axis of the robot description, e.g. +Z, -Y.
    #[arg(short, long, allow_hyphen_values = true)]
    up: Option<String>,

    /// Ambient light color as channel values, e.g. "0.4 0.4 0.4".
    #[arg(long)]
    ambient_color: Option<String>,

    /// Disable shadows and the ground plane that catches them.
    #[arg(long)]
    no_shadow: bool,

    /// Reapply joint poses every frame instead of only on change.
    #[arg(long)]
    auto_redraw: bool,

    /// Start without the joint side panel.
    #[arg(long)]
    hide_panel: bool,
}

/// Fold the config file (if any) and the flag overrides into one
/// [`ViewerConfig`], then validate it.
fn build_config(cli: &Cli) -> Result<ViewerConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => ViewerConfig::from_file(path)?,
        None => ViewerConfig::default(),
    };

    if !cli.sources.is_empty() {
        config.sources.clone_from(&cli.sources);
    }
    for entry in &cli.package {
        match entry.split_once('=') {
            Some((name, path)) => {
                config.packages.insert(name.into(), PathBuf::from(path));
            }
            None => config.package_root = Some(PathBuf::from(entry)),
        }
    }
    if let Some(up) = &cli.up {
        config.up = up.parse()?;
    }
    if let Some(color) = &cli.ambient_color {
        config.ambient_color = Some(ColorSpec::Text(color.clone()));
    }
    if cli.no_shadow {
        config.display_shadow = false;
    }
    if cli.auto_redraw {
        config.auto_redraw = true;
    }
    if cli.hide_panel {
        config.show_panel = false;
    }

    config.validate()?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

/// Window title showing which model the viewer is trying first.
fn window_title(config: &ViewerConfig) -> String {
    config
        .sources
        .first()
        .and_then(|p| p.file_name())
        .map_or_else(
            || "jointdeck".to_string(),
            |name| format!("jointdeck - {}", name.to_string_lossy()),
        )
}

fn main() {
    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: window_title(&config),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(config)
        .add_plugins(JointdeckViewerPlugin)
        .run();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
