//! Interactive URDF viewing for jointdeck.
//!
//! `jointdeck-viewer` provides a windowed Bevy application with:
//! - Orbit camera that frames the loaded robot
//! - egui side panel with load status and joint sliders
//! - Background URDF loading with a source fallback chain
//! - Registration and load deadlines surfaced as status text
//!
//! # Usage
//!
//! ```no_run
//! use bevy::prelude::*;
//! use jointdeck_core::ViewerConfig;
//! use jointdeck_viewer::JointdeckViewerPlugin;
//!
//! let config = ViewerConfig {
//!     sources: vec!["robot.urdf".into()],
//!     ..Default::default()
//! };
//!
//! App::new()
//!     .add_plugins(DefaultPlugins)
//!     .insert_resource(config)
//!     .add_plugins(JointdeckViewerPlugin)
//!     .run();
//! ```

pub mod camera;
pub mod error;
pub mod gate;
pub mod loader;
pub mod panel;
pub mod plugin;
pub mod spawner;
pub mod ui;

pub use error::ViewerError;
pub use gate::ReadyGate;
pub use loader::ViewerStatus;
pub use plugin::JointdeckViewerPlugin;
pub use spawner::SpawnedRobot;
