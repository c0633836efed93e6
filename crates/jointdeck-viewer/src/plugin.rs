//! The main viewer plugin.
//!
//! [`JointdeckViewerPlugin`] adds the orbit camera, egui joint panel,
//! ground plane, and the background URDF load pipeline to a Bevy app.

use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use bevy_panorbit_camera::PanOrbitCameraPlugin;

use jointdeck_core::ViewerConfig;

use crate::camera;
use crate::gate::ReadyGate;
use crate::loader::{self, MeshLoaders, RobotLoadFailed, RobotLoaded, ViewerStatus};
use crate::panel::{self, JointPanel};
use crate::spawner;
use crate::ui;

/// Bevy plugin for interactive URDF viewing.
///
/// Adds:
/// - Orbit camera (pan, zoom, rotate) that frames the robot once loaded
/// - egui side panel with load status and one slider per movable joint
/// - Ground plane with lighting
/// - Background URDF load with registration and load deadlines
///
/// Expects a [`ViewerConfig`] resource describing the URDF sources;
/// inserts a default (empty) one otherwise.
pub struct JointdeckViewerPlugin;

impl Plugin for JointdeckViewerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ViewerConfig>()
            .init_resource::<ViewerStatus>()
            .init_resource::<MeshLoaders>()
            .init_resource::<ReadyGate>()
            .init_resource::<JointPanel>()
            .add_event::<RobotLoaded>()
            .add_event::<RobotLoadFailed>()
            .add_plugins(EguiPlugin::default())
            .add_plugins(PanOrbitCameraPlugin)
            .add_systems(
                Startup,
                (
                    camera::spawn_camera,
                    camera::spawn_scene,
                    loader::register_viewer,
                    loader::begin_load,
                ),
            )
            .add_systems(
                Update,
                (
                    loader::drive_loader,
                    spawner::spawn_pending_robot,
                    panel::build_joint_panel,
                    camera::frame_camera,
                )
                    .chain(),
            )
            .add_systems(Update, (spawner::apply_joint_motion, ui::side_panel_system));
    }
}
