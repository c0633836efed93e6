//! Camera and scene setup.
//!
//! Uses `bevy_panorbit_camera` for orbit controls. When a robot finishes
//! loading, the camera is re-aimed at its bounding box; until then (or if
//! the robot has no visuals) a fixed fallback vantage is used.

use bevy::prelude::*;
use bevy_panorbit_camera::PanOrbitCamera;

use jointdeck_core::ViewerConfig;

use crate::loader::RobotLoaded;
use crate::spawner::{RobotBounds, SpawnedRobot};

// Orbit distance relative to the largest side of the robot's bounds, and
// the per-axis share of that distance for the viewing offset.
const DISTANCE_FACTOR: f32 = 1.5;
const OFFSET_FACTOR: f32 = 0.7;

/// Fallback camera offset when there is nothing to frame.
const FALLBACK_OFFSET: Vec3 = Vec3::splat(2.0);

// ---------------------------------------------------------------------------
// Framing
// ---------------------------------------------------------------------------

/// An orbit camera pose: where to look from, at what.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrame {
    pub focus: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub radius: f32,
}

/// Compute the orbit pose that frames `bounds`.
///
/// The camera sits diagonally above the box center at a distance scaled by
/// the largest box side. Empty or degenerate bounds get the fallback pose
/// looking at the origin.
#[must_use]
pub fn frame_from_bounds(bounds: &RobotBounds) -> CameraFrame {
    if bounds.is_empty() || bounds.max_dimension() <= f32::EPSILON {
        return frame_toward(Vec3::ZERO, FALLBACK_OFFSET);
    }
    let distance = DISTANCE_FACTOR * bounds.max_dimension();
    frame_toward(bounds.center(), Vec3::splat(OFFSET_FACTOR * distance))
}

fn frame_toward(focus: Vec3, offset: Vec3) -> CameraFrame {
    let radius = offset.length();
    CameraFrame {
        focus,
        yaw: offset.x.atan2(offset.z),
        pitch: (offset.y / radius).asin(),
        radius,
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Spawn the orbit camera at the fallback vantage.
pub fn spawn_camera(mut commands: Commands) {
    let frame = frame_from_bounds(&RobotBounds::EMPTY);
    commands.spawn((
        Transform::from_translation(FALLBACK_OFFSET).looking_at(Vec3::ZERO, Vec3::Y),
        PanOrbitCamera {
            focus: frame.focus,
            yaw: Some(frame.yaw),
            pitch: Some(frame.pitch),
            radius: Some(frame.radius),
            ..default()
        },
        Camera3d::default(),
    ));
}

/// Spawn lighting and, when shadows are on, the ground plane that catches
/// them.
#[allow(clippy::needless_pass_by_value)]
pub fn spawn_scene(
    mut commands: Commands,
    config: Res<ViewerConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let ambient = config.ambient_color.as_ref().map_or(Color::WHITE, |spec| {
        let rgb = spec.resolve();
        Color::srgb_u8(rgb.r(), rgb.g(), rgb.b())
    });
    commands.insert_resource(AmbientLight {
        color: ambient,
        brightness: 200.0,
        ..default()
    });

    // Directional light (sun).
    commands.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: config.display_shadow,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -0.8, 0.4, 0.0)),
    ));

    // The ground exists to catch shadows; without them it only occludes.
    if config.display_shadow {
        commands.spawn((
            Mesh3d(meshes.add(Plane3d::new(Vec3::Y, Vec2::splat(10.0)))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.35, 0.38, 0.35),
                ..default()
            })),
        ));
    }
}

/// Re-aim the orbit camera at the robot once it loads.
#[allow(clippy::needless_pass_by_value)]
pub fn frame_camera(
    mut events: EventReader<RobotLoaded>,
    robot: Option<Res<SpawnedRobot>>,
    mut cameras: Query<&mut PanOrbitCamera>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();
    let Some(robot) = robot else {
        return;
    };

    let frame = frame_from_bounds(&robot.bounds);
    for mut camera in &mut cameras {
        camera.focus = frame.focus;
        camera.target_focus = frame.focus;
        camera.yaw = Some(frame.yaw);
        camera.target_yaw = frame.yaw;
        camera.pitch = Some(frame.pitch);
        camera.target_pitch = frame.pitch;
        camera.radius = Some(frame.radius);
        camera.target_radius = frame.radius;
        camera.force_update = true;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use jointdeck_core::ColorSpec;
    use std::f32::consts::FRAC_PI_4;

    // -- frame_from_bounds --

    #[test]
    fn empty_bounds_use_fallback_vantage() {
        let frame = frame_from_bounds(&RobotBounds::EMPTY);
        assert_eq!(frame.focus, Vec3::ZERO);
        assert_relative_eq!(frame.radius, FALLBACK_OFFSET.length(), epsilon = 1e-5);
        assert_relative_eq!(frame.yaw, FRAC_PI_4, epsilon = 1e-5);
    }

    #[test]
    fn degenerate_bounds_use_fallback_vantage() {
        let mut bounds = RobotBounds::EMPTY;
        bounds.include_point(Vec3::new(1.0, 2.0, 3.0));
        let frame = frame_from_bounds(&bounds);
        assert_eq!(frame.focus, Vec3::ZERO);
    }

    #[test]
    fn frame_centers_on_bounds() {
        let mut bounds = RobotBounds::EMPTY;
        bounds.include_point(Vec3::new(-1.0, -1.0, -1.0));
        bounds.include_point(Vec3::new(1.0, 1.0, 3.0));

        let frame = frame_from_bounds(&bounds);
        assert_eq!(frame.focus, Vec3::new(0.0, 0.0, 1.0));

        // max side 4 → distance 6 → diagonal offset 4.2 per axis.
        let expected_radius = Vec3::splat(0.7 * 6.0).length();
        assert_relative_eq!(frame.radius, expected_radius, epsilon = 1e-5);
        assert_relative_eq!(frame.yaw, FRAC_PI_4, epsilon = 1e-5);
        // Diagonal offset pitches up by asin(1/sqrt(3)).
        assert_relative_eq!(frame.pitch, (1.0_f32 / 3.0_f32.sqrt()).asin(), epsilon = 1e-5);
    }

    #[test]
    fn radius_scales_with_robot_size() {
        let mut small = RobotBounds::EMPTY;
        small.include_point(Vec3::splat(-0.1));
        small.include_point(Vec3::splat(0.1));

        let mut large = RobotBounds::EMPTY;
        large.include_point(Vec3::splat(-1.0));
        large.include_point(Vec3::splat(1.0));

        let small_frame = frame_from_bounds(&small);
        let large_frame = frame_from_bounds(&large);
        assert_relative_eq!(large_frame.radius, small_frame.radius * 10.0, epsilon = 1e-5);
    }

    // -- spawn_scene --

    fn scene_app(config: ViewerConfig) -> App {
        let mut app = App::new();
        app.insert_resource(Assets::<Mesh>::default())
            .insert_resource(Assets::<StandardMaterial>::default())
            .insert_resource(config)
            .add_systems(Update, spawn_scene);
        app.update();
        app
    }

    #[test]
    fn scene_has_ground_when_shadows_enabled() {
        let mut app = scene_app(ViewerConfig::default());

        let lights = app
            .world_mut()
            .query::<&DirectionalLight>()
            .iter(app.world())
            .count();
        assert_eq!(lights, 1);

        let ground = app
            .world_mut()
            .query::<&Mesh3d>()
            .iter(app.world())
            .count();
        assert_eq!(ground, 1);
    }

    #[test]
    fn scene_skips_ground_without_shadows() {
        let config = ViewerConfig {
            display_shadow: false,
            ..ViewerConfig::default()
        };
        let mut app = scene_app(config);

        let ground = app
            .world_mut()
            .query::<&Mesh3d>()
            .iter(app.world())
            .count();
        assert_eq!(ground, 0);

        let light = app
            .world_mut()
            .query::<&DirectionalLight>()
            .single(app.world())
            .unwrap();
        assert!(!light.shadows_enabled);
    }

    #[test]
    fn ambient_light_uses_configured_color() {
        let config = ViewerConfig {
            ambient_color: Some(ColorSpec::Text("1 0 0".into())),
            ..ViewerConfig::default()
        };
        let app = scene_app(config);

        let ambient = app.world().resource::<AmbientLight>();
        assert_eq!(ambient.color, Color::srgb_u8(255, 0, 0));
    }

    #[test]
    fn ambient_light_defaults_to_white() {
        let app = scene_app(ViewerConfig::default());
        let ambient = app.world().resource::<AmbientLight>();
        assert_eq!(ambient.color, Color::WHITE);
    }
}
