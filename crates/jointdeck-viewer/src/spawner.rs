//! Bevy entity spawning from a loaded robot.
//!
//! The URDF kinematic tree maps directly onto the entity hierarchy: the
//! root entity carries the up-axis correction, each link hangs under its
//! parent joint (or the root), visuals hang under their link, and each
//! joint entity owns the [`Transform`] that [`apply_joint_motion`] rewrites
//! when its [`JointValue`] changes.
//!
//! Joint state lives in [`JointValue`] and is only mutated through its
//! setter; nothing in the render path writes joint values back.

use std::collections::{HashMap, HashSet};
use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;

use jointdeck_core::color::DEFAULT_COLOR;
use jointdeck_core::{UpAxis, ViewerConfig};
use jointdeck_urdf::{Geometry, JointKind, JointLimits, Origin, RobotModel, Visual};

use crate::loader::{LoadedRobot, PendingRobot};

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

/// Marker for the robot's root entity.
#[derive(Component, Debug)]
pub struct RobotRoot;

/// Component storing the URDF joint name on a joint entity.
#[derive(Component, Clone, Debug)]
pub struct JointName(pub String);

/// Static joint description used to recompute the joint transform.
#[derive(Component, Clone, Copy, Debug)]
pub struct JointInfo {
    pub kind: JointKind,
    /// Motion axis in the joint frame.
    pub axis: Vec3,
    /// Fixed parent-to-joint transform from the URDF origin.
    pub origin: Transform,
    pub limits: JointLimits,
}

/// Current joint position (radians for revolute, meters for prismatic).
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct JointValue(f32);

impl JointValue {
    #[must_use]
    pub const fn get(self) -> f32 {
        self.0
    }

    /// Set the joint position. Values are taken as-is; limits only shape
    /// the slider range, they are not enforced here.
    pub fn set(&mut self, value: f32) {
        self.0 = value;
    }
}

// ---------------------------------------------------------------------------
// RobotBounds
// ---------------------------------------------------------------------------

/// World-space bounding box accumulated over all visuals at the zero pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobotBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl RobotBounds {
    /// Inverted box that any included point immediately replaces.
    pub const EMPTY: Self = Self {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    pub fn include_point(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Include a local-space box transformed into world space.
    pub fn include_box(&mut self, transform: &Transform, min: Vec3, max: Vec3) {
        for corner in box_corners(min, max) {
            self.include_point(transform.transform_point(corner));
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    #[must_use]
    pub fn center(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            (self.min + self.max) / 2.0
        }
    }

    #[must_use]
    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }

    /// Largest side of the box. Zero for an empty box.
    #[must_use]
    pub fn max_dimension(&self) -> f32 {
        self.size().max_element()
    }
}

impl Default for RobotBounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

fn box_corners(min: Vec3, max: Vec3) -> [Vec3; 8] {
    [
        Vec3::new(min.x, min.y, min.z),
        Vec3::new(min.x, min.y, max.z),
        Vec3::new(min.x, max.y, min.z),
        Vec3::new(min.x, max.y, max.z),
        Vec3::new(max.x, min.y, min.z),
        Vec3::new(max.x, min.y, max.z),
        Vec3::new(max.x, max.y, min.z),
        Vec3::new(max.x, max.y, max.z),
    ]
}

// ---------------------------------------------------------------------------
// SpawnedRobot
// ---------------------------------------------------------------------------

/// Result of spawning a robot into the world.
#[derive(Resource, Debug, Clone)]
pub struct SpawnedRobot {
    /// Display name from the URDF.
    pub name: String,
    /// Root entity carrying the up-axis correction.
    pub root: Entity,
    /// Map from joint name to its entity, fixed joints included.
    pub joints: HashMap<String, Entity>,
    /// Zero-pose bounding box, used for camera framing.
    pub bounds: RobotBounds,
}

impl SpawnedRobot {
    /// Get the entity for a joint by name.
    #[must_use]
    pub fn joint_entity(&self, name: &str) -> Option<Entity> {
        self.joints.get(name).copied()
    }

    /// Number of spawned joint entities.
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }
}

// ---------------------------------------------------------------------------
// Transform helpers
// ---------------------------------------------------------------------------

/// Rotation that maps the configured model up-axis onto Bevy's +Y.
#[must_use]
pub fn up_to_y_rotation(up: UpAxis) -> Quat {
    Quat::from_rotation_arc(Vec3::from(up.unit()), Vec3::Y)
}

/// URDF origin (xyz translation + fixed-axis rpy) as a [`Transform`].
#[must_use]
pub fn origin_transform(origin: &Origin) -> Transform {
    Transform {
        translation: Vec3::from(origin.xyz),
        rotation: quat_from_rpy(origin.rpy),
        ..default()
    }
}

/// URDF rpy is extrinsic X-Y-Z, which composes as Rz(yaw)·Ry(pitch)·Rx(roll).
fn quat_from_rpy(rpy: [f32; 3]) -> Quat {
    Quat::from_euler(EulerRot::ZYX, rpy[2], rpy[1], rpy[0])
}

/// The joint entity's local transform at position `value`.
///
/// Revolute and continuous joints rotate about the axis, prismatic joints
/// translate along it. Fixed, floating, and planar joints hold the origin
/// regardless of `value`.
#[must_use]
pub fn joint_local_transform(info: &JointInfo, value: f32) -> Transform {
    let axis = info.axis.try_normalize().unwrap_or(Vec3::X);
    let motion = match info.kind {
        JointKind::Revolute | JointKind::Continuous => {
            Transform::from_rotation(Quat::from_axis_angle(axis, value))
        }
        JointKind::Prismatic => Transform::from_translation(axis * value),
        JointKind::Fixed | JointKind::Floating | JointKind::Planar => Transform::IDENTITY,
    };
    info.origin * motion
}

// ---------------------------------------------------------------------------
// Visual preparation
// ---------------------------------------------------------------------------

struct PreparedVisual {
    mesh: Handle<Mesh>,
    material: Handle<StandardMaterial>,
    transform: Transform,
    /// Local-space AABB for bounds accumulation, if one exists.
    aabb: Option<(Vec3, Vec3)>,
}

fn prepare_visuals(
    loaded: &LoadedRobot,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) -> HashMap<String, Vec<PreparedVisual>> {
    let mut prepared: HashMap<String, Vec<PreparedVisual>> = HashMap::new();
    for link in loaded.model.links.values() {
        let visuals: Vec<PreparedVisual> = link
            .visuals
            .iter()
            .filter_map(|v| prepare_visual(loaded, v, meshes, materials))
            .collect();
        if !visuals.is_empty() {
            prepared.insert(link.name.clone(), visuals);
        }
    }
    prepared
}

fn prepare_visual(
    loaded: &LoadedRobot,
    visual: &Visual,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) -> Option<PreparedVisual> {
    let (mesh, transform, aabb) = match &visual.geometry {
        Geometry::Sphere { radius } => {
            let r = *radius;
            (
                meshes.add(Sphere::new(r)),
                origin_transform(&visual.origin),
                Some((Vec3::splat(-r), Vec3::splat(r))),
            )
        }
        Geometry::Box { size } => {
            let half = Vec3::from(*size) / 2.0;
            (
                meshes.add(Cuboid::new(size[0], size[1], size[2])),
                origin_transform(&visual.origin),
                Some((-half, half)),
            )
        }
        Geometry::Cylinder { radius, length } => {
            let half = Vec3::new(*radius, length / 2.0, *radius);
            // URDF cylinders extend along Z, Bevy's along Y.
            (
                meshes.add(Cylinder::new(*radius, *length)),
                origin_transform(&visual.origin)
                    * Transform::from_rotation(Quat::from_rotation_x(FRAC_PI_2)),
                Some((-half, half)),
            )
        }
        Geometry::Mesh { filename, scale } => {
            // Skipped visuals were already recorded as load warnings.
            let mesh = loaded.meshes.get(filename)?;
            let aabb = mesh
                .compute_aabb()
                .map(|a| (Vec3::from(a.min()), Vec3::from(a.max())));
            let mut transform = origin_transform(&visual.origin);
            transform.scale = Vec3::from(*scale);
            (meshes.add(mesh.clone()), transform, aabb)
        }
    };

    let rgb = visual
        .material
        .as_ref()
        .map_or(DEFAULT_COLOR, |m| m.color.resolve());
    let material = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(rgb.r(), rgb.g(), rgb.b()),
        metallic: 0.1,
        perceptual_roughness: 0.7,
        ..default()
    });

    Some(PreparedVisual {
        mesh,
        material,
        transform,
        aabb,
    })
}

// ---------------------------------------------------------------------------
// spawn_robot
// ---------------------------------------------------------------------------

/// Spawn the robot's entity tree and return its handle resource.
///
/// Joint entities are created for every joint, fixed ones included, so the
/// hierarchy mirrors the URDF exactly; interaction layers decide what to
/// expose. All joints start at the zero pose, which is also the pose the
/// returned bounds describe.
pub fn spawn_robot(world: &mut World, loaded: &LoadedRobot, config: &ViewerConfig) -> SpawnedRobot {
    let prepared = world.resource_scope(|world, mut meshes: Mut<Assets<Mesh>>| {
        let mut materials = world.resource_mut::<Assets<StandardMaterial>>();
        prepare_visuals(loaded, &mut meshes, &mut materials)
    });

    let root_transform = Transform::from_rotation(up_to_y_rotation(config.up));
    let root = world
        .spawn((RobotRoot, root_transform, Visibility::default()))
        .id();

    let mut joints = HashMap::new();
    let mut bounds = RobotBounds::EMPTY;
    let mut visited = HashSet::new();
    spawn_link_tree(
        world,
        &loaded.model,
        &prepared,
        &loaded.model.root_link,
        root,
        root_transform,
        &mut visited,
        &mut joints,
        &mut bounds,
    );

    SpawnedRobot {
        name: loaded.model.display_name().to_string(),
        root,
        joints,
        bounds,
    }
}

#[allow(clippy::too_many_arguments)]
fn spawn_link_tree(
    world: &mut World,
    model: &RobotModel,
    prepared: &HashMap<String, Vec<PreparedVisual>>,
    link_name: &str,
    parent: Entity,
    parent_global: Transform,
    visited: &mut HashSet<String>,
    joints: &mut HashMap<String, Entity>,
    bounds: &mut RobotBounds,
) {
    // Malformed URDFs can cycle; visit each link once.
    if !visited.insert(link_name.to_string()) {
        return;
    }

    let link = world
        .spawn((Transform::IDENTITY, Visibility::default()))
        .id();
    world.entity_mut(parent).add_child(link);

    if let Some(visuals) = prepared.get(link_name) {
        for visual in visuals {
            let entity = world
                .spawn((
                    Mesh3d(visual.mesh.clone()),
                    MeshMaterial3d(visual.material.clone()),
                    visual.transform,
                    Visibility::default(),
                ))
                .id();
            world.entity_mut(link).add_child(entity);
            if let Some((min, max)) = visual.aabb {
                bounds.include_box(&(parent_global * visual.transform), min, max);
            }
        }
    }

    for joint in model.joints.values().filter(|j| j.parent == link_name) {
        let info = JointInfo {
            kind: joint.kind,
            axis: Vec3::from(joint.axis),
            origin: origin_transform(&joint.origin),
            limits: joint.limits,
        };
        let transform = joint_local_transform(&info, 0.0);
        let joint_entity = world
            .spawn((
                JointName(joint.name.clone()),
                info,
                JointValue::default(),
                transform,
                Visibility::default(),
            ))
            .id();
        world.entity_mut(link).add_child(joint_entity);
        joints.insert(joint.name.clone(), joint_entity);

        spawn_link_tree(
            world,
            model,
            prepared,
            &joint.child,
            joint_entity,
            parent_global * transform,
            visited,
            joints,
            bounds,
        );
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Turns a [`PendingRobot`] delivered by the loader into spawned entities.
pub fn spawn_pending_robot(world: &mut World) {
    let Some(PendingRobot(loaded)) = world.remove_resource::<PendingRobot>() else {
        return;
    };
    let config = world.resource::<ViewerConfig>().clone();
    let spawned = spawn_robot(world, &loaded, &config);
    world.insert_resource(spawned);
}

/// Rewrites joint transforms from joint values.
///
/// With `auto_redraw` set, every joint is recomputed every frame; otherwise
/// only joints whose value changed since the last run are touched.
#[allow(clippy::needless_pass_by_value)]
pub fn apply_joint_motion(
    config: Res<ViewerConfig>,
    mut joints: Query<(Ref<JointValue>, &JointInfo, &mut Transform)>,
) {
    for (value, info, mut transform) in &mut joints {
        if config.auto_redraw || value.is_changed() {
            *transform = joint_local_transform(info, value.get());
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
