//! Joint control panel view model.
//!
//! One [`JointControl`] per movable joint: fixed joints are filtered out,
//! the rest are sorted by name and given slider bounds in degrees. Joints
//! without position limits get the full ±180° range. The panel is built
//! once per loaded robot; resetting the pose rewrites values but never
//! rebuilds the list.

use bevy::prelude::*;

use jointdeck_urdf::JointLimits;

use crate::loader::RobotLoaded;
use crate::spawner::{JointInfo, JointName, JointValue};

/// Slider range for joints without position limits, in degrees.
pub const DEFAULT_LOWER_DEG: f32 = -180.0;
pub const DEFAULT_UPPER_DEG: f32 = 180.0;

/// Slider increment in degrees.
pub const SLIDER_STEP_DEG: f64 = 0.5;

// ---------------------------------------------------------------------------
// View model
// ---------------------------------------------------------------------------

/// One slider row in the joint panel.
#[derive(Debug, Clone, PartialEq)]
pub struct JointControl {
    pub name: String,
    /// The joint entity this control drives.
    pub entity: Entity,
    pub lower_deg: f32,
    pub upper_deg: f32,
    /// Slider position; the joint itself stores radians.
    pub value_deg: f32,
}

/// Controls for the currently loaded robot, in display order.
#[derive(Resource, Debug, Default)]
pub struct JointPanel {
    pub controls: Vec<JointControl>,
}

/// Slider bounds in degrees for a joint's position limits.
///
/// Missing or non-finite limits fall back to the ±180° defaults, per side.
#[must_use]
pub fn bounds_degrees(limits: &JointLimits) -> (f32, f32) {
    let lower = limits
        .lower
        .filter(|v| v.is_finite())
        .map_or(DEFAULT_LOWER_DEG, f32::to_degrees);
    let upper = limits
        .upper
        .filter(|v| v.is_finite())
        .map_or(DEFAULT_UPPER_DEG, f32::to_degrees);
    (lower, upper)
}

/// Build the control list from joint entities: movable joints only, sorted
/// by name.
pub fn build_controls<'a, I>(joints: I) -> Vec<JointControl>
where
    I: IntoIterator<Item = (Entity, &'a str, &'a JointInfo, f32)>,
{
    let mut controls: Vec<JointControl> = joints
        .into_iter()
        .filter(|(_, _, info, _)| !info.kind.is_fixed())
        .map(|(entity, name, info, value)| {
            let (lower_deg, upper_deg) = bounds_degrees(&info.limits);
            JointControl {
                name: name.to_string(),
                entity,
                lower_deg,
                upper_deg,
                value_deg: value.to_degrees(),
            }
        })
        .collect();
    controls.sort_by(|a, b| a.name.cmp(&b.name));
    controls
}

/// Zero every control and write the zero pose through to the joints.
///
/// The control list itself is preserved; it is only rebuilt when a robot
/// loads.
pub fn reset_pose(panel: &mut JointPanel, mut write_joint: impl FnMut(Entity, f32)) {
    for control in &mut panel.controls {
        write_joint(control.entity, 0.0);
        control.value_deg = 0.0;
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Rebuild the panel when a robot finishes loading.
pub fn build_joint_panel(
    mut events: EventReader<RobotLoaded>,
    mut panel: ResMut<JointPanel>,
    joints: Query<(Entity, &JointName, &JointInfo, &JointValue)>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();

    panel.controls = build_controls(
        joints
            .iter()
            .map(|(entity, name, info, value)| (entity, name.0.as_str(), info, value.get())),
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
