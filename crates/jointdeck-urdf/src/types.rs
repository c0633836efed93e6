//! The robot model the rest of the viewer works from.
//!
//! A [`RobotModel`] is what the parser produces and every downstream stage
//! consumes: the spawner walks its kinematic tree, the joint panel lists its
//! movable joints, and the mesh loader pulls filenames out of its visuals.
//! Nothing here depends on the XML layer.

use std::collections::HashMap;

use jointdeck_core::color::ColorSpec;

use crate::error::UrdfError;

// ---------------------------------------------------------------------------
// Joints
// ---------------------------------------------------------------------------

/// Motion class of a URDF joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JointKind {
    /// Hinge rotation bounded by position limits.
    Revolute,
    /// Hinge rotation with no bounds, as in wheels and turntables.
    Continuous,
    /// Linear travel along the axis, bounded by position limits.
    Prismatic,
    /// Rigid attachment; parent and child move as one body.
    Fixed,
    /// Free six degree-of-freedom attachment (rare).
    Floating,
    /// Motion constrained to the plane normal to the axis (rare).
    Planar,
}

impl JointKind {
    /// `true` for joints that allow no motion at all. Fixed joints are the
    /// only kind the control panel skips; every other kind gets a slider.
    #[must_use]
    pub const fn is_fixed(self) -> bool {
        matches!(self, Self::Fixed)
    }
}

/// Position bounds of a joint. `None` on both sides means unbounded motion.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JointLimits {
    /// Smallest allowed position, in radians or meters.
    pub lower: Option<f32>,
    /// Largest allowed position, in radians or meters.
    pub upper: Option<f32>,
}

/// One URDF joint: its motion class and where it sits in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct JointData {
    pub name: String,
    pub kind: JointKind,
    /// Link this joint hangs off.
    pub parent: String,
    /// Link this joint moves.
    pub child: String,
    /// Pose of the joint frame relative to the parent link.
    pub origin: Origin,
    /// Motion axis, expressed in the joint frame.
    pub axis: [f32; 3],
    pub limits: JointLimits,
}

// ---------------------------------------------------------------------------
// Link geometry and appearance
// ---------------------------------------------------------------------------

/// Translation plus roll-pitch-yaw, the URDF `<origin>` element.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Origin {
    /// Offset in meters.
    pub xyz: [f32; 3],
    /// Fixed-axis roll, pitch, yaw in radians.
    pub rpy: [f32; 3],
}

/// Shape of a single visual element.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Sphere { radius: f32 },
    Box { size: [f32; 3] },
    Cylinder { radius: f32, length: f32 },
    Mesh { filename: String, scale: [f32; 3] },
}

/// Named display material. The color keeps whatever shape the source file
/// used; resolution to a concrete RGB value happens at spawn time.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub color: ColorSpec,
}

/// One renderable element of a link.
#[derive(Debug, Clone, PartialEq)]
pub struct Visual {
    pub origin: Origin,
    pub geometry: Geometry,
    pub material: Option<Material>,
}

/// A named link and the visuals attached to it.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkData {
    pub name: String,
    pub visuals: Vec<Visual>,
}

// ---------------------------------------------------------------------------
// RobotModel
// ---------------------------------------------------------------------------

/// A parsed robot: every link and joint, keyed by name, plus the root.
///
/// The kinematic tree is implicit in the joints' parent/child names; the
/// spawner reassembles it starting from [`root_link`](Self::root_link).
#[derive(Debug, Clone, PartialEq)]
pub struct RobotModel {
    pub name: String,
    pub links: HashMap<String, LinkData>,
    pub joints: HashMap<String, JointData>,
    /// The one link no joint claims as a child.
    pub root_link: String,
}

impl RobotModel {
    /// Look up a link, reporting the name that was asked for on failure.
    pub fn link(&self, name: &str) -> Result<&LinkData, UrdfError> {
        self.links
            .get(name)
            .ok_or_else(|| UrdfError::MissingLink(name.into()))
    }

    /// Look up a joint, reporting the name that was asked for on failure.
    pub fn joint(&self, name: &str) -> Result<&JointData, UrdfError> {
        self.joints
            .get(name)
            .ok_or_else(|| UrdfError::MissingJoint(name.into()))
    }

    /// Every joint that is not fixed, in arbitrary map order.
    pub fn movable_joints(&self) -> impl Iterator<Item = &JointData> {
        self.joints.values().filter(|j| !j.kind.is_fixed())
    }

    /// Movable joint count.
    #[must_use]
    pub fn dof(&self) -> usize {
        self.movable_joints().count()
    }

    /// All joint names, in display order.
    #[must_use]
    pub fn joint_names(&self) -> Vec<&str> {
        sorted(self.joints.keys().map(String::as_str).collect())
    }

    /// Movable joint names, in display order.
    #[must_use]
    pub fn movable_joint_names(&self) -> Vec<&str> {
        sorted(self.movable_joints().map(|j| j.name.as_str()).collect())
    }

    /// The robot's name, or a placeholder when the source left it blank.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "URDF Robot"
        } else {
            &self.name
        }
    }

    /// Every distinct mesh filename referenced by a visual, in display order.
    #[must_use]
    pub fn mesh_filenames(&self) -> Vec<&str> {
        let mut names = sorted(
            self.links
                .values()
                .flat_map(|link| &link.visuals)
                .filter_map(|visual| match &visual.geometry {
                    Geometry::Mesh { filename, .. } => Some(filename.as_str()),
                    _ => None,
                })
                .collect(),
        );
        names.dedup();
        names
    }
}

/// Map iteration order is arbitrary; name lists are sorted before display.
fn sorted(mut names: Vec<&str>) -> Vec<&str> {
    names.sort_unstable();
    names
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
