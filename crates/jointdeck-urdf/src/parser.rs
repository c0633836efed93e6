//! Turns `urdf-rs` documents into [`RobotModel`]s.
//!
//! The translation is deliberately lossy: inertials, collision shapes, and
//! transmissions never reach the screen, so only names, the joint graph,
//! visual geometry, and materials survive. Conversions are expressed as
//! `From`/`TryFrom` impls on the model types, with `TryFrom` where a
//! document can carry a joint kind the viewer cannot animate.

// Narrowing f64 to f32 loses precision the renderer has no use for.
#![allow(clippy::cast_possible_truncation)]

use std::collections::{HashMap, HashSet};
use std::path::Path;

use jointdeck_core::color::ColorSpec;

use crate::error::UrdfError;
use crate::types::{
    Geometry, JointData, JointKind, JointLimits, LinkData, Material, Origin, RobotModel, Visual,
};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Read and parse a URDF file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<RobotModel, UrdfError> {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(xml) => parse_string(&xml),
        Err(source) => Err(UrdfError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Parse URDF XML into a [`RobotModel`].
pub fn parse_string(xml: &str) -> Result<RobotModel, UrdfError> {
    let doc = urdf_rs::read_from_string(xml).map_err(|e| UrdfError::Parse(e.to_string()))?;
    RobotModel::try_from(&doc)
}

// ---------------------------------------------------------------------------
// Document-to-model conversion
// ---------------------------------------------------------------------------

impl TryFrom<&urdf_rs::Robot> for RobotModel {
    type Error = UrdfError;

    fn try_from(doc: &urdf_rs::Robot) -> Result<Self, UrdfError> {
        let root_link = root_of(doc)?;

        let mut links = HashMap::with_capacity(doc.links.len());
        for link in &doc.links {
            links.insert(link.name.clone(), LinkData::from(link));
        }

        let mut joints = HashMap::with_capacity(doc.joints.len());
        for joint in &doc.joints {
            joints.insert(joint.name.clone(), JointData::try_from(joint)?);
        }

        Ok(Self {
            name: doc.name.clone(),
            links,
            joints,
            root_link,
        })
    }
}

/// The root is the first link in document order that no joint claims as a
/// child. Document order keeps the pick deterministic should a malformed
/// file contain several parentless links.
fn root_of(doc: &urdf_rs::Robot) -> Result<String, UrdfError> {
    let children: HashSet<&str> = doc.joints.iter().map(|j| j.child.link.as_str()).collect();
    doc.links
        .iter()
        .map(|link| link.name.as_str())
        .find(|name| !children.contains(name))
        .map(str::to_owned)
        .ok_or(UrdfError::NoRootLink)
}

impl From<&urdf_rs::Link> for LinkData {
    fn from(link: &urdf_rs::Link) -> Self {
        Self {
            name: link.name.clone(),
            visuals: link.visual.iter().map(Visual::from).collect(),
        }
    }
}

impl TryFrom<&urdf_rs::Joint> for JointData {
    type Error = UrdfError;

    fn try_from(joint: &urdf_rs::Joint) -> Result<Self, UrdfError> {
        Ok(Self {
            name: joint.name.clone(),
            kind: JointKind::try_from(&joint.joint_type)?,
            parent: joint.parent.link.clone(),
            child: joint.child.link.clone(),
            origin: Origin::from(&joint.origin),
            axis: narrow3(&joint.axis.xyz),
            limits: JointLimits::from(&joint.limit),
        })
    }
}

impl TryFrom<&urdf_rs::JointType> for JointKind {
    type Error = UrdfError;

    fn try_from(ty: &urdf_rs::JointType) -> Result<Self, UrdfError> {
        use urdf_rs::JointType as Raw;
        Ok(match ty {
            Raw::Revolute => Self::Revolute,
            Raw::Continuous => Self::Continuous,
            Raw::Prismatic => Self::Prismatic,
            Raw::Fixed => Self::Fixed,
            Raw::Floating => Self::Floating,
            Raw::Planar => Self::Planar,
            Raw::Spherical => {
                return Err(UrdfError::UnsupportedJointType("spherical".into()));
            }
        })
    }
}

impl From<&urdf_rs::JointLimit> for JointLimits {
    fn from(limit: &urdf_rs::JointLimit) -> Self {
        // urdf-rs fills in lower == upper == 0.0 when the XML has no <limit>
        // element, and some exporters write infinities for continuous
        // joints. Both cases read as unbounded.
        let span = (limit.upper - limit.lower).abs();
        let bounded = limit.lower.is_finite() && limit.upper.is_finite() && span > f64::EPSILON;
        Self {
            lower: bounded.then_some(limit.lower as f32),
            upper: bounded.then_some(limit.upper as f32),
        }
    }
}

impl From<&urdf_rs::Pose> for Origin {
    fn from(pose: &urdf_rs::Pose) -> Self {
        Self {
            xyz: narrow3(&pose.xyz),
            rpy: narrow3(&pose.rpy),
        }
    }
}

impl From<&urdf_rs::Visual> for Visual {
    fn from(visual: &urdf_rs::Visual) -> Self {
        Self {
            origin: Origin::from(&visual.origin),
            geometry: Geometry::from(&visual.geometry),
            material: visual.material.as_ref().map(Material::from),
        }
    }
}

impl From<&urdf_rs::Geometry> for Geometry {
    fn from(geom: &urdf_rs::Geometry) -> Self {
        use urdf_rs::Geometry as Raw;
        match geom {
            Raw::Sphere { radius } => Self::Sphere {
                radius: *radius as f32,
            },
            Raw::Box { size } => Self::Box {
                size: narrow3(size),
            },
            // Capsules are shown as cylinders.
            Raw::Cylinder { radius, length } | Raw::Capsule { radius, length } => Self::Cylinder {
                radius: *radius as f32,
                length: *length as f32,
            },
            Raw::Mesh { filename, scale } => Self::Mesh {
                filename: filename.clone(),
                scale: match scale {
                    Some(s) => narrow3(s),
                    None => [1.0; 3],
                },
            },
        }
    }
}

impl From<&urdf_rs::Material> for Material {
    fn from(mat: &urdf_rs::Material) -> Self {
        // Texture references are dropped. A material without an inline color
        // stays unspecified and the fallback chain decides at spawn time.
        let color = match &mat.color {
            Some(c) => ColorSpec::Channels(c.rgba.iter().map(|&v| v as f32).collect()),
            None => ColorSpec::Unspecified,
        };
        Self {
            name: mat.name.clone(),
            color,
        }
    }
}

const fn narrow3(v: &[f64; 3]) -> [f32; 3] {
    [v[0] as f32, v[1] as f32, v[2] as f32]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
