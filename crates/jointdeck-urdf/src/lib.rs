//! URDF parsing and model preparation for jointdeck.
//!
//! This crate turns URDF XML into a renderer-agnostic [`RobotModel`]:
//! links with visuals, joints with kinds, axes and limits, plus the
//! machinery around getting at the file in the first place (source
//! fallback chains) and resolving `package://` mesh references.
//!
//! Rendering and interaction live in `jointdeck-viewer`; nothing in this
//! crate depends on a graphics stack.

pub mod error;
pub mod package;
pub mod parser;
pub mod source;
pub mod types;

pub use error::UrdfError;
pub use package::PackageMap;
pub use parser::{parse_file, parse_string};
pub use source::{resolve_sources, source_dir};
pub use types::{
    Geometry, JointData, JointKind, JointLimits, LinkData, Material, Origin, RobotModel, Visual,
};
