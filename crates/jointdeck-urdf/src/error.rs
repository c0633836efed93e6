//! Failure modes of the URDF pipeline, from locating a source file to
//! querying the parsed model.

use std::path::PathBuf;

/// Anything that can go wrong between a configured source list and a usable
/// [`RobotModel`](crate::RobotModel).
#[derive(Debug, thiserror::Error)]
pub enum UrdfError {
    /// A source file could not be read.
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The content was not a well-formed URDF document.
    #[error("invalid URDF: {0}")]
    Parse(String),

    /// Every link is some joint's child, so no tree root exists.
    #[error("no root link: every link is the child of a joint")]
    NoRootLink,

    /// The document uses a joint kind the viewer cannot animate.
    #[error("unsupported joint type: {0}")]
    UnsupportedJointType(String),

    /// A lookup asked for a link the model does not contain.
    #[error("link {0:?} is not in the model")]
    MissingLink(String),

    /// A lookup asked for a joint the model does not contain.
    #[error("joint {0:?} is not in the model")]
    MissingJoint(String),

    /// A `package://` mesh reference names a package with no configured root.
    #[error("no package root configured for {0:?}")]
    UnknownPackage(String),

    /// Every candidate in the source chain failed; the summary lists each
    /// candidate with its failure.
    #[error("all {count} URDF sources failed: {summary}")]
    AllSourcesFailed { count: usize, summary: String },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
