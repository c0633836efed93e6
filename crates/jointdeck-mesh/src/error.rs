//! Failure modes of mesh file loading.

use std::path::PathBuf;

/// Why a single mesh file could not be turned into a render mesh.
///
/// Mesh failures are per-file: the load pipeline downgrades them to warnings
/// instead of failing the whole robot.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    /// No loader is registered for the file's extension.
    #[error("unsupported mesh format: {0}")]
    UnsupportedFormat(String),

    /// The mesh file could not be opened or read.
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file was not valid STL.
    #[error("invalid STL in {path}: {message}")]
    Stl { path: PathBuf, message: String },

    /// The file was not valid OBJ.
    #[error("invalid OBJ in {path}: {message}")]
    Obj { path: PathBuf, message: String },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
