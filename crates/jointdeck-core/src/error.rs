//! What can go wrong while assembling a viewer configuration.

use thiserror::Error;

/// Errors from reading, parsing, or validating viewer configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("config is not valid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("no URDF sources configured")]
    NoSources,

    #[error("invalid up axis: {0:?} (expected one of +X, -X, +Y, -Y, +Z, -Z)")]
    InvalidUpAxis(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
