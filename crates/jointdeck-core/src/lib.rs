// jointdeck-core: display units, color normalization, configuration, and errors
// for the jointdeck URDF viewer.

pub mod angle;
pub mod color;
pub mod config;
pub mod error;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use angle::format_angle;
pub use color::{ColorFields, ColorSpec, DEFAULT_COLOR, Rgb};
pub use config::{UpAxis, ViewerConfig};
pub use error::ConfigError;
