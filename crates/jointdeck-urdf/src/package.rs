//! `package://` mesh reference resolution.
//!
//! URDF visuals reference mesh files either as plain paths or as ROS-style
//! `package://<name>/<relative>` URIs. A [`PackageMap`] translates those
//! references into filesystem paths: named package roots take priority, a
//! default root (under which packages sit as directories) catches the rest.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::UrdfError;

const PACKAGE_SCHEME: &str = "package://";

/// Maps package names to filesystem roots for mesh reference resolution.
#[derive(Debug, Clone, Default)]
pub struct PackageMap {
    roots: HashMap<String, PathBuf>,
    default_root: Option<PathBuf>,
}

impl PackageMap {
    /// Build a map from explicit per-package roots and an optional default
    /// root that hosts any package not listed by name.
    #[must_use]
    pub fn new(roots: HashMap<String, PathBuf>, default_root: Option<PathBuf>) -> Self {
        Self {
            roots,
            default_root,
        }
    }

    /// Resolve a mesh `reference` from a URDF into a filesystem path.
    ///
    /// `urdf_dir` is the directory of the URDF file itself and anchors
    /// relative references.
    pub fn resolve(&self, reference: &str, urdf_dir: &Path) -> Result<PathBuf, UrdfError> {
        if let Some(rest) = reference.strip_prefix(PACKAGE_SCHEME) {
            let (package, relative) = rest.split_once('/').unwrap_or((rest, ""));
            if let Some(root) = self.roots.get(package) {
                return Ok(root.join(relative));
            }
            if let Some(default_root) = &self.default_root {
                return Ok(default_root.join(package).join(relative));
            }
            return Err(UrdfError::UnknownPackage(package.to_string()));
        }

        let path = Path::new(reference);
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            Ok(urdf_dir.join(path))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
