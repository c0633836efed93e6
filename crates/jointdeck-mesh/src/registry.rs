//! Extension-dispatched mesh loading.
//!
//! A [`MeshLoaderRegistry`] owns one [`MeshLoader`] per file extension and
//! dispatches on the (lowercased) extension of the requested path. Formats
//! without a registered loader are rejected up front rather than handed to a
//! loader that would fail obscurely.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::Path;

use bevy::prelude::*;

use crate::error::MeshError;
use crate::obj::ObjLoader;
use crate::stl::StlLoader;

// ---------------------------------------------------------------------------
// Loader trait
// ---------------------------------------------------------------------------

/// A loader for one mesh file format.
pub trait MeshLoader: Send + Sync {
    /// Load the file at `path` into a render mesh.
    fn load(&self, path: &Path) -> Result<Mesh, MeshError>;
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Maps lowercase file extensions to mesh loaders.
pub struct MeshLoaderRegistry {
    loaders: HashMap<String, Box<dyn MeshLoader>>,
}

impl MeshLoaderRegistry {
    /// A registry with no loaders. Useful as a base for custom format sets.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            loaders: HashMap::new(),
        }
    }

    /// A registry with the built-in loaders (`stl`, `obj`) registered.
    #[must_use]
    pub fn with_default_loaders() -> Self {
        let mut registry = Self::empty();
        registry.register("stl", Box::new(StlLoader));
        registry.register("obj", Box::new(ObjLoader));
        registry
    }

    /// Register `loader` for `extension` (matched case-insensitively).
    /// Replaces any loader previously registered for the same extension.
    pub fn register(&mut self, extension: &str, loader: Box<dyn MeshLoader>) {
        self.loaders.insert(extension.to_ascii_lowercase(), loader);
    }

    /// Whether a loader is registered for this path's extension.
    #[must_use]
    pub fn supports(&self, path: &Path) -> bool {
        self.loaders.contains_key(&extension_of(path))
    }

    /// Load the mesh at `path` with the loader registered for its extension.
    pub fn load(&self, path: &Path) -> Result<Mesh, MeshError> {
        let extension = extension_of(path);
        let loader = self
            .loaders
            .get(&extension)
            .ok_or(MeshError::UnsupportedFormat(extension))?;
        loader.load(path)
    }
}

impl Default for MeshLoaderRegistry {
    fn default() -> Self {
        Self::with_default_loaders()
    }
}

/// The lowercased extension of `path`, falling back to the whole file name
/// for extension-less paths so error messages stay informative.
fn extension_of(path: &Path) -> String {
    path.extension()
        .or_else(|| path.file_name())
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct UnitTriangle;

    impl MeshLoader for UnitTriangle {
        fn load(&self, _path: &Path) -> Result<Mesh, MeshError> {
            let mut mesh = Mesh::new(
                bevy::render::mesh::PrimitiveTopology::TriangleList,
                Default::default(),
            );
            mesh.insert_attribute(
                Mesh::ATTRIBUTE_POSITION,
                vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            );
            Ok(mesh)
        }
    }

    // -- dispatch --

    #[test]
    fn default_registry_supports_stl_and_obj() {
        let registry = MeshLoaderRegistry::with_default_loaders();
        assert!(registry.supports(Path::new("base.stl")));
        assert!(registry.supports(Path::new("link.obj")));
        assert!(!registry.supports(Path::new("scene.dae")));
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let registry = MeshLoaderRegistry::with_default_loaders();
        assert!(registry.supports(Path::new("BASE.STL")));
        assert!(registry.supports(Path::new("Link.Obj")));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let registry = MeshLoaderRegistry::with_default_loaders();
        let result = registry.load(Path::new("scene.dae"));
        match result {
            Err(MeshError::UnsupportedFormat(ext)) => assert_eq!(ext, "dae"),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn extensionless_path_reports_file_name() {
        let registry = MeshLoaderRegistry::with_default_loaders();
        let result = registry.load(Path::new("/meshes/base"));
        match result {
            Err(MeshError::UnsupportedFormat(ext)) => assert_eq!(ext, "base"),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn custom_loader_can_be_registered() {
        let mut registry = MeshLoaderRegistry::empty();
        assert!(!registry.supports(Path::new("part.tri")));

        registry.register("tri", Box::new(UnitTriangle));
        assert!(registry.supports(Path::new("part.tri")));

        let mesh = registry.load(Path::new("part.tri")).unwrap();
        assert_eq!(mesh.count_vertices(), 3);
    }

    #[test]
    fn dispatch_reaches_stl_loader() {
        let dir = std::env::temp_dir().join("jointdeck_registry_dispatch");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("tri.stl");
        std::fs::write(
            &path,
            "solid t\nfacet normal 0 0 1\n outer loop\n  vertex 0 0 0\n  vertex 1 0 0\n  vertex 0 1 0\n endloop\nendfacet\nendsolid t\n",
        )
        .unwrap();

        let registry = MeshLoaderRegistry::with_default_loaders();
        let mesh = registry.load(&path).unwrap();
        assert_eq!(mesh.count_vertices(), 3);

        std::fs::remove_file(&path).ok();
    }

    // -- extension_of --

    #[test]
    fn extension_of_variants() {
        assert_eq!(extension_of(Path::new("a/b/mesh.STL")), "stl");
        assert_eq!(extension_of(Path::new("mesh.tar.gz")), "gz");
        assert_eq!(extension_of(Path::new("noext")), "noext");
        assert_eq!(extension_of(&PathBuf::new()), "");
    }
}
