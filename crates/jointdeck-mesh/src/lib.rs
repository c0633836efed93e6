//! Mesh loading for jointdeck.
//!
//! Robot visuals reference mesh files by path; this crate turns those files
//! into Bevy [`Mesh`](bevy::prelude::Mesh)es. Loading is dispatched on file
//! extension through a [`MeshLoaderRegistry`], so the supported format set
//! is decided by whoever constructs the registry rather than baked into the
//! loader call sites. STL and OBJ loaders ship built in.

pub mod error;
pub mod obj;
pub mod registry;
pub mod stl;

pub use error::MeshError;
pub use obj::ObjLoader;
pub use registry::{MeshLoader, MeshLoaderRegistry};
pub use stl::StlLoader;
