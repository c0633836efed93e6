//! STL mesh loading via `stl_io`.
//!
//! Handles both ASCII and binary STL transparently. STL carries triangle
//! geometry only, so normals are regenerated (smooth) and UVs are zeroed.

// stl_io vertex indices are usize; real meshes stay well under u32::MAX.
#![allow(clippy::cast_possible_truncation)]

use std::path::Path;

use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};

use crate::error::MeshError;
use crate::registry::MeshLoader;

/// Loader for `.stl` files.
pub struct StlLoader;

impl MeshLoader for StlLoader {
    fn load(&self, path: &Path) -> Result<Mesh, MeshError> {
        let mut file = std::fs::File::open(path).map_err(|e| MeshError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        // read_stl sniffs ASCII vs binary and deduplicates vertices.
        let stl = stl_io::read_stl(&mut file).map_err(|e| MeshError::Stl {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let positions: Vec<[f32; 3]> = stl
            .vertices
            .iter()
            .map(|v| [v[0], v[1], v[2]])
            .collect();

        let mut indices = Vec::with_capacity(stl.faces.len() * 3);
        for face in &stl.faces {
            indices.push(face.vertices[0] as u32);
            indices.push(face.vertices[1] as u32);
            indices.push(face.vertices[2] as u32);
        }

        let uvs = vec![[0.0, 0.0]; positions.len()];

        let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, Default::default());
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
        mesh.insert_indices(Indices::U32(indices));
        // Facet normals in the file are per-face; shared vertices want
        // averaged normals, so recompute instead of trusting the file.
        mesh.compute_smooth_normals();
        mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);

        Ok(mesh)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
