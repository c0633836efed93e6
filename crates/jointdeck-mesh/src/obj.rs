//! OBJ mesh loading via `tobj`.
//!
//! Loads geometry only: `mtllib` references are deliberately not followed,
//! since URDF materials (or the viewer default) decide surface color. All
//! objects in the file are merged into a single render mesh.

// Merged vertex counts stay well under u32::MAX.
#![allow(clippy::cast_possible_truncation)]

use std::io::BufReader;
use std::path::Path;

use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};

use crate::error::MeshError;
use crate::registry::MeshLoader;

/// Loader for `.obj` files.
pub struct ObjLoader;

impl MeshLoader for ObjLoader {
    fn load(&self, path: &Path) -> Result<Mesh, MeshError> {
        let file = std::fs::File::open(path).map_err(|e| MeshError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut reader = BufReader::new(file);

        // The material loader returns an empty set, so mtllib lines resolve
        // to nothing instead of failing on missing .mtl files.
        let (models, _materials) =
            tobj::load_obj_buf(&mut reader, &tobj::GPU_LOAD_OPTIONS, |_| {
                Ok((Vec::new(), Default::default()))
            })
            .map_err(|e| MeshError::Obj {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let mut positions: Vec<[f32; 3]> = Vec::new();
        let mut normals: Vec<[f32; 3]> = Vec::new();
        let mut uvs: Vec<[f32; 2]> = Vec::new();
        let mut indices: Vec<u32> = Vec::new();

        let has_normals = models
            .iter()
            .all(|m| m.mesh.normals.len() == m.mesh.positions.len());

        for model in &models {
            let mesh = &model.mesh;
            let base = positions.len() as u32;

            for p in mesh.positions.chunks_exact(3) {
                positions.push([p[0], p[1], p[2]]);
            }
            if has_normals {
                for n in mesh.normals.chunks_exact(3) {
                    normals.push([n[0], n[1], n[2]]);
                }
            }
            if mesh.texcoords.len() / 2 == mesh.positions.len() / 3 {
                for t in mesh.texcoords.chunks_exact(2) {
                    uvs.push([t[0], t[1]]);
                }
            } else {
                uvs.extend(std::iter::repeat_n([0.0, 0.0], mesh.positions.len() / 3));
            }
            indices.extend(mesh.indices.iter().map(|i| base + i));
        }

        let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, Default::default());
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
        mesh.insert_indices(Indices::U32(indices));
        if has_normals {
            mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
        } else {
            mesh.compute_smooth_normals();
        }
        mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);

        Ok(mesh)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
