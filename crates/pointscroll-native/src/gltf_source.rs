//! Flatten a glTF scene into one world-space xyz buffer, ready for
//! `vertex_cache::bake`.

use anyhow::Context;
use glam::{Mat4, Vec3};
use std::path::Path;

/// Read a `.glb` or `.gltf` file and return every mesh vertex in world space.
pub fn import_vertices(path: &Path) -> anyhow::Result<Vec<f32>> {
    let (document, buffers, _images) =
        gltf::import(path).with_context(|| format!("import {}", path.display()))?;
    let vertices = world_positions(&document, &buffers);
    if vertices.is_empty() {
        anyhow::bail!("{}: no mesh positions", path.display());
    }
    Ok(vertices)
}

/// Walk the default scene (or the first one) and collect the position
/// attribute of every primitive, transformed by its node's world matrix.
pub fn world_positions(document: &gltf::Document, buffers: &[gltf::buffer::Data]) -> Vec<f32> {
    let mut out = Vec::new();
    let Some(scene) = document.default_scene().or_else(|| document.scenes().next()) else {
        return out;
    };
    for node in scene.nodes() {
        collect_node(&node, Mat4::IDENTITY, buffers, &mut out);
    }
    out
}

fn collect_node(node: &gltf::Node, parent: Mat4, buffers: &[gltf::buffer::Data], out: &mut Vec<f32>) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            let reader = primitive.reader(|b| buffers.get(b.index()).map(|d| d.0.as_slice()));
            let Some(positions) = reader.read_positions() else {
                log::warn!("mesh {} primitive {}: no positions", mesh.index(), primitive.index());
                continue;
            };
            for p in positions {
                let w = world.transform_point3(Vec3::from_array(p));
                out.extend_from_slice(&[w.x, w.y, w.z]);
            }
        }
    }
    for child in node.children() {
        collect_node(&child, world, buffers, out);
    }
}

/// True for file names the glTF importer handles.
pub fn is_gltf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("glb") || e.eq_ignore_ascii_case("gltf"))
}
