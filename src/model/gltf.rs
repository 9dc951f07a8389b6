use glam::{Mat4, Vec3};

use super::{Mesh, MeshNode, Model};

/// Decode a binary (`.glb`) or self-contained (`.gltf` with embedded
/// buffers) glTF document into a flattened [`Model`].
///
/// Every node of the default scene (or of all scenes when none is marked
/// default) is visited; node hierarchies are baked into each mesh node's
/// local matrix. Only triangle-list primitives are kept.
pub fn decode(name: &str, bytes: &[u8]) -> Result<Model, String> {
    let (document, buffers, _images) =
        ::gltf::import_slice(bytes).map_err(|e| e.to_string())?;

    let mut nodes = Vec::new();
    let scenes: Vec<_> = match document.default_scene() {
        Some(scene) => vec![scene],
        None => document.scenes().collect(),
    };
    for scene in scenes {
        for node in scene.nodes() {
            process_node(&node, &buffers, Mat4::IDENTITY, &mut nodes)?;
        }
    }

    if nodes.iter().all(|n| n.mesh.indices.is_empty()) {
        return Err(format!("{name} contains no triangle geometry"));
    }

    log::debug!(
        "decoded {name}: {} mesh nodes, {} triangles",
        nodes.len(),
        nodes.iter().map(|n| n.mesh.triangle_count()).sum::<usize>()
    );
    Ok(Model::new(name, nodes))
}

/// Recursively flatten a node and its children.
fn process_node(
    node: &::gltf::Node,
    buffers: &[::gltf::buffer::Data],
    parent: Mat4,
    out: &mut Vec<MeshNode>,
) -> Result<(), String> {
    let local = Mat4::from_cols_array_2d(&node.transform().matrix());
    let global = parent * local;

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            if primitive.mode() != ::gltf::mesh::Mode::Triangles {
                continue;
            }
            let reader = primitive
                .reader(|buffer| buffers.get(buffer.index()).map(|d| &d.0[..]));

            let Some(positions) = reader.read_positions() else {
                continue;
            };
            let positions: Vec<Vec3> = positions.map(Vec3::from_array).collect();
            if positions.is_empty() {
                continue;
            }
            let normals = reader
                .read_normals()
                .map(|n| n.map(Vec3::from_array).collect::<Vec<_>>());
            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..positions.len() as u32).collect(),
            };
            if indices.iter().any(|&i| i as usize >= positions.len()) {
                return Err(format!(
                    "mesh {:?} references vertices out of range",
                    mesh.name()
                ));
            }

            let factor = primitive
                .material()
                .pbr_metallic_roughness()
                .base_color_factor();
            out.push(MeshNode {
                mesh: Mesh::new(positions, normals, indices),
                local: global,
                color: [factor[0], factor[1], factor[2]],
                opacity: factor[3],
            });
        }
    }

    for child in node.children() {
        process_node(&child, buffers, global, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::testing::triangle_glb;

    #[test]
    fn decodes_binary_triangle() {
        let model = decode("tri.glb", &triangle_glb()).unwrap();
        assert_eq!(model.nodes.len(), 1);
        assert_eq!(model.triangle_count(), 1);
        // Node translation is baked into the local matrix.
        let bounds = model.world_bounds().unwrap();
        assert!((bounds.min - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-6);
        // Default material is opaque white.
        assert_eq!(model.nodes[0].color, [1.0, 1.0, 1.0]);
        assert_eq!(model.nodes[0].opacity, 1.0);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(decode("junk.glb", b"not a model").is_err());
    }
}
