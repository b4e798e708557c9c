//! Procedural meshes for the room shell and furniture.
//!
//! Every quad is wound counter-clockwise when seen from the side its normal
//! points to, matching `FrontFace::Ccw` in the scene pass.

use glam::Vec3;

use crate::model::{MeshData, Vertex};

/// A `width` × `height` plane in the local XY plane, facing +Z.
pub fn plane(width: f32, height: f32) -> MeshData {
    let mut mesh = MeshData::default();
    push_quad(
        &mut mesh,
        Vec3::Z,
        Vec3::Y,
        Vec3::new(width * 0.5, height * 0.5, 0.0),
    );
    mesh
}

/// An axis-aligned box centered at the origin with outward-facing normals.
pub fn cuboid(size: Vec3) -> MeshData {
    const FACES: [(Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::Y),
        (Vec3::NEG_X, Vec3::Y),
        (Vec3::Y, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::Z),
        (Vec3::Z, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y),
    ];

    let half_extents = size * 0.5;
    let mut mesh = MeshData::default();

    for (normal, up) in FACES {
        push_quad(&mut mesh, normal, up, half_extents);
    }

    mesh
}

/// Appends one face of an axis-aligned box. `normal` and `up` must be
/// orthogonal unit axes; a plane is a box with zero depth along `normal`.
fn push_quad(mesh: &mut MeshData, normal: Vec3, up: Vec3, half_extents: Vec3) {
    let right = up.cross(normal);
    let base = mesh.vertices.len() as u32;

    for (u, v) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
        let position = (normal + right * u + up * v) * half_extents;
        mesh.vertices.push(Vertex::new(position, normal));
    }

    mesh.indices
        .extend([base, base + 1, base + 2, base + 2, base + 3, base]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_winding_matches_normals(mesh: &MeshData) {
        for triangle in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [triangle[0], triangle[1], triangle[2]]
                .map(|i| mesh.vertices[i as usize]);
            let geometric = (b.position - a.position)
                .cross(c.position - a.position)
                .normalize();
            assert!(
                geometric.abs_diff_eq(a.normal, 1e-5),
                "triangle normal {geometric} disagrees with vertex normal {}",
                a.normal
            );
        }
    }

    #[test]
    fn plane_spans_requested_size() {
        let mesh = plane(6.0, 8.0);
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 6);

        let min = mesh
            .vertices
            .iter()
            .fold(Vec3::splat(f32::MAX), |acc, v| acc.min(v.position));
        let max = mesh
            .vertices
            .iter()
            .fold(Vec3::splat(f32::MIN), |acc, v| acc.max(v.position));
        assert_eq!(min, Vec3::new(-3.0, -4.0, 0.0));
        assert_eq!(max, Vec3::new(3.0, 4.0, 0.0));
        assert!(mesh.vertices.iter().all(|v| v.normal == Vec3::Z));
    }

    #[test]
    fn plane_winding_faces_positive_z() {
        assert_winding_matches_normals(&plane(2.0, 1.0));
    }

    #[test]
    fn cuboid_winding_faces_outward() {
        let mesh = cuboid(Vec3::new(2.0, 0.1, 1.0));
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert_winding_matches_normals(&mesh);

        for vertex in &mesh.vertices {
            // Each face sits on the half extent along its own normal.
            let along_normal = vertex.position.dot(vertex.normal);
            let expected = (Vec3::new(1.0, 0.05, 0.5) * vertex.normal.abs()).element_sum();
            assert!((along_normal - expected).abs() < 1e-6);
        }
    }
}
