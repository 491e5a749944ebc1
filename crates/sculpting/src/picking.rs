//! Cursor picking: mapping a pointer position to the mesh element under it.
//!
//! The session only needs "which vertex and face is under the pointer", so
//! picking sits behind the [`CursorPicker`] trait. [`OrthographicPicker`] is
//! a view-aligned implementation that casts rays against the mesh using the
//! Moller-Trumbore algorithm.

use crate::mesh::MeshTopology;
use glam::{Vec2, Vec3};

/// Epsilon for floating point comparisons in ray intersection
const EPSILON: f32 = 1e-6;

/// Element under the cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorHit {
    /// Active vertex: the hit face's vertex closest to the hit point
    pub vertex: usize,
    /// Face under the cursor, if the hit came from a face
    pub face: Option<usize>,
    /// World-space hit location
    pub location: Vec3,
}

/// Resolves pointer positions to mesh elements.
pub trait CursorPicker {
    /// Element under `mouse`, or `None` when the pointer is off the mesh.
    fn pick(&self, topology: &MeshTopology, mouse: Vec2) -> Option<CursorHit>;
}

/// Result of a ray-triangle intersection test
#[derive(Debug, Clone, Copy)]
pub struct TriangleHit {
    /// Distance along the ray to the intersection point
    pub t: f32,
    /// Barycentric coordinate u (weight for vertex 1)
    pub u: f32,
    /// Barycentric coordinate v (weight for vertex 2)
    pub v: f32,
}

/// Moller-Trumbore ray-triangle intersection algorithm.
///
/// Returns the hit distance and barycentric coordinates if the ray intersects
/// the triangle. Both windings are accepted.
pub fn ray_triangle_intersection(
    ray_origin: Vec3,
    ray_dir: Vec3,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
) -> Option<TriangleHit> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let pvec = ray_dir.cross(edge2);
    let det = edge1.dot(pvec);

    // Ray parallel to the triangle plane
    if det.abs() < EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let tvec = ray_origin - v0;

    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let qvec = tvec.cross(edge1);
    let v = ray_dir.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(qvec) * inv_det;

    // Only accept hits in front of the ray
    if t < EPSILON {
        return None;
    }

    Some(TriangleHit { t, u, v })
}

/// Cast a ray against every face (fan-triangulated) and return the closest
/// hit as `(face, distance)`.
pub fn raycast_faces(
    topology: &MeshTopology,
    ray_origin: Vec3,
    ray_dir: Vec3,
) -> Option<(usize, f32)> {
    let mut closest: Option<(usize, f32)> = None;

    // Brute force over faces; meshes handled here are editor-sized
    for face in 0..topology.face_count() {
        let verts = topology.face_vertices(face);
        let v0 = topology.position(verts[0]);
        for pair in verts[1..].windows(2) {
            let v1 = topology.position(pair[0]);
            let v2 = topology.position(pair[1]);
            let Some(hit) = ray_triangle_intersection(ray_origin, ray_dir, v0, v1, v2) else {
                continue;
            };
            let dominated = closest.is_some_and(|(_, t)| hit.t >= t);
            if !dominated {
                closest = Some((face, hit.t));
            }
        }
    }

    closest
}

/// Orthographic view looking down -Z.
///
/// A pointer position maps to the world XY point `mouse / scale + offset`,
/// and the ray starts `eye_height` above the origin plane.
#[derive(Debug, Clone, Copy)]
pub struct OrthographicPicker {
    /// Pixels per world unit
    pub scale: f32,
    /// World XY position of the pointer origin
    pub offset: Vec2,
    /// Z coordinate of the ray origin
    pub eye_height: f32,
}

impl Default for OrthographicPicker {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
            eye_height: 1000.0,
        }
    }
}

impl OrthographicPicker {
    /// World-space ray for a pointer position.
    pub fn ray(&self, mouse: Vec2) -> (Vec3, Vec3) {
        let xy = mouse / self.scale + self.offset;
        (xy.extend(self.eye_height), Vec3::NEG_Z)
    }
}

impl CursorPicker for OrthographicPicker {
    fn pick(&self, topology: &MeshTopology, mouse: Vec2) -> Option<CursorHit> {
        let (origin, dir) = self.ray(mouse);
        let (face, t) = raycast_faces(topology, origin, dir)?;
        let location = origin + dir * t;

        let vertex = topology
            .face_vertices(face)
            .iter()
            .copied()
            .min_by(|&a, &b| {
                let da = topology.position(a).distance_squared(location);
                let db = topology.position(b).distance_squared(location);
                da.total_cmp(&db)
            })?;

        Some(CursorHit {
            vertex,
            face: Some(face),
            location,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::grid_topology;

    #[test]
    fn test_ray_hits_triangle() {
        let hit = ray_triangle_intersection(
            Vec3::new(0.25, 0.25, 5.0),
            Vec3::NEG_Z,
            Vec3::ZERO,
            Vec3::X,
            Vec3::Y,
        )
        .unwrap();
        assert!((hit.t - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_ray_misses_triangle() {
        let hit = ray_triangle_intersection(
            Vec3::new(2.0, 2.0, 5.0),
            Vec3::NEG_Z,
            Vec3::ZERO,
            Vec3::X,
            Vec3::Y,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_pick_grid_vertex_and_face() {
        let topology = grid_topology(2, 2);
        let picker = OrthographicPicker::default();
        // Inside the top-right quad, nearest to the far corner
        let hit = picker.pick(&topology, Vec2::new(1.8, 1.9)).unwrap();
        assert_eq!(hit.face, Some(3));
        assert_eq!(hit.vertex, 8);
        assert!((hit.location - Vec3::new(1.8, 1.9, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_pick_respects_scale_and_offset() {
        let topology = grid_topology(2, 2);
        let picker = OrthographicPicker {
            scale: 10.0,
            offset: Vec2::new(1.0, 1.0),
            eye_height: 50.0,
        };
        let hit = picker.pick(&topology, Vec2::new(-8.0, -8.0)).unwrap();
        assert_eq!(hit.face, Some(0));
        assert_eq!(hit.vertex, 0);
    }

    #[test]
    fn test_pick_off_mesh() {
        let topology = grid_topology(2, 2);
        let picker = OrthographicPicker::default();
        assert!(picker.pick(&topology, Vec2::new(5.0, 5.0)).is_none());
    }
}
