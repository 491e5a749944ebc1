//! Small hand-built meshes shared by unit tests.

use crate::chunking::PartitionConfig;
use crate::mesh::{MeshTopology, SculptMesh, SymmetryFlags};
use crate::picking::{CursorHit, CursorPicker};
use glam::{Vec2, Vec3};

/// `n` vertices on the X axis joined by unit edges, no faces.
pub fn line_mesh(n: usize) -> SculptMesh {
    let positions = (0..n).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
    let edges: Vec<[usize; 2]> = (1..n).map(|i| [i - 1, i]).collect();
    SculptMesh::from_edges(positions, &edges).unwrap()
}

/// Quad faces of a `w` x `h` grid. Vertex `y * (w + 1) + x` sits at
/// `(x - x0, y, 0)`; face `y * w + x` is the quad above and right of it.
fn grid_parts(w: usize, h: usize, x0: f32) -> (Vec<Vec3>, Vec<[usize; 4]>) {
    let mut positions = Vec::new();
    for y in 0..=h {
        for x in 0..=w {
            positions.push(Vec3::new(x as f32 - x0, y as f32, 0.0));
        }
    }
    let row = w + 1;
    let mut faces = Vec::new();
    for y in 0..h {
        for x in 0..w {
            let v = y * row + x;
            faces.push([v, v + 1, v + row + 1, v + row]);
        }
    }
    (positions, faces)
}

pub fn grid_topology(w: usize, h: usize) -> MeshTopology {
    let (positions, faces) = grid_parts(w, h, 0.0);
    MeshTopology::from_faces(positions, &faces).unwrap()
}

pub fn grid_mesh(w: usize, h: usize) -> SculptMesh {
    let (positions, faces) = grid_parts(w, h, 0.0);
    SculptMesh::new(positions, &faces).unwrap()
}

/// Grid split into nodes of at most `max_faces` faces.
pub fn grid_mesh_partitioned(w: usize, h: usize, max_faces: usize) -> SculptMesh {
    let (positions, faces) = grid_parts(w, h, 0.0);
    SculptMesh::with_partition(positions, &faces, &PartitionConfig { max_faces }).unwrap()
}

/// Grid centered on x = 0 with X mirror symmetry. `w` should be even.
pub fn centered_grid_mesh(w: usize, h: usize) -> SculptMesh {
    let (positions, faces) = grid_parts(w, h, w as f32 / 2.0);
    SculptMesh::new(positions, &faces)
        .unwrap()
        .with_symmetry(SymmetryFlags::X)
}

/// Open tube around the Z axis. Vertex `ring * segments + s`; both end rings
/// are boundaries.
pub fn cylinder_mesh(segments: usize, rings: usize) -> SculptMesh {
    let mut positions = Vec::new();
    for ring in 0..rings {
        for s in 0..segments {
            let angle = s as f32 / segments as f32 * std::f32::consts::TAU;
            positions.push(Vec3::new(angle.cos(), angle.sin(), ring as f32));
        }
    }
    let mut faces = Vec::new();
    for ring in 0..rings.saturating_sub(1) {
        for s in 0..segments {
            let a = ring * segments + s;
            let b = ring * segments + (s + 1) % segments;
            faces.push([a, b, b + segments, a + segments]);
        }
    }
    SculptMesh::new(positions, &faces).unwrap()
}

/// Picker keyed by vertex index: `mouse.x` is the vertex under the cursor,
/// negative or out-of-range positions are off the mesh.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexPicker;

impl CursorPicker for IndexPicker {
    fn pick(&self, topology: &MeshTopology, mouse: Vec2) -> Option<CursorHit> {
        if mouse.x < 0.0 {
            return None;
        }
        let vertex = mouse.x as usize;
        if vertex >= topology.vertex_count() {
            return None;
        }
        Some(CursorHit {
            vertex,
            face: topology.vertex_faces(vertex).first().copied(),
            location: topology.position(vertex),
        })
    }
}

/// Pointer position that [`IndexPicker`] resolves to `vertex`.
pub fn at(vertex: usize) -> Vec2 {
    Vec2::new(vertex as f32, 0.0)
}

/// Pointer position off the mesh.
pub fn off_mesh() -> Vec2 {
    Vec2::new(-1.0, 0.0)
}
