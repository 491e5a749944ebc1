//! Mesh partitioning into spatial nodes.
//!
//! The partitioning strategy uses recursive spatial subdivision of face
//! centroids, producing nodes of roughly bounded face count. Vertex
//! ownership is assigned afterwards so each vertex lands in exactly one node.

use super::{Aabb, NodeFlags, NodeId, NodeTree, PartitionNode};
use crate::mesh::MeshTopology;
use glam::Vec3;
use tracing::debug;

/// Configuration for mesh partitioning.
#[derive(Debug, Clone)]
pub struct PartitionConfig {
    /// Maximum faces per node (will force subdivision above this).
    pub max_faces: usize,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self { max_faces: 2500 }
    }
}

/// Partition a mesh into nodes.
///
/// Faces are recursively subdivided along the longest axis of their bounds
/// until each partition has at most `max_faces` faces. Vertices not used by
/// any face are collected in one trailing node.
pub fn partition_mesh(topology: &MeshTopology, config: &PartitionConfig) -> NodeTree {
    let max_faces = config.max_faces.max(1);
    let mut face_groups: Vec<Vec<usize>> = Vec::new();

    if topology.face_count() > 0 {
        let all_faces: Vec<usize> = (0..topology.face_count()).collect();
        recursive_partition(topology, all_faces, max_faces, &mut face_groups);
    }

    let vertex_count = topology.vertex_count();
    let mut owned = vec![false; vertex_count];
    let mut order = Vec::with_capacity(vertex_count);
    let mut nodes = Vec::with_capacity(face_groups.len() + 1);

    for faces in face_groups {
        let start = order.len();
        let mut bounds = Aabb::empty();
        for &face in &faces {
            for &v in topology.face_vertices(face) {
                bounds.include_point(topology.position(v));
                if !owned[v] {
                    owned[v] = true;
                    order.push(v);
                }
            }
        }
        nodes.push(PartitionNode {
            id: NodeId(nodes.len() as u32),
            bounds,
            faces,
            vertex_range: start..order.len(),
            flags: NodeFlags::default(),
        });
    }

    // Wire vertices without faces.
    let start = order.len();
    let mut loose_bounds = Aabb::empty();
    for (v, is_owned) in owned.iter().enumerate() {
        if !is_owned {
            loose_bounds.include_point(topology.position(v));
            order.push(v);
        }
    }
    if order.len() > start {
        nodes.push(PartitionNode {
            id: NodeId(nodes.len() as u32),
            bounds: loose_bounds,
            faces: Vec::new(),
            vertex_range: start..order.len(),
            flags: NodeFlags::default(),
        });
    }

    let mut slot_of = vec![0; vertex_count];
    for (slot, &v) in order.iter().enumerate() {
        slot_of[v] = slot;
    }

    debug!(
        "Partitioned mesh into {} nodes ({} vertices, {} faces)",
        nodes.len(),
        vertex_count,
        topology.face_count()
    );

    NodeTree {
        nodes,
        order,
        slot_of,
    }
}

/// Recursively partition a set of faces.
fn recursive_partition(
    topology: &MeshTopology,
    faces: Vec<usize>,
    max_faces: usize,
    groups: &mut Vec<Vec<usize>>,
) {
    // Base case: small enough to be a single node
    if faces.len() <= max_faces {
        groups.push(faces);
        return;
    }

    let bounds = calculate_face_bounds(topology, &faces);
    let axis = bounds.longest_axis();
    let split_point = bounds.center()[axis];

    let (left, right): (Vec<usize>, Vec<usize>) = faces
        .iter()
        .partition(|&&face| calculate_face_centroid(topology, face)[axis] < split_point);

    if left.is_empty() || right.is_empty() {
        // Degenerate split (all centroids on one side): fall back to index halves
        let mid = faces.len() / 2;
        let right = faces[mid..].to_vec();
        let mut left = faces;
        left.truncate(mid);
        recursive_partition(topology, left, max_faces, groups);
        recursive_partition(topology, right, max_faces, groups);
    } else {
        recursive_partition(topology, left, max_faces, groups);
        recursive_partition(topology, right, max_faces, groups);
    }
}

/// Calculate the bounding box of a set of faces.
fn calculate_face_bounds(topology: &MeshTopology, faces: &[usize]) -> Aabb {
    let mut bounds = Aabb::empty();
    for &face in faces {
        for &v in topology.face_vertices(face) {
            bounds.include_point(topology.position(v));
        }
    }
    bounds
}

/// Calculate the centroid of a face.
fn calculate_face_centroid(topology: &MeshTopology, face: usize) -> Vec3 {
    let verts = topology.face_vertices(face);
    if verts.is_empty() {
        return Vec3::ZERO;
    }
    let sum: Vec3 = verts.iter().map(|&v| topology.position(v)).sum();
    sum / verts.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{grid_topology, line_mesh};

    #[test]
    fn test_small_mesh_is_single_node() {
        let topology = grid_topology(3, 3);
        let tree = partition_mesh(&topology, &PartitionConfig::default());
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.nodes()[0].vertex_count(), topology.vertex_count());
    }

    #[test]
    fn test_every_vertex_owned_exactly_once() {
        let topology = grid_topology(8, 6);
        let tree = partition_mesh(&topology, &PartitionConfig { max_faces: 5 });
        assert!(tree.node_count() > 1);

        let mut seen = vec![0u32; topology.vertex_count()];
        for node in tree.nodes() {
            for &v in tree.node_vertices(node.id) {
                seen[v] += 1;
            }
        }
        assert!(seen.iter().all(|&count| count == 1));
    }

    #[test]
    fn test_node_ranges_are_contiguous() {
        let topology = grid_topology(8, 6);
        let tree = partition_mesh(&topology, &PartitionConfig { max_faces: 7 });
        let mut expected_start = 0;
        for node in tree.nodes() {
            assert_eq!(node.vertex_range.start, expected_start);
            expected_start = node.vertex_range.end;
        }
        assert_eq!(expected_start, topology.vertex_count());
    }

    #[test]
    fn test_faces_split_by_bound() {
        let topology = grid_topology(10, 1);
        let tree = partition_mesh(&topology, &PartitionConfig { max_faces: 3 });
        assert!(tree.nodes().iter().all(|n| n.faces.len() <= 3));
        let total: usize = tree.nodes().iter().map(|n| n.faces.len()).sum();
        assert_eq!(total, topology.face_count());
    }

    #[test]
    fn test_wire_vertices_get_trailing_node() {
        let mesh = line_mesh(5);
        let tree = mesh.node_tree();
        assert_eq!(tree.node_count(), 1);
        assert!(tree.nodes()[0].faces.is_empty());
        assert_eq!(tree.nodes()[0].vertex_count(), 5);
    }

    #[test]
    fn test_slot_round_trip() {
        let topology = grid_topology(4, 4);
        let tree = partition_mesh(&topology, &PartitionConfig { max_faces: 3 });
        let by_vertex: Vec<usize> = (0..topology.vertex_count()).collect();
        let mut slots: Vec<usize> = by_vertex.iter().map(|&v| tree.slot_of(v)).collect();
        slots.sort_unstable();
        assert_eq!(slots, by_vertex);
        let by_slot = tree.to_slot_order(&by_vertex);
        assert_eq!(tree.to_vertex_order(&by_slot), by_vertex);
    }
}
