//! Boundary loop extraction.

use super::MeshTopology;
use std::collections::VecDeque;

/// Closest boundary vertex to `vertex` in hops, if any.
fn nearest_boundary_vertex(topology: &MeshTopology, vertex: usize) -> Option<usize> {
    if topology.is_boundary_vertex(vertex) {
        return Some(vertex);
    }

    let mut visited = vec![false; topology.vertex_count()];
    let mut queue = VecDeque::from([vertex]);
    visited[vertex] = true;

    while let Some(current) = queue.pop_front() {
        for &neighbor in topology.neighbors(current) {
            if visited[neighbor] {
                continue;
            }
            if topology.is_boundary_vertex(neighbor) {
                return Some(neighbor);
            }
            visited[neighbor] = true;
            queue.push_back(neighbor);
        }
    }
    None
}

/// Vertices of the boundary loop closest to `vertex`.
///
/// The loop is every boundary vertex connected to the nearest boundary
/// vertex through boundary edges. Empty for closed meshes or an
/// out-of-range vertex.
pub fn boundary_loop(topology: &MeshTopology, vertex: usize) -> Vec<usize> {
    if vertex >= topology.vertex_count() {
        return Vec::new();
    }
    let Some(start) = nearest_boundary_vertex(topology, vertex) else {
        return Vec::new();
    };

    let mut visited = vec![false; topology.vertex_count()];
    let mut queue = VecDeque::from([start]);
    let mut loop_vertices = vec![start];
    visited[start] = true;

    while let Some(current) = queue.pop_front() {
        for &neighbor in topology.neighbors(current) {
            if visited[neighbor] || !topology.is_boundary_edge(current, neighbor) {
                continue;
            }
            visited[neighbor] = true;
            loop_vertices.push(neighbor);
            queue.push_back(neighbor);
        }
    }

    loop_vertices
}
