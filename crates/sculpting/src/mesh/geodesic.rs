//! Surface distances along mesh edges.
//!
//! Distances are shortest paths over the edge graph weighted by Euclidean
//! edge length (Dijkstra). Welded duplicates are joined with zero-length
//! edges.

use super::MeshTopology;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Heap entry ordered so the smallest distance pops first.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    distance: f32,
    vertex: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior, ties by vertex for determinism
        other
            .distance
            .partial_cmp(&self.distance)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

/// Shortest surface distance from the nearest seed to every vertex.
///
/// Vertices farther than `limit`, or not connected to any seed, are `+∞`.
/// Out-of-range seeds are ignored.
pub fn geodesic_distances(topology: &MeshTopology, seeds: &[usize], limit: f32) -> Vec<f32> {
    let vertex_count = topology.vertex_count();
    let mut distances = vec![f32::INFINITY; vertex_count];
    let mut heap = BinaryHeap::new();

    for &seed in seeds {
        if seed < vertex_count && distances[seed] > 0.0 {
            distances[seed] = 0.0;
            heap.push(Candidate {
                distance: 0.0,
                vertex: seed,
            });
        }
    }

    while let Some(Candidate { distance, vertex }) = heap.pop() {
        if distance > distances[vertex] {
            continue;
        }
        let origin = topology.position(vertex);
        for neighbor in topology.neighbors_with_duplicates(vertex) {
            let step = if neighbor.is_duplicate {
                0.0
            } else {
                origin.distance(topology.position(neighbor.index))
            };
            let candidate = distance + step;
            if candidate > limit || candidate >= distances[neighbor.index] {
                continue;
            }
            distances[neighbor.index] = candidate;
            heap.push(Candidate {
                distance: candidate,
                vertex: neighbor.index,
            });
        }
    }

    distances
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{grid_topology, line_mesh};

    #[test]
    fn test_line_distances() {
        let mesh = line_mesh(5);
        let distances = geodesic_distances(mesh.topology(), &[2], f32::MAX);
        assert_eq!(distances, vec![2.0, 1.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_grid_uses_edge_paths() {
        let topology = grid_topology(2, 2);
        let distances = geodesic_distances(&topology, &[0], f32::MAX);
        // Quads have no diagonals, so the far corner is 4 edges away
        assert!((distances[8] - 4.0).abs() < 1e-6);
        assert!((distances[4] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_multiple_seeds_take_minimum() {
        let mesh = line_mesh(7);
        let distances = geodesic_distances(mesh.topology(), &[0, 6], f32::MAX);
        assert_eq!(distances, vec![0.0, 1.0, 2.0, 3.0, 2.0, 1.0, 0.0]);
    }

    #[test]
    fn test_limit_leaves_far_vertices_unreached() {
        let mesh = line_mesh(5);
        let distances = geodesic_distances(mesh.topology(), &[0], 2.5);
        assert_eq!(distances[2], 2.0);
        assert!(distances[3].is_infinite());
        assert!(distances[4].is_infinite());
    }

    #[test]
    fn test_no_seeds_is_all_unreached() {
        let mesh = line_mesh(3);
        let distances = geodesic_distances(mesh.topology(), &[], f32::MAX);
        assert!(distances.iter().all(|d| d.is_infinite()));
    }
}
