//! Falloff fields: per-vertex distance from the expand seed.
//!
//! Every metric returns one value per vertex. Finite values are distances
//! (or dissimilarities) from the seed; `+∞` marks vertices the metric never
//! reached. Seeds are expanded to their mirror images on symmetric meshes.

use crate::floodfill::FloodFill;
use crate::mesh::boundary::boundary_loop;
use crate::mesh::geodesic::geodesic_distances;
use crate::mesh::{MeshTopology, SculptMesh};
use sculpting_config::{FalloffTuning, FalloffType};
use std::collections::VecDeque;

/// Compute the falloff field of `metric` seeded at `vertex`.
pub fn compute_falloff(
    mesh: &SculptMesh,
    metric: FalloffType,
    vertex: usize,
    tuning: &FalloffTuning,
) -> Vec<f32> {
    match metric {
        FalloffType::Geodesic => geodesic_falloff(mesh, vertex),
        FalloffType::Topology => topology_falloff(mesh, vertex),
        FalloffType::Normals => normals_falloff(mesh, vertex, tuning),
        FalloffType::Spherical => spherical_falloff(mesh, vertex),
        FalloffType::BoundaryTopology => boundary_topology_falloff(mesh, vertex),
    }
}

/// Surface distance from the seed and its mirror images.
pub fn geodesic_falloff(mesh: &SculptMesh, vertex: usize) -> Vec<f32> {
    let seeds = mesh.symmetry_vertices(vertex);
    geodesic_distances(mesh.topology(), &seeds, f32::INFINITY)
}

/// Hop count from the seed. Welded duplicates share their parent's count.
pub fn topology_falloff(mesh: &SculptMesh, vertex: usize) -> Vec<f32> {
    let mut dists = vec![f32::INFINITY; mesh.vertex_count()];
    let mut flood = FloodFill::new(mesh.vertex_count());
    for seed in flood.add_initial_with_symmetry(mesh, vertex) {
        dists[seed] = 0.0;
    }

    flood.execute(mesh.topology(), |from, to, is_duplicate| {
        dists[to] = if is_duplicate {
            dists[from]
        } else {
            dists[from] + 1.0
        };
        true
    });
    dists
}

/// Normal dissimilarity from the seed.
///
/// The flood fill accumulates an edge factor (product of normal dot products
/// along the path) and a similarity `dot(seed_normal, n) * edge_factor^s`
/// clamped to [0, 1]. The similarity is smoothed by neighbour averaging and
/// returned as `1 - similarity`.
///
/// With `legacy_normal_reset` the field is reset to unreached before the
/// smoothing passes, so every vertex with neighbours ends up `+∞`.
pub fn normals_falloff(mesh: &SculptMesh, vertex: usize, tuning: &FalloffTuning) -> Vec<f32> {
    let topology = mesh.topology();
    let vertex_count = mesh.vertex_count();
    let original_normal = topology.normal(vertex);
    let sensitivity = tuning.normal_sensitivity;

    let mut edge_factor = vec![1.0f32; vertex_count];
    let mut similarity = vec![f32::INFINITY; vertex_count];

    let mut flood = FloodFill::new(vertex_count);
    for seed in flood.add_initial_with_symmetry(mesh, vertex) {
        similarity[seed] = original_normal.dot(topology.normal(seed)).clamp(0.0, 1.0);
    }

    flood.execute(topology, |from, to, is_duplicate| {
        if is_duplicate {
            edge_factor[to] = edge_factor[from];
            similarity[to] = similarity[from];
        } else {
            let current = topology.normal(to);
            let from_edge_factor = edge_factor[from];
            edge_factor[to] = current.dot(topology.normal(from)) * from_edge_factor;
            let raw = original_normal.dot(current) * from_edge_factor.powf(sensitivity);
            // powf of a negative base is NaN
            similarity[to] = if raw.is_nan() { 0.0 } else { raw.clamp(0.0, 1.0) };
        }
        true
    });

    if tuning.legacy_normal_reset {
        similarity.fill(f32::INFINITY);
        for _ in 0..tuning.normal_smooth_iterations {
            smooth_in_place(topology, &mut similarity, false);
        }
        return similarity;
    }

    for _ in 0..tuning.normal_smooth_iterations {
        smooth_in_place(topology, &mut similarity, true);
    }
    similarity
        .into_iter()
        .map(|s| if s.is_finite() { 1.0 - s } else { f32::INFINITY })
        .collect()
}

/// One in-place neighbour-averaging pass in vertex order.
///
/// With `finite_only`, unreached neighbours are left out of the average and a
/// vertex without finite neighbours keeps its value. Otherwise all
/// neighbours are averaged and NaN results become `+∞`.
fn smooth_in_place(topology: &MeshTopology, values: &mut [f32], finite_only: bool) {
    for i in 0..values.len() {
        let mut sum = 0.0f32;
        let mut count = 0usize;
        for &n in topology.neighbors(i) {
            let value = values[n];
            if finite_only && !value.is_finite() {
                continue;
            }
            sum += value;
            count += 1;
        }

        if finite_only {
            if count > 0 {
                values[i] = sum / count as f32;
            }
        } else {
            let avg = sum / count as f32;
            values[i] = if avg.is_nan() { f32::INFINITY } else { avg };
        }
    }
}

/// Straight-line distance to the closest of the seed and its mirror images.
pub fn spherical_falloff(mesh: &SculptMesh, vertex: usize) -> Vec<f32> {
    let topology = mesh.topology();
    let mut dists = vec![f32::INFINITY; mesh.vertex_count()];
    for seed in mesh.symmetry_vertices(vertex) {
        let origin = topology.position(seed);
        for (i, dist) in dists.iter_mut().enumerate() {
            *dist = dist.min(origin.distance(topology.position(i)));
        }
    }
    dists
}

/// Hop count from the boundary loop nearest the seed (and its mirrors).
///
/// Boundary loop vertices are 0. Without a boundary nothing is reached.
pub fn boundary_topology_falloff(mesh: &SculptMesh, vertex: usize) -> Vec<f32> {
    let topology = mesh.topology();
    let mut dists = vec![f32::INFINITY; mesh.vertex_count()];
    let mut queue = VecDeque::new();

    for seed in mesh.symmetry_vertices(vertex) {
        for v in boundary_loop(topology, seed) {
            if dists[v] != 0.0 {
                dists[v] = 0.0;
                queue.push_back(v);
            }
        }
    }

    while let Some(v) = queue.pop_front() {
        for &n in topology.neighbors(v) {
            if dists[n].is_finite() {
                continue;
            }
            dists[n] = dists[v] + 1.0;
            queue.push_back(n);
        }
    }
    dists
}

/// Largest finite value, `-∞` when there is none.
pub fn max_finite(values: &[f32]) -> f32 {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f32::NEG_INFINITY, f32::max)
}

/// Per-face mean of the vertex falloff.
pub fn face_falloff(topology: &MeshTopology, vertex_falloff: &[f32]) -> Vec<f32> {
    (0..topology.face_count())
        .map(|face| {
            let verts = topology.face_vertices(face);
            let sum: f32 = verts.iter().map(|&v| vertex_falloff[v]).sum();
            sum / verts.len() as f32
        })
        .collect()
}
