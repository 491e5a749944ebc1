//! Spatial data structures for vertex lookups.
//!
//! This module provides octree-based spatial indexing for:
//! - Nearest-vertex queries (mirrored seeds, moved origins)
//! - Vertex queries within a radius

use crate::chunking::Aabb;
use glam::Vec3;

/// Configuration for octree construction.
#[derive(Debug, Clone)]
pub struct OctreeConfig {
    /// Maximum depth of the octree.
    pub max_depth: u32,
    /// Maximum items per leaf node before splitting.
    pub max_items_per_leaf: usize,
    /// Minimum node size (prevents infinite subdivision).
    pub min_node_size: f32,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 8,
            max_items_per_leaf: 16,
            min_node_size: 0.01,
        }
    }
}

/// A spatial octree over vertex positions.
#[derive(Debug, Clone)]
pub struct VertexOctree {
    root: OctreeNode,
    config: OctreeConfig,
}

/// An item stored in the octree: vertex index and position.
#[derive(Debug, Clone, Copy)]
struct OctreeItem {
    vertex: usize,
    position: Vec3,
}

/// A node in the octree (either internal or leaf).
#[derive(Debug, Clone)]
enum OctreeNode {
    /// Leaf node containing items.
    Leaf {
        bounds: Aabb,
        items: Vec<OctreeItem>,
    },
    /// Internal node with 8 children.
    Internal {
        bounds: Aabb,
        children: Box<[Option<OctreeNode>; 8]>,
    },
}

impl OctreeNode {
    fn bounds(&self) -> &Aabb {
        match self {
            OctreeNode::Leaf { bounds, .. } | OctreeNode::Internal { bounds, .. } => bounds,
        }
    }
}

/// Get the octant index for a point (0-7).
fn octant_for_point(bounds: &Aabb, point: Vec3) -> usize {
    let center = bounds.center();
    let mut index = 0;
    if point.x >= center.x {
        index |= 1;
    }
    if point.y >= center.y {
        index |= 2;
    }
    if point.z >= center.z {
        index |= 4;
    }
    index
}

/// Get the bounds for a specific octant.
fn octant_bounds(bounds: &Aabb, octant: usize) -> Aabb {
    let center = bounds.center();
    let min = Vec3::new(
        if octant & 1 != 0 { center.x } else { bounds.min.x },
        if octant & 2 != 0 { center.y } else { bounds.min.y },
        if octant & 4 != 0 { center.z } else { bounds.min.z },
    );
    let max = Vec3::new(
        if octant & 1 != 0 { bounds.max.x } else { center.x },
        if octant & 2 != 0 { bounds.max.y } else { center.y },
        if octant & 4 != 0 { bounds.max.z } else { center.z },
    );
    Aabb::new(min, max)
}

impl VertexOctree {
    /// Create a new empty octree with the given bounds.
    pub fn new(bounds: Aabb) -> Self {
        Self::with_config(bounds, OctreeConfig::default())
    }

    /// Create a new octree with custom configuration.
    pub fn with_config(bounds: Aabb, config: OctreeConfig) -> Self {
        Self {
            root: OctreeNode::Leaf {
                bounds,
                items: Vec::new(),
            },
            config,
        }
    }

    /// Build an octree from vertex positions.
    pub fn from_vertices(vertices: impl Iterator<Item = (usize, Vec3)>) -> Self {
        let mut bounds = Aabb::empty();
        let items: Vec<OctreeItem> = vertices
            .map(|(vertex, position)| {
                bounds.include_point(position);
                OctreeItem { vertex, position }
            })
            .collect();

        if bounds.is_empty() {
            bounds = Aabb::new(Vec3::ZERO, Vec3::ZERO);
        }

        // Expand bounds slightly to handle edge cases
        let padding = bounds.size() * 0.01 + Vec3::splat(0.001);
        bounds.min -= padding;
        bounds.max += padding;

        let mut octree = Self::new(bounds);
        for item in items {
            octree.insert(item.vertex, item.position);
        }
        octree
    }

    /// Insert a vertex into the octree.
    pub fn insert(&mut self, vertex: usize, position: Vec3) {
        let config = self.config.clone();
        Self::insert_into_node(&mut self.root, vertex, position, 0, &config);
    }

    fn insert_into_node(
        node: &mut OctreeNode,
        vertex: usize,
        position: Vec3,
        depth: u32,
        config: &OctreeConfig,
    ) {
        match node {
            OctreeNode::Leaf { bounds, items } => {
                items.push(OctreeItem { vertex, position });

                if items.len() > config.max_items_per_leaf
                    && depth < config.max_depth
                    && bounds.size().min_element() > config.min_node_size * 2.0
                {
                    let old_items = std::mem::take(items);
                    let old_bounds = *bounds;

                    *node = OctreeNode::Internal {
                        bounds: old_bounds,
                        children: Box::new([None, None, None, None, None, None, None, None]),
                    };

                    for item in old_items {
                        Self::insert_into_node(node, item.vertex, item.position, depth, config);
                    }
                }
            }
            OctreeNode::Internal { bounds, children } => {
                let octant = octant_for_point(bounds, position);

                if children[octant].is_none() {
                    children[octant] = Some(OctreeNode::Leaf {
                        bounds: octant_bounds(bounds, octant),
                        items: Vec::new(),
                    });
                }

                if let Some(child) = &mut children[octant] {
                    Self::insert_into_node(child, vertex, position, depth + 1, config);
                }
            }
        }
    }

    /// Find the vertex closest to `point` no farther than `max_distance`.
    ///
    /// Ties resolve to the lowest vertex index.
    pub fn nearest(&self, point: Vec3, max_distance: f32) -> Option<usize> {
        let limit = if max_distance.is_finite() {
            max_distance * max_distance
        } else {
            f32::INFINITY
        };
        let mut best: Option<(f32, usize)> = None;
        Self::nearest_in_node(&self.root, point, limit, &mut best);
        best.map(|(_, vertex)| vertex)
    }

    fn nearest_in_node(
        node: &OctreeNode,
        point: Vec3,
        limit: f32,
        best: &mut Option<(f32, usize)>,
    ) {
        let bound = best.map_or(limit, |(d, _)| d.min(limit));
        if node.bounds().distance_squared_to_point(point) > bound {
            return;
        }

        match node {
            OctreeNode::Leaf { items, .. } => {
                for item in items {
                    let d = item.position.distance_squared(point);
                    if d > limit {
                        continue;
                    }
                    let better = match *best {
                        None => true,
                        Some((best_d, best_v)) => d < best_d || (d == best_d && item.vertex < best_v),
                    };
                    if better {
                        *best = Some((d, item.vertex));
                    }
                }
            }
            OctreeNode::Internal { children, .. } => {
                // Visit the octant holding the point first so pruning kicks in early
                let first = octant_for_point(node.bounds(), point);
                if let Some(child) = &children[first] {
                    Self::nearest_in_node(child, point, limit, best);
                }
                for (octant, child) in children.iter().enumerate() {
                    if octant == first {
                        continue;
                    }
                    if let Some(child) = child {
                        Self::nearest_in_node(child, point, limit, best);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scattered() -> VertexOctree {
        // 5x5x5 lattice so the root splits into internal nodes
        let mut points = Vec::new();
        for x in 0..5 {
            for y in 0..5 {
                for z in 0..5 {
                    points.push(Vec3::new(x as f32, y as f32, z as f32));
                }
            }
        }
        VertexOctree::from_vertices(points.into_iter().enumerate())
    }

    #[test]
    fn test_octree_finds_every_vertex() {
        let octree = scattered();
        for x in 0..5 {
            for y in 0..5 {
                for z in 0..5 {
                    let index = (x * 25 + y * 5 + z) as usize;
                    let point = Vec3::new(x as f32, y as f32, z as f32);
                    assert_eq!(octree.nearest(point, 0.0), Some(index));
                }
            }
        }
    }

    #[test]
    fn test_nearest_matches_brute_force() {
        let octree = scattered();
        let queries = [
            Vec3::new(0.2, 0.1, 3.9),
            Vec3::new(2.6, 2.4, 1.1),
            Vec3::new(-3.0, 7.0, 2.0),
        ];
        for query in queries {
            let mut best = (f32::MAX, 0);
            for x in 0..5 {
                for y in 0..5 {
                    for z in 0..5 {
                        let index = (x * 25 + y * 5 + z) as usize;
                        let d = Vec3::new(x as f32, y as f32, z as f32).distance_squared(query);
                        if d < best.0 {
                            best = (d, index);
                        }
                    }
                }
            }
            assert_eq!(octree.nearest(query, f32::INFINITY), Some(best.1));
        }
    }

    #[test]
    fn test_nearest_respects_max_distance() {
        let octree = scattered();
        assert_eq!(octree.nearest(Vec3::new(10.0, 10.0, 10.0), 1.0), None);
        assert!(octree.nearest(Vec3::new(4.5, 4.0, 4.0), 1.0).is_some());
    }

    #[test]
    fn test_empty_octree_has_no_nearest() {
        let octree = VertexOctree::from_vertices(std::iter::empty());
        assert_eq!(octree.nearest(Vec3::ZERO, f32::INFINITY), None);
    }
}
