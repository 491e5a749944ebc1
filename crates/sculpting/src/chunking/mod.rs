//! Spatial node partition for parallel, localized attribute updates.
//!
//! Expand rewrites per-vertex attributes across the whole mesh on every
//! pointer move. Splitting the mesh into spatial nodes lets those passes run
//! in parallel and lets the renderer re-upload only what changed:
//!
//! 1. **Spatial partitioning**: faces are split along the longest axis until
//!    each node is small enough
//! 2. **Unique ownership**: every vertex belongs to exactly one node, so node
//!    attribute ranges never overlap
//! 3. **Dirty tracking**: nodes record which attributes changed since the last
//!    redraw
//!
//! # Architecture
//!
//! - [`PartitionNode`] - A spatial region with its faces and owned vertex range
//! - [`NodeTree`] - All nodes plus the vertex ordering that makes node ranges
//!   contiguous

pub mod partition;

pub use partition::{partition_mesh, PartitionConfig};

use glam::Vec3;
use std::ops::Range;

/// Unique identifier for a node within a [`NodeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Axis-aligned bounding box for spatial queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min/max corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB that contains nothing (for accumulation).
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::MAX),
            max: Vec3::splat(f32::MIN),
        }
    }

    /// Whether no point has been included yet.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Expand this AABB to include a point.
    pub fn include_point(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Squared distance from a point to the closest point of this box.
    ///
    /// Zero when the point is inside.
    pub fn distance_squared_to_point(&self, point: Vec3) -> f32 {
        let closest = point.clamp(self.min, self.max);
        closest.distance_squared(point)
    }

    /// Get the center of this AABB.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the size (extent) of this AABB.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Get the longest axis (0=x, 1=y, 2=z).
    pub fn longest_axis(&self) -> usize {
        let size = self.size();
        if size.x >= size.y && size.x >= size.z {
            0
        } else if size.y >= size.z {
            1
        } else {
            2
        }
    }
}

/// Pending update flags of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeFlags {
    /// Node needs to be redrawn.
    pub redraw: bool,
    /// Mask or face set data changed.
    pub update_mask: bool,
    /// Color data changed.
    pub update_color: bool,
}

impl NodeFlags {
    /// Whether any flag is set.
    pub fn any(&self) -> bool {
        self.redraw || self.update_mask || self.update_color
    }
}

/// A spatial node of the mesh.
#[derive(Debug, Clone)]
pub struct PartitionNode {
    /// Unique identifier for this node.
    pub id: NodeId,
    /// Bounding box of this node's geometry.
    pub bounds: Aabb,
    /// Faces inside this node.
    pub faces: Vec<usize>,
    /// Range of this node's owned vertices in the tree's vertex order.
    pub(crate) vertex_range: Range<usize>,
    /// Pending updates.
    pub flags: NodeFlags,
}

impl PartitionNode {
    /// Number of vertices owned by this node.
    pub fn vertex_count(&self) -> usize {
        self.vertex_range.len()
    }

    /// Mark this node for redraw.
    pub fn mark_redraw(&mut self) {
        self.flags.redraw = true;
    }

    /// Mark mask (or face set) data as changed.
    pub fn mark_update_mask(&mut self) {
        self.flags.update_mask = true;
        self.flags.redraw = true;
    }

    /// Mark color data as changed.
    pub fn mark_update_color(&mut self) {
        self.flags.update_color = true;
        self.flags.redraw = true;
    }

    /// Clear flags after the renderer has consumed them.
    pub fn clear_flags(&mut self) {
        self.flags = NodeFlags::default();
    }
}

/// All nodes of a mesh plus the vertex ordering backing their ranges.
///
/// `order` lists vertex indices grouped by owning node; `slot_of` is its
/// inverse. Per-vertex attributes stored in this order can be split into one
/// disjoint slice per node.
#[derive(Debug, Clone, Default)]
pub struct NodeTree {
    pub(crate) nodes: Vec<PartitionNode>,
    pub(crate) order: Vec<usize>,
    pub(crate) slot_of: Vec<usize>,
}

impl NodeTree {
    /// Get the total number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All nodes in vertex-order.
    pub fn nodes(&self) -> &[PartitionNode] {
        &self.nodes
    }

    /// Get a node by ID.
    pub fn node(&self, id: NodeId) -> Option<&PartitionNode> {
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut PartitionNode> {
        self.nodes.get_mut(id.0 as usize)
    }

    /// Ids of every node, covering the whole mesh.
    pub fn gather_all(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|n| n.id).collect()
    }

    /// Vertices owned by a node.
    pub fn node_vertices(&self, id: NodeId) -> &[usize] {
        match self.node(id) {
            Some(node) => &self.order[node.vertex_range.clone()],
            None => &[],
        }
    }

    /// Storage slot of a vertex.
    #[inline]
    pub fn slot_of(&self, vertex: usize) -> usize {
        self.slot_of[vertex]
    }

    /// Get all nodes that carry pending updates.
    pub fn dirty_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.flags.any())
            .map(|n| n.id)
            .collect()
    }

    /// Return dirty nodes and clear their flags.
    pub fn take_dirty_nodes(&mut self) -> Vec<NodeId> {
        let dirty = self.dirty_nodes();
        for &id in &dirty {
            if let Some(node) = self.node_mut(id) {
                node.clear_flags();
            }
        }
        dirty
    }

    /// Mark every node for redraw with the given attribute flag.
    pub(crate) fn mark_all(&mut self, mark: impl Fn(&mut PartitionNode)) {
        for node in &mut self.nodes {
            mark(node);
        }
    }

    /// Convert an attribute array from vertex order to slot order.
    pub(crate) fn to_slot_order<T: Copy>(&self, by_vertex: &[T]) -> Vec<T> {
        self.order.iter().map(|&v| by_vertex[v]).collect()
    }

    /// Convert an attribute array from slot order to vertex order.
    pub(crate) fn to_vertex_order<T: Copy>(&self, by_slot: &[T]) -> Vec<T> {
        self.slot_of.iter().map(|&slot| by_slot[slot]).collect()
    }
}
