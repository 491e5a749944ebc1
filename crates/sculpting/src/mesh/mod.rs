//! Sculpt mesh: connectivity, per-vertex attributes and node partitions.
//!
//! [`MeshTopology`] is immutable once built and answers connectivity queries
//! (neighbours, face loops, boundaries, weld duplicates). [`SculptMesh`] adds
//! the editable attributes an expand session writes (mask, face sets and
//! colors) together with the node partition and the spatial index.
//!
//! Mask and color values are stored in node order: the vertices owned by a
//! node occupy one contiguous range, so [`SculptMesh::split_partitions_mut`]
//! can hand every node its own mutable slice.

pub mod boundary;
pub mod geodesic;
pub mod symmetry;

pub use symmetry::{flip, SymmetryFlags};

use crate::chunking::{partition_mesh, NodeId, NodeTree, PartitionConfig};
use crate::color::Rgba;
use crate::error::MeshError;
use crate::spatial::VertexOctree;
use glam::Vec3;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Face set id assigned to faces that have none.
pub const DEFAULT_FACE_SET: i32 = 1;

/// Opaque white, the value of a freshly created color layer.
pub const DEFAULT_COLOR: Rgba = [1.0, 1.0, 1.0, 1.0];

/// One neighbour reached from a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbor {
    pub index: usize,
    /// `index` is a welded copy of the vertex rather than an edge neighbour.
    pub is_duplicate: bool,
}

/// Connectivity and geometry of a mesh.
#[derive(Debug, Clone)]
pub struct MeshTopology {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    face_starts: Vec<usize>,
    face_loops: Vec<usize>,
    neighbors: Vec<Vec<usize>>,
    duplicates: Vec<Vec<usize>>,
    vertex_faces: Vec<Vec<usize>>,
    boundary_vertices: Vec<bool>,
    boundary_edges: HashSet<(usize, usize)>,
}

fn edge_key(a: usize, b: usize) -> (usize, usize) {
    if a < b { (a, b) } else { (b, a) }
}

impl MeshTopology {
    /// Build topology from positions and polygon vertex loops.
    pub fn from_faces<F: AsRef<[usize]>>(
        positions: Vec<Vec3>,
        faces: &[F],
    ) -> Result<Self, MeshError> {
        let vertex_count = positions.len();
        let mut face_starts = Vec::with_capacity(faces.len() + 1);
        let mut face_loops = Vec::new();
        face_starts.push(0);

        for (face, verts) in faces.iter().enumerate() {
            let verts = verts.as_ref();
            if verts.len() < 3 {
                return Err(MeshError::DegenerateFace {
                    face,
                    count: verts.len(),
                });
            }
            if let Some(&vertex) = verts.iter().find(|&&v| v >= vertex_count) {
                return Err(MeshError::FaceIndexOutOfRange {
                    face,
                    vertex,
                    vertex_count,
                });
            }
            face_loops.extend_from_slice(verts);
            face_starts.push(face_loops.len());
        }

        let mut neighbors = vec![Vec::new(); vertex_count];
        let mut vertex_faces = vec![Vec::new(); vertex_count];
        let mut edge_uses: HashMap<(usize, usize), u32> = HashMap::new();

        for face in 0..faces.len() {
            let verts = &face_loops[face_starts[face]..face_starts[face + 1]];
            for (i, &a) in verts.iter().enumerate() {
                let b = verts[(i + 1) % verts.len()];
                vertex_faces[a].push(face);
                if a != b {
                    neighbors[a].push(b);
                    neighbors[b].push(a);
                    *edge_uses.entry(edge_key(a, b)).or_insert(0) += 1;
                }
            }
        }

        let boundary_edges: HashSet<(usize, usize)> = edge_uses
            .into_iter()
            .filter(|&(_, uses)| uses == 1)
            .map(|(edge, _)| edge)
            .collect();

        let mut boundary_vertices = vec![false; vertex_count];
        for &(a, b) in &boundary_edges {
            boundary_vertices[a] = true;
            boundary_vertices[b] = true;
        }

        for list in &mut neighbors {
            list.sort_unstable();
            list.dedup();
        }
        for list in &mut vertex_faces {
            list.dedup();
        }

        let mut topology = Self {
            normals: Vec::new(),
            positions,
            face_starts,
            face_loops,
            neighbors,
            duplicates: vec![Vec::new(); vertex_count],
            vertex_faces,
            boundary_vertices,
            boundary_edges,
        };
        topology.normals = topology.compute_normals();
        Ok(topology)
    }

    /// Build a faceless (wire) topology from an edge list.
    pub fn from_edges(positions: Vec<Vec3>, edges: &[[usize; 2]]) -> Result<Self, MeshError> {
        let vertex_count = positions.len();
        let mut neighbors = vec![Vec::new(); vertex_count];

        for (edge, &[a, b]) in edges.iter().enumerate() {
            if let Some(vertex) = [a, b].into_iter().find(|&v| v >= vertex_count) {
                return Err(MeshError::EdgeIndexOutOfRange {
                    edge,
                    vertex,
                    vertex_count,
                });
            }
            if a != b {
                neighbors[a].push(b);
                neighbors[b].push(a);
            }
        }
        for list in &mut neighbors {
            list.sort_unstable();
            list.dedup();
        }

        Ok(Self {
            normals: vec![Vec3::Z; vertex_count],
            positions,
            face_starts: vec![0],
            face_loops: Vec::new(),
            neighbors,
            duplicates: vec![Vec::new(); vertex_count],
            vertex_faces: vec![Vec::new(); vertex_count],
            boundary_vertices: vec![false; vertex_count],
            boundary_edges: HashSet::new(),
        })
    }

    /// Area-weighted vertex normals; vertices without faces point along +Z.
    fn compute_normals(&self) -> Vec<Vec3> {
        let mut accum = vec![Vec3::ZERO; self.vertex_count()];
        for face in 0..self.face_count() {
            let verts = self.face_vertices(face);
            // Newell's method: the sum is twice the area vector
            let mut normal = Vec3::ZERO;
            for (i, &a) in verts.iter().enumerate() {
                let b = verts[(i + 1) % verts.len()];
                normal += self.positions[a].cross(self.positions[b]);
            }
            for &v in verts {
                accum[v] += normal;
            }
        }
        accum
            .into_iter()
            .map(|n| n.normalize_or(Vec3::Z))
            .collect()
    }

    /// Register welded vertex pairs, visited as duplicates by flood fills.
    pub fn add_duplicates(&mut self, pairs: &[(usize, usize)]) -> Result<(), MeshError> {
        let vertex_count = self.vertex_count();
        for (edge, &(a, b)) in pairs.iter().enumerate() {
            if let Some(vertex) = [a, b].into_iter().find(|&v| v >= vertex_count) {
                return Err(MeshError::EdgeIndexOutOfRange {
                    edge,
                    vertex,
                    vertex_count,
                });
            }
            if a == b {
                continue;
            }
            if !self.duplicates[a].contains(&b) {
                self.duplicates[a].push(b);
                self.duplicates[b].push(a);
            }
        }
        Ok(())
    }

    /// Replace the computed normals.
    pub fn set_normals(&mut self, normals: Vec<Vec3>) -> Result<(), MeshError> {
        if normals.len() != self.vertex_count() {
            return Err(MeshError::AttributeLength {
                attribute: "normals",
                expected: self.vertex_count(),
                actual: normals.len(),
            });
        }
        self.normals = normals;
        Ok(())
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.face_starts.len() - 1
    }

    #[inline]
    pub fn position(&self, vertex: usize) -> Vec3 {
        self.positions[vertex]
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    #[inline]
    pub fn normal(&self, vertex: usize) -> Vec3 {
        self.normals[vertex]
    }

    /// Vertex loop of a face.
    #[inline]
    pub fn face_vertices(&self, face: usize) -> &[usize] {
        &self.face_loops[self.face_starts[face]..self.face_starts[face + 1]]
    }

    /// Edge neighbours of a vertex, sorted by index.
    #[inline]
    pub fn neighbors(&self, vertex: usize) -> &[usize] {
        &self.neighbors[vertex]
    }

    /// Welded copies of a vertex.
    pub fn duplicates(&self, vertex: usize) -> &[usize] {
        &self.duplicates[vertex]
    }

    /// Edge neighbours followed by welded copies.
    pub fn neighbors_with_duplicates(&self, vertex: usize) -> impl Iterator<Item = Neighbor> + '_ {
        let edges = self.neighbors[vertex].iter().map(|&index| Neighbor {
            index,
            is_duplicate: false,
        });
        let welds = self.duplicates[vertex].iter().map(|&index| Neighbor {
            index,
            is_duplicate: true,
        });
        edges.chain(welds)
    }

    /// Faces using a vertex.
    #[inline]
    pub fn vertex_faces(&self, vertex: usize) -> &[usize] {
        &self.vertex_faces[vertex]
    }

    /// Whether the vertex lies on an edge used by a single face.
    #[inline]
    pub fn is_boundary_vertex(&self, vertex: usize) -> bool {
        self.boundary_vertices[vertex]
    }

    pub fn is_boundary_edge(&self, a: usize, b: usize) -> bool {
        self.boundary_edges.contains(&edge_key(a, b))
    }
}

/// Largest face set id among the faces of a vertex, 0 for faceless vertices.
pub fn vertex_face_set(topology: &MeshTopology, face_sets: &[i32], vertex: usize) -> i32 {
    topology
        .vertex_faces(vertex)
        .iter()
        .map(|&f| face_sets[f])
        .max()
        .unwrap_or(0)
}

/// Read-only view shared by all node workers during a dispatch.
#[derive(Debug, Clone, Copy)]
pub struct MeshView<'a> {
    pub topology: &'a MeshTopology,
    pub face_sets: &'a [i32],
}

impl MeshView<'_> {
    pub fn vertex_face_set(&self, vertex: usize) -> i32 {
        vertex_face_set(self.topology, self.face_sets, vertex)
    }
}

/// Mutable attribute slices of one node.
///
/// `vertices[i]` is the mesh vertex whose values live at `mask[i]` and
/// `colors[i]`.
#[derive(Debug)]
pub struct NodePartitionMut<'a> {
    pub node: NodeId,
    pub vertices: &'a [usize],
    pub mask: &'a mut [f32],
    pub colors: Option<&'a mut [Rgba]>,
}

/// An editable sculpt mesh.
#[derive(Debug, Clone)]
pub struct SculptMesh {
    topology: MeshTopology,
    nodes: NodeTree,
    octree: VertexOctree,
    /// Node order.
    mask: Vec<f32>,
    /// Node order.
    colors: Option<Vec<Rgba>>,
    face_sets: Vec<i32>,
    symmetry: SymmetryFlags,
    active_vertex: Option<usize>,
    active_face: Option<usize>,
}

impl SculptMesh {
    /// Build a mesh from positions and polygon loops.
    pub fn new<F: AsRef<[usize]>>(positions: Vec<Vec3>, faces: &[F]) -> Result<Self, MeshError> {
        Self::with_partition(positions, faces, &PartitionConfig::default())
    }

    /// Build a mesh with a custom node partition.
    pub fn with_partition<F: AsRef<[usize]>>(
        positions: Vec<Vec3>,
        faces: &[F],
        config: &PartitionConfig,
    ) -> Result<Self, MeshError> {
        let topology = MeshTopology::from_faces(positions, faces)?;
        Ok(Self::from_topology(topology, config))
    }

    /// Build a faceless mesh from an edge list.
    pub fn from_edges(positions: Vec<Vec3>, edges: &[[usize; 2]]) -> Result<Self, MeshError> {
        let topology = MeshTopology::from_edges(positions, edges)?;
        Ok(Self::from_topology(topology, &PartitionConfig::default()))
    }

    pub fn from_topology(topology: MeshTopology, config: &PartitionConfig) -> Self {
        let nodes = partition_mesh(&topology, config);
        let octree = VertexOctree::from_vertices(topology.positions().iter().copied().enumerate());
        let vertex_count = topology.vertex_count();
        let face_count = topology.face_count();

        debug!(
            "Created sculpt mesh: {} vertices, {} faces, {} nodes",
            vertex_count,
            face_count,
            nodes.node_count()
        );

        Self {
            topology,
            nodes,
            octree,
            mask: vec![0.0; vertex_count],
            colors: None,
            face_sets: vec![DEFAULT_FACE_SET; face_count],
            symmetry: SymmetryFlags::NONE,
            active_vertex: None,
            active_face: None,
        }
    }

    /// Weld vertex pairs (see [`MeshTopology::add_duplicates`]).
    pub fn with_duplicates(mut self, pairs: &[(usize, usize)]) -> Result<Self, MeshError> {
        self.topology.add_duplicates(pairs)?;
        Ok(self)
    }

    /// Override vertex normals.
    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Result<Self, MeshError> {
        self.topology.set_normals(normals)?;
        Ok(self)
    }

    pub fn with_symmetry(mut self, symmetry: SymmetryFlags) -> Self {
        self.symmetry = symmetry;
        self
    }

    pub fn with_face_sets(mut self, face_sets: &[i32]) -> Result<Self, MeshError> {
        self.set_face_sets(face_sets)?;
        Ok(self)
    }

    pub fn topology(&self) -> &MeshTopology {
        &self.topology
    }

    pub fn node_tree(&self) -> &NodeTree {
        &self.nodes
    }

    pub(crate) fn node_tree_mut(&mut self) -> &mut NodeTree {
        &mut self.nodes
    }

    pub fn vertex_count(&self) -> usize {
        self.topology.vertex_count()
    }

    pub fn face_count(&self) -> usize {
        self.topology.face_count()
    }

    pub fn symmetry(&self) -> SymmetryFlags {
        self.symmetry
    }

    pub fn set_symmetry(&mut self, symmetry: SymmetryFlags) {
        self.symmetry = symmetry;
    }

    // --- Mask ---

    pub fn mask(&self, vertex: usize) -> f32 {
        self.mask[self.nodes.slot_of(vertex)]
    }

    pub fn set_mask(&mut self, vertex: usize, value: f32) {
        let slot = self.nodes.slot_of(vertex);
        self.mask[slot] = value.clamp(0.0, 1.0);
    }

    /// Mask values in vertex order.
    pub fn masks(&self) -> Vec<f32> {
        self.nodes.to_vertex_order(&self.mask)
    }

    /// Replace all mask values (vertex order).
    pub fn set_masks(&mut self, values: &[f32]) -> Result<(), MeshError> {
        self.check_vertex_attribute("mask", values.len())?;
        self.mask = self.nodes.to_slot_order(values);
        Ok(())
    }

    // --- Colors ---

    pub fn has_colors(&self) -> bool {
        self.colors.is_some()
    }

    /// Create the color layer if missing. Returns true when it was created.
    pub fn ensure_color_layer(&mut self) -> bool {
        if self.colors.is_some() {
            return false;
        }
        self.colors = Some(vec![DEFAULT_COLOR; self.vertex_count()]);
        debug!("Created color layer ({} vertices)", self.vertex_count());
        true
    }

    pub fn color(&self, vertex: usize) -> Option<Rgba> {
        let slot = self.nodes.slot_of(vertex);
        self.colors.as_ref().map(|colors| colors[slot])
    }

    /// Color values in vertex order.
    pub fn colors(&self) -> Option<Vec<Rgba>> {
        self.colors
            .as_ref()
            .map(|colors| self.nodes.to_vertex_order(colors))
    }

    /// Replace all colors (vertex order), creating the layer if needed.
    pub fn set_colors(&mut self, values: &[Rgba]) -> Result<(), MeshError> {
        self.check_vertex_attribute("colors", values.len())?;
        self.colors = Some(self.nodes.to_slot_order(values));
        Ok(())
    }

    // --- Face sets ---

    pub fn face_set(&self, face: usize) -> i32 {
        self.face_sets[face]
    }

    pub fn face_sets(&self) -> &[i32] {
        &self.face_sets
    }

    pub(crate) fn face_sets_mut(&mut self) -> &mut [i32] {
        &mut self.face_sets
    }

    pub fn set_face_sets(&mut self, values: &[i32]) -> Result<(), MeshError> {
        if values.len() != self.face_count() {
            return Err(MeshError::AttributeLength {
                attribute: "face_sets",
                expected: self.face_count(),
                actual: values.len(),
            });
        }
        self.face_sets.copy_from_slice(values);
        Ok(())
    }

    pub fn vertex_face_set(&self, vertex: usize) -> i32 {
        vertex_face_set(&self.topology, &self.face_sets, vertex)
    }

    /// Read-only connectivity and face set view.
    pub fn view(&self) -> MeshView<'_> {
        MeshView {
            topology: &self.topology,
            face_sets: &self.face_sets,
        }
    }

    // --- Active element ---

    pub fn active_vertex(&self) -> Option<usize> {
        self.active_vertex
    }

    pub fn active_face(&self) -> Option<usize> {
        self.active_face
    }

    /// Record the element under the cursor.
    pub fn set_active(&mut self, vertex: usize, face: Option<usize>) {
        self.active_vertex = Some(vertex);
        self.active_face = face;
    }

    /// Face set of the active face, falling back to the active vertex.
    pub fn active_face_set(&self) -> i32 {
        match (self.active_face, self.active_vertex) {
            (Some(face), _) => self.face_sets[face],
            (None, Some(vertex)) => self.vertex_face_set(vertex),
            (None, None) => DEFAULT_FACE_SET,
        }
    }

    // --- Spatial queries ---

    /// Closest vertex to `point` within `max_distance`.
    pub fn nearest_vertex(&self, point: Vec3, max_distance: f32) -> Option<usize> {
        self.octree.nearest(point, max_distance)
    }

    /// Seed vertex of every valid symmetry pass, identity pass first.
    ///
    /// Mirrored passes use the vertex nearest to the mirrored position.
    /// A vertex found by several passes is listed once.
    pub fn symmetry_vertices(&self, vertex: usize) -> Vec<usize> {
        let origin = self.topology.position(vertex);
        let mut seeds = Vec::new();
        for pass in self.symmetry.passes() {
            let found = if pass == 0 {
                Some(vertex)
            } else {
                self.nearest_vertex(flip(origin, pass), f32::INFINITY)
            };
            if let Some(seed) = found
                && !seeds.contains(&seed)
            {
                seeds.push(seed);
            }
        }
        seeds
    }

    // --- Nodes ---

    /// Ids of all nodes, covering the whole mesh.
    pub fn gather_nodes(&self) -> Vec<NodeId> {
        self.nodes.gather_all()
    }

    /// Drain nodes that need a redraw.
    pub fn take_dirty_nodes(&mut self) -> Vec<NodeId> {
        self.nodes.take_dirty_nodes()
    }

    /// Raw mask bytes of a node, for GPU upload.
    pub fn node_mask_bytes(&self, id: NodeId) -> &[u8] {
        match self.nodes.node(id) {
            Some(node) => bytemuck::cast_slice(&self.mask[node.vertex_range.clone()]),
            None => &[],
        }
    }

    /// Raw color bytes of a node, for GPU upload.
    pub fn node_color_bytes(&self, id: NodeId) -> Option<&[u8]> {
        let node = self.nodes.node(id)?;
        let colors = self.colors.as_ref()?;
        Some(bytemuck::cast_slice(&colors[node.vertex_range.clone()]))
    }

    /// Split the mesh into a shared read-only view and one mutable attribute
    /// partition per node.
    pub fn split_partitions_mut(&mut self) -> (MeshView<'_>, Vec<NodePartitionMut<'_>>) {
        let Self {
            topology,
            nodes,
            mask,
            colors,
            face_sets,
            ..
        } = self;
        let nodes: &NodeTree = nodes;

        let mut mask_rest: &mut [f32] = mask.as_mut_slice();
        let mut color_rest: Option<&mut [Rgba]> = colors.as_deref_mut();
        let mut partitions = Vec::with_capacity(nodes.node_count());

        for node in nodes.nodes() {
            let len = node.vertex_count();
            let (node_mask, tail) = std::mem::take(&mut mask_rest).split_at_mut(len);
            mask_rest = tail;

            let node_colors = match color_rest.take() {
                Some(rest) => {
                    let (head, tail) = rest.split_at_mut(len);
                    color_rest = Some(tail);
                    Some(head)
                }
                None => None,
            };

            partitions.push(NodePartitionMut {
                node: node.id,
                vertices: &nodes.order[node.vertex_range.clone()],
                mask: node_mask,
                colors: node_colors,
            });
        }

        let view = MeshView {
            topology,
            face_sets: face_sets.as_slice(),
        };
        (view, partitions)
    }

    fn check_vertex_attribute(&self, attribute: &'static str, len: usize) -> Result<(), MeshError> {
        if len != self.vertex_count() {
            return Err(MeshError::AttributeLength {
                attribute,
                expected: self.vertex_count(),
                actual: len,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{
        centered_grid_mesh, cylinder_mesh, grid_mesh, grid_mesh_partitioned, grid_topology,
    };

    #[test]
    fn test_grid_connectivity() {
        let topology = grid_topology(2, 2);
        assert_eq!(topology.vertex_count(), 9);
        assert_eq!(topology.face_count(), 4);
        // Center vertex touches all four quads
        assert_eq!(topology.neighbors(4), &[1, 3, 5, 7]);
        assert_eq!(topology.vertex_faces(4).len(), 4);
        assert_eq!(topology.neighbors(0), &[1, 3]);
    }

    #[test]
    fn test_grid_boundary() {
        let topology = grid_topology(2, 2);
        for v in 0..9 {
            assert_eq!(topology.is_boundary_vertex(v), v != 4, "vertex {v}");
        }
        assert!(topology.is_boundary_edge(0, 1));
        assert!(topology.is_boundary_edge(1, 0));
        assert!(!topology.is_boundary_edge(1, 4));
    }

    #[test]
    fn test_flat_grid_normals_point_up() {
        let topology = grid_topology(3, 2);
        for v in 0..topology.vertex_count() {
            assert!((topology.normal(v) - Vec3::Z).length() < 1e-5);
        }
    }

    #[test]
    fn test_cylinder_has_two_boundary_rings() {
        let mesh = cylinder_mesh(8, 3);
        let boundary = (0..mesh.vertex_count())
            .filter(|&v| mesh.topology().is_boundary_vertex(v))
            .count();
        assert_eq!(boundary, 16);
    }

    #[test]
    fn test_rejects_degenerate_face() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        let result = MeshTopology::from_faces(positions, &[vec![0, 1]]);
        assert!(matches!(
            result,
            Err(MeshError::DegenerateFace { face: 0, count: 2 })
        ));
    }

    #[test]
    fn test_rejects_out_of_range_face() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        let result = MeshTopology::from_faces(positions, &[[0, 1, 7]]);
        assert!(matches!(
            result,
            Err(MeshError::FaceIndexOutOfRange { vertex: 7, .. })
        ));
    }

    #[test]
    fn test_rejects_out_of_range_edge() {
        let result = MeshTopology::from_edges(vec![Vec3::ZERO, Vec3::X], &[[0, 2]]);
        assert!(matches!(result, Err(MeshError::EdgeIndexOutOfRange { .. })));
    }

    #[test]
    fn test_duplicates_are_flagged() {
        let mesh = grid_mesh(2, 1).with_duplicates(&[(0, 2)]).unwrap();
        let neighbors: Vec<Neighbor> = mesh.topology().neighbors_with_duplicates(0).collect();
        assert!(neighbors.contains(&Neighbor {
            index: 2,
            is_duplicate: true
        }));
        assert!(neighbors.contains(&Neighbor {
            index: 1,
            is_duplicate: false
        }));
    }

    #[test]
    fn test_mask_round_trip_through_node_order() {
        let mut mesh = grid_mesh_partitioned(6, 4, 3);
        assert!(mesh.node_tree().node_count() > 1);
        let values: Vec<f32> = (0..mesh.vertex_count())
            .map(|v| v as f32 / mesh.vertex_count() as f32)
            .collect();
        mesh.set_masks(&values).unwrap();
        assert_eq!(mesh.masks(), values);
        assert_eq!(mesh.mask(5), values[5]);
    }

    #[test]
    fn test_set_masks_length_mismatch() {
        let mut mesh = grid_mesh(2, 2);
        let result = mesh.set_masks(&[0.0; 3]);
        assert!(matches!(
            result,
            Err(MeshError::AttributeLength { attribute: "mask", .. })
        ));
    }

    #[test]
    fn test_split_partitions_cover_every_vertex() {
        let mut mesh = grid_mesh_partitioned(6, 4, 3);
        mesh.ensure_color_layer();
        {
            let (_view, partitions) = mesh.split_partitions_mut();
            for partition in partitions {
                assert_eq!(partition.vertices.len(), partition.mask.len());
                for (i, &v) in partition.vertices.iter().enumerate() {
                    partition.mask[i] = v as f32;
                }
                if let Some(colors) = partition.colors {
                    for (i, &v) in partition.vertices.iter().enumerate() {
                        colors[i] = [v as f32, 0.0, 0.0, 1.0];
                    }
                }
            }
        }
        for v in 0..mesh.vertex_count() {
            assert_eq!(mesh.mask(v), v as f32);
            assert_eq!(mesh.color(v).map(|c| c[0]), Some(v as f32));
        }
    }

    #[test]
    fn test_node_bytes() {
        let mut mesh = grid_mesh(2, 2);
        let node = mesh.gather_nodes()[0];
        assert_eq!(mesh.node_mask_bytes(node).len(), 9 * 4);
        assert!(mesh.node_color_bytes(node).is_none());
        mesh.ensure_color_layer();
        assert_eq!(mesh.node_color_bytes(node).map(<[u8]>::len), Some(9 * 16));
    }

    #[test]
    fn test_vertex_face_set_is_largest_adjacent() {
        let mesh = grid_mesh(2, 1).with_face_sets(&[3, 7]).unwrap();
        // Vertex 1 is shared by both quads
        assert_eq!(mesh.vertex_face_set(1), 7);
        assert_eq!(mesh.vertex_face_set(0), 3);
    }

    #[test]
    fn test_symmetry_vertices_find_mirror() {
        let mesh = centered_grid_mesh(4, 2);
        // Vertex 0 sits at x = -2, its mirror at x = 2 is vertex 4
        assert_eq!(mesh.symmetry_vertices(0), vec![0, 4]);
        // The center column mirrors onto itself
        assert_eq!(mesh.symmetry_vertices(2), vec![2]);
    }

    #[test]
    fn test_active_face_set_fallbacks() {
        let mut mesh = grid_mesh(2, 1).with_face_sets(&[3, 7]).unwrap();
        assert_eq!(mesh.active_face_set(), DEFAULT_FACE_SET);
        mesh.set_active(0, None);
        assert_eq!(mesh.active_face_set(), 3);
        mesh.set_active(0, Some(1));
        assert_eq!(mesh.active_face_set(), 7);
    }
}
