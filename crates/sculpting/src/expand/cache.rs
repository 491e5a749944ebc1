//! Expand cache: the state of one running expand session.

use super::falloff::{compute_falloff, face_falloff, max_finite};
use crate::chunking::NodeId;
use crate::color::{linear_fill_color, Rgba};
use crate::floodfill::FloodFill;
use crate::mesh::geodesic::geodesic_distances;
use crate::mesh::SculptMesh;
use glam::Vec2;
use sculpting_config::{BlendMode, ExpandOptions, ExpandTarget, FalloffTuning, FalloffType};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Pointer positions captured when moving the expand origin is toggled on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveAnchor {
    /// Pointer position when the move started
    pub initial_mouse_move: Vec2,
    /// Seed pointer position when the move started
    pub original_mouse_move: Vec2,
}

/// Session state: falloff field, threshold, toggles and snapshots.
///
/// Owned by [`ExpandSession`](super::ExpandSession) and dropped in one piece
/// when the session is confirmed or cancelled.
#[derive(Debug, Clone)]
pub struct ExpandCache {
    pub(crate) target: ExpandTarget,

    pub(crate) falloff: Vec<f32>,
    /// Only computed for [`ExpandTarget::FaceSets`]
    pub(crate) face_falloff: Vec<f32>,
    pub(crate) max_falloff: f32,
    pub(crate) max_face_falloff: f32,
    pub(crate) active_factor: f32,
    pub(crate) falloff_type: FalloffType,
    pub(crate) tuning: FalloffTuning,

    pub(crate) invert: bool,
    pub(crate) preserve: bool,
    pub(crate) falloff_gradient: bool,
    pub(crate) modify_active: bool,
    pub(crate) expand_from_active: bool,
    /// Face sets enabled while snapping; `Some` exactly when snap is on
    pub(crate) snap_enabled_face_sets: Option<HashSet<i32>>,
    /// `Some` exactly when moving the origin is on
    pub(crate) move_anchor: Option<MoveAnchor>,

    pub(crate) initial_mask: Vec<f32>,
    /// Base ids the face set target composes onto
    pub(crate) initial_face_sets: Vec<i32>,
    pub(crate) initial_color: Option<Vec<Rgba>>,
    pub(crate) next_face_set: i32,

    pub(crate) nodes: Vec<NodeId>,
    pub(crate) initial_active_vertex: usize,
    pub(crate) initial_active_face_set: i32,
    pub(crate) initial_mouse: Vec2,

    pub(crate) fill_color: Rgba,
    pub(crate) blend_mode: BlendMode,
}

impl ExpandCache {
    /// Create a cache from options and snapshot the mesh attributes.
    ///
    /// The falloff field starts empty; seed it with [`Self::set_falloff`].
    pub fn new(options: &ExpandOptions, mesh: &SculptMesh, seed: usize) -> Self {
        let initial_color = match options.target {
            ExpandTarget::Colors => mesh.colors(),
            _ => None,
        };

        Self {
            target: options.target,
            falloff: Vec::new(),
            face_falloff: Vec::new(),
            max_falloff: f32::NEG_INFINITY,
            max_face_falloff: f32::NEG_INFINITY,
            active_factor: f32::NEG_INFINITY,
            falloff_type: FalloffType::Geodesic,
            tuning: options.falloff.clone(),
            invert: options.invert,
            preserve: options.use_mask_preserve,
            falloff_gradient: options.use_falloff_gradient,
            modify_active: options.use_modify_active,
            expand_from_active: options.use_expand_from_active,
            snap_enabled_face_sets: None,
            move_anchor: None,
            initial_mask: mesh.masks(),
            initial_face_sets: mesh.face_sets().to_vec(),
            initial_color,
            next_face_set: 0,
            nodes: mesh.gather_nodes(),
            initial_active_vertex: seed,
            initial_active_face_set: mesh.active_face_set(),
            initial_mouse: Vec2::ZERO,
            fill_color: linear_fill_color(options.fill.color),
            blend_mode: options.fill.blend_mode,
        }
    }

    /// Recompute the falloff field with `metric` from `vertex`.
    pub fn set_falloff(&mut self, mesh: &SculptMesh, vertex: usize, metric: FalloffType) {
        let values = compute_falloff(mesh, metric, vertex, &self.tuning);
        self.falloff_type = metric;
        self.replace_falloff(mesh, values);
    }

    /// Install a falloff field and refresh the derived maxima (and the face
    /// field for the face set target). The metric tag is left unchanged.
    pub(crate) fn replace_falloff(&mut self, mesh: &SculptMesh, values: Vec<f32>) {
        self.falloff = values;
        self.max_falloff = max_finite(&self.falloff);

        if self.target == ExpandTarget::FaceSets {
            self.face_falloff = face_falloff(mesh.topology(), &self.falloff);
            self.max_face_falloff = max_finite(&self.face_falloff);
        }

        debug!(
            "Expand falloff {:?}: max factor {}, {} vertices",
            self.falloff_type,
            self.max_falloff,
            self.falloff.len()
        );
    }

    /// Restart propagation from the edge of the current region.
    ///
    /// Enabled vertices with a disabled neighbour become the new seeds and
    /// the field is replaced by the surface distance from them. The metric
    /// tag is kept. Returns false (field unchanged) when the region has no
    /// edge.
    pub fn recursion_step(&mut self, mesh: &SculptMesh) -> bool {
        let topology = mesh.topology();
        let enabled = self.enabled_vertices(&mesh.view());

        let seeds: Vec<usize> = (0..topology.vertex_count())
            .filter(|&v| enabled[v] && topology.neighbors(v).iter().any(|&n| !enabled[n]))
            .collect();

        if seeds.is_empty() {
            warn!("Expand recursion step skipped: the enabled region has no boundary");
            return false;
        }

        let mut flood = FloodFill::new(topology.vertex_count());
        for &seed in &seeds {
            flood.add_initial(seed);
        }
        let mut reachable = seeds.len();
        flood.execute(topology, |_, _, _| {
            reachable += 1;
            true
        });
        debug!(
            "Expand recursion step: {} seeds, {} vertices reachable",
            seeds.len(),
            reachable
        );

        let values = geodesic_distances(topology, &seeds, f32::INFINITY);
        self.replace_falloff(mesh, values);
        true
    }

    /// Set the threshold from the vertex under the pointer.
    ///
    /// Off-mesh pointers and unreached vertices use the maximum factor.
    pub fn set_active_factor_for_vertex(&mut self, vertex: Option<usize>) {
        self.active_factor = vertex
            .and_then(|v| self.falloff.get(v).copied())
            .filter(|f| f.is_finite())
            .unwrap_or(self.max_falloff);
    }

    pub fn target(&self) -> ExpandTarget {
        self.target
    }

    pub fn falloff(&self) -> &[f32] {
        &self.falloff
    }

    pub fn face_falloff(&self) -> &[f32] {
        &self.face_falloff
    }

    pub fn max_falloff(&self) -> f32 {
        self.max_falloff
    }

    pub fn max_face_falloff(&self) -> f32 {
        self.max_face_falloff
    }

    pub fn active_factor(&self) -> f32 {
        self.active_factor
    }

    pub fn falloff_type(&self) -> FalloffType {
        self.falloff_type
    }

    pub fn invert(&self) -> bool {
        self.invert
    }

    pub fn preserve(&self) -> bool {
        self.preserve
    }

    pub fn falloff_gradient(&self) -> bool {
        self.falloff_gradient
    }

    pub fn snap(&self) -> bool {
        self.snap_enabled_face_sets.is_some()
    }

    pub fn snap_enabled_face_sets(&self) -> Option<&HashSet<i32>> {
        self.snap_enabled_face_sets.as_ref()
    }

    pub fn is_moving(&self) -> bool {
        self.move_anchor.is_some()
    }

    pub fn move_anchor(&self) -> Option<MoveAnchor> {
        self.move_anchor
    }

    pub fn modify_active(&self) -> bool {
        self.modify_active
    }

    pub fn expand_from_active(&self) -> bool {
        self.expand_from_active
    }

    pub fn next_face_set(&self) -> i32 {
        self.next_face_set
    }

    pub fn initial_face_sets(&self) -> &[i32] {
        &self.initial_face_sets
    }

    pub fn initial_mask(&self) -> &[f32] {
        &self.initial_mask
    }

    pub fn initial_active_vertex(&self) -> usize {
        self.initial_active_vertex
    }

    pub fn initial_active_face_set(&self) -> i32 {
        self.initial_active_face_set
    }

    pub fn initial_mouse(&self) -> Vec2 {
        self.initial_mouse
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn fill_color(&self) -> Rgba {
        self.fill_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{grid_mesh, line_mesh};

    #[test]
    fn test_new_snapshots_attributes() {
        let mut mesh = grid_mesh(2, 2);
        mesh.set_mask(3, 0.4);
        let cache = ExpandCache::new(&ExpandOptions::mask(), &mesh, 0);
        assert_eq!(cache.initial_mask()[3], 0.4);
        assert_eq!(cache.initial_face_sets(), &[1, 1, 1, 1]);
        assert_eq!(cache.nodes().len(), mesh.node_tree().node_count());
        assert!(!cache.snap());
        assert!(!cache.is_moving());
    }

    #[test]
    fn test_fill_color_is_linear() {
        let mut options = ExpandOptions::default();
        options.fill.color = [0.5, 0.0, 1.0];
        let cache = ExpandCache::new(&options, &grid_mesh(1, 1), 0);
        let fill = cache.fill_color();
        assert!((fill[0] - 0.214_041).abs() < 1e-4);
        assert_eq!(fill[1], 0.0);
        assert!((fill[2] - 1.0).abs() < 1e-6);
        assert_eq!(fill[3], 1.0);
    }

    #[test]
    fn test_set_falloff_updates_maxima() {
        let mesh = line_mesh(5);
        let mut cache = ExpandCache::new(&ExpandOptions::mask(), &mesh, 2);
        cache.set_falloff(&mesh, 2, FalloffType::Topology);
        assert_eq!(cache.falloff_type(), FalloffType::Topology);
        assert_eq!(cache.falloff(), &[2.0, 1.0, 0.0, 1.0, 2.0]);
        assert_eq!(cache.max_falloff(), 2.0);
        // Face field only exists for the face set target
        assert!(cache.face_falloff().is_empty());
    }

    #[test]
    fn test_face_field_for_face_set_target() {
        let mesh = grid_mesh(2, 1);
        let mut cache = ExpandCache::new(&ExpandOptions::default(), &mesh, 0);
        cache.set_falloff(&mesh, 0, FalloffType::Topology);
        assert_eq!(cache.face_falloff(), &[1.0, 2.0]);
        assert_eq!(cache.max_face_falloff(), 2.0);
    }

    #[test]
    fn test_active_factor_fallbacks() {
        let mesh = line_mesh(5);
        let mut cache = ExpandCache::new(&ExpandOptions::mask(), &mesh, 2);
        cache.replace_falloff(&mesh, vec![0.0, 1.0, f32::INFINITY, 3.0, 4.0]);

        cache.set_active_factor_for_vertex(Some(1));
        assert_eq!(cache.active_factor(), 1.0);
        cache.set_active_factor_for_vertex(None);
        assert_eq!(cache.active_factor(), 4.0);
        cache.set_active_factor_for_vertex(Some(2));
        assert_eq!(cache.active_factor(), 4.0);
    }

    #[test]
    fn test_recursion_step_seeds_from_region_edge() {
        let mesh = line_mesh(7);
        let mut cache = ExpandCache::new(&ExpandOptions::mask(), &mesh, 3);
        cache.set_falloff(&mesh, 3, FalloffType::Topology);
        cache.set_active_factor_for_vertex(Some(2));

        assert!(cache.recursion_step(&mesh));
        // Vertices 2 and 4 were the edge of the region {2, 3, 4}
        assert_eq!(cache.falloff(), &[2.0, 1.0, 0.0, 1.0, 0.0, 1.0, 2.0]);
        assert_eq!(cache.falloff_type(), FalloffType::Topology);
        assert_eq!(cache.max_falloff(), 2.0);
    }

    #[test]
    fn test_recursion_step_without_edge_keeps_field() {
        let mesh = line_mesh(3);
        let mut cache = ExpandCache::new(&ExpandOptions::mask(), &mesh, 1);
        cache.set_falloff(&mesh, 1, FalloffType::Topology);
        cache.set_active_factor_for_vertex(None);

        assert!(!cache.recursion_step(&mesh));
        assert_eq!(cache.falloff(), &[1.0, 0.0, 1.0]);
    }
}
