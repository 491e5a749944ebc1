//! Update dispatcher: writes the expanded region into the target attribute.
//!
//! Mask and color passes run in parallel, one task per node, each task
//! owning its node's attribute slices. Face sets are written serially since
//! faces are not owned by a single node.

use super::cache::ExpandCache;
use crate::chunking::{NodeId, PartitionNode};
use crate::color::{blend_color, scale_color, Rgba};
use crate::mesh::{MeshView, NodePartitionMut, SculptMesh, DEFAULT_COLOR};
use rayon::prelude::*;
use sculpting_config::ExpandTarget;
use std::collections::HashSet;
use tracing::trace;

/// Outcome of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateSummary {
    pub target: ExpandTarget,
    /// Nodes whose data was flagged as changed
    pub nodes_changed: usize,
    /// Vertices (mask, colors) or faces (face sets) whose value changed
    pub elements_changed: usize,
}

impl ExpandCache {
    /// Recompute the target data for the vertex under the pointer.
    ///
    /// `None` means the pointer is off the mesh; the threshold then becomes
    /// the maximum falloff. Every cached node is flagged for redraw.
    pub fn update_for_vertex(
        &mut self,
        mesh: &mut SculptMesh,
        vertex: Option<usize>,
    ) -> UpdateSummary {
        self.set_active_factor_for_vertex(vertex);

        let summary = match self.target {
            ExpandTarget::Mask => {
                let changed = self.dispatch_nodes(mesh, |cache, view, part| {
                    cache.update_mask_node(view, part)
                });
                self.mark_changed(
                    mesh,
                    ExpandTarget::Mask,
                    &changed,
                    PartitionNode::mark_update_mask,
                )
            }
            ExpandTarget::Colors => {
                let changed = self.dispatch_nodes(mesh, |cache, view, part| {
                    cache.update_color_node(view, part)
                });
                self.mark_changed(
                    mesh,
                    ExpandTarget::Colors,
                    &changed,
                    PartitionNode::mark_update_color,
                )
            }
            ExpandTarget::FaceSets => self.update_face_sets(mesh),
        };

        let tree = mesh.node_tree_mut();
        for &id in &self.nodes {
            if let Some(node) = tree.node_mut(id) {
                node.mark_redraw();
            }
        }

        trace!(
            "Expand update {:?}: factor {}, {} nodes, {} elements changed",
            summary.target,
            self.active_factor,
            summary.nodes_changed,
            summary.elements_changed
        );
        summary
    }

    /// Run `update` on every node partition in parallel, collecting the
    /// number of changed vertices per node.
    fn dispatch_nodes<F>(&self, mesh: &mut SculptMesh, update: F) -> Vec<(NodeId, usize)>
    where
        F: Fn(&ExpandCache, &MeshView<'_>, NodePartitionMut<'_>) -> usize + Sync,
    {
        let cached: HashSet<NodeId> = self.nodes.iter().copied().collect();
        let (view, partitions) = mesh.split_partitions_mut();
        partitions
            .into_par_iter()
            .filter(|part| cached.contains(&part.node))
            .map(|part| {
                let node = part.node;
                (node, update(self, &view, part))
            })
            .collect()
    }

    fn mark_changed(
        &self,
        mesh: &mut SculptMesh,
        target: ExpandTarget,
        changed: &[(NodeId, usize)],
        mark: fn(&mut PartitionNode),
    ) -> UpdateSummary {
        let tree = mesh.node_tree_mut();
        let mut nodes_changed = 0;
        let mut elements_changed = 0;
        for &(id, count) in changed {
            if count == 0 {
                continue;
            }
            if let Some(node) = tree.node_mut(id) {
                mark(node);
            }
            nodes_changed += 1;
            elements_changed += count;
        }
        UpdateSummary {
            target,
            nodes_changed,
            elements_changed,
        }
    }

    fn update_mask_node(&self, view: &MeshView<'_>, part: NodePartitionMut<'_>) -> usize {
        let mut changed = 0;
        for (slot, &v) in part.vertices.iter().enumerate() {
            let mut new_mask = if self.is_vertex_enabled(view, v) {
                self.gradient_fade(v)
            } else {
                0.0
            };
            if self.preserve {
                new_mask = new_mask.max(self.initial_mask[v]);
            }
            let new_mask = new_mask.clamp(0.0, 1.0);

            if part.mask[slot] != new_mask {
                part.mask[slot] = new_mask;
                changed += 1;
            }
        }
        changed
    }

    fn update_color_node(&self, view: &MeshView<'_>, part: NodePartitionMut<'_>) -> usize {
        let Some(colors) = part.colors else {
            return 0;
        };

        let mut changed = 0;
        for (slot, &v) in part.vertices.iter().enumerate() {
            let fade = if self.is_vertex_enabled(view, v) {
                self.gradient_fade(v)
            } else {
                0.0
            };
            let fade = (fade * (1.0 - part.mask[slot])).clamp(0.0, 1.0);

            let initial: Rgba = self
                .initial_color
                .as_ref()
                .map_or(DEFAULT_COLOR, |initial| initial[v]);
            let color = blend_color(initial, scale_color(self.fill_color, fade), self.blend_mode);

            if colors[slot] != color {
                colors[slot] = color;
                changed += 1;
            }
        }
        changed
    }

    fn update_face_sets(&self, mesh: &mut SculptMesh) -> UpdateSummary {
        let previous = mesh.face_sets().to_vec();
        mesh.face_sets_mut().copy_from_slice(&self.initial_face_sets);

        let view = mesh.view();
        let enabled: Vec<usize> = (0..mesh.face_count())
            .filter(|&f| self.is_face_enabled(&view, f))
            .collect();

        let face_sets = mesh.face_sets_mut();
        for f in enabled {
            face_sets[f] = if self.preserve {
                face_sets[f].wrapping_add(self.next_face_set)
            } else {
                self.next_face_set
            };
        }

        let elements_changed = previous
            .iter()
            .zip(mesh.face_sets())
            .filter(|(before, after)| before != after)
            .count();

        let tree = mesh.node_tree_mut();
        for &id in &self.nodes {
            if let Some(node) = tree.node_mut(id) {
                node.mark_update_mask();
            }
        }

        UpdateSummary {
            target: ExpandTarget::FaceSets,
            nodes_changed: self.nodes.len(),
            elements_changed,
        }
    }
}
