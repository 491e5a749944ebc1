//! Face set utilities used by the expand session.

use super::cache::ExpandCache;
use crate::mesh::{MeshTopology, MeshView};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Smallest id not in use: one past the largest absolute id, at least 1.
pub fn next_available_face_set(face_sets: &[i32]) -> i32 {
    let max = face_sets
        .iter()
        .map(|id| id.saturating_abs())
        .max()
        .unwrap_or(0);
    max.saturating_add(1).max(1)
}

/// Remove `delete_id` by merging its faces into neighbouring face sets.
///
/// Each wave reassigns every face that touches (through a shared vertex) a
/// face with a different id. Assignments take effect immediately, so a wave
/// can propagate through several faces. Stops when no face carries the id
/// or a wave makes no progress. Returns true when the id is gone.
pub fn delete_face_set_id(topology: &MeshTopology, face_sets: &mut [i32], delete_id: i32) -> bool {
    let mut queue: Vec<usize> = (0..face_sets.len())
        .filter(|&f| face_sets[f] == delete_id)
        .collect();
    let initial = queue.len();

    while !queue.is_empty() {
        let mut next = Vec::new();

        for &face in &queue {
            let other_id = topology
                .face_vertices(face)
                .iter()
                .flat_map(|&v| topology.vertex_faces(v))
                .map(|&neighbor| face_sets[neighbor])
                .filter(|&id| id != delete_id)
                .last();

            match other_id {
                Some(id) => face_sets[face] = id,
                None => next.push(face),
            }
        }

        if next.len() == queue.len() {
            warn!(
                "Face set {} could not be merged: {} faces have no other neighbour id",
                delete_id,
                next.len()
            );
            return false;
        }
        queue = next;
    }

    debug!("Merged face set {} ({} faces) into its neighbours", delete_id, initial);
    true
}

impl ExpandCache {
    /// Face sets whose faces are entirely inside the current threshold.
    ///
    /// The region is evaluated without snapping or inversion; ids come from
    /// the working base face sets.
    pub(crate) fn snap_face_sets_from_enabled(&self, view: &MeshView<'_>) -> HashSet<i32> {
        let enabled: Vec<bool> = (0..view.topology.vertex_count())
            .map(|v| self.falloff[v] <= self.active_factor)
            .collect();

        let mut face_sets: HashSet<i32> = self.initial_face_sets.iter().copied().collect();
        for face in 0..view.topology.face_count() {
            let any_disabled = view
                .topology
                .face_vertices(face)
                .iter()
                .any(|&v| !enabled[v]);
            if any_disabled {
                face_sets.remove(&self.initial_face_sets[face]);
            }
        }
        face_sets
    }
}
