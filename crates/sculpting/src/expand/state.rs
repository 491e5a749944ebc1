//! Enabled-state decisions and gradient fade.

use super::cache::ExpandCache;
use crate::mesh::MeshView;

impl ExpandCache {
    /// Whether `vertex` lies inside the expanded region.
    ///
    /// With snapping, membership follows the vertex face set; otherwise the
    /// falloff is compared with the active factor. Unreached vertices are
    /// never within a finite threshold.
    pub fn is_vertex_enabled(&self, view: &MeshView<'_>, vertex: usize) -> bool {
        let enabled = match &self.snap_enabled_face_sets {
            Some(face_sets) => face_sets.contains(&view.vertex_face_set(vertex)),
            None => self.falloff[vertex] <= self.active_factor,
        };
        enabled != self.invert
    }

    /// Whether `face` lies inside the expanded region.
    pub fn is_face_enabled(&self, view: &MeshView<'_>, face: usize) -> bool {
        let enabled = match &self.snap_enabled_face_sets {
            Some(face_sets) => face_sets.contains(&view.face_sets[face]),
            None => self
                .face_falloff
                .get(face)
                .is_some_and(|&falloff| falloff <= self.active_factor),
        };
        enabled != self.invert
    }

    /// Gradient strength of an enabled vertex, in `[0, 1]`.
    ///
    /// Degenerate divisions (zero threshold, or threshold at the maximum when
    /// inverted) give full strength.
    pub fn gradient_fade(&self, vertex: usize) -> f32 {
        if !self.falloff_gradient {
            return 1.0;
        }

        let falloff = self.falloff[vertex];
        let fade = if self.invert {
            (falloff - self.active_factor) / (self.max_falloff - self.active_factor)
        } else {
            1.0 - falloff / self.active_factor
        };

        if fade.is_finite() {
            fade.clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Enabled flag of every vertex.
    pub fn enabled_vertices(&self, view: &MeshView<'_>) -> Vec<bool> {
        (0..view.topology.vertex_count())
            .map(|v| self.is_vertex_enabled(view, v))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{grid_mesh, line_mesh};
    use crate::mesh::SculptMesh;
    use sculpting_config::{ExpandOptions, FalloffType};
    use std::collections::HashSet;

    fn line_cache(mesh: &SculptMesh, active_factor: f32, invert: bool) -> ExpandCache {
        let mut options = ExpandOptions::mask();
        options.invert = invert;
        let mut cache = ExpandCache::new(&options, mesh, 2);
        cache.set_falloff(mesh, 2, FalloffType::Topology);
        cache.active_factor = active_factor;
        cache
    }

    fn enabled_set(cache: &ExpandCache, mesh: &SculptMesh) -> Vec<usize> {
        let view = mesh.view();
        (0..mesh.vertex_count())
            .filter(|&v| cache.is_vertex_enabled(&view, v))
            .collect()
    }

    #[test]
    fn test_line_threshold_scenario() {
        let mesh = line_mesh(5);
        let cache = line_cache(&mesh, 1.0, false);
        assert_eq!(cache.falloff(), &[2.0, 1.0, 0.0, 1.0, 2.0]);
        assert_eq!(enabled_set(&cache, &mesh), vec![1, 2, 3]);

        let inverted = line_cache(&mesh, 1.0, true);
        assert_eq!(enabled_set(&inverted, &mesh), vec![0, 4]);
    }

    #[test]
    fn test_enabled_state_is_idempotent() {
        let mesh = line_mesh(5);
        let cache = line_cache(&mesh, 1.0, false);
        let view = mesh.view();
        let first = cache.enabled_vertices(&view);
        let second = cache.enabled_vertices(&view);
        assert_eq!(first, second);
    }

    #[test]
    fn test_invert_flips_every_vertex() {
        let mesh = grid_mesh(3, 3);
        let mut cache = ExpandCache::new(&ExpandOptions::mask(), &mesh, 0);
        cache.set_falloff(&mesh, 0, FalloffType::Geodesic);
        cache.active_factor = 1.5;

        let view = mesh.view();
        let before = cache.enabled_vertices(&view);
        cache.invert = !cache.invert;
        let after = cache.enabled_vertices(&view);
        for (b, a) in before.iter().zip(&after) {
            assert_ne!(b, a);
        }
    }

    #[test]
    fn test_unreached_vertices_stay_disabled() {
        let mesh = line_mesh(3);
        let mut cache = ExpandCache::new(&ExpandOptions::mask(), &mesh, 0);
        cache.replace_falloff(&mesh, vec![0.0, 1.0, f32::INFINITY]);
        cache.set_active_factor_for_vertex(None);
        let view = mesh.view();
        assert!(cache.is_vertex_enabled(&view, 1));
        assert!(!cache.is_vertex_enabled(&view, 2));
    }

    #[test]
    fn test_snap_uses_face_set_membership() {
        // Left column of faces in set 2, right column in set 3
        let mesh = grid_mesh(2, 1).with_face_sets(&[2, 3]).unwrap();
        let mut cache = ExpandCache::new(&ExpandOptions::default(), &mesh, 0);
        cache.invert = false;
        cache.set_falloff(&mesh, 0, FalloffType::Topology);
        cache.active_factor = 0.0;
        cache.snap_enabled_face_sets = Some(HashSet::from([2]));

        let view = mesh.view();
        assert!(cache.is_face_enabled(&view, 0));
        assert!(!cache.is_face_enabled(&view, 1));
        // Vertex 0 only touches face 0; vertex 1 takes the larger id 3
        assert!(cache.is_vertex_enabled(&view, 0));
        assert!(!cache.is_vertex_enabled(&view, 1));
    }

    #[test]
    fn test_face_threshold() {
        let mesh = grid_mesh(2, 1);
        let mut cache = ExpandCache::new(&ExpandOptions::default(), &mesh, 0);
        cache.invert = false;
        cache.set_falloff(&mesh, 0, FalloffType::Topology);
        cache.active_factor = 1.0;
        let view = mesh.view();
        assert!(cache.is_face_enabled(&view, 0));
        assert!(!cache.is_face_enabled(&view, 1));
    }

    #[test]
    fn test_gradient_fade() {
        let mesh = line_mesh(5);
        let mut cache = line_cache(&mesh, 2.0, false);
        assert_eq!(cache.gradient_fade(3), 1.0);

        cache.falloff_gradient = true;
        assert_eq!(cache.gradient_fade(2), 1.0);
        assert_eq!(cache.gradient_fade(3), 0.5);
        assert_eq!(cache.gradient_fade(4), 0.0);

        cache.invert = true;
        cache.active_factor = 1.0;
        assert_eq!(cache.gradient_fade(4), 1.0);
        assert_eq!(cache.gradient_fade(3), 0.0);
    }

    #[test]
    fn test_gradient_fade_degenerate_divisions() {
        let mesh = line_mesh(5);
        let mut cache = line_cache(&mesh, 0.0, false);
        cache.falloff_gradient = true;
        // 0 / 0 at the seed
        assert_eq!(cache.gradient_fade(2), 1.0);
        // 1 - 2 / 0 = -inf
        assert_eq!(cache.gradient_fade(4), 1.0);

        cache.invert = true;
        cache.active_factor = cache.max_falloff;
        assert_eq!(cache.gradient_fade(0), 1.0);
        assert_eq!(cache.gradient_fade(2), 1.0);
    }
}
