//! Undo support for expand sessions.
//!
//! An [`UndoEntry`] captures the attribute an expand session is about to
//! write, before the first write happens. Confirmed sessions push their entry
//! onto the [`UndoStack`]; cancelled sessions restore it directly.

use crate::color::Rgba;
use crate::error::MeshError;
use crate::mesh::SculptMesh;
use sculpting_config::ExpandTarget;
use tracing::debug;

/// Default number of undo levels kept.
pub const DEFAULT_UNDO_LEVELS: usize = 32;

/// Captured attribute data from before an expand.
#[derive(Debug, Clone)]
pub enum UndoEntry {
    Mask(Vec<f32>),
    FaceSets(Vec<i32>),
    /// `None` when the mesh had no color layer yet
    Colors(Option<Vec<Rgba>>),
}

impl UndoEntry {
    /// Capture the attribute written by `target`.
    pub fn capture(mesh: &SculptMesh, target: ExpandTarget) -> Self {
        match target {
            ExpandTarget::Mask => UndoEntry::Mask(mesh.masks()),
            ExpandTarget::FaceSets => UndoEntry::FaceSets(mesh.face_sets().to_vec()),
            ExpandTarget::Colors => UndoEntry::Colors(mesh.colors()),
        }
    }

    pub fn target(&self) -> ExpandTarget {
        match self {
            UndoEntry::Mask(_) => ExpandTarget::Mask,
            UndoEntry::FaceSets(_) => ExpandTarget::FaceSets,
            UndoEntry::Colors(_) => ExpandTarget::Colors,
        }
    }

    /// Write the captured data back and flag every node for redraw.
    pub fn restore(&self, mesh: &mut SculptMesh) -> Result<(), MeshError> {
        match self {
            UndoEntry::Mask(mask) => {
                mesh.set_masks(mask)?;
                mesh.node_tree_mut().mark_all(|node| node.mark_update_mask());
            }
            UndoEntry::FaceSets(face_sets) => {
                mesh.set_face_sets(face_sets)?;
                mesh.node_tree_mut().mark_all(|node| node.mark_update_mask());
            }
            UndoEntry::Colors(Some(colors)) => {
                mesh.set_colors(colors)?;
                mesh.node_tree_mut().mark_all(|node| node.mark_update_color());
            }
            UndoEntry::Colors(None) => {
                // The layer was created by the expand; reset it to the default fill
                if mesh.has_colors() {
                    let white = vec![crate::mesh::DEFAULT_COLOR; mesh.vertex_count()];
                    mesh.set_colors(&white)?;
                    mesh.node_tree_mut().mark_all(|node| node.mark_update_color());
                }
            }
        }
        Ok(())
    }
}

/// Bounded stack of confirmed expands.
#[derive(Debug, Clone)]
pub struct UndoStack {
    entries: Vec<UndoEntry>,
    max_levels: usize,
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_LEVELS)
    }
}

impl UndoStack {
    pub fn new(max_levels: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_levels: max_levels.max(1),
        }
    }

    /// Push an entry, dropping the oldest one when full.
    pub fn push(&mut self, entry: UndoEntry) {
        if self.entries.len() >= self.max_levels {
            self.entries.remove(0);
        }
        debug!(
            "Pushed {:?} undo entry ({} levels)",
            entry.target(),
            self.entries.len() + 1
        );
        self.entries.push(entry);
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Get the number of undo levels available
    pub fn undo_count(&self) -> usize {
        self.entries.len()
    }

    /// Undo the last confirmed expand.
    ///
    /// Returns true if an undo was performed, false if no undo available
    pub fn undo(&mut self, mesh: &mut SculptMesh) -> Result<bool, MeshError> {
        let Some(entry) = self.entries.pop() else {
            debug!("Undo: no entries available");
            return Ok(false);
        };

        debug!("Undoing {:?} expand", entry.target());
        entry.restore(mesh)?;
        Ok(true)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
