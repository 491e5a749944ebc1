//! Interactive expand session: invoke, modal event handling, confirm and
//! cancel.

use super::cache::{ExpandCache, MoveAnchor};
use super::face_sets::{delete_face_set_id, next_available_face_set};
use super::update::UpdateSummary;
use crate::error::ExpandError;
use crate::mesh::SculptMesh;
use crate::picking::CursorPicker;
use crate::undo::{UndoEntry, UndoStack};
use glam::Vec2;
use sculpting_config::{ExpandOptions, ExpandTarget, FalloffType};
use tracing::{debug, info};

/// Lifecycle of a session. `Confirmed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Confirmed,
    Cancelled,
}

/// Discrete modal commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandCommand {
    Confirm,
    Cancel,
    Invert,
    PreserveToggle,
    GradientToggle,
    SnapToggle,
    MoveToggle,
    RecursionStep,
    /// Step to the next falloff metric
    FalloffCycle,
    SetFalloff(FalloffType),
}

/// Input delivered to a running session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExpandEvent {
    /// Pointer moved to a new position
    PointerMove(Vec2),
    Command(ExpandCommand),
}

/// Result of handling one modal event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalResult {
    RunningModal,
    Finished,
    Cancelled,
}

/// A running expand operation on one mesh.
///
/// The session owns its cache and the undo data captured at invoke; both
/// are released exactly once, on confirm or cancel.
#[derive(Debug)]
pub struct ExpandSession {
    cache: Option<ExpandCache>,
    undo_entry: Option<UndoEntry>,
    last_mouse: Vec2,
    last_vertex: Option<usize>,
    last_update: Option<UpdateSummary>,
    state: SessionState,
}

impl ExpandSession {
    /// Start an expand at `mouse`.
    ///
    /// The seed is the vertex under the pointer, falling back to the mesh's
    /// active vertex when the pointer is off the mesh (or preferring it with
    /// `use_expand_from_active`). The target data is updated once before
    /// returning.
    pub fn invoke(
        mesh: &mut SculptMesh,
        picker: &dyn CursorPicker,
        options: &ExpandOptions,
        mouse: Vec2,
    ) -> Result<Self, ExpandError> {
        if mesh.vertex_count() == 0 {
            return Err(ExpandError::EmptyMesh);
        }

        let undo_entry = UndoEntry::capture(mesh, options.target);
        if options.target == ExpandTarget::Colors {
            mesh.ensure_color_layer();
        }

        let seed = if options.use_expand_from_active {
            match mesh.active_vertex() {
                Some(vertex) => Some(vertex),
                None => pick_vertex(mesh, picker, mouse),
            }
        } else {
            pick_vertex(mesh, picker, mouse).or(mesh.active_vertex())
        };
        let seed = seed.ok_or(ExpandError::NoSeedVertex)?;

        let mut cache = ExpandCache::new(options, mesh, seed);
        cache.initial_mouse = mouse;
        cache.next_face_set = if cache.modify_active {
            cache.initial_active_face_set
        } else {
            next_available_face_set(mesh.face_sets())
        };

        if cache.modify_active {
            let id = cache.next_face_set;
            delete_face_set_id(mesh.topology(), &mut cache.initial_face_sets, id);
        }

        let metric = if mesh.topology().is_boundary_vertex(seed) {
            FalloffType::BoundaryTopology
        } else {
            FalloffType::Geodesic
        };
        cache.set_falloff(mesh, seed, metric);
        let summary = cache.update_for_vertex(mesh, Some(seed));

        info!(
            "Expand started: {:?} from vertex {} ({:?}), face set {}",
            cache.target, seed, metric, cache.next_face_set
        );

        Ok(Self {
            cache: Some(cache),
            undo_entry: Some(undo_entry),
            last_mouse: mouse,
            last_vertex: Some(seed),
            last_update: Some(summary),
            state: SessionState::Active,
        })
    }

    /// Handle one event.
    pub fn modal(
        &mut self,
        mesh: &mut SculptMesh,
        picker: &dyn CursorPicker,
        undo: &mut UndoStack,
        event: ExpandEvent,
    ) -> Result<ModalResult, ExpandError> {
        if self.state != SessionState::Active {
            return Err(ExpandError::SessionFinished);
        }

        match event {
            ExpandEvent::PointerMove(mouse) => {
                self.pointer_move(mesh, picker, mouse)?;
                Ok(ModalResult::RunningModal)
            }
            ExpandEvent::Command(ExpandCommand::Confirm) => {
                self.confirm(mesh, undo)?;
                Ok(ModalResult::Finished)
            }
            ExpandEvent::Command(ExpandCommand::Cancel) => {
                self.cancel(mesh)?;
                Ok(ModalResult::Cancelled)
            }
            ExpandEvent::Command(command) => {
                self.apply_command(mesh, command)?;
                Ok(ModalResult::RunningModal)
            }
        }
    }

    /// Roll the target data back to its state before invoke.
    pub fn cancel(&mut self, mesh: &mut SculptMesh) -> Result<(), ExpandError> {
        if self.state != SessionState::Active {
            return Err(ExpandError::SessionFinished);
        }

        if let Some(entry) = self.undo_entry.take() {
            entry.restore(mesh)?;
        }
        self.cache = None;
        self.state = SessionState::Cancelled;
        info!("Expand cancelled");
        Ok(())
    }

    fn confirm(&mut self, mesh: &mut SculptMesh, undo: &mut UndoStack) -> Result<(), ExpandError> {
        let mut cache = self.cache.take().ok_or(ExpandError::SessionFinished)?;
        self.last_update = Some(cache.update_for_vertex(mesh, self.last_vertex));

        if let Some(entry) = self.undo_entry.take() {
            undo.push(entry);
        }
        self.state = SessionState::Confirmed;
        info!("Expand confirmed: {:?}", cache.target);
        Ok(())
    }

    fn pointer_move(
        &mut self,
        mesh: &mut SculptMesh,
        picker: &dyn CursorPicker,
        mouse: Vec2,
    ) -> Result<(), ExpandError> {
        let cache = self.cache.as_mut().ok_or(ExpandError::SessionFinished)?;
        self.last_mouse = mouse;
        let target = pick_vertex(mesh, picker, mouse);

        if let Some(anchor) = cache.move_anchor {
            let origin_mouse = anchor.original_mouse_move + (mouse - anchor.initial_mouse_move);
            if let Some(seed) = pick_vertex(mesh, picker, origin_mouse).or(mesh.active_vertex()) {
                cache.initial_mouse = origin_mouse;
                cache.initial_active_vertex = seed;
                cache.initial_active_face_set = mesh.active_face_set();
                let metric = cache.falloff_type;
                cache.set_falloff(mesh, seed, metric);
            }
        }

        if let (Some(face_sets), Some(face)) =
            (cache.snap_enabled_face_sets.as_mut(), mesh.active_face())
        {
            face_sets.insert(cache.initial_face_sets[face]);
        }

        self.last_vertex = target;
        self.last_update = Some(cache.update_for_vertex(mesh, target));
        Ok(())
    }

    fn apply_command(
        &mut self,
        mesh: &mut SculptMesh,
        command: ExpandCommand,
    ) -> Result<(), ExpandError> {
        let cache = self.cache.as_mut().ok_or(ExpandError::SessionFinished)?;

        match command {
            ExpandCommand::Invert => cache.invert = !cache.invert,
            ExpandCommand::PreserveToggle => cache.preserve = !cache.preserve,
            ExpandCommand::GradientToggle => cache.falloff_gradient = !cache.falloff_gradient,
            ExpandCommand::SnapToggle => {
                cache.snap_enabled_face_sets = if cache.snap() {
                    None
                } else {
                    Some(cache.snap_face_sets_from_enabled(&mesh.view()))
                };
            }
            ExpandCommand::MoveToggle => {
                cache.move_anchor = if cache.is_moving() {
                    None
                } else {
                    Some(MoveAnchor {
                        initial_mouse_move: self.last_mouse,
                        original_mouse_move: cache.initial_mouse,
                    })
                };
            }
            ExpandCommand::RecursionStep => {
                cache.recursion_step(mesh);
            }
            ExpandCommand::FalloffCycle => {
                let metric = cache.falloff_type.next();
                cache.set_falloff(mesh, cache.initial_active_vertex, metric);
            }
            ExpandCommand::SetFalloff(metric) => {
                cache.set_falloff(mesh, cache.initial_active_vertex, metric);
            }
            ExpandCommand::Confirm | ExpandCommand::Cancel => {}
        }

        debug!("Expand command {:?}", command);
        self.last_update = Some(cache.update_for_vertex(mesh, self.last_vertex));
        Ok(())
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    /// Session cache, `None` once the session has finished.
    pub fn cache(&self) -> Option<&ExpandCache> {
        self.cache.as_ref()
    }

    /// Vertex under the pointer at the last event.
    pub fn last_vertex(&self) -> Option<usize> {
        self.last_vertex
    }

    /// Summary of the most recent dispatch.
    pub fn last_update(&self) -> Option<UpdateSummary> {
        self.last_update
    }
}

/// Pick the element under `mouse` and make it the mesh's active element.
fn pick_vertex(mesh: &mut SculptMesh, picker: &dyn CursorPicker, mouse: Vec2) -> Option<usize> {
    let hit = picker.pick(mesh.topology(), mouse)?;
    mesh.set_active(hit.vertex, hit.face);
    Some(hit.vertex)
}
