//! Sculpt expand: interactive region growing from a seed vertex.
//!
//! A falloff field measures how far every vertex is from the seed. The
//! vertex under the pointer sets a threshold, and everything within the
//! threshold is written into the target attribute (mask, face sets or
//! vertex colors).
//!
//! ## Key Components
//!
//! - **Falloff**: the five distance metrics
//! - **Cache**: per-session field, threshold, toggles and snapshots
//! - **State**: enabled-region decisions and gradient fade
//! - **Update**: per-node dispatch into the target attribute
//! - **Face sets**: id allocation, merge-deletion and snapping
//! - **Session**: invoke / modal / confirm / cancel controller

pub mod cache;
pub mod face_sets;
pub mod falloff;
pub mod session;
mod state;
pub mod update;

pub use cache::{ExpandCache, MoveAnchor};
pub use face_sets::{delete_face_set_id, next_available_face_set};
pub use falloff::compute_falloff;
pub use session::{ExpandCommand, ExpandEvent, ExpandSession, ModalResult, SessionState};
pub use update::UpdateSummary;
