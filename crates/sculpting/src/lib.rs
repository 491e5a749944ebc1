//! Sculpt expand for Pentimento.
//!
//! This crate grows a region over a sculpt mesh from a seed vertex and
//! writes it into the mask, face sets or vertex colors while the pointer
//! moves:
//! - Mesh connectivity with node-partitioned attribute storage
//! - Flood fill, geodesic and boundary-loop traversals
//! - Five falloff metrics with mirror symmetry
//! - Parallel per-node updates of the target attribute
//! - A modal session with confirm, cancel and undo
//!
//! # Architecture
//!
//! An [`ExpandSession`] owns all state of one expand. Pointer and command
//! events mutate its [`ExpandCache`], then the update dispatcher rewrites the
//! target attribute and flags the affected nodes for redraw.
//!
//! ## Key Components
//!
//! - **Mesh**: topology, attributes, symmetry and active element
//! - **Chunking**: spatial partitioning into nodes for localized updates
//! - **Spatial**: nearest-vertex octree
//! - **Picking**: pointer to mesh element
//! - **Expand**: falloff fields, dispatcher and session
//! - **Undo**: snapshots of the expanded attribute

pub mod chunking;
pub mod color;
pub mod error;
pub mod expand;
pub mod floodfill;
pub mod mesh;
pub mod picking;
pub mod spatial;
pub mod undo;

#[cfg(test)]
mod fixtures;

pub use chunking::{Aabb, NodeFlags, NodeId, NodeTree, PartitionConfig, PartitionNode};
pub use color::Rgba;
pub use error::{ExpandError, MeshError};
pub use expand::{
    ExpandCache, ExpandCommand, ExpandEvent, ExpandSession, ModalResult, SessionState,
    UpdateSummary,
};
pub use floodfill::FloodFill;
pub use mesh::{MeshTopology, SculptMesh, SymmetryFlags};
pub use picking::{CursorHit, CursorPicker, OrthographicPicker};
pub use sculpting_config::{
    BlendMode, ColorFill, ExpandOptions, ExpandTarget, FalloffTuning, FalloffType,
};
pub use undo::{UndoEntry, UndoStack};
