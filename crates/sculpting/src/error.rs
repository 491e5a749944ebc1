//! Error types for mesh construction and expand sessions.

/// Errors produced while building a [`SculptMesh`](crate::mesh::SculptMesh).
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("Face {face} references vertex {vertex}, but the mesh has {vertex_count} vertices")]
    FaceIndexOutOfRange {
        face: usize,
        vertex: usize,
        vertex_count: usize,
    },

    #[error("Face {face} has {count} vertices, at least 3 are required")]
    DegenerateFace { face: usize, count: usize },

    #[error("Edge {edge} references vertex {vertex}, but the mesh has {vertex_count} vertices")]
    EdgeIndexOutOfRange {
        edge: usize,
        vertex: usize,
        vertex_count: usize,
    },

    #[error("Attribute {attribute} has {actual} entries, expected {expected}")]
    AttributeLength {
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Errors produced by an expand session.
#[derive(Debug, thiserror::Error)]
pub enum ExpandError {
    #[error("No seed vertex: the pointer is off the mesh and there is no active vertex")]
    NoSeedVertex,

    #[error("The expand session has already finished")]
    SessionFinished,

    #[error("Cannot expand on a mesh without vertices")]
    EmptyMesh,

    #[error(transparent)]
    Mesh(#[from] MeshError),
}
