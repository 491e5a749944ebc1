//! Breadth-first flood fill over vertex connectivity.

use crate::mesh::{MeshTopology, SculptMesh};
use std::collections::VecDeque;

/// FIFO traversal state: pending vertices and the visited set.
///
/// Seeds are marked visited when added, so a visitor never sees a seed as
/// the destination of an edge.
#[derive(Debug, Clone)]
pub struct FloodFill {
    queue: VecDeque<usize>,
    visited: Vec<bool>,
}

impl FloodFill {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            visited: vec![false; vertex_count],
        }
    }

    /// Queue a seed vertex. Already visited or out-of-range seeds are ignored.
    pub fn add_initial(&mut self, vertex: usize) {
        match self.visited.get_mut(vertex) {
            Some(visited) if !*visited => {
                *visited = true;
                self.queue.push_back(vertex);
            }
            _ => {}
        }
    }

    /// Queue `vertex` and its mirror image in every valid symmetry pass.
    ///
    /// Returns the seeds that were resolved.
    pub fn add_initial_with_symmetry(&mut self, mesh: &SculptMesh, vertex: usize) -> Vec<usize> {
        let seeds = mesh.symmetry_vertices(vertex);
        for &seed in &seeds {
            self.add_initial(seed);
        }
        seeds
    }

    /// Run the traversal.
    ///
    /// `visit(from, to, is_duplicate)` is called once per newly reached
    /// vertex. Returning false keeps `to` visited but does not expand past it.
    pub fn execute<F>(&mut self, topology: &MeshTopology, mut visit: F)
    where
        F: FnMut(usize, usize, bool) -> bool,
    {
        while let Some(from) = self.queue.pop_front() {
            for neighbor in topology.neighbors_with_duplicates(from) {
                let to = neighbor.index;
                if self.visited[to] {
                    continue;
                }
                self.visited[to] = true;
                if visit(from, to, neighbor.is_duplicate) {
                    self.queue.push_back(to);
                }
            }
        }
    }

    pub fn is_visited(&self, vertex: usize) -> bool {
        self.visited.get(vertex).copied().unwrap_or(false)
    }
}
