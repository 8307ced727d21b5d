//! Summary counts of an event graph.

use std::fmt;

use crate::edge_graph::EdgeGraph;
use crate::node_graph::NodeGraph;
use crate::particle::Particle;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sizes of an event graph, and of its initial and final states.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct GraphStats {
    /// Number of graph vertices.
    pub vertices: usize,
    /// Number of graph edges.
    pub edges: usize,
    /// Number of particles.
    pub particles: usize,
    /// Number of particles with nothing producing them.
    pub initial_state: usize,
    /// Number of particles with nothing consuming them.
    pub final_state: usize,
}

impl GraphStats {
    fn count<'a>(vertices: usize, edges: usize, particles: impl Iterator<Item = &'a Particle>) -> Self {
        particles.fold(
            Self {
                vertices,
                edges,
                ..Default::default()
            },
            |mut stats, particle| {
                stats.particles += 1;
                stats.initial_state += usize::from(particle.initial_state);
                stats.final_state += usize::from(particle.final_state);
                stats
            },
        )
    }
}

impl From<&NodeGraph> for GraphStats {
    fn from(graph: &NodeGraph) -> Self {
        Self::count(graph.particle_count(), graph.edge_count(), graph.particles())
    }
}

impl From<&EdgeGraph> for GraphStats {
    fn from(graph: &EdgeGraph) -> Self {
        Self::count(graph.vertex_count(), graph.particle_count(), graph.particles())
    }
}

impl fmt::Display for GraphStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "vertices: {}", self.vertices)?;
        writeln!(f, "edges: {}", self.edges)?;
        writeln!(f, "particles: {}", self.particles)?;
        writeln!(f, "initial state: {}", self.initial_state)?;
        write!(f, "final state: {}", self.final_state)
    }
}
