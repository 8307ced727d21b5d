//! Initial and final state inference.
//!
//! A particle is initial-state when nothing in the event produces it, and
//! final-state when nothing consumes it. Both flags may hold at once for a
//! particle that is entirely disconnected.
//!
//! The flags are inferred exactly once, right after a graph is assembled.
//! Removing particles afterwards rewires the graph but never touches the
//! flags of the survivors, so the diagram keeps showing which particles
//! entered and left the event. Inference only ever raises flags: a particle
//! the parser already marked (see [`EdgeParticle::from_vertices`]) stays
//! marked.
//!
//! [`EdgeParticle::from_vertices`]: crate::EdgeParticle::from_vertices

use log::trace;

use crate::multigraph::MultiGraph;
use crate::particle::Particle;

/// Whether a particle has a producer and a consumer in its graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Linkage {
    /// Some particle flows into this one.
    pub produced: bool,
    /// This particle flows into some other particle.
    pub consumed: bool,
}

impl Linkage {
    /// Raises the state flags of a particle according to its linkage.
    #[inline]
    pub fn apply(self, particle: &mut Particle) {
        if !self.produced {
            particle.initial_state = true;
        }
        if !self.consumed {
            particle.final_state = true;
        }
    }
}

/// Flags the particles of a graph where particles are vertices.
///
/// A particle is produced if it has an incoming edge, and consumed if it has
/// an outgoing edge.
pub fn mark_node_states<E>(graph: &mut MultiGraph<Particle, E>) {
    let linkage: Vec<Linkage> = graph
        .vertices()
        .map(|vertex| Linkage {
            produced: graph.in_degree(vertex) > 0,
            consumed: graph.out_degree(vertex) > 0,
        })
        .collect();

    for ((vertex, particle), linkage) in graph.vertex_weights_mut().zip(linkage) {
        trace!("Vertex {vertex}: {linkage:?}");
        linkage.apply(particle);
    }
}

/// Flags the particles of a graph where particles are edges.
///
/// A particle is produced if some edge points into its production vertex,
/// and consumed if some edge leaves its decay vertex.
pub fn mark_edge_states<V>(graph: &mut MultiGraph<V, Particle>) {
    let linkage: Vec<Linkage> = graph
        .edges()
        .map(|edge| Linkage {
            produced: graph.in_degree(edge.source) > 0,
            consumed: graph.out_degree(edge.target) > 0,
        })
        .collect();

    for ((edge, particle), linkage) in graph.edge_weights_mut().zip(linkage) {
        trace!("Edge {edge:?}: {linkage:?}");
        linkage.apply(particle);
    }
}
