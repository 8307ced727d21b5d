//! Conversion of multigraphs into petgraph graphs.

use std::collections::HashMap;

use petgraph::stable_graph::{NodeIndex, StableDiGraph};

use super::MultiGraph;
use crate::Barcode;

impl From<petgraph::Direction> for crate::Direction {
    fn from(d: petgraph::Direction) -> Self {
        match d {
            petgraph::Direction::Incoming => crate::Direction::Incoming,
            petgraph::Direction::Outgoing => crate::Direction::Outgoing,
        }
    }
}

impl From<crate::Direction> for petgraph::Direction {
    fn from(d: crate::Direction) -> Self {
        match d {
            crate::Direction::Incoming => petgraph::Direction::Incoming,
            crate::Direction::Outgoing => petgraph::Direction::Outgoing,
        }
    }
}

impl<V: Clone, E: Clone> MultiGraph<V, E> {
    /// Copies the graph into a petgraph [`StableDiGraph`].
    ///
    /// Vertices keep their insertion order and carry their barcode next to
    /// their payload. Parallel edges are preserved.
    pub fn to_petgraph(&self) -> StableDiGraph<(Barcode, V), E> {
        let mut graph = StableDiGraph::with_capacity(self.vertex_count(), self.edge_count());
        let mut indices: HashMap<Barcode, NodeIndex> = HashMap::with_capacity(self.vertex_count());
        for (vertex, weight) in self.vertices().with_weights() {
            indices.insert(vertex, graph.add_node((vertex, weight.clone())));
        }
        for edge in self.edges() {
            graph.add_edge(
                indices[&edge.source],
                indices[&edge.target],
                edge.weight.clone(),
            );
        }
        graph
    }
}
