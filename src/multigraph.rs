//! Directed multigraph keyed by integer barcodes.
//!
//! This module defines the [`MultiGraph`] data structure shared by both
//! particle representations. Vertices are identified by the [`Barcode`] the
//! event record assigns them, each carrying a payload of type `V`. Edges live
//! in an arena and are identified by an [`EdgeIndex`], so that several edges
//! between the same ordered pair of vertices remain individually addressable.
//!
//! Vertices are kept in insertion order, and the edges at each vertex in the
//! order they were attached. Removing a vertex or an edge preserves the
//! relative order of everything else.

mod iter;
#[cfg(feature = "petgraph")]
mod petgraph;

pub use self::iter::{EdgeRef, Edges, Neighbours, VertexEdges, Vertices};

use indexmap::IndexMap;
use smallvec::SmallVec;
use thiserror::Error;

use crate::{Barcode, Direction, EdgeIndex};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Edges attached to one side of a vertex.
type EdgeList = SmallVec<[EdgeIndex; 4]>;

/// A directed graph allowing parallel edges, with payloads on vertices and
/// edges.
///
/// When an edge is removed its index will be reused on a best effort basis
/// when a new edge is added. The indices of unaffected edges remain stable,
/// including edges whose endpoints are changed with
/// [`MultiGraph::move_edge`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct MultiGraph<V, E> {
    /// Payload and adjacency of each vertex, in insertion order.
    vertices: IndexMap<Barcode, VertexEntry<V>>,
    /// Edge slots. Free slots form a linked list.
    edges: Vec<EdgeEntry<E>>,
    /// Index of the first free slot in the free-edge linked list embedded in
    /// `edges`.
    edge_free: Option<EdgeIndex>,
    /// Number of edges in the graph.
    edge_count: usize,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
struct VertexEntry<V> {
    weight: V,
    incoming: EdgeList,
    outgoing: EdgeList,
}

impl<V> VertexEntry<V> {
    fn new(weight: V) -> Self {
        Self {
            weight,
            incoming: EdgeList::new(),
            outgoing: EdgeList::new(),
        }
    }

    #[inline]
    fn edges(&self, direction: Direction) -> &EdgeList {
        match direction {
            Direction::Incoming => &self.incoming,
            Direction::Outgoing => &self.outgoing,
        }
    }

    #[inline]
    fn edges_mut(&mut self, direction: Direction) -> &mut EdgeList {
        match direction {
            Direction::Incoming => &mut self.incoming,
            Direction::Outgoing => &mut self.outgoing,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
enum EdgeEntry<E> {
    /// Unused slot, pointing to the next free slot.
    Free(Option<EdgeIndex>),
    Edge(EdgeMeta<E>),
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
struct EdgeMeta<E> {
    source: Barcode,
    target: Barcode,
    weight: E,
}

impl<E> EdgeMeta<E> {
    #[inline]
    fn endpoint(&self, direction: Direction) -> Barcode {
        match direction {
            Direction::Incoming => self.target,
            Direction::Outgoing => self.source,
        }
    }
}

impl<V, E> MultiGraph<V, E> {
    /// Create a new empty [`MultiGraph`].
    pub fn new() -> Self {
        Self {
            vertices: IndexMap::new(),
            edges: Vec::new(),
            edge_free: None,
            edge_count: 0,
        }
    }

    /// Create a new empty [`MultiGraph`] with preallocated capacity.
    pub fn with_capacity(vertices: usize, edges: usize) -> Self {
        Self {
            vertices: IndexMap::with_capacity(vertices),
            edges: Vec::with_capacity(edges),
            edge_free: None,
            edge_count: 0,
        }
    }

    /// Adds a vertex with the given payload.
    ///
    /// If the vertex already exists its payload is replaced and the previous
    /// one returned. Its edges are kept.
    ///
    /// # Example
    ///
    /// ```
    /// # use particlegraph::MultiGraph;
    /// let mut g: MultiGraph<&str, ()> = MultiGraph::new();
    /// assert_eq!(g.add_vertex(-1, "a"), None);
    /// assert_eq!(g.add_vertex(-1, "b"), Some("a"));
    /// assert_eq!(g.vertex_weight(-1), Some(&"b"));
    /// assert_eq!(g.vertex_count(), 1);
    /// ```
    pub fn add_vertex(&mut self, vertex: Barcode, weight: V) -> Option<V> {
        match self.vertices.get_mut(&vertex) {
            Some(entry) => Some(std::mem::replace(&mut entry.weight, weight)),
            None => {
                self.vertices.insert(vertex, VertexEntry::new(weight));
                None
            }
        }
    }

    /// Adds a vertex with a default payload, unless it already exists.
    ///
    /// Returns `true` if the vertex was added.
    pub fn ensure_vertex(&mut self, vertex: Barcode) -> bool
    where
        V: Default,
    {
        if self.vertices.contains_key(&vertex) {
            return false;
        }
        self.vertices.insert(vertex, VertexEntry::new(V::default()));
        true
    }

    /// Removes a vertex and every edge attached to it, returning its payload.
    /// Does nothing if the vertex does not exist.
    ///
    /// # Example
    ///
    /// ```
    /// # use particlegraph::{MultiGraph, Direction};
    /// let mut g: MultiGraph<(), char> = MultiGraph::new();
    /// for v in [1, 2, 3] {
    ///     g.ensure_vertex(v);
    /// }
    /// g.add_edge(1, 2, 'a').unwrap();
    /// g.add_edge(2, 3, 'b').unwrap();
    /// g.remove_vertex(2);
    /// assert_eq!(g.edge_count(), 0);
    /// assert_eq!(g.degree(1, Direction::Outgoing), 0);
    /// ```
    pub fn remove_vertex(&mut self, vertex: Barcode) -> Option<V> {
        let entry = self.vertices.shift_remove(&vertex)?;
        for direction in Direction::BOTH {
            for &edge in entry.edges(direction) {
                // Loops appear on both sides, and are freed on the first.
                let Some(meta) = self.free_edge(edge) else {
                    continue;
                };
                let other = meta.endpoint(direction.reverse());
                if let Some(other) = self.vertices.get_mut(&other) {
                    remove_from_list(other.edges_mut(direction.reverse()), edge);
                }
            }
        }
        Some(entry.weight)
    }

    /// Adds a directed edge from `source` to `target` carrying `weight`.
    ///
    /// Edges between the same pair of vertices do not replace each other.
    ///
    /// # Errors
    ///
    ///  - When `source` or `target` is not a vertex of the graph.
    pub fn add_edge(
        &mut self,
        source: Barcode,
        target: Barcode,
        weight: E,
    ) -> Result<EdgeIndex, LinkError> {
        self.check_vertex(source)?;
        self.check_vertex(target)?;

        let edge = self.alloc_edge(EdgeMeta {
            source,
            target,
            weight,
        });
        self.attach(edge, source, target);
        self.edge_count += 1;
        Ok(edge)
    }

    /// Removes an edge from the graph, returning its payload. Does nothing if
    /// the edge does not exist.
    pub fn remove_edge(&mut self, edge: EdgeIndex) -> Option<E> {
        let meta = self.free_edge(edge)?;
        self.detach(edge, meta.source, meta.target);
        Some(meta.weight)
    }

    /// Changes the endpoints of an edge, keeping its index and payload.
    ///
    /// The edge is appended to the edge lists of its new endpoints.
    ///
    /// # Errors
    ///
    ///  - When `edge` is not an edge of the graph.
    ///  - When `source` or `target` is not a vertex of the graph.
    pub fn move_edge(
        &mut self,
        edge: EdgeIndex,
        source: Barcode,
        target: Barcode,
    ) -> Result<(), LinkError> {
        let Some((old_source, old_target)) = self.edge_endpoints(edge) else {
            return Err(LinkError::UnknownEdge { edge });
        };
        self.check_vertex(source)?;
        self.check_vertex(target)?;

        self.detach(edge, old_source, old_target);
        if let Some(EdgeEntry::Edge(meta)) = self.edges.get_mut(edge.index()) {
            meta.source = source;
            meta.target = target;
        }
        self.attach(edge, source, target);
        Ok(())
    }

    /// Returns the source and target of an edge.
    #[inline]
    pub fn edge_endpoints(&self, edge: EdgeIndex) -> Option<(Barcode, Barcode)> {
        self.edge_meta(edge).map(|meta| (meta.source, meta.target))
    }

    /// Returns the endpoint of an edge on the given side.
    ///
    /// [`Direction::Outgoing`] returns the source, the vertex the edge leaves
    /// from. [`Direction::Incoming`] returns the target.
    #[inline]
    pub fn edge_endpoint(&self, edge: EdgeIndex, direction: Direction) -> Option<Barcode> {
        self.edge_meta(edge).map(|meta| meta.endpoint(direction))
    }

    /// Returns the payload of an edge.
    #[inline]
    pub fn edge_weight(&self, edge: EdgeIndex) -> Option<&E> {
        self.edge_meta(edge).map(|meta| &meta.weight)
    }

    /// Returns the payload of an edge, mutably.
    #[inline]
    pub fn edge_weight_mut(&mut self, edge: EdgeIndex) -> Option<&mut E> {
        match self.edges.get_mut(edge.index()) {
            Some(EdgeEntry::Edge(meta)) => Some(&mut meta.weight),
            _ => None,
        }
    }

    /// Returns the payload of a vertex.
    #[inline]
    pub fn vertex_weight(&self, vertex: Barcode) -> Option<&V> {
        self.vertices.get(&vertex).map(|entry| &entry.weight)
    }

    /// Returns the payload of a vertex, mutably.
    #[inline]
    pub fn vertex_weight_mut(&mut self, vertex: Barcode) -> Option<&mut V> {
        self.vertices.get_mut(&vertex).map(|entry| &mut entry.weight)
    }

    /// Returns whether the vertex exists in the graph.
    #[inline]
    pub fn contains_vertex(&self, vertex: Barcode) -> bool {
        self.vertices.contains_key(&vertex)
    }

    /// Returns whether the edge exists in the graph.
    #[inline]
    pub fn contains_edge(&self, edge: EdgeIndex) -> bool {
        self.edge_meta(edge).is_some()
    }

    /// Returns the number of edges attached to a vertex in the given
    /// direction, counting parallel edges separately. Returns zero for
    /// unknown vertices.
    #[inline]
    pub fn degree(&self, vertex: Barcode, direction: Direction) -> usize {
        self.vertices
            .get(&vertex)
            .map_or(0, |entry| entry.edges(direction).len())
    }

    /// Returns the number of edges pointing into a vertex.
    #[inline]
    pub fn in_degree(&self, vertex: Barcode) -> usize {
        self.degree(vertex, Direction::Incoming)
    }

    /// Returns the number of edges leaving a vertex.
    #[inline]
    pub fn out_degree(&self, vertex: Barcode) -> usize {
        self.degree(vertex, Direction::Outgoing)
    }

    /// Iterates over the edges attached to a vertex in the given direction,
    /// in attachment order.
    #[inline]
    pub fn vertex_edges(&self, vertex: Barcode, direction: Direction) -> VertexEdges<'_> {
        let edges = self
            .vertices
            .get(&vertex)
            .map_or(&[][..], |entry| entry.edges(direction).as_slice());
        VertexEdges::new(edges)
    }

    /// Iterates over the edges pointing into a vertex.
    #[inline]
    pub fn incoming(&self, vertex: Barcode) -> VertexEdges<'_> {
        self.vertex_edges(vertex, Direction::Incoming)
    }

    /// Iterates over the edges leaving a vertex.
    #[inline]
    pub fn outgoing(&self, vertex: Barcode) -> VertexEdges<'_> {
        self.vertex_edges(vertex, Direction::Outgoing)
    }

    /// Iterates over the vertices at the other end of the edges attached to
    /// a vertex in the given direction.
    ///
    /// A neighbour connected by several parallel edges is returned once per
    /// edge.
    #[inline]
    pub fn neighbours(&self, vertex: Barcode, direction: Direction) -> Neighbours<'_, V, E> {
        Neighbours::new(self, self.vertex_edges(vertex, direction), direction)
    }

    /// Iterates over the vertices of the graph, in insertion order.
    #[inline]
    pub fn vertices(&self) -> Vertices<'_, V> {
        Vertices::new(self.vertices.iter())
    }

    /// Iterates over the edges of the graph, in index order.
    #[inline]
    pub fn edges(&self) -> Edges<'_, E> {
        Edges::new(&self.edges, self.edge_count)
    }

    /// Mutably iterates over the vertex payloads, in insertion order.
    pub fn vertex_weights_mut(&mut self) -> impl Iterator<Item = (Barcode, &mut V)> + '_ {
        self.vertices
            .iter_mut()
            .map(|(&vertex, entry)| (vertex, &mut entry.weight))
    }

    /// Mutably iterates over the edge payloads, in index order.
    pub fn edge_weights_mut(&mut self) -> impl Iterator<Item = (EdgeIndex, &mut E)> + '_ {
        self.edges
            .iter_mut()
            .enumerate()
            .filter_map(|(index, entry)| match entry {
                EdgeEntry::Edge(meta) => Some((EdgeIndex::new(index), &mut meta.weight)),
                EdgeEntry::Free(_) => None,
            })
    }

    /// Returns the number of vertices in the graph.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of edges in the graph.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Returns whether the graph has neither vertices nor edges.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.edge_count == 0
    }

    /// Removes all vertices and edges.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.edge_free = None;
        self.edge_count = 0;
    }

    #[inline]
    fn edge_meta(&self, edge: EdgeIndex) -> Option<&EdgeMeta<E>> {
        match self.edges.get(edge.index()) {
            Some(EdgeEntry::Edge(meta)) => Some(meta),
            _ => None,
        }
    }

    #[inline]
    fn check_vertex(&self, vertex: Barcode) -> Result<(), LinkError> {
        if self.vertices.contains_key(&vertex) {
            Ok(())
        } else {
            Err(LinkError::UnknownVertex { vertex })
        }
    }

    #[inline]
    fn alloc_edge(&mut self, meta: EdgeMeta<E>) -> EdgeIndex {
        match self.edge_free {
            Some(edge) => {
                let EdgeEntry::Free(next) = self.edges[edge.index()] else {
                    unreachable!("non free edge on free list");
                };
                self.edge_free = next;
                self.edges[edge.index()] = EdgeEntry::Edge(meta);
                edge
            }
            None => {
                let edge = EdgeIndex::new(self.edges.len());
                self.edges.push(EdgeEntry::Edge(meta));
                edge
            }
        }
    }

    /// Puts the edge slot on the free list, returning its metadata.
    ///
    /// The edge lists of its endpoints are left untouched.
    #[inline]
    fn free_edge(&mut self, edge: EdgeIndex) -> Option<EdgeMeta<E>> {
        let slot = self.edges.get_mut(edge.index())?;
        if !matches!(slot, EdgeEntry::Edge(_)) {
            return None;
        }
        let EdgeEntry::Edge(meta) = std::mem::replace(slot, EdgeEntry::Free(self.edge_free))
        else {
            unreachable!("edge slot checked above");
        };
        self.edge_free = Some(edge);
        self.edge_count -= 1;
        Some(meta)
    }

    fn attach(&mut self, edge: EdgeIndex, source: Barcode, target: Barcode) {
        if let Some(entry) = self.vertices.get_mut(&source) {
            entry.outgoing.push(edge);
        }
        if let Some(entry) = self.vertices.get_mut(&target) {
            entry.incoming.push(edge);
        }
    }

    fn detach(&mut self, edge: EdgeIndex, source: Barcode, target: Barcode) {
        if let Some(entry) = self.vertices.get_mut(&source) {
            remove_from_list(&mut entry.outgoing, edge);
        }
        if let Some(entry) = self.vertices.get_mut(&target) {
            remove_from_list(&mut entry.incoming, edge);
        }
    }
}

/// Removes an edge from an edge list, keeping the order of the others.
#[inline]
fn remove_from_list(list: &mut EdgeList, edge: EdgeIndex) {
    if let Some(position) = list.iter().position(|&e| e == edge) {
        list.remove(position);
    }
}

impl<V, E> Default for MultiGraph<V, E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Error generated when linking vertices of a [`MultiGraph`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum LinkError {
    /// The vertex does not exist.
    #[error("unknown vertex {vertex}")]
    UnknownVertex {
        /// The missing vertex.
        vertex: Barcode,
    },
    /// The edge does not exist.
    #[error("unknown edge {edge:?}")]
    UnknownEdge {
        /// The missing edge.
        edge: EdgeIndex,
    },
}
