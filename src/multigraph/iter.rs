//! Iterator structures for a multigraph

use std::iter::{Copied, Enumerate, FusedIterator};
use std::slice;

use super::{EdgeEntry, MultiGraph, VertexEntry};
use crate::{Barcode, Direction, EdgeIndex};

/// Iterator over the vertices of a graph, created by [`MultiGraph::vertices`].
#[derive(Clone, Debug)]
pub struct Vertices<'a, V> {
    iter: indexmap::map::Iter<'a, Barcode, VertexEntry<V>>,
}

impl<'a, V> Vertices<'a, V> {
    pub(super) fn new(iter: indexmap::map::Iter<'a, Barcode, VertexEntry<V>>) -> Self {
        Self { iter }
    }

    /// Pairs each vertex with its payload.
    pub fn with_weights(self) -> impl Iterator<Item = (Barcode, &'a V)> + 'a
    where
        V: 'a,
    {
        self.iter.map(|(&vertex, entry)| (vertex, &entry.weight))
    }
}

impl<V> Iterator for Vertices<'_, V> {
    type Item = Barcode;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(&vertex, _)| vertex)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<V> ExactSizeIterator for Vertices<'_, V> {
    fn len(&self) -> usize {
        self.iter.len()
    }
}

impl<V> DoubleEndedIterator for Vertices<'_, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back().map(|(&vertex, _)| vertex)
    }
}

impl<V> FusedIterator for Vertices<'_, V> {}

/// A borrowed edge of a [`MultiGraph`], with its endpoints and payload.
#[derive(Debug, PartialEq)]
pub struct EdgeRef<'a, E> {
    /// Index of the edge.
    pub index: EdgeIndex,
    /// Vertex the edge leaves from.
    pub source: Barcode,
    /// Vertex the edge points into.
    pub target: Barcode,
    /// Payload of the edge.
    pub weight: &'a E,
}

impl<E> Clone for EdgeRef<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for EdgeRef<'_, E> {}

/// Iterator over the edges of a graph, created by [`MultiGraph::edges`].
#[derive(Clone, Debug)]
pub struct Edges<'a, E> {
    iter: Enumerate<slice::Iter<'a, EdgeEntry<E>>>,
    len: usize,
}

impl<'a, E> Edges<'a, E> {
    pub(super) fn new(edges: &'a [EdgeEntry<E>], len: usize) -> Self {
        Self {
            iter: edges.iter().enumerate(),
            len,
        }
    }
}

impl<'a, E> Iterator for Edges<'a, E> {
    type Item = EdgeRef<'a, E>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.find_map(|(index, entry)| match entry {
            EdgeEntry::Free(_) => None,
            EdgeEntry::Edge(meta) => {
                self.len -= 1;
                Some(EdgeRef {
                    index: EdgeIndex::new(index),
                    source: meta.source,
                    target: meta.target,
                    weight: &meta.weight,
                })
            }
        })
    }

    #[inline]
    fn count(self) -> usize {
        self.len
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<E> ExactSizeIterator for Edges<'_, E> {
    fn len(&self) -> usize {
        self.len
    }
}

impl<E> FusedIterator for Edges<'_, E> {}

/// Iterator over the edges attached to one side of a vertex. See
/// [`MultiGraph::vertex_edges`], [`MultiGraph::incoming`] and
/// [`MultiGraph::outgoing`].
#[derive(Clone, Debug)]
pub struct VertexEdges<'a> {
    iter: Copied<slice::Iter<'a, EdgeIndex>>,
}

impl<'a> VertexEdges<'a> {
    pub(super) fn new(edges: &'a [EdgeIndex]) -> Self {
        Self {
            iter: edges.iter().copied(),
        }
    }
}

impl Iterator for VertexEdges<'_> {
    type Item = EdgeIndex;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }

    #[inline]
    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.iter.nth(n)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl ExactSizeIterator for VertexEdges<'_> {
    fn len(&self) -> usize {
        self.iter.len()
    }
}

impl DoubleEndedIterator for VertexEdges<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back()
    }
}

impl FusedIterator for VertexEdges<'_> {}

/// Iterator over the neighbours of a vertex, created by
/// [`MultiGraph::neighbours`].
///
/// May contain duplicates if the graph has parallel edges.
#[derive(Clone, Debug)]
pub struct Neighbours<'a, V, E> {
    graph: &'a MultiGraph<V, E>,
    edges: VertexEdges<'a>,
    /// Side of the edges the neighbour sits on.
    far_side: Direction,
}

impl<'a, V, E> Neighbours<'a, V, E> {
    pub(super) fn new(
        graph: &'a MultiGraph<V, E>,
        edges: VertexEdges<'a>,
        direction: Direction,
    ) -> Self {
        Self {
            graph,
            edges,
            far_side: direction.reverse(),
        }
    }
}

impl<V, E> Iterator for Neighbours<'_, V, E> {
    type Item = Barcode;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let edge = self.edges.next()?;
        self.graph.edge_endpoint(edge, self.far_side)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.edges.size_hint()
    }
}

impl<V, E> ExactSizeIterator for Neighbours<'_, V, E> {
    fn len(&self) -> usize {
        self.edges.len()
    }
}

impl<V, E> FusedIterator for Neighbours<'_, V, E> {}
