#![warn(missing_docs)]
//! `particlegraph` turns Monte-Carlo event records into parent/child graphs
//! of particles, and simplifies them by eliding redundant particles.
//!
//! An event record is a flat list of particles, each carrying either a list
//! of parent barcodes or a pair of production/decay vertex barcodes. Both are
//! assembled into a directed [`MultiGraph`] keyed by integer barcodes, in one
//! of two dual representations:
//!
//! - [`NodeGraph`]: every particle is a vertex, and edges point from parents
//!   to children.
//! - [`EdgeGraph`]: every particle is an edge running from its production
//!   vertex to its decay vertex.
//!
//! After assembly each particle is flagged as initial-state (nothing produces
//! it) and/or final-state (nothing consumes it). Redundant particles, that is
//! same-species pass-throughs with a single parent and a single child, can
//! then be spliced out without losing any relationship between the remaining
//! particles.
//!
//! # Example
//!
//! ```
//! use particlegraph::{NodeGraph, NodeParticle, Particle};
//!
//! // q -> g -> g -> u
//! let particles = vec![
//!     NodeParticle::new(Particle::new(1, 2), []),
//!     NodeParticle::new(Particle::new(2, 21), [1]),
//!     NodeParticle::new(Particle::new(3, 21), [2]),
//!     NodeParticle::new(Particle::new(4, 2), [3]),
//! ];
//! let mut graph = NodeGraph::from_particles(particles).unwrap();
//! assert!(graph.particle(1).unwrap().initial_state);
//! assert!(graph.particle(4).unwrap().final_state);
//!
//! // The second gluon only repeats its parent.
//! assert_eq!(graph.remove_redundants(), 1);
//! assert_eq!(graph.children(2), vec![4]);
//! ```
//!
//! # Features
//!
//! - `serde` enables serialization and deserialization of particles, graphs
//!   and [`GraphConfig`].
//! - `petgraph` enables conversion of a [`MultiGraph`] into a `petgraph`
//!   stable graph.
//! - `proptest` exposes random event generators for property testing.
//!
use std::num::NonZeroU32;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod config;
pub mod edge_graph;
pub mod multigraph;
pub mod node_graph;
pub mod particle;
pub mod render;
pub mod state;
pub mod stats;

#[cfg(feature = "proptest")]
pub mod proptest;

#[doc(inline)]
pub use crate::config::{ConfigError, GraphConfig, InputFormat, Representation, SpeciesFilter};
#[doc(inline)]
pub use crate::edge_graph::EdgeGraph;
#[doc(inline)]
pub use crate::multigraph::{LinkError, MultiGraph};
#[doc(inline)]
pub use crate::node_graph::NodeGraph;
#[doc(inline)]
pub use crate::particle::{EdgeParticle, NodeParticle, Particle};
#[doc(inline)]
pub use crate::stats::GraphStats;

/// Identifier of a particle or a physics vertex, as assigned by the event
/// record. Not required to be contiguous, and may be negative.
pub type Barcode = i64;

/// Direction of an edge relative to a vertex.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Eq, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum Direction {
    /// Edges pointing into a vertex.
    #[default]
    Incoming = 0,
    /// Edges leaving a vertex.
    Outgoing = 1,
}

impl Direction {
    /// Incoming and outgoing directions.
    pub const BOTH: [Direction; 2] = [Direction::Incoming, Direction::Outgoing];

    /// Returns the opposite direction.
    #[inline(always)]
    pub fn reverse(self) -> Direction {
        match self {
            Direction::Incoming => Direction::Outgoing,
            Direction::Outgoing => Direction::Incoming,
        }
    }
}

/// Index of an edge within a [`MultiGraph`].
///
/// Edge indices stay valid until the edge is removed, and are reused for new
/// edges after that. Restricted to be at most `2^31 - 1`. This type admits
/// the *null pointer optimization* so that `Option<EdgeIndex>` takes as much
/// space as an `EdgeIndex` by itself.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct EdgeIndex(NonZeroU32);

impl EdgeIndex {
    /// Maximum allowed index.
    const MAX: usize = (u32::MAX / 2) as usize - 1;

    /// Creates a new edge index from a `usize`.
    ///
    /// # Panics
    ///
    /// Panics if the index is greater than `2^31 - 2`.
    #[inline]
    pub fn new(index: usize) -> Self {
        index.try_into().unwrap()
    }

    /// Returns the index as a `usize`.
    #[inline]
    pub fn index(self) -> usize {
        self.into()
    }
}

impl From<EdgeIndex> for usize {
    #[inline]
    fn from(index: EdgeIndex) -> Self {
        u32::from(index.0) as usize - 1
    }
}

impl TryFrom<usize> for EdgeIndex {
    type Error = IndexError;

    #[inline]
    fn try_from(index: usize) -> Result<Self, Self::Error> {
        if index > Self::MAX {
            Err(IndexError { index })
        } else {
            // SAFETY: The value cannot be zero
            Ok(Self(unsafe { NonZeroU32::new_unchecked(1 + index as u32) }))
        }
    }
}

impl std::fmt::Debug for EdgeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // avoid unnecessary newlines in alternate mode
        write!(f, "EdgeIndex({})", self.index())
    }
}

/// Error indicating an `EdgeIndex` is too large.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("the index {index} is too large.")]
pub struct IndexError {
    index: usize,
}

/// Error raised while assembling a graph from an event record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum BuildError {
    /// A particle lists a parent barcode that no particle in the event has.
    #[error("particle {particle} has unknown parent {parent}")]
    UnknownParent {
        /// The particle listing the parent.
        particle: Barcode,
        /// The missing parent barcode.
        parent: Barcode,
    },
    /// Two particles in the event share a barcode.
    #[error("barcode {barcode} is used by more than one particle")]
    DuplicateBarcode {
        /// The repeated barcode.
        barcode: Barcode,
    },
    /// A particle is its own parent, or is produced and absorbed at the same
    /// vertex.
    #[error("particle {particle} loops back onto {vertex}")]
    SelfLoop {
        /// The looping particle.
        particle: Barcode,
        /// The parent or vertex it loops onto.
        vertex: Barcode,
    },
    /// A particle still has the placeholder decay vertex `0`, so its vertex
    /// was never synthesized.
    #[error("particle {particle} has no decay vertex")]
    UnsynthesizedVertex {
        /// The dangling particle.
        particle: Barcode,
    },
    /// The graph rejected a link.
    #[error(transparent)]
    Link(#[from] LinkError),
}
