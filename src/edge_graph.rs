//! Event graphs where particles are edges.
//!
//! The vertices of the graph are the physics vertices of the event record,
//! at which particles are produced, decay or are absorbed. Each particle is an
//! edge running from its production vertex to its decay vertex. Several
//! particles may connect the same pair of vertices, so particles are always
//! addressed by their [`EdgeIndex`], or looked up by barcode.
//!
//! # Conventions
//!
//! For a particle `a ──p──> b`, `a` is its *out* vertex (it is outgoing from
//! it) and `b` its *in* vertex. The particles incoming into `a` are its
//! parents, the other particles outgoing from `a` its siblings, and the
//! particles outgoing from `b` its children.

use std::collections::HashMap;

use delegate::delegate;
use itertools::Itertools;
use log::{debug, trace, warn};

use crate::config::GraphConfig;
use crate::multigraph::MultiGraph;
use crate::particle::{EdgeParticle, Particle};
use crate::state::mark_edge_states;
use crate::{Barcode, BuildError, EdgeIndex};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An event graph with one edge per particle.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct EdgeGraph {
    graph: MultiGraph<(), Particle>,
    /// Edge carrying each particle.
    edges: HashMap<Barcode, EdgeIndex>,
}

impl EdgeGraph {
    /// Create a new empty [`EdgeGraph`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembles the graph of an event from its particle records.
    ///
    /// Vertices are created on first use. The records are expected to have
    /// their implicit vertices filled in already, see
    /// [`EdgeParticle::from_vertices`].
    ///
    /// # Errors
    ///
    ///  - [`BuildError::DuplicateBarcode`] when two particles share a barcode.
    ///  - [`BuildError::UnsynthesizedVertex`] when a particle's decay vertex is
    ///    still the placeholder `0`.
    ///  - [`BuildError::SelfLoop`] when a particle is produced and absorbed at
    ///    the same vertex.
    pub fn from_particles(
        particles: impl IntoIterator<Item = EdgeParticle>,
    ) -> Result<Self, BuildError> {
        let particles = particles.into_iter();
        let mut graph = MultiGraph::with_capacity(particles.size_hint().0, particles.size_hint().0);
        let mut edges = HashMap::with_capacity(particles.size_hint().0);

        for EdgeParticle {
            particle,
            vtx_out_barcode: out_vertex,
            vtx_in_barcode: in_vertex,
        } in particles
        {
            let barcode = particle.barcode;
            if edges.contains_key(&barcode) {
                return Err(BuildError::DuplicateBarcode { barcode });
            }
            if in_vertex == 0 {
                return Err(BuildError::UnsynthesizedVertex { particle: barcode });
            }
            if out_vertex == in_vertex {
                return Err(BuildError::SelfLoop {
                    particle: barcode,
                    vertex: out_vertex,
                });
            }
            graph.ensure_vertex(out_vertex);
            graph.ensure_vertex(in_vertex);
            let edge = graph.add_edge(out_vertex, in_vertex, particle)?;
            edges.insert(barcode, edge);
            trace!("Added edge {out_vertex} -> {in_vertex} for particle {barcode}");
        }

        mark_edge_states(&mut graph);
        debug!(
            "Assembled {} particles between {} vertices",
            graph.edge_count(),
            graph.vertex_count()
        );
        Ok(Self { graph, edges })
    }

    /// Assembles the graph of an event and simplifies it as configured.
    ///
    /// The species filters are applied in order, then redundant particles
    /// are removed.
    ///
    /// # Errors
    ///
    /// See [`EdgeGraph::from_particles`].
    pub fn build(
        particles: impl IntoIterator<Item = EdgeParticle>,
        config: &GraphConfig,
    ) -> Result<Self, BuildError> {
        let mut graph = Self::from_particles(particles)?;
        for filter in &config.remove_species {
            graph.remove_species(filter.pdgid, filter.final_state_only);
        }
        if config.remove_redundants {
            graph.remove_redundants();
        }
        Ok(graph)
    }

    /// Returns the underlying graph.
    #[inline]
    pub fn graph(&self) -> &MultiGraph<(), Particle> {
        &self.graph
    }

    /// Consumes the wrapper, returning the underlying graph.
    #[inline]
    pub fn into_graph(self) -> MultiGraph<(), Particle> {
        self.graph
    }

    delegate! {
        to self.graph {
            /// Returns the number of physics vertices in the graph.
            pub fn vertex_count(&self) -> usize;
            /// Returns the number of particles in the graph.
            #[call(edge_count)]
            pub fn particle_count(&self) -> usize;
            /// Returns whether the graph has neither vertices nor particles.
            pub fn is_empty(&self) -> bool;
            /// Returns the particle carried by an edge.
            #[call(edge_weight)]
            pub fn particle_at(&self, edge: EdgeIndex) -> Option<&Particle>;
            /// Returns the production and decay vertices of a particle edge.
            #[call(edge_endpoints)]
            pub fn vertices_of(&self, edge: EdgeIndex) -> Option<(Barcode, Barcode)>;
        }
    }

    /// Finds the edge carrying the particle with the given barcode.
    #[inline]
    pub fn edge_of(&self, barcode: Barcode) -> Option<EdgeIndex> {
        self.edges.get(&barcode).copied()
    }

    /// Returns the particle with the given barcode.
    #[inline]
    pub fn particle(&self, barcode: Barcode) -> Option<&Particle> {
        self.edge_of(barcode)
            .and_then(|edge| self.graph.edge_weight(edge))
    }

    /// Iterates over the particles of the graph.
    pub fn particles(&self) -> impl Iterator<Item = &Particle> + '_ {
        self.graph.edges().map(|edge| edge.weight)
    }

    /// Returns the particles flowing into the production vertex of a
    /// particle.
    pub fn parents(&self, edge: EdgeIndex) -> Vec<EdgeIndex> {
        match self.graph.edge_endpoints(edge) {
            Some((out_vertex, _)) => self.graph.incoming(out_vertex).collect(),
            None => Vec::new(),
        }
    }

    /// Returns the particles flowing out of the decay vertex of a particle.
    pub fn children(&self, edge: EdgeIndex) -> Vec<EdgeIndex> {
        match self.graph.edge_endpoints(edge) {
            Some((_, in_vertex)) => self.graph.outgoing(in_vertex).collect(),
            None => Vec::new(),
        }
    }

    /// Removes a particle, merging its production and decay vertices.
    ///
    /// - If the particle is the only thing attached to its production
    ///   vertex, that vertex is removed along with it.
    /// - Otherwise, if the particle is the only thing attached to its decay
    ///   vertex, that vertex is removed along with it.
    /// - Otherwise the particles leaving the decay vertex now leave the
    ///   production vertex, the other particles entering the decay vertex now
    ///   enter the production vertex, and the decay vertex is removed.
    ///   Particles running parallel to the removed one would become loops and
    ///   are dropped instead.
    ///
    /// Edge indices of the moved particles are preserved. The state flags of
    /// the other particles are left untouched.
    ///
    /// Returns `None` if the edge is not in the graph.
    ///
    /// # Example
    ///
    /// ```
    /// # use particlegraph::{EdgeGraph, EdgeParticle, Particle};
    /// // -1 ──e──> -2 ──γ──> -3 ──e+──> -4
    /// //                        ──e-──> -5
    /// let mut graph = EdgeGraph::from_particles([
    ///     EdgeParticle::new(Particle::new(1, 11), -1, -2),
    ///     EdgeParticle::new(Particle::new(2, 22), -2, -3),
    ///     EdgeParticle::new(Particle::new(3, -11), -3, -4),
    ///     EdgeParticle::new(Particle::new(4, 11), -3, -5),
    /// ])
    /// .unwrap();
    ///
    /// let photon = graph.edge_of(2).unwrap();
    /// assert_eq!(graph.remove_particle(photon).unwrap().pdgid, 22);
    /// assert_eq!(graph.vertex_count(), 4);
    /// assert_eq!(graph.vertices_of(graph.edge_of(3).unwrap()), Some((-2, -4)));
    /// ```
    pub fn remove_particle(&mut self, edge: EdgeIndex) -> Option<Particle> {
        let (out_vertex, in_vertex) = self.graph.edge_endpoints(edge)?;

        if self.graph.in_degree(out_vertex) == 0 && self.graph.out_degree(out_vertex) == 1 {
            let particle = self.unlink(edge);
            self.graph.remove_vertex(out_vertex);
            trace!("Removed edge {edge:?} with its production vertex {out_vertex}");
            return particle;
        }

        if self.graph.out_degree(in_vertex) == 0 && self.graph.in_degree(in_vertex) == 1 {
            let particle = self.unlink(edge);
            self.graph.remove_vertex(in_vertex);
            trace!("Removed edge {edge:?} with its decay vertex {in_vertex}");
            return particle;
        }

        let outgoing = self.graph.outgoing(in_vertex).collect_vec();
        for child in outgoing {
            let (_, target) = self
                .graph
                .edge_endpoints(child)
                .expect("edges attached to a vertex are live");
            self.graph
                .move_edge(child, out_vertex, target)
                .expect("endpoints of a live edge are live vertices");
            trace!("Moved {child:?} to {out_vertex} -> {target}");
        }

        let incoming = self
            .graph
            .incoming(in_vertex)
            .filter(|&other| other != edge)
            .collect_vec();
        for other in incoming {
            let (source, _) = self
                .graph
                .edge_endpoints(other)
                .expect("edges attached to a vertex are live");
            if source == out_vertex {
                warn!(
                    "Dropping {other:?}, parallel to removed edge {edge:?} between {out_vertex} and {in_vertex}"
                );
                self.unlink(other);
                continue;
            }
            self.graph
                .move_edge(other, source, out_vertex)
                .expect("endpoints of a live edge are live vertices");
            trace!("Moved {other:?} to {source} -> {out_vertex}");
        }

        let particle = self.unlink(edge);
        self.graph.remove_vertex(in_vertex);
        trace!("Removed edge {edge:?}, merging {in_vertex} into {out_vertex}");
        particle
    }

    /// Removes a particle edge and forgets its barcode.
    fn unlink(&mut self, edge: EdgeIndex) -> Option<Particle> {
        let particle = self.graph.remove_edge(edge)?;
        self.edges.remove(&particle.barcode);
        Some(particle)
    }

    /// Removes the particle with the given barcode.
    ///
    /// See [`EdgeGraph::remove_particle`].
    pub fn remove_particle_by_barcode(&mut self, barcode: Barcode) -> Option<Particle> {
        let edge = self.edge_of(barcode)?;
        self.remove_particle(edge)
    }

    /// Returns whether a particle only repeats its parent.
    ///
    /// That is the case when its production vertex has a single incoming
    /// particle, of the same species (charge included), and no other
    /// outgoing particle, and its decay vertex has at least one outgoing
    /// particle. Parallel edges count as separate siblings.
    pub fn is_redundant(&self, edge: EdgeIndex) -> bool {
        let (Some((out_vertex, in_vertex)), Some(particle)) =
            (self.graph.edge_endpoints(edge), self.graph.edge_weight(edge))
        else {
            return false;
        };
        if self.graph.in_degree(out_vertex) != 1
            || self.graph.out_degree(out_vertex) != 1
            || self.graph.out_degree(in_vertex) == 0
        {
            return false;
        }
        self.graph
            .incoming(out_vertex)
            .next()
            .and_then(|parent| self.graph.edge_weight(parent))
            .is_some_and(|parent| parent.pdgid == particle.pdgid)
    }

    /// Removes redundant particles until none remain.
    ///
    /// Removing a particle changes which of its neighbours are redundant, so
    /// the edges are scanned again from the start after every removal.
    ///
    /// Returns the number of particles removed.
    pub fn remove_redundants(&mut self) -> usize {
        let mut total = 0;
        loop {
            let candidate = self
                .graph
                .edges()
                .map(|edge| edge.index)
                .find(|&edge| self.is_redundant(edge));
            let Some(edge) = candidate else {
                break;
            };
            if let Some(particle) = self.remove_particle(edge) {
                debug!("Removed redundant particle {particle}");
            }
            total += 1;
        }
        debug!("Removed {total} redundant particles");
        total
    }

    /// Removes every particle of a species, antiparticles included.
    ///
    /// With `final_state_only`, only particles whose decay vertex has no
    /// outgoing particles at the time they are checked are removed. The
    /// graph is scanned again after each removal until no particle matches.
    ///
    /// Returns the number of particles removed.
    pub fn remove_species(&mut self, pdgid: i32, final_state_only: bool) -> usize {
        let mut total = 0;
        loop {
            let found = self
                .graph
                .edges()
                .find(|edge| {
                    edge.weight.is_species(pdgid)
                        && (!final_state_only || self.graph.out_degree(edge.target) == 0)
                })
                .map(|edge| edge.index);
            let Some(edge) = found else {
                break;
            };
            self.remove_particle(edge);
            total += 1;
        }
        debug!("Removed {total} particles of species {pdgid}");
        total
    }
}

impl From<EdgeGraph> for MultiGraph<(), Particle> {
    fn from(graph: EdgeGraph) -> Self {
        graph.graph
    }
}
