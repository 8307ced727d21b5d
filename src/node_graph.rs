//! Event graphs where particles are vertices.
//!
//! Each particle becomes a vertex of a [`MultiGraph`] keyed by its barcode,
//! with an edge from every parent to each of its children. Parents and
//! children are always counted as distinct particles: two parallel edges
//! between the same pair of particles describe a single relationship.

use std::collections::HashSet;

use delegate::delegate;
use itertools::Itertools;
use log::{debug, trace};

use crate::config::GraphConfig;
use crate::multigraph::MultiGraph;
use crate::particle::{NodeParticle, Particle};
use crate::state::mark_node_states;
use crate::{Barcode, BuildError, Direction};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Barcode of the pseudo-particle standing for the whole event, when the
/// event has no particle `0`.
const SYSTEM_BARCODE: Barcode = 0;
/// Barcode of the pseudo-particle when `0` is taken by a real particle.
const SYSTEM_BARCODE_FALLBACK: Barcode = -1;

/// An event graph with one vertex per particle.
///
/// Edges point from parents to children and carry no payload.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct NodeGraph {
    graph: MultiGraph<Particle, ()>,
}

impl NodeGraph {
    /// Create a new empty [`NodeGraph`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembles the graph of an event from its particle records.
    ///
    /// A parent list whose first and last entries are both the system
    /// barcode is ignored. The system barcode is `-1` if the event has a
    /// particle with barcode `0`, and `0` otherwise.
    ///
    /// The state flags of every particle are inferred once all the edges
    /// have been added, after which particles without parents or children
    /// are dropped.
    ///
    /// # Errors
    ///
    ///  - [`BuildError::DuplicateBarcode`] when two particles share a barcode.
    ///  - [`BuildError::UnknownParent`] when a parent is not in the event.
    ///  - [`BuildError::SelfLoop`] when a particle lists itself as parent.
    pub fn from_particles(
        particles: impl IntoIterator<Item = NodeParticle>,
    ) -> Result<Self, BuildError> {
        let particles = particles.into_iter();
        let mut graph = MultiGraph::with_capacity(particles.size_hint().0, 0);
        let mut parent_lists = Vec::with_capacity(particles.size_hint().0);

        for NodeParticle {
            particle,
            parent_barcodes,
        } in particles
        {
            let barcode = particle.barcode;
            if graph.add_vertex(barcode, particle).is_some() {
                return Err(BuildError::DuplicateBarcode { barcode });
            }
            parent_lists.push((barcode, parent_barcodes));
        }

        let system = if graph.contains_vertex(0) {
            SYSTEM_BARCODE_FALLBACK
        } else {
            SYSTEM_BARCODE
        };

        for (barcode, parents) in parent_lists {
            if let (Some(&first), Some(&last)) = (parents.first(), parents.last()) {
                if first == system && last == system {
                    trace!("Skipping system parents of particle {barcode}");
                    continue;
                }
            }
            for parent in parents {
                if parent == barcode {
                    return Err(BuildError::SelfLoop {
                        particle: barcode,
                        vertex: parent,
                    });
                }
                if !graph.contains_vertex(parent) {
                    return Err(BuildError::UnknownParent {
                        particle: barcode,
                        parent,
                    });
                }
                graph.add_edge(parent, barcode, ())?;
                trace!("Added edge {parent} -> {barcode}");
            }
        }

        mark_node_states(&mut graph);

        let mut node_graph = Self { graph };
        let isolated = node_graph.remove_isolated();
        debug!(
            "Assembled {} particles and {} edges, dropped {isolated} isolated particles",
            node_graph.particle_count(),
            node_graph.edge_count()
        );
        Ok(node_graph)
    }

    /// Assembles the graph of an event and simplifies it as configured.
    ///
    /// The species filters are applied in order, then redundant particles
    /// are removed.
    ///
    /// # Errors
    ///
    /// See [`NodeGraph::from_particles`].
    pub fn build(
        particles: impl IntoIterator<Item = NodeParticle>,
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
    pub fn graph(&self) -> &MultiGraph<Particle, ()> {
        &self.graph
    }

    /// Consumes the wrapper, returning the underlying graph.
    #[inline]
    pub fn into_graph(self) -> MultiGraph<Particle, ()> {
        self.graph
    }

    delegate! {
        to self.graph {
            /// Returns the number of particles in the graph.
            #[call(vertex_count)]
            pub fn particle_count(&self) -> usize;
            /// Returns the number of parent/child edges in the graph.
            pub fn edge_count(&self) -> usize;
            /// Returns whether the graph has no particles.
            pub fn is_empty(&self) -> bool;
            /// Returns whether a particle with the given barcode is in the graph.
            #[call(contains_vertex)]
            pub fn contains_particle(&self, barcode: Barcode) -> bool;
        }
    }

    /// Returns the particle with the given barcode.
    #[inline]
    pub fn particle(&self, barcode: Barcode) -> Option<&Particle> {
        self.graph.vertex_weight(barcode)
    }

    /// Iterates over the particles of the graph, in record order.
    pub fn particles(&self) -> impl Iterator<Item = &Particle> + '_ {
        self.graph.vertices().with_weights().map(|(_, particle)| particle)
    }

    /// Returns the distinct parents of a particle, in attachment order.
    pub fn parents(&self, barcode: Barcode) -> Vec<Barcode> {
        self.graph
            .neighbours(barcode, Direction::Incoming)
            .unique()
            .collect()
    }

    /// Returns the distinct children of a particle, in attachment order.
    pub fn children(&self, barcode: Barcode) -> Vec<Barcode> {
        self.graph
            .neighbours(barcode, Direction::Outgoing)
            .unique()
            .collect()
    }

    /// Removes a particle, splicing it out of the graph.
    ///
    /// Every parent of the particle becomes a parent of each of its
    /// children. The state flags of the other particles are left untouched.
    ///
    /// Returns `None` if the particle is not in the graph.
    ///
    /// # Example
    ///
    /// ```
    /// # use particlegraph::{NodeGraph, NodeParticle, Particle};
    /// let mut graph = NodeGraph::from_particles([
    ///     NodeParticle::new(Particle::new(1, 11), []),
    ///     NodeParticle::new(Particle::new(2, 11), []),
    ///     NodeParticle::new(Particle::new(3, 23), [1, 2]),
    ///     NodeParticle::new(Particle::new(4, 13), [3]),
    ///     NodeParticle::new(Particle::new(5, -13), [3]),
    /// ])
    /// .unwrap();
    ///
    /// let z = graph.remove_particle(3).unwrap();
    /// assert_eq!(z.pdgid, 23);
    /// assert_eq!(graph.parents(4), vec![1, 2]);
    /// assert_eq!(graph.children(2), vec![4, 5]);
    /// assert_eq!(graph.edge_count(), 4);
    /// ```
    pub fn remove_particle(&mut self, barcode: Barcode) -> Option<Particle> {
        if !self.graph.contains_vertex(barcode) {
            return None;
        }
        let parents = self.parents(barcode);
        let children = self.children(barcode);
        for (&parent, &child) in parents.iter().cartesian_product(&children) {
            self.graph
                .add_edge(parent, child, ())
                .expect("neighbours of a live vertex are live vertices");
            trace!("Rewired {parent} -> {child}");
        }
        let particle = self.graph.remove_vertex(barcode);
        trace!("Removed particle {barcode}");
        particle
    }

    /// Removes every particle that has neither parents nor children.
    ///
    /// Returns the number of particles removed.
    pub fn remove_isolated(&mut self) -> usize {
        let isolated = self
            .graph
            .vertices()
            .filter(|&v| self.graph.in_degree(v) == 0 && self.graph.out_degree(v) == 0)
            .collect_vec();
        for &barcode in &isolated {
            self.graph.remove_vertex(barcode);
        }
        isolated.len()
    }

    /// Returns whether a particle only repeats its parent.
    ///
    /// That is the case when it has exactly one parent and one child, and
    /// the same species code as its parent (charge included).
    pub fn is_redundant(&self, barcode: Barcode) -> bool {
        let Some(particle) = self.particle(barcode) else {
            return false;
        };
        let parents = self.parents(barcode);
        let [parent] = parents.as_slice() else {
            return false;
        };
        if self.children(barcode).len() != 1 {
            return false;
        }
        self.particle(*parent)
            .is_some_and(|parent| parent.pdgid == particle.pdgid)
    }

    /// Removes redundant particles until none remain.
    ///
    /// Each pass classifies the particles present when the pass starts, and
    /// removes them one by one against the live graph. Passes repeat until
    /// one removes nothing.
    ///
    /// Returns the number of particles removed.
    pub fn remove_redundants(&mut self) -> usize {
        let mut total = 0;
        loop {
            let snapshot = self.graph.vertices().collect_vec();
            let mut removed = HashSet::new();
            for barcode in snapshot {
                if removed.contains(&barcode) || !self.is_redundant(barcode) {
                    continue;
                }
                if let Some(particle) = self.remove_particle(barcode) {
                    debug!("Removed redundant particle {particle}");
                    removed.insert(barcode);
                }
            }
            if removed.is_empty() {
                break;
            }
            total += removed.len();
        }
        debug!("Removed {total} redundant particles");
        total
    }

    /// Removes every particle of a species, antiparticles included.
    ///
    /// With `final_state_only`, only particles without children at the time
    /// they are checked are removed. Since removing a particle gives its
    /// children to its parents, the graph is scanned again after each
    /// removal until no particle matches.
    ///
    /// Returns the number of particles removed.
    pub fn remove_species(&mut self, pdgid: i32, final_state_only: bool) -> usize {
        let mut total = 0;
        loop {
            let found = self
                .graph
                .vertices()
                .with_weights()
                .find(|&(barcode, particle)| {
                    particle.is_species(pdgid)
                        && (!final_state_only || self.graph.out_degree(barcode) == 0)
                })
                .map(|(barcode, _)| barcode);
            let Some(barcode) = found else {
                break;
            };
            self.remove_particle(barcode);
            total += 1;
        }
        debug!("Removed {total} particles of species {pdgid}");
        total
    }
}

impl From<NodeGraph> for MultiGraph<Particle, ()> {
    fn from(graph: NodeGraph) -> Self {
        graph.graph
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::SpeciesFilter;
    use rstest::{fixture, rstest};

    fn record(barcode: Barcode, pdgid: i32, parents: &[Barcode]) -> NodeParticle {
        NodeParticle::new(Particle::new(barcode, pdgid), parents.iter().copied())
    }

    fn flags(graph: &NodeGraph, barcode: Barcode) -> (bool, bool) {
        let particle = graph.particle(barcode).unwrap();
        (particle.initial_state, particle.final_state)
    }

    /// Two quarks annihilating into a gluon that propagates twice before
    /// splitting into a quark pair, one of which radiates a photon.
    ///
    /// ```text
    /// 1 d  ┐                 ┌ 6 u ── 8 gamma
    ///      ├ 3 g ─ 4 g ─ 5 g ┤
    /// 2 d~ ┘                 └ 7 u~
    /// ```
    #[fixture]
    fn gluon_chain() -> Vec<NodeParticle> {
        vec![
            record(1, 1, &[]),
            record(2, -1, &[]),
            record(3, 21, &[1, 2]),
            record(4, 21, &[3]),
            record(5, 21, &[4]),
            record(6, 2, &[5]),
            record(7, -2, &[5]),
            record(8, 22, &[6]),
        ]
    }

    #[test]
    fn empty_event() {
        let graph = NodeGraph::from_particles([]).unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph, NodeGraph::new());
    }

    #[rstest]
    fn assemble(gluon_chain: Vec<NodeParticle>) {
        let graph = NodeGraph::from_particles(gluon_chain).unwrap();
        assert_eq!(graph.particle_count(), 8);
        assert_eq!(graph.edge_count(), 7);
        assert_eq!(graph.parents(3), vec![1, 2]);
        assert_eq!(graph.children(5), vec![6, 7]);

        assert_eq!(flags(&graph, 1), (true, false));
        assert_eq!(flags(&graph, 2), (true, false));
        assert_eq!(flags(&graph, 4), (false, false));
        assert_eq!(flags(&graph, 7), (false, true));
        assert_eq!(flags(&graph, 8), (false, true));
    }

    #[rstest]
    fn flags_match_degrees(gluon_chain: Vec<NodeParticle>) {
        let graph = NodeGraph::from_particles(gluon_chain).unwrap();
        for barcode in graph.graph().vertices() {
            let particle = graph.particle(barcode).unwrap();
            assert_eq!(particle.initial_state, graph.parents(barcode).is_empty());
            assert_eq!(particle.final_state, graph.children(barcode).is_empty());
        }
    }

    #[rstest]
    fn remove_gluon_chain(gluon_chain: Vec<NodeParticle>) {
        let mut graph = NodeGraph::from_particles(gluon_chain).unwrap();
        assert!(!graph.is_redundant(3));
        assert!(graph.is_redundant(4));
        assert!(!graph.is_redundant(5));

        assert_eq!(graph.remove_redundants(), 1);
        assert!(!graph.contains_particle(4));
        assert_eq!(graph.children(3), vec![5]);
        assert_eq!(graph.parents(5), vec![3]);
        // The remaining gluons still branch or have different parents.
        assert_eq!(graph.remove_redundants(), 0);
        assert_eq!(flags(&graph, 1), (true, false));
        assert_eq!(flags(&graph, 8), (false, true));
    }

    #[test]
    fn long_chain_collapses() {
        // q -> g -> g -> g -> g -> u
        let mut particles = vec![record(1, 2, &[])];
        for barcode in 2..=5 {
            particles.push(record(barcode, 21, &[barcode - 1]));
        }
        particles.push(record(6, 2, &[5]));

        let mut graph = NodeGraph::from_particles(particles).unwrap();
        assert_eq!(graph.remove_redundants(), 3);
        assert_eq!(graph.graph().vertices().collect_vec(), [1, 2, 6]);
        assert_eq!(graph.children(2), vec![6]);
        assert_eq!(flags(&graph, 1), (true, false));
        assert_eq!(flags(&graph, 6), (false, true));
    }

    #[rstest]
    fn redundancy_is_idempotent(gluon_chain: Vec<NodeParticle>) {
        let mut once = NodeGraph::from_particles(gluon_chain).unwrap();
        once.remove_redundants();
        let mut twice = once.clone();
        assert_eq!(twice.remove_redundants(), 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn different_parent_species_is_not_redundant() {
        // Two parents of different species, and a single parent of a
        // different species.
        let mut graph = NodeGraph::from_particles([
            record(1, 21, &[]),
            record(2, 22, &[]),
            record(3, 21, &[1, 2]),
            record(4, 11, &[3]),
            record(5, 13, &[4]),
            record(6, 13, &[5]),
        ])
        .unwrap();
        assert!(!graph.is_redundant(3));
        assert!(!graph.is_redundant(4));
        assert!(!graph.is_redundant(5));
        assert_eq!(graph.remove_redundants(), 0);
        assert_eq!(graph.particle_count(), 6);
    }

    #[test]
    fn antiparticle_is_not_redundant() {
        let mut graph = NodeGraph::from_particles([
            record(1, 5, &[]),
            record(2, -5, &[1]),
            record(3, 21, &[2]),
        ])
        .unwrap();
        assert!(!graph.is_redundant(2));
        assert_eq!(graph.remove_redundants(), 0);
    }

    #[test]
    fn parallel_parent_edges_count_once() {
        let mut graph = NodeGraph::from_particles([
            record(1, 21, &[]),
            record(2, 21, &[1, 1]),
            record(3, 1, &[2]),
        ])
        .unwrap();
        assert_eq!(graph.edge_count(), 3);
        assert!(graph.is_redundant(2));
        assert_eq!(graph.remove_redundants(), 1);
        // One new edge per distinct pair.
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.children(1), vec![3]);
    }

    #[test]
    fn remove_missing_particle() {
        let mut graph = NodeGraph::from_particles([record(1, 1, &[]), record(2, 1, &[1])]).unwrap();
        assert_eq!(graph.remove_particle(9), None);
        assert_eq!(graph.remove_particle(2).map(|p| p.barcode), Some(2));
        assert_eq!(graph.remove_particle(2), None);
        assert_eq!(graph.particle_count(), 1);
    }

    #[test]
    fn removal_keeps_flags_of_survivors() {
        let mut graph = NodeGraph::from_particles([
            record(1, 11, &[]),
            record(2, 22, &[1]),
            record(3, 11, &[2]),
            record(4, 22, &[3]),
        ])
        .unwrap();
        graph.remove_particle(4);
        // Particle 3 has no children anymore, but was not final-state.
        assert_eq!(flags(&graph, 3), (false, false));
        assert_eq!(flags(&graph, 1), (true, false));
    }

    #[rstest]
    #[case::final_only(true, 0, vec![2, 3])]
    #[case::everywhere(false, 2, vec![2, 5])]
    fn remove_photons(
        #[case] final_state_only: bool,
        #[case] removed: usize,
        #[case] children: Vec<Barcode>,
    ) {
        // An electron radiating a photon that propagates and converts.
        let mut graph = NodeGraph::from_particles([
            record(1, 11, &[]),
            record(2, 11, &[1]),
            record(3, 22, &[1]),
            record(4, 22, &[3]),
            record(5, 11, &[4]),
        ])
        .unwrap();
        assert_eq!(graph.remove_species(22, final_state_only), removed);
        assert_eq!(graph.children(1), children);
    }

    #[test]
    fn final_state_photons_only() {
        // An electron radiating an internal photon that converts, and a
        // final-state photon.
        let mut graph = NodeGraph::from_particles([
            record(1, 11, &[]),
            record(2, 11, &[1]),
            record(3, 22, &[1]),
            record(4, 11, &[3]),
            record(5, -11, &[3]),
            record(6, 22, &[2]),
        ])
        .unwrap();
        assert_eq!(graph.remove_species(22, true), 1);
        assert!(graph.contains_particle(3));
        assert!(!graph.contains_particle(6));
        assert_eq!(graph.remove_species(-22, false), 1);
        assert_eq!(graph.children(1), vec![2, 4, 5]);
    }

    #[test]
    fn final_state_removal_cascades() {
        // A photon whose only child is a photon: removing the child makes
        // the parent final.
        let mut graph = NodeGraph::from_particles([
            record(1, 11, &[]),
            record(2, 22, &[1]),
            record(3, 22, &[2]),
            record(4, 11, &[1]),
        ])
        .unwrap();
        assert_eq!(graph.remove_species(22, true), 2);
        assert_eq!(graph.graph().vertices().collect_vec(), [1, 4]);
    }

    #[rstest]
    #[case::zero_is_system(vec![record(1, 2212, &[0, 0]), record(2, 2212, &[0, 0]), record(3, 21, &[1, 2])], 2)]
    #[case::minus_one_is_system(vec![record(0, 90, &[]), record(1, 2212, &[-1, -1]), record(2, 21, &[1])], 1)]
    fn system_parents_are_skipped(#[case] particles: Vec<NodeParticle>, #[case] edges: usize) {
        let graph = NodeGraph::from_particles(particles).unwrap();
        assert_eq!(graph.edge_count(), edges);
        // The system particle, when present, is left isolated and dropped.
        assert!(!graph.contains_particle(0));
    }

    #[test]
    fn system_particle_as_parent() {
        // With a particle 0 present, parents `[0, 0]` are real.
        let graph = NodeGraph::from_particles([
            record(0, 90, &[]),
            record(1, 2212, &[0, 0]),
            record(2, 21, &[1]),
        ])
        .unwrap();
        assert_eq!(graph.children(0), vec![1]);
        assert_eq!(graph.edge_count(), 3);
    }

    #[rstest]
    #[case::unknown_parent(
        vec![record(1, 1, &[]), record(2, 1, &[1, 7])],
        BuildError::UnknownParent { particle: 2, parent: 7 }
    )]
    #[case::duplicate(
        vec![record(1, 1, &[]), record(1, 2, &[])],
        BuildError::DuplicateBarcode { barcode: 1 }
    )]
    #[case::self_parent(
        vec![record(1, 1, &[]), record(2, 1, &[2])],
        BuildError::SelfLoop { particle: 2, vertex: 2 }
    )]
    fn build_errors(#[case] particles: Vec<NodeParticle>, #[case] error: BuildError) {
        assert_eq!(NodeGraph::from_particles(particles), Err(error));
    }

    #[rstest]
    fn build_with_config(gluon_chain: Vec<NodeParticle>) {
        let config = GraphConfig::default().with_species_filter(SpeciesFilter::new(22, true));
        let graph = NodeGraph::build(gluon_chain.clone(), &config).unwrap();
        assert_eq!(graph.particle_count(), 6);
        assert!(!graph.contains_particle(8));
        assert!(!graph.contains_particle(4));

        let raw = NodeGraph::build(gluon_chain, &GraphConfig::default().with_remove_redundants(false))
            .unwrap();
        assert_eq!(raw.particle_count(), 8);
    }

    #[test]
    fn isolated_particles_are_dropped() {
        let graph = NodeGraph::from_particles([
            record(1, 1, &[]),
            record(2, 1, &[1]),
            record(3, 22, &[]),
        ])
        .unwrap();
        assert!(!graph.contains_particle(3));
        assert_eq!(graph.particles().map(|p| p.barcode).collect_vec(), [1, 2]);
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn node_graph_serialize(gluon_chain: Vec<NodeParticle>) {
        let graph = NodeGraph::from_particles(gluon_chain).unwrap();
        assert_eq!(crate::multigraph::test::ser_roundtrip(&graph), graph);
    }
}
