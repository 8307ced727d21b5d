//! Random event records for property testing.

use crate::particle::{EdgeParticle, NodeParticle, Particle};
use crate::Barcode;
use proptest::prelude::*;
use proptest::sample::Index;
use rand::seq::SliceRandom;

/// Species drawn by the generators. Gluons and photons are over-represented
/// so that redundant chains are common.
const SPECIES: [i32; 12] = [1, -1, 2, 5, 11, 13, 21, 21, 21, 22, 22, 2212];

prop_compose! {
    /// Particle records in the node representation, in barcode order.
    ///
    /// Particle `i` has barcode `i + 1` and up to two parents among the
    /// particles before it, possibly repeated.
    fn gen_ordered_node_particles(max_particles: usize)(
        records in prop::collection::vec(
            (
                prop::sample::select(SPECIES.to_vec()),
                prop::collection::vec(any::<Index>(), 0..=2),
            ),
            1..=max_particles,
        )
    ) -> Vec<NodeParticle> {
        records
            .into_iter()
            .enumerate()
            .map(|(i, (pdgid, parents))| {
                let barcode = i as Barcode + 1;
                let parents = match i {
                    0 => Vec::new(),
                    _ => parents.iter().map(|p| p.index(i) as Barcode + 1).collect(),
                };
                NodeParticle::new(Particle::new(barcode, pdgid), parents)
            })
            .collect()
    }
}

/// A random non-empty event in the node representation.
///
/// With at most `max_particles` particles, in random order. Every parent is
/// a particle of the event and the parent relation has no cycles.
pub fn gen_node_particles(max_particles: usize) -> impl Strategy<Value = Vec<NodeParticle>> {
    gen_ordered_node_particles(max_particles).prop_perturb(|mut particles, mut rng| {
        particles.shuffle(&mut rng);
        particles
    })
}

/// Shape of a generated edge particle.
#[derive(Clone, Copy, Debug)]
enum Linkage {
    /// Produced and absorbed at the same vertex, like an incoming beam.
    Beam,
    /// Never absorbed.
    Dangling,
    /// Between two recorded vertices.
    Internal,
}

prop_compose! {
    /// Particle records in the edge representation, in barcode order.
    ///
    /// Recorded vertices are `-1` to `-n`, and internal particles always run
    /// towards the more negative vertex. The missing vertex of a beam or a
    /// dangling particle is given the particle's own barcode, so no two
    /// particles share one.
    fn gen_ordered_edge_particles(max_particles: usize)(
        records in prop::collection::vec(
            (
                prop::sample::select(SPECIES.to_vec()),
                prop_oneof![
                    1 => Just(Linkage::Beam),
                    2 => Just(Linkage::Dangling),
                    7 => Just(Linkage::Internal),
                ],
                any::<Index>(),
                any::<Index>(),
            ),
            1..=max_particles,
        )
    ) -> Vec<EdgeParticle> {
        let n_vertices = records.len() / 2 + 2;
        records
            .into_iter()
            .enumerate()
            .map(|(i, (pdgid, linkage, a, b))| {
                let barcode = i as Barcode + 1;
                let particle = Particle::new(barcode, pdgid);
                let out_index = a.index(n_vertices - 1);
                let vertex = -(out_index as Barcode + 1);
                match linkage {
                    Linkage::Beam => EdgeParticle::new(
                        Particle { initial_state: true, ..particle },
                        barcode,
                        vertex,
                    ),
                    Linkage::Dangling => EdgeParticle::new(
                        Particle { final_state: true, ..particle },
                        vertex,
                        barcode,
                    ),
                    Linkage::Internal => {
                        let in_index = out_index + 1 + b.index(n_vertices - 1 - out_index);
                        EdgeParticle::new(particle, vertex, -(in_index as Barcode + 1))
                    }
                }
            })
            .collect()
    }
}

/// A random non-empty event in the edge representation.
///
/// With at most `max_particles` particles, in random order. The implicit
/// vertices of beams and dangling particles are already filled in, and the
/// records contain no cycles.
pub fn gen_edge_particles(max_particles: usize) -> impl Strategy<Value = Vec<EdgeParticle>> {
    gen_ordered_edge_particles(max_particles).prop_perturb(|mut particles, mut rng| {
        particles.shuffle(&mut rng);
        particles
    })
}
