//! Benchmark event generators.

use particlegraph::{Barcode, EdgeParticle, NodeParticle, Particle};

/// Whether the particle with the given barcode is a photon radiated off the
/// gluon chain.
fn is_radiated(barcode: Barcode) -> bool {
    barcode % 4 == 0
}

/// Create an event with a quark starting a gluon chain. Every fourth particle
/// is a photon radiated off the tip of the chain.
///
/// q -> g -> g -> g -> g -> g   ...
///                |              |
///                γ              γ
///
pub fn make_node_event(size: usize) -> Vec<NodeParticle> {
    let mut particles = Vec::with_capacity(size);
    particles.push(NodeParticle::new(Particle::new(1, 1), []));

    let mut tip = 1;
    for barcode in 2..=size as Barcode {
        if is_radiated(barcode) {
            particles.push(NodeParticle::new(Particle::new(barcode, 22), [tip]));
        } else {
            particles.push(NodeParticle::new(Particle::new(barcode, 21), [tip]));
            tip = barcode;
        }
    }

    particles
}

/// Create the same event as [`make_node_event`], with particles on the edges
/// between recorded vertices `-1, -2, ...`.
pub fn make_edge_event(size: usize) -> Vec<EdgeParticle> {
    let mut particles = Vec::with_capacity(size);
    particles.push(EdgeParticle::from_vertices(Particle::new(1, 1), -1, -1));

    let mut tip: Barcode = -1;
    for barcode in 2..=size as Barcode {
        if is_radiated(barcode) {
            particles.push(EdgeParticle::from_vertices(
                Particle::new(barcode, 22),
                tip,
                0,
            ));
        } else {
            particles.push(EdgeParticle::from_vertices(
                Particle::new(barcode, 21),
                tip,
                tip - 1,
            ));
            tip -= 1;
        }
    }

    particles
}
