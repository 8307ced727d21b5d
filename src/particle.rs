//! Particle records produced by the event-format parsers.
//!
//! A [`Particle`] carries its identity, species and kinematics, plus the two
//! state flags inferred once its graph has been assembled. Parsers wrap each
//! particle with its linkage information: [`NodeParticle`] lists the parent
//! barcodes, while [`EdgeParticle`] names the vertices the particle is
//! produced at and absorbed into.

use std::fmt;

use crate::Barcode;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single particle in an event.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Particle {
    /// Unique identifier within the event.
    pub barcode: Barcode,
    /// PDG species code. The sign distinguishes particle and antiparticle.
    pub pdgid: i32,
    /// Momentum along x.
    pub px: f64,
    /// Momentum along y.
    pub py: f64,
    /// Momentum along z.
    pub pz: f64,
    /// Energy.
    pub energy: f64,
    /// Generated mass.
    pub mass: f64,
    /// Generator status code.
    pub status: i32,
    /// Nothing in the event produces this particle.
    pub initial_state: bool,
    /// Nothing in the event consumes this particle.
    pub final_state: bool,
}

impl Particle {
    /// Creates a particle at rest with the given barcode and species.
    pub fn new(barcode: Barcode, pdgid: i32) -> Self {
        Self {
            barcode,
            pdgid,
            ..Default::default()
        }
    }

    /// Sets the four-momentum.
    pub fn with_momentum(mut self, px: f64, py: f64, pz: f64, energy: f64) -> Self {
        self.px = px;
        self.py = py;
        self.pz = pz;
        self.energy = energy;
        self
    }

    /// Sets the generated mass.
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    /// Sets the generator status code.
    pub fn with_status(mut self, status: i32) -> Self {
        self.status = status;
        self
    }

    /// Returns `true` for the given species, regardless of charge conjugation.
    #[inline]
    pub fn is_species(&self, pdgid: i32) -> bool {
        self.pdgid.abs() == pdgid.abs()
    }

    /// Human readable name of the particle species.
    ///
    /// Falls back to the numeric code for species without a short name.
    pub fn name(&self) -> String {
        pdgid_name(self.pdgid)
    }
}

impl fmt::Display for Particle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.barcode, self.name())?;
        match (self.initial_state, self.final_state) {
            (true, true) => write!(f, " (initial, final)"),
            (true, false) => write!(f, " (initial)"),
            (false, true) => write!(f, " (final)"),
            (false, false) => Ok(()),
        }
    }
}

/// Short name of a PDG species code.
pub fn pdgid_name(pdgid: i32) -> String {
    const QUARKS: [&str; 6] = ["d", "u", "s", "c", "b", "t"];
    const LEPTONS: [&str; 3] = ["e", "mu", "tau"];

    let anti = pdgid < 0;
    match pdgid.abs() {
        id @ 1..=6 => {
            let quark = QUARKS[(id - 1) as usize];
            if anti {
                format!("{quark}bar")
            } else {
                quark.to_string()
            }
        }
        id @ (11 | 13 | 15) => {
            let lepton = LEPTONS[((id - 11) / 2) as usize];
            format!("{lepton}{}", if anti { "+" } else { "-" })
        }
        id @ (12 | 14 | 16) => {
            let flavour = LEPTONS[((id - 12) / 2) as usize];
            format!("nu_{flavour}{}", if anti { "bar" } else { "" })
        }
        21 => "g".to_string(),
        22 => "gamma".to_string(),
        23 => "Z0".to_string(),
        24 => (if anti { "W-" } else { "W+" }).to_string(),
        25 => "h0".to_string(),
        111 => "pi0".to_string(),
        211 => (if anti { "pi-" } else { "pi+" }).to_string(),
        2112 => (if anti { "nbar0" } else { "n0" }).to_string(),
        2212 => (if anti { "pbar-" } else { "p+" }).to_string(),
        _ => pdgid.to_string(),
    }
}

/// A particle together with the barcodes of its parents, for graphs where
/// particles are vertices.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct NodeParticle {
    /// The particle itself.
    pub particle: Particle,
    /// Barcodes of the parent particles, in record order. May be empty.
    pub parent_barcodes: Vec<Barcode>,
}

impl NodeParticle {
    /// Pairs a particle with its parent barcodes.
    pub fn new(particle: Particle, parents: impl IntoIterator<Item = Barcode>) -> Self {
        Self {
            particle,
            parent_barcodes: parents.into_iter().collect(),
        }
    }

    /// Barcode of the wrapped particle.
    #[inline]
    pub fn barcode(&self) -> Barcode {
        self.particle.barcode
    }
}

/// A particle together with the vertices it connects, for graphs where
/// particles are edges.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct EdgeParticle {
    /// The particle itself.
    pub particle: Particle,
    /// Vertex the particle is produced at.
    pub vtx_out_barcode: Barcode,
    /// Vertex the particle decays or is absorbed at.
    pub vtx_in_barcode: Barcode,
}

impl EdgeParticle {
    /// Pairs a particle with its production and decay vertices, as given.
    pub fn new(particle: Particle, vtx_out_barcode: Barcode, vtx_in_barcode: Barcode) -> Self {
        Self {
            particle,
            vtx_out_barcode,
            vtx_in_barcode,
        }
    }

    /// Pairs a particle with the vertices recorded for it, synthesizing the
    /// vertices the record leaves implicit.
    ///
    /// - A decay vertex of `0` means the particle is never absorbed. A new
    ///   decay vertex `|vtx_out| + barcode` is created and the particle is
    ///   marked final-state.
    /// - Identical production and decay vertices (usually an incoming beam)
    ///   would form a loop. A new production vertex `|vtx_out| + barcode` is
    ///   created and the particle is marked initial-state.
    ///
    /// Recorded vertex barcodes are negative by convention, so the new
    /// barcodes do not clash with them. Clashes between synthesized barcodes
    /// are not checked.
    ///
    /// # Example
    ///
    /// ```
    /// # use particlegraph::{EdgeParticle, Particle};
    /// let photon = EdgeParticle::from_vertices(Particle::new(7, 22), -3, 0);
    /// assert_eq!(photon.vtx_in_barcode, 10);
    /// assert!(photon.particle.final_state);
    ///
    /// let beam = EdgeParticle::from_vertices(Particle::new(1, 2212), -1, -1);
    /// assert_eq!(beam.vtx_out_barcode, 2);
    /// assert!(beam.particle.initial_state);
    /// ```
    pub fn from_vertices(
        mut particle: Particle,
        mut vtx_out_barcode: Barcode,
        mut vtx_in_barcode: Barcode,
    ) -> Self {
        if vtx_in_barcode == 0 {
            vtx_in_barcode = vtx_out_barcode.abs() + particle.barcode;
            particle.final_state = true;
        }
        if vtx_in_barcode == vtx_out_barcode {
            vtx_out_barcode = vtx_out_barcode.abs() + particle.barcode;
            particle.initial_state = true;
        }
        Self::new(particle, vtx_out_barcode, vtx_in_barcode)
    }

    /// Barcode of the wrapped particle.
    #[inline]
    pub fn barcode(&self) -> Barcode {
        self.particle.barcode
    }
}
