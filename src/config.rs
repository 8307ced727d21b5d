//! Options controlling how event graphs are assembled and simplified.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How particles are laid out in an event graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum Representation {
    /// Particles are vertices, see [`NodeGraph`](crate::NodeGraph).
    #[default]
    Node,
    /// Particles are edges, see [`EdgeGraph`](crate::EdgeGraph).
    Edge,
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Representation::Node => f.write_str("node"),
            Representation::Edge => f.write_str("edge"),
        }
    }
}

impl FromStr for Representation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "node" | "nodes" => Ok(Representation::Node),
            "edge" | "edges" => Ok(Representation::Edge),
            _ => Err(ConfigError::UnknownRepresentation(s.to_string())),
        }
    }
}

/// Event record formats, and the representation each one maps onto.
///
/// Formats listing parents for each particle map onto a [`NodeGraph`],
/// formats listing production and decay vertices onto an [`EdgeGraph`].
///
/// [`NodeGraph`]: crate::NodeGraph
/// [`EdgeGraph`]: crate::EdgeGraph
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum InputFormat {
    /// Pythia 8 event listing.
    Pythia8,
    /// HepMC GenEvent record.
    HepMc,
    /// Les Houches event file.
    Lhe,
    /// CMSSW `ParticleListDrawer` dump.
    Cmssw,
}

impl InputFormat {
    /// Every supported format.
    pub const ALL: [InputFormat; 4] = [
        InputFormat::Pythia8,
        InputFormat::HepMc,
        InputFormat::Lhe,
        InputFormat::Cmssw,
    ];

    /// Representation the format's linkage information maps onto.
    pub fn default_representation(self) -> Representation {
        match self {
            InputFormat::HepMc => Representation::Edge,
            InputFormat::Pythia8 | InputFormat::Lhe | InputFormat::Cmssw => Representation::Node,
        }
    }

    /// File extension conventionally used by the format.
    pub fn extension(self) -> &'static str {
        match self {
            InputFormat::Pythia8 => "txt",
            InputFormat::HepMc => "hepmc",
            InputFormat::Lhe => "lhe",
            InputFormat::Cmssw => "log",
        }
    }

    /// Guesses the format from a file extension, ignoring case and a
    /// leading dot.
    pub fn from_extension(extension: &str) -> Option<Self> {
        let extension = extension.trim_start_matches('.');
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(extension))
    }

    /// Short description of the format.
    pub fn description(self) -> &'static str {
        match self {
            InputFormat::Pythia8 => "Pythia 8 event listing, as printed by Event::list()",
            InputFormat::HepMc => "HepMC GenEvent record, as written by IO_GenEvent",
            InputFormat::Lhe => "Les Houches Event file, hard process only",
            InputFormat::Cmssw => "CMSSW ParticleListDrawer output",
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputFormat::Pythia8 => "pythia8",
            InputFormat::HepMc => "hepmc",
            InputFormat::Lhe => "lhe",
            InputFormat::Cmssw => "cmssw",
        };
        f.write_str(name)
    }
}

impl FromStr for InputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownFormat(s.to_string()))
    }
}

/// A species of particles to remove from an event graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct SpeciesFilter {
    /// Species code. Antiparticles are removed as well.
    pub pdgid: i32,
    /// Only remove particles that are not consumed by anything.
    pub final_state_only: bool,
}

impl SpeciesFilter {
    /// Creates a new species filter.
    pub fn new(pdgid: i32, final_state_only: bool) -> Self {
        Self {
            pdgid,
            final_state_only,
        }
    }
}

/// Simplifications applied to an event graph after assembly.
///
/// # Example
///
/// ```
/// # use particlegraph::{GraphConfig, SpeciesFilter};
/// let config = GraphConfig::default()
///     .with_species_filter(SpeciesFilter::new(22, true))
///     .with_remove_redundants(false);
/// assert_eq!(config.remove_species.len(), 1);
/// assert!(!config.remove_redundants);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GraphConfig {
    /// Splice out particles that only repeat their parent.
    pub remove_redundants: bool,
    /// Species to remove, in order, before redundant particles.
    pub remove_species: Vec<SpeciesFilter>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            remove_redundants: true,
            remove_species: Vec::new(),
        }
    }
}

impl GraphConfig {
    /// Sets whether redundant particles are removed.
    pub fn with_remove_redundants(mut self, remove_redundants: bool) -> Self {
        self.remove_redundants = remove_redundants;
        self
    }

    /// Adds a species to remove.
    pub fn with_species_filter(mut self, filter: SpeciesFilter) -> Self {
        self.remove_species.push(filter);
        self
    }
}

/// Error parsing a configuration value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// The representation name is not known.
    #[error("unknown representation '{0}', expected 'node' or 'edge'")]
    UnknownRepresentation(String),
    /// The format name is not known.
    #[error("unknown input format '{0}'")]
    UnknownFormat(String),
}
