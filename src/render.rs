//! This module contains rendering logic from event graphs into graphviz
//! diagrams.
//!
//! Particles are styled by an ordered list of [`StyleRule`]s. The first rule
//! whose predicate accepts a particle provides its dot attributes, whether
//! the particle is drawn as a node or as an edge.

pub mod dot;

use std::fmt;

pub use dot::{DotFormat, DotFormatter};

use crate::particle::Particle;

/// An ordered list of graphviz attributes.
///
/// Setting an attribute that is already present replaces its value in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    /// Creates an empty attribute list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an attribute, returning the updated list.
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    /// Sets an attribute.
    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.0.push((key, value)),
        }
    }

    /// Sets every attribute of `other`, overriding existing values.
    pub fn update(&mut self, other: &Attributes) {
        for (key, value) in other.iter() {
            self.set(key, value);
        }
    }

    /// Returns the value of an attribute.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates over the attributes, in the order they were first set.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut attrs = Self::new();
        for (key, value) in iter {
            attrs.set(key, value);
        }
        attrs
    }
}

/// Formats the list as a dot attribute statement, `[key="value", ...]`.
///
/// Values wrapped in angle brackets are HTML-like labels and are written
/// unquoted.
impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}={}", DotValue(value))?;
        }
        f.write_str("]")
    }
}

/// A dot attribute value, quoted unless it is an HTML-like string.
///
/// Quotes and backslashes are escaped, and line breaks become `\n`.
pub(crate) struct DotValue<'a>(pub &'a str);

impl fmt::Display for DotValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0;
        if value.starts_with('<') && value.ends_with('>') {
            return f.write_str(value);
        }
        f.write_str("\"")?;
        for c in value.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\r' => {}
                c => write!(f, "{c}")?,
            }
        }
        f.write_str("\"")
    }
}

/// Attributes of a particle, when drawn as a node and when drawn as an edge.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParticleStyle {
    /// Attributes used in graphs where particles are vertices.
    pub node: Attributes,
    /// Attributes used in graphs where particles are edges.
    pub edge: Attributes,
}

impl ParticleStyle {
    /// Creates a style from its node and edge attributes.
    pub fn new(node: Attributes, edge: Attributes) -> Self {
        Self { node, edge }
    }

    /// A filled node and an edge, both drawn in the same colour.
    pub fn coloured(color: &str) -> Self {
        Self {
            node: Attributes::new().with("style", "filled").with("color", color),
            edge: Attributes::new()
                .with("color", color)
                .with("fontcolor", color),
        }
    }

    /// Adds an attribute to the node style.
    pub fn with_node(mut self, key: &str, value: impl ToString) -> Self {
        self.node.set(key, value);
        self
    }

    /// Adds an attribute to the edge style.
    pub fn with_edge(mut self, key: &str, value: impl ToString) -> Self {
        self.edge.set(key, value);
        self
    }
}

/// A predicate selecting particles, and the style applied to them.
pub struct StyleRule {
    predicate: Box<dyn Fn(&Particle) -> bool>,
    style: ParticleStyle,
}

impl StyleRule {
    /// Creates a new rule.
    pub fn new(predicate: impl Fn(&Particle) -> bool + 'static, style: ParticleStyle) -> Self {
        Self {
            predicate: Box::new(predicate),
            style,
        }
    }

    /// Returns whether the rule applies to a particle.
    #[inline]
    pub fn matches(&self, particle: &Particle) -> bool {
        (self.predicate)(particle)
    }

    /// The style applied by the rule.
    #[inline]
    pub fn style(&self) -> &ParticleStyle {
        &self.style
    }
}

impl fmt::Debug for StyleRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleRule")
            .field("style", &self.style)
            .finish_non_exhaustive()
    }
}

/// An ordered list of style rules. The first matching rule wins.
///
/// The default rules highlight b quarks, heavy leptons, gluons and photons,
/// then initial-state and final-state particles.
///
/// # Example
///
/// ```
/// # use particlegraph::Particle;
/// # use particlegraph::render::{ParticleStyle, StyleRules};
/// let rules = StyleRules::default().with_first(|p| p.pdgid == 6, ParticleStyle::coloured("gold"));
///
/// let top = Particle::new(1, 6);
/// assert_eq!(rules.style_of(&top).unwrap().node.get("color"), Some("gold"));
/// let gluon = Particle::new(2, 21);
/// assert_eq!(rules.style_of(&gluon).unwrap().node.get("color"), Some("grey"));
/// ```
#[derive(Debug)]
pub struct StyleRules(Vec<StyleRule>);

impl StyleRules {
    /// Creates an empty list, leaving every particle unstyled.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds a rule after the existing ones.
    pub fn push(&mut self, rule: StyleRule) {
        self.0.push(rule);
    }

    /// Adds a rule after the existing ones, returning the updated list.
    pub fn with_rule(
        mut self,
        predicate: impl Fn(&Particle) -> bool + 'static,
        style: ParticleStyle,
    ) -> Self {
        self.push(StyleRule::new(predicate, style));
        self
    }

    /// Adds a rule taking precedence over the existing ones.
    pub fn with_first(
        mut self,
        predicate: impl Fn(&Particle) -> bool + 'static,
        style: ParticleStyle,
    ) -> Self {
        self.0.insert(0, StyleRule::new(predicate, style));
        self
    }

    /// Returns the style of the first rule matching a particle.
    pub fn style_of(&self, particle: &Particle) -> Option<&ParticleStyle> {
        self.0
            .iter()
            .find(|rule| rule.matches(particle))
            .map(StyleRule::style)
    }

    /// Iterates over the rules, in order.
    pub fn iter(&self) -> impl Iterator<Item = &StyleRule> + '_ {
        self.0.iter()
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether there are no rules.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for StyleRules {
    fn default() -> Self {
        Self::new()
            .with_rule(|p| p.is_species(5), ParticleStyle::coloured("red"))
            .with_rule(
                |p| p.is_species(13) || p.is_species(15),
                ParticleStyle::coloured("purple").with_edge("penwidth", 4),
            )
            .with_rule(|p| p.is_species(21), ParticleStyle::coloured("grey"))
            .with_rule(|p| p.is_species(22), ParticleStyle::coloured("cadetblue1"))
            .with_rule(
                |p| p.initial_state,
                ParticleStyle::coloured("green3")
                    .with_node("shape", "circle")
                    .with_edge("penwidth", 5),
            )
            .with_rule(
                |p| p.final_state,
                ParticleStyle::coloured("dodgerblue1").with_node("shape", "box"),
            )
            .with_rule(
                |_| true,
                ParticleStyle::new(Attributes::new(), Attributes::new().with("penwidth", 2)),
            )
    }
}
