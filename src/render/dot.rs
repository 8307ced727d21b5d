//! Functions to encode an event graph in dot format.

use std::fmt::Write;

use itertools::Itertools;

use crate::edge_graph::EdgeGraph;
use crate::node_graph::NodeGraph;
use crate::particle::Particle;
use crate::Barcode;

use super::{Attributes, DotValue, StyleRules};

/// The graph being rendered, in either representation.
#[derive(Clone, Copy, Debug)]
enum EventGraph<'g> {
    Node(&'g NodeGraph),
    Edge(&'g EdgeGraph),
}

/// Configurable dot formatter for an event graph.
pub struct DotFormatter<'g> {
    graph: EventGraph<'g>,
    rules: StyleRules,
    graph_attrs: Attributes,
    vertex_attrs: Attributes,
    label: Option<Box<dyn FnMut(&Particle) -> String + 'g>>,
}

impl<'g> DotFormatter<'g> {
    fn new(graph: EventGraph<'g>) -> Self {
        Self {
            graph,
            rules: StyleRules::default(),
            graph_attrs: Self::default_graph_attributes(),
            vertex_attrs: Attributes::new().with("shape", "point"),
            label: None,
        }
    }

    /// Initialize a new `DotFormatter` for a graph where particles are
    /// vertices.
    pub fn for_nodes(graph: &'g NodeGraph) -> Self {
        Self::new(EventGraph::Node(graph))
    }

    /// Initialize a new `DotFormatter` for a graph where particles are edges.
    pub fn for_edges(graph: &'g EdgeGraph) -> Self {
        Self::new(EventGraph::Edge(graph))
    }

    /// Graph-wide attributes used unless overridden.
    pub fn default_graph_attributes() -> Attributes {
        Attributes::new()
            .with("rankdir", "LR")
            .with("ranksep", 0.6)
            .with("nodesep", 0.6)
            .with("labelloc", "top")
            .with("labeljust", "left")
            .with("label", r#"<<FONT POINT-SIZE="45"><B>Event</B></FONT>>"#)
    }

    /// Set the rules used to style particles.
    pub fn with_rules(mut self, rules: StyleRules) -> Self {
        self.rules = rules;
        self
    }

    /// Set the graph-wide attributes, replacing the defaults.
    pub fn with_graph_attributes(mut self, attrs: Attributes) -> Self {
        self.graph_attrs = attrs;
        self
    }

    /// Set the attributes of the physics vertices, in graphs where particles
    /// are edges.
    pub fn with_vertex_attributes(mut self, attrs: Attributes) -> Self {
        self.vertex_attrs = attrs;
        self
    }

    /// Set the function to use to get the label of a particle.
    pub fn with_label(mut self, label: impl FnMut(&Particle) -> String + 'g) -> Self {
        self.label = Some(Box::new(label));
        self
    }

    /// Encode the graph in dot format.
    pub fn finish(mut self) -> String {
        let mut dot = String::new();

        dot.push_str("digraph g {\n");
        for (key, value) in self.graph_attrs.iter() {
            let _ = writeln!(dot, "\t{key}={};", DotValue(value));
        }
        let initial = match self.graph {
            EventGraph::Node(graph) => self.node_graph_strings(graph, &mut dot),
            EventGraph::Edge(graph) => self.edge_graph_strings(graph, &mut dot),
        };
        if !initial.is_empty() {
            let _ = writeln!(dot, "\t{{rank=same; {} }};", initial.iter().join(" "));
        }
        dot.push_str("}\n");

        dot
    }

    /// Get the attributes of a particle: its label, then the style of the
    /// first matching rule.
    fn particle_attrs(&mut self, particle: &Particle, as_node: bool) -> Attributes {
        let label = match self.label.as_mut() {
            Some(f) => f(particle),
            None => particle.name(),
        };
        let mut attrs = Attributes::new().with("label", label);
        if let Some(style) = self.rules.style_of(particle) {
            attrs.update(if as_node { &style.node } else { &style.edge });
        }
        attrs
    }

    /// Append the particles and their relations, returning the vertices to
    /// draw on the same rank.
    fn node_graph_strings(&mut self, graph: &NodeGraph, dot: &mut String) -> Vec<Barcode> {
        let mut initial = Vec::new();
        for (barcode, particle) in graph.graph().vertices().with_weights() {
            let attrs = self.particle_attrs(particle, true);
            push_statement(dot, &barcode.to_string(), &attrs);
            if particle.initial_state {
                initial.push(barcode);
            }
        }
        for edge in graph.graph().edges() {
            push_statement(
                dot,
                &format!("{} -> {}", edge.source, edge.target),
                &Attributes::new(),
            );
        }
        initial
    }

    /// Append the physics vertices and the particles between them, returning
    /// the vertices to draw on the same rank.
    fn edge_graph_strings(&mut self, graph: &EdgeGraph, dot: &mut String) -> Vec<Barcode> {
        for vertex in graph.graph().vertices() {
            push_statement(dot, &vertex.to_string(), &self.vertex_attrs);
        }
        let mut initial = Vec::new();
        for edge in graph.graph().edges() {
            let attrs = self.particle_attrs(edge.weight, false);
            push_statement(dot, &format!("{} -> {}", edge.source, edge.target), &attrs);
            if edge.weight.initial_state {
                initial.push(edge.source);
            }
        }
        initial.into_iter().unique().collect()
    }
}

/// Append a node or edge statement, with its attributes if any.
fn push_statement(dot: &mut String, statement: &str, attrs: &Attributes) {
    if attrs.is_empty() {
        let _ = writeln!(dot, "\t{statement};");
    } else {
        let _ = writeln!(dot, "\t{statement} {attrs};");
    }
}

/// A trait for encoding a graph in dot format.
pub trait DotFormat {
    /// Initialize a `DotFormatter` for the graph.
    fn dot_format(&self) -> DotFormatter<'_>;

    /// Encode the graph in dot format.
    fn dot_string(&self) -> String {
        self.dot_format().finish()
    }
}

impl DotFormat for NodeGraph {
    fn dot_format(&self) -> DotFormatter<'_> {
        DotFormatter::for_nodes(self)
    }
}

impl DotFormat for EdgeGraph {
    fn dot_format(&self) -> DotFormatter<'_> {
        DotFormatter::for_edges(self)
    }
}
