//! Benchmarks for the graph renderers.

use criterion::{criterion_group, Criterion};
use particlegraph::render::DotFormat;
use particlegraph::{EdgeGraph, NodeGraph};

use crate::helpers::*;

// -----------------------------------------------------------------------------
// Benchmark functions
// -----------------------------------------------------------------------------

struct RenderNodeDot {
    graph: NodeGraph,
}
impl SizedBenchmark for RenderNodeDot {
    fn name() -> &'static str {
        "render_node_dot"
    }

    fn setup(size: usize) -> Self {
        Self {
            graph: NodeGraph::from_particles(make_node_event(size)).unwrap(),
        }
    }

    fn run(&self) -> impl Sized {
        self.graph.dot_string()
    }
}

struct RenderEdgeDot {
    graph: EdgeGraph,
}
impl SizedBenchmark for RenderEdgeDot {
    fn name() -> &'static str {
        "render_edge_dot"
    }

    fn setup(size: usize) -> Self {
        Self {
            graph: EdgeGraph::from_particles(make_edge_event(size)).unwrap(),
        }
    }

    fn run(&self) -> impl Sized {
        self.graph.dot_string()
    }
}

// -----------------------------------------------------------------------------
// iai_callgrind definitions
// -----------------------------------------------------------------------------

sized_iai_benchmark!(callgrind_render_node_dot, RenderNodeDot);
sized_iai_benchmark!(callgrind_render_edge_dot, RenderEdgeDot);

iai_callgrind::library_benchmark_group!(
    name = callgrind_group;
    benchmarks = callgrind_render_node_dot, callgrind_render_edge_dot
);

// -----------------------------------------------------------------------------
// Criterion definitions
// -----------------------------------------------------------------------------

criterion_group! {
    name = criterion_group;
    config = Criterion::default();
    targets =
        RenderNodeDot::criterion,
        RenderEdgeDot::criterion,
}
