//! Benchmarks for events where particles are edges.

use criterion::{criterion_group, Criterion};
use particlegraph::{EdgeGraph, EdgeParticle};

use crate::helpers::*;

// -----------------------------------------------------------------------------
// Benchmark functions
// -----------------------------------------------------------------------------

struct BuildEdgeGraph {
    particles: Vec<EdgeParticle>,
}
impl SizedBenchmark for BuildEdgeGraph {
    fn name() -> &'static str {
        "build_edge_graph"
    }

    fn setup(size: usize) -> Self {
        Self {
            particles: make_edge_event(size),
        }
    }

    fn run(&self) -> impl Sized {
        EdgeGraph::from_particles(self.particles.iter().cloned()).unwrap()
    }
}

struct RemoveEdgeRedundants {
    graph: EdgeGraph,
}
impl SizedBenchmarkWithInput for RemoveEdgeRedundants {
    type State = EdgeGraph;

    fn name() -> &'static str {
        "remove_edge_redundants"
    }

    // Every removal rescans the graph from the start.
    fn sizes() -> &'static [usize] {
        &[100, 1_000]
    }

    fn setup(size: usize) -> Self {
        Self {
            graph: EdgeGraph::from_particles(make_edge_event(size)).unwrap(),
        }
    }

    fn prepare_run(&self) -> EdgeGraph {
        self.graph.clone()
    }

    fn run(&self, mut graph: EdgeGraph) -> impl Sized {
        graph.remove_redundants()
    }
}

// -----------------------------------------------------------------------------
// iai_callgrind definitions
// -----------------------------------------------------------------------------

sized_iai_benchmark!(callgrind_build_edge_graph, BuildEdgeGraph);
sized_iai_benchmark_with_input!(callgrind_remove_edge_redundants, RemoveEdgeRedundants);

iai_callgrind::library_benchmark_group!(
    name = callgrind_group;
    benchmarks = callgrind_build_edge_graph, callgrind_remove_edge_redundants
);

// -----------------------------------------------------------------------------
// Criterion definitions
// -----------------------------------------------------------------------------

criterion_group! {
    name = criterion_group;
    config = Criterion::default();
    targets =
        BuildEdgeGraph::criterion,
        RemoveEdgeRedundants::criterion,
}
