//! Benchmarks for events where particles are vertices.

use criterion::{criterion_group, Criterion};
use particlegraph::{NodeGraph, NodeParticle};

use crate::helpers::*;

// -----------------------------------------------------------------------------
// Benchmark functions
// -----------------------------------------------------------------------------

struct BuildNodeGraph {
    particles: Vec<NodeParticle>,
}
impl SizedBenchmark for BuildNodeGraph {
    fn name() -> &'static str {
        "build_node_graph"
    }

    fn setup(size: usize) -> Self {
        Self {
            particles: make_node_event(size),
        }
    }

    fn run(&self) -> impl Sized {
        NodeGraph::from_particles(self.particles.iter().cloned()).unwrap()
    }
}

struct RemoveNodeRedundants {
    graph: NodeGraph,
}
impl SizedBenchmarkWithInput for RemoveNodeRedundants {
    type State = NodeGraph;

    fn name() -> &'static str {
        "remove_node_redundants"
    }

    fn setup(size: usize) -> Self {
        Self {
            graph: NodeGraph::from_particles(make_node_event(size)).unwrap(),
        }
    }

    fn prepare_run(&self) -> NodeGraph {
        self.graph.clone()
    }

    fn run(&self, mut graph: NodeGraph) -> impl Sized {
        graph.remove_redundants()
    }
}

struct RemoveNodePhotons {
    graph: NodeGraph,
}
impl SizedBenchmarkWithInput for RemoveNodePhotons {
    type State = NodeGraph;

    fn name() -> &'static str {
        "remove_node_photons"
    }

    fn setup(size: usize) -> Self {
        Self {
            graph: NodeGraph::from_particles(make_node_event(size)).unwrap(),
        }
    }

    fn prepare_run(&self) -> NodeGraph {
        self.graph.clone()
    }

    fn run(&self, mut graph: NodeGraph) -> impl Sized {
        graph.remove_species(22, true)
    }
}

// -----------------------------------------------------------------------------
// iai_callgrind definitions
// -----------------------------------------------------------------------------

sized_iai_benchmark!(callgrind_build_node_graph, BuildNodeGraph);
sized_iai_benchmark_with_input!(callgrind_remove_node_redundants, RemoveNodeRedundants);
sized_iai_benchmark_with_input!(callgrind_remove_node_photons, RemoveNodePhotons);

iai_callgrind::library_benchmark_group!(
    name = callgrind_group;
    benchmarks =
        callgrind_build_node_graph,
        callgrind_remove_node_redundants,
        callgrind_remove_node_photons,
);

// -----------------------------------------------------------------------------
// Criterion definitions
// -----------------------------------------------------------------------------

criterion_group! {
    name = criterion_group;
    config = Criterion::default();
    targets =
        BuildNodeGraph::criterion,
        RemoveNodeRedundants::criterion,
        RemoveNodePhotons::criterion,
}
