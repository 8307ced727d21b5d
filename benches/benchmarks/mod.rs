pub mod edge_graph;
pub mod node_graph;
pub mod render;
