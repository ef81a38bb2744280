//! This module contains the narrow directed-graph interface that the
//! control-flow graph is built on, along with its implementation over
//! [`petgraph`].

use petgraph::{
    algo::{is_cyclic_directed, toposort},
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
    Direction,
};

/// The kind of control transfer that an edge represents.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum EdgeKind {
    /// Execution continues into the next block by address.
    FallThrough,

    /// Execution transfers to the target of a `JUMP` or `JUMPI`.
    Jump,
}

/// The operations that the control-flow graph requires of a directed graph.
///
/// Vertices are identified by dense indices starting from zero, in the order
/// that they were added.
pub trait DirectedGraph: Default + std::fmt::Debug {
    /// Adds a new vertex, returning its index.
    fn add_vertex(&mut self) -> usize;

    /// Adds an edge of the given `kind` from `from` to `to`.
    ///
    /// Both vertices must already exist.
    fn add_edge(&mut self, from: usize, to: usize, kind: EdgeKind);

    /// Gets the number of vertices in the graph.
    fn vertex_count(&self) -> usize;

    /// Gets the number of edges in the graph.
    fn edge_count(&self) -> usize;

    /// Gets the targets and kinds of the edges leaving `vertex`.
    fn successors(&self, vertex: usize) -> Vec<(usize, EdgeKind)>;

    /// Gets the sources and kinds of the edges entering `vertex`.
    fn predecessors(&self, vertex: usize) -> Vec<(usize, EdgeKind)>;

    /// Checks if some vertex can reach itself through a non-empty path.
    fn is_cyclic(&self) -> bool;

    /// Gets an ordering of the vertices in which every edge goes forwards, or
    /// [`None`] if the graph has a cycle.
    fn topological_order(&self) -> Option<Vec<usize>>;
}

/// A [`DirectedGraph`] backed by a [`petgraph`] adjacency list.
#[derive(Clone, Debug, Default)]
pub struct PetGraph {
    graph: DiGraph<(), EdgeKind>,
}

impl PetGraph {
    /// Gets the edges touching `vertex` in the given `direction`, paired with
    /// the vertex at their other end.
    fn neighbours(&self, vertex: usize, direction: Direction) -> Vec<(usize, EdgeKind)> {
        if vertex >= self.graph.node_count() {
            return Vec::new();
        }

        let mut result: Vec<(usize, EdgeKind)> = self
            .graph
            .edges_directed(NodeIndex::new(vertex), direction)
            .map(|edge| {
                let other = match direction {
                    Direction::Outgoing => edge.target(),
                    Direction::Incoming => edge.source(),
                };
                (other.index(), *edge.weight())
            })
            .collect();
        result.sort_unstable();
        result
    }
}

impl DirectedGraph for PetGraph {
    fn add_vertex(&mut self) -> usize {
        self.graph.add_node(()).index()
    }

    fn add_edge(&mut self, from: usize, to: usize, kind: EdgeKind) {
        self.graph
            .add_edge(NodeIndex::new(from), NodeIndex::new(to), kind);
    }

    fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn successors(&self, vertex: usize) -> Vec<(usize, EdgeKind)> {
        self.neighbours(vertex, Direction::Outgoing)
    }

    fn predecessors(&self, vertex: usize) -> Vec<(usize, EdgeKind)> {
        self.neighbours(vertex, Direction::Incoming)
    }

    fn is_cyclic(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    fn topological_order(&self) -> Option<Vec<usize>> {
        toposort(&self.graph, None)
            .ok()
            .map(|order| order.into_iter().map(NodeIndex::index).collect())
    }
}

#[cfg(test)]
mod test {
    use crate::cfg::graph::{DirectedGraph, EdgeKind, PetGraph};

    fn diamond() -> PetGraph {
        let mut graph = PetGraph::default();
        for _ in 0..4 {
            graph.add_vertex();
        }
        graph.add_edge(0, 1, EdgeKind::FallThrough);
        graph.add_edge(0, 2, EdgeKind::Jump);
        graph.add_edge(1, 3, EdgeKind::Jump);
        graph.add_edge(2, 3, EdgeKind::FallThrough);
        graph
    }

    #[test]
    fn vertices_are_numbered_densely() {
        let mut graph = PetGraph::default();
        assert_eq!(graph.add_vertex(), 0);
        assert_eq!(graph.add_vertex(), 1);
        assert_eq!(graph.vertex_count(), 2);
    }

    #[test]
    fn can_query_neighbours() {
        let graph = diamond();

        assert_eq!(graph.edge_count(), 4);
        assert_eq!(
            graph.successors(0),
            vec![(1, EdgeKind::FallThrough), (2, EdgeKind::Jump)]
        );
        assert_eq!(
            graph.predecessors(3),
            vec![(1, EdgeKind::Jump), (2, EdgeKind::FallThrough)]
        );
        assert!(graph.successors(10).is_empty());
    }

    #[test]
    fn orders_acyclic_graphs() {
        let graph = diamond();
        assert!(!graph.is_cyclic());

        let order = graph.topological_order().expect("Acyclic graph had no order");
        let position = |v: usize| order.iter().position(|x| *x == v);
        assert!(position(0) < position(1));
        assert!(position(0) < position(2));
        assert!(position(1) < position(3));
        assert!(position(2) < position(3));
    }

    #[test]
    fn detects_cycles() {
        let mut graph = diamond();
        graph.add_edge(3, 0, EdgeKind::Jump);

        assert!(graph.is_cyclic());
        assert!(graph.topological_order().is_none());
    }

    #[test]
    fn self_loops_are_cycles() {
        let mut graph = PetGraph::default();
        graph.add_vertex();
        graph.add_edge(0, 0, EdgeKind::Jump);

        assert!(graph.is_cyclic());
    }
}
