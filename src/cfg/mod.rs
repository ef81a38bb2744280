//! This module contains the basic block partitioner and the builder for the
//! [`ControlFlowGraph`] over those blocks.

pub mod block;
pub mod graph;

pub use block::{block_containing, partition, BasicBlock};
pub use graph::{DirectedGraph, EdgeKind, PetGraph};

use std::collections::BTreeMap;

use crate::{
    disassembly::ContractInfo,
    error::{
        cfg::{Error, Result},
        container::Locatable,
    },
};

/// The control-flow graph of a contract, with one vertex per [`BasicBlock`].
///
/// # Edges
///
/// - A fall-through edge leaves every block whose last instruction lets
///   execution continue by address, and enters the non-empty block with the
///   smallest start that is not before the end of the block.
/// - `JUMPI` ends a block like any other terminator, but its block still gets
///   a fall-through edge for the case where the condition is zero. The graph
///   is therefore a superset of one that treats every terminator alike, and
///   the topological interpreter joins the not-taken path into the next
///   block.
/// - A jump edge leaves every block ending in a `JUMP` or `JUMPI` for each of
///   that jump's targets recorded in the [`ContractInfo`], and enters the
///   block containing the target.
///
/// Empty blocks are vertices without any edges.
///
/// The graph is a snapshot of the jumps at construction time, and is not
/// updated when the jumps are later narrowed.
#[derive(Clone, Debug)]
pub struct ControlFlowGraph<G = PetGraph>
where
    G: DirectedGraph,
{
    graph: G,

    /// The non-empty blocks keyed by their start, mapped to their end and
    /// index.
    starts: BTreeMap<u32, (u32, usize)>,
}

impl<G> ControlFlowGraph<G>
where
    G: DirectedGraph,
{
    /// Builds the control-flow graph over `blocks`, which must be the
    /// partition of `info`.
    ///
    /// # Errors
    ///
    /// If a recorded jump target does not lie within any block, located at the
    /// program counter of the jump.
    pub fn build(info: &ContractInfo, blocks: &[BasicBlock]) -> Result<Self> {
        let mut graph = G::default();
        for _ in blocks {
            graph.add_vertex();
        }

        let starts: BTreeMap<u32, (u32, usize)> = blocks
            .iter()
            .filter_map(|block| block.start().map(|start| (start, (block.end, block.index))))
            .collect();

        for block in blocks {
            if block.falls_through() {
                if let Some((_, (_, next))) = starts.range(block.end..).next() {
                    graph.add_edge(block.index, *next, EdgeKind::FallThrough);
                }
            }

            if let Some(site) = block.last_pc().filter(|_| block.ends_in_jump()) {
                let targets = info.jump_targets(site).into_iter().flatten();
                for target in targets {
                    let destination = lookup(&starts, *target)
                        .ok_or_else(|| Error::MissingJumpTarget { target: *target }.locate(site))?;
                    graph.add_edge(block.index, destination, EdgeKind::Jump);
                }
            }
        }

        tracing::debug!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "Built control-flow graph"
        );

        Ok(Self { graph, starts })
    }

    /// Gets the number of blocks in the graph.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.graph.vertex_count()
    }

    /// Gets the block whose address range contains `pc`.
    #[must_use]
    pub fn block_at(&self, pc: u32) -> Option<usize> {
        lookup(&self.starts, pc)
    }

    /// Gets the number of edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Gets the blocks that `block` can transfer control to, along with how.
    #[must_use]
    pub fn successors(&self, block: usize) -> Vec<(usize, EdgeKind)> {
        self.graph.successors(block)
    }

    /// Gets the blocks that can transfer control to `block`, along with how.
    #[must_use]
    pub fn predecessors(&self, block: usize) -> Vec<(usize, EdgeKind)> {
        self.graph.predecessors(block)
    }

    /// Checks if some block can reach itself.
    #[must_use]
    pub fn has_cycle(&self) -> bool {
        self.graph.is_cyclic()
    }

    /// Gets the blocks in an order where every edge points forwards, or
    /// [`None`] if the graph has a cycle.
    #[must_use]
    pub fn topological_order(&self) -> Option<Vec<usize>> {
        self.graph.topological_order()
    }
}

/// Finds the index of the non-empty block whose address range contains `pc`.
fn lookup(starts: &BTreeMap<u32, (u32, usize)>, pc: u32) -> Option<usize> {
    starts
        .range(..=pc)
        .next_back()
        .filter(|(_, (end, _))| pc < *end)
        .map(|(_, (_, index))| *index)
}
