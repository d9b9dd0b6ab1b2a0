use log::debug;
use std::cmp::Ordering;

use crate::load_balancer::node::{Node, NodeId};

/// Trait defining the interface for load balancing strategies
///
/// Implementations of this trait determine which node will handle a
/// particular request based on node state.
pub trait LoadBalancingStrategy {
    /// Select a node from the eligible candidates
    ///
    /// # Parameters
    /// * `candidates` - Array of (registry index, node) tuples, in registry order
    ///
    /// # Returns
    /// * Index into the candidates array of the selected node, or `None` if empty
    fn select_node(&mut self, candidates: &[(usize, &Node)]) -> Option<usize>;
}

/// Weighted least-connections with round-robin tie-breaking.
///
/// The candidate with the lowest `in_flight / weight` wins. Among equally
/// loaded candidates the first one whose id follows the previous winner's
/// wins, wrapping to the start of the registry.
///
/// The cursor is a `NodeId` rather than a registry index: ids are never reused
/// and registry order is id order, so removing a node does not shift it.
#[derive(Debug, Default)]
pub struct LeastConnectionsStrategy {
    last_selected: Option<NodeId>,
}

impl LeastConnectionsStrategy {
    /// Creates a new LeastConnectionsStrategy with the cursor at the first node
    pub fn new() -> Self {
        Self { last_selected: None }
    }

    /// Node picked by the previous selection; the next tie-break starts after it
    pub fn last_selected(&self) -> Option<NodeId> {
        self.last_selected
    }
}

/// Compare `a.in_flight / a.weight` against `b.in_flight / b.weight` without division
pub fn compare_load(a: &Node, b: &Node) -> Ordering {
    let lhs = a.in_flight() as u128 * b.weight() as u128;
    let rhs = b.in_flight() as u128 * a.weight() as u128;
    lhs.cmp(&rhs)
}

impl LoadBalancingStrategy for LeastConnectionsStrategy {
    fn select_node(&mut self, candidates: &[(usize, &Node)]) -> Option<usize> {
        let (_, least) = candidates
            .iter()
            .min_by(|(_, a), (_, b)| compare_load(a, b))?;

        let tied = || {
            candidates
                .iter()
                .enumerate()
                .filter(|(_, (_, node))| compare_load(node, least) == Ordering::Equal)
        };

        let last = self.last_selected;
        let (position, (index, node)) = tied()
            .find(|(_, (_, node))| last.map_or(true, |last| node.id() > last))
            .or_else(|| tied().next())?;

        self.last_selected = Some(node.id());

        debug!(
            "LeastConnectionsStrategy: Selected node {} (registry index {}) from {} candidates with in_flight {}",
            node.id(), index, candidates.len(), node.in_flight()
        );

        Some(position)
    }
}
