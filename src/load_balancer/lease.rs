use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::load_balancer::balancer::{lock_registry, Registry};
use crate::load_balancer::node::NodeId;
use crate::providers::Provider;

/// A reserved slot on a node.
///
/// Created by `Balancer::acquire` with the node already marked busy. Dropping
/// the lease releases the slot exactly once, whether the request succeeded,
/// failed, panicked or was cancelled mid-flight.
#[must_use = "dropping a lease releases the node immediately"]
pub struct NodeLease {
    registry: Arc<Mutex<Registry>>,
    node_id: NodeId,
    provider: Arc<dyn Provider>,
    acquired_at: Instant,
    outcome: Option<bool>,
}

impl NodeLease {
    pub(crate) fn new(registry: Arc<Mutex<Registry>>, node_id: NodeId, provider: Arc<dyn Provider>) -> Self {
        Self {
            registry,
            node_id,
            provider,
            acquired_at: Instant::now(),
            outcome: None,
        }
    }

    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    pub fn provider(&self) -> &dyn Provider {
        self.provider.as_ref()
    }

    pub fn model(&self) -> &str {
        self.provider.get_model()
    }

    /// Time since the node was reserved
    pub fn elapsed(&self) -> Duration {
        self.acquired_at.elapsed()
    }

    /// Record whether the request served under this lease succeeded.
    /// Leases dropped without an outcome (e.g. cancelled) are not counted.
    pub fn record_outcome(&mut self, success: bool) {
        self.outcome = Some(success);
    }
}

impl Drop for NodeLease {
    fn drop(&mut self) {
        let mut registry = lock_registry(&self.registry);
        registry.release(self.node_id, self.outcome);
    }
}

impl fmt::Debug for NodeLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeLease")
            .field("node_id", &self.node_id)
            .field("model", &self.model())
            .field("outcome", &self.outcome)
            .finish()
    }
}
