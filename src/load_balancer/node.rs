use log::debug;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::constants;
use crate::load_balancer::types::NodeInfo;
use crate::providers::Provider;

/// Opaque identifier of a node within one balancer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn new(raw: usize) -> Self {
        NodeId(raw)
    }

    pub fn as_usize(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Availability of a node as seen by the selection policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeState {
    /// Idle and selectable
    Available,
    /// Serving at least one request; still selectable while under capacity
    Busy,
    /// Taken out of rotation
    Unavailable,
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeState::Available => write!(f, "available"),
            NodeState::Busy => write!(f, "busy"),
            NodeState::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Per-node capacity settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeOptions {
    /// Relative capacity. A node with weight 2 is filled twice as deep as one with weight 1.
    pub weight: u32,
    /// Hard cap on concurrent requests; `None` means unbounded
    pub max_in_flight: Option<usize>,
    /// Disabled nodes start out `Unavailable`
    pub enabled: bool,
}

impl Default for NodeOptions {
    fn default() -> Self {
        Self {
            weight: constants::DEFAULT_NODE_WEIGHT,
            max_in_flight: None,
            enabled: true,
        }
    }
}

/// A provider plus the runtime state the balancer uses to route to it.
///
/// State only changes through the balancer; every mutator is crate-private.
pub struct Node {
    id: NodeId,
    provider: Arc<dyn Provider>,
    state: NodeState,
    in_flight: usize,
    weight: u32,
    max_in_flight: Option<usize>,
    request_count: usize,
    error_count: usize,
    last_used: Option<Instant>,
}

impl Node {
    pub(crate) fn new(id: NodeId, provider: Arc<dyn Provider>, options: NodeOptions) -> Self {
        Self {
            id,
            provider,
            state: if options.enabled { NodeState::Available } else { NodeState::Unavailable },
            in_flight: 0,
            weight: options.weight.max(1),
            max_in_flight: options.max_in_flight,
            request_count: 0,
            error_count: 0,
            last_used: None,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn model(&self) -> &str {
        self.provider.get_model()
    }

    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    pub fn last_used(&self) -> Option<Instant> {
        self.last_used
    }

    /// Whether the selection policy may hand this node a new request
    pub fn is_eligible(&self) -> bool {
        if self.state == NodeState::Unavailable {
            return false;
        }
        match self.max_in_flight {
            Some(cap) => self.in_flight < cap,
            None => true,
        }
    }

    /// Reserve one slot on this node
    pub(crate) fn mark_busy(&mut self) {
        self.in_flight += 1;
        self.last_used = Some(Instant::now());
        if self.state != NodeState::Unavailable {
            self.state = NodeState::Busy;
        }
        debug!("Node {} ({}) reserved, in_flight={}", self.id, self.model(), self.in_flight);
    }

    /// Release one slot reserved by `mark_busy`.
    /// An `Unavailable` node stays out of rotation.
    pub(crate) fn mark_available(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if self.state != NodeState::Unavailable {
            self.state = if self.in_flight == 0 { NodeState::Available } else { NodeState::Busy };
        }
        debug!("Node {} ({}) released, in_flight={}", self.id, self.model(), self.in_flight);
    }

    /// Take the node out of rotation. Requests already in flight are left alone.
    pub(crate) fn mark_unavailable(&mut self) {
        self.state = NodeState::Unavailable;
    }

    /// Put an `Unavailable` node back into rotation
    pub(crate) fn restore(&mut self) {
        if self.state == NodeState::Unavailable {
            self.state = if self.in_flight == 0 { NodeState::Available } else { NodeState::Busy };
        }
    }

    /// Record the outcome of a completed dispatch for observability
    pub(crate) fn record_result(&mut self, success: bool) {
        self.request_count += 1;
        if !success {
            self.error_count += 1;
        }
    }

    /// Calculate the error rate as a percentage
    ///
    /// # Returns
    /// * Error rate from 0.0 to 100.0, or 0.0 if no requests
    pub fn get_error_rate(&self) -> f64 {
        if self.request_count > 0 {
            (self.error_count as f64 / self.request_count as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Read-only snapshot of this node
    pub fn info(&self) -> NodeInfo {
        NodeInfo {
            id: self.id,
            model: self.model().to_string(),
            provider_type: self.provider.provider_type(),
            state: self.state,
            in_flight: self.in_flight,
            weight: self.weight,
            max_in_flight: self.max_in_flight,
            request_count: self.request_count,
            error_count: self.error_count,
            error_rate: self.get_error_rate(),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("model", &self.model())
            .field("state", &self.state)
            .field("in_flight", &self.in_flight)
            .field("weight", &self.weight)
            .finish()
    }
}
