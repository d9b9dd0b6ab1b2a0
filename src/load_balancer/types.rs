use serde::Serialize;

use crate::load_balancer::node::{NodeId, NodeState};
use crate::providers::{Message, ProviderType};

/// Read-only snapshot of a node, for observability and CLI tooling
#[derive(Debug, Clone, Serialize)]
pub struct NodeInfo {
    pub id: NodeId,
    pub model: String,
    pub provider_type: ProviderType,
    pub state: NodeState,
    pub in_flight: usize,
    pub weight: u32,
    pub max_in_flight: Option<usize>,
    pub request_count: usize,
    pub error_count: usize,
    pub error_rate: f64,
}

/// User-facing request for a batch dispatch
#[derive(Debug, Clone, Default)]
pub struct DispatchRequest {
    pub messages: Vec<Message>,        // Appended after the node's own messages
    pub model_hint: Option<String>,    // Restrict selection to nodes serving this model
}

impl DispatchRequest {
    // Standard Constructor
    pub fn new(messages: Vec<Message>) -> Self {
        DispatchRequest {
            messages,
            ..Default::default()
        }
    }

    /// Restricts this request to nodes serving `model`
    pub fn model_hint(mut self, model: impl Into<String>) -> Self {
        self.model_hint = Some(model.into());
        self
    }

    /// Appends one more message to the request
    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }
}

/// Successful outcome of a dispatch
#[derive(Debug, Clone, Serialize)]
pub struct DispatchResult {
    pub node_id: NodeId,
    pub model: String,
    pub content: String,
}
