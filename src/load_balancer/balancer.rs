use futures::future::join_all;
use log::{debug, info, warn};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::{self, Config};
use crate::dispatch::{Dispatcher, HttpDispatcher};
use crate::errors::{BalancerError, BalancerResult};
use crate::load_balancer::builder::BalancerBuilder;
use crate::load_balancer::lease::NodeLease;
use crate::load_balancer::node::{Node, NodeId, NodeOptions, NodeState};
use crate::load_balancer::strategies::{LeastConnectionsStrategy, LoadBalancingStrategy};
use crate::load_balancer::types::{DispatchRequest, DispatchResult, NodeInfo};
use crate::providers::{create_provider, ClaudeProvider, Message, Provider, ProviderType};

/// Node registry plus selection state, always accessed under one lock
pub(crate) struct Registry {
    nodes: Vec<Node>,
    strategy: Box<dyn LoadBalancingStrategy + Send + Sync>,
    next_id: usize,
}

/// Lock the registry, recovering the data if a previous holder panicked.
/// Every critical section leaves the registry consistent, so poisoning carries no information.
pub(crate) fn lock_registry(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Registry {
    fn new(strategy: Box<dyn LoadBalancingStrategy + Send + Sync>) -> Self {
        Self {
            nodes: Vec::new(),
            strategy,
            next_id: 0,
        }
    }

    fn insert(&mut self, provider: Arc<dyn Provider>, options: NodeOptions) -> NodeId {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        self.nodes.push(Node::new(id, provider, options));
        id
    }

    fn position(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|node| node.id() == id)
    }

    fn node_mut(&mut self, id: NodeId) -> BalancerResult<&mut Node> {
        self.nodes
            .iter_mut()
            .find(|node| node.id() == id)
            .ok_or(BalancerError::NodeNotFound(id))
    }

    /// Registry index of the node the strategy picks among eligible nodes
    fn pick(&mut self, model_hint: Option<&str>) -> BalancerResult<usize> {
        if self.nodes.is_empty() {
            return Err(BalancerError::NoAvailableNodes);
        }

        if let Some(model) = model_hint {
            if !self.nodes.iter().any(|node| node.model() == model) {
                return Err(BalancerError::ProviderMismatch(model.to_string()));
            }
        }

        let candidates: Vec<(usize, &Node)> = self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.is_eligible())
            .filter(|(_, node)| model_hint.map_or(true, |model| node.model() == model))
            .collect();

        if candidates.is_empty() {
            debug!("No eligible node among {} registered (hint: {:?})", self.nodes.len(), model_hint);
            return Err(BalancerError::NoAvailableNodes);
        }

        let position = self.strategy
            .select_node(&candidates)
            .ok_or(BalancerError::NoAvailableNodes)?;

        candidates
            .get(position)
            .map(|(index, _)| *index)
            .ok_or(BalancerError::NoAvailableNodes)
    }

    /// Select and mark busy in one step
    fn reserve(&mut self, model_hint: Option<&str>) -> BalancerResult<(NodeId, Arc<dyn Provider>)> {
        let index = self.pick(model_hint)?;
        let node = &mut self.nodes[index];
        node.mark_busy();

        #[cfg(feature = "metrics")]
        crate::metrics::set_node_in_flight(node.id(), node.model(), node.in_flight());

        Ok((node.id(), Arc::clone(node.provider())))
    }

    /// Undo one `reserve`. A node removed in the meantime is ignored.
    pub(crate) fn release(&mut self, id: NodeId, outcome: Option<bool>) {
        let Some(index) = self.position(id) else {
            debug!("Released lease for node {} which is no longer registered", id);
            return;
        };
        let node = &mut self.nodes[index];
        node.mark_available();
        if let Some(success) = outcome {
            node.record_result(success);
        }

        #[cfg(feature = "metrics")]
        crate::metrics::set_node_in_flight(node.id(), node.model(), node.in_flight());
    }
}

/// Routes requests across a registry of provider nodes.
///
/// The balancer is safe to share between tasks (wrap it in an `Arc`). Selection
/// and reservation happen under a short registry lock; the dispatcher call runs
/// with no lock held.
pub struct Balancer {
    registry: Arc<Mutex<Registry>>,
    dispatcher: Arc<dyn Dispatcher>,
}

impl Balancer {
    /// Creates an empty balancer with the default least-connections strategy
    pub fn new(dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self::new_with_strategy(dispatcher, Box::new(LeastConnectionsStrategy::new()))
    }

    /// Creates an empty balancer with a custom selection strategy
    pub fn new_with_strategy(
        dispatcher: Arc<dyn Dispatcher>,
        strategy: Box<dyn LoadBalancingStrategy + Send + Sync>,
    ) -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::new(strategy))),
            dispatcher,
        }
    }

    /// Creates a builder for configuring a balancer
    pub fn builder() -> BalancerBuilder {
        BalancerBuilder::new()
    }

    /// Build a balancer backed by an `HttpDispatcher` from a parsed configuration
    pub fn from_config(config: &Config) -> BalancerResult<Self> {
        let mut dispatcher = HttpDispatcher::from_settings(&config.settings)?;
        for backend in &config.backends {
            let provider_type = ProviderType::parse(&backend.provider_type)?;
            dispatcher.add_backend(provider_type, backend.api_key.clone(), backend.endpoint.clone());
        }

        let mut builder = Balancer::builder();
        for node in &config.nodes {
            let provider_type = ProviderType::parse(&node.provider_type)?;
            dispatcher.register_model(&node.model, provider_type);

            let provider: Arc<dyn Provider> = match (&node.system, provider_type) {
                (Some(system), ProviderType::Claude) => Arc::new(ClaudeProvider::new(
                    node.model.clone(),
                    Some(system.clone()),
                    node.messages.clone(),
                )?),
                _ => create_provider(provider_type, node.model.clone(), node.messages.clone())?,
            };

            builder = builder
                .add_shared_node(provider)
                .weight(node.weight)
                .enabled(node.enabled);
            if let Some(cap) = node.max_in_flight {
                builder = builder.max_in_flight(cap);
            }
        }

        builder.dispatcher(Arc::new(dispatcher)).build()
    }

    /// Build a balancer from a TOML configuration string
    pub fn from_config_str(content: &str) -> BalancerResult<Self> {
        let config = config::parse_config(content)?;
        Self::from_config(&config)
    }

    /// Build a balancer from a TOML configuration file
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> BalancerResult<Self> {
        let config = config::load_config(path)?;
        Self::from_config(&config)
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        lock_registry(&self.registry)
    }

    /// Register a provider with default options
    pub fn add_node(&self, provider: Arc<dyn Provider>) -> NodeId {
        let id = self.registry().insert(Arc::clone(&provider), NodeOptions::default());
        info!("Added node {} ({} / {})", id, provider.provider_type(), provider.get_model());
        id
    }

    /// Register a provider with explicit capacity options
    pub fn add_node_with_options(&self, provider: Arc<dyn Provider>, options: NodeOptions) -> BalancerResult<NodeId> {
        if options.weight == 0 {
            return Err(BalancerError::ConfigError(format!(
                "Node weight for model '{}' must be at least 1",
                provider.get_model()
            )));
        }
        if options.max_in_flight == Some(0) {
            return Err(BalancerError::ConfigError(format!(
                "max_in_flight for model '{}' must be at least 1",
                provider.get_model()
            )));
        }
        let id = self.registry().insert(Arc::clone(&provider), options);
        info!(
            "Added node {} ({} / {}) weight={} max_in_flight={:?} enabled={}",
            id, provider.provider_type(), provider.get_model(), options.weight, options.max_in_flight, options.enabled
        );
        Ok(id)
    }

    /// Remove a node from the registry. Outstanding leases on it become no-ops.
    pub fn remove_node(&self, id: NodeId) -> BalancerResult<NodeInfo> {
        let mut registry = self.registry();
        let index = registry.position(id).ok_or(BalancerError::NodeNotFound(id))?;
        let node = registry.nodes.remove(index);
        drop(registry);

        #[cfg(feature = "metrics")]
        crate::metrics::set_node_in_flight(id, node.model(), 0);

        if node.in_flight() > 0 {
            warn!("Removed node {} ({}) with {} request(s) still in flight", id, node.model(), node.in_flight());
        } else {
            info!("Removed node {} ({})", id, node.model());
        }
        Ok(node.info())
    }

    /// Take a node out of rotation without removing it
    pub fn disable_node(&self, id: NodeId) -> BalancerResult<()> {
        self.registry().node_mut(id)?.mark_unavailable();
        info!("Node {} marked unavailable", id);
        Ok(())
    }

    /// Return a disabled node to rotation
    pub fn enable_node(&self, id: NodeId) -> BalancerResult<()> {
        self.registry().node_mut(id)?.restore();
        info!("Node {} returned to rotation", id);
        Ok(())
    }

    /// Read-only snapshot of every node, in registry order
    pub fn list_nodes(&self) -> Vec<NodeInfo> {
        self.registry().nodes.iter().map(Node::info).collect()
    }

    /// Snapshot of a single node
    pub fn get_node(&self, id: NodeId) -> Option<NodeInfo> {
        let registry = self.registry();
        registry.position(id).map(|index| registry.nodes[index].info())
    }

    pub fn node_count(&self) -> usize {
        self.registry().nodes.len()
    }

    /// Number of nodes the selection policy could currently pick
    pub fn available_count(&self) -> usize {
        self.registry().nodes.iter().filter(|node| node.is_eligible()).count()
    }

    /// Run the selection policy once without reserving the node.
    /// Advances the round-robin cursor exactly like a dispatch would.
    pub fn select_node(&self) -> BalancerResult<NodeInfo> {
        let mut registry = self.registry();
        let index = registry.pick(None)?;
        Ok(registry.nodes[index].info())
    }

    /// Select a node and reserve a slot on it.
    /// The slot is released when the returned lease is dropped.
    pub fn acquire(&self, model_hint: Option<&str>) -> BalancerResult<NodeLease> {
        let (node_id, provider) = self.registry().reserve(model_hint).map_err(|e| {
            #[cfg(feature = "metrics")]
            crate::metrics::record_rejection(&e);
            e
        })?;
        Ok(NodeLease::new(Arc::clone(&self.registry), node_id, provider))
    }

    /// Select a node, forward its messages followed by `request_messages` to the
    /// dispatcher, and return the response.
    ///
    /// # Parameters
    /// * `request_messages` - Caller messages appended after the node's own
    /// * `model_hint` - Only consider nodes whose provider serves this model
    ///
    /// # Returns
    /// * `DispatchResult` on success, or `NoAvailableNodes`, `ProviderMismatch`,
    ///   `DownstreamError`
    pub async fn dispatch(&self, request_messages: &[Message], model_hint: Option<&str>) -> BalancerResult<DispatchResult> {
        if let Some(message) = request_messages.iter().find(|m| !m.has_valid_role()) {
            return Err(BalancerError::ConfigError(format!(
                "Request message has an empty role (content: {:?})",
                message.content()
            )));
        }

        let mut lease = self.acquire(model_hint)?;
        let node_id = lease.node_id();
        let model = lease.model().to_string();

        let mut messages = lease.provider().get_messages().into_owned();
        messages.extend_from_slice(request_messages);

        debug!("Dispatching {} message(s) to node {} ({})", messages.len(), node_id, model);

        let result = self.dispatcher.send(&model, &messages).await;
        lease.record_outcome(result.is_ok());

        match result {
            Ok(content) => {
                debug!("Node {} ({}) answered in {:?}", node_id, model, lease.elapsed());
                #[cfg(feature = "metrics")]
                crate::metrics::record_dispatch_success(lease.provider().provider_type(), &model, lease.elapsed());
                Ok(DispatchResult { node_id, model, content })
            }
            Err(cause) => {
                warn!("Node {} ({}) failed after {:?}: {}", node_id, model, lease.elapsed(), cause);
                #[cfg(feature = "metrics")]
                crate::metrics::record_dispatch_failure(lease.provider().provider_type(), &model, &cause, lease.elapsed());
                Err(BalancerError::DownstreamError { node: node_id, cause })
            }
        }
    }

    /// Dispatch several requests concurrently, returning results in request order
    pub async fn dispatch_many(&self, requests: Vec<DispatchRequest>) -> Vec<BalancerResult<DispatchResult>> {
        let pending = requests
            .iter()
            .map(|request| self.dispatch(&request.messages, request.model_hint.as_deref()));
        join_all(pending).await
    }

    /// Current state of a node, mostly useful in tests and tooling
    pub fn node_state(&self, id: NodeId) -> Option<NodeState> {
        self.get_node(id).map(|info| info.state)
    }
}

impl std::fmt::Debug for Balancer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Balancer")
            .field("nodes", &self.registry().nodes)
            .finish()
    }
}
