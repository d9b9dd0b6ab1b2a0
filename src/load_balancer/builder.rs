use crate::dispatch::Dispatcher;
use crate::errors::{BalancerError, BalancerResult};
use crate::load_balancer::node::NodeOptions;
use crate::load_balancer::strategies::{LeastConnectionsStrategy, LoadBalancingStrategy};
use crate::providers::Provider;
use log::debug;
use std::sync::Arc;
use super::Balancer;

/// Internal helper struct for Builder
struct NodeConfig {
    provider: Arc<dyn Provider>,
    options: NodeOptions,
}

/// Balancer Builder
pub struct BalancerBuilder {
    dispatcher: Option<Arc<dyn Dispatcher>>,
    nodes_to_build: Vec<NodeConfig>,
    strategy: Box<dyn LoadBalancingStrategy + Send + Sync>,
}

impl BalancerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        BalancerBuilder {
            dispatcher: None,
            nodes_to_build: Vec::new(),
            strategy: Box::new(LeastConnectionsStrategy::new()), // Default strategy
        }
    }

    /// Sets the dispatcher that performs the downstream calls.
    pub fn dispatcher(mut self, dispatcher: Arc<dyn Dispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// Sets the load balancing strategy for the balancer.
    pub fn strategy(mut self, strategy: Box<dyn LoadBalancingStrategy + Send + Sync>) -> Self {
        self.strategy = strategy;
        self
    }

    /// Begins configuring a new node.
    /// Subsequent calls like `.weight()`, `.max_in_flight()`, `.enabled()` apply to this node.
    pub fn add_node<P: Provider + 'static>(self, provider: P) -> Self {
        self.add_shared_node(Arc::new(provider))
    }

    /// Same as `add_node` for a provider that is already behind an `Arc`.
    pub fn add_shared_node(mut self, provider: Arc<dyn Provider>) -> Self {
        self.nodes_to_build.push(NodeConfig {
            provider,
            options: NodeOptions::default(),
        });
        self
    }

    fn last_node(&mut self, method: &str) -> &mut NodeConfig {
        match self.nodes_to_build.last_mut() {
            Some(last_node) => last_node,
            None => panic!("'.{}()' called before '.add_node()'", method),
        }
    }

    /// Sets the weight of the *last added* node.
    /// Panics if `add_node` was not called before this.
    pub fn weight(mut self, weight: u32) -> Self {
        self.last_node("weight").options.weight = weight;
        self
    }

    /// Caps concurrent requests on the *last added* node.
    /// Panics if `add_node` was not called before this.
    pub fn max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.last_node("max_in_flight").options.max_in_flight = Some(max_in_flight);
        self
    }

    /// Sets the enabled status for the *last added* node.
    /// Panics if `add_node` was not called before this.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.last_node("enabled").options.enabled = enabled;
        self
    }

    /// Consumes the builder and constructs the `Balancer`.
    /// Returns an error if no dispatcher was set or a node has invalid options.
    pub fn build(self) -> BalancerResult<Balancer> {
        let dispatcher = self.dispatcher.ok_or_else(|| {
            BalancerError::ConfigError("Build failed: no dispatcher configured, call .dispatcher()".to_string())
        })?;

        let balancer = Balancer::new_with_strategy(dispatcher, self.strategy);

        for node_config in self.nodes_to_build {
            let model = node_config.provider.get_model().to_string();
            let id = balancer.add_node_with_options(node_config.provider, node_config.options)?;
            debug!("Built and added node {} ({})", id, model);
        }

        if balancer.node_count() == 0 {
            log::warn!("Balancer built with no nodes.");
        }

        Ok(balancer)
    }
}

impl Default for BalancerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
