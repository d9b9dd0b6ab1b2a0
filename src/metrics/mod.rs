//! Metrics module for the balancer
//!
//! This module provides optional metrics emission for monitoring dispatches.
//! Enable with the `metrics` feature flag.
//!
//! # Example
//!
//! ```ignore
//! use llm_balancer::metrics::describe_metrics;
//! use metrics_exporter_prometheus::PrometheusBuilder;
//!
//! // User sets up their preferred exporter
//! PrometheusBuilder::new()
//!     .with_http_listener(([127, 0, 0, 1], 9090))
//!     .install()
//!     .expect("prometheus setup");
//!
//! // Describe metrics (optional, improves Prometheus discovery)
//! describe_metrics();
//! ```

pub mod labels;
mod recorder;

pub use recorder::*;

/// Metric name constants
pub mod names {
    /// Total number of dispatches that reached a node
    pub const DISPATCH_TOTAL: &str = "balancer_dispatch_total";
    /// Dispatch duration in seconds
    pub const DISPATCH_DURATION: &str = "balancer_dispatch_duration_seconds";
    /// Total number of errors by type
    pub const ERRORS_TOTAL: &str = "balancer_errors_total";
    /// Requests currently in flight per node
    pub const NODE_IN_FLIGHT: &str = "balancer_node_in_flight";
}

/// Describe all metrics with their units and descriptions.
/// Call this after setting up your metrics exporter for better discovery.
pub fn describe_metrics() {
    use metrics::{describe_counter, describe_gauge, describe_histogram, Unit};

    describe_counter!(
        names::DISPATCH_TOTAL,
        Unit::Count,
        "Total number of dispatches that reached a node"
    );
    describe_histogram!(
        names::DISPATCH_DURATION,
        Unit::Seconds,
        "Dispatch duration in seconds"
    );
    describe_counter!(
        names::ERRORS_TOTAL,
        Unit::Count,
        "Total number of errors by type"
    );
    describe_gauge!(
        names::NODE_IN_FLIGHT,
        Unit::Count,
        "Requests currently in flight per node"
    );
}
