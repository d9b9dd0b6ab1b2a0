//! Metric recording functions

use std::time::Duration;

use crate::errors::{BalancerError, DispatchError};
use crate::load_balancer::NodeId;
use crate::ProviderType;

use super::{labels, names};

/// Record a successful dispatch
pub fn record_dispatch_success(provider: ProviderType, model: &str, duration: Duration) {
    let provider = labels::provider_label(provider);

    metrics::counter!(
        names::DISPATCH_TOTAL,
        labels::keys::PROVIDER => provider,
        labels::keys::MODEL => model.to_string(),
        labels::keys::OUTCOME => "success"
    )
    .increment(1);

    metrics::histogram!(
        names::DISPATCH_DURATION,
        labels::keys::PROVIDER => provider,
        labels::keys::MODEL => model.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Record a dispatch whose downstream call failed
pub fn record_dispatch_failure(provider: ProviderType, model: &str, error: &DispatchError, duration: Duration) {
    let provider = labels::provider_label(provider);

    // Failures still count as dispatches
    metrics::counter!(
        names::DISPATCH_TOTAL,
        labels::keys::PROVIDER => provider,
        labels::keys::MODEL => model.to_string(),
        labels::keys::OUTCOME => "failure"
    )
    .increment(1);

    metrics::histogram!(
        names::DISPATCH_DURATION,
        labels::keys::PROVIDER => provider,
        labels::keys::MODEL => model.to_string()
    )
    .record(duration.as_secs_f64());

    metrics::counter!(
        names::ERRORS_TOTAL,
        labels::keys::ERROR_TYPE => labels::dispatch_error_label(error)
    )
    .increment(1);
}

/// Record a request rejected before reaching any node
pub fn record_rejection(error: &BalancerError) {
    metrics::counter!(
        names::ERRORS_TOTAL,
        labels::keys::ERROR_TYPE => labels::error_type_label(error)
    )
    .increment(1);
}

/// Update the in-flight gauge of a node
pub fn set_node_in_flight(node: NodeId, model: &str, in_flight: usize) {
    metrics::gauge!(
        names::NODE_IN_FLIGHT,
        labels::keys::NODE => node.as_usize().to_string(),
        labels::keys::MODEL => model.to_string()
    )
    .set(in_flight as f64);
}
