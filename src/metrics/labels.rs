//! Label helpers for consistent metric labeling

use crate::errors::{BalancerError, DispatchError};
use crate::ProviderType;

/// Standard label keys
pub mod keys {
    /// Provider type label key
    pub const PROVIDER: &str = "provider";
    /// Model name label key
    pub const MODEL: &str = "model";
    /// Node id label key
    pub const NODE: &str = "node";
    /// Outcome label key ("success" / "failure")
    pub const OUTCOME: &str = "outcome";
    /// Error type label key
    pub const ERROR_TYPE: &str = "error_type";
}

/// Convert ProviderType to label value string
pub fn provider_label(provider: ProviderType) -> &'static str {
    match provider {
        ProviderType::Claude => "claude",
        ProviderType::OpenAI => "openai",
    }
}

/// Convert DispatchError to error type label string
pub fn dispatch_error_label(error: &DispatchError) -> &'static str {
    match error {
        DispatchError::RequestError(_) => "request_error",
        DispatchError::ApiError(_) => "api_error",
        DispatchError::RateLimit(_) => "rate_limit",
        DispatchError::ParseError(_) => "parse_error",
        DispatchError::UnknownModel(_) => "unknown_model",
        DispatchError::ConfigError(_) => "dispatcher_config_error",
    }
}

/// Convert BalancerError to error type label string
pub fn error_type_label(error: &BalancerError) -> &'static str {
    match error {
        BalancerError::NoAvailableNodes => "no_available_nodes",
        BalancerError::ProviderMismatch(_) => "provider_mismatch",
        BalancerError::DownstreamError { cause, .. } => dispatch_error_label(cause),
        BalancerError::NodeNotFound(_) => "node_not_found",
        BalancerError::ConfigError(_) => "config_error",
    }
}
