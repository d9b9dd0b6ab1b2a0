use std::error::Error;
use std::fmt;

use crate::load_balancer::NodeId;

/// Failure reported by a `Dispatcher` while talking to a provider backend
#[derive(Debug)]
pub enum DispatchError {
    /// Error from the HTTP client
    RequestError(reqwest::Error),
    /// Error reported by the API provider
    ApiError(String),
    /// Rate limiting error
    RateLimit(String),
    /// Response could not be parsed
    ParseError(String),
    /// No backend knows how to serve this model
    UnknownModel(String),
    /// Dispatcher misconfiguration (bad key format, missing backend, ...)
    ConfigError(String),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::RequestError(err) => write!(f, "Request error: {}", err),
            DispatchError::ApiError(msg) => write!(f, "API error: {}", msg),
            DispatchError::RateLimit(msg) => write!(f, "Rate limit error: {}", msg),
            DispatchError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            DispatchError::UnknownModel(model) => write!(f, "No backend configured for model '{}'", model),
            DispatchError::ConfigError(msg) => write!(f, "Dispatcher configuration error: {}", msg),
        }
    }
}

impl Error for DispatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DispatchError::RequestError(err) => Some(err),
            _ => None,
        }
    }
}

/// Convert reqwest errors to DispatchError
impl From<reqwest::Error> for DispatchError {
    fn from(err: reqwest::Error) -> Self {
        DispatchError::RequestError(err)
    }
}

/// Convert serde_json errors to DispatchError
impl From<serde_json::Error> for DispatchError {
    fn from(err: serde_json::Error) -> Self {
        DispatchError::ParseError(err.to_string())
    }
}

impl DispatchError {
    /// Returns RateLimit error for 429 status or rate limit keywords
    pub fn from_api_response(status: reqwest::StatusCode, error_message: String) -> Self {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return DispatchError::RateLimit(error_message);
        }

        let msg_lower = error_message.to_lowercase();
        if msg_lower.contains("rate limit")
            || msg_lower.contains("too many requests")
            || msg_lower.contains("quota exceeded")
            || msg_lower.contains("overloaded")
            || msg_lower.contains("throttle") {
            return DispatchError::RateLimit(error_message);
        }

        DispatchError::ApiError(error_message)
    }
}

/// Errors surfaced by the balancer to its callers
#[derive(Debug)]
pub enum BalancerError {
    /// Registry is empty or no node is currently eligible
    NoAvailableNodes,
    /// A model hint was supplied but no registered node serves that model
    ProviderMismatch(String),
    /// The dispatcher failed for the selected node
    DownstreamError {
        node: NodeId,
        cause: DispatchError,
    },
    /// Registry operation referenced an unknown node
    NodeNotFound(NodeId),
    /// Configuration or construction error
    ConfigError(String),
}

impl fmt::Display for BalancerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BalancerError::NoAvailableNodes => write!(f, "No available nodes"),
            BalancerError::ProviderMismatch(model) => write!(f, "No registered node serves model '{}'", model),
            BalancerError::DownstreamError { node, cause } => write!(f, "Downstream error on node {}: {}", node, cause),
            BalancerError::NodeNotFound(id) => write!(f, "Node not found: {}", id),
            BalancerError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl Error for BalancerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BalancerError::DownstreamError { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

/// Convert std::io::Error to BalancerError
impl From<std::io::Error> for BalancerError {
    fn from(err: std::io::Error) -> Self {
        BalancerError::ConfigError(err.to_string())
    }
}

/// Convert toml parsing errors to BalancerError
impl From<toml::de::Error> for BalancerError {
    fn from(err: toml::de::Error) -> Self {
        BalancerError::ConfigError(err.to_string())
    }
}

impl BalancerError {
    /// Whether the caller may reasonably retry the same request later
    pub fn is_retryable(&self) -> bool {
        match self {
            BalancerError::NoAvailableNodes => true,
            BalancerError::DownstreamError { cause, .. } => matches!(
                cause,
                DispatchError::RequestError(_) | DispatchError::RateLimit(_)
            ),
            _ => false,
        }
    }
}

/// Result type alias for balancer operations
pub type BalancerResult<T> = Result<T, BalancerError>;

/// Result type alias for dispatcher operations
pub type DownstreamResult<T> = Result<T, DispatchError>;
