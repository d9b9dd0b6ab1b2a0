//! Configuration module for TOML-based Balancer configuration.
//!
//! # Example Configuration File
//!
//! ```toml
//! [settings]
//! timeout_secs = 60
//!
//! [[backends]]
//! type = "claude"
//! api_key = "${ANTHROPIC_API_KEY}"
//!
//! [[nodes]]
//! type = "claude"
//! model = "claude-v1"
//! system = "You are a helpful assistant."
//! weight = 2
//! ```
//!
//! # Environment Variables
//!
//! API keys and endpoints can reference environment variables
//! using the `${VAR_NAME}` syntax. These are resolved at load time.

mod types;
mod loader;

pub use types::{Config, Settings, BackendConfig, NodeConfig};
pub use loader::{load_config, parse_config};
