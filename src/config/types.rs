//! Configuration types for TOML-based configuration.
//!
//! These types map directly to the TOML configuration file structure.

use serde::Deserialize;

use crate::constants;
use crate::providers::Message;

/// Root configuration structure.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Global settings for the HTTP dispatcher.
    #[serde(default)]
    pub settings: Settings,

    /// Credentials per backend family.
    #[serde(default)]
    pub backends: Vec<BackendConfig>,

    /// Nodes to register, in registry order.
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
}

/// Global settings.
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// `max_tokens` sent to APIs that require one.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    constants::DEFAULT_TIMEOUT_SECS
}

fn default_max_tokens() -> u32 {
    constants::DEFAULT_MAX_TOKENS
}

/// Backend family credentials.
#[derive(Debug, Deserialize)]
pub struct BackendConfig {
    /// Provider type: "claude" or "openai" (aliases "anthropic", "gpt").
    #[serde(rename = "type")]
    pub provider_type: String,

    /// API key (supports environment variable syntax: "${VAR_NAME}").
    #[serde(default)]
    pub api_key: String,

    /// Custom endpoint URL (for proxies or self-hosted compatible servers).
    pub endpoint: Option<String>,
}

/// Node configuration.
#[derive(Debug, Deserialize)]
pub struct NodeConfig {
    /// Provider type: "claude" or "openai".
    #[serde(rename = "type")]
    pub provider_type: String,

    /// Model identifier (e.g., "claude-v1", "gpt-3.5-turbo").
    pub model: String,

    /// Top-level system prompt (Claude nodes only).
    pub system: Option<String>,

    /// Messages this node prepends to every request.
    #[serde(default)]
    pub messages: Vec<Message>,

    /// Relative capacity of this node.
    #[serde(default = "default_weight")]
    pub weight: u32,

    /// Hard cap on concurrent requests.
    pub max_in_flight: Option<usize>,

    /// Whether this node starts in rotation.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_weight() -> u32 {
    constants::DEFAULT_NODE_WEIGHT
}

fn default_true() -> bool {
    true
}
