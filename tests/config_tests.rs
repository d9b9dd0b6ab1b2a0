//! Tests for TOML configuration loading and building balancers from it.

use llm_balancer::config::{load_config, parse_config};
use llm_balancer::{Balancer, BalancerError, NodeState, ProviderType};
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

const FULL_CONFIG: &str = r#"
[settings]
timeout_secs = 30
max_tokens = 512

[[backends]]
type = "anthropic"
api_key = "claude-key"

[[backends]]
type = "openai"
api_key = "openai-key"
endpoint = "http://localhost:8080/v1/chat/completions"

[[nodes]]
type = "claude"
model = "claude-v1"
system = "You are a helpful assistant."
messages = [{ role = "user", content = "Hello from Claude!" }]
weight = 2

[[nodes]]
type = "openai"
model = "gpt-3.5-turbo"
max_in_flight = 4
messages = [
    { role = "system", content = "You are a helpful assistant." },
    { role = "user", content = "Hello from OpenAI!" },
]

[[nodes]]
type = "gpt"
model = "gpt-4"
enabled = false
"#;

// ============================================================================
// TOML Parsing Tests
// ============================================================================

#[test]
fn test_parse_full_config() {
    let config = parse_config(FULL_CONFIG).unwrap();

    assert_eq!(config.settings.timeout_secs, 30);
    assert_eq!(config.settings.max_tokens, 512);
    assert_eq!(config.backends.len(), 2);
    assert_eq!(config.backends[1].endpoint.as_deref(), Some("http://localhost:8080/v1/chat/completions"));
    assert_eq!(config.nodes.len(), 3);
    assert_eq!(config.nodes[0].system.as_deref(), Some("You are a helpful assistant."));
    assert_eq!(config.nodes[0].weight, 2);
    assert_eq!(config.nodes[1].messages.len(), 2);
    assert_eq!(config.nodes[1].messages[1].content(), "Hello from OpenAI!");
    assert_eq!(config.nodes[1].max_in_flight, Some(4));
    assert!(!config.nodes[2].enabled);
}

#[test]
fn test_env_var_in_endpoint() {
    env::set_var("CONFIG_TESTS_PROXY_HOST", "proxy.internal");

    let toml = r#"
[[backends]]
type = "openai"
api_key = "key"
endpoint = "https://${CONFIG_TESTS_PROXY_HOST}/v1/chat/completions"
"#;

    let config = parse_config(toml).unwrap();
    assert_eq!(
        config.backends[0].endpoint.as_deref(),
        Some("https://proxy.internal/v1/chat/completions")
    );

    env::remove_var("CONFIG_TESTS_PROXY_HOST");
}

#[test]
fn test_invalid_toml() {
    let err = parse_config("[[nodes]\ntype = ").unwrap_err();
    assert!(err.to_string().contains("Failed to parse TOML"));
}

#[test]
fn test_invalid_endpoint() {
    let toml = r#"
[[backends]]
type = "openai"
api_key = "key"
endpoint = "not a url"
"#;
    let err = parse_config(toml).unwrap_err().to_string();
    assert!(err.contains("Invalid endpoint"));
}

#[test]
fn test_duplicate_backend() {
    let toml = r#"
[[backends]]
type = "claude"
api_key = "a"

[[backends]]
type = "anthropic"
api_key = "b"
"#;
    let err = parse_config(toml).unwrap_err().to_string();
    assert!(err.contains("Duplicate backend"));
}

#[test]
fn test_system_on_openai_node_rejected() {
    let toml = r#"
[[backends]]
type = "openai"
api_key = "key"

[[nodes]]
type = "openai"
model = "gpt-4"
system = "nope"
"#;
    let err = parse_config(toml).unwrap_err().to_string();
    assert!(err.contains("only supported for claude"));
}

#[test]
fn test_zero_weight_rejected() {
    let toml = r#"
[[backends]]
type = "openai"
api_key = "key"

[[nodes]]
type = "openai"
model = "gpt-4"
weight = 0
"#;
    assert!(parse_config(toml).is_err());
}

#[test]
fn test_empty_model_rejected() {
    let toml = r#"
[[backends]]
type = "openai"
api_key = "key"

[[nodes]]
type = "openai"
model = ""
"#;
    let err = parse_config(toml).unwrap_err().to_string();
    assert!(err.contains("model must not be empty"));
}

#[test]
fn test_empty_role_rejected() {
    let toml = r#"
[[backends]]
type = "openai"
api_key = "key"

[[nodes]]
type = "openai"
model = "gpt-4"
messages = [{ role = "", content = "x" }]
"#;
    let err = parse_config(toml).unwrap_err().to_string();
    assert!(err.contains("empty role"));
}

// ============================================================================
// File Loading Tests
// ============================================================================

#[test]
fn test_load_config_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(FULL_CONFIG.as_bytes()).unwrap();

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.nodes.len(), 3);
}

#[test]
fn test_load_config_missing_file() {
    let err = load_config("/definitely/not/here/balancer.toml").unwrap_err();
    assert!(matches!(err, BalancerError::ConfigError(_)));
    assert!(err.to_string().contains("Failed to read config file"));
}

// ============================================================================
// Balancer From Config Tests
// ============================================================================

#[test]
fn test_balancer_from_config_str() {
    let balancer = Balancer::from_config_str(FULL_CONFIG).unwrap();
    let nodes = balancer.list_nodes();

    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[0].model, "claude-v1");
    assert_eq!(nodes[0].provider_type, ProviderType::Claude);
    assert_eq!(nodes[0].weight, 2);
    assert_eq!(nodes[1].provider_type, ProviderType::OpenAI);
    assert_eq!(nodes[1].max_in_flight, Some(4));
    assert_eq!(nodes[2].state, NodeState::Unavailable);
    assert_eq!(balancer.available_count(), 2);
}

#[test]
fn test_balancer_from_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(FULL_CONFIG.as_bytes()).unwrap();

    let balancer = Balancer::from_config_file(file.path()).unwrap();
    assert_eq!(balancer.node_count(), 3);
}

#[test]
fn test_balancer_from_config_selection_skips_disabled() {
    let balancer = Balancer::from_config_str(FULL_CONFIG).unwrap();
    for _ in 0..6 {
        assert_ne!(balancer.select_node().unwrap().model, "gpt-4");
    }
}

#[test]
fn test_balancer_from_config_hint_for_disabled_model() {
    let balancer = Balancer::from_config_str(FULL_CONFIG).unwrap();
    assert!(matches!(balancer.acquire(Some("gpt-4")), Err(BalancerError::NoAvailableNodes)));
    assert!(matches!(balancer.acquire(Some("gpt-5")), Err(BalancerError::ProviderMismatch(_))));
}

#[test]
fn test_balancer_from_empty_config() {
    let balancer = Balancer::from_config_str("").unwrap();
    assert_eq!(balancer.node_count(), 0);
    assert!(matches!(balancer.select_node(), Err(BalancerError::NoAvailableNodes)));
}

#[test]
fn test_balancer_rejects_model_shared_across_provider_types() {
    let toml = r#"
[[backends]]
type = "claude"
api_key = "claude-key"

[[backends]]
type = "openai"
api_key = "openai-key"

[[nodes]]
type = "claude"
model = "claude-v1"

[[nodes]]
type = "openai"
model = "claude-v1"
"#;
    let result = Balancer::from_config_str(toml);
    assert!(matches!(result, Err(BalancerError::ConfigError(msg)) if msg.contains("claude-v1")));
}
