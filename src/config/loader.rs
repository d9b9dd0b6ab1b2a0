//! Configuration file loading and environment variable resolution.

use std::collections::{HashMap, HashSet};
use std::env;
use std::fs;
use std::path::Path;
use regex::Regex;
use url::Url;

use crate::errors::{BalancerError, BalancerResult};
use crate::providers::ProviderType;
use super::types::Config;

/// Load and parse a TOML configuration file.
///
/// # Arguments
/// * `path` - Path to the TOML configuration file
///
/// # Returns
/// * `BalancerResult<Config>` - Parsed configuration with environment variables resolved
///
/// # Example
/// ```no_run
/// use llm_balancer::config::load_config;
///
/// let config = load_config("balancer.toml").unwrap();
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> BalancerResult<Config> {
    let path = path.as_ref();

    let content = fs::read_to_string(path).map_err(|e| {
        BalancerError::ConfigError(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&content)
}

/// Parse a TOML configuration string.
///
/// # Arguments
/// * `content` - TOML configuration string
///
/// # Returns
/// * `BalancerResult<Config>` - Parsed configuration with environment variables resolved
pub fn parse_config(content: &str) -> BalancerResult<Config> {
    let mut config: Config = toml::from_str(content).map_err(|e| {
        BalancerError::ConfigError(format!("Failed to parse TOML: {}", e))
    })?;

    resolve_env_vars(&mut config)?;
    validate_config(&config)?;

    Ok(config)
}

fn env_var_pattern() -> BalancerResult<Regex> {
    Regex::new(r"\$\{([^}]+)\}")
        .map_err(|e| BalancerError::ConfigError(format!("Invalid env var pattern: {}", e)))
}

/// Resolve environment variable references in the configuration.
///
/// Environment variables are specified using the `${VAR_NAME}` syntax.
/// If a variable is not found, an error is returned with a helpful message.
fn resolve_env_vars(config: &mut Config) -> BalancerResult<()> {
    let pattern = env_var_pattern()?;

    for (idx, backend) in config.backends.iter_mut().enumerate() {
        let location = format!("backends[{}].api_key", idx);
        backend.api_key = resolve_env_var_string(&backend.api_key, &pattern, &location)?;

        if let Some(ref endpoint) = backend.endpoint {
            let location = format!("backends[{}].endpoint", idx);
            backend.endpoint = Some(resolve_env_var_string(endpoint, &pattern, &location)?);
        }
    }

    Ok(())
}

/// Resolve every `${VAR}` in a single string
fn resolve_env_var_string(s: &str, pattern: &Regex, location: &str) -> BalancerResult<String> {
    let mut result = s.to_string();

    for caps in pattern.captures_iter(s) {
        let (Some(full_match), Some(var_name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let var_name = var_name.as_str();

        match env::var(var_name) {
            Ok(value) => {
                result = result.replace(full_match.as_str(), &value);
            }
            Err(_) => {
                return Err(BalancerError::ConfigError(format!(
                    "Environment variable '{}' not found\n  \
                     → Referenced in {}\n  \
                     → Set it with: export {}=\"your-value\"",
                    var_name, location, var_name
                )));
            }
        }
    }

    Ok(result)
}

/// Validate the configuration for consistency.
fn validate_config(config: &Config) -> BalancerResult<()> {
    if config.settings.timeout_secs == 0 {
        return Err(BalancerError::ConfigError(
            "settings.timeout_secs must be greater than 0".to_string(),
        ));
    }

    let mut backend_types = HashSet::new();
    for (idx, backend) in config.backends.iter().enumerate() {
        let provider_type = parse_type(&backend.provider_type, "backends", idx)?;
        if !backend_types.insert(provider_type) {
            return Err(BalancerError::ConfigError(format!(
                "Duplicate backend for provider type {} in backends[{}]",
                provider_type, idx
            )));
        }

        if let Some(ref endpoint) = backend.endpoint {
            Url::parse(endpoint).map_err(|e| BalancerError::ConfigError(format!(
                "Invalid endpoint '{}' in backends[{}]: {}",
                endpoint, idx, e
            )))?;
        }
    }

    // models are routed by name, so each one must belong to a single family
    let mut model_types: HashMap<&str, ProviderType> = HashMap::new();
    for (idx, node) in config.nodes.iter().enumerate() {
        let provider_type = parse_type(&node.provider_type, "nodes", idx)?;

        if let Some(existing) = model_types.insert(node.model.as_str(), provider_type) {
            if existing != provider_type {
                return Err(BalancerError::ConfigError(format!(
                    "Model '{}' in nodes[{}] is declared as {} but an earlier node declares it as {}\n  \
                     → A model name can only be served by one provider type",
                    node.model, idx, provider_type, existing
                )));
            }
        }

        if node.model.trim().is_empty() {
            return Err(BalancerError::ConfigError(format!(
                "nodes[{}].model must not be empty", idx
            )));
        }

        if !backend_types.contains(&provider_type) {
            return Err(BalancerError::ConfigError(format!(
                "Node '{}' uses provider type {} but no backend is configured for it\n  \
                 → Add a [[backends]] entry with type = \"{}\"",
                node.model, provider_type, node.provider_type
            )));
        }

        if node.weight == 0 {
            return Err(BalancerError::ConfigError(format!(
                "nodes[{}].weight must be at least 1", idx
            )));
        }

        if node.max_in_flight == Some(0) {
            return Err(BalancerError::ConfigError(format!(
                "nodes[{}].max_in_flight must be at least 1", idx
            )));
        }

        if node.system.is_some() && provider_type != ProviderType::Claude {
            return Err(BalancerError::ConfigError(format!(
                "nodes[{}].system is only supported for claude nodes\n  \
                 → Use a message with role = \"system\" instead",
                idx
            )));
        }

        if node.messages.iter().any(|m| !m.has_valid_role()) {
            return Err(BalancerError::ConfigError(format!(
                "nodes[{}] has a message with an empty role", idx
            )));
        }
    }

    Ok(())
}

fn parse_type(provider_type: &str, section: &str, idx: usize) -> BalancerResult<ProviderType> {
    ProviderType::parse(provider_type).map_err(|_| BalancerError::ConfigError(format!(
        "Unknown provider type '{}' in {}[{}]\n  \
         → Valid types: claude, anthropic, openai, gpt",
        provider_type, section, idx
    )))
}
