use serde::{Serialize, Deserialize};

use crate::errors::{BalancerError, BalancerResult};

/// Well-known message roles. The set is open: any other role is passed through untouched.
pub mod roles {
    pub const SYSTEM: &str = "system";
    pub const USER: &str = "user";
    pub const ASSISTANT: &str = "assistant";
}

/// Backend families the balancer knows how to represent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProviderType {
    Claude,
    OpenAI,
}

/// A single role/content pair of a request payload.
///
/// Fields are private so a message cannot be changed once built.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Message {
    role: String,
    content: String,
}

impl Message {
    /// Creates a message with an arbitrary role
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(roles::SYSTEM, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(roles::USER, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(roles::ASSISTANT, content)
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Roles may be anything except blank
    pub fn has_valid_role(&self) -> bool {
        !self.role.trim().is_empty()
    }
}

impl ProviderType {
    /// Parse a provider type name, accepting common aliases case-insensitively
    pub fn parse(s: &str) -> BalancerResult<Self> {
        match s.to_lowercase().as_str() {
            "claude" | "anthropic" => Ok(ProviderType::Claude),
            "openai" | "gpt" => Ok(ProviderType::OpenAI),
            _ => Err(BalancerError::ConfigError(format!(
                "Unknown provider type '{}'\n  \
                 → Valid types: claude, anthropic, openai, gpt",
                s
            ))),
        }
    }
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderType::Claude => write!(f, "Claude"),
            ProviderType::OpenAI => write!(f, "OpenAI"),
        }
    }
}

impl From<&str> for ProviderType {
    fn from(s: &str) -> Self {
        match ProviderType::parse(s) {
            Ok(provider_type) => provider_type,
            Err(_) => panic!("Unknown provider type: {}", s),
        }
    }
}
