use std::borrow::Cow;

use crate::errors::BalancerResult;
use crate::providers::provider::{Provider, validate_provider_fields};
use crate::providers::types::{roles, Message, ProviderType};

/// Claude-style request shape (Anthropic Messages API).
///
/// The system prompt lives in its own top-level field instead of the message
/// list; `get_messages` re-exposes it as a leading `system` message.
#[derive(Debug, Clone)]
pub struct ClaudeProvider {
    model: String,
    system: Option<String>,
    messages: Vec<Message>,
}

impl ClaudeProvider {
    /// Creates a new Claude provider
    ///
    /// # Parameters
    /// * `model` - Model identifier (e.g. "claude-v1")
    /// * `system` - Optional top-level system prompt
    /// * `messages` - Conversation turns in order
    pub fn new(model: impl Into<String>, system: Option<String>, messages: Vec<Message>) -> BalancerResult<Self> {
        let model = model.into();
        validate_provider_fields(&model, &messages)?;
        Ok(Self { model, system, messages })
    }

    /// Builds the native shape from a flat message list, lifting a leading
    /// `system` message into the top-level system prompt
    pub fn from_messages(model: impl Into<String>, mut messages: Vec<Message>) -> BalancerResult<Self> {
        let system = match messages.first() {
            Some(first) if first.role() == roles::SYSTEM => Some(messages.remove(0).content().to_string()),
            _ => None,
        };
        Self::new(model, system, messages)
    }

    pub fn system(&self) -> Option<&str> {
        self.system.as_deref()
    }

    /// Conversation turns without the system prompt
    pub fn turns(&self) -> &[Message] {
        &self.messages
    }
}

impl Provider for ClaudeProvider {
    fn get_model(&self) -> &str {
        &self.model
    }

    fn get_messages(&self) -> Cow<'_, [Message]> {
        match &self.system {
            Some(system) => {
                let mut all = Vec::with_capacity(self.messages.len() + 1);
                all.push(Message::system(system.clone()));
                all.extend(self.messages.iter().cloned());
                Cow::Owned(all)
            }
            None => Cow::Borrowed(&self.messages),
        }
    }

    fn provider_type(&self) -> ProviderType {
        ProviderType::Claude
    }
}
