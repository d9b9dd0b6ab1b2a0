use std::borrow::Cow;

use crate::errors::BalancerResult;
use crate::providers::provider::{Provider, validate_provider_fields};
use crate::providers::types::{Message, ProviderType};

/// OpenAI-style request shape (Chat Completions API).
/// System prompts are ordinary entries of the message list.
#[derive(Debug, Clone)]
pub struct OpenAIProvider {
    model: String,
    messages: Vec<Message>,
}

impl OpenAIProvider {
    /// Creates a new OpenAI provider
    ///
    /// # Parameters
    /// * `model` - Model identifier (e.g. "gpt-3.5-turbo")
    /// * `messages` - Messages in order, system prompt included
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> BalancerResult<Self> {
        let model = model.into();
        validate_provider_fields(&model, &messages)?;
        Ok(Self { model, messages })
    }
}

impl Provider for OpenAIProvider {
    fn get_model(&self) -> &str {
        &self.model
    }

    fn get_messages(&self) -> Cow<'_, [Message]> {
        Cow::Borrowed(&self.messages)
    }

    fn provider_type(&self) -> ProviderType {
        ProviderType::OpenAI
    }
}
