use std::borrow::Cow;
use std::fmt::Debug;
use std::sync::Arc;

use crate::errors::{BalancerError, BalancerResult};
use crate::providers::claude::ClaudeProvider;
use crate::providers::openai::OpenAIProvider;
use crate::providers::types::{Message, ProviderType};

/// Common capability shared by every backend family.
///
/// A provider is pure data: it describes which model a node talks to and the
/// messages it contributes to every request. Implementations must not perform
/// I/O; the actual network call belongs to a `Dispatcher`.
///
/// New backend families only need to implement this trait; the balancer never
/// matches on concrete provider types.
pub trait Provider: Debug + Send + Sync {
    /// Model identifier this provider targets. Never empty.
    fn get_model(&self) -> &str;
    /// Messages in the order they were constructed
    fn get_messages(&self) -> Cow<'_, [Message]>;
    /// Backend family of this provider
    fn provider_type(&self) -> ProviderType;
}

/// Rejects an empty model identifier or an empty message role
pub(crate) fn validate_provider_fields(model: &str, messages: &[Message]) -> BalancerResult<()> {
    if model.trim().is_empty() {
        return Err(BalancerError::ConfigError(
            "Provider model identifier must not be empty".to_string(),
        ));
    }
    if let Some(message) = messages.iter().find(|m| !m.has_valid_role()) {
        return Err(BalancerError::ConfigError(format!(
            "Message role must not be empty for model '{}' (content: {:?})",
            model, message.content()
        )));
    }
    Ok(())
}

/// Factory function to create a provider based on type
///
/// # Parameters
/// * `provider_type` - Which backend family to create
/// * `model` - Model identifier
/// * `messages` - Messages in order; for Claude a leading `system` message is
///   lifted into the native top-level system prompt
///
/// # Returns
/// * Arc-wrapped trait object implementing Provider
pub fn create_provider(
    provider_type: ProviderType,
    model: impl Into<String>,
    messages: Vec<Message>,
) -> BalancerResult<Arc<dyn Provider>> {
    let model = model.into();
    match provider_type {
        ProviderType::Claude => Ok(Arc::new(ClaudeProvider::from_messages(model, messages)?)),
        ProviderType::OpenAI => Ok(Arc::new(OpenAIProvider::new(model, messages)?)),
    }
}
