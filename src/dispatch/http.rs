use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

use crate::config::Settings;
use crate::constants;
use crate::dispatch::{anthropic, openai, Dispatcher};
use crate::errors::{BalancerError, BalancerResult, DispatchError, DownstreamResult};
use crate::providers::{Message, ProviderType};

/// Credentials and endpoint for one backend family
#[derive(Clone)]
pub struct Backend {
    pub api_key: String,
    /// Overrides the family's default API endpoint
    pub endpoint: Option<String>,
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// `Dispatcher` that calls provider HTTP APIs.
///
/// Each model is mapped to a backend family when it is registered; the family
/// decides the wire format and credentials used to reach it.
#[derive(Debug)]
pub struct HttpDispatcher {
    client: Client,
    backends: HashMap<ProviderType, Backend>,
    models: HashMap<String, ProviderType>,
    max_tokens: u32,
}

impl HttpDispatcher {
    /// Create a dispatcher with the given request timeout
    pub fn new(timeout: Duration) -> BalancerResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BalancerError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            backends: HashMap::new(),
            models: HashMap::new(),
            max_tokens: constants::DEFAULT_MAX_TOKENS,
        })
    }

    /// Create a dispatcher from the `[settings]` section of a configuration
    pub fn from_settings(settings: &Settings) -> BalancerResult<Self> {
        let mut dispatcher = Self::new(Duration::from_secs(settings.timeout_secs))?;
        dispatcher.max_tokens = settings.max_tokens;
        Ok(dispatcher)
    }

    /// Set the credentials used for every model of `provider_type`
    pub fn add_backend(&mut self, provider_type: ProviderType, api_key: impl Into<String>, endpoint: Option<String>) {
        self.backends.insert(provider_type, Backend {
            api_key: api_key.into(),
            endpoint,
        });
    }

    /// Route `model` through the `provider_type` backend
    pub fn register_model(&mut self, model: impl Into<String>, provider_type: ProviderType) {
        self.models.insert(model.into(), provider_type);
    }

    /// Default `max_tokens` for APIs that require one
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn route(&self, model: &str) -> DownstreamResult<(ProviderType, &Backend)> {
        let provider_type = *self.models
            .get(model)
            .ok_or_else(|| DispatchError::UnknownModel(model.to_string()))?;
        let backend = self.backends.get(&provider_type).ok_or_else(|| {
            DispatchError::ConfigError(format!("No backend configured for provider type {}", provider_type))
        })?;
        Ok((provider_type, backend))
    }
}

#[async_trait]
impl Dispatcher for HttpDispatcher {
    async fn send(&self, model: &str, messages: &[Message]) -> DownstreamResult<String> {
        let (provider_type, backend) = self.route(model)?;
        debug!("Sending {} message(s) to {} model {}", messages.len(), provider_type, model);

        match provider_type {
            ProviderType::Claude => anthropic::send(&self.client, backend, model, messages, self.max_tokens).await,
            ProviderType::OpenAI => openai::send(&self.client, backend, model, messages).await,
        }
    }
}
