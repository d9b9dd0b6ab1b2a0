//! Downstream transport.
//!
//! The balancer hands the selected node's model and messages to a
//! [`Dispatcher`]; it never talks to a provider API itself. `HttpDispatcher`
//! is the bundled implementation speaking the Anthropic Messages and OpenAI
//! Chat Completions wire formats.

mod anthropic;
mod openai;
pub mod http;

pub use http::{Backend, HttpDispatcher};

use async_trait::async_trait;

use crate::errors::DownstreamResult;
use crate::providers::Message;

/// Performs the network call for a selected node.
///
/// Must be safe to call concurrently for different nodes.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Send `messages` to `model` and return the response text
    async fn send(&self, model: &str, messages: &[Message]) -> DownstreamResult<String>;
}
