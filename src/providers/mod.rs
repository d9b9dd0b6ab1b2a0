//! Module for the provider abstraction
//!
//! This module contains the capability shared by every backend family
//! and its implementations:
//! - Claude (Anthropic Messages request shape)
//! - OpenAI (Chat Completions request shape)
//!
//! Providers are plain data. They never talk to the network themselves.

pub mod claude;
pub mod openai;
pub mod types;
pub mod provider;

pub use types::{ProviderType, Message, roles};
pub use provider::{Provider, create_provider};
pub use claude::ClaudeProvider;
pub use openai::OpenAIProvider;
