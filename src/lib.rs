//! llm-balancer routes inference requests across heterogeneous LLM provider backends.
//!
//! Providers of different families (Claude-style, OpenAI-style) are represented
//! through one capability, wrapped in nodes carrying load state, and selected by
//! a weighted least-connections policy with round-robin tie-breaking.
//!
//! # Features
//!
//! - **Uniform providers**: Claude and OpenAI request shapes behind one `Provider` trait
//! - **Least-connections balancing**: deterministic, testable selection with round-robin ties
//! - **Concurrency safe**: shared `Balancer` with guaranteed slot release, even on cancellation
//! - **Pluggable transport**: any `Dispatcher` implementation, with an HTTP one bundled
//! - **Metrics**: optional in-flight gauges, dispatch counters and latency histograms
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use llm_balancer::{Balancer, ClaudeProvider, HttpDispatcher, Message, OpenAIProvider, ProviderType};
//!
//! async fn example() {
//!     let mut dispatcher = HttpDispatcher::new(Duration::from_secs(60)).unwrap();
//!     dispatcher.add_backend(ProviderType::Claude, "anthropic-key", None);
//!     dispatcher.add_backend(ProviderType::OpenAI, "openai-key", None);
//!     dispatcher.register_model("claude-v1", ProviderType::Claude);
//!     dispatcher.register_model("gpt-3.5-turbo", ProviderType::OpenAI);
//!
//!     let balancer = Balancer::builder()
//!         .dispatcher(Arc::new(dispatcher))
//!         .add_node(ClaudeProvider::new("claude-v1", Some("You are a helpful assistant.".into()), vec![]).unwrap())
//!         .add_node(OpenAIProvider::new("gpt-3.5-turbo", vec![Message::system("You are a helpful assistant.")]).unwrap())
//!         .build()
//!         .expect("Failed to build balancer");
//!
//!     let result = balancer
//!         .dispatch(&[Message::user("Explain Rust in one paragraph")], None)
//!         .await
//!         .unwrap();
//!     println!("{}: {}", result.model, result.content);
//! }
//! ```

pub mod providers;
pub mod errors;
pub mod constants;
pub mod load_balancer;
pub mod dispatch;
pub mod config;

#[cfg(feature = "metrics")]
pub mod metrics;

pub use providers::{
    ProviderType,
    Message,
    Provider,
    create_provider,
    ClaudeProvider,
    OpenAIProvider,
};

pub use errors::{BalancerError, BalancerResult, DispatchError, DownstreamResult};

pub use load_balancer::{
    Balancer,
    BalancerBuilder,
    DispatchRequest,
    DispatchResult,
    NodeId,
    NodeInfo,
    NodeLease,
    NodeOptions,
    NodeState,
};

pub use dispatch::{Dispatcher, HttpDispatcher};

#[cfg(feature = "metrics")]
pub use metrics::describe_metrics;

/// Initialize the logging system
///
/// This should be called at the start of your application in case
/// you want to activate the library's debug and info logging.
pub fn use_logging() {
    env_logger::init();
}
