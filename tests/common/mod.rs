//! Mock dispatchers shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

use llm_balancer::{
    Balancer, ClaudeProvider, DispatchError, Dispatcher, DownstreamResult, Message, OpenAIProvider,
};

/// Answers with the model name and remembers every call
#[derive(Default)]
pub struct EchoDispatcher {
    pub calls: Mutex<Vec<(String, Vec<Message>)>>,
}

impl EchoDispatcher {
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_call(&self) -> Option<(String, Vec<Message>)> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Dispatcher for EchoDispatcher {
    async fn send(&self, model: &str, messages: &[Message]) -> DownstreamResult<String> {
        self.calls.lock().unwrap().push((model.to_string(), messages.to_vec()));
        Ok(format!("reply from {}", model))
    }
}

/// Always fails with an API error
#[derive(Default)]
pub struct FailingDispatcher {
    pub calls: AtomicUsize,
}

#[async_trait]
impl Dispatcher for FailingDispatcher {
    async fn send(&self, model: &str, _messages: &[Message]) -> DownstreamResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(DispatchError::ApiError(format!("{} is down", model)))
    }
}

/// Fails every other call
#[derive(Default)]
pub struct FlakyDispatcher {
    calls: AtomicUsize,
}

#[async_trait]
impl Dispatcher for FlakyDispatcher {
    async fn send(&self, model: &str, _messages: &[Message]) -> DownstreamResult<String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n % 2 == 0 {
            Ok(model.to_string())
        } else {
            Err(DispatchError::RateLimit("slow down".to_string()))
        }
    }
}

/// Blocks every call until a permit is released through `open`
pub struct GatedDispatcher {
    gate: Semaphore,
}

impl GatedDispatcher {
    pub fn new() -> Self {
        Self { gate: Semaphore::new(0) }
    }

    pub fn open(&self, permits: usize) {
        self.gate.add_permits(permits);
    }
}

#[async_trait]
impl Dispatcher for GatedDispatcher {
    async fn send(&self, model: &str, _messages: &[Message]) -> DownstreamResult<String> {
        let permit = self.gate.acquire().await
            .map_err(|e| DispatchError::ApiError(e.to_string()))?;
        permit.forget();
        Ok(model.to_string())
    }
}

/// Never completes
pub struct PendingDispatcher;

#[async_trait]
impl Dispatcher for PendingDispatcher {
    async fn send(&self, _model: &str, _messages: &[Message]) -> DownstreamResult<String> {
        futures::future::pending::<()>().await;
        unreachable!()
    }
}

pub fn claude(model: &str) -> ClaudeProvider {
    ClaudeProvider::new(model, Some("You are a helpful assistant.".to_string()), vec![Message::user("Hello from Claude!")]).unwrap()
}

pub fn openai(model: &str) -> OpenAIProvider {
    OpenAIProvider::new(model, vec![
        Message::system("You are a helpful assistant."),
        Message::user("Hello from OpenAI!"),
    ]).unwrap()
}

/// Balancer with `count` OpenAI nodes named model-0, model-1, ...
pub fn balancer_with_nodes(dispatcher: Arc<dyn Dispatcher>, count: usize) -> Balancer {
    let mut builder = Balancer::builder().dispatcher(dispatcher);
    for i in 0..count {
        builder = builder.add_node(openai(&format!("model-{}", i)));
    }
    builder.build().unwrap()
}

/// Total in-flight requests across all nodes
pub fn total_in_flight(balancer: &Balancer) -> usize {
    balancer.list_nodes().iter().map(|node| node.in_flight).sum()
}
