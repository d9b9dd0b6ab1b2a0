use reqwest::{header, Client};
use serde::{Serialize, Deserialize};

use crate::constants;
use crate::dispatch::http::Backend;
use crate::errors::{DispatchError, DownstreamResult};
use crate::providers::{roles, Message};

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<AnthropicMessage<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
}

#[derive(Deserialize)]
struct AnthropicContent {
    #[serde(default)]
    text: String,
    #[serde(rename = "type")]
    content_type: String,
}

fn build_headers(api_key: &str) -> DownstreamResult<header::HeaderMap> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        "x-api-key",
        header::HeaderValue::from_str(api_key)
            .map_err(|e| DispatchError::ConfigError(format!("Invalid API key format: {}", e)))?,
    );
    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    headers.insert(
        "anthropic-version",
        header::HeaderValue::from_static(constants::ANTHROPIC_API_VERSION),
    );
    Ok(headers)
}

/// Split system messages out of the list; the Messages API takes them as one top-level field
fn build_request<'a>(model: &'a str, messages: &'a [Message], max_tokens: u32) -> DownstreamResult<AnthropicRequest<'a>> {
    let mut system_parts = Vec::new();
    let mut turns = Vec::new();

    for msg in messages {
        if msg.role() == roles::SYSTEM {
            system_parts.push(msg.content());
        } else {
            turns.push(AnthropicMessage {
                role: msg.role(),
                content: msg.content(),
            });
        }
    }

    if turns.is_empty() {
        return Err(DispatchError::ApiError("Anthropic requires at least one non-system message".to_string()));
    }

    let system = if system_parts.is_empty() { None } else { Some(system_parts.join("\n\n")) };

    Ok(AnthropicRequest { model, system, messages: turns, max_tokens })
}

pub(crate) async fn send(
    client: &Client,
    backend: &Backend,
    model: &str,
    messages: &[Message],
    max_tokens: u32,
) -> DownstreamResult<String> {
    let headers = build_headers(&backend.api_key)?;
    let request = build_request(model, messages, max_tokens)?;
    let endpoint = backend.endpoint.as_deref().unwrap_or(constants::ANTHROPIC_API_ENDPOINT);

    let response = client
        .post(endpoint)
        .headers(headers)
        .json(&request)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(DispatchError::from_api_response(status, format!("Anthropic API error: {}", error_text)));
    }

    let anthropic_response: AnthropicResponse = response.json().await?;

    if anthropic_response.content.is_empty() {
        return Err(DispatchError::ApiError("No response from Anthropic".to_string()));
    }

    Ok(anthropic_response.content.iter()
        .filter(|c| c.content_type == "text")
        .map(|c| c.text.as_str())
        .collect::<Vec<&str>>()
        .join(""))
}
