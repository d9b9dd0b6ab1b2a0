use reqwest::{header, Client};
use serde::{Serialize, Deserialize};

use crate::constants;
use crate::dispatch::http::Backend;
use crate::errors::{DispatchError, DownstreamResult};
use crate::providers::Message;

/// Request structure for OpenAI's chat completion API
#[derive(Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
}

/// Response structure from OpenAI's chat completion API
#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

#[derive(Deserialize)]
struct OpenAIMessage {
    #[serde(default)]
    content: Option<String>,
}

fn build_headers(api_key: &str) -> DownstreamResult<header::HeaderMap> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|e| DispatchError::ConfigError(format!("Invalid API key format: {}", e)))?,
    );
    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    Ok(headers)
}

pub(crate) async fn send(
    client: &Client,
    backend: &Backend,
    model: &str,
    messages: &[Message],
) -> DownstreamResult<String> {
    let headers = build_headers(&backend.api_key)?;
    let endpoint = backend.endpoint.as_deref().unwrap_or(constants::OPENAI_API_ENDPOINT);

    let response = client
        .post(endpoint)
        .headers(headers)
        .json(&OpenAIRequest { model, messages })
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(DispatchError::from_api_response(status, format!("OpenAI API error: {}", error_text)));
    }

    let openai_response: OpenAIResponse = response.json().await?;

    openai_response.choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.unwrap_or_default())
        .ok_or_else(|| DispatchError::ApiError("No response from OpenAI".to_string()))
}
