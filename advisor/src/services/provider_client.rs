//! HTTP client for the supported text-generation providers

use std::time::{Duration, Instant};
use async_trait::async_trait;
use serde_json::Value;

use shared::{ApiFailure, ProviderId};
use crate::error::{AdvisorError, AdvisorResult};
use crate::traits::TextGenerator;
use crate::types::{GenerationRequest, ProviderResponse};

/// Per-request transport timeout; the advisor enforces the overall bound
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Real provider client talking to OpenAI, Anthropic or Gemini over HTTPS
pub struct RealProviderClient {
    provider: ProviderId,
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl RealProviderClient {
    /// Create a client for `provider` using its public endpoint
    pub fn new(provider: ProviderId, api_key: impl Into<String>) -> AdvisorResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AdvisorError::MissingApiKey { provider });
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AdvisorError::ConfigError {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            provider,
            api_key: api_key.trim().to_string(),
            base_url: Self::default_base_url(provider).to_string(),
            client,
        })
    }

    /// Point the client at a gateway or mock server instead of the public endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn default_base_url(provider: ProviderId) -> &'static str {
        match provider {
            ProviderId::OpenAI => "https://api.openai.com",
            ProviderId::Anthropic => "https://api.anthropic.com",
            ProviderId::Gemini => "https://generativelanguage.googleapis.com",
        }
    }

    /// Map an unsuccessful HTTP status to a failure class
    pub fn classify_status(status: u16) -> ApiFailure {
        match status {
            401 | 403 => ApiFailure::InvalidApiKey,
            429 => ApiFailure::RateLimitExceeded,
            503 | 529 => ApiFailure::ModelUnavailable,
            400 | 404 | 422 => ApiFailure::InvalidRequest(format!("HTTP {status}")),
            _ => ApiFailure::InternalError(format!("HTTP {status}")),
        }
    }

    fn classify_transport(error: reqwest::Error) -> ApiFailure {
        if error.is_timeout() || error.is_connect() {
            ApiFailure::NetworkTimeout
        } else {
            ApiFailure::InvalidRequest(error.to_string())
        }
    }

    /// Post `body` and return the decoded JSON reply
    async fn post_json(&self, request: reqwest::RequestBuilder, body: &Value) -> Result<Value, ApiFailure> {
        let response = request
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(Self::classify_transport)?;

        if !response.status().is_success() {
            return Err(Self::classify_status(response.status().as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ApiFailure::InvalidRequest(format!("Failed to parse response: {e}")))
    }

    async fn request_openai(&self, request: &GenerationRequest) -> Result<ProviderResponse, ApiFailure> {
        let started = Instant::now();
        let body = serde_json::json!({
            "model": request.model,
            "messages": [{ "role": "user", "content": request.prompt }],
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
            "response_format": { "type": "json_object" }
        });

        let builder = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key);
        let json = self.post_json(builder, &body).await?;

        let content = json
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .ok_or_else(|| ApiFailure::InvalidRequest("No content in response".to_string()))?;

        Ok(ProviderResponse {
            content: content.to_string(),
            prompt_tokens: token_count(&json, "/usage/prompt_tokens"),
            completion_tokens: token_count(&json, "/usage/completion_tokens"),
            model_used: request.model.clone(),
            response_time: started.elapsed(),
        })
    }

    async fn request_anthropic(&self, request: &GenerationRequest) -> Result<ProviderResponse, ApiFailure> {
        let started = Instant::now();
        let body = serde_json::json!({
            "model": request.model,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
            "messages": [{ "role": "user", "content": request.prompt }]
        });

        let builder = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01");
        let json = self.post_json(builder, &body).await?;

        let content = json
            .pointer("/content/0/text")
            .and_then(Value::as_str)
            .ok_or_else(|| ApiFailure::InvalidRequest("No content in response".to_string()))?;

        Ok(ProviderResponse {
            content: content.to_string(),
            prompt_tokens: token_count(&json, "/usage/input_tokens"),
            completion_tokens: token_count(&json, "/usage/output_tokens"),
            model_used: request.model.clone(),
            response_time: started.elapsed(),
        })
    }

    async fn request_gemini(&self, request: &GenerationRequest) -> Result<ProviderResponse, ApiFailure> {
        let started = Instant::now();
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": request.prompt }] }],
            "generationConfig": {
                "maxOutputTokens": request.max_tokens,
                "temperature": request.temperature,
                "responseMimeType": "application/json"
            }
        });

        let builder = self
            .client
            .post(format!("{}/v1beta/models/{}:generateContent", self.base_url, request.model))
            .header("x-goog-api-key", &self.api_key);
        let json = self.post_json(builder, &body).await?;

        let content = json
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .ok_or_else(|| ApiFailure::InvalidRequest("No content in response".to_string()))?;

        // Gemini doesn't always report token counts
        Ok(ProviderResponse {
            content: content.to_string(),
            prompt_tokens: token_count(&json, "/usageMetadata/promptTokenCount"),
            completion_tokens: token_count(&json, "/usageMetadata/candidatesTokenCount"),
            model_used: request.model.clone(),
            response_time: started.elapsed(),
        })
    }
}

/// Reported token count, saturating when a provider reports more than fits
fn token_count(json: &Value, pointer: &str) -> u32 {
    json.pointer(pointer)
        .and_then(Value::as_u64)
        .map(|count| u32::try_from(count).unwrap_or(u32::MAX))
        .unwrap_or(0)
}

#[async_trait]
impl TextGenerator for RealProviderClient {
    fn provider(&self) -> ProviderId {
        self.provider
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<ProviderResponse, ApiFailure> {
        match self.provider {
            ProviderId::OpenAI => self.request_openai(request).await,
            ProviderId::Anthropic => self.request_anthropic(request).await,
            ProviderId::Gemini => self.request_gemini(request).await,
        }
    }
}
