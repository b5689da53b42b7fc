//! Replicate API client for streaming Llama 2 text generation.
//!
//! Predictions are created with `stream: true`, then the server-sent-events
//! URL the API hands back is followed until a `done` event arrives.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BlogGenError;
use crate::generation::{
    create_sse_stream, FragmentStream, GenerationParams, GenerationProvider, SseVerdict,
    MIN_NEW_TOKENS_DISABLED,
};
use crate::models::ModelVariant;

/// Default base URL for the Replicate REST API.
pub const DEFAULT_BASE_URL: &str = "https://api.replicate.com/v1";

/// Configuration for the Replicate client.
#[derive(Debug)]
pub struct ReplicateConfig {
    /// API token for authentication with Replicate.
    pub api_token: SecretString,
    /// Model variant predictions are created against.
    pub model: ModelVariant,
    /// Sampling parameters sent with every prediction.
    pub params: GenerationParams,
    /// Base URL for API requests.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_seconds: Option<u64>,
}

/// Client for interacting with Replicate's predictions API.
///
/// The client uses `Arc` internally for configuration, making cloning cheap.
#[derive(Debug, Clone)]
pub struct Replicate {
    /// Shared configuration wrapped in Arc for cheap cloning.
    pub config: Arc<ReplicateConfig>,
    /// HTTP client for making requests.
    pub client: Client,
}

#[derive(Serialize)]
struct PredictionRequest<'a> {
    version: &'a str,
    input: PredictionInput<'a>,
    stream: bool,
}

#[derive(Serialize)]
struct PredictionInput<'a> {
    prompt: &'a str,
    temperature: f32,
    top_p: f32,
    max_length: u32,
    min_new_tokens: i64,
}

#[derive(Deserialize, Debug)]
struct Prediction {
    id: String,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    urls: Option<PredictionUrls>,
}

#[derive(Deserialize, Debug)]
struct PredictionUrls {
    #[serde(default)]
    stream: Option<String>,
}

impl Replicate {
    pub fn new(
        api_token: impl Into<String>,
        model: ModelVariant,
        params: GenerationParams,
        base_url: Option<String>,
        timeout_seconds: Option<u64>,
    ) -> Self {
        let mut builder = Client::builder();
        if let Some(sec) = timeout_seconds {
            builder = builder.timeout(Duration::from_secs(sec));
        }
        Self::with_client(
            builder.build().expect("Failed to build reqwest Client"),
            api_token,
            model,
            params,
            base_url,
            timeout_seconds,
        )
    }

    /// Creates a new Replicate client with a custom HTTP client.
    pub fn with_client(
        client: Client,
        api_token: impl Into<String>,
        model: ModelVariant,
        params: GenerationParams,
        base_url: Option<String>,
        timeout_seconds: Option<u64>,
    ) -> Self {
        Self {
            config: Arc::new(ReplicateConfig {
                api_token: SecretString::new(api_token.into()),
                model,
                params,
                base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                timeout_seconds,
            }),
            client,
        }
    }

    pub fn model(&self) -> ModelVariant {
        self.config.model
    }

    pub fn params(&self) -> GenerationParams {
        self.config.params
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn timeout_seconds(&self) -> Option<u64> {
        self.config.timeout_seconds
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    fn predictions_url(&self) -> String {
        format!("{}/predictions", self.config.base_url.trim_end_matches('/'))
    }

    fn apply_timeout(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.config.timeout_seconds {
            Some(timeout) => request.timeout(Duration::from_secs(timeout)),
            None => request,
        }
    }

    fn log_request_payload<T: Serialize>(&self, label: &str, body: &T) {
        if !log::log_enabled!(log::Level::Trace) {
            return;
        }
        if let Ok(json) = serde_json::to_string(body) {
            log::trace!("{label}: {json}");
        }
    }

    async fn create_prediction(&self, prompt: &str) -> Result<Prediction, BlogGenError> {
        let params = self.config.params;
        let body = PredictionRequest {
            version: self.config.model.version_id(),
            input: PredictionInput {
                prompt,
                temperature: params.temperature(),
                top_p: params.top_p(),
                max_length: params.max_length(),
                min_new_tokens: MIN_NEW_TOKENS_DISABLED,
            },
            stream: true,
        };
        self.log_request_payload("Replicate prediction request", &body);

        let mut request = self
            .client
            .post(self.predictions_url())
            .bearer_auth(self.config.api_token.expose_secret())
            .json(&body);
        request = self.apply_timeout(request);

        let response = request.send().await?;
        let response = self
            .ensure_success_response(response, "Replicate predictions API")
            .await?;
        let resp_text = response.text().await?;
        let prediction: Prediction =
            serde_json::from_str(&resp_text).map_err(|e| BlogGenError::ResponseFormatError {
                message: format!("Failed to decode Replicate prediction response: {e}"),
                raw_response: resp_text,
            })?;

        if let Some(error) = &prediction.error {
            if !error.is_null() {
                return Err(BlogGenError::ProviderError(render_provider_error(error)));
            }
        }
        Ok(prediction)
    }

    async fn open_event_stream(&self, url: &str) -> Result<reqwest::Response, BlogGenError> {
        let mut request = self
            .client
            .get(url)
            .bearer_auth(self.config.api_token.expose_secret())
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .header(reqwest::header::CACHE_CONTROL, "no-store");
        request = self.apply_timeout(request);

        let response = request.send().await?;
        self.ensure_success_response(response, "Replicate event stream")
            .await
    }

    async fn ensure_success_response(
        &self,
        response: reqwest::Response,
        context: &str,
    ) -> Result<reqwest::Response, BlogGenError> {
        log::debug!("{context} HTTP status: {}", response.status());
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let error_text = response.text().await?;
        Err(BlogGenError::ResponseFormatError {
            message: format!("{context} returned error status: {status}"),
            raw_response: error_text,
        })
    }
}

#[async_trait]
impl GenerationProvider for Replicate {
    async fn generate_stream(&self, prompt: &str) -> Result<FragmentStream, BlogGenError> {
        if self.config.api_token.expose_secret().is_empty() {
            return Err(BlogGenError::AuthError(
                "Missing Replicate API token".to_string(),
            ));
        }

        let prediction = self.create_prediction(prompt).await?;
        let stream_url = prediction
            .urls
            .as_ref()
            .and_then(|urls| urls.stream.clone())
            .ok_or_else(|| BlogGenError::ResponseFormatError {
                message: "Replicate prediction carries no stream URL".to_string(),
                raw_response: format!("{prediction:?}"),
            })?;
        log::debug!(
            "Replicate prediction {} streaming from {stream_url}",
            prediction.id
        );

        let response = self.open_event_stream(&stream_url).await?;
        Ok(create_sse_stream(response, parse_stream_event))
    }
}

/// Parses one SSE event block from Replicate's stream endpoint.
///
/// `output` events carry text fragments, `error` events abort the call and
/// `done` closes the stream. Unnamed events and comments are ignored.
fn parse_stream_event(event: &str) -> Result<SseVerdict, BlogGenError> {
    let mut name = None;
    let mut data: Vec<&str> = Vec::new();

    for line in event.lines() {
        if line.starts_with(':') {
            continue;
        }
        if let Some(value) = line.strip_prefix("event:") {
            name = Some(value.trim());
        } else if let Some(value) = line.strip_prefix("data:") {
            data.push(value.strip_prefix(' ').unwrap_or(value));
        }
    }

    match name {
        Some("output") => Ok(SseVerdict::Fragment(data.join("\n"))),
        Some("error") => Err(BlogGenError::ProviderError(stream_error_detail(
            &data.join("\n"),
        ))),
        Some("done") => Ok(SseVerdict::Done),
        _ => Ok(SseVerdict::Ignore),
    }
}

fn stream_error_detail(raw: &str) -> String {
    serde_json::from_str::<Value>(raw)
        .ok()
        .and_then(|value| {
            value
                .get("detail")
                .and_then(|detail| detail.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| raw.to_string())
}

fn render_provider_error(error: &Value) -> String {
    match error.as_str() {
        Some(text) => text.to_string(),
        None => error.to_string(),
    }
}

#[cfg(test)]
#[path = "replicate_tests.rs"]
mod tests;
