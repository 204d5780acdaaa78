use async_trait::async_trait;
use reqwest::Client;
use screener_core::{retry_with_backoff, RateLimiter, ScreenerError, TextGenerator};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-1.5-pro";
const RETRIES: u32 = 3;

/// Sentinel returned when no API key is configured. Downstream scoring
/// treats this as "no AI input" rather than an error.
pub const API_KEY_MISSING: &str = "API Key Missing";

/// Sentinel returned when the model answered but produced no usable text.
pub const NO_CONTENT: &str = "No content generated";

/// Sentinel returned when the vendor refused the prompt or the response.
pub const SAFETY_BLOCKED: &str = "Content blocked by safety filters";

/// Gemini text generation client.
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: String,
    client: Client,
    rate_limiter: RateLimiter,
}

impl GeminiClient {
    pub fn new(api_key: String, rate_limiter: RateLimiter) -> Self {
        let base_url =
            std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { base_url, model, api_key, client, rate_limiter }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default, rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct PromptFeedback {
    #[serde(default, rename = "blockReason")]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default, rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

/// Join the text parts of the first candidate. Anything empty collapses to
/// the no-content sentinel so callers always get a usable string.
fn extract_text(response: GenerateResponse) -> String {
    if let Some(feedback) = &response.prompt_feedback {
        if feedback.block_reason.is_some() {
            return SAFETY_BLOCKED.to_string();
        }
    }

    let candidate = response.candidates.into_iter().next();
    if let Some(candidate) = &candidate {
        if candidate.finish_reason.as_deref() == Some("SAFETY") {
            return SAFETY_BLOCKED.to_string();
        }
    }

    let text: String = candidate
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<String>>()
                .join("")
        })
        .unwrap_or_default();

    let trimmed = text.trim();
    if trimmed.is_empty() {
        NO_CONTENT.to_string()
    } else {
        trimmed.to_string()
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ScreenerError> {
        if !self.is_configured() {
            tracing::warn!("no Gemini API key configured, skipping generation");
            return Ok(API_KEY_MISSING.to_string());
        }

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = GenerateRequest {
            contents: vec![Content { parts: vec![Part { text: prompt }] }],
        };
        let url = &url;
        let body = &body;

        retry_with_backoff(RETRIES, Duration::from_secs(1), move || async move {
            self.rate_limiter.acquire().await;

            let response = self
                .client
                .post(url.as_str())
                .query(&[("key", self.api_key.as_str())])
                .json(&body)
                .send()
                .await
                .map_err(|e| ScreenerError::Generation(e.to_string()))?;

            let status = response.status();
            if status.as_u16() == 429 {
                return Err(ScreenerError::Generation("rate limited by vendor".to_string()));
            }
            if !status.is_success() {
                return Err(ScreenerError::Generation(format!("HTTP {} from {}", status, url)));
            }

            let parsed: GenerateResponse = response
                .json()
                .await
                .map_err(|e| ScreenerError::Generation(e.to_string()))?;

            Ok(extract_text(parsed))
        })
        .await
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}
