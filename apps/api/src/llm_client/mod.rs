/// LLM Client — the single point of entry for all generation-endpoint calls
/// in CvScan.
///
/// ARCHITECTURAL RULE: No other module may call the Dashscope API directly.
/// All LLM interactions MUST go through this module.
///
/// Model: qwen-turbo (hardcoded — do not make configurable to prevent drift)
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

const DASHSCOPE_API_URL: &str =
    "https://dashscope.aliyuncs.com/api/v1/services/aigc/text-generation/generation";
/// The model used for all LLM calls in CvScan.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "qwen-turbo";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {code}: {message}")]
    Api { code: String, message: String },

    #[error("JSON decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("generation returned empty text")]
    EmptyGeneration,

    #[error("request failed after {retries} retries")]
    RetriesExhausted { retries: u32 },
}

/// One turn of prior conversation, sent along with the prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub role: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    parameters: GenerationParameters,
    input: GenerationInput<'a>,
}

// Always serialised as `{}` — the endpoint requires the key to be present.
#[derive(Debug, Serialize)]
struct GenerationParameters {}

#[derive(Debug, Serialize)]
struct GenerationInput<'a> {
    prompt: &'a str,
    history: &'a [HistoryTurn],
}

#[derive(Debug, Deserialize)]
pub struct GenerationResponse {
    pub output: GenerationOutput,
    #[serde(default)]
    pub usage: Usage,
    #[serde(default)]
    pub request_id: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerationOutput {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub finish_reason: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: String,
    message: String,
    #[serde(default)]
    request_id: String,
}

/// Seam between the orchestration pipeline and the real endpoint.
/// Tests drive the pipeline with a stub implementation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the generated text for one prompt, or an error.
    /// Usage counters and finish reason are dropped at this seam.
    async fn generate(&self, prompt: &str, history: &[HistoryTurn]) -> Result<String, LlmError>;
}

/// The single LLM client used by all handlers in CvScan.
/// Wraps the Dashscope text-generation API with a request timeout and
/// bounded retries on 429/5xx — both deliberate hardening over the
/// behavior observed upstream, which blocked forever and never retried.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    endpoint: String,
    max_retries: u32,
}

impl LlmClient {
    pub fn new(api_key: String, timeout: Duration, max_retries: u32) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            endpoint: DASHSCOPE_API_URL.to_string(),
            max_retries,
        }
    }

    /// Makes a raw call to the generation endpoint, returning the full
    /// response object. Retries on 429 (rate limit) and 5xx errors with
    /// exponential backoff.
    pub async fn call(
        &self,
        prompt: &str,
        history: &[HistoryTurn],
    ) -> Result<GenerationResponse, LlmError> {
        let request_body = GenerationRequest {
            model: MODEL,
            parameters: GenerationParameters {},
            input: GenerationInput { prompt, history },
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "generation attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&self.endpoint)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("generation endpoint returned {}: {}", status, body);
                last_error = Some(match serde_json::from_str::<ApiErrorBody>(&body) {
                    Ok(e) => LlmError::Api {
                        code: e.code,
                        message: e.message,
                    },
                    Err(_) => LlmError::Api {
                        code: status.as_u16().to_string(),
                        message: body,
                    },
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await?;
                // A rejection whose body does not decode is a decode error.
                let err: ApiErrorBody = serde_json::from_str(&body)?;
                debug!("generation rejected: request_id={}", err.request_id);
                return Err(LlmError::Api {
                    code: err.code,
                    message: err.message,
                });
            }

            let body = response.text().await?;
            let decoded: GenerationResponse = serde_json::from_str(&body)?;

            debug!(
                "generation ok: request_id={}, finish_reason={}, input_tokens={}, output_tokens={}",
                decoded.request_id,
                decoded.output.finish_reason,
                decoded.usage.input_tokens,
                decoded.usage.output_tokens
            );

            return Ok(decoded);
        }

        Err(last_error.unwrap_or(LlmError::RetriesExhausted {
            retries: self.max_retries,
        }))
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(&self, prompt: &str, history: &[HistoryTurn]) -> Result<String, LlmError> {
        let response = self.call(prompt, history).await?;

        // A 2xx with no text is still a failure for the caller.
        if response.output.text.is_empty() {
            return Err(LlmError::EmptyGeneration);
        }

        Ok(response.output.text)
    }
}
