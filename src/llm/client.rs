use super::types::*;
use crate::{Error, Result, config::LlmConfig};
use async_trait::async_trait;
use reqwest::{Client, header::CONTENT_TYPE};
use std::time::Duration;
use tracing::{debug, error};

/// The one outbound operation the oracle needs: prompt in, generated text out.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(&self, prompt: &GenerationPrompt) -> Result<String>;
}

pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("fortune-teller/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: &LlmConfig, client: Client) -> Self {
        let model = config
            .model
            .strip_prefix("models/")
            .unwrap_or(&config.model)
            .to_string();

        Self {
            client,
            api_key: config.api_key.clone(),
            model,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

/// Pulls the upstream message out of an error body, falling back to the raw text.
pub(crate) fn upstream_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(ApiErrorBody {
            error: ApiErrorDetail {
                message: Some(message),
                ..
            },
        }) if !message.is_empty() => message,
        _ if body.trim().is_empty() => "empty error body".to_string(),
        _ => body.to_string(),
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(&self, prompt: &GenerationPrompt) -> Result<String> {
        let request = prompt.to_request();

        debug!(
            model = %self.model,
            turns = request.contents.len(),
            has_image = prompt.attachment.is_some(),
            max_output_tokens = prompt.params.max_output_tokens,
            "Sending generateContent request"
        );

        let body = serde_json::to_vec(&request)?;

        let response = self
            .client
            .post(self.endpoint())
            .timeout(self.timeout)
            .header("x-goog-api-key", &self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                let message = if e.is_timeout() {
                    format!("request timed out after {}s", self.timeout.as_secs())
                } else {
                    format!("transport failure: {e}")
                };
                error!("Failed to reach generative API: {}", message);
                Error::upstream(None, message)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read generative API response body: {}", e);
            Error::upstream(Some(status.as_u16()), format!("failed to read body: {e}"))
        })?;

        if !status.is_success() {
            let message = upstream_error_message(&body);
            error!(
                status = status.as_u16(),
                "Generative API returned an error: {}", message
            );
            return Err(Error::upstream(Some(status.as_u16()), message));
        }

        let parsed: GenerateContentResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(e) => {
                error!("Undecodable generative API response: {}", e);
                return Err(Error::EmptyResponse);
            }
        };

        debug!(
            "Received generateContent response with {} candidates",
            parsed.candidates.len()
        );

        parsed.first_text().map(str::to_string).ok_or_else(|| {
            error!("Generative API response contained no text: {}", body);
            Error::EmptyResponse
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn create_test_config() -> LlmConfig {
        LlmConfig {
            base_url: "https://generativelanguage.googleapis.com/".to_string(),
            api_key: "test-api-key".to_string(),
            model: "models/gemini-1.5-flash".to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_client_strips_model_prefix() {
        let client = GeminiClient::new(&create_test_config()).unwrap();
        assert_eq!(client.model(), "gemini-1.5-flash");
    }

    #[test]
    fn test_endpoint_has_no_double_slash_or_key() {
        let client = GeminiClient::new(&create_test_config()).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
        assert!(!client.endpoint().contains("test-api-key"));
    }

    #[test]
    fn test_error_message_from_structured_body() {
        let body = r#"{"error": {"code": 429, "message": "quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(upstream_error_message(body), "quota exceeded");
    }

    #[test]
    fn test_error_message_falls_back_to_raw_body() {
        assert_eq!(upstream_error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(
            upstream_error_message(r#"{"error": {"code": 500}}"#),
            r#"{"error": {"code": 500}}"#
        );
        assert_eq!(upstream_error_message(""), "empty error body");
    }
}
