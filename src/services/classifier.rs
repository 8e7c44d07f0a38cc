use crate::core::matcher::Classifier;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Failure modes of the classifier round-trip
///
/// `Unavailable` covers transport failures, timeouts and non-2xx responses
/// and signals an infrastructure incident. `EmptyResponse` means the service
/// answered but produced no usable content, which is a data problem and is
/// never retried.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier service unreachable: {0}")]
    Unavailable(String),

    #[error("classifier returned an empty completion")]
    EmptyResponse,
}

// OpenAI-compatible chat-completions wire shape
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: Option<String>,
}

/// Client for the external text-completion classifier
///
/// One chat-completions request per invocation. Credentials and endpoint are
/// injected at construction from the configuration object; nothing is read
/// from ambient state inside the pipeline.
pub struct ClassifierClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_retries: u32,
}

impl ClassifierClient {
    /// Create a new classifier client.
    ///
    /// `timeout_secs` bounds the whole round-trip; exceeding it surfaces as
    /// `Unavailable`.
    pub fn new(
        base_url: String,
        api_key: String,
        model: String,
        timeout_secs: u64,
        max_retries: u32,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url,
            api_key,
            model,
            max_retries,
        }
    }

    /// Run one completion, retrying transient failures with backoff.
    ///
    /// Transport errors and 5xx responses are retried up to `max_retries`
    /// times; 4xx responses and empty completions fail fast.
    pub async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, ClassifierError> {
        let url = format!(
            "{}/chat/completions",
            self.base_url.trim_end_matches('/')
        );

        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                },
            ],
        };

        let mut attempt = 0;
        loop {
            match self.send_once(&url, &body).await {
                Ok(raw) => return Ok(raw),
                Err(err) if err.retryable && attempt < self.max_retries => {
                    let delay = Duration::from_millis(250 * 2u64.pow(attempt));
                    tracing::warn!(
                        "Classifier request failed (attempt {}/{}), retrying in {:?}: {}",
                        attempt + 1,
                        self.max_retries + 1,
                        delay,
                        err.message
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err.into_classifier_error()),
            }
        }
    }

    async fn send_once(&self, url: &str, body: &ChatRequest) -> Result<String, SendError> {
        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| SendError {
                message: format!("request failed: {}", e),
                retryable: true,
                empty: false,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SendError {
                message: format!("API error {}: {}", status, body),
                retryable: status.is_server_error(),
                empty: false,
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| SendError {
            message: format!("response decode failed: {}", e),
            retryable: false,
            empty: false,
        })?;

        let content = parsed
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(SendError {
                message: String::new(),
                retryable: false,
                empty: true,
            });
        }

        Ok(content)
    }
}

/// Internal per-attempt failure, tagged with the retry decision
struct SendError {
    message: String,
    retryable: bool,
    empty: bool,
}

impl SendError {
    fn into_classifier_error(self) -> ClassifierError {
        if self.empty {
            ClassifierError::EmptyResponse
        } else {
            ClassifierError::Unavailable(self.message)
        }
    }
}

#[async_trait]
impl Classifier for ClassifierClient {
    async fn classify(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, ClassifierError> {
        self.complete(system_prompt, user_prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(server: &mockito::ServerGuard, max_retries: u32) -> ClassifierClient {
        ClassifierClient::new(
            server.url(),
            "test_key".to_string(),
            "gpt-4o".to_string(),
            5,
            max_retries,
        )
    }

    fn completion_body(content: &str) -> String {
        serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_complete_returns_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body("{\"Robotics\": 80}"))
            .create_async()
            .await;

        let client = client_for(&server, 0);
        let raw = client.complete("system", "user").await.unwrap();

        assert_eq!(raw, "{\"Robotics\": 80}");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_completion_fails_fast() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body("   "))
            .create_async()
            .await;

        // Even with retries budgeted, an empty completion is not retried
        let client = client_for(&server, 3);
        let err = client.complete("system", "user").await.unwrap_err();

        assert!(matches!(err, ClassifierError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_missing_choices_is_empty_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let client = client_for(&server, 0);
        let err = client.complete("system", "user").await.unwrap_err();

        assert!(matches!(err, ClassifierError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_client_error_is_unavailable_without_retry() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body("unauthorized")
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server, 3);
        let err = client.complete("system", "user").await.unwrap_err();

        assert!(matches!(err, ClassifierError::Unavailable(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_retried_then_unavailable() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .with_body("boom")
            .expect(2)
            .create_async()
            .await;

        let client = client_for(&server, 1);
        let err = client.complete("system", "user").await.unwrap_err();

        assert!(matches!(err, ClassifierError::Unavailable(_)));
        mock.assert_async().await;
    }
}
