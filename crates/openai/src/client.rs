//! HTTP client for an OpenAI-compatible API.
//!
//! [`OpenAiClient::complete`] walks its configured [`CallShape`]s in order
//! and returns the first answer. Each failed shape is recorded; only when
//! all of them fail does the call fail, with every attempt attached.

use std::fmt;

use reqwest::StatusCode;

use crate::prompts::{
    PROBE_MAX_TOKENS, PROBE_PROMPT, SAMPLE_ANALYSIS_MAX_TOKENS, SAMPLE_ANALYSIS_PROMPT,
};
use crate::shape::{
    CallShape, ChatMessage, ChatRequest, ChatResponse, LegacyRequest, LegacyResponse,
};

/// A text completion and the shape that produced it.
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub shape: CallShape,
}

/// One failed shape.
#[derive(Debug)]
pub struct ShapeAttempt {
    pub shape: CallShape,
    pub error: OpenAiError,
}

/// Errors from the completion client.
#[derive(Debug, thiserror::Error)]
pub enum OpenAiError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider refused the credential.
    #[error("authentication rejected ({status}): {body}")]
    Auth { status: u16, body: String },

    /// Any other non-2xx status.
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// A 2xx response without completion text.
    #[error("{shape} response contained no completion text")]
    EmptyResponse { shape: CallShape },

    #[error("every call shape failed: {}", AttemptList(.attempts))]
    AllShapesFailed { attempts: Vec<ShapeAttempt> },
}

impl OpenAiError {
    /// Whether the provider rejected the credential on at least one shape.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            OpenAiError::Auth { .. } => true,
            OpenAiError::AllShapesFailed { attempts } => {
                attempts.iter().any(|a| a.error.is_auth_failure())
            }
            _ => false,
        }
    }
}

struct AttemptList<'a>(&'a [ShapeAttempt]);

impl fmt::Display for AttemptList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, attempt) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "[{}] {}", attempt.shape, attempt.error)?;
        }
        Ok(())
    }
}

/// Client for one provider credential.
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    chat_model: String,
    legacy_model: String,
    shapes: Vec<CallShape>,
}

impl OpenAiClient {
    /// Create a client trying [`CallShape::DEFAULT_ORDER`].
    ///
    /// * `base_url`     - API root, e.g. `https://api.openai.com/v1`.
    /// * `chat_model`   - model for chat completions.
    /// * `legacy_model` - model for legacy text completions.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        chat_model: impl Into<String>,
        legacy_model: impl Into<String>,
    ) -> Self {
        Self::with_client(
            reqwest::Client::new(),
            base_url,
            api_key,
            chat_model,
            legacy_model,
        )
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        chat_model: impl Into<String>,
        legacy_model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            chat_model: chat_model.into(),
            legacy_model: legacy_model.into(),
            shapes: CallShape::DEFAULT_ORDER.to_vec(),
        }
    }

    /// Replace the attempt order.
    pub fn with_shapes(mut self, shapes: Vec<CallShape>) -> Self {
        self.shapes = shapes;
        self
    }

    /// Send `prompt`, trying each shape in order.
    pub async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<Completion, OpenAiError> {
        let mut attempts = Vec::with_capacity(self.shapes.len());

        for &shape in &self.shapes {
            match self.complete_with(shape, prompt, max_tokens).await {
                Ok(text) => {
                    tracing::debug!(%shape, failed_before = attempts.len(), "Completion succeeded");
                    return Ok(Completion { text, shape });
                }
                Err(error) => {
                    tracing::debug!(%shape, error = %error, "Completion shape failed");
                    attempts.push(ShapeAttempt { shape, error });
                }
            }
        }

        Err(OpenAiError::AllShapesFailed { attempts })
    }

    /// One minimal completion proving the credential and endpoint work.
    ///
    /// Returns the shape that answered.
    pub async fn probe(&self) -> Result<CallShape, OpenAiError> {
        let completion = self.complete(PROBE_PROMPT, PROBE_MAX_TOKENS).await?;
        Ok(completion.shape)
    }

    /// Run the sample proposal analysis.
    pub async fn analyze_sample(&self) -> Result<Completion, OpenAiError> {
        self.complete(SAMPLE_ANALYSIS_PROMPT, SAMPLE_ANALYSIS_MAX_TOKENS)
            .await
    }

    async fn complete_with(
        &self,
        shape: CallShape,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String, OpenAiError> {
        let url = format!("{}/{}", self.base_url, shape.path());
        let request = self.client.post(url).bearer_auth(&self.api_key);

        let text = match shape {
            CallShape::ChatCompletions => {
                let body = ChatRequest {
                    model: &self.chat_model,
                    messages: vec![ChatMessage {
                        role: "user",
                        content: prompt,
                    }],
                    max_tokens,
                };
                let response = Self::check_status(request.json(&body).send().await?).await?;
                let parsed: ChatResponse = response.json().await?;
                parsed
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|c| c.message.content)
            }
            CallShape::LegacyCompletions => {
                let body = LegacyRequest {
                    model: &self.legacy_model,
                    prompt,
                    max_tokens,
                };
                let response = Self::check_status(request.json(&body).send().await?).await?;
                let parsed: LegacyResponse = response.json().await?;
                parsed.choices.into_iter().next().and_then(|c| c.text)
            }
        };

        text.ok_or(OpenAiError::EmptyResponse { shape })
    }

    /// Map non-2xx responses to [`OpenAiError::Auth`] or [`OpenAiError::Api`].
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, OpenAiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Err(OpenAiError::Auth {
                status: status.as_u16(),
                body,
            })
        } else {
            Err(OpenAiError::Api {
                status: status.as_u16(),
                body,
            })
        }
    }
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("chat_model", &self.chat_model)
            .field("legacy_model", &self.legacy_model)
            .field("shapes", &self.shapes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = OpenAiClient::new("http://localhost:9/v1/", "k", "a", "b");
        assert_eq!(client.base_url, "http://localhost:9/v1");
    }

    #[test]
    fn debug_output_hides_the_key() {
        let client = OpenAiClient::new("http://localhost:9/v1", "sk-secret", "a", "b");
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("sk-secret"));
    }

    #[test]
    fn all_shapes_failed_lists_every_attempt() {
        let err = OpenAiError::AllShapesFailed {
            attempts: vec![
                ShapeAttempt {
                    shape: CallShape::ChatCompletions,
                    error: OpenAiError::Auth {
                        status: 401,
                        body: "bad key".into(),
                    },
                },
                ShapeAttempt {
                    shape: CallShape::LegacyCompletions,
                    error: OpenAiError::Api {
                        status: 404,
                        body: "gone".into(),
                    },
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("[chat-completions] authentication rejected (401)"), "{msg}");
        assert!(msg.contains("[legacy-completions] API error (404)"), "{msg}");
        assert!(err.is_auth_failure());
    }
}
