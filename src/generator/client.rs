use std::{future::Future, time::Duration};

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;
use url::Url;

use super::{
    prompt::build_prompt,
    quiz::{parse_quiz, Quiz, QuizError},
};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const TEMPERATURE: f32 = 0.9;
pub const MAX_TOKENS: u32 = 500;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("completion API returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("completion response has no content")]
    EmptyResponse,
    #[error(transparent)]
    Quiz(#[from] QuizError),
}

/// Anything that can come up with a quiz for a topic.
pub trait QuizSource {
    fn generate(
        &self,
        topic: Option<&str>,
    ) -> impl Future<Output = Result<Quiz, GenerationError>> + Send;
}

/// Generates quizzes through an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct QuizGenerator {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl QuizGenerator {
    pub fn new(
        api_base: &Url,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", api_base.as_str().trim_end_matches('/')),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, GenerationError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status { status, body });
        }

        let response: ChatResponse = response.json().await?;
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)
    }
}

impl QuizSource for QuizGenerator {
    #[instrument(level = "info", skip(self), fields(model = %self.model))]
    async fn generate(&self, topic: Option<&str>) -> Result<Quiz, GenerationError> {
        let prompt = build_prompt(topic, &mut rand::thread_rng());
        tracing::info!(topic = %prompt.topic, "requesting a quiz");

        let content = self.complete(&prompt.system, &prompt.user).await?;
        tracing::debug!(%content, "completion received");

        let quiz = parse_quiz(&content).inspect_err(|e| {
            tracing::warn!(error = %e, %content, "completion is not a valid quiz");
        })?;
        Ok(quiz)
    }
}
