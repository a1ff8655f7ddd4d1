use crate::config::{LlmConfig, LlmProvider};
use crate::suggestions::TextGenerator;
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Build the HTTP-backed generator for the configured provider
pub fn build_generator(config: &LlmConfig) -> anyhow::Result<Arc<dyn TextGenerator>> {
    let client = reqwest::Client::builder()
        .timeout(config.timeout())
        .build()
        .context("Failed to build HTTP client")?;

    let generator: Arc<dyn TextGenerator> = match config.provider {
        LlmProvider::Gemini => Arc::new(GeminiClient::new(
            client,
            config.endpoint.clone(),
            config.model.clone(),
        )),
        LlmProvider::OpenAi => Arc::new(ChatCompletionsClient::new(
            client,
            config.endpoint.clone(),
            config.model.clone(),
        )),
    };

    Ok(generator)
}

/// Gemini `generateContent` request
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Google Gemini REST client
pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl GeminiClient {
    pub fn new(client: reqwest::Client, endpoint: String, model: String) -> Self {
        Self {
            client,
            endpoint,
            model,
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, credential: &str, prompt: &str) -> anyhow::Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "Calling Gemini");

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", credential)
            .json(&request)
            .send()
            .await
            .context("Gemini request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "(no body)".to_string());
            return Err(anyhow!("Gemini API error (HTTP {}): {}", status, body));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .context("Gemini returned an unreadable response")?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<String>()
            })
            .filter(|text| !text.is_empty());

        match text {
            Some(text) => Ok(text),
            None => match parsed.prompt_feedback.and_then(|f| f.block_reason) {
                Some(reason) => Err(anyhow!("Gemini blocked the prompt: {}", reason)),
                None => Err(anyhow!("Gemini returned no candidates")),
            },
        }
    }
}

/// A chat message for the OpenAI-compatible API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// OpenAI-compatible chat completions client
pub struct ChatCompletionsClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl ChatCompletionsClient {
    pub fn new(client: reqwest::Client, endpoint: String, model: String) -> Self {
        Self {
            client,
            endpoint,
            model,
        }
    }
}

#[async_trait]
impl TextGenerator for ChatCompletionsClient {
    async fn generate(&self, credential: &str, prompt: &str) -> anyhow::Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "Calling chat completions");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(credential)
            .json(&request)
            .send()
            .await
            .context("LLM request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "(no body)".to_string());
            return Err(anyhow!("LLM API error (HTTP {}): {}", status, body));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("LLM returned an unreadable response")?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| anyhow!("LLM returned empty choices"))
    }
}
