use super::SuggestionError;
use async_trait::async_trait;
use std::sync::Arc;

/// A text-generation backend: one prompt in, raw text out
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, credential: &str, prompt: &str) -> anyhow::Result<String>;
}

/// Sends a prompt to the generation service exactly once.
///
/// The credential is handed in by the caller; a fetcher without one fails
/// with [`SuggestionError::Configuration`] and never reaches the generator.
#[derive(Clone)]
pub struct SuggestionFetcher {
    credential: Option<String>,
    generator: Arc<dyn TextGenerator>,
}

impl SuggestionFetcher {
    pub fn new(credential: Option<String>, generator: Arc<dyn TextGenerator>) -> Self {
        let credential = credential.filter(|c| !c.trim().is_empty());
        Self {
            credential,
            generator,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.credential.is_some()
    }

    pub async fn fetch(&self, prompt: &str) -> Result<String, SuggestionError> {
        let Some(credential) = self.credential.as_deref() else {
            return Err(SuggestionError::Configuration);
        };

        if prompt.trim().is_empty() {
            return Err(SuggestionError::Service(
                "refusing to send an empty prompt".to_string(),
            ));
        }

        self.generator
            .generate(credential, prompt)
            .await
            .map_err(|e| SuggestionError::Service(format!("{:#}", e)))
    }
}
