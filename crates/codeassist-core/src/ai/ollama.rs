use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{Inference, InferenceError};

/// Text used when the endpoint answers 2xx without a `response` field.
pub const NO_RESPONSE: &str = "No response received.";

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    response: Option<String>,
}

#[derive(Deserialize)]
struct OllamaModel {
    name: String,
}

#[derive(Deserialize)]
struct OllamaModelsResponse {
    #[serde(default)]
    models: Vec<OllamaModel>,
}

#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn query(&self, prompt: &str) -> Result<String, InferenceError> {
        let url = format!("{}/api/generate", self.base_url);

        let request = OllamaRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let started = Instant::now();
        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "sending generate request");

        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                model = %self.model,
                status = status.as_u16(),
                duration_ms = %started.elapsed().as_millis(),
                "generate request rejected"
            );
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let ollama_response: OllamaResponse = response.json().await?;
        tracing::info!(
            model = %self.model,
            duration_ms = %started.elapsed().as_millis(),
            "generate request completed"
        );

        Ok(ollama_response
            .response
            .unwrap_or_else(|| NO_RESPONSE.to_string()))
    }

    pub async fn list_models(&self) -> Result<Vec<String>, InferenceError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let models_response: OllamaModelsResponse = response.json().await?;
        let model_names: Vec<String> = models_response
            .models
            .into_iter()
            .map(|model| model.name)
            .collect();

        Ok(model_names)
    }

    /// Whether `name` is installed on the server.
    ///
    /// Ollama lists untagged models with an implicit `:latest` suffix, so both
    /// spellings count.
    pub async fn has_model(&self, name: &str) -> Result<bool, InferenceError> {
        let models = self.list_models().await?;
        let tagged = format!("{}:latest", name);
        Ok(models.iter().any(|m| m == name || *m == tagged))
    }
}

#[async_trait]
impl Inference for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String, InferenceError> {
        self.query(prompt).await
    }

    fn model(&self) -> &str {
        &self.model
    }
}
