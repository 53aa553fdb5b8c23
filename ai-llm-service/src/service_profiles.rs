//! Shared LLM service with two profiles: `completion` and (optional) `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once at startup, wrap in `Arc`, and pass clones to dependents.
//! - Provider clients are built eagerly; nothing is mutated after construction,
//!   so concurrent requests need no locking.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::LlmServiceProfiles;
//! use ai_llm_service::config::default_config::config_completion_from_env;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let completion = config_completion_from_env()?;
//! let svc = Arc::new(LlmServiceProfiles::new(completion, None, Some(10))?);
//!
//! let txt = svc.generate("Hello").await?;
//! println!("{txt}");
//! # Ok(()) }
//! ```

use tracing::info;

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, ConfigError},
    health_service::{HealthService, HealthStatus},
    services::{
        gemini_service::GeminiService, ollama_service::OllamaService,
        open_ai_service::OpenAiService,
    },
};

/// A provider client selected by [`LlmModelConfig::provider`].
#[derive(Debug)]
enum LlmClient {
    Gemini(GeminiService),
    OpenAI(OpenAiService),
    Ollama(OllamaService),
}

impl LlmClient {
    fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        Ok(match cfg.provider {
            LlmProvider::Gemini => LlmClient::Gemini(GeminiService::new(cfg)?),
            LlmProvider::OpenAI => LlmClient::OpenAI(OpenAiService::new(cfg)?),
            LlmProvider::Ollama => LlmClient::Ollama(OllamaService::new(cfg)?),
        })
    }

    fn config(&self) -> &LlmModelConfig {
        match self {
            LlmClient::Gemini(c) => c.config(),
            LlmClient::OpenAI(c) => c.config(),
            LlmClient::Ollama(c) => c.config(),
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String, AiLlmError> {
        match self {
            LlmClient::Gemini(c) => c.generate(prompt).await,
            LlmClient::OpenAI(c) => c.generate(prompt).await,
            LlmClient::Ollama(c) => c.generate(prompt).await,
        }
    }

    async fn embed_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, AiLlmError> {
        match self {
            LlmClient::Gemini(c) => c.embed_batch(inputs).await,
            LlmClient::OpenAI(c) => c.embed_batch(inputs).await,
            LlmClient::Ollama(c) => c.embed_batch(inputs).await,
        }
    }
}

/// Shared service that manages the **completion** and **embedding** profiles.
#[derive(Debug)]
pub struct LlmServiceProfiles {
    completion: LlmClient,
    embedding: Option<LlmClient>,
    health: HealthService,
}

impl LlmServiceProfiles {
    /// Creates the service and its provider clients.
    ///
    /// - `completion`: required profile used to write answers.
    /// - `embedding`: optional remote embedding profile (`None` when embeddings
    ///   are computed in-process or disabled).
    /// - `health_timeout_secs`: optional timeout for the health checker.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if any client cannot be built (bad endpoint,
    /// missing key, TLS backend failure).
    pub fn new(
        completion: LlmModelConfig,
        embedding: Option<LlmModelConfig>,
        health_timeout_secs: Option<u64>,
    ) -> Result<Self, AiLlmError> {
        info!(
            provider = %completion.provider,
            model = %completion.model,
            embedding = ?embedding.as_ref().map(|e| (e.provider, e.model.as_str())),
            "initializing LLM profiles"
        );

        Ok(Self {
            completion: LlmClient::new(completion)?,
            embedding: embedding.map(LlmClient::new).transpose()?,
            health: HealthService::new(health_timeout_secs)?,
        })
    }

    /// Generates text using the **completion** profile.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] on transport, status or decoding failures.
    pub async fn generate(&self, prompt: &str) -> Result<String, AiLlmError> {
        self.completion.generate(prompt).await
    }

    /// Computes embeddings for `inputs` using the **embedding** profile.
    ///
    /// # Errors
    /// [`ConfigError::MissingVar`] if no embedding profile was configured,
    /// otherwise provider errors.
    pub async fn embed_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, AiLlmError> {
        match &self.embedding {
            Some(client) => client.embed_batch(inputs).await,
            None => Err(ConfigError::MissingVar("EMBEDDING_PROVIDER").into()),
        }
    }

    /// Returns a health snapshot for all distinct profiles.
    pub async fn health_all(&self) -> Vec<HealthStatus> {
        let mut list = Vec::with_capacity(2);
        list.push(self.completion.config().clone());
        if let Some(emb) = &self.embedding {
            if emb.config() != self.completion.config() {
                list.push(emb.config().clone());
            }
        }
        self.health.check_many(&list).await
    }

    /// Returns the current profiles `(completion, embedding)`.
    pub fn profiles(&self) -> (&LlmModelConfig, Option<&LlmModelConfig>) {
        (
            self.completion.config(),
            self.embedding.as_ref().map(LlmClient::config),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ollama(model: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: model.into(),
            endpoint: "http://localhost:11434".into(),
            api_key: None,
            max_tokens: None,
            temperature: Some(0.0),
            top_p: None,
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn builds_clients_for_each_profile() {
        let svc =
            LlmServiceProfiles::new(ollama("qwen3:14b"), Some(ollama("all-minilm")), None).unwrap();
        let (completion, embedding) = svc.profiles();
        assert_eq!(completion.model, "qwen3:14b");
        assert_eq!(embedding.map(|e| e.model.as_str()), Some("all-minilm"));
    }

    #[test]
    fn invalid_embedding_profile_fails_construction() {
        let mut bad = ollama("all-minilm");
        bad.endpoint = "ftp://nowhere".into();
        assert!(LlmServiceProfiles::new(ollama("qwen3:14b"), Some(bad), None).is_err());
    }

    #[tokio::test]
    async fn embedding_without_profile_is_a_config_error() {
        let svc = LlmServiceProfiles::new(ollama("qwen3:14b"), None, None).unwrap();
        let err = svc.embed_batch(&["x".to_string()]).await.unwrap_err();
        assert!(matches!(err, AiLlmError::Config(ConfigError::MissingVar(_))));
    }
}
