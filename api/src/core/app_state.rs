use std::sync::Arc;

use ai_llm_service::{
    LlmServiceProfiles,
    config::default_config::{config_completion_from_env, config_embedding_from_env},
    error_handler::env_opt_u64,
};
use rag_advisor::{
    AdvisorConfig, AdvisoryService, EmbeddingBackend, LlmCompletion, build_embedder,
};
use tracing::info;

use crate::error_handler::AppResult;

/// Shared state for all HTTP handlers. Built once at startup, never mutated.
#[derive(Clone)]
pub struct AppState {
    pub advisory: AdvisoryService,
    /// Provider profiles, used by `/health`.
    pub llm: Arc<LlmServiceProfiles>,
}

impl AppState {
    pub fn new(advisory: AdvisoryService, llm: Arc<LlmServiceProfiles>) -> Self {
        Self { advisory, llm }
    }

    /// Builds providers, embedder and advisory service from environment variables.
    ///
    /// # Errors
    /// Missing credentials, unknown providers and invalid knobs are fatal.
    pub fn from_env() -> AppResult<Self> {
        let completion = config_completion_from_env()?;
        let backend = EmbeddingBackend::from_env()?;
        let embedding = match backend {
            EmbeddingBackend::Remote(provider) => Some(config_embedding_from_env(provider)?),
            EmbeddingBackend::Local | EmbeddingBackend::Disabled => None,
        };
        let health_timeout = env_opt_u64("HEALTH_TIMEOUT_SECS")?;

        let llm = Arc::new(LlmServiceProfiles::new(completion, embedding, health_timeout)?);
        let embedder = build_embedder(backend, llm.clone())?;
        let cfg = AdvisorConfig::from_env()?;

        info!(
            embedder = embedder.model_id(),
            backend = %backend,
            chunk_size = cfg.chunk.max_len,
            chunk_overlap = cfg.chunk.overlap,
            top_k = cfg.top_k,
            "advisory service ready"
        );

        let advisory =
            AdvisoryService::new(embedder, Arc::new(LlmCompletion::new(llm.clone())), cfg);
        Ok(Self::new(advisory, llm))
    }
}
