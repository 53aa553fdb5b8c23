use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use tracing::debug;

use super::{EmbedFuture, Embedder};
use crate::error::RagError;

/// Embedder backed by the embedding profile of [`LlmServiceProfiles`].
pub struct LlmEmbedder {
    llm: Arc<LlmServiceProfiles>,
    model_id: String,
}

impl LlmEmbedder {
    pub fn new(llm: Arc<LlmServiceProfiles>) -> Self {
        let model_id = llm
            .profiles()
            .1
            .map(|cfg| format!("{}/{}", cfg.provider, cfg.model))
            .unwrap_or_else(|| "unconfigured".to_string());
        Self { llm, model_id }
    }
}

impl Embedder for LlmEmbedder {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn embed_batch<'a>(&'a self, texts: &'a [String]) -> EmbedFuture<'a, Vec<Vec<f32>>> {
        Box::pin(async move {
            if texts.is_empty() {
                return Ok(Vec::new());
            }
            debug!(model = %self.model_id, inputs = texts.len(), "embedding batch");
            self.llm
                .embed_batch(texts)
                .await
                .map_err(|e| RagError::EmbeddingUnavailable(e.to_string()))
        })
    }
}

#[cfg(test)]
mod tests {
    use ai_llm_service::{LlmModelConfig, LlmProvider};

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

    #[tokio::test]
    async fn missing_embedding_profile_is_unavailable() {
        let llm = LlmServiceProfiles::new(ollama("qwen3:14b"), None, None).unwrap();
        let embedder = LlmEmbedder::new(Arc::new(llm));
        assert_eq!(embedder.model_id(), "unconfigured");

        let err = embedder.embed_batch(&["x".to_string()]).await.unwrap_err();
        assert!(matches!(err, RagError::EmbeddingUnavailable(_)));
    }

    #[tokio::test]
    async fn empty_batch_skips_the_provider() {
        let llm = LlmServiceProfiles::new(ollama("qwen3:14b"), None, None).unwrap();
        let embedder = LlmEmbedder::new(Arc::new(llm));
        assert!(embedder.embed_batch(&[]).await.unwrap().is_empty());
    }

    #[test]
    fn model_id_names_the_embedding_profile() {
        let llm =
            LlmServiceProfiles::new(ollama("qwen3:14b"), Some(ollama("all-minilm")), None).unwrap();
        assert_eq!(LlmEmbedder::new(Arc::new(llm)).model_id(), "ollama/all-minilm");
    }
}
