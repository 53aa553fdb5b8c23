use std::{fmt, future::Future, pin::Pin, str::FromStr, sync::Arc};

use ai_llm_service::{LlmProvider, LlmServiceProfiles};

use crate::error::{RagError, Result};

/// Boxed future returned by [`Embedder`] methods.
///
/// Async is required because most real providers (Ollama, OpenAI, Gemini)
/// perform HTTP requests.
pub type EmbedFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Provider interface for embedding generation.
///
/// Implementations must be deterministic for identical input and keep a stable
/// dimension for the lifetime of the process. Handles are shared read-only
/// between concurrent requests.
pub trait Embedder: Send + Sync {
    /// Identifier of the underlying model, for logs.
    fn model_id(&self) -> &str;

    /// Embeds every text, preserving order. All vectors share one dimension.
    fn embed_batch<'a>(&'a self, texts: &'a [String]) -> EmbedFuture<'a, Vec<Vec<f32>>>;

    /// Embeds a single text.
    fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a, Vec<f32>> {
        Box::pin(async move {
            let batch = [text.to_string()];
            let mut out = self.embed_batch(&batch).await?;
            if out.len() != 1 {
                return Err(RagError::EmbeddingUnavailable(format!(
                    "expected 1 embedding, got {}",
                    out.len()
                )));
            }
            out.pop()
                .ok_or_else(|| RagError::EmbeddingUnavailable("no embedding returned".into()))
        })
    }
}

/// Where embeddings come from, selected by `EMBEDDING_PROVIDER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingBackend {
    /// Remote provider through the shared LLM service.
    Remote(LlmProvider),
    /// In-process all-MiniLM-L6-v2 (requires the `local-embeddings` feature).
    Local,
    /// Embeddings switched off; every request fails with `EmbeddingUnavailable`.
    Disabled,
}

impl EmbeddingBackend {
    /// Reads `EMBEDDING_PROVIDER` (default `ollama`).
    pub fn from_env() -> Result<Self> {
        match std::env::var("EMBEDDING_PROVIDER") {
            Ok(v) if !v.trim().is_empty() => v.parse(),
            _ => Ok(EmbeddingBackend::Remote(LlmProvider::Ollama)),
        }
    }
}

impl FromStr for EmbeddingBackend {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "fastembed" => Ok(EmbeddingBackend::Local),
            "none" | "disabled" => Ok(EmbeddingBackend::Disabled),
            other => other
                .parse::<LlmProvider>()
                .map(EmbeddingBackend::Remote)
                .map_err(|e| RagError::InvalidConfiguration(e.to_string())),
        }
    }
}

impl fmt::Display for EmbeddingBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbeddingBackend::Remote(p) => write!(f, "{p}"),
            EmbeddingBackend::Local => f.write_str("local"),
            EmbeddingBackend::Disabled => f.write_str("none"),
        }
    }
}

/// Builds the embedder for `backend`.
///
/// `llm` must have been created with an embedding profile when `backend` is
/// [`EmbeddingBackend::Remote`].
///
/// # Errors
/// [`RagError::InvalidConfiguration`] when `local` is requested without the
/// `local-embeddings` feature; [`RagError::EmbeddingUnavailable`] when the local
/// model fails to load.
pub fn build_embedder(
    backend: EmbeddingBackend,
    llm: Arc<LlmServiceProfiles>,
) -> Result<Arc<dyn Embedder>> {
    match backend {
        EmbeddingBackend::Remote(_) => Ok(Arc::new(llm_embedder::LlmEmbedder::new(llm))),
        EmbeddingBackend::Disabled => Ok(Arc::new(noop_embedder::NoopEmbedder)),
        #[cfg(feature = "local-embeddings")]
        EmbeddingBackend::Local => Ok(Arc::new(fastembed_embedder::FastEmbedder::new()?)),
        #[cfg(not(feature = "local-embeddings"))]
        EmbeddingBackend::Local => Err(RagError::InvalidConfiguration(
            "EMBEDDING_PROVIDER=local requires the `local-embeddings` feature".into(),
        )),
    }
}

#[cfg(feature = "local-embeddings")]
pub mod fastembed_embedder;
pub mod llm_embedder;
pub mod noop_embedder;
