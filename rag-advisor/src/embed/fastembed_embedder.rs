//! In-process sentence embeddings via `fastembed` (all-MiniLM-L6-v2).

use std::sync::{Arc, Mutex};

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::info;

use super::{EmbedFuture, Embedder};
use crate::error::RagError;

const MODEL_ID: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Local ONNX embedder. Inference runs on Tokio's blocking pool.
pub struct FastEmbedder {
    model: Arc<Mutex<TextEmbedding>>,
}

impl FastEmbedder {
    /// Loads (and on first use downloads) the model.
    ///
    /// # Errors
    /// [`RagError::EmbeddingUnavailable`] if the model cannot be initialized.
    pub fn new() -> Result<Self, RagError> {
        let model = TextEmbedding::try_new(InitOptions::new(EmbeddingModel::AllMiniLML6V2))
            .map_err(|e| RagError::EmbeddingUnavailable(format!("fastembed init: {e}")))?;
        info!(model = MODEL_ID, "local embedding model loaded");
        Ok(Self {
            model: Arc::new(Mutex::new(model)),
        })
    }
}

impl Embedder for FastEmbedder {
    fn model_id(&self) -> &str {
        MODEL_ID
    }

    fn embed_batch<'a>(&'a self, texts: &'a [String]) -> EmbedFuture<'a, Vec<Vec<f32>>> {
        let model = Arc::clone(&self.model);
        let owned = texts.to_vec();
        Box::pin(async move {
            if owned.is_empty() {
                return Ok(Vec::new());
            }
            tokio::task::spawn_blocking(move || {
                let mut model = model
                    .lock()
                    .map_err(|_| RagError::EmbeddingUnavailable("model lock poisoned".into()))?;
                model
                    .embed(owned, None)
                    .map_err(|e| RagError::EmbeddingUnavailable(e.to_string()))
            })
            .await
            .map_err(|e| RagError::EmbeddingUnavailable(format!("embedding task failed: {e}")))?
        })
    }
}
