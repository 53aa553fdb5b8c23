use super::{EmbedFuture, Embedder};
use crate::error::RagError;

/// Embedder that always fails with [`RagError::EmbeddingUnavailable`].
///
/// Selected with `EMBEDDING_PROVIDER=none`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEmbedder;

impl Embedder for NoopEmbedder {
    fn model_id(&self) -> &str {
        "none"
    }

    fn embed_batch<'a>(&'a self, _texts: &'a [String]) -> EmbedFuture<'a, Vec<Vec<f32>>> {
        Box::pin(async {
            Err::<Vec<Vec<f32>>, _>(RagError::EmbeddingUnavailable(
                "embeddings are disabled (EMBEDDING_PROVIDER=none)".into(),
            ))
        })
    }
}
