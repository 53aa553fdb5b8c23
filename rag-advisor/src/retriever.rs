//! Chunk → embed → index → search, for a single document and query.

use tracing::debug;

use crate::{
    chunker::ChunkConfig,
    embed::Embedder,
    error::{RagError, Result},
    vector_index::FlatL2Index,
};

/// One retrieved chunk with its rank data.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedChunk {
    pub text: String,
    /// Position of the chunk in the document's chunk sequence.
    pub position: usize,
    /// Squared L2 distance to the query embedding.
    pub distance: f32,
}

/// Returns the `k` chunks of `document` nearest to `query`, closest first.
///
/// The index is built for this call only and dropped on return.
///
/// # Errors
/// - [`RagError::InvalidConfiguration`] for `k == 0` or invalid chunking parameters
/// - [`RagError::NoChunksProduced`] when `document` yields no chunks
/// - [`RagError::EmbeddingUnavailable`] when the embedder fails or returns the wrong count
/// - [`RagError::DimensionMismatch`] when the embedder is inconsistent
pub async fn retrieve_chunks(
    embedder: &dyn Embedder,
    document: &str,
    query: &str,
    chunking: &ChunkConfig,
    k: usize,
) -> Result<Vec<RetrievedChunk>> {
    if k == 0 {
        return Err(RagError::InvalidConfiguration(
            "top-k must be at least 1".into(),
        ));
    }

    let chunks = chunking.split(document)?;
    if chunks.is_empty() {
        return Err(RagError::NoChunksProduced);
    }
    debug!(
        chunks = chunks.len(),
        doc_chars = document.chars().count(),
        "document chunked"
    );

    let vectors = embedder.embed_batch(&chunks).await?;
    if vectors.len() != chunks.len() {
        return Err(RagError::EmbeddingUnavailable(format!(
            "{} returned {} embeddings for {} chunks",
            embedder.model_id(),
            vectors.len(),
            chunks.len()
        )));
    }

    let index = FlatL2Index::build(vectors, chunks)?;
    debug!(
        size = index.len(),
        dim = index.dimension(),
        "index built"
    );

    let query_vec = embedder.embed(query).await?;
    let hits = index.search(&query_vec, k)?;
    if let Some(top) = hits.first() {
        debug!(
            top_position = top.position,
            top_distance = top.distance,
            hits = hits.len(),
            "index searched"
        );
    }

    Ok(hits
        .into_iter()
        .map(|h| RetrievedChunk {
            text: h.payload.clone(),
            position: h.position,
            distance: h.distance,
        })
        .collect())
}

/// Retrieves the `k` nearest chunks and joins their texts with `"\n"`.
///
/// # Errors
/// Same as [`retrieve_chunks`].
pub async fn retrieve(
    embedder: &dyn Embedder,
    document: &str,
    query: &str,
    chunking: &ChunkConfig,
    k: usize,
) -> Result<String> {
    let hits = retrieve_chunks(embedder, document, query, chunking, k).await?;
    Ok(hits
        .into_iter()
        .map(|h| h.text)
        .collect::<Vec<_>>()
        .join("\n"))
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::embed::{EmbedFuture, Embedder};

    /// Deterministic bag-of-letters embedder: 26 dims, one per ASCII letter.
    pub struct LetterCountEmbedder;

    pub fn letter_counts(text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; 26];
        for c in text.chars().filter(char::is_ascii_alphabetic) {
            v[(c.to_ascii_lowercase() as u8 - b'a') as usize] += 1.0;
        }
        v
    }

    impl Embedder for LetterCountEmbedder {
        fn model_id(&self) -> &str {
            "letter-count"
        }

        fn embed_batch<'a>(&'a self, texts: &'a [String]) -> EmbedFuture<'a, Vec<Vec<f32>>> {
            Box::pin(async move { Ok(texts.iter().map(|t| letter_counts(t)).collect()) })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::LetterCountEmbedder;
    use super::*;
    use crate::embed::EmbedFuture;

    /// Returns one vector fewer than requested.
    struct ShortEmbedder;

    impl Embedder for ShortEmbedder {
        fn model_id(&self) -> &str {
            "short"
        }

        fn embed_batch<'a>(&'a self, texts: &'a [String]) -> EmbedFuture<'a, Vec<Vec<f32>>> {
            Box::pin(async move { Ok(vec![vec![1.0]; texts.len().saturating_sub(1)]) })
        }
    }

    fn doc() -> String {
        // Three 10-char windows with zero overlap.
        "aaaaaaaaaabbbbbbbbbbcccccccccc".to_string()
    }

    #[tokio::test]
    async fn query_identical_to_chunk_returns_that_chunk() {
        let cfg = ChunkConfig::new(10, 0).unwrap();
        let ctx = retrieve(&LetterCountEmbedder, &doc(), "bbbbbbbbbb", &cfg, 1)
            .await
            .unwrap();
        assert_eq!(ctx, "bbbbbbbbbb");
    }

    #[tokio::test]
    async fn top_k_is_joined_in_distance_order() {
        let cfg = ChunkConfig::new(10, 0).unwrap();
        let hits = retrieve_chunks(&LetterCountEmbedder, &doc(), "ccccccccbb", &cfg, 2)
            .await
            .unwrap();
        assert_eq!(hits[0].position, 2);
        assert_eq!(hits[1].position, 1);
        assert!(hits[0].distance <= hits[1].distance);

        let ctx = retrieve(&LetterCountEmbedder, &doc(), "ccccccccbb", &cfg, 2)
            .await
            .unwrap();
        assert_eq!(ctx, "cccccccccc\nbbbbbbbbbb");
    }

    #[tokio::test]
    async fn empty_document_has_no_chunks() {
        let err = retrieve(&LetterCountEmbedder, "", "q", &ChunkConfig::default(), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::NoChunksProduced));
    }

    #[tokio::test]
    async fn zero_k_is_rejected() {
        let err = retrieve(&LetterCountEmbedder, "abc", "a", &ChunkConfig::default(), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::InvalidConfiguration(_)));
    }

    #[tokio::test]
    async fn embedding_count_mismatch_is_reported() {
        let cfg = ChunkConfig::new(10, 0).unwrap();
        let err = retrieve(&ShortEmbedder, &doc(), "a", &cfg, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::EmbeddingUnavailable(_)));
    }
}
