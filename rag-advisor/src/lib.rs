//! Per-request retrieval pipeline for agricultural advisories.
//!
//! A farmer's structured data is serialized, split into overlapping windows,
//! embedded and indexed in memory; the window nearest to the question becomes
//! the context of a fixed prompt sent to a completion provider.
//!
//! Entry point: [`AdvisoryService::get_advisory`].

pub mod advisory;
pub mod cfg;
pub mod chunker;
pub mod completion;
pub mod embed;
pub mod error;
pub mod prompt;
pub mod retriever;
pub mod vector_index;

pub use advisory::AdvisoryService;
pub use cfg::AdvisorConfig;
pub use chunker::ChunkConfig;
pub use completion::{CompletionProvider, LlmCompletion};
pub use embed::{EmbeddingBackend, Embedder, build_embedder};
pub use error::{AdvisoryFailure, RagError};
pub use prompt::PromptTemplate;
pub use retriever::{RetrievedChunk, retrieve, retrieve_chunks};
pub use vector_index::{FlatL2Index, Neighbor};
