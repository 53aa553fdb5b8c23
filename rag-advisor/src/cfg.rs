//! Retrieval knobs loaded from environment variables.
//!
//! - `CHUNK_SIZE`    = window length in characters, default `200`
//! - `CHUNK_OVERLAP` = overlap in characters, default `50`
//! - `RAG_TOP_K`     = chunks joined into the prompt context, default `1`

use std::str::FromStr;

use ai_llm_service::error_handler::env_non_empty;

use crate::{
    chunker::{ChunkConfig, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE},
    error::{RagError, Result},
};

pub const DEFAULT_TOP_K: usize = 1;

/// Validated retrieval configuration shared by every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvisorConfig {
    pub chunk: ChunkConfig,
    pub top_k: usize,
}

impl AdvisorConfig {
    /// # Errors
    /// [`RagError::InvalidConfiguration`] for `top_k == 0` or invalid chunking.
    pub fn new(chunk: ChunkConfig, top_k: usize) -> Result<Self> {
        chunk.validate()?;
        if top_k == 0 {
            return Err(RagError::InvalidConfiguration(
                "RAG_TOP_K must be at least 1".into(),
            ));
        }
        Ok(Self { chunk, top_k })
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&env_non_empty)
    }

    /// Same as [`AdvisorConfig::from_env`], reading variables through `env`.
    ///
    /// # Errors
    /// [`RagError::InvalidConfiguration`] for unparsable or inconsistent values.
    pub fn from_lookup(env: &dyn Fn(&str) -> Option<String>) -> Result<Self> {
        let max_len = parse(env, "CHUNK_SIZE", DEFAULT_CHUNK_SIZE)?;
        let overlap = parse(env, "CHUNK_OVERLAP", DEFAULT_CHUNK_OVERLAP)?;
        let top_k = parse(env, "RAG_TOP_K", DEFAULT_TOP_K)?;
        Self::new(ChunkConfig { max_len, overlap }, top_k)
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            chunk: ChunkConfig::default(),
            top_k: DEFAULT_TOP_K,
        }
    }
}

fn parse<T: FromStr>(env: &dyn Fn(&str) -> Option<String>, var: &str, default: T) -> Result<T> {
    match env(var) {
        Some(raw) => raw.trim().parse().map_err(|_| {
            RagError::InvalidConfiguration(format!("{var}: expected a non-negative integer, got {raw:?}"))
        }),
        None => Ok(default),
    }
}
