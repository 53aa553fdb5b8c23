use std::{future::Future, pin::Pin, sync::Arc};

use ai_llm_service::LlmServiceProfiles;

use crate::error::{RagError, Result};

pub type CompletionFuture<'a> = Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;

/// Text-completion capability: `complete(prompt) -> text`.
pub trait CompletionProvider: Send + Sync {
    fn complete<'a>(&'a self, prompt: &'a str) -> CompletionFuture<'a>;
}

/// Completion through the completion profile of [`LlmServiceProfiles`].
pub struct LlmCompletion {
    llm: Arc<LlmServiceProfiles>,
}

impl LlmCompletion {
    pub fn new(llm: Arc<LlmServiceProfiles>) -> Self {
        Self { llm }
    }
}

impl CompletionProvider for LlmCompletion {
    fn complete<'a>(&'a self, prompt: &'a str) -> CompletionFuture<'a> {
        Box::pin(async move {
            self.llm
                .generate(prompt)
                .await
                .map_err(|e| RagError::Completion(e.to_string()))
        })
    }
}
