//! Per-request advisory pipeline.
//!
//! `farmer_data` → pretty JSON document → retrieve context → render prompt →
//! completion provider → raw text. [`AdvisoryService::get_advisory`] is the only
//! place where pipeline errors become an [`AdvisoryFailure`].

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, error, info, instrument};

use crate::{
    cfg::AdvisorConfig,
    completion::CompletionProvider,
    embed::Embedder,
    error::{AdvisoryFailure, Result},
    prompt::PromptTemplate,
    retriever,
};

/// Immutable service object shared by all requests.
#[derive(Clone)]
pub struct AdvisoryService {
    embedder: Arc<dyn Embedder>,
    completion: Arc<dyn CompletionProvider>,
    template: PromptTemplate,
    cfg: AdvisorConfig,
}

impl AdvisoryService {
    /// Creates a service using the built-in advisory template.
    pub fn new(
        embedder: Arc<dyn Embedder>,
        completion: Arc<dyn CompletionProvider>,
        cfg: AdvisorConfig,
    ) -> Self {
        Self::with_template(embedder, completion, PromptTemplate::advisory(), cfg)
    }

    pub fn with_template(
        embedder: Arc<dyn Embedder>,
        completion: Arc<dyn CompletionProvider>,
        template: PromptTemplate,
        cfg: AdvisorConfig,
    ) -> Self {
        Self {
            embedder,
            completion,
            template,
            cfg,
        }
    }

    /// Answers `question` using the most relevant part of `farmer_data`.
    ///
    /// Returns the completion text unmodified.
    ///
    /// # Errors
    /// Any pipeline failure, carrying the underlying message.
    #[instrument(skip_all, fields(keys = farmer_data.len(), question_len = question.len()))]
    pub async fn get_advisory(
        &self,
        farmer_data: &Map<String, Value>,
        question: &str,
    ) -> std::result::Result<String, AdvisoryFailure> {
        match self.run(farmer_data, question).await {
            Ok(answer) => {
                info!(answer_len = answer.len(), "advisory generated");
                Ok(answer)
            }
            Err(e) => {
                error!(error = %e, "advisory pipeline failed");
                Err(AdvisoryFailure::from(e))
            }
        }
    }

    async fn run(&self, farmer_data: &Map<String, Value>, question: &str) -> Result<String> {
        let document = serialize_farmer_data(farmer_data)?;
        let context = retriever::retrieve(
            self.embedder.as_ref(),
            &document,
            question,
            &self.cfg.chunk,
            self.cfg.top_k,
        )
        .await?;
        let prompt = self.template.render(&context, question);
        debug!(prompt_chars = prompt.chars().count(), "prompt rendered");
        self.completion.complete(&prompt).await
    }
}

/// Pretty-printed JSON (two-space indent) in the mapping's key order.
///
/// Non-ASCII text is written as-is rather than as `\uXXXX` escapes.
pub fn serialize_farmer_data(farmer_data: &Map<String, Value>) -> Result<String> {
    Ok(serde_json::to_string_pretty(farmer_data)?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        completion::CompletionFuture, embed::noop_embedder::NoopEmbedder, error::RagError,
        retriever::test_support::LetterCountEmbedder,
    };

    /// Echoes the last non-empty line of its prompt.
    struct EchoLastLine;

    impl CompletionProvider for EchoLastLine {
        fn complete<'a>(&'a self, prompt: &'a str) -> CompletionFuture<'a> {
            Box::pin(async move {
                Ok(prompt
                    .lines()
                    .rev()
                    .find(|l| !l.trim().is_empty())
                    .unwrap_or_default()
                    .to_string())
            })
        }
    }

    /// Returns the whole prompt.
    struct EchoPrompt;

    impl CompletionProvider for EchoPrompt {
        fn complete<'a>(&'a self, prompt: &'a str) -> CompletionFuture<'a> {
            Box::pin(async move { Ok(prompt.to_string()) })
        }
    }

    struct FailingCompletion;

    impl CompletionProvider for FailingCompletion {
        fn complete<'a>(&'a self, _prompt: &'a str) -> CompletionFuture<'a> {
            Box::pin(async move { Err(RagError::Completion("quota exceeded".into())) })
        }
    }

    fn farmer_data() -> Map<String, Value> {
        match json!({"crop": "wheat", "soil": "loamy"}) {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn farmer_data_is_pretty_and_ordered() {
        let mut m = Map::new();
        m.insert("soil".into(), json!("loamy"));
        m.insert("crop".into(), json!("wheat"));
        assert_eq!(
            serialize_farmer_data(&m).unwrap(),
            "{\n  \"soil\": \"loamy\",\n  \"crop\": \"wheat\"\n}"
        );
    }

    #[tokio::test]
    async fn end_to_end_with_echo_stub() {
        let svc = AdvisoryService::new(
            Arc::new(LetterCountEmbedder),
            Arc::new(EchoLastLine),
            AdvisorConfig::default(),
        );
        let answer = svc
            .get_advisory(&farmer_data(), "When should I irrigate?")
            .await
            .unwrap();
        assert!(!answer.is_empty());
        assert_eq!(answer, "Advisory:");
    }

    #[tokio::test]
    async fn prompt_carries_context_and_question() {
        let svc = AdvisoryService::new(
            Arc::new(LetterCountEmbedder),
            Arc::new(EchoPrompt),
            AdvisorConfig::default(),
        );
        let prompt = svc
            .get_advisory(&farmer_data(), "When should I irrigate?")
            .await
            .unwrap();
        // The whole document fits in one chunk, so it is the context.
        assert!(prompt.contains("Context:\n{\n  \"crop\": \"wheat\",\n  \"soil\": \"loamy\"\n}\n"));
        assert!(prompt.contains("Farmer's Question: When should I irrigate?"));
    }

    #[tokio::test]
    async fn embedding_failure_becomes_advisory_failure() {
        let svc = AdvisoryService::new(
            Arc::new(NoopEmbedder),
            Arc::new(EchoLastLine),
            AdvisorConfig::default(),
        );
        let err = svc
            .get_advisory(&farmer_data(), "When should I irrigate?")
            .await
            .unwrap_err();
        assert!(err.message().starts_with("embedding unavailable:"));
    }

    #[tokio::test]
    async fn completion_failure_becomes_advisory_failure() {
        let svc = AdvisoryService::new(
            Arc::new(LetterCountEmbedder),
            Arc::new(FailingCompletion),
            AdvisorConfig::default(),
        );
        let err = svc.get_advisory(&farmer_data(), "q").await.unwrap_err();
        assert_eq!(err.message(), "completion failed: quota exceeded");
    }

    #[tokio::test]
    async fn empty_farmer_data_still_produces_a_document() {
        let svc = AdvisoryService::new(
            Arc::new(LetterCountEmbedder),
            Arc::new(EchoLastLine),
            AdvisorConfig::default(),
        );
        // `{}` is a non-empty document, so retrieval succeeds.
        assert!(svc.get_advisory(&Map::new(), "q").await.is_ok());
    }

    #[test]
    fn non_ascii_values_are_not_escaped() {
        let Value::Object(m) = json!({"फसल": "गेहूं", "région": "Île-de-France"}) else {
            unreachable!()
        };
        let doc = serialize_farmer_data(&m).unwrap();
        assert_eq!(doc, "{\n  \"फसल\": \"गेहूं\",\n  \"région\": \"Île-de-France\"\n}");
        assert!(!doc.contains("\\u"));
    }
}
