//! Advisory prompt template.

use crate::error::{RagError, Result};

const CONTEXT: &str = "{context}";
const QUESTION: &str = "{question}";

/// Default prompt sent to the completion provider.
pub const ADVISORY_TEMPLATE: &str = r#"
You are an agricultural advisory assistant.
Use the given context to provide polite, friendly, and practical advice for the farmer.
Keep the answer short, clear, and actionable.

Context:
{context}

Farmer's Question: {question}

Advisory:
"#;

/// A template with `{context}` and `{question}` placeholders.
///
/// Placeholders are checked once in [`PromptTemplate::new`], so rendering
/// cannot fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    /// # Errors
    /// [`RagError::MissingPlaceholder`] if either placeholder is absent.
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        for (name, token) in [("context", CONTEXT), ("question", QUESTION)] {
            if !template.contains(token) {
                return Err(RagError::MissingPlaceholder(name));
            }
        }
        Ok(Self { template })
    }

    /// The built-in agricultural advisory template.
    pub fn advisory() -> Self {
        Self {
            template: ADVISORY_TEMPLATE.to_string(),
        }
    }

    /// Substitutes both placeholders in a single left-to-right pass.
    ///
    /// Braces inside `context` or `question` are copied literally and never
    /// re-expanded.
    pub fn render(&self, context: &str, question: &str) -> String {
        let mut out = String::with_capacity(self.template.len() + context.len() + question.len());
        let mut rest = self.template.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let tail = &rest[open..];
            if let Some(after) = tail.strip_prefix(CONTEXT) {
                out.push_str(context);
                rest = after;
            } else if let Some(after) = tail.strip_prefix(QUESTION) {
                out.push_str(question);
                rest = after;
            } else {
                out.push('{');
                rest = &tail[1..];
            }
        }
        out.push_str(rest);
        out
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::advisory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advisory_template_renders_context_and_question() {
        let p = PromptTemplate::advisory().render("\"crop\": \"wheat\"", "When should I irrigate?");
        assert!(p.starts_with("\nYou are an agricultural advisory assistant.\n"));
        assert!(p.contains("Context:\n\"crop\": \"wheat\"\n\n"));
        assert!(p.contains("Farmer's Question: When should I irrigate?\n"));
        assert!(p.ends_with("Advisory:\n"));
        assert!(!p.contains("{context}") && !p.contains("{question}"));
    }

    #[test]
    fn values_with_placeholders_are_not_expanded() {
        let t = PromptTemplate::new("[{context}] [{question}]").unwrap();
        assert_eq!(t.render("{question}", "{x}"), "[{question}] [{x}]");
    }

    #[test]
    fn unrelated_braces_survive() {
        let t = PromptTemplate::new("{ {context} } {other} {question}").unwrap();
        assert_eq!(t.render("c", "q"), "{ c } {other} q");
    }

    #[test]
    fn malformed_template_is_rejected() {
        assert!(matches!(
            PromptTemplate::new("Question: {question}"),
            Err(RagError::MissingPlaceholder("context"))
        ));
        assert!(matches!(
            PromptTemplate::new("Context: {context}"),
            Err(RagError::MissingPlaceholder("question"))
        ));
        assert!(PromptTemplate::new(ADVISORY_TEMPLATE).is_ok());
    }
}
