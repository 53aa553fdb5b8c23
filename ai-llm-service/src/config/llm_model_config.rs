use crate::config::llm_provider::LlmProvider;

/// Configuration for an LLM model invocation (completion or embeddings).
///
/// # Fields
///
/// - `provider`: which backend to call (Gemini, OpenAI, Ollama).
/// - `model`: model identifier (e.g. `"gemini-2.5-pro"`, `"all-minilm"`).
/// - `endpoint`: API base URL, without the path (e.g. `"http://localhost:11434"`).
/// - `api_key`: credential for providers that require one.
/// - `max_tokens`: output cap, if supported.
/// - `temperature`: sampling temperature (0.0 = deterministic).
/// - `top_p`: nucleus sampling cutoff.
/// - `timeout_secs`: HTTP request timeout.
///
/// # Examples
///
/// ```
/// use ai_llm_service::{LlmModelConfig, LlmProvider};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::Gemini,
///     model: "gemini-2.5-pro".to_string(),
///     endpoint: "https://generativelanguage.googleapis.com".to_string(),
///     api_key: Some("AIza...".to_string()),
///     max_tokens: None,
///     temperature: Some(0.4),
///     top_p: None,
///     timeout_secs: Some(120),
/// };
/// assert_eq!(cfg.provider, LlmProvider::Gemini);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// The LLM provider/backend.
    pub provider: LlmProvider,

    /// Model identifier string.
    pub model: String,

    /// API base URL.
    pub endpoint: String,

    /// Optional API key for authentication.
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}
