//! Default LLM configs loaded from environment variables.
//!
//! Two roles are supported:
//!
//! - **Completion** → the model that writes the advisory text
//! - **Embedding**  → the model that turns chunks/queries into vectors
//!
//! # Environment variables
//!
//! Completion:
//! - `LLM_PROVIDER`     = `gemini` (default) | `openai` | `ollama`
//! - `LLM_MODEL`        = model id (defaults: `gemini-2.5-pro`, `gpt-4o-mini`, `OLLAMA_MODEL`)
//! - `LLM_TEMPERATURE`  = sampling temperature, default `0.4`
//! - `LLM_MAX_TOKENS`   = optional output cap (u32)
//! - `LLM_TIMEOUT_SECS` = request timeout, default `120`
//!
//! Embedding:
//! - `EMBEDDING_MODEL`        = model id (defaults: `all-minilm`, `text-embedding-3-small`, `text-embedding-004`)
//! - `EMBEDDING_TIMEOUT_SECS` = request timeout, default `30`
//!
//! Provider credentials/endpoints:
//! - `GOOGLE_API_KEY` (required for Gemini), `GEMINI_URL`
//! - `OPENAI_API_KEY` (required for OpenAI), `OPENAI_URL`
//! - `OLLAMA_URL` or `OLLAMA_PORT` (default `http://localhost:11434`)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, env_non_empty, parse_opt, validate_http_endpoint,
        validate_range_f32,
    },
};

pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.4;

/// Variable lookup used by the config builders. Empty values count as unset.
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Builds the completion profile from the process environment.
///
/// # Errors
/// - [`ConfigError::MissingVar`] when the selected provider's credential is absent
/// - [`ConfigError::UnsupportedProvider`] for an unknown `LLM_PROVIDER`
/// - [`ConfigError::InvalidNumber`] / [`ConfigError::OutOfRange`] for bad knobs
pub fn config_completion_from_env() -> Result<LlmModelConfig, AiLlmError> {
    config_completion_with(&env_non_empty)
}

/// Builds the embedding profile for `provider` from the process environment.
pub fn config_embedding_from_env(provider: LlmProvider) -> Result<LlmModelConfig, AiLlmError> {
    config_embedding_with(provider, &env_non_empty)
}

/// Same as [`config_completion_from_env`], reading variables through `env`.
pub fn config_completion_with(env: EnvLookup<'_>) -> Result<LlmModelConfig, AiLlmError> {
    let provider = match env("LLM_PROVIDER") {
        Some(raw) => raw.parse::<LlmProvider>()?,
        None => LlmProvider::Gemini,
    };

    let model = match (env("LLM_MODEL"), provider) {
        (Some(m), _) => m,
        (None, LlmProvider::Gemini) => DEFAULT_GEMINI_MODEL.to_string(),
        (None, LlmProvider::OpenAI) => DEFAULT_OPENAI_MODEL.to_string(),
        (None, LlmProvider::Ollama) => env("OLLAMA_MODEL")
            .ok_or(ConfigError::MissingVar("LLM_MODEL or OLLAMA_MODEL"))?,
    };

    let temperature = parse_opt::<f32>(
        "LLM_TEMPERATURE",
        env("LLM_TEMPERATURE"),
        "expected a floating-point number",
    )?
    .unwrap_or(DEFAULT_TEMPERATURE);
    validate_range_f32("temperature", temperature, 0.0, 2.0)?;

    let max_tokens = parse_opt::<u32>("LLM_MAX_TOKENS", env("LLM_MAX_TOKENS"), "expected u32")?;
    let timeout_secs =
        parse_opt::<u64>("LLM_TIMEOUT_SECS", env("LLM_TIMEOUT_SECS"), "expected u64")?
            .unwrap_or(120);

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint: endpoint_for(provider, env)?,
        api_key: api_key_for(provider, env)?,
        max_tokens,
        temperature: Some(temperature),
        top_p: None,
        timeout_secs: Some(timeout_secs),
    })
}

/// Same as [`config_embedding_from_env`], reading variables through `env`.
pub fn config_embedding_with(
    provider: LlmProvider,
    env: EnvLookup<'_>,
) -> Result<LlmModelConfig, AiLlmError> {
    let model = env("EMBEDDING_MODEL").unwrap_or_else(|| {
        match provider {
            // all-MiniLM-L6-v2 as packaged by Ollama.
            LlmProvider::Ollama => "all-minilm",
            LlmProvider::OpenAI => "text-embedding-3-small",
            LlmProvider::Gemini => "text-embedding-004",
        }
        .to_string()
    });

    let timeout_secs = parse_opt::<u64>(
        "EMBEDDING_TIMEOUT_SECS",
        env("EMBEDDING_TIMEOUT_SECS"),
        "expected u64",
    )?
    .unwrap_or(30);

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint: endpoint_for(provider, env)?,
        api_key: api_key_for(provider, env)?,
        max_tokens: None,
        temperature: Some(0.0),
        top_p: None,
        timeout_secs: Some(timeout_secs),
    })
}

/// Resolves the base URL for `provider`.
///
/// Ollama precedence: `OLLAMA_URL`, then `OLLAMA_PORT` → `http://localhost:{port}`,
/// then the default local endpoint.
fn endpoint_for(provider: LlmProvider, env: EnvLookup<'_>) -> Result<String, AiLlmError> {
    let (var, url) = match provider {
        LlmProvider::Gemini => (
            "GEMINI_URL",
            env("GEMINI_URL").unwrap_or_else(|| DEFAULT_GEMINI_URL.to_string()),
        ),
        LlmProvider::OpenAI => (
            "OPENAI_URL",
            env("OPENAI_URL").unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string()),
        ),
        LlmProvider::Ollama => {
            let url = match (env("OLLAMA_URL"), env("OLLAMA_PORT")) {
                (Some(url), _) => url,
                (None, Some(port)) => {
                    port.trim()
                        .parse::<u16>()
                        .map_err(|_| ConfigError::InvalidNumber {
                            var: "OLLAMA_PORT",
                            reason: "expected u16 (1..=65535)",
                        })?;
                    format!("http://localhost:{}", port.trim())
                }
                (None, None) => DEFAULT_OLLAMA_URL.to_string(),
            };
            ("OLLAMA_URL", url)
        }
    };
    validate_http_endpoint(var, &url)?;
    Ok(url)
}

fn api_key_for(provider: LlmProvider, env: EnvLookup<'_>) -> Result<Option<String>, AiLlmError> {
    match provider {
        LlmProvider::Gemini => env("GOOGLE_API_KEY")
            .map(Some)
            .ok_or_else(|| ConfigError::MissingVar("GOOGLE_API_KEY").into()),
        LlmProvider::OpenAI => env("OPENAI_API_KEY")
            .map(Some)
            .ok_or_else(|| ConfigError::MissingVar("OPENAI_API_KEY").into()),
        LlmProvider::Ollama => Ok(None),
    }
}
