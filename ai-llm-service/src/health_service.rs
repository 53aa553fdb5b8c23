//! Universal health service for LLM backends (Gemini, OpenAI, Ollama).
//!
//! Checks:
//! - Gemini: `GET {endpoint}/v1beta/models/{model}` with the API key header
//! - OpenAI: `GET {endpoint}/v1/models` with Bearer auth (best-effort model existence check)
//! - Ollama: `GET {endpoint}/api/tags` (best-effort model existence check)
//!
//! The returned [`HealthStatus`] is JSON-serializable and suitable for a `/health` endpoint.
//! [`HealthService::check`] never fails (errors mapped to `ok=false`).

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{AiLlmError, HealthError, HttpError, make_snippet};
use crate::services::gemini_service::API_KEY_HEADER;

/// A serializable health snapshot for a single provider/config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    /// Backend/provider (e.g., "gemini", "ollama").
    pub provider: String,
    /// Target endpoint base URL.
    pub endpoint: String,
    /// Model identifier relevant to the check.
    pub model: Option<String>,
    /// Overall health flag.
    pub ok: bool,
    /// Measured HTTP latency in milliseconds for the main check.
    pub latency_ms: u128,
    /// Short human-readable message with details.
    pub message: String,
}

impl HealthStatus {
    fn new(cfg: &LlmModelConfig, ok: bool, latency_ms: u128, message: impl Into<String>) -> Self {
        Self {
            provider: cfg.provider.to_string(),
            endpoint: cfg.endpoint.clone(),
            model: Some(cfg.model.clone()),
            ok,
            latency_ms,
            message: message.into(),
        }
    }
}

/// A health checker that reuses a single HTTP client.
#[derive(Debug)]
pub struct HealthService {
    client: reqwest::Client,
    default_timeout: Duration,
}

impl HealthService {
    /// Creates a new health service with an optional timeout (seconds, default 10).
    ///
    /// # Errors
    /// Returns [`AiLlmError::HttpTransport`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, AiLlmError> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        info!(
            default_timeout_secs = timeout.as_secs(),
            "HealthService initialized"
        );

        Ok(Self {
            client,
            default_timeout: timeout,
        })
    }

    /// Checks health for a single config, routing to the provider-specific check.
    ///
    /// Never returns an error: any failure becomes `HealthStatus { ok: false, .. }`.
    pub async fn check(&self, cfg: &LlmModelConfig) -> HealthStatus {
        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            warn!(
                provider = %cfg.provider,
                endpoint = %cfg.endpoint,
                "invalid endpoint (empty or missing http/https)"
            );
            return HealthStatus::new(cfg, false, 0, "endpoint is empty or missing http/https");
        }

        let start = Instant::now();
        let result = match cfg.provider {
            LlmProvider::Gemini => self.try_check_gemini(cfg).await,
            LlmProvider::OpenAI => self.try_check_openai(cfg).await,
            LlmProvider::Ollama => self.try_check_ollama(cfg).await,
        };
        let latency = start.elapsed().as_millis();

        match result {
            Ok((ok, message)) => {
                info!(
                    provider = %cfg.provider,
                    model = %cfg.model,
                    ok,
                    latency_ms = latency,
                    "health check completed"
                );
                HealthStatus::new(cfg, ok, latency, message)
            }
            Err(err) => {
                warn!(
                    provider = %cfg.provider,
                    model = %cfg.model,
                    latency_ms = latency,
                    error = %err,
                    "health check failed"
                );
                HealthStatus::new(cfg, false, latency, err.to_string())
            }
        }
    }

    /// Checks health for multiple configs sequentially.
    pub async fn check_many(&self, configs: &[LlmModelConfig]) -> Vec<HealthStatus> {
        debug!(count = configs.len(), "running batch health checks");
        let mut out = Vec::with_capacity(configs.len());
        for cfg in configs {
            out.push(self.check(cfg).await);
        }
        out
    }

    async fn get(
        &self,
        cfg: &LlmModelConfig,
        url: &str,
        auth: Option<(header::HeaderName, header::HeaderValue)>,
    ) -> Result<reqwest::Response, AiLlmError> {
        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(self.default_timeout)
            .min(self.default_timeout);

        debug!(provider = %cfg.provider, model = %cfg.model, "GET {}", url);
        let mut req = self.client.get(url).timeout(timeout);
        if let Some((name, value)) = auth {
            req = req.header(name, value);
        }
        let resp = req.send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(HealthError::HttpStatus(HttpError {
                status,
                url: url.to_string(),
                snippet: make_snippet(&text),
            })
            .into());
        }
        Ok(resp)
    }

    fn key_header(
        cfg: &LlmModelConfig,
        name: header::HeaderName,
        format: impl Fn(&str) -> String,
    ) -> Result<(header::HeaderName, header::HeaderValue), AiLlmError> {
        let key = cfg
            .api_key
            .as_deref()
            .ok_or_else(|| HealthError::Check(format!("missing {} API key", cfg.provider)))?;
        let mut value = header::HeaderValue::from_str(&format(key))
            .map_err(|e| HealthError::Check(format!("invalid API key header: {e}")))?;
        value.set_sensitive(true);
        Ok((name, value))
    }

    /// Gemini check: the model resource must exist and be readable with the key.
    async fn try_check_gemini(&self, cfg: &LlmModelConfig) -> Result<(bool, String), AiLlmError> {
        let url = format!(
            "{}/v1beta/models/{}",
            cfg.endpoint.trim_end_matches('/'),
            cfg.model.trim_start_matches("models/")
        );
        let auth = Self::key_header(
            cfg,
            header::HeaderName::from_static(API_KEY_HEADER),
            str::to_string,
        )?;
        self.get(cfg, &url, Some(auth)).await?;
        Ok((true, "Gemini is healthy; model is available".to_string()))
    }

    /// OpenAI check: `/v1/models` must answer and should list the model.
    async fn try_check_openai(&self, cfg: &LlmModelConfig) -> Result<(bool, String), AiLlmError> {
        let url = format!("{}/v1/models", cfg.endpoint.trim_end_matches('/'));
        let auth = Self::key_header(cfg, header::AUTHORIZATION, |k| format!("Bearer {k}"))?;
        let resp = self.get(cfg, &url, Some(auth)).await?;

        #[derive(Deserialize)]
        struct ModelItem {
            id: String,
        }
        #[derive(Deserialize)]
        struct Models {
            data: Vec<ModelItem>,
        }

        Ok(match resp.json::<Models>().await {
            Ok(models) if models.data.iter().any(|m| m.id == cfg.model) => {
                (true, "OpenAI is healthy; model is available".to_string())
            }
            Ok(_) => (
                false,
                "OpenAI is up, but model not found in /v1/models".to_string(),
            ),
            Err(e) => (
                true,
                format!("OpenAI is reachable; failed to decode /v1/models: {e}"),
            ),
        })
    }

    /// Ollama check: `/api/tags` must answer and should list the model.
    async fn try_check_ollama(&self, cfg: &LlmModelConfig) -> Result<(bool, String), AiLlmError> {
        let url = format!("{}/api/tags", cfg.endpoint.trim_end_matches('/'));
        let resp = self.get(cfg, &url, None).await?;

        Ok(match resp.json::<OllamaTags>().await {
            Ok(tags) => ollama_model_listed(&tags, &cfg.model),
            Err(e) => (
                true,
                format!("Ollama is reachable; failed to decode /api/tags: {e}"),
            ),
        })
    }
}

/// Minimal `/api/tags` shape: `{ "models": [ { "name": "<model>" }, ... ] }`.
#[derive(Deserialize)]
struct OllamaTags {
    models: Option<Vec<OllamaTag>>,
}

#[derive(Deserialize)]
struct OllamaTag {
    name: String,
}

/// Ollama reports untagged models as `<name>:latest`.
fn ollama_model_listed(tags: &OllamaTags, model: &str) -> (bool, String) {
    let Some(models) = &tags.models else {
        return (
            true,
            "Ollama is healthy; tags response without `models` field".to_string(),
        );
    };
    let wanted_latest = format!("{model}:latest");
    if models
        .iter()
        .any(|m| m.name == model || m.name == wanted_latest)
    {
        (true, "Ollama is healthy; model is available".to_string())
    } else {
        (
            false,
            "Ollama is up, but model not found in /api/tags".to_string(),
        )
    }
}
