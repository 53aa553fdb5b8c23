//! Shared LLM provider layer for the advisory service.
//!
//! - [`config`]: provider/model configuration and env-driven defaults
//! - [`services`]: thin HTTP clients for Gemini, OpenAI and Ollama
//! - [`service_profiles`]: the `completion` + `embedding` profiles used by the app
//! - [`health_service`]: best-effort provider checks for `/health`
//! - [`error_handler`]: unified [`AiLlmError`] and env helpers
//! - [`telemetry`]: library-scoped tracing layer

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::AiLlmError;
pub use health_service::{HealthService, HealthStatus};
pub use service_profiles::LlmServiceProfiles;
