use std::{net::SocketAddr, sync::Arc};

use ai_llm_service::{LlmModelConfig, LlmProvider, LlmServiceProfiles};
use api::{AdvisoryResponse, AppState, HealthReport};
use rag_advisor::{
    AdvisorConfig, AdvisoryService, CompletionProvider, Embedder,
    completion::CompletionFuture,
    embed::{EmbedFuture, noop_embedder::NoopEmbedder},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Deterministic 26-dim letter histogram.
struct LetterCountEmbedder;

impl Embedder for LetterCountEmbedder {
    fn model_id(&self) -> &str {
        "letter-count"
    }

    fn embed_batch<'a>(&'a self, texts: &'a [String]) -> EmbedFuture<'a, Vec<Vec<f32>>> {
        Box::pin(async move {
            Ok(texts
                .iter()
                .map(|t| {
                    let mut v = vec![0.0f32; 26];
                    for c in t.chars().filter(char::is_ascii_alphabetic) {
                        v[(c.to_ascii_lowercase() as u8 - b'a') as usize] += 1.0;
                    }
                    v
                })
                .collect())
        })
    }
}

/// Echoes the last non-empty line of the prompt.
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

/// Profiles pointing at a port nobody listens on; only `/health` touches them.
fn unreachable_llm() -> Arc<LlmServiceProfiles> {
    let cfg = LlmModelConfig {
        provider: LlmProvider::Ollama,
        model: "llama3".into(),
        endpoint: "http://127.0.0.1:9".into(),
        api_key: None,
        max_tokens: None,
        temperature: Some(0.4),
        top_p: None,
        timeout_secs: Some(2),
    };
    Arc::new(LlmServiceProfiles::new(cfg, None, Some(2)).unwrap())
}

async fn spawn_app(embedder: Arc<dyn Embedder>) -> SocketAddr {
    let advisory = AdvisoryService::new(embedder, Arc::new(EchoLastLine), AdvisorConfig::default());
    let state = AppState::new(advisory, unreachable_llm());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, api::router(state)).await.unwrap();
    });
    addr
}

fn url(addr: SocketAddr, path: &str) -> String {
    format!("http://{addr}{path}")
}

#[tokio::test]
async fn returns_advisory_for_wheat_farmer() {
    let addr = spawn_app(Arc::new(LetterCountEmbedder)).await;

    let res = reqwest::Client::new()
        .post(url(addr, "/get-advisory"))
        .json(&json!({
            "farmer_data": {"crop": "wheat", "soil": "loamy"},
            "question": "When should I irrigate?"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert!(res.headers().contains_key("x-request-id"));
    let body: AdvisoryResponse = res.json().await.unwrap();
    assert!(!body.advisory.is_empty());
    assert_eq!(body.advisory, "Advisory:");
}

#[tokio::test]
async fn pipeline_failure_is_500_with_detail() {
    let addr = spawn_app(Arc::new(NoopEmbedder)).await;

    let res = reqwest::Client::new()
        .post(url(addr, "/get-advisory"))
        .json(&json!({"farmer_data": {"crop": "rice"}, "question": "Fertilizer?"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    let body: Value = res.json().await.unwrap();
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("embedding unavailable:"), "{detail}");
}

#[tokio::test]
async fn missing_question_is_422_with_detail() {
    let addr = spawn_app(Arc::new(LetterCountEmbedder)).await;

    let res = reqwest::Client::new()
        .post(url(addr, "/get-advisory"))
        .json(&json!({"farmer_data": {"crop": "wheat"}}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 422);
    let body: Value = res.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().contains("question"));
}

#[tokio::test]
async fn unparsable_body_is_400_with_detail() {
    let addr = spawn_app(Arc::new(LetterCountEmbedder)).await;

    let res = reqwest::Client::new()
        .post(url(addr, "/get-advisory"))
        .header("content-type", "application/json")
        .header("x-request-id", "trace-42")
        .body("{\"farmer_data\": ")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
    assert_eq!(
        res.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
        Some("trace-42")
    );
    let body: Value = res.json().await.unwrap();
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn health_reports_unreachable_provider_as_degraded() {
    let addr = spawn_app(Arc::new(LetterCountEmbedder)).await;

    let res = reqwest::get(url(addr, "/health")).await.unwrap();
    assert_eq!(res.status(), 200);

    let report: HealthReport = res.json().await.unwrap();
    assert_eq!(report.status, "degraded");
    assert_eq!(report.providers.len(), 1);
    assert_eq!(report.providers[0].provider, "ollama");
    assert!(!report.providers[0].ok);
}
