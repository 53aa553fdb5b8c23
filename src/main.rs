use std::process::ExitCode;

use ai_llm_service::telemetry;
use api::AppState;
use tracing::{Level, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine; variables may come from the real environment.
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(telemetry::env_filter_with_level("warn", Level::INFO))
        .with(telemetry::layer())
        .init();

    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!(error = %e, ".env could not be parsed");
        }
    }

    let state = match AppState::from_env() {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "startup configuration failed");
            eprintln!("fatal: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!("agri-advisor starting");
    match api::start(state).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "server terminated");
            ExitCode::FAILURE
        }
    }
}
