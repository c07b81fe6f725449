//! Companion HTTP server binary.
//!
//! Starts an axum HTTP server in front of the decision pipeline.
//!
//! # Environment Variables
//!
//! - `PORT` HTTP port (default: 8080)
//! - `COMPANION_CONFIG` pipeline YAML configuration (optional)
//! - `COMPANION_QTABLE_PATH`, `COMPANION_PERSONA_FILE`, `COMPANION_EPSILON`
//!   override the configuration file
//! - `RUST_LOG` tracing filter (default: "info,companion=debug")
//!
//! # Usage
//!
//! ```bash
//! COMPANION_CONFIG=config/companion.yaml cargo run --bin server
//! ```

use std::path::PathBuf;

use anyhow::Context;
use companion::config::CompanionConfig;
use companion::pipeline::DecisionPipeline;
use companion::server::{app_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,companion=debug".into()),
        )
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let bind_addr = format!("0.0.0.0:{}", port);

    let config_path = std::env::var("COMPANION_CONFIG").ok().map(PathBuf::from);
    let config = CompanionConfig::load(config_path.as_deref())
        .context("Failed to load companion configuration")?;

    let state = AppState::new(DecisionPipeline::from_config(&config));
    let app = app_router(state);

    tracing::info!("companion server starting on {}", bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health   liveness probe");
    tracing::info!("  GET  /personas persona descriptions");
    tracing::info!("  POST /decide   context snapshot to decision");
    tracing::info!("  POST /reward   learner feedback");
    tracing::info!("  GET  /learner  learner statistics");

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    axum::serve(listener, app).await.context("Server failed")?;
    Ok(())
}
