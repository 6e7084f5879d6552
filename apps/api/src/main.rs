mod config;
mod errors;
mod interview;
mod llm_client;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::interview::chain::InterviewChain;
use crate::interview::store::SessionStore;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interview Chain API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.openai_api_key.clone(), config.openai_base_url.clone())?;
    if config.openai_api_key.is_none() {
        warn!("OPENAI_API_KEY is not set; generation requests will be rejected");
    }
    info!(
        "LLM client initialized (model: {}, endpoint: {}, resume names: {:?})",
        config.model, config.openai_base_url, config.resume_name_policy
    );

    let sessions = SessionStore::with_idle_ttl(config.session_idle_ttl);
    // Sweep four times per TTL.
    let _sweeper = sessions.spawn_sweeper(config.session_idle_ttl / 4);
    info!(
        "Session store ready (idle TTL: {}s)",
        config.session_idle_ttl.as_secs()
    );

    let state = AppState {
        chain: InterviewChain::new(Arc::new(llm), config.chain_settings()),
        sessions,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
