use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chaejeom_rs::config::Config;
use chaejeom_rs::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // .env for local development
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::load_from_default();
    if !config.is_key_configured() {
        tracing::warn!("OPENAI_API_KEY 환경 변수가 설정되지 않았습니다!");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config)?;

    tracing::info!("Starting grading API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, server::router(state)).await?;

    Ok(())
}
