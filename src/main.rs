use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mediocrity::{api, config::ServerConfig, deck::CardPools, state::AppState, ws};

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mediocrity=debug,tower_http=debug,axum=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Prompts against Mediocrity...");

    let config = ServerConfig::from_env();

    // Card pools are read once here and deep-copied into every room.
    let pools = match CardPools::load(&config.data_dir) {
        Ok(pools) => {
            tracing::info!(
                prompts = pools.prompts.len(),
                answers = pools.answers.len(),
                "card pools loaded"
            );
            pools
        }
        Err(e) => {
            tracing::error!("Failed to load card pools: {}", e);
            std::process::exit(1);
        }
    };

    let state = Arc::new(AppState::new(pools));

    let app = Router::new()
        .route("/ws", get(ws::ws_handler))
        .route("/hand", get(api::get_hand))
        .route("/submissions", get(api::get_submissions))
        .fallback_service(ServeDir::new(&config.public_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
