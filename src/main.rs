use std::sync::Arc;

use mindcare_api::config::Config;
use mindcare_api::services::gemini;
use mindcare_api::store::Datastore;
use mindcare_api::{error, router, AppState};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mindcare_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env());
    error::set_development_mode(config.development);

    // Database: connect + migrate, refuse to start on failure
    let store = mindcare_api::store::connect(&config)
        .await
        .expect("Failed to connect to database");
    tracing::info!(backend = store.backend_name(), "Database ready");

    // Gemini: degrade with a warning rather than refusing to start
    if config.gemini_api_key.is_some() {
        tokio::spawn(validate_gemini_key(config.clone()));
    } else {
        tracing::warn!(
            "GEMINI_API_KEY is not set; the chatbot will be unavailable until a key is provided"
        );
    }

    let state = AppState {
        store,
        config: config.clone(),
    };
    let app = router(state);

    let addr = config.listen_addr();
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

/// Fire a minimal request at the provider so a bad key shows up in the logs
/// at startup. The server starts either way.
async fn validate_gemini_key(config: Arc<Config>) {
    match gemini::generate(&config, "test").await {
        Ok(_) => tracing::info!("Gemini API key validated"),
        Err(e) => {
            tracing::warn!(
                error = %e.message,
                "Gemini API key validation failed; the chatbot will not work until a valid key is provided"
            );
            if matches!(e.status, Some(401) | Some(403)) {
                tracing::warn!("Check that GEMINI_API_KEY is correct");
            }
        }
    }
}
