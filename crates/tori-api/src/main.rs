use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tori_api::{build_router, config::Config, state::AppState};
use tori_conversation::ConversationService;
use tori_llm::ClientFactory;
use tori_persist::FirebaseClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!("Starting Tori API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    tracing::info!("Initializing OpenAI client");
    let llm_client = ClientFactory::create_openai_client(config.openai())?;

    tracing::info!("Initializing Firebase client");
    let mut store = FirebaseClient::builder()
        .database_url(&config.firebase_database_url)
        .conversations_path(&config.firebase.conversations_path);
    if let Some(token) = &config.firebase_auth_token {
        store = store.auth_token(token);
    }
    let store = store.build()?;

    let service = ConversationService::builder()
        .llm_client(llm_client)
        .store(Arc::new(store))
        .driver_config(config.driver_config())
        .summary_config(config.summary_config())
        .thread_retry(config.retry_policy())
        .fallback_message(&config.conversation.fallback_message)
        .build()?;

    let state = Arc::new(AppState::new(config.clone(), service));
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("API docs: http://{}/api/docs", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
