use licita_kb::{
    api::{build_router, AppState},
    auth::create_authenticator,
    chat::ChatRelay,
    config::Config,
    knowledge::KnowledgeService,
    state::create_store,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("Using default configuration");
        Config::default()
    });

    init_tracing(&config);

    tracing::info!("Starting licita-kb v{}", env!("CARGO_PKG_VERSION"));

    if config.observability.prometheus_enabled {
        if let Err(e) = licita_kb::metrics::init_metrics() {
            tracing::warn!("Failed to initialize metrics: {}", e);
            tracing::warn!("Continuing without metrics");
        }
    } else {
        tracing::info!("Prometheus metrics disabled in configuration");
    }

    tracing::info!("Storage backend: {:?}", config.state.backend);
    let store = create_store(&config.state)?;

    let service = Arc::new(KnowledgeService::new(store, &config.cache, &config.knowledge));
    if config.knowledge.seed_examples {
        service.seed_examples().await?;
    }

    let authenticator = create_authenticator(&config.auth);

    let mut app_state = AppState::new(service.clone(), authenticator)
        .with_max_page_size(config.knowledge.max_page_size);

    if config.chat.enabled {
        match ChatRelay::from_config(service.clone(), &config.chat) {
            Ok(relay) => {
                app_state = app_state.with_chat(Arc::new(relay));
                tracing::info!(api_url = %config.chat.api_url, "Chat relay enabled");
            }
            Err(e) => {
                tracing::warn!("Chat relay initialization failed: {}", e);
                tracing::warn!("Continuing without chat relay");
            }
        }
    }

    let app = build_router(app_state);

    let http_addr = format!("{}:{}", config.server.host, config.server.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;

    tracing::info!("HTTP API server listening on http://{}", http_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutdown signal received");
        })
        .await?;

    tracing::info!("Shutting down gracefully...");
    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "licita_kb={},tower_http=info",
            config.observability.log_level
        )
        .into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.observability.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
