use crate::api::{handlers, AppState};
use crate::metrics::track_http_metrics;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

/// Build the main API router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // System endpoints
        .route("/", get(handlers::system_info))
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        .route("/auth/me", get(handlers::current_user))
        // Knowledge entries
        .route(
            "/conhecimentos",
            post(handlers::create_entry).get(handlers::list_entries),
        )
        .route("/conhecimentos/:id", get(handlers::get_entry))
        .route("/conhecimentos/:id/votar", post(handlers::vote_entry))
        .route("/conhecimentos/:id/validar", post(handlers::validate_entry))
        .route(
            "/conhecimentos/:id/comentarios",
            post(handlers::add_comment).get(handlers::list_comments),
        )
        // Dashboard and search
        .route("/estatisticas", get(handlers::statistics))
        .route("/buscar-inteligente", get(handlers::smart_search))
        .route("/auditoria", get(handlers::recent_audit))
        // Chat relay
        .route("/whatsapp/webhook", post(handlers::chat_webhook))
        // Request counting needs the matched route, so it is a route layer
        .route_layer(middleware::from_fn(track_http_metrics))
        // Add state
        .with_state(state)
        // Add middleware
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(false))
                .on_response(DefaultOnResponse::new()),
        )
        .layer(CorsLayer::permissive())
}
