use super::HTTP_REQUESTS_TOTAL;
use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};

/// Count every request by method, route template and status.
///
/// Uses the matched route (`/conhecimentos/:id`) rather than the raw path
/// to keep label cardinality bounded.
pub async fn track_http_metrics(req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;

    HTTP_REQUESTS_TOTAL
        .with_label_values(&[&method, &path, response.status().as_str()])
        .inc();

    response
}
