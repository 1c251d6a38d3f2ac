use crate::api::{AppState, DEFAULT_PAGE_SIZE};
use crate::auth::{AuthUser, UserInfo};
use crate::chat::WebhookEvent;
use crate::error::{AppError, Result};
use crate::knowledge::{NewComment, NewEntry, Statistics};
use crate::models::*;
use crate::state::EntryFilter;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::Validate;

/// System identification
pub async fn system_info(State(state): State<AppState>) -> Json<SystemInfo> {
    Json(SystemInfo {
        system: "Base de Conhecimento IFSP Licitações".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        campus: state.service.campus().to_string(),
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SystemInfo {
    #[serde(rename = "sistema")]
    pub system: String,
    #[serde(rename = "versao")]
    pub version: String,
    pub campus: String,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Prometheus metrics endpoint
pub async fn metrics(State(state): State<AppState>) -> (StatusCode, String) {
    crate::metrics::UPTIME_SECONDS.set(state.started_at.elapsed().as_secs_f64());
    (StatusCode::OK, crate::metrics::gather_metrics())
}

/// The authenticated caller
pub async fn current_user(user: AuthUser) -> Json<UserInfo> {
    Json(user.0)
}

/// Create an entry
pub async fn create_entry(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateEntryRequest>,
) -> Result<(StatusCode, Json<Entry>)> {
    request.validate()?;

    let entry = state
        .service
        .create_entry(
            NewEntry {
                title: request.titulo,
                question: request.pergunta,
                answer: request.resposta,
                modality: request.modalidade,
                phase: request.fase,
                tags: request.tags,
                campus: request.campus,
            },
            user.name(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(entry)))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateEntryRequest {
    #[validate(length(min = 1, max = 500))]
    pub titulo: String,
    #[validate(length(min = 1))]
    pub pergunta: String,
    #[validate(length(min = 1))]
    pub resposta: String,
    pub modalidade: Option<Modality>,
    pub fase: Option<ProcessPhase>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub tags: Vec<String>,
    pub campus: Option<String>,
}

/// List entries, best voted first
pub async fn list_entries(
    State(state): State<AppState>,
    Query(params): Query<ListEntriesQuery>,
) -> Result<Json<Vec<Entry>>> {
    let filter = EntryFilter {
        modality: params.modalidade,
        phase: params.fase,
        status: params.status,
        tag: params.tag.filter(|t| !t.is_empty()),
        text: params.busca.filter(|b| !b.trim().is_empty()),
        offset: params.offset.unwrap_or(0),
        limit: params
            .limite
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(state.max_page_size),
    };

    Ok(Json(state.service.list_entries(&filter).await?))
}

#[derive(Debug, Deserialize)]
pub struct ListEntriesQuery {
    pub modalidade: Option<Modality>,
    pub fase: Option<ProcessPhase>,
    pub status: Option<EntryStatus>,
    pub tag: Option<String>,
    pub busca: Option<String>,
    pub limite: Option<usize>,
    pub offset: Option<usize>,
}

/// Get an entry (counts a view)
pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Entry>> {
    Ok(Json(state.service.get_entry(id).await?))
}

/// Vote on an entry
pub async fn vote_entry(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    user: AuthUser,
    Json(request): Json<VoteRequest>,
) -> Result<Json<ActionResponse>> {
    let entry = state
        .service
        .vote(id, user.username(), request.tipo_voto)
        .await?;

    Ok(Json(ActionResponse {
        message: "Voto registrado com sucesso".to_string(),
        entry,
    }))
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub tipo_voto: VoteKind,
}

/// Validate an entry; the caller is recorded as validator
pub async fn validate_entry(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    user: AuthUser,
    Query(params): Query<ValidateParams>,
) -> Result<Json<ActionResponse>> {
    let entry = state
        .service
        .validate(id, user.name(), &params.cargo)
        .await?;

    Ok(Json(ActionResponse {
        message: "Conhecimento validado com sucesso".to_string(),
        entry,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ValidateParams {
    #[serde(default)]
    pub cargo: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActionResponse {
    #[serde(rename = "mensagem")]
    pub message: String,
    #[serde(rename = "conhecimento")]
    pub entry: Entry,
}

/// Comment on an entry
pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    user: AuthUser,
    Json(request): Json<CommentRequest>,
) -> Result<(StatusCode, Json<Comment>)> {
    request.validate()?;

    let comment = state
        .service
        .add_comment(
            id,
            user.name(),
            NewComment {
                text: request.texto,
                role: request.cargo,
                kind: request.tipo.unwrap_or_default(),
                reply_to: request.resposta_para,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(min = 1, max = 5000))]
    pub texto: String,
    pub cargo: Option<String>,
    pub tipo: Option<CommentKind>,
    pub resposta_para: Option<u64>,
}

pub async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Vec<Comment>>> {
    Ok(Json(state.service.list_comments(id).await?))
}

/// Dashboard statistics
pub async fn statistics(State(state): State<AppState>) -> Result<Json<Statistics>> {
    Ok(Json(state.service.statistics().await?))
}

/// Ranked search with suggested tags
pub async fn smart_search(
    State(state): State<AppState>,
    Query(params): Query<SmartSearchParams>,
) -> Result<Json<SmartSearchResponse>> {
    let outcome = state.service.smart_search(&params.q).await?;

    Ok(Json(SmartSearchResponse {
        results: outcome.hits.into_iter().map(|hit| hit.entry).collect(),
        suggested_tags: outcome.suggested_tags,
        total_found: outcome.total_found,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SmartSearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SmartSearchResponse {
    #[serde(rename = "resultados")]
    pub results: Vec<Entry>,
    #[serde(rename = "tags_sugeridas")]
    pub suggested_tags: Vec<String>,
    #[serde(rename = "total_encontrados")]
    pub total_found: usize,
}

/// Most recent state-changing actions
pub async fn recent_audit(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<AuditQuery>,
) -> Result<Json<Vec<AuditEvent>>> {
    let limit = params
        .limite
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .min(state.max_page_size);
    Ok(Json(state.service.store().recent_audit(limit).await?))
}

#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    pub limite: Option<usize>,
}

/// Chat provider webhook; replies are sent in the background
pub async fn chat_webhook(
    State(state): State<AppState>,
    Json(event): Json<WebhookEvent>,
) -> Result<Json<Value>> {
    let relay = state
        .chat
        .as_ref()
        .ok_or_else(|| AppError::NotFound("Chat relay is disabled".to_string()))?;

    relay.dispatch(event.message);
    Ok(Json(json!({ "status": "ok" })))
}
