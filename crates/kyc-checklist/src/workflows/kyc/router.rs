use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::ChecklistError;
use super::effects::{GeolocationProvider, Navigator, NotificationSink};
use super::repository::{RepositoryError, SessionId, SessionRepository};
use super::service::{ChecklistService, ChecklistServiceError, OpenSessionRequest};
use super::session::UploadOutcome;

/// Router builder exposing HTTP endpoints for the checklist workflow.
pub fn checklist_router<R, N, G, V>(service: Arc<ChecklistService<R, N, G, V>>) -> Router
where
    R: SessionRepository + 'static,
    N: NotificationSink + 'static,
    G: GeolocationProvider + 'static,
    V: Navigator + 'static,
{
    Router::new()
        .route("/api/v1/kyc/sessions", post(open_handler::<R, N, G, V>))
        .route(
            "/api/v1/kyc/sessions/:session_id",
            get(session_handler::<R, N, G, V>),
        )
        .route(
            "/api/v1/kyc/sessions/:session_id/location",
            post(location_handler::<R, N, G, V>),
        )
        .route(
            "/api/v1/kyc/sessions/:session_id/selection",
            post(selection_handler::<R, N, G, V>),
        )
        .route(
            "/api/v1/kyc/sessions/:session_id/uploads",
            post(upload_handler::<R, N, G, V>),
        )
        .route(
            "/api/v1/kyc/sessions/:session_id/preview/:document",
            get(preview_handler::<R, N, G, V>),
        )
        .route(
            "/api/v1/kyc/catalog/:user_type",
            get(catalog_handler::<R, N, G, V>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct DocumentPayload {
    pub(crate) document: String,
}

fn error_response(err: ChecklistServiceError) -> Response {
    let status = match &err {
        ChecklistServiceError::Checklist(ChecklistError::UnknownUserType(_))
        | ChecklistServiceError::Checklist(ChecklistError::EmptyDocumentName)
        | ChecklistServiceError::Checklist(ChecklistError::NothingRemaining)
        | ChecklistServiceError::Checklist(ChecklistError::DocumentNotPending(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ChecklistServiceError::Checklist(ChecklistError::LocationNotCaptured)
        | ChecklistServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ChecklistServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn open_handler<R, N, G, V>(
    State(service): State<Arc<ChecklistService<R, N, G, V>>>,
    axum::Json(request): axum::Json<OpenSessionRequest>,
) -> Response
where
    R: SessionRepository + 'static,
    N: NotificationSink + 'static,
    G: GeolocationProvider + 'static,
    V: Navigator + 'static,
{
    match service.open(request) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn session_handler<R, N, G, V>(
    State(service): State<Arc<ChecklistService<R, N, G, V>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    N: NotificationSink + 'static,
    G: GeolocationProvider + 'static,
    V: Navigator + 'static,
{
    match service.get(&SessionId(session_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn location_handler<R, N, G, V>(
    State(service): State<Arc<ChecklistService<R, N, G, V>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    N: NotificationSink + 'static,
    G: GeolocationProvider + 'static,
    V: Navigator + 'static,
{
    match service.capture_location(&SessionId(session_id)) {
        Ok(capture) => (StatusCode::OK, axum::Json(capture)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn selection_handler<R, N, G, V>(
    State(service): State<Arc<ChecklistService<R, N, G, V>>>,
    Path(session_id): Path<String>,
    axum::Json(payload): axum::Json<DocumentPayload>,
) -> Response
where
    R: SessionRepository + 'static,
    N: NotificationSink + 'static,
    G: GeolocationProvider + 'static,
    V: Navigator + 'static,
{
    match service.select_document(&SessionId(session_id), &payload.document) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn upload_handler<R, N, G, V>(
    State(service): State<Arc<ChecklistService<R, N, G, V>>>,
    Path(session_id): Path<String>,
    axum::Json(payload): axum::Json<DocumentPayload>,
) -> Response
where
    R: SessionRepository + 'static,
    N: NotificationSink + 'static,
    G: GeolocationProvider + 'static,
    V: Navigator + 'static,
{
    match service.record_upload(&SessionId(session_id), &payload.document) {
        Ok(receipt) => {
            if receipt.outcome == UploadOutcome::Completed {
                let service = service.clone();
                tokio::spawn(async move {
                    if let Err(err) = service.completion_redirect().await {
                        tracing::warn!(error = %err, "post-completion redirect failed");
                    }
                });
            }
            (StatusCode::OK, axum::Json(receipt)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn preview_handler<R, N, G, V>(
    State(service): State<Arc<ChecklistService<R, N, G, V>>>,
    Path((session_id, document)): Path<(String, String)>,
) -> Response
where
    R: SessionRepository + 'static,
    N: NotificationSink + 'static,
    G: GeolocationProvider + 'static,
    V: Navigator + 'static,
{
    match service.preview(&SessionId(session_id), &document) {
        Ok(preview) => (StatusCode::OK, axum::Json(preview)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn catalog_handler<R, N, G, V>(
    State(service): State<Arc<ChecklistService<R, N, G, V>>>,
    Path(user_type): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    N: NotificationSink + 'static,
    G: GeolocationProvider + 'static,
    V: Navigator + 'static,
{
    match service.catalog_listing(&user_type) {
        Ok(listing) => (StatusCode::OK, axum::Json(listing)).into_response(),
        Err(err) => error_response(err),
    }
}
