//! Route handlers.
//!
//! Handlers hold the CRUD glue only; every cross-cutting concern (rate
//! limiting, correlation, error rendering) lives in the pipeline. Fallible
//! handlers return `Result<_, ApiError>` and never build responses by hand.

use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::http::correlation::CorrelationId;
use crate::http::extract::{Json, Path, Query};
use crate::http::problem::{ApiError, FieldError};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::store::items::MAX_NAME_LEN;
use crate::store::{Feature, FeatureCreate, Item, VoteRequest};
use crate::upload::{validate, UploadStore};

/// Default number of entries returned by `/features/top`.
const DEFAULT_TOP_LIMIT: usize = 5;

#[derive(Serialize)]
pub struct ServiceInfo {
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub filename: String,
    pub size: usize,
    pub message: &'static str,
}

#[derive(Deserialize)]
pub struct TopQuery {
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct CreateItemQuery {
    pub name: String,
}

pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "feature-board is running",
    })
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus { status: "ok" })
}

/// Fallback for unmatched routes, rendered as an http-category problem.
pub async fn not_found() -> ApiError {
    ApiError::http(StatusCode::NOT_FOUND, "Not Found")
}

pub async fn list_features(State(state): State<AppState>) -> Json<Vec<Feature>> {
    Json(state.features.list())
}

pub async fn create_feature(
    State(state): State<AppState>,
    Json(data): Json<FeatureCreate>,
) -> Result<Json<Feature>, ApiError> {
    let data = data.normalized().map_err(ApiError::validation_error)?;
    Ok(Json(state.features.create(data)))
}

pub async fn top_features(
    State(state): State<AppState>,
    Query(query): Query<TopQuery>,
) -> Result<Json<Vec<Feature>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_TOP_LIMIT);
    if !(1..=100).contains(&limit) {
        return Err(ApiError::validation(vec![FieldError::new(
            "query.limit",
            "must be between 1 and 100",
        )]));
    }
    Ok(Json(state.features.top(limit)))
}

pub async fn get_feature(
    State(state): State<AppState>,
    Path(feature_id): Path<u64>,
) -> Result<Json<Feature>, ApiError> {
    state
        .features
        .get(feature_id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("feature not found"))
}

pub async fn vote_feature(
    State(state): State<AppState>,
    Path(feature_id): Path<u64>,
    Json(vote): Json<VoteRequest>,
) -> Result<Json<Feature>, ApiError> {
    if vote.value != 1 && vote.value != -1 {
        return Err(ApiError::validation_error("vote must be +1 or -1"));
    }
    state
        .features
        .vote(feature_id, vote.value)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("feature not found"))
}

pub async fn create_item(
    State(state): State<AppState>,
    Query(query): Query<CreateItemQuery>,
) -> Result<Json<Item>, ApiError> {
    if query.name.is_empty() || query.name.chars().count() > MAX_NAME_LEN {
        return Err(ApiError::validation_error("name must be 1..100 chars"));
    }
    Ok(Json(state.items.create(query.name)))
}

pub async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<u64>,
) -> Result<Json<Item>, ApiError> {
    state
        .items
        .get(item_id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("item not found"))
}

/// Multipart upload: validate content, persist under a generated name.
pub async fn upload_file(
    State(state): State<AppState>,
    correlation: CorrelationId,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart
        .map_err(|rejection| ApiError::validation(vec![FieldError::new("body", rejection.body_text())]))?;

    let mut file: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("unknown").to_string();
            let content = field.bytes().await.map_err(multipart_error)?;
            file = Some((filename, content.to_vec()));
            break;
        }
    }
    let (filename, content) =
        file.ok_or_else(|| ApiError::validation(vec![FieldError::new("file", "field required")]))?;

    let extension = validate(&content, &filename, state.upload_max_bytes).map_err(|rejection| {
        metrics::record_upload("rejected");
        ApiError::validation_error(rejection.to_string())
    })?;

    // Path-safety failures here are invariant violations, not client errors.
    let safe_name = UploadStore::safe_filename(&extension);
    state
        .uploads
        .save(&content, &safe_name)
        .await
        .map_err(|err| ApiError::internal(err.to_string()))?;

    metrics::record_upload("accepted");
    tracing::info!(
        correlation_id = %correlation,
        filename = %safe_name,
        size = content.len(),
        "File uploaded"
    );
    Ok(Json(UploadResponse {
        filename: safe_name,
        size: content.len(),
        message: "File uploaded successfully",
    }))
}

fn multipart_error(err: MultipartError) -> ApiError {
    ApiError::validation(vec![FieldError::new("body", err.to_string())])
}
