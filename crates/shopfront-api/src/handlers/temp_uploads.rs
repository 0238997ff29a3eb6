//! Staged image uploads and their cleanup.
//!
//! Images are uploaded while an admin form is being filled in. Each upload is
//! written under `temp-uploads/{category}/` and tracked under the request's
//! upload session until the form is submitted (promotion) or abandoned
//! (cleanup / sweep).

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Multipart, Query, State},
    http::StatusCode,
    Json,
};
use shopfront_core::models::{
    AssetCategory, CleanupRequest, CleanupResponse, DiscardQuery, TempUploadResponse,
};
use shopfront_core::AppError;

use crate::error::{ErrorResponse, HttpAppError};
use crate::middleware::UploadSessionId;
use crate::state::AppState;
use crate::utils::upload::read_image_upload;

async fn stage_image(
    state: &AppState,
    session: UploadSessionId,
    category: AssetCategory,
    multipart: Multipart,
) -> Result<(StatusCode, Json<TempUploadResponse>), HttpAppError> {
    let upload = read_image_upload(multipart, &state.config.uploads).await?;

    tracing::debug!(
        filename = %upload.filename,
        content_type = %upload.content_type,
        size_bytes = upload.data.len(),
        "Staging image upload"
    );

    let asset = state
        .assets
        .stage_upload(
            session.as_str(),
            category,
            &upload.extension,
            upload.data,
            &upload.content_type,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TempUploadResponse::new(asset, session.0)),
    ))
}

/// Upload a product image into the staging area
#[utoipa::path(
    post,
    path = "/api/v1/temp-uploads/products",
    tag = "temp-uploads",
    params(
        ("x-upload-session" = Option<String>, Header, description = "Upload session id; generated and echoed back when absent")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Image staged", body = TempUploadResponse),
        (status = 400, description = "Invalid file", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(session_id = %session.0, category = "products"))]
pub async fn upload_product_image(
    State(state): State<Arc<AppState>>,
    session: UploadSessionId,
    multipart: Multipart,
) -> Result<(StatusCode, Json<TempUploadResponse>), HttpAppError> {
    stage_image(&state, session, AssetCategory::Product, multipart).await
}

/// Upload a hero (advertisement) image into the staging area
#[utoipa::path(
    post,
    path = "/api/v1/temp-uploads/hero",
    tag = "temp-uploads",
    params(
        ("x-upload-session" = Option<String>, Header, description = "Upload session id; generated and echoed back when absent")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Image staged", body = TempUploadResponse),
        (status = 400, description = "Invalid file", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(session_id = %session.0, category = "hero"))]
pub async fn upload_hero_image(
    State(state): State<Arc<AppState>>,
    session: UploadSessionId,
    multipart: Multipart,
) -> Result<(StatusCode, Json<TempUploadResponse>), HttpAppError> {
    stage_image(&state, session, AssetCategory::Hero, multipart).await
}

/// Upload a category image into the staging area
#[utoipa::path(
    post,
    path = "/api/v1/temp-uploads/categories",
    tag = "temp-uploads",
    params(
        ("x-upload-session" = Option<String>, Header, description = "Upload session id; generated and echoed back when absent")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Image staged", body = TempUploadResponse),
        (status = 400, description = "Invalid file", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(session_id = %session.0, category = "categories"))]
pub async fn upload_category_image(
    State(state): State<Arc<AppState>>,
    session: UploadSessionId,
    multipart: Multipart,
) -> Result<(StatusCode, Json<TempUploadResponse>), HttpAppError> {
    stage_image(&state, session, AssetCategory::Category, multipart).await
}

/// Discard one staged image of the current session (e.g. removed from the form)
#[utoipa::path(
    delete,
    path = "/api/v1/temp-uploads",
    tag = "temp-uploads",
    params(
        DiscardQuery,
        ("x-upload-session" = String, Header, description = "Upload session that staged the image")
    ),
    responses(
        (status = 204, description = "Staged image discarded"),
        (status = 404, description = "Key not staged in this session", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(session_id = %session.0, key = %query.key))]
pub async fn discard_temp_upload(
    State(state): State<Arc<AppState>>,
    session: UploadSessionId,
    Query(query): Query<DiscardQuery>,
) -> Result<StatusCode, HttpAppError> {
    state
        .assets
        .discard_temp_asset(session.as_str(), &query.key)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete every staged image of a session.
///
/// Called when the admin form is cancelled or the page unloads. The session
/// id comes from the JSON body or, when absent, from the session header. The
/// body may be empty or sent as `text/plain` (beacon requests).
#[utoipa::path(
    post,
    path = "/api/v1/temp-uploads/cleanup",
    tag = "temp-uploads",
    request_body(content = CleanupRequest, description = "Optional; falls back to the session header"),
    responses(
        (status = 200, description = "Session cleaned up", body = CleanupResponse),
        (status = 400, description = "Malformed body", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, body))]
pub async fn cleanup_temp_uploads(
    State(state): State<Arc<AppState>>,
    session: UploadSessionId,
    body: Bytes,
) -> Result<Json<CleanupResponse>, HttpAppError> {
    let request: CleanupRequest = if body.iter().all(u8::is_ascii_whitespace) {
        CleanupRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(AppError::from)?
    };

    let session_id = request
        .session_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or(session.0);

    let report = state.assets.cleanup_session(&session_id).await;

    Ok(Json(CleanupResponse {
        success: report.failed == 0,
        session_id: report.session_id,
        deleted: report.deleted,
        failed: report.failed,
    }))
}
