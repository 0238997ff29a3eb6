use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use shopfront_core::models::{Advertisement, AssetCategory, CreateAdvertisementRequest};
use shopfront_core::AppError;
use validator::Validate;

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::middleware::UploadSessionId;
use crate::state::AppState;

/// Create an advertisement (hero banner)
///
/// `image_url` is promoted into `hero/` and `category_image_url` into
/// `categories/` when they reference staged uploads.
#[utoipa::path(
    post,
    path = "/api/v1/advertisements",
    tag = "advertisements",
    params(
        ("x-upload-session" = Option<String>, Header, description = "Upload session that staged the images")
    ),
    request_body = CreateAdvertisementRequest,
    responses(
        (status = 201, description = "Advertisement created", body = Advertisement),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(session_id = %session.0))]
pub async fn create_advertisement(
    State(state): State<Arc<AppState>>,
    session: UploadSessionId,
    ValidatedJson(mut request): ValidatedJson<CreateAdvertisementRequest>,
) -> Result<(StatusCode, Json<Advertisement>), HttpAppError> {
    request.validate().map_err(AppError::from)?;

    let _active = state.assets.activate(session.as_str());
    request.image_url = state
        .assets
        .promote_url(&request.image_url, AssetCategory::Hero)
        .await;
    if let Some(url) = request.category_image_url.take() {
        request.category_image_url = Some(
            state
                .assets
                .promote_url(&url, AssetCategory::Category)
                .await,
        );
    }

    let advertisement = state.catalog.create_advertisement(request).await?;

    tracing::info!(advertisement_id = %advertisement.id, "Advertisement created");

    Ok((StatusCode::CREATED, Json(advertisement)))
}

#[utoipa::path(
    get,
    path = "/api/v1/advertisements",
    tag = "advertisements",
    responses(
        (status = 200, description = "Advertisements", body = Vec<Advertisement>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_advertisements(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Advertisement>>, HttpAppError> {
    let advertisements = state.catalog.list_advertisements().await?;
    Ok(Json(advertisements))
}
