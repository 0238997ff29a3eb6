use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shopfront_core::models::{
    AssetCategory, CreateProductRequest, ListQuery, Product, UpdateProductRequest,
};
use shopfront_core::AppError;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::middleware::UploadSessionId;
use crate::state::AppState;

/// Create a product
///
/// Staged image URLs (returned by the temp-upload endpoints) are promoted to
/// permanent storage before the product is saved. A failed promotion keeps
/// the staged URL instead of failing the request.
#[utoipa::path(
    post,
    path = "/api/v1/products",
    tag = "products",
    params(
        ("x-upload-session" = Option<String>, Header, description = "Upload session that staged the images")
    ),
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(session_id = %session.0))]
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    session: UploadSessionId,
    ValidatedJson(mut request): ValidatedJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), HttpAppError> {
    request.validate().map_err(AppError::from)?;

    let _active = state.assets.activate(session.as_str());
    request.image_urls = state
        .assets
        .promote_urls(&request.image_urls, AssetCategory::Product)
        .await;

    let product = state.catalog.create_product(request).await?;

    tracing::info!(product_id = %product.id, images = product.image_urls.len(), "Product created");

    Ok((StatusCode::CREATED, Json(product)))
}

/// List products, newest first
#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "products",
    params(ListQuery),
    responses(
        (status = 200, description = "Products", body = Vec<Product>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>, HttpAppError> {
    let (limit, offset) = query.clamped();
    let products = state.catalog.list_products(limit, offset).await?;
    Ok(Json(products))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    tag = "products",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product", body = Product),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, HttpAppError> {
    let product = state
        .catalog
        .get_product(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))?;
    Ok(Json(product))
}

/// Update a product; newly staged image URLs are promoted like on create
#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    tag = "products",
    params(
        ("id" = Uuid, Path, description = "Product ID"),
        ("x-upload-session" = Option<String>, Header, description = "Upload session that staged the images")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(session_id = %session.0))]
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    session: UploadSessionId,
    ValidatedJson(mut request): ValidatedJson<UpdateProductRequest>,
) -> Result<Json<Product>, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    let mut product = state
        .catalog
        .get_product(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))?;

    let _active = state.assets.activate(session.as_str());
    if let Some(image_urls) = request.image_urls.take() {
        request.image_urls = Some(
            state
                .assets
                .promote_urls(&image_urls, AssetCategory::Product)
                .await,
        );
    }

    request.apply_to(&mut product);
    let product = state.catalog.update_product(product).await?;

    Ok(Json(product))
}
