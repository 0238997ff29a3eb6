//! Route configuration and setup

use crate::constants::{API_PREFIX, MULTIPART_OVERHEAD_BYTES};
use crate::handlers;
use crate::middleware::upload_session_middleware;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use shopfront_core::{Config, StorageBackend};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::constants::UPLOAD_SESSION_HEADER;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    // Server-level concurrency limit to protect against resource exhaustion under extreme load
    let http_concurrency_limit = config.server.http_concurrency_limit.max(1);
    crate::error::set_production_mode(config.is_production());

    let mut app = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        .merge(temp_upload_routes())
        .merge(catalog_routes())
        .with_state(state)
        .merge(utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"));

    if let Some((mount, dir)) = local_asset_mount(config) {
        tracing::info!(mount = %mount, dir = %dir, "Serving local storage assets");
        app = app.nest_service(&mount, ServeDir::new(dir));
    }

    let app = app
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(
            config.uploads.max_file_size_bytes + MULTIPART_OVERHEAD_BYTES,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(upload_session_middleware));

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let session_header = HeaderName::from_static(UPLOAD_SESSION_HEADER);

    let cors = if config.server.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
            .expose_headers([session_header])
    } else {
        let origins = config
            .server
            .cors_origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
            .expose_headers([session_header])
    };
    Ok(cors)
}

/// Staged upload routes
fn temp_upload_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/temp-uploads/products", API_PREFIX),
            post(handlers::temp_uploads::upload_product_image),
        )
        .route(
            &format!("{}/temp-uploads/hero", API_PREFIX),
            post(handlers::temp_uploads::upload_hero_image),
        )
        .route(
            &format!("{}/temp-uploads/categories", API_PREFIX),
            post(handlers::temp_uploads::upload_category_image),
        )
        .route(
            &format!("{}/temp-uploads/cleanup", API_PREFIX),
            post(handlers::temp_uploads::cleanup_temp_uploads),
        )
        .route(
            &format!("{}/temp-uploads", API_PREFIX),
            axum::routing::delete(handlers::temp_uploads::discard_temp_upload),
        )
}

/// Product and advertisement routes
fn catalog_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/products", API_PREFIX),
            post(handlers::products::create_product).get(handlers::products::list_products),
        )
        .route(
            &format!("{}/products/{{id}}", API_PREFIX),
            get(handlers::products::get_product).put(handlers::products::update_product),
        )
        .route(
            &format!("{}/advertisements", API_PREFIX),
            post(handlers::advertisements::create_advertisement)
                .get(handlers::advertisements::list_advertisements),
        )
}

/// Mount point and directory for serving locally stored assets, derived from
/// the path component of `LOCAL_STORAGE_BASE_URL`
fn local_asset_mount(config: &Config) -> Option<(String, String)> {
    if config.storage.backend != StorageBackend::Local {
        return None;
    }
    let dir = config.storage.local_storage_path.clone()?;
    let base_url = config.storage.local_storage_base_url.as_deref()?;
    let mount = url_path(base_url)?;
    Some((mount, dir))
}

fn url_path(url: &str) -> Option<String> {
    let after_scheme = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    let path = after_scheme.find('/').map(|i| &after_scheme[i..])?;
    let path = path.trim_end_matches('/');
    (!path.is_empty()).then(|| path.to_string())
}
