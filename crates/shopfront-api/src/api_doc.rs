//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use shopfront_core::models;

/// Returns the OpenAPI spec served at `/api/openapi.json`.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shopfront Admin API",
        version = "0.1.0",
        description = "Storefront admin API (v1). Images are uploaded to a staging area first and promoted to permanent storage when the product or advertisement is saved. All endpoints are versioned under /api/v1/."
    ),
    paths(
        // Staged uploads
        handlers::temp_uploads::upload_product_image,
        handlers::temp_uploads::upload_hero_image,
        handlers::temp_uploads::upload_category_image,
        handlers::temp_uploads::discard_temp_upload,
        handlers::temp_uploads::cleanup_temp_uploads,
        // Products
        handlers::products::create_product,
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::products::update_product,
        // Advertisements
        handlers::advertisements::create_advertisement,
        handlers::advertisements::list_advertisements,
        // Health
        handlers::health::health_check,
    ),
    components(
        schemas(
            models::AssetCategory,
            models::TempUploadResponse,
            models::CleanupRequest,
            models::CleanupResponse,
            models::Product,
            models::CreateProductRequest,
            models::UpdateProductRequest,
            models::Advertisement,
            models::CreateAdvertisementRequest,
            handlers::health::HealthResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "temp-uploads", description = "Staged image uploads and session cleanup"),
        (name = "products", description = "Product catalog"),
        (name = "advertisements", description = "Hero banners"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_staging_endpoints() {
        let spec = get_openapi_spec();
        for path in [
            "/api/v1/temp-uploads/products",
            "/api/v1/temp-uploads/hero",
            "/api/v1/temp-uploads/categories",
            "/api/v1/temp-uploads/cleanup",
            "/api/v1/products/{id}",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
