use chrono::Utc;
use shopfront_core::models::{Advertisement, CreateAdvertisementRequest, CreateProductRequest, Product};
use shopfront_core::AppError;
use sqlx::PgPool;
use uuid::Uuid;

/// Trait for catalog repository operations
/// This abstracts the database implementation (PostgreSQL)
#[async_trait::async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Persist a new product. `request.image_urls` must already be final URLs.
    async fn create_product(&self, request: CreateProductRequest) -> Result<Product, AppError>;

    async fn get_product(&self, id: Uuid) -> Result<Option<Product>, AppError>;

    async fn list_products(&self, limit: i64, offset: i64) -> Result<Vec<Product>, AppError>;

    /// Overwrite every mutable column of an existing product
    async fn update_product(&self, product: Product) -> Result<Product, AppError>;

    async fn create_advertisement(
        &self,
        request: CreateAdvertisementRequest,
    ) -> Result<Advertisement, AppError>;

    async fn list_advertisements(&self) -> Result<Vec<Advertisement>, AppError>;
}

/// PostgreSQL implementation of catalog repository
#[derive(Clone)]
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, category, stock, image_urls, created_at, updated_at";

const ADVERTISEMENT_COLUMNS: &str =
    "id, title, subtitle, link_url, image_url, category_image_url, active, created_at";

#[async_trait::async_trait]
impl CatalogRepository for PgCatalogRepository {
    #[tracing::instrument(skip(self, request), fields(name = %request.name))]
    async fn create_product(&self, request: CreateProductRequest) -> Result<Product, AppError> {
        let now = Utc::now();

        // Use dynamic SQLx queries to avoid requiring DATABASE_URL/sqlx prepare
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (
                id, name, description, price, category, stock, image_urls, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(request.name)
        .bind(request.description)
        .bind(request.price)
        .bind(request.category)
        .bind(request.stock)
        .bind(request.image_urls)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(product_id = %product.id, "Product created");

        Ok(product)
    }

    async fn get_product(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn list_products(&self, limit: i64, offset: i64) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    #[tracing::instrument(skip(self, product), fields(product_id = %product.id))]
    async fn update_product(&self, product: Product) -> Result<Product, AppError> {
        let updated = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET name = $2, description = $3, price = $4, category = $5,
                stock = $6, image_urls = $7, updated_at = $8
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.category)
        .bind(product.stock)
        .bind(&product.image_urls)
        .bind(product.updated_at)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| AppError::NotFound(format!("Product {} not found", product.id)))
    }

    #[tracing::instrument(skip(self, request), fields(title = %request.title))]
    async fn create_advertisement(
        &self,
        request: CreateAdvertisementRequest,
    ) -> Result<Advertisement, AppError> {
        let advertisement = sqlx::query_as::<_, Advertisement>(&format!(
            r#"
            INSERT INTO advertisements (
                id, title, subtitle, link_url, image_url, category_image_url, active, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {ADVERTISEMENT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(request.title)
        .bind(request.subtitle)
        .bind(request.link_url)
        .bind(request.image_url)
        .bind(request.category_image_url)
        .bind(request.active)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(advertisement_id = %advertisement.id, "Advertisement created");

        Ok(advertisement)
    }

    async fn list_advertisements(&self) -> Result<Vec<Advertisement>, AppError> {
        let advertisements = sqlx::query_as::<_, Advertisement>(&format!(
            "SELECT {ADVERTISEMENT_COLUMNS} FROM advertisements ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(advertisements)
    }
}
