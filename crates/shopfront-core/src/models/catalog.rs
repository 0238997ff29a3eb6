use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Product as persisted in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub category: String,
    pub stock: i32,
    /// Permanent (or, after a failed promotion, staged) image URLs
    pub image_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Hero banner / advertisement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Advertisement {
    pub id: Uuid,
    pub title: String,
    pub subtitle: Option<String>,
    pub link_url: Option<String>,
    pub image_url: String,
    pub category_image_url: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        return Err(ValidationError::new("price_negative"));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: String,
    #[schema(value_type = f64)]
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
    #[validate(length(min = 1, max = 100, message = "Category must be between 1 and 100 characters"))]
    pub category: String,
    #[serde(default)]
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i32,
    /// Staged URLs returned by the upload endpoint or already permanent URLs
    #[serde(default)]
    #[validate(length(max = 10, message = "Too many images"))]
    pub image_urls: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,
    #[schema(value_type = Option<f64>)]
    #[validate(custom(function = "validate_price"))]
    pub price: Option<Decimal>,
    #[validate(length(min = 1, max = 100, message = "Category must be between 1 and 100 characters"))]
    pub category: Option<String>,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: Option<i32>,
    #[validate(length(max = 10, message = "Too many images"))]
    pub image_urls: Option<Vec<String>>,
}

impl UpdateProductRequest {
    /// Apply the provided fields onto an existing product
    pub fn apply_to(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(image_urls) = self.image_urls {
            product.image_urls = image_urls;
        }
        product.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateAdvertisementRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    #[validate(length(max = 500, message = "Subtitle must be at most 500 characters"))]
    pub subtitle: Option<String>,
    #[validate(url(message = "Link must be a valid URL"))]
    pub link_url: Option<String>,
    /// Hero image: staged URL or already permanent URL
    #[validate(length(min = 1, message = "Image URL is required"))]
    pub image_url: String,
    pub category_image_url: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Pagination for list endpoints
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

impl ListQuery {
    pub fn clamped(&self) -> (i64, i64) {
        (self.limit.clamp(1, 100), self.offset.max(0))
    }
}
