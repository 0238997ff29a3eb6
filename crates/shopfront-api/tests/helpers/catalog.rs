//! In-memory catalog so HTTP tests run without Postgres.

use chrono::Utc;
use shopfront_core::models::{
    Advertisement, CreateAdvertisementRequest, CreateProductRequest, Product,
};
use shopfront_core::AppError;
use shopfront_db::CatalogRepository;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryCatalog {
    products: Mutex<Vec<Product>>,
    advertisements: Mutex<Vec<Advertisement>>,
}

#[async_trait::async_trait]
impl CatalogRepository for InMemoryCatalog {
    async fn create_product(&self, request: CreateProductRequest) -> Result<Product, AppError> {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: request.name,
            description: request.description,
            price: request.price,
            category: request.category,
            stock: request.stock,
            image_urls: request.image_urls,
            created_at: now,
            updated_at: now,
        };
        self.products.lock().unwrap().push(product.clone());
        Ok(product)
    }

    async fn get_product(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn list_products(&self, limit: i64, offset: i64) -> Result<Vec<Product>, AppError> {
        let products = self.products.lock().unwrap();
        Ok(products
            .iter()
            .rev()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn update_product(&self, product: Product) -> Result<Product, AppError> {
        let mut products = self.products.lock().unwrap();
        let existing = products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or_else(|| AppError::NotFound(format!("Product {} not found", product.id)))?;
        *existing = product.clone();
        Ok(product)
    }

    async fn create_advertisement(
        &self,
        request: CreateAdvertisementRequest,
    ) -> Result<Advertisement, AppError> {
        let advertisement = Advertisement {
            id: Uuid::new_v4(),
            title: request.title,
            subtitle: request.subtitle,
            link_url: request.link_url,
            image_url: request.image_url,
            category_image_url: request.category_image_url,
            active: request.active,
            created_at: Utc::now(),
        };
        self.advertisements
            .lock()
            .unwrap()
            .push(advertisement.clone());
        Ok(advertisement)
    }

    async fn list_advertisements(&self) -> Result<Vec<Advertisement>, AppError> {
        Ok(self.advertisements.lock().unwrap().clone())
    }
}
