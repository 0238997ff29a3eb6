//! Product and advertisement API integration tests: staged images are
//! promoted to permanent storage when the entity is saved.
//!
//! Run with: `cargo test -p shopfront-api --test catalog_test`

mod helpers;

use helpers::uploads::{stage_png, str_field};
use helpers::{api_path, setup_test_app, ASSET_BASE_URL};
use serde_json::{json, Value};
use shopfront_api::constants::UPLOAD_SESSION_HEADER;
use shopfront_storage::Storage;

#[tokio::test]
async fn test_create_product_promotes_staged_images() {
    let app = setup_test_app().await;
    let client = app.client();

    let staged = stage_png(client, "products", "product-form").await;
    let staged_key = str_field(&staged, "key").to_string();
    let staged_url = str_field(&staged, "url").to_string();
    let external_url = "https://images.example.com/walnut-desk.jpg";

    let response = client
        .post(&api_path("/products"))
        .add_header(UPLOAD_SESSION_HEADER, "product-form")
        .json(&json!({
            "name": "Walnut desk",
            "description": "Solid walnut, oiled finish",
            "price": 249.99,
            "category": "furniture",
            "stock": 3,
            "image_urls": [staged_url, external_url]
        }))
        .await;

    assert_eq!(response.status_code(), 201, "{}", response.text());
    let product: Value = response.json();
    let image_urls = product["image_urls"].as_array().unwrap();
    assert_eq!(image_urls.len(), 2);

    let file_name = staged_key.rsplit('/').next().unwrap();
    let final_url = image_urls[0].as_str().unwrap();
    assert_eq!(final_url, format!("{}/products/{}", ASSET_BASE_URL, file_name));
    assert_eq!(image_urls[1], external_url);

    assert!(app.object_exists(&format!("products/{}", file_name)).await);
    assert!(!app.object_exists(&staged_key).await);
    assert!(app.state.assets.registry().assets("product-form").is_empty());
    assert!(!app.state.assets.is_session_active("product-form"));

    // Cancelling the form afterwards must not touch the promoted image
    let cleanup = client
        .post(&api_path("/temp-uploads/cleanup"))
        .add_header(UPLOAD_SESSION_HEADER, "product-form")
        .await;
    assert_eq!(cleanup.status_code(), 200);
    assert_eq!(cleanup.json::<Value>()["deleted"], 0);
    assert!(app.object_exists(&format!("products/{}", file_name)).await);
}

#[tokio::test]
async fn test_create_product_keeps_url_of_missing_staged_object() {
    let app = setup_test_app().await;
    let client = app.client();

    let staged = stage_png(client, "products", "form-gone").await;
    let staged_key = str_field(&staged, "key").to_string();
    app.storage.delete(&staged_key).await.unwrap();

    let response = client
        .post(&api_path("/products"))
        .add_header(UPLOAD_SESSION_HEADER, "form-gone")
        .json(&json!({
            "name": "Oak shelf",
            "price": 89.5,
            "category": "furniture",
            "image_urls": [str_field(&staged, "url")]
        }))
        .await;

    assert_eq!(response.status_code(), 201, "{}", response.text());
    let product: Value = response.json();
    let file_name = staged_key.rsplit('/').next().unwrap();
    assert_eq!(
        product["image_urls"][0],
        format!("{}/products/{}", ASSET_BASE_URL, file_name)
    );
    assert!(app.state.assets.registry().assets("form-gone").is_empty());
}

#[tokio::test]
async fn test_create_product_rejects_invalid_payload() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path("/products"))
        .json(&json!({
            "name": "",
            "price": 10,
            "category": "furniture"
        }))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_get_and_list_products() {
    let app = setup_test_app().await;
    let client = app.client();

    let created: Value = client
        .post(&api_path("/products"))
        .json(&json!({ "name": "Lamp", "price": 35, "category": "lighting" }))
        .await
        .json();
    let id = str_field(&created, "id");

    let fetched = client.get(&api_path(&format!("/products/{}", id))).await;
    assert_eq!(fetched.status_code(), 200);
    assert_eq!(fetched.json::<Value>()["name"], "Lamp");

    let listed = client.get(&api_path("/products")).await;
    assert_eq!(listed.status_code(), 200);
    assert_eq!(listed.json::<Value>().as_array().unwrap().len(), 1);

    let missing = client
        .get(&api_path(&format!("/products/{}", uuid::Uuid::new_v4())))
        .await;
    assert_eq!(missing.status_code(), 404);
}

#[tokio::test]
async fn test_update_product_promotes_new_images() {
    let app = setup_test_app().await;
    let client = app.client();

    let created: Value = client
        .post(&api_path("/products"))
        .json(&json!({
            "name": "Stool",
            "price": 40,
            "category": "furniture",
            "image_urls": ["https://images.example.com/stool.jpg"]
        }))
        .await
        .json();
    let id = str_field(&created, "id");

    let staged = stage_png(client, "products", "edit-form").await;
    let staged_key = str_field(&staged, "key");
    let file_name = staged_key.rsplit('/').next().unwrap();

    let response = client
        .put(&api_path(&format!("/products/{}", id)))
        .add_header(UPLOAD_SESSION_HEADER, "edit-form")
        .json(&json!({
            "stock": 12,
            "image_urls": ["https://images.example.com/stool.jpg", str_field(&staged, "url")]
        }))
        .await;

    assert_eq!(response.status_code(), 200, "{}", response.text());
    let product: Value = response.json();
    assert_eq!(product["stock"], 12);
    assert_eq!(product["name"], "Stool");
    assert_eq!(
        product["image_urls"][1],
        format!("{}/products/{}", ASSET_BASE_URL, file_name)
    );
    assert!(!app.object_exists(staged_key).await);
    assert!(app.state.assets.registry().assets("edit-form").is_empty());
}

#[tokio::test]
async fn test_update_unknown_product_returns_not_found() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .put(&api_path(&format!("/products/{}", uuid::Uuid::new_v4())))
        .json(&json!({ "stock": 1 }))
        .await;

    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_update_product_rejects_negative_price() {
    let app = setup_test_app().await;
    let client = app.client();

    let created: Value = client
        .post(&api_path("/products"))
        .json(&json!({ "name": "Bench", "price": 120, "category": "furniture" }))
        .await
        .json();
    let id = str_field(&created, "id");

    let response = client
        .put(&api_path(&format!("/products/{}", id)))
        .json(&json!({ "price": -5 }))
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.json::<Value>()["code"], "INVALID_INPUT");

    let fetched: Value = client
        .get(&api_path(&format!("/products/{}", id)))
        .await
        .json();
    assert_eq!(fetched["price"], created["price"]);
}

#[tokio::test]
async fn test_create_advertisement_promotes_hero_and_category_images() {
    let app = setup_test_app().await;
    let client = app.client();

    let hero = stage_png(client, "hero", "ad-form").await;
    let category = stage_png(client, "categories", "ad-form").await;
    let hero_name = str_field(&hero, "key").rsplit('/').next().unwrap().to_string();
    let category_name = str_field(&category, "key")
        .rsplit('/')
        .next()
        .unwrap()
        .to_string();

    let response = client
        .post(&api_path("/advertisements"))
        .add_header(UPLOAD_SESSION_HEADER, "ad-form")
        .json(&json!({
            "title": "Autumn sale",
            "link_url": "https://shop.example.com/sale",
            "image_url": str_field(&hero, "url"),
            "category_image_url": str_field(&category, "url")
        }))
        .await;

    assert_eq!(response.status_code(), 201, "{}", response.text());
    let advertisement: Value = response.json();
    assert_eq!(
        advertisement["image_url"],
        format!("{}/hero/{}", ASSET_BASE_URL, hero_name)
    );
    assert_eq!(
        advertisement["category_image_url"],
        format!("{}/categories/{}", ASSET_BASE_URL, category_name)
    );
    assert_eq!(advertisement["active"], true);

    assert!(app.object_exists(&format!("hero/{}", hero_name)).await);
    assert!(app.object_exists(&format!("categories/{}", category_name)).await);
    assert!(app.state.assets.registry().assets("ad-form").is_empty());

    let listed = client.get(&api_path("/advertisements")).await;
    assert_eq!(listed.status_code(), 200);
    assert_eq!(listed.json::<Value>().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_health_reports_storage_backend() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "local");
}

#[tokio::test]
async fn test_saving_without_uploads_leaves_no_tracked_session() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client
        .post(&api_path("/products"))
        .add_header(UPLOAD_SESSION_HEADER, "no-upload-form")
        .json(&json!({ "name": "Rug", "price": 60, "category": "textiles" }))
        .await;
    assert_eq!(response.status_code(), 201);

    let health: Value = client.get("/health").await.json();
    assert_eq!(health["tracked_sessions"], 0);
    assert!(app.state.assets.registry().is_empty());
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/openapi.json").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert!(body["paths"]["/api/v1/temp-uploads/cleanup"].is_object());
}
