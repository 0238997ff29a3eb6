//! Upload helpers shared by the staging and catalog tests.

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use serde_json::Value;
use shopfront_api::constants::UPLOAD_SESSION_HEADER;

use super::{api_path, fixtures};

pub fn image_form(data: Vec<u8>, file_name: &str, mime_type: &str) -> MultipartForm {
    let part = Part::bytes(data).file_name(file_name).mime_type(mime_type);
    MultipartForm::new().add_part("file", part)
}

/// Stage a PNG under `category` ("products", "hero", "categories") and return the response body
pub async fn stage_png(client: &TestServer, category: &str, session_id: &str) -> Value {
    let response = client
        .post(&api_path(&format!("/temp-uploads/{}", category)))
        .add_header(UPLOAD_SESSION_HEADER, session_id)
        .multipart(image_form(
            fixtures::create_minimal_png(),
            "photo.png",
            "image/png",
        ))
        .await;
    assert_eq!(response.status_code(), 201, "{}", response.text());
    response.json::<Value>()
}

pub fn str_field<'a>(body: &'a Value, field: &str) -> &'a str {
    body[field]
        .as_str()
        .unwrap_or_else(|| panic!("missing string field '{}' in {}", field, body))
}
