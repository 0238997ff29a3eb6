use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::{extract::Request, middleware::Next, response::Response};
use std::convert::Infallible;
use uuid::Uuid;

use crate::constants::{MAX_SESSION_ID_LENGTH, UPLOAD_SESSION_HEADER};

/// Upload session id for the current request.
///
/// Correlates the uploads of one admin form with its final submit; it is not
/// an authentication session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadSessionId(pub String);

impl UploadSessionId {
    /// Session id from the request headers, or a fresh UUID when the header
    /// is absent or unusable
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let session_id = headers
            .get(UPLOAD_SESSION_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|s| is_valid_session_id(s))
            .map(|s| s.to_string())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        UploadSessionId(session_id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_valid_session_id(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_SESSION_ID_LENGTH
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Upload session middleware
/// Resolves the session id for each request and includes it in:
/// - Request extensions (for handlers)
/// - Response headers (X-Upload-Session), so the client can reuse it
pub async fn upload_session_middleware(mut request: Request, next: Next) -> Response {
    let session = UploadSessionId::from_headers(request.headers());

    request.extensions_mut().insert(session.clone());

    let mut response = next.run(request).await;

    if let Ok(header_value) = HeaderValue::from_str(&session.0) {
        response
            .headers_mut()
            .insert(UPLOAD_SESSION_HEADER, header_value);
    }

    response
}

impl<S> FromRequestParts<S> for UploadSessionId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<UploadSessionId>()
            .cloned()
            .unwrap_or_else(|| UploadSessionId::from_headers(&parts.headers)))
    }
}
