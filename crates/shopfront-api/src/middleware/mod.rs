//! HTTP middleware

pub mod upload_session;

pub use upload_session::{upload_session_middleware, UploadSessionId};
