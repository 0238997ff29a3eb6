//! API constants
//!
//! Every versioned route lives under [`API_PREFIX`].

/// Versioned API prefix
pub const API_PREFIX: &str = "/api/v1";

/// Header carrying the upload session id between the admin form and the API
pub const UPLOAD_SESSION_HEADER: &str = "x-upload-session";

/// Longest client-supplied session id that is accepted as-is
pub const MAX_SESSION_ID_LENGTH: usize = 128;

/// Multipart framing allowance on top of the largest accepted file
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;
