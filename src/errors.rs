//! Error types for the gateway
//!
//! Every request failure, whether a genuinely missing resource or a
//! backend error, maps to the same not-found status with the error's
//! display text as a plain-text body. The distinguishing detail lives
//! only in that text.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Request-level errors surfaced to HTTP clients.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The backend bucket listing failed
    #[error("ListBuckets err {0}")]
    ListBuckets(String),

    /// The backend reported no buckets at all
    #[error("no buckets available")]
    NoBuckets,

    /// The requested bucket does not exist
    #[error("bucket {0} is not found")]
    BucketNotFound(String),

    /// Listing the contents of a bucket failed
    #[error("list contents of bucket {bucket} err {detail}")]
    ListContents { bucket: String, detail: String },

    /// The requested key does not exist in the bucket
    #[error("cannot find path:{key} in bucket:{bucket}")]
    KeyNotFound { bucket: String, key: String },

    /// Opening the object reader failed
    #[error("get reader err:{0}")]
    OpenReader(String),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (StatusCode::NOT_FOUND, self.to_string()).into_response()
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, GatewayError>;
