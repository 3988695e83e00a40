//! Request handler for the gateway endpoint family
//!
//! One handler serves all three modes. Per request: list buckets, parse
//! the path into (bucket, key), then either render the bucket index,
//! render the key index, or stream object bytes. All three backend
//! calls are issued fresh on every request.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, Host, State},
    http::{header, HeaderValue, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use tokio::io::AsyncReadExt;
use tokio_util::io::ReaderStream;
use tracing::{error, info, instrument};

use crate::errors::{GatewayError, Result};
use crate::storage::{ObjectInfo, StorageBackend};
use crate::{path, render};

/// GET handler for every path: bucket index, key index, or object stream.
#[instrument(name = "request", skip_all)]
pub async fn browse(
    State(storage): State<Arc<dyn StorageBackend>>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    Host(host): Host,
    uri: Uri,
) -> Result<Response> {
    info!(remote = %remote, path = %uri.path(), "request");

    let buckets = storage.list_buckets().await.map_err(|e| {
        error!(error = %e, "bucket listing failed");
        GatewayError::ListBuckets(e.to_string())
    })?;
    if buckets.is_empty() {
        return Err(GatewayError::NoBuckets);
    }

    let (bucket_name, object_key) = path::split_target(uri.path());

    if bucket_name.is_empty() {
        // Bucket index, in the order the backend returned.
        let page = render::listing_page(
            buckets.iter().map(String::as_str),
            &format!("http://{host}"),
        );
        return Ok(Html(page).into_response());
    }

    let bucket = buckets
        .iter()
        .find(|name| **name == bucket_name)
        .ok_or_else(|| GatewayError::BucketNotFound(bucket_name.clone()))?;

    let contents = storage
        .list_keys(bucket)
        .await
        .map_err(|e| GatewayError::ListContents {
            bucket: bucket.clone(),
            detail: e.to_string(),
        })?;

    if object_key.is_empty() {
        // Key index: sorted ascending, rendered in reverse so the
        // lexicographically last entries come first.
        let mut keys: Vec<&str> = contents.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys.reverse();
        let page = render::listing_page(keys, &format!("http://{host}/{bucket}"));
        return Ok(Html(page).into_response());
    }

    stream_object(storage.as_ref(), &contents, bucket, &object_key).await
}

/// Stream one object's bytes with the headers the listing promised.
async fn stream_object(
    storage: &dyn StorageBackend,
    contents: &HashMap<String, ObjectInfo>,
    bucket: &str,
    requested: &str,
) -> Result<Response> {
    let wanted = path::clean(requested);
    let size = contents
        .iter()
        .find_map(|(key, info)| (path::clean(key) == wanted).then_some(info.size))
        .ok_or_else(|| GatewayError::KeyNotFound {
            bucket: bucket.to_string(),
            key: requested.to_string(),
        })?;

    let reader = storage
        .open_reader(bucket, &wanted)
        .await
        .map_err(|e| GatewayError::OpenReader(e.to_string()))?;

    // Copy exactly `size` bytes; a client disconnect mid-stream is not
    // separately reported once headers are out. Range request headers
    // are ignored and the full object is always returned.
    let body = Body::from_stream(ReaderStream::new(reader.take(size)));

    let mut response = Response::new(body);
    *response.status_mut() = StatusCode::OK;
    response
        .headers_mut()
        .insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));
    if !response.headers().contains_key(header::CONTENT_ENCODING) {
        response
            .headers_mut()
            .insert(header::CONTENT_LENGTH, HeaderValue::from(size));
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::create_router;
    use async_trait::async_trait;
    use axum::http::Request;
    use std::io::Cursor;
    use tower::ServiceExt;

    /// In-memory backend for driving the router in tests.
    #[derive(Default)]
    struct MockBackend {
        buckets: Vec<String>,
        keys: HashMap<String, HashMap<String, ObjectInfo>>,
        data: HashMap<(String, String), Vec<u8>>,
        fail_buckets: Option<String>,
    }

    impl MockBackend {
        fn with_buckets(names: &[&str]) -> Self {
            Self {
                buckets: names.iter().map(|n| n.to_string()).collect(),
                ..Self::default()
            }
        }

        fn key(mut self, bucket: &str, key: &str, data: &[u8]) -> Self {
            self.keys
                .entry(bucket.to_string())
                .or_default()
                .insert(key.to_string(), ObjectInfo { size: data.len() as u64 });
            self.data
                .insert((bucket.to_string(), key.to_string()), data.to_vec());
            self
        }

        /// Register object bytes under a different key than the listing
        /// uses, for exercising canonical-cleaning matches.
        fn data_at(mut self, bucket: &str, key: &str, data: &[u8]) -> Self {
            self.data
                .insert((bucket.to_string(), key.to_string()), data.to_vec());
            self
        }
    }

    #[async_trait]
    impl StorageBackend for MockBackend {
        async fn list_buckets(&self) -> anyhow::Result<Vec<String>> {
            if let Some(message) = &self.fail_buckets {
                anyhow::bail!("{message}");
            }
            Ok(self.buckets.clone())
        }

        async fn list_keys(&self, bucket: &str) -> anyhow::Result<HashMap<String, ObjectInfo>> {
            self.keys
                .get(bucket)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("no such bucket: {bucket}"))
        }

        async fn open_reader(
            &self,
            bucket: &str,
            key: &str,
        ) -> anyhow::Result<crate::storage::ObjectReader> {
            let data = self
                .data
                .get(&(bucket.to_string(), key.to_string()))
                .ok_or_else(|| anyhow::anyhow!("no such key: {key}"))?;
            Ok(Box::new(Cursor::new(data.clone())))
        }
    }

    fn request(path: &str) -> Request<Body> {
        Request::builder()
            .uri(path)
            .header("host", "example.com")
            .extension(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000))))
            .body(Body::empty())
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn bucket_index_preserves_backend_order() {
        let backend = Arc::new(MockBackend::with_buckets(&["b2", "b1"]));
        let response = create_router(backend).oneshot(request("/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("<a href=\"http://example.com/b2\">"));
        assert!(body.contains("<a href=\"http://example.com/b1\">"));
        assert!(body.find("b2").unwrap() < body.find("b1").unwrap());
    }

    #[tokio::test]
    async fn key_index_renders_descending() {
        let backend = Arc::new(
            MockBackend::with_buckets(&["docs"])
                .key("docs", "a", b"1")
                .key("docs", "c", b"2")
                .key("docs", "b", b"3"),
        );
        let response = create_router(backend)
            .oneshot(request("/docs"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        let pos = |needle: &str| body.find(needle).unwrap();
        assert!(pos("<font size=\"18\"> c<") < pos("<font size=\"18\"> b<"));
        assert!(pos("<font size=\"18\"> b<") < pos("<font size=\"18\"> a<"));
        assert!(body.contains("<a href=\"http://example.com/docs/c\">"));
    }

    #[tokio::test]
    async fn missing_bucket_names_the_bucket() {
        let backend = Arc::new(MockBackend::with_buckets(&["b1", "b2"]));
        let response = create_router(backend).oneshot(request("/X")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains('X'));
    }

    #[tokio::test]
    async fn empty_backend_is_not_found_for_any_path() {
        let backend = Arc::new(MockBackend::with_buckets(&[]));
        let app = create_router(backend);

        for path in ["/", "/docs", "/docs/readme.txt"] {
            let response = app.clone().oneshot(request(path)).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }
    }

    #[tokio::test]
    async fn bucket_listing_failure_is_not_found_with_detail() {
        let backend = Arc::new(MockBackend {
            fail_buckets: Some("connection refused".to_string()),
            ..MockBackend::default()
        });
        let response = create_router(backend).oneshot(request("/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("connection refused"));
    }

    #[tokio::test]
    async fn object_fetch_streams_exact_bytes() {
        let payload = b"hello from the bucket";
        let backend = Arc::new(
            MockBackend::with_buckets(&["docs"]).key("docs", "readme.txt", payload),
        );
        let response = create_router(backend)
            .oneshot(request("/docs/readme.txt"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::ACCEPT_RANGES).unwrap(),
            "bytes"
        );
        assert_eq!(
            response.headers().get(header::CONTENT_LENGTH).unwrap(),
            &payload.len().to_string()
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(bytes.as_ref(), payload);
    }

    #[tokio::test]
    async fn nested_keys_round_trip() {
        let backend = Arc::new(
            MockBackend::with_buckets(&["docs"]).key("docs", "2024/notes/a.txt", b"nested"),
        );
        let response = create_router(backend)
            .oneshot(request("/docs/2024/notes/a.txt"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(bytes.as_ref(), b"nested");
    }

    #[tokio::test]
    async fn object_match_uses_canonical_cleaning() {
        // Listed under "a/./b"; the reader is opened with the cleaned
        // key, so the bytes live at "a/b".
        let backend = Arc::new(
            MockBackend::with_buckets(&["docs"])
                .key("docs", "a/./b", b"cleaned")
                .data_at("docs", "a/b", b"cleaned"),
        );
        let response = create_router(backend)
            .oneshot(request("/docs/a/b"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(bytes.as_ref(), b"cleaned");
    }

    #[tokio::test]
    async fn missing_key_names_path_and_bucket() {
        let backend = Arc::new(
            MockBackend::with_buckets(&["docs"]).key("docs", "present.txt", b"x"),
        );
        let response = create_router(backend)
            .oneshot(request("/docs/absent.txt"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_text(response).await;
        assert!(body.contains("absent.txt"));
        assert!(body.contains("docs"));
    }
}
