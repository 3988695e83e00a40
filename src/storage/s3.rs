//! S3 storage backend implementation
//!
//! Talks to any S3-compatible endpoint using the static credentials
//! supplied at startup. Path-style addressing is forced so bucket names
//! resolve against custom endpoints (MinIO, Ceph RGW, etc.) without DNS
//! games. The region is a fixed placeholder; S3-compatible endpoints
//! ignore it.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use tracing::debug;

use crate::config::Config;
use crate::storage::{ObjectInfo, ObjectReader, StorageBackend};

const PLACEHOLDER_REGION: &str = "us-east-1";

/// S3-compatible storage backend.
pub struct S3Backend {
    client: Client,
}

impl S3Backend {
    /// Build a client for the configured endpoint and static credentials.
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let credentials = aws_sdk_s3::config::Credentials::new(
            &config.access_key,
            &config.secret_key,
            None, // session_token
            None, // expiry
            "s3browse-config",
        );

        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(PLACEHOLDER_REGION))
            .endpoint_url(&config.s3_endpoint)
            .credentials_provider(credentials)
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: Client::from_conf(s3_config),
        })
    }

    /// Map an AWS SDK error to an anyhow error with context.
    fn map_sdk_error(context: &str, err: impl std::error::Error + Send + Sync + 'static) -> anyhow::Error {
        anyhow::anyhow!("{context}: {}", aws_sdk_s3::error::DisplayErrorContext(err))
    }
}

#[async_trait]
impl StorageBackend for S3Backend {
    async fn list_buckets(&self) -> anyhow::Result<Vec<String>> {
        let resp = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(|e| Self::map_sdk_error("list_buckets", e))?;

        let names = resp
            .buckets()
            .iter()
            .filter_map(|b| b.name().map(str::to_string))
            .collect();

        Ok(names)
    }

    async fn list_keys(&self, bucket: &str) -> anyhow::Result<HashMap<String, ObjectInfo>> {
        debug!(bucket, "listing bucket contents");

        let mut contents = HashMap::new();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| Self::map_sdk_error("list_objects_v2", e))?;
            for object in page.contents() {
                if let Some(key) = object.key() {
                    let size = object.size().unwrap_or(0).max(0) as u64;
                    contents.insert(key.to_string(), ObjectInfo { size });
                }
            }
        }

        Ok(contents)
    }

    async fn open_reader(&self, bucket: &str, key: &str) -> anyhow::Result<ObjectReader> {
        debug!(bucket, key, "opening object reader");

        let resp = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Self::map_sdk_error("get_object", e))?;

        Ok(Box::new(resp.body.into_async_read()))
    }
}
