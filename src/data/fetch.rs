//! Row-data resource fetching.
//!
//! A resource is the delimited text behind a session title, served at
//! `data/<lowercased title>.csv` relative to a base URL.

use crate::error::{QueryDeckError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;
use url::Url;

/// Returns the relative path of the resource backing `title`.
pub fn resource_path(title: &str) -> String {
    format!("data/{}.csv", title.to_lowercase())
}

/// Trait defining the interface for row-data sources.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Fetches the raw delimited text for `title`.
    async fn fetch(&self, title: &str) -> Result<String>;
}

/// Fetches resources over HTTP.
#[derive(Debug, Clone)]
pub struct HttpResourceFetcher {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpResourceFetcher {
    /// Creates a fetcher that resolves resource paths against `base_url`.
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Returns the absolute URL of the resource backing `title`.
    pub fn resource_url(&self, title: &str) -> Result<Url> {
        self.base_url.join(&resource_path(title)).map_err(|e| {
            QueryDeckError::resource_fetch(format!("Invalid resource URL for '{title}': {e}"))
        })
    }
}

#[async_trait]
impl ResourceFetcher for HttpResourceFetcher {
    async fn fetch(&self, title: &str) -> Result<String> {
        let url = self.resource_url(title)?;
        let name = title.to_lowercase();
        debug!("Fetching {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| QueryDeckError::resource_fetch(format!("Failed to load {name} data: {e}")))?;

        if !response.status().is_success() {
            return Err(QueryDeckError::resource_fetch(format!(
                "Failed to load {name} data"
            )));
        }

        response
            .text()
            .await
            .map_err(|e| QueryDeckError::resource_fetch(format!("Failed to load {name} data: {e}")))
    }
}

/// Serves resources from memory, keyed by lowercased title.
#[derive(Debug, Clone, Default)]
pub struct StaticResourceFetcher {
    resources: HashMap<String, String>,
}

impl StaticResourceFetcher {
    /// Creates an empty fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resource.
    pub fn with_resource(mut self, title: &str, text: impl Into<String>) -> Self {
        self.resources.insert(title.to_lowercase(), text.into());
        self
    }
}

#[async_trait]
impl ResourceFetcher for StaticResourceFetcher {
    async fn fetch(&self, title: &str) -> Result<String> {
        let name = title.to_lowercase();
        self.resources
            .get(&name)
            .cloned()
            .ok_or_else(|| QueryDeckError::resource_fetch(format!("Failed to load {name} data")))
    }
}

/// A fetcher whose every request fails. Used to exercise error paths.
#[derive(Debug, Clone, Default)]
pub struct FailingResourceFetcher;

#[async_trait]
impl ResourceFetcher for FailingResourceFetcher {
    async fn fetch(&self, title: &str) -> Result<String> {
        Err(QueryDeckError::resource_fetch(format!(
            "Failed to load {} data: connection refused",
            title.to_lowercase()
        )))
    }
}
