use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

use crate::models::{Article, ItemsQuery};

pub const QIITA_API_BASE: &str = "https://qiita.com/api/v2";

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Failed to reach Qiita API: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Qiita API returned error: {status} - {body}")]
    Status { status: StatusCode, body: String },

    #[error("Failed to parse Qiita API response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("Invalid access token header value")]
    InvalidToken,
}

pub struct QiitaClient {
    client: Client,
    base_url: String,
    access_token: Option<String>,
    timeout: Duration,
}

impl QiitaClient {
    pub fn new(access_token: Option<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: QIITA_API_BASE.to_string(),
            access_token,
            timeout,
        })
    }

    /// Point the client at a different API root, e.g. a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn items_url(&self) -> String {
        format!("{}/items", self.base_url)
    }

    fn headers(&self) -> Result<HeaderMap, RequestError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &self.access_token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| RequestError::InvalidToken)?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Fetch one page of items. `per_page` is clamped to 100.
    pub async fn fetch_items(
        &self,
        page: u32,
        per_page: u32,
        query: Option<&str>,
    ) -> Result<Vec<Article>, RequestError> {
        let params = ItemsQuery::new(page, per_page, query).params();
        tracing::debug!(url = %self.items_url(), ?params, "Fetching Qiita items");

        let response = self
            .client
            .get(self.items_url())
            .headers(self.headers()?)
            .query(&params)
            .send()
            .await
            .map_err(RequestError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unknown error"));
            return Err(RequestError::Status { status, body });
        }

        let articles = response
            .json::<Vec<Article>>()
            .await
            .map_err(RequestError::Decode)?;

        tracing::info!(count = articles.len(), "Fetched Qiita items");
        Ok(articles)
    }

    /// Blocking twin of [`fetch_items`](Self::fetch_items).
    ///
    /// Must not be called from within an async runtime; use `spawn_blocking`.
    pub fn fetch_items_blocking(
        &self,
        page: u32,
        per_page: u32,
        query: Option<&str>,
    ) -> Result<Vec<Article>, RequestError> {
        let params = ItemsQuery::new(page, per_page, query).params();
        tracing::debug!(url = %self.items_url(), ?params, "Fetching Qiita items (blocking)");

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(RequestError::Transport)?;

        let response = client
            .get(self.items_url())
            .headers(self.headers()?)
            .query(&params)
            .send()
            .map_err(RequestError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| String::from("unknown error"));
            return Err(RequestError::Status { status, body });
        }

        let articles = response
            .json::<Vec<Article>>()
            .map_err(RequestError::Decode)?;

        tracing::info!(count = articles.len(), "Fetched Qiita items");
        Ok(articles)
    }
}
