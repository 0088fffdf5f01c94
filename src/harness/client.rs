//! Thin HTTP driver for the posts endpoints.

use reqwest::{RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;

use super::Result;
use crate::models::NewBlogPost;

/// Body sent with `PUT /posts/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct PostUpdate {
    pub id: String,
    pub title: String,
    pub content: String,
}

/// Status plus decoded JSON body; `body` is `None` for an empty response and
/// a JSON string for a body that isn't JSON.
#[derive(Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Option<Value>,
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        // No idle keep-alive connections, so server shutdown never waits on us.
        let http = reqwest::Client::builder().pool_max_idle_per_host(0).build()?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string() })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn list_posts(&self) -> Result<ApiResponse> {
        self.send(self.http.get(self.url("/posts"))).await
    }

    pub async fn get_post(&self, id: &str) -> Result<ApiResponse> {
        self.send(self.http.get(self.url(&format!("/posts/{id}")))).await
    }

    pub async fn create_post(&self, post: &NewBlogPost) -> Result<ApiResponse> {
        self.send(self.http.post(self.url("/posts")).json(post)).await
    }

    /// Sends any JSON body to `POST /posts`, for shapes `NewBlogPost` can't express.
    pub async fn create_post_raw(&self, body: &Value) -> Result<ApiResponse> {
        self.send(self.http.post(self.url("/posts")).json(body)).await
    }

    pub async fn update_post(&self, update: &PostUpdate) -> Result<ApiResponse> {
        let url = self.url(&format!("/posts/{}", update.id));
        self.send(self.http.put(url).json(update)).await
    }

    pub async fn delete_post(&self, id: &str) -> Result<ApiResponse> {
        self.send(self.http.delete(self.url(&format!("/posts/{id}")))).await
    }

    async fn send(&self, req: RequestBuilder) -> Result<ApiResponse> {
        let resp = req.send().await?;
        let status = resp.status();
        let url = resp.url().to_string();
        let bytes = resp.bytes().await?;
        tracing::debug!(%url, %status, len = bytes.len(), "API response");

        if bytes.is_empty() {
            return Ok(ApiResponse { status, body: None });
        }
        // Non-JSON bodies come back as a string so the status still reaches the caller.
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        Ok(ApiResponse { status, body: Some(body) })
    }
}
