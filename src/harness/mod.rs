//! Integration harness for the posts API.
//!
//! A [`TestContext`] owns a running server, a direct connection to the same
//! database, and an HTTP client. Each step returns what the next step needs:
//!
//! ```no_run
//! # async fn run() -> blog_posts::harness::Result<()> {
//! use blog_posts::harness::{assertions, fixtures, TestContext};
//!
//! let ctx = TestContext::setup().await?;
//! let created = assertions::assert_create_post(&ctx, &fixtures::generate_blog_post_data()).await?;
//! assertions::assert_delete_post(&ctx, &created.id).await?;
//! ctx.teardown().await
//! # }
//! ```
//!
//! Infrastructure failures come back as [`HarnessError`]; assertion
//! failures panic with a message naming the request that failed.

pub mod assertions;
pub mod client;
pub mod context;
pub mod fixtures;
pub mod seed;
pub mod server;

pub use client::{ApiClient, ApiResponse, PostUpdate};
pub use context::{HarnessConfig, TestContext};
pub use server::TestServer;

use crate::error::StoreError;

pub type Result<T> = std::result::Result<T, HarnessError>;

#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("server failed to start: {0}")]
    Launch(String),

    #[error("server task failed: {0}")]
    Server(String),

    #[error("harness configuration: {0}")]
    Config(String),
}
