//! Per-test handle threading server, store and client through setup and
//! teardown.

use std::ffi::OsString;
use std::path::PathBuf;

use super::client::ApiClient;
use super::seed::seed_blog_post_data;
use super::server::TestServer;
use super::{HarnessError, Result};
use crate::db::{self, DatabaseUrl};
use crate::models::{BlogPost, POSTS};
use crate::{DbPool, DbPoolExt};

#[derive(Debug, Clone, Default)]
pub struct HarnessConfig {
    /// Shared test database. When unset, every context gets its own file
    /// under the system temp dir and cases may run in parallel. When set,
    /// run the suite with `--test-threads=1`.
    pub database_url: Option<String>,
}

impl HarnessConfig {
    /// Reads `TEST_DATABASE_URL`.
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("TEST_DATABASE_URL").ok().filter(|v| !v.trim().is_empty()),
        }
    }

    fn resolve(&self) -> Result<(String, Option<DatabaseFile>)> {
        let Some(url) = &self.database_url else {
            let path = std::env::temp_dir().join(format!("blog-posts-test-{}.db", uuid::Uuid::new_v4().simple()));
            let url = format!("sqlite://{}", path.display());
            return Ok((url, Some(DatabaseFile(path))));
        };
        match DatabaseUrl::parse(url)? {
            DatabaseUrl::Memory => Err(HarnessError::Config(
                "in-memory databases can't be shared between server and harness".to_string(),
            )),
            DatabaseUrl::File(_) => Ok((url.clone(), None)),
        }
    }
}

/// Removes a harness-created database (and its WAL side files) on drop.
struct DatabaseFile(PathBuf);

impl Drop for DatabaseFile {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut path = OsString::from(self.0.as_os_str());
            path.push(suffix);
            let _ = std::fs::remove_file(path);
        }
    }
}

pub struct TestContext {
    server: TestServer,
    store: DbPool,
    api: ApiClient,
    // Last, so the file outlives both connections.
    _database: Option<DatabaseFile>,
}

impl TestContext {
    /// Opens the database twice (server side and harness side) and starts
    /// the server on it. Nothing is seeded.
    pub async fn start(config: &HarnessConfig) -> Result<Self> {
        let (url, database) = config.resolve()?;
        let server = TestServer::spawn(db::open(&url)?).await?;
        let store = DbPool::new(db::open(&url)?);
        let api = ApiClient::new(server.base_url())?;
        tracing::info!(%url, base_url = server.base_url(), "Test context started");
        Ok(Self { server, store, api, _database: database })
    }

    /// Starts from the environment's config and seeds the baseline posts.
    pub async fn setup() -> Result<Self> {
        Self::setup_with(&HarnessConfig::from_env()).await
    }

    /// Starts on `config` with exactly [`SEED_COUNT`](super::seed::SEED_COUNT)
    /// posts, whatever a shared database held before.
    pub async fn setup_with(config: &HarnessConfig) -> Result<Self> {
        let ctx = Self::start(config).await?;
        ctx.reset()?;
        ctx.seed()?;
        Ok(ctx)
    }

    pub fn seed(&self) -> Result<Vec<String>> {
        seed_blog_post_data(&self.store.conn())
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn base_url(&self) -> &str {
        self.server.base_url()
    }

    /// Looks a post up directly in the store, bypassing HTTP.
    pub fn find_post(&self, id: &str) -> Result<Option<BlogPost>> {
        Ok(db::find_by_id(&self.store.conn(), POSTS, id)?)
    }

    pub fn post_count(&self) -> Result<u64> {
        Ok(db::count(&self.store.conn(), POSTS)?)
    }

    /// Drops the test database; the server keeps running.
    pub fn reset(&self) -> Result<()> {
        Ok(db::drop_database(&self.store.conn())?)
    }

    /// Drops the database, then stops the server.
    pub async fn teardown(self) -> Result<()> {
        self.reset()?;
        let TestContext { server, store, api, _database } = self;
        server.stop().await?;
        drop((api, store, _database));
        Ok(())
    }
}
