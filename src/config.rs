//! Server configuration loaded from the environment.

const DEFAULT_DATABASE_URL: &str = "sqlite://data/blog.db";

#[derive(Debug, Clone)]
pub struct Config {
    /// Connection string for the document store, see [`crate::db::DatabaseUrl`].
    pub database_url: String,
}

impl Config {
    /// Reads `DATABASE_URL`. Listen address and port come from Rocket's own
    /// `ROCKET_ADDRESS` / `ROCKET_PORT`.
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
        }
    }
}
