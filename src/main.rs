//! Blog posts API server.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blog_posts::{config::Config, create_rocket, db};

#[rocket::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,blog_posts=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!(database_url = %config.database_url, "Opening document store");
    let conn = db::open(&config.database_url)?;

    let _rocket = create_rocket(conn).launch().await?;
    tracing::info!("Server stopped");
    Ok(())
}
